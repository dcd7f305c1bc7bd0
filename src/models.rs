use serde::{Deserialize, Serialize};

/// Marker written for a package whose newest build carries no license.
pub const UNKNOWN_LICENSE: &str = "N/A";

/// One available build of a package, as reported by a structured query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildDescriptor {
    pub name: String,
    pub epoch: u32,
    pub version: String,
    pub release: String,
    pub license: Option<String>,
    /// `epoch:version-release`; empty when the repository did not report it.
    pub evr: String,
}

impl BuildDescriptor {
    pub fn new(name: &str, epoch: u32, version: &str, release: &str, license: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            epoch,
            version: version.to_string(),
            release: release.to_string(),
            license: clean_license(license),
            evr: format!("{}:{}-{}", epoch, version, release),
        }
    }
}

impl std::fmt::Display for BuildDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}:{}-{}", self.name, self.epoch, self.version, self.release)
    }
}

/// A `Source` / `License` pair lifted from a `dnf repoquery --info` report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Source RPM file name, e.g. `boost-1.83.0-5.fc40.src.rpm`.
    pub source: String,
    pub license: Option<String>,
}

impl SourceRecord {
    pub fn new(source: &str, license: Option<&str>) -> Self {
        Self {
            source: source.to_string(),
            license: clean_license(license),
        }
    }
}

/// Empty values and rpm's `(none)` placeholder mean "no license".
pub fn clean_license(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty() && *s != "(none)")
        .map(str::to_string)
}

/// What happened to a single table row during processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowOutcome {
    Skipped,
    Updated(String),
    /// The row's License was set to `marker`; `reason` says why.
    Failed { marker: String, reason: String },
}

impl std::fmt::Display for RowOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowOutcome::Skipped => write!(f, "skipped"),
            RowOutcome::Updated(license) => write!(f, "updated ({})", license),
            RowOutcome::Failed { marker, reason } => write!(f, "{} ({})", marker, reason),
        }
    }
}
