//! Pick the newest available build of a package and report its license.
//!
//! - [`evr`] — structured builds, ordered by epoch then `epoch:version-release`.
//! - [`source`] — `Source` / `License` pairs from a text report, ordered by
//!   the numeric release of the source RPM.
//!
//! Both are used through [`LicenseResolver`]; which one runs is a config choice.

use crate::error::LookupError;

pub mod evr;
pub mod source;

pub trait LicenseResolver {
    /// License of the newest build of `package` (already normalized), or
    /// [`UNKNOWN_LICENSE`](crate::models::UNKNOWN_LICENSE) when that build has none.
    fn resolve_license(&self, package: &str) -> Result<String, LookupError>;
}

/// Malformed input that forces a pairwise comparison onto its string fallback.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum CompareError {
    #[error("build {0} has an empty version")]
    MissingVersion(String),

    #[error("build {0} has an empty release")]
    MissingRelease(String),

    #[error("source {0:?} has no version-release token")]
    NoVersionRelease(String),

    #[error("release number in {0:?} does not fit in 64 bits")]
    ReleaseOverflow(String),
}

/// Left-to-right reduction keeping the first of equally new items.
pub(crate) fn newest_by<T>(items: &[T], is_newer: impl Fn(&T, &T) -> bool) -> Option<&T> {
    let (first, rest) = items.split_first()?;
    Some(rest.iter().fold(first, |newest, candidate| {
        if is_newer(candidate, newest) {
            candidate
        } else {
            newest
        }
    }))
}
