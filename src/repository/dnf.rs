use crate::error::{LookupError, RunError};
use crate::models::BuildDescriptor;

use super::{run_query, CommandRunner, PackageQuery};

/// One line per build; the license goes last since it may contain anything but tabs.
const QUERY_FORMAT: &str = "%{name}\t%{epoch}\t%{version}\t%{release}\t%{evr}\t%{license}\n";

/// An initialised view of the configured repositories.
///
/// Opening runs `dnf makecache` once; every query afterwards reads the
/// cached metadata only. The caller owns the session and may share it
/// across any number of lookups.
pub struct RepoSession {
    dnf: String,
    runner: Box<dyn CommandRunner>,
}

impl RepoSession {
    pub fn open(dnf: &str, runner: Box<dyn CommandRunner>) -> Result<Self, RunError> {
        let args = vec!["--quiet".to_string(), "makecache".to_string()];
        let output = runner
            .run(dnf, &args)
            .map_err(|e| RunError::RepositoryInit(format!("{}: {}", dnf, e)))?;

        if !output.success {
            return Err(RunError::RepositoryInit(output.stderr));
        }

        Ok(Self {
            dnf: dnf.to_string(),
            runner,
        })
    }

    fn repoquery(&self, name: &str, extra: &[&str]) -> Result<Vec<BuildDescriptor>, LookupError> {
        let mut args: Vec<String> = ["repoquery", "--cacheonly", "--quiet", "--available"]
            .iter()
            .chain(extra)
            .map(|s| s.to_string())
            .collect();
        args.push("--queryformat".to_string());
        args.push(QUERY_FORMAT.to_string());
        args.push(name.to_string());

        let stdout = run_query(self.runner.as_ref(), &self.dnf, &args, name)?;
        parse_query_output(&stdout).map_err(|reason| LookupError::Unexpected {
            package: name.to_string(),
            reason,
        })
    }
}

/// Structured [`PackageQuery`] over a borrowed [`RepoSession`].
pub struct DnfRepoQuery<'s> {
    session: &'s RepoSession,
}

impl<'s> DnfRepoQuery<'s> {
    pub fn new(session: &'s RepoSession) -> Self {
        Self { session }
    }
}

impl PackageQuery for DnfRepoQuery<'_> {
    fn query_available(&self, name: &str) -> Result<Vec<BuildDescriptor>, LookupError> {
        self.session.repoquery(name, &[])
    }

    fn select_latest(&self, builds: &[BuildDescriptor]) -> Option<Vec<BuildDescriptor>> {
        let name = &builds.first()?.name;
        self.session.repoquery(name, &["--latest-limit", "1"]).ok()
    }
}

/// Parse `QUERY_FORMAT` lines into descriptors. Blank lines are ignored.
fn parse_query_output(stdout: &str) -> Result<Vec<BuildDescriptor>, String> {
    let mut builds = Vec::new();

    for line in stdout.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.splitn(6, '\t').collect();
        let [name, epoch, version, release, evr, license] = fields[..] else {
            return Err(format!("malformed repoquery line: {:?}", line));
        };

        let epoch = match epoch.trim() {
            "" | "(none)" => 0,
            e => e
                .parse::<u32>()
                .map_err(|_| format!("invalid epoch {:?} for {}", e, name))?,
        };

        builds.push(BuildDescriptor {
            evr: evr.trim().to_string(),
            ..BuildDescriptor::new(name, epoch, version, release, Some(license))
        });
    }

    Ok(builds)
}
