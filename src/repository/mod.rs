//! Query collaborators backed by the `dnf` command line.
//!
//! - [`dnf`] — structured queries (`repoquery --queryformat`) over an
//!   explicitly opened [`dnf::RepoSession`].
//! - [`info`] — the free-text `repoquery --info` report.
//!
//! Both go through a [`CommandRunner`] so tests can feed canned output.

use std::process::Command;

use crate::error::LookupError;
use crate::models::BuildDescriptor;

pub mod dnf;
pub mod info;
#[cfg(test)]
pub(crate) mod testing;

/// Captured result of one finished process.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput>;
}

/// Runs real processes and blocks until they exit.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
        let output = Command::new(program).args(args).output()?;
        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Structured access to the available builds of a package.
pub trait PackageQuery {
    fn query_available(&self, name: &str) -> Result<Vec<BuildDescriptor>, LookupError>;

    /// Narrow `builds` down to the newest ones, when the backend can do that itself.
    fn select_latest(&self, _builds: &[BuildDescriptor]) -> Option<Vec<BuildDescriptor>> {
        None
    }
}

/// Free-text, multi-record package report (`Source : ...`, `License : ...`).
pub trait InfoReportQuery {
    fn query_info(&self, name: &str) -> Result<String, LookupError>;
}

/// Run `program args...` for `package`, mapping process failures onto [`LookupError`].
pub(crate) fn run_query(
    runner: &dyn CommandRunner,
    program: &str,
    args: &[String],
    package: &str,
) -> Result<String, LookupError> {
    let output = runner.run(program, args).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LookupError::ToolMissing(program.to_string()),
        _ => LookupError::Unexpected {
            package: package.to_string(),
            reason: e.to_string(),
        },
    })?;

    if !output.success {
        return Err(LookupError::QueryFailed {
            package: package.to_string(),
            stderr: output.stderr,
        });
    }

    Ok(output.stdout)
}
