use crate::error::LookupError;

use super::{run_query, CommandRunner, InfoReportQuery};

/// `dnf repoquery --info <name>`, returned as raw text.
///
/// No session is involved: every call lets dnf load its metadata on its own.
pub struct DnfInfoQuery {
    dnf: String,
    runner: Box<dyn CommandRunner>,
}

impl DnfInfoQuery {
    pub fn new(dnf: &str, runner: Box<dyn CommandRunner>) -> Self {
        Self {
            dnf: dnf.to_string(),
            runner,
        }
    }
}

impl InfoReportQuery for DnfInfoQuery {
    fn query_info(&self, name: &str) -> Result<String, LookupError> {
        let args = vec!["repoquery".to_string(), "--info".to_string(), name.to_string()];
        run_query(self.runner.as_ref(), &self.dnf, &args, name)
    }
}
