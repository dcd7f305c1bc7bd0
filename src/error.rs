use std::path::PathBuf;

/// Failures that abort the whole run or the final write.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("The file '{}' was not found.", .0.display())]
    TableNotFound(PathBuf),

    #[error("Error reading CSV file '{}': {reason}", .path.display())]
    TableParse { path: PathBuf, reason: String },

    #[error("Error initializing dnf: {0}")]
    RepositoryInit(String),

    #[error("Error saving updated CSV to '{}': {reason}", .path.display())]
    OutputWrite { path: PathBuf, reason: String },
}

/// Failures local to one package lookup. The row gets [`LookupError::marker`].
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("command failed for package '{package}': {stderr}")]
    QueryFailed { package: String, stderr: String },

    #[error("'{0}' command not found")]
    ToolMissing(String),

    #[error("no available builds for package '{0}'")]
    NoCandidatesFound(String),

    #[error("an unexpected error occurred for package '{package}': {reason}")]
    Unexpected { package: String, reason: String },
}

impl LookupError {
    /// The string written into the License column for this failure.
    pub fn marker(&self) -> &'static str {
        match self {
            LookupError::QueryFailed { .. } => "Error: Command Failed",
            LookupError::ToolMissing(_) => "Error: dnf not found",
            LookupError::NoCandidatesFound(_) => crate::models::UNKNOWN_LICENSE,
            LookupError::Unexpected { .. } => "Error: Unexpected",
        }
    }
}
