//! CLI-specific error types and exit code mapping

use strata_catalog::CatalogError;
use strata_core::error::StrataError;
use strata_source::SourceError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The document was produced but some catalogers failed.
    #[error("{failed} cataloger(s) failed: {names}")]
    PartialFailure {
        /// Number of failed catalogers.
        failed: usize,
        /// Comma-separated cataloger names.
        names: String,
    },

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from strata-core.
    #[error("{0}")]
    Core(#[from] StrataError),

    /// Source indexing error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Cataloging or schema error.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                  |
    /// |------|------------------------------------------|
    /// | 0    | Success                                  |
    /// | 1    | General / command error                  |
    /// | 2    | Configuration error                      |
    /// | 3    | Partial cataloging failure               |
    /// | 10   | IO error                                 |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Core(StrataError::Config(_)) => 2,
            Self::Catalog(CatalogError::Config { .. }) => 2,
            Self::Catalog(CatalogError::Source(SourceError::InvalidPattern { .. })) => 2,
            Self::Source(SourceError::InvalidPattern { .. }) => 2,
            Self::PartialFailure { .. } => 3,
            Self::Io(_) | Self::Core(StrataError::Io(_)) => 10,
            Self::Source(SourceError::Io { .. }) => 10,
            Self::Catalog(CatalogError::Io { .. }) => 10,
            Self::Catalog(CatalogError::Source(SourceError::Io { .. })) => 10,
            Self::JsonSerialize(_)
            | Self::Command(_)
            | Self::Core(_)
            | Self::Source(_)
            | Self::Catalog(_) => 1,
        }
    }
}
