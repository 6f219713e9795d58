use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy shared by every lingua crate.
///
/// Collaborator causes are kept as `anyhow::Error` so the originating
/// database, HTTP or filesystem error survives for the operator.
#[derive(Debug, Error)]
pub enum Error {
    #[error("storage failure during {operation}: {cause:#}")]
    Storage {
        operation: &'static str,
        cause: anyhow::Error,
    },

    #[error("export failure during {operation}: {cause:#}")]
    Export {
        operation: &'static str,
        cause: anyhow::Error,
    },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{capability} failed: {cause:#}")]
    ExternalCapability {
        capability: &'static str,
        cause: anyhow::Error,
    },
}

impl Error {
    pub fn storage(operation: &'static str, cause: impl Into<anyhow::Error>) -> Self {
        Self::Storage {
            operation,
            cause: cause.into(),
        }
    }

    pub fn export(operation: &'static str, cause: impl Into<anyhow::Error>) -> Self {
        Self::Export {
            operation,
            cause: cause.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn external(capability: &'static str, cause: impl Into<anyhow::Error>) -> Self {
        Self::ExternalCapability {
            capability,
            cause: cause.into(),
        }
    }

    /// Only configuration problems end the process; everything else leaves
    /// the session usable.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
