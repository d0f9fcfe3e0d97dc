use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed caller-supplied configuration. Never clamped or corrected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A collaborator call (embedding provider, object store, vector index,
    /// extraction) failed. Carries the service name so callers can tell the
    /// failures apart. Not retried here; retry policy belongs to the caller.
    #[error("{service} call failed: {source}")]
    Dependency {
        service: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    pub fn dependency(service: &'static str, source: anyhow::Error) -> Self {
        Error::Dependency { service, source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
