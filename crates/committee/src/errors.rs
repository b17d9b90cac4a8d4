use thiserror::Error;

/// Errors talking to a committee indexer endpoint.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network error, retry might help.
    #[error("network: {0}")]
    Network(String),

    /// HTTP status error, not retryable.
    #[error("failure status: {0}")]
    Status(String),

    #[error("error parsing response: {0}")]
    Parse(String),

    /// Error building the client, unlikely to be recoverable.
    #[error("could not build client: {0}")]
    Builder(String),

    #[error("max retries {0} exceeded")]
    MaxRetriesExceeded(u8),
}
