//! Error types for the RPC client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Network error, retry might help.
    #[error("network: {0}")]
    Network(String),

    /// RPC server returned an error.
    ///
    /// # Note
    ///
    /// These errors are ABSOLUTELY UNDOCUMENTED.
    /// Check
    /// <https://github.com/bitcoin/bitcoin/blob/96b0a8f858ab24f3672360b8c830553b963de726/src/rpc/protocol.h#L24>
    /// and good luck!
    #[error("RPC server returned error '{1}' (code {0})")]
    Server(i32, String),

    #[error("error parsing rpc response: {0}")]
    Parse(String),

    /// Error decoding the response, retry might not help.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Error building the client, unlikely to be recoverable.
    #[error("could not build client: {0}")]
    Builder(String),

    /// Maximum retries exceeded, not retryable.
    #[error("max retries {0} exceeded")]
    MaxRetriesExceeded(u8),

    /// A transaction exists but does not carry the requested output.
    #[error("transaction {0} has no output {1}")]
    MissingOutput(String, u32),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// `bitcoind` RPC server error payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitcoinRpcError {
    pub code: i32,
    pub message: String,
}

impl From<BitcoinRpcError> for ClientError {
    fn from(value: BitcoinRpcError) -> Self {
        Self::Server(value.code, value.message)
    }
}
