use ordlight_checkpoints::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("fetch: {0}")]
    Fetch(#[from] FetchError),

    #[error("all checkpoints failed verification")]
    AllVerifyFailed,
}
