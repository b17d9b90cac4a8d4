use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommitError {
    #[error("root not valid base64: {0}")]
    RootEncoding(#[from] base64::DecodeError),

    #[error("root must be 32 bytes, got {0}")]
    RootLength(usize),

    #[error("transfer decode: {0}")]
    Transfer(#[from] ordlight_primitives::ParseError),
}
