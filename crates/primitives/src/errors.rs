use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("inscription id missing separator: {0}")]
    MalformedInscriptionId(String),

    #[error("malformed satpoint: {0}")]
    MalformedSatpoint(String),

    #[error("malformed height: {0}")]
    MalformedHeight(String),

    #[error("base64: {0}")]
    Base64(#[from] base64::DecodeError),
}
