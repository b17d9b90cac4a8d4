use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("only {got} of required {want} checkpoints fetched")]
    InsufficientQuorum { got: usize, want: usize },
}
