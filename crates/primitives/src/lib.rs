//! Core data types shared across the light client crates.

pub mod buf;
pub mod checkpoint;
pub mod errors;
pub mod inscription;
pub mod proof;

pub use buf::Buf32;
pub use checkpoint::Checkpoint;
pub use errors::ParseError;
pub use inscription::{InscriptionId, SatPoint};
pub use proof::{
    LatestStateProofResponse, OrdTransfer, OrdTransferRecord, StateProof, UpdateWitness,
};
