//! Verifiable key-value commitment over the indexed inscription state.
//!
//! Providers commit to the full inscription location map with a sparse
//! Merkle root. A state proof carries, per transfer, the sibling path that
//! lets a verifier re-derive the post-state root from a trusted pre-state
//! root without holding the state itself.

pub mod backend;
pub mod errors;
pub mod root;
pub mod smt;

pub use backend::ProofBackend;
pub use errors::CommitError;
pub use root::{StateNode, StateRoot};
pub use smt::{Sha256Smt, StateTree};
