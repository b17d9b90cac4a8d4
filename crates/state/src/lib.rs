//! The reconciliation core: fetch checkpoints from the committee, detect
//! divergence, replay state proofs to pick a champion, and adopt it.

pub mod errors;
pub mod reconciler;
pub mod status;
pub mod traits;

mod verifier;

pub use errors::StateError;
pub use reconciler::{ReconcileOptions, ReconcilerState};
pub use status::Status;
pub use traits::{StateProofSource, TransferVerifier};
