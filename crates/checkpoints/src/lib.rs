//! Checkpoint acquisition: the provider capability trait, the concurrent
//! fetch fan-out, and the deny list for providers caught attesting to a
//! losing commitment.

pub mod denylist;
pub mod errors;
pub mod fetch;
pub mod provider;

pub use denylist::{DenyList, DenyRecord};
pub use errors::FetchError;
pub use fetch::{get_checkpoints, inconsistent};
pub use provider::CheckpointProvider;
