//! HTTP transport for committee indexer peers.

pub mod client;
pub mod errors;

pub use client::{CommitteeClient, CommitteeProofSource};
pub use errors::ClientError;
