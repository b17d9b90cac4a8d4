//! Collaborator contracts the reconciler calls out to.

use async_trait::async_trait;

use ordlight_primitives::{LatestStateProofResponse, OrdTransfer};

/// Fetches the state proof a provider serves to justify its latest
/// checkpoint. Addressed by the provider's identity so one source can
/// route to any committee peer.
#[async_trait]
pub trait StateProofSource: Send + Sync + 'static {
    async fn latest_state_proof(
        &self,
        name: &str,
        url: &str,
    ) -> anyhow::Result<LatestStateProofResponse>;
}

/// Cross-checks that claimed transfers are witnessed on the Bitcoin chain
/// at a height.
#[async_trait]
pub trait TransferVerifier: Send + Sync + 'static {
    async fn verify_transfers(
        &self,
        transfers: &[OrdTransfer],
        height: u64,
    ) -> anyhow::Result<bool>;
}
