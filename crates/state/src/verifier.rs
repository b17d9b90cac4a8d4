//! The inconsistent-path algorithm: replay each distinct commitment's
//! state proof against the previously trusted root and keep the ones that
//! reproduce what the provider claimed.

use std::time::Duration;

use futures::future::join_all;
use tracing::*;

use ordlight_commitment::{ProofBackend, StateRoot};
use ordlight_primitives::proof::decode_transfers;
use ordlight_primitives::Checkpoint;

use crate::traits::{StateProofSource, TransferVerifier};

/// A commitment that survived verification, with the evidence weight used
/// for champion selection.
#[derive(Debug, Clone)]
pub(crate) struct VerifiedCommit {
    pub commitment: String,
    pub transfer_count: usize,
}

/// Verifies every representative concurrently. A representative's failure
/// taints only its own commitment; the caller decides what an empty result
/// means.
pub(crate) async fn verify_commitments(
    representatives: &[Checkpoint],
    height: u64,
    last: &Checkpoint,
    source: &dyn StateProofSource,
    transfer_verifier: &dyn TransferVerifier,
    backend: &dyn ProofBackend,
    verify_timeout: Duration,
) -> Vec<VerifiedCommit> {
    let checks = representatives
        .iter()
        .map(|rep| verify_one(rep, height, last, source, transfer_verifier, backend, verify_timeout))
        .collect::<Vec<_>>();
    join_all(checks).await.into_iter().flatten().collect()
}

async fn verify_one(
    rep: &Checkpoint,
    height: u64,
    last: &Checkpoint,
    source: &dyn StateProofSource,
    transfer_verifier: &dyn TransferVerifier,
    backend: &dyn ProofBackend,
    verify_timeout: Duration,
) -> Option<VerifiedCommit> {
    let response = match tokio::time::timeout(
        verify_timeout,
        source.latest_state_proof(&rep.name, &rep.url),
    )
    .await
    {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            error!(commit = %rep.commitment, name = %rep.name, url = %rep.url, err = %e,
                "failed to get latest state proof");
            return None;
        }
        Err(_) => {
            error!(commit = %rep.commitment, name = %rep.name, url = %rep.url,
                "state proof request timed out");
            return None;
        }
    };

    if let Some(msg) = response.error {
        error!(commit = %rep.commitment, name = %rep.name, url = %rep.url, err = %msg,
            "latest state proof carried an error");
        return None;
    }
    let Some(proof) = response.result else {
        error!(commit = %rep.commitment, name = %rep.name, url = %rep.url,
            "latest state proof response was empty");
        return None;
    };

    let transfers = match decode_transfers(&proof.transfers) {
        Ok(transfers) => transfers,
        Err(e) => {
            error!(commit = %rep.commitment, name = %rep.name, url = %rep.url, err = %e,
                "invalid ordinals transfer content");
            return None;
        }
    };

    match transfer_verifier.verify_transfers(&transfers, height).await {
        Ok(true) => {}
        Ok(false) => {
            error!(commit = %rep.commitment, name = %rep.name,
                "ordinals transfers rejected by the bitcoin layer");
            return None;
        }
        Err(e) => {
            error!(commit = %rep.commitment, name = %rep.name, err = %e,
                "ordinals transfers verification error");
            return None;
        }
    }

    let pre = match StateRoot::from_base64(&last.commitment) {
        Ok(pre) => pre,
        Err(e) => {
            error!(commit = %rep.commitment, err = %e, "trusted pre-state root failed to decode");
            return None;
        }
    };

    let node = match backend.generate_post_root(&pre, height, &proof) {
        Ok(Some(node)) => node,
        Ok(None) => {
            warn!(commit = %rep.commitment, name = %rep.name,
                "state proof does not cohere with the trusted pre-state root");
            return None;
        }
        Err(e) => {
            error!(commit = %rep.commitment, name = %rep.name, err = %e, "generate post root error");
            return None;
        }
    };

    let computed = node.commit().to_base64();
    if computed != rep.commitment {
        warn!(%computed, claimed = %rep.commitment, name = %rep.name,
            "replayed root does not match the claimed commitment");
        return None;
    }

    Some(VerifiedCommit {
        commitment: rep.commitment.clone(),
        transfer_count: transfers.len(),
    })
}
