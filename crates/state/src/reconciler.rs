use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::*;

use ordlight_checkpoints::{get_checkpoints, inconsistent, CheckpointProvider, DenyList};
use ordlight_commitment::ProofBackend;
use ordlight_primitives::Checkpoint;

use crate::errors::StateError;
use crate::status::{Status, StatusCell};
use crate::traits::{StateProofSource, TransferVerifier};
use crate::verifier::verify_commitments;

/// Tunables for a reconciliation round.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Minimum number of usable checkpoints required per round.
    pub min_checkpoints: usize,
    /// Shared deadline for the provider fan-out.
    pub fetch_timeout: Duration,
    /// Deadline for each committee state-proof request.
    pub verify_timeout: Duration,
    /// Deny list location; empty disables denying.
    pub deny_list_path: String,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            min_checkpoints: 2,
            fetch_timeout: Duration::from_secs(10),
            verify_timeout: Duration::from_secs(30),
            deny_list_path: String::new(),
        }
    }
}

/// Checkpoints the process trusts right now.
#[derive(Debug)]
struct StateInner {
    /// The consistent checkpoint at the current height minus one.
    last_checkpoint: Checkpoint,
    /// The checkpoints fetched at the current height. Exactly one element
    /// after a verified round.
    current_checkpoints: Vec<Checkpoint>,
}

/// Process-wide reconciliation state. Rounds are serialized by holding the
/// write lock for the whole of `advance`, I/O included; readers take the
/// read lock, and the phase rides in an atomic next to it.
pub struct ReconcilerState {
    status: StatusCell,
    inner: RwLock<StateInner>,
    providers: Vec<Arc<dyn CheckpointProvider>>,
    proof_source: Arc<dyn StateProofSource>,
    transfer_verifier: Arc<dyn TransferVerifier>,
    backend: Arc<dyn ProofBackend>,
    deny_list: Option<DenyList>,
    options: ReconcileOptions,
}

impl ReconcilerState {
    /// Builds the state around a trusted bootstrap checkpoint. The
    /// bootstrap seeds both slots so the adoption shift is well defined on
    /// the very first round.
    pub fn new(
        options: ReconcileOptions,
        providers: Vec<Arc<dyn CheckpointProvider>>,
        proof_source: Arc<dyn StateProofSource>,
        transfer_verifier: Arc<dyn TransferVerifier>,
        backend: Arc<dyn ProofBackend>,
        bootstrap: Checkpoint,
    ) -> Self {
        let deny_list = DenyList::new(&options.deny_list_path);
        Self {
            status: StatusCell::new(Status::Active),
            inner: RwLock::new(StateInner {
                last_checkpoint: bootstrap.clone(),
                current_checkpoints: vec![bootstrap],
            }),
            providers,
            proof_source,
            transfer_verifier,
            backend,
            deny_list,
            options,
        }
    }

    /// Runs one reconciliation round at the given block. On success the
    /// previously current checkpoint becomes the last one and the fetched
    /// (or reconstructed) set becomes current. On failure nothing moves.
    pub async fn advance(&self, height: u64, hash: &str) -> Result<(), StateError> {
        let mut inner = self.inner.write().await;
        self.status.store(Status::Syncing);
        let result = self.run_round(&mut inner, height, hash).await;
        self.status.store(Status::Active);
        result
    }

    async fn run_round(
        &self,
        inner: &mut StateInner,
        height: u64,
        hash: &str,
    ) -> Result<(), StateError> {
        let checkpoints = get_checkpoints(
            &self.providers,
            height,
            hash,
            self.options.fetch_timeout,
            self.options.min_checkpoints,
        )
        .await?;

        if !inconsistent(&checkpoints) {
            inner.last_checkpoint = inner.current_checkpoints[0].clone();
            inner.current_checkpoints = checkpoints;
            info!(commitment = %inner.current_checkpoints[0].commitment, %height, %hash,
                "checkpoints consistent");
            return Ok(());
        }

        self.status.store(Status::Verifying);
        warn!(%height, %hash, "inconsistent checkpoints, starting verification and reconstruction");

        // One representative per distinct commitment; the first provider
        // seen with it answers for it.
        let mut representatives: Vec<Checkpoint> = Vec::new();
        for ck in &checkpoints {
            if !representatives.iter().any(|r| r.commitment == ck.commitment) {
                representatives.push(ck.clone());
            }
        }

        let verified = verify_commitments(
            &representatives,
            height,
            &inner.last_checkpoint,
            self.proof_source.as_ref(),
            self.transfer_verifier.as_ref(),
            self.backend.as_ref(),
            self.options.verify_timeout,
        )
        .await;
        if verified.is_empty() {
            return Err(StateError::AllVerifyFailed);
        }

        // The champion carries the most transfers; ties keep the first
        // verified one since only a strictly greater count displaces it.
        let mut champion = 0;
        let mut max_transfers = verified[0].transfer_count;
        for (i, commit) in verified.iter().enumerate().skip(1) {
            if commit.transfer_count > max_transfers {
                max_transfers = commit.transfer_count;
                champion = i;
            }
        }
        let trusted = verified[champion].commitment.clone();
        let champion_ck = representatives
            .iter()
            .find(|r| r.commitment == trusted)
            .cloned()
            .expect("verified commitment came from a representative");

        inner.last_checkpoint = inner.current_checkpoints[0].clone();
        inner.current_checkpoints = vec![champion_ck.clone()];

        // Deny every provider whose commitment lost, best effort. The
        // round has already adopted; a write failure only costs us the
        // record.
        if let Some(deny_list) = &self.deny_list {
            for ck in &checkpoints {
                if ck.commitment != trusted {
                    if let Err(e) = deny_list.record(height, &champion_ck, ck) {
                        warn!(rejected = %ck.name, err = %e, "deny list write failed");
                    }
                }
            }
        }

        info!(commitment = %trusted, %height, %hash,
            "checkpoints verified and reconstructed");
        Ok(())
    }

    /// The adopted checkpoint at the current height minus one.
    pub async fn last_checkpoint(&self) -> Checkpoint {
        self.inner.read().await.last_checkpoint.clone()
    }

    /// The full current checkpoint set.
    pub async fn current_checkpoints(&self) -> Vec<Checkpoint> {
        self.inner.read().await.current_checkpoints.clone()
    }

    /// The currently active checkpoint.
    pub async fn current_first_checkpoint(&self) -> Checkpoint {
        self.inner.read().await.current_checkpoints[0].clone()
    }

    /// Height of the currently active checkpoint, 0 when it does not
    /// parse.
    pub async fn current_height(&self) -> u64 {
        let ck = self.current_first_checkpoint().await;
        match ck.height() {
            Ok(height) => height,
            Err(e) => {
                error!(err = %e, "parse checkpoint height failed");
                0
            }
        }
    }

    /// Samples the phase without contending on the state lock.
    pub fn status(&self) -> Status {
        self.status.load()
    }
}
