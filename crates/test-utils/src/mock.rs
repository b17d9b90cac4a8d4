//! Canned collaborator implementations for reconciler tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use ordlight_checkpoints::CheckpointProvider;
use ordlight_primitives::{Checkpoint, LatestStateProofResponse, OrdTransfer};
use ordlight_state::{StateProofSource, TransferVerifier};

/// A provider that always answers with the same checkpoint, optionally
/// slowly, or not at all.
pub struct MockProvider {
    name: String,
    response: Option<Checkpoint>,
    delay: Option<Duration>,
}

impl MockProvider {
    pub fn new(name: &str, response: Option<Checkpoint>) -> Self {
        Self {
            name: name.to_owned(),
            response,
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl CheckpointProvider for MockProvider {
    async fn get_checkpoint(&self, _height: u64, _hash: &str) -> anyhow::Result<Checkpoint> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response
            .clone()
            .ok_or_else(|| anyhow::anyhow!("provider offline"))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Serves canned state-proof responses keyed by provider url and counts
/// how often it was asked.
#[derive(Default)]
pub struct MockProofSource {
    responses: Mutex<HashMap<String, LatestStateProofResponse>>,
    calls: AtomicUsize,
}

impl MockProofSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, url: &str, response: LatestStateProofResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_owned(), response);
    }

    /// Number of proof requests served or refused so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Acquire)
    }
}

#[async_trait]
impl StateProofSource for MockProofSource {
    async fn latest_state_proof(
        &self,
        _name: &str,
        url: &str,
    ) -> anyhow::Result<LatestStateProofResponse> {
        self.calls.fetch_add(1, Ordering::AcqRel);
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no proof endpoint at {url}"))
    }
}

/// Bitcoin-layer check that always answers the same way.
#[derive(Default)]
pub struct MockTransferVerifier {
    reject: bool,
    calls: AtomicUsize,
}

impl MockTransferVerifier {
    pub fn accepting() -> Self {
        Self::default()
    }

    pub fn rejecting() -> Self {
        Self {
            reject: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Acquire)
    }
}

#[async_trait]
impl TransferVerifier for MockTransferVerifier {
    async fn verify_transfers(
        &self,
        _transfers: &[OrdTransfer],
        _height: u64,
    ) -> anyhow::Result<bool> {
        self.calls.fetch_add(1, Ordering::AcqRel);
        Ok(!self.reject)
    }
}
