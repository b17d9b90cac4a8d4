use async_trait::async_trait;

use ordlight_primitives::Checkpoint;

/// Anything that can be asked for its checkpoint at a block.
#[async_trait]
pub trait CheckpointProvider: Send + Sync + 'static {
    /// Fetches the provider's checkpoint for the given block. The returned
    /// checkpoint reports whatever the provider attested to; callers filter
    /// on the hash themselves.
    async fn get_checkpoint(&self, height: u64, hash: &str) -> anyhow::Result<Checkpoint>;

    /// Identity used in logs and deny records.
    fn name(&self) -> &str;
}
