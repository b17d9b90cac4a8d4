use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::*;

use ordlight_primitives::Checkpoint;

use crate::errors::FetchError;
use crate::provider::CheckpointProvider;

/// Fans out to every provider concurrently and keeps the responses that
/// match the target hash. All requests start together and share the same
/// deadline, so a slow provider is indistinguishable from an absent one.
///
/// Individual provider failures never fail the fetch; the round only fails
/// when fewer than `min_checkpoints` usable responses survive. The output
/// order carries no relationship to the provider order.
pub async fn get_checkpoints(
    providers: &[Arc<dyn CheckpointProvider>],
    height: u64,
    hash: &str,
    timeout: Duration,
    min_checkpoints: usize,
) -> Result<Vec<Checkpoint>, FetchError> {
    let fetches = providers
        .iter()
        .map(|p| async move {
            match tokio::time::timeout(timeout, p.get_checkpoint(height, hash)).await {
                Ok(Ok(ck)) => Some((p.name().to_owned(), ck)),
                Ok(Err(e)) => {
                    debug!(provider = %p.name(), err = %e, "checkpoint fetch failed");
                    None
                }
                Err(_) => {
                    debug!(provider = %p.name(), "checkpoint fetch timed out");
                    None
                }
            }
        })
        .collect::<Vec<_>>();

    let checkpoints: Vec<Checkpoint> = join_all(fetches)
        .await
        .into_iter()
        .flatten()
        .filter_map(|(provider, ck)| {
            if ck.hash == hash {
                Some(ck)
            } else {
                // The provider is lagging or on a different fork. Not
                // hostile, just unusable this round.
                debug!(%provider, theirs = %ck.hash, ours = %hash, "hash mismatch, dropping");
                None
            }
        })
        .collect();

    if checkpoints.len() < min_checkpoints {
        return Err(FetchError::InsufficientQuorum {
            got: checkpoints.len(),
            want: min_checkpoints,
        });
    }
    Ok(checkpoints)
}

/// True when the fetched set carries more than one distinct commitment.
pub fn inconsistent(checkpoints: &[Checkpoint]) -> bool {
    checkpoints
        .windows(2)
        .any(|w| w[0].commitment != w[1].commitment)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct FixedProvider {
        name: String,
        checkpoint: Option<Checkpoint>,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl CheckpointProvider for FixedProvider {
        async fn get_checkpoint(&self, _height: u64, _hash: &str) -> anyhow::Result<Checkpoint> {
            if let Some(d) = self.delay {
                tokio::time::sleep(d).await;
            }
            self.checkpoint
                .clone()
                .ok_or_else(|| anyhow::anyhow!("provider offline"))
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    fn checkpoint(name: &str, commitment: &str, hash: &str) -> Checkpoint {
        Checkpoint {
            commitment: commitment.to_owned(),
            hash: hash.to_owned(),
            height: "100".to_owned(),
            name: name.to_owned(),
            url: format!("http://{name}"),
        }
    }

    fn provider(name: &str, ck: Option<Checkpoint>, delay: Option<Duration>) -> Arc<dyn CheckpointProvider> {
        Arc::new(FixedProvider {
            name: name.to_owned(),
            checkpoint: ck,
            delay,
        })
    }

    #[tokio::test]
    async fn test_all_respond() {
        let providers = vec![
            provider("a", Some(checkpoint("a", "AAA=", "h100")), None),
            provider("b", Some(checkpoint("b", "AAA=", "h100")), None),
        ];
        let cps = get_checkpoints(&providers, 100, "h100", Duration::from_secs(1), 2)
            .await
            .unwrap();
        assert_eq!(cps.len(), 2);
        assert!(!inconsistent(&cps));
    }

    #[tokio::test]
    async fn test_errors_swallowed_until_quorum_breaks() {
        let providers = vec![
            provider("a", Some(checkpoint("a", "AAA=", "h100")), None),
            provider("b", None, None),
            provider("c", Some(checkpoint("c", "BBB=", "h100")), None),
        ];
        let cps = get_checkpoints(&providers, 100, "h100", Duration::from_secs(1), 2)
            .await
            .unwrap();
        assert_eq!(cps.len(), 2);
        assert!(inconsistent(&cps));

        let err = get_checkpoints(&providers, 100, "h100", Duration::from_secs(1), 3)
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::InsufficientQuorum { got: 2, want: 3 });
    }

    #[tokio::test]
    async fn test_wrong_hash_counts_as_absent() {
        let providers = vec![
            provider("a", Some(checkpoint("a", "AAA=", "h100")), None),
            provider("b", Some(checkpoint("b", "AAA=", "h100")), None),
            provider("c", Some(checkpoint("c", "AAA=", "h99")), None),
        ];
        let err = get_checkpoints(&providers, 100, "h100", Duration::from_secs(1), 3)
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::InsufficientQuorum { got: 2, want: 3 });
    }

    #[tokio::test]
    async fn test_slow_provider_dropped_by_deadline() {
        let providers = vec![
            provider("a", Some(checkpoint("a", "AAA=", "h100")), None),
            provider(
                "b",
                Some(checkpoint("b", "AAA=", "h100")),
                Some(Duration::from_secs(5)),
            ),
        ];
        let cps = get_checkpoints(&providers, 100, "h100", Duration::from_millis(50), 1)
            .await
            .unwrap();
        assert_eq!(cps.len(), 1);
        assert_eq!(cps[0].name, "a");
    }
}
