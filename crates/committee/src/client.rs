use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::*;

use ordlight_checkpoints::CheckpointProvider;
use ordlight_primitives::{Checkpoint, LatestStateProofResponse};
use ordlight_state::StateProofSource;

use crate::errors::ClientError;

const MAX_RETRIES: u8 = 3;
const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// What a committee peer attests to; identity gets stamped on by the
/// client since peers do not report their own registration.
#[derive(Debug, Deserialize)]
struct CheckpointPayload {
    commitment: String,
    hash: String,
    height: String,
}

/// HTTP client for one committee indexer peer.
#[derive(Debug, Clone)]
pub struct CommitteeClient {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl CommitteeClient {
    pub fn new(name: &str, url: &str) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Builder(e.to_string()))?;
        Ok(Self {
            name: name.to_owned(),
            url: url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let mut retries = 0;
        loop {
            let response = self
                .client
                .get(format!("{}/{}", self.url, path))
                .query(query)
                .send()
                .await;
            match response {
                Ok(resp) => {
                    let status = resp.status();
                    if !status.is_success() {
                        return Err(ClientError::Status(status.to_string()));
                    }
                    return resp
                        .json::<T>()
                        .await
                        .map_err(|e| ClientError::Parse(e.to_string()));
                }
                Err(e) => {
                    retries += 1;
                    if retries >= MAX_RETRIES {
                        return Err(ClientError::MaxRetriesExceeded(MAX_RETRIES));
                    }
                    debug!(name = %self.name, err = %e, "committee request failed, retrying");
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
            }
        }
    }

    /// Fetches the peer's checkpoint for a block.
    pub async fn get_checkpoint(&self, height: u64, hash: &str) -> Result<Checkpoint, ClientError> {
        let payload: CheckpointPayload = self
            .get_json(
                "v1/checkpoint",
                &[("height", height.to_string()), ("hash", hash.to_owned())],
            )
            .await?;
        Ok(Checkpoint {
            commitment: payload.commitment,
            hash: payload.hash,
            height: payload.height,
            name: self.name.clone(),
            url: self.url.clone(),
        })
    }

    /// Fetches the proof for the peer's latest checkpoint transition.
    pub async fn latest_state_proof(&self) -> Result<LatestStateProofResponse, ClientError> {
        self.get_json("v1/latest_state_proof", &[]).await
    }
}

#[async_trait]
impl CheckpointProvider for CommitteeClient {
    async fn get_checkpoint(&self, height: u64, hash: &str) -> anyhow::Result<Checkpoint> {
        Ok(CommitteeClient::get_checkpoint(self, height, hash).await?)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Routes a state-proof request to whichever peer vouched for a
/// commitment. A fresh client per call, the peer set is small and the
/// inconsistent path rare.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitteeProofSource;

#[async_trait]
impl StateProofSource for CommitteeProofSource {
    async fn latest_state_proof(
        &self,
        name: &str,
        url: &str,
    ) -> anyhow::Result<LatestStateProofResponse> {
        let client = CommitteeClient::new(name, url)?;
        Ok(client.latest_state_proof().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_payload_shape() {
        let payload: CheckpointPayload = serde_json::from_str(
            r#"{"commitment":"AAA=","hash":"h100","height":"100"}"#,
        )
        .unwrap();
        assert_eq!(payload.height, "100");
    }

    #[test]
    fn test_state_proof_envelope_error_field() {
        let resp: LatestStateProofResponse =
            serde_json::from_str(r#"{"result":null,"error":"rebuilding"}"#).unwrap();
        assert!(resp.result.is_none());
        assert_eq!(resp.error.as_deref(), Some("rebuilding"));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = CommitteeClient::new("a", "http://peer/").unwrap();
        assert_eq!(client.url, "http://peer");
    }
}
