use serde::{Deserialize, Serialize};

use ordlight_primitives::Checkpoint;

const DEFAULT_POLL_DUR_MS: u64 = 10_000;
const DEFAULT_MIN_CHECKPOINTS: usize = 2;
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_VERIFY_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// How often to poll bitcoind for a new tip.
    #[serde(default = "default_poll_dur_ms")]
    pub poll_dur_ms: u64,
}

fn default_poll_dur_ms() -> u64 {
    DEFAULT_POLL_DUR_MS
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BitcoindConfig {
    pub rpc_url: String,
    pub rpc_user: String,
    pub rpc_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReconcileConfig {
    #[serde(default = "default_min_checkpoints")]
    pub minimal_checkpoints: usize,

    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    #[serde(default = "default_verify_timeout_ms")]
    pub verify_timeout_ms: u64,

    /// Deny list file; empty disables denying.
    #[serde(default)]
    pub deny_list_path: String,
}

fn default_min_checkpoints() -> usize {
    DEFAULT_MIN_CHECKPOINTS
}

fn default_fetch_timeout_ms() -> u64 {
    DEFAULT_FETCH_TIMEOUT_MS
}

fn default_verify_timeout_ms() -> u64 {
    DEFAULT_VERIFY_TIMEOUT_MS
}

/// A committee peer to poll for checkpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    pub name: String,
    pub url: String,
}

/// The checkpoint the client trusts on startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BootstrapConfig {
    pub commitment: String,
    pub hash: String,
    pub height: String,
    pub name: String,
    pub url: String,
}

impl BootstrapConfig {
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            commitment: self.commitment.clone(),
            hash: self.hash.clone(),
            height: self.height.clone(),
            name: self.name.clone(),
            url: self.url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub client: ClientConfig,
    pub bitcoind: BitcoindConfig,
    pub reconcile: ReconcileConfig,
    pub providers: Vec<ProviderConfig>,
    pub bootstrap: BootstrapConfig,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_config_load() {
        let config_string = r#"
            [client]
            poll_dur_ms = 5000

            [bitcoind]
            rpc_url = "http://localhost:8332"
            rpc_user = "ordlight"
            rpc_password = "ordlight"

            [reconcile]
            minimal_checkpoints = 3
            fetch_timeout_ms = 8000
            verify_timeout_ms = 20000
            deny_list_path = "/var/lib/ordlight/deny.jsonl"

            [[providers]]
            name = "alpha"
            url = "https://alpha.indexer.example"

            [[providers]]
            name = "beta"
            url = "https://beta.indexer.example"

            [bootstrap]
            commitment = "5kp9MFqILzHbB5bn5qZkBlm6hkR0D1N1AY1B65MnpSo="
            hash = "00000000000000000002b7e4f4f8d7c6a4c0b6d9b1a9a4e3a7c6f0e9d8c7b6a5"
            height = "839999"
            name = "alpha"
            url = "https://alpha.indexer.example"
        "#;

        let config = toml::from_str::<Config>(config_string);
        assert!(
            config.is_ok(),
            "should be able to load TOML config but got: {:?}",
            config.err()
        );
        let config = config.unwrap();
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.reconcile.minimal_checkpoints, 3);
        assert_eq!(config.bootstrap.checkpoint().height().unwrap(), 839999);
    }

    #[test]
    fn test_config_defaults() {
        let config_string = r#"
            [client]

            [bitcoind]
            rpc_url = "http://localhost:8332"
            rpc_user = "ordlight"
            rpc_password = "ordlight"

            [reconcile]

            [[providers]]
            name = "alpha"
            url = "https://alpha.indexer.example"

            [bootstrap]
            commitment = "AAA="
            hash = "h"
            height = "1"
            name = "alpha"
            url = "https://alpha.indexer.example"
        "#;

        let config = toml::from_str::<Config>(config_string).unwrap();
        assert_eq!(config.client.poll_dur_ms, 10_000);
        assert_eq!(config.reconcile.minimal_checkpoints, 2);
        assert!(config.reconcile.deny_list_path.is_empty());
    }
}
