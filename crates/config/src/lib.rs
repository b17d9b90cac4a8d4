mod config;

pub use config::{
    BitcoindConfig, BootstrapConfig, ClientConfig, Config, ProviderConfig, ReconcileConfig,
};
