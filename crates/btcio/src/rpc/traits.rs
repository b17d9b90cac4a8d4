use async_trait::async_trait;

use super::error::ClientResult;
use super::types::{RpcBlock, RpcVout};

#[async_trait]
pub trait ReaderRpc: Send + Sync + 'static {
    /// Corresponds to `getblockcount`.
    async fn get_block_count(&self) -> ClientResult<u64>;

    /// Corresponds to `getblockhash`.
    async fn get_block_hash(&self, height: u64) -> ClientResult<String>;

    /// Corresponds to `getblock` at verbosity 1.
    async fn get_block(&self, hash: &str) -> ClientResult<RpcBlock>;

    /// Looks up one output of a confirmed transaction.
    async fn get_output(&self, txid: &str, vout: u32) -> ClientResult<RpcVout>;
}
