use std::collections::HashMap;

use async_trait::async_trait;

use crate::rpc::error::{ClientError, ClientResult};
use crate::rpc::traits::ReaderRpc;
use crate::rpc::types::{RpcBlock, RpcScriptPubKey, RpcVout};

/// A test implementation of the Bitcoin reader: one canned block plus a
/// table of spendable outputs.
#[derive(Debug, Clone)]
pub struct TestBitcoinClient {
    /// Tip height, also the height of the canned block.
    pub height: u64,
    /// Txids confirmed in the canned block.
    pub block_txids: Vec<String>,
    outputs: HashMap<(String, u32), String>,
}

impl TestBitcoinClient {
    pub fn new(height: u64, block_txids: Vec<String>) -> Self {
        Self {
            height,
            block_txids,
            outputs: HashMap::new(),
        }
    }

    /// Registers an output that `get_output` will find.
    pub fn add_output(&mut self, txid: &str, vout: u32, script_hex: &str) {
        self.outputs
            .insert((txid.to_owned(), vout), script_hex.to_owned());
    }
}

#[async_trait]
impl ReaderRpc for TestBitcoinClient {
    async fn get_block_count(&self) -> ClientResult<u64> {
        Ok(self.height)
    }

    async fn get_block_hash(&self, height: u64) -> ClientResult<String> {
        Ok(format!("blockhash{height}"))
    }

    async fn get_block(&self, hash: &str) -> ClientResult<RpcBlock> {
        Ok(RpcBlock {
            hash: hash.to_owned(),
            height: self.height,
            tx: self.block_txids.clone(),
        })
    }

    async fn get_output(&self, txid: &str, vout: u32) -> ClientResult<RpcVout> {
        match self.outputs.get(&(txid.to_owned(), vout)) {
            Some(script_hex) => Ok(RpcVout {
                n: vout,
                script_pub_key: RpcScriptPubKey {
                    hex: script_hex.clone(),
                },
            }),
            None => Err(ClientError::MissingOutput(txid.to_owned(), vout)),
        }
    }
}
