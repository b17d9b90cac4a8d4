use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bitcoin::BlockHash;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::json;
use tracing::*;

use crate::rpc::error::{BitcoinRpcError, ClientError, ClientResult};
use crate::rpc::traits::ReaderRpc;
use crate::rpc::types::{RpcBlock, RpcRawTransaction, RpcVout};

const MAX_RETRIES: u8 = 3;
const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// JSON-RPC response envelope, generic over the result type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Response<R> {
    result: Option<R>,
    error: Option<BitcoinRpcError>,
    id: u64,
}

/// A connection to a Bitcoin RPC node.
#[derive(Debug)]
pub struct BitcoinClient {
    url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl BitcoinClient {
    pub fn new(url: String, username: &str, password: &str) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            format!("Basic {}", base64::encode(format!("{username}:{password}")))
                .parse()
                .map_err(|_| ClientError::Builder("bad auth header".to_owned()))?,
        );
        headers.insert(
            "Content-Type",
            "application/json"
                .parse()
                .map_err(|_| ClientError::Builder("bad content type header".to_owned()))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Builder(e.to_string()))?;

        Ok(Self {
            url,
            client,
            next_id: AtomicU64::new(0),
        })
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::AcqRel)
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: &[serde_json::Value],
    ) -> ClientResult<T> {
        let mut retries = 0;
        loop {
            let id = self.next_id();
            let response = self
                .client
                .post(&self.url)
                .json(&json!({
                    "jsonrpc": "1.0",
                    "id": id,
                    "method": method,
                    "params": params
                }))
                .send()
                .await;

            match response {
                Ok(resp) => {
                    let data = resp
                        .json::<Response<T>>()
                        .await
                        .map_err(|e| ClientError::Parse(e.to_string()))?;
                    if let Some(err) = data.error {
                        return Err(err.into());
                    }
                    return data.result.ok_or_else(|| {
                        ClientError::MalformedResponse(format!("{method}: empty result"))
                    });
                }
                Err(e) => {
                    retries += 1;
                    if retries >= MAX_RETRIES {
                        return Err(ClientError::MaxRetriesExceeded(MAX_RETRIES));
                    }
                    warn!(%method, err = %e, "bitcoind request failed, retrying");
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
            }
        }
    }
}

#[async_trait]
impl ReaderRpc for BitcoinClient {
    async fn get_block_count(&self) -> ClientResult<u64> {
        self.call("getblockcount", &[]).await
    }

    async fn get_block_hash(&self, height: u64) -> ClientResult<String> {
        let hash: String = self.call("getblockhash", &[json!(height)]).await?;
        // Round-trip through the typed hash so a misbehaving node cannot
        // feed us a non-hash.
        let hash = BlockHash::from_str(&hash).map_err(|e| ClientError::Parse(e.to_string()))?;
        Ok(hash.to_string())
    }

    async fn get_block(&self, hash: &str) -> ClientResult<RpcBlock> {
        self.call("getblock", &[json!(hash), json!(1)]).await
    }

    async fn get_output(&self, txid: &str, vout: u32) -> ClientResult<RpcVout> {
        let tx: RpcRawTransaction = self
            .call("getrawtransaction", &[json!(txid), json!(true)])
            .await?;
        tx.vout
            .into_iter()
            .find(|v| v.n == vout)
            .ok_or_else(|| ClientError::MissingOutput(txid.to_owned(), vout))
    }
}
