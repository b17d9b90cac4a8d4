use serde::Deserialize;

/// `getblock` at verbosity 1: header fields plus txids.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcBlock {
    pub hash: String,
    pub height: u64,
    pub tx: Vec<String>,
}

/// `getrawtransaction` verbose, trimmed to what the transfer check needs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcRawTransaction {
    pub txid: String,
    pub vout: Vec<RpcVout>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcVout {
    pub n: u32,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: RpcScriptPubKey,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcScriptPubKey {
    pub hex: String,
}
