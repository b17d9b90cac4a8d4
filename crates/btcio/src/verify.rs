//! On-chain cross-check for claimed ordinal transfers: every event in a
//! state proof has to be witnessed by the block it claims to happen in.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use bitcoin::Txid;
use tracing::*;

use ordlight_primitives::{InscriptionId, OrdTransfer, SatPoint};
use ordlight_state::TransferVerifier;

use crate::rpc::error::{ClientError, ClientResult};
use crate::rpc::traits::ReaderRpc;

// getrawtransaction for an unknown txid.
const RPC_INVALID_ADDRESS_OR_KEY: i32 = -5;

/// Checks a proof's transfers against the chain at `height`.
///
/// `Ok(false)` means the transfers are not what the chain says happened;
/// `Err` is reserved for transport trouble, which must not count against
/// the provider.
pub async fn verify_ord_transfers(
    client: &impl ReaderRpc,
    transfers: &[OrdTransfer],
    height: u64,
) -> ClientResult<bool> {
    // Proof ids are issued in order; a shuffled or duplicated list was not
    // produced by an indexer walking the block.
    for pair in transfers.windows(2) {
        if pair[1].id <= pair[0].id {
            warn!(%height, "transfer ids out of order");
            return Ok(false);
        }
    }
    if transfers.is_empty() {
        return Ok(true);
    }

    let block_hash = client.get_block_hash(height).await?;
    let block = client.get_block(&block_hash).await?;
    let block_txids: HashSet<&str> = block.tx.iter().map(String::as_str).collect();

    let mut ordered: Vec<&OrdTransfer> = transfers.iter().collect();
    ordered.sort_by(|a, b| a.new_satpoint.cmp(&b.new_satpoint));

    for transfer in ordered {
        let Ok(inscription) = transfer.inscription_id.parse::<InscriptionId>() else {
            warn!(id = %transfer.inscription_id, "unparsable inscription id");
            return Ok(false);
        };
        if Txid::from_str(&inscription.txid).is_err() {
            warn!(id = %transfer.inscription_id, "inscription txid is not a txid");
            return Ok(false);
        }

        if transfer.old_satpoint.is_empty() {
            // Fresh inscription: its reveal transaction must be in this
            // very block.
            if !block_txids.contains(inscription.txid.as_str()) {
                warn!(id = %transfer.inscription_id, %height, "reveal tx not in block");
                return Ok(false);
            }
        } else if transfer.old_satpoint.parse::<SatPoint>().is_err() {
            warn!(satpoint = %transfer.old_satpoint, "unparsable old satpoint");
            return Ok(false);
        }

        if transfer.sent_as_fee {
            // Burned into fees, there is no destination output to check.
            continue;
        }

        let Ok(new_satpoint) = transfer.new_satpoint.parse::<SatPoint>() else {
            warn!(satpoint = %transfer.new_satpoint, "unparsable new satpoint");
            return Ok(false);
        };
        let output = match client.get_output(&new_satpoint.txid, new_satpoint.vout).await {
            Ok(output) => output,
            Err(ClientError::Server(RPC_INVALID_ADDRESS_OR_KEY, _))
            | Err(ClientError::MissingOutput(..)) => {
                warn!(satpoint = %transfer.new_satpoint, "claimed destination does not exist");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };
        if !output
            .script_pub_key
            .hex
            .eq_ignore_ascii_case(&transfer.new_pkscript)
        {
            warn!(satpoint = %transfer.new_satpoint, "destination script mismatch");
            return Ok(false);
        }
    }

    Ok(true)
}

/// [`TransferVerifier`] backed by a bitcoind reader.
#[derive(Debug)]
pub struct OrdinalsVerifier<C> {
    client: Arc<C>,
}

impl<C> OrdinalsVerifier<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: ReaderRpc> TransferVerifier for OrdinalsVerifier<C> {
    async fn verify_transfers(
        &self,
        transfers: &[OrdTransfer],
        height: u64,
    ) -> anyhow::Result<bool> {
        Ok(verify_ord_transfers(self.client.as_ref(), transfers, height).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestBitcoinClient;

    const TXID_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const TXID_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn transfer(id: u64, inscription_txid: &str, new_satpoint: &str, script: &str) -> OrdTransfer {
        OrdTransfer {
            id,
            inscription_id: format!("{inscription_txid}i0"),
            old_satpoint: String::new(),
            new_satpoint: new_satpoint.to_owned(),
            new_pkscript: script.to_owned(),
            new_wallet: "bc1qexample".to_owned(),
            sent_as_fee: false,
            content: b"ordinal".to_vec(),
            content_type: "text/plain".to_owned(),
        }
    }

    fn client_with(outputs: &[(&str, u32, &str)], txids: &[&str]) -> TestBitcoinClient {
        let mut client = TestBitcoinClient::new(100, txids.iter().map(|t| t.to_string()).collect());
        for (txid, vout, script) in outputs {
            client.add_output(txid, *vout, script);
        }
        client
    }

    #[tokio::test]
    async fn test_valid_transfer_passes() {
        let client = client_with(&[(TXID_A, 0, "0014aabb")], &[TXID_A]);
        let transfers = vec![transfer(1, TXID_A, &format!("{TXID_A}:0:0"), "0014aabb")];
        assert!(verify_ord_transfers(&client, &transfers, 100).await.unwrap());
    }

    #[tokio::test]
    async fn test_script_mismatch_fails() {
        let client = client_with(&[(TXID_A, 0, "0014ffff")], &[TXID_A]);
        let transfers = vec![transfer(1, TXID_A, &format!("{TXID_A}:0:0"), "0014aabb")];
        assert!(!verify_ord_transfers(&client, &transfers, 100).await.unwrap());
    }

    #[tokio::test]
    async fn test_fresh_inscription_must_be_in_block() {
        // Reveal txid B is not among the block's transactions.
        let client = client_with(&[(TXID_A, 0, "0014aabb")], &[TXID_A]);
        let transfers = vec![transfer(1, TXID_B, &format!("{TXID_A}:0:0"), "0014aabb")];
        assert!(!verify_ord_transfers(&client, &transfers, 100).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_destination_fails() {
        let client = client_with(&[], &[TXID_A]);
        let transfers = vec![transfer(1, TXID_A, &format!("{TXID_A}:0:0"), "0014aabb")];
        assert!(!verify_ord_transfers(&client, &transfers, 100).await.unwrap());
    }

    #[tokio::test]
    async fn test_fee_burn_skips_output_check() {
        let client = client_with(&[], &[TXID_A]);
        let mut burned = transfer(1, TXID_A, &format!("{TXID_A}:0:0"), "0014aabb");
        burned.sent_as_fee = true;
        assert!(verify_ord_transfers(&client, &[burned], 100).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_ids_fail() {
        let client = client_with(&[(TXID_A, 0, "0014aabb")], &[TXID_A]);
        let transfers = vec![
            transfer(2, TXID_A, &format!("{TXID_A}:0:0"), "0014aabb"),
            transfer(2, TXID_A, &format!("{TXID_A}:0:1"), "0014aabb"),
        ];
        assert!(!verify_ord_transfers(&client, &transfers, 100).await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_proof_is_fine() {
        let client = client_with(&[], &[]);
        assert!(verify_ord_transfers(&client, &[], 100).await.unwrap());
    }

    #[tokio::test]
    async fn test_moved_inscription_checks_old_satpoint_form() {
        let client = client_with(&[(TXID_A, 0, "0014aabb")], &[]);
        let mut moved = transfer(1, TXID_A, &format!("{TXID_A}:0:0"), "0014aabb");
        moved.old_satpoint = format!("{TXID_B}:1:0");
        assert!(verify_ord_transfers(&client, &[moved.clone()], 100).await.unwrap());

        moved.old_satpoint = "garbage".to_owned();
        assert!(!verify_ord_transfers(&client, &[moved], 100).await.unwrap());
    }
}
