//! State proof payloads as served by committee providers.

use arbitrary::Arbitrary;
use serde::{Deserialize, Serialize};

use crate::buf::Buf32;
use crate::errors::ParseError;

/// One inscription movement as it appears on the wire, content still
/// base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Arbitrary)]
pub struct OrdTransferRecord {
    pub id: u64,
    pub inscription_id: String,
    pub old_satpoint: String,
    pub new_satpoint: String,
    pub new_pkscript: String,
    pub new_wallet: String,
    pub sent_as_fee: bool,
    pub content: String,
    pub content_type: String,
}

impl OrdTransferRecord {
    /// Decodes the base64 content field into the typed form.
    pub fn decode(&self) -> Result<OrdTransfer, ParseError> {
        Ok(OrdTransfer {
            id: self.id,
            inscription_id: self.inscription_id.clone(),
            old_satpoint: self.old_satpoint.clone(),
            new_satpoint: self.new_satpoint.clone(),
            new_pkscript: self.new_pkscript.clone(),
            new_wallet: self.new_wallet.clone(),
            sent_as_fee: self.sent_as_fee,
            content: base64::decode(&self.content)?,
            content_type: self.content_type.clone(),
        })
    }
}

/// One inscription movement with raw content bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdTransfer {
    pub id: u64,
    pub inscription_id: String,
    pub old_satpoint: String,
    pub new_satpoint: String,
    pub new_pkscript: String,
    pub new_wallet: String,
    pub sent_as_fee: bool,
    pub content: Vec<u8>,
    pub content_type: String,
}

/// Decodes a whole proof's transfer list, preserving order.
pub fn decode_transfers(records: &[OrdTransferRecord]) -> Result<Vec<OrdTransfer>, ParseError> {
    records.iter().map(|r| r.decode()).collect()
}

/// Witness for one key update: the leaf being replaced and the sibling path
/// from leaf level up to the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateWitness {
    /// Leaf hash currently at the key, absent when the key is empty.
    pub old_leaf: Option<Buf32>,
    /// Sibling hashes, leaf-adjacent first.
    pub siblings: Vec<Buf32>,
}

/// The witness a provider serves to justify its transition from the
/// previous trusted root to the root it published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateProof {
    /// Transfer events applied at the target height, in proof order.
    pub transfers: Vec<OrdTransferRecord>,
    /// Per-update witnesses, aligned with the transfers sorted by
    /// `new_satpoint`.
    pub witness: Vec<UpdateWitness>,
}

/// Committee RPC envelope for the latest state proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestStateProofResponse {
    pub result: Option<StateProof>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(content: &str) -> OrdTransferRecord {
        OrdTransferRecord {
            id: 1,
            inscription_id: "abcdi0".into(),
            old_satpoint: String::new(),
            new_satpoint: "abcd:0:0".into(),
            new_pkscript: "0014".into(),
            new_wallet: "bc1q".into(),
            sent_as_fee: false,
            content: content.into(),
            content_type: "text/plain".into(),
        }
    }

    #[test]
    fn test_decode_content() {
        let t = record("aGVsbG8=").decode().unwrap();
        assert_eq!(t.content, b"hello");
    }

    #[test]
    fn test_decode_bad_base64() {
        assert!(record("!!!").decode().is_err());
    }

    #[test]
    fn test_decode_preserves_order() {
        let mut a = record("aGVsbG8=");
        a.id = 3;
        let mut b = record("aGVsbG8=");
        b.id = 7;
        let out = decode_transfers(&[a, b]).unwrap();
        assert_eq!(out[0].id, 3);
        assert_eq!(out[1].id, 7);
    }
}
