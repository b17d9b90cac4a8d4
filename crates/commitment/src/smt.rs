//! Sparse Merkle tree over the inscription location map.
//!
//! Keys are `sha256` of the inscription id, giving a fixed 256-level tree.
//! Empty slots hash to zero and empty subtrees fold through a precomputed
//! zero-hash table, so witnesses stay a flat 256-sibling path regardless of
//! how sparse the state is.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use sha2::{Digest, Sha256};

use ordlight_primitives::proof::decode_transfers;
use ordlight_primitives::{Buf32, OrdTransfer, StateProof, UpdateWitness};

use crate::backend::ProofBackend;
use crate::errors::CommitError;
use crate::root::{StateNode, StateRoot};

pub const TREE_DEPTH: usize = 256;

/// Hash of an empty slot.
const EMPTY_LEAF: [u8; 32] = [0; 32];

fn hash_node(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"node");
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Root hashes of empty subtrees, indexed by subtree height.
fn zero_hash(height: usize) -> [u8; 32] {
    static ZERO: OnceLock<Vec<[u8; 32]>> = OnceLock::new();
    let table = ZERO.get_or_init(|| {
        let mut table = vec![EMPTY_LEAF; TREE_DEPTH + 1];
        for i in 1..=TREE_DEPTH {
            table[i] = hash_node(&table[i - 1], &table[i - 1]);
        }
        table
    });
    table[height]
}

/// Tree key for an inscription.
pub fn transfer_key(inscription_id: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"key");
    hasher.update(inscription_id.as_bytes());
    hasher.finalize().into()
}

/// Leaf hash for an inscription's current location. Fields are length
/// prefixed so adjacent values cannot collide.
pub fn transfer_leaf(transfer: &OrdTransfer) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"leaf");
    for field in [
        transfer.new_satpoint.as_bytes(),
        transfer.new_pkscript.as_bytes(),
        transfer.new_wallet.as_bytes(),
        transfer.content_type.as_bytes(),
        transfer.content.as_slice(),
    ] {
        hasher.update((field.len() as u64).to_be_bytes());
        hasher.update(field);
    }
    hasher.finalize().into()
}

/// Bit `i` of a key, counted from the most significant bit of the first
/// byte. Bit 0 selects the top-level branch.
fn bit(key: &[u8; 32], i: usize) -> u8 {
    (key[i / 8] >> (7 - (i % 8))) & 1
}

/// Folds a leaf up to the root along the key's path. Siblings are ordered
/// leaf-adjacent first.
fn fold_path(key: &[u8; 32], leaf: [u8; 32], siblings: &[Buf32]) -> [u8; 32] {
    let mut acc = leaf;
    for (i, sibling) in siblings.iter().enumerate() {
        let depth = TREE_DEPTH - 1 - i;
        acc = if bit(key, depth) == 0 {
            hash_node(&acc, &sibling.0)
        } else {
            hash_node(&sibling.0, &acc)
        };
    }
    acc
}

/// The transfer list in verification order.
fn ordered_by_satpoint(transfers: &[OrdTransfer]) -> Vec<&OrdTransfer> {
    let mut ordered: Vec<&OrdTransfer> = transfers.iter().collect();
    ordered.sort_by(|a, b| a.new_satpoint.cmp(&b.new_satpoint));
    ordered
}

/// The sha256 sparse-Merkle proof backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Smt;

impl ProofBackend for Sha256Smt {
    fn generate_post_root(
        &self,
        pre: &StateRoot,
        height: u64,
        proof: &StateProof,
    ) -> Result<Option<StateNode>, CommitError> {
        let transfers = decode_transfers(&proof.transfers)?;
        let ordered = ordered_by_satpoint(&transfers);
        if proof.witness.len() != ordered.len() {
            return Ok(None);
        }

        let mut root = pre.as_bytes();
        for (transfer, witness) in ordered.into_iter().zip(proof.witness.iter()) {
            if witness.siblings.len() != TREE_DEPTH {
                return Ok(None);
            }
            let key = transfer_key(&transfer.inscription_id);
            let old_leaf = witness.old_leaf.map(|b| b.0).unwrap_or(EMPTY_LEAF);
            // The witness must re-derive the running root before it may
            // move it.
            if fold_path(&key, old_leaf, &witness.siblings) != root {
                return Ok(None);
            }
            let new_leaf = if transfer.sent_as_fee {
                EMPTY_LEAF
            } else {
                transfer_leaf(transfer)
            };
            root = fold_path(&key, new_leaf, &witness.siblings);
        }

        Ok(Some(StateNode::new(StateRoot::new(Buf32(root)), height)))
    }
}

/// In-memory tree holding the full leaf set. This is the committee-side
/// counterpart of [`Sha256Smt`]: it produces the witnesses the verifier
/// replays, and yields genesis roots for bootstrap fixtures.
#[derive(Debug, Clone, Default)]
pub struct StateTree {
    leaves: BTreeMap<[u8; 32], [u8; 32]>,
}

impl StateTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> StateRoot {
        let leaves: Vec<([u8; 32], [u8; 32])> =
            self.leaves.iter().map(|(k, v)| (*k, *v)).collect();
        StateRoot::new(Buf32(hash_cohort(&leaves, 0)))
    }

    /// Applies one transfer and returns the witness for it against the
    /// tree state just before the update.
    pub fn apply(&mut self, transfer: &OrdTransfer) -> UpdateWitness {
        let key = transfer_key(&transfer.inscription_id);
        let witness = UpdateWitness {
            old_leaf: self.leaves.get(&key).map(|l| Buf32(*l)),
            siblings: self.siblings(&key),
        };
        if transfer.sent_as_fee {
            self.leaves.remove(&key);
        } else {
            self.leaves.insert(key, transfer_leaf(transfer));
        }
        witness
    }

    /// Applies a block's transfers in verification order, returning the
    /// witness list aligned the way [`Sha256Smt`] expects it.
    pub fn apply_block(&mut self, transfers: &[OrdTransfer]) -> Vec<UpdateWitness> {
        ordered_by_satpoint(transfers)
            .into_iter()
            .map(|t| self.apply(t))
            .collect()
    }

    /// Sibling path for a key, leaf-adjacent first.
    fn siblings(&self, key: &[u8; 32]) -> Vec<Buf32> {
        let mut cohort: Vec<([u8; 32], [u8; 32])> =
            self.leaves.iter().map(|(k, v)| (*k, *v)).collect();
        let mut path = Vec::with_capacity(TREE_DEPTH);
        for depth in 0..TREE_DEPTH {
            let split = cohort.partition_point(|(k, _)| bit(k, depth) == 0);
            let ones = cohort.split_off(split);
            let zeros = cohort;
            let (same, other) = if bit(key, depth) == 0 {
                (zeros, ones)
            } else {
                (ones, zeros)
            };
            path.push(Buf32(hash_cohort(&other, depth + 1)));
            cohort = same;
        }
        path.reverse();
        path
    }
}

/// Hash of the subtree at `depth` containing exactly the given sorted
/// leaves.
fn hash_cohort(leaves: &[([u8; 32], [u8; 32])], depth: usize) -> [u8; 32] {
    if leaves.is_empty() {
        return zero_hash(TREE_DEPTH - depth);
    }
    if depth == TREE_DEPTH {
        return leaves[0].1;
    }
    let split = leaves.partition_point(|(k, _)| bit(k, depth) == 0);
    hash_node(
        &hash_cohort(&leaves[..split], depth + 1),
        &hash_cohort(&leaves[split..], depth + 1),
    )
}

#[cfg(test)]
mod tests {
    use ordlight_primitives::OrdTransferRecord;

    use super::*;

    fn transfer(id: u64, inscription: &str, satpoint: &str, fee: bool) -> OrdTransfer {
        OrdTransfer {
            id,
            inscription_id: inscription.to_owned(),
            old_satpoint: String::new(),
            new_satpoint: satpoint.to_owned(),
            new_pkscript: "0014aabb".to_owned(),
            new_wallet: "bc1qexample".to_owned(),
            sent_as_fee: fee,
            content: b"ordinal".to_vec(),
            content_type: "text/plain".to_owned(),
        }
    }

    fn record(t: &OrdTransfer) -> OrdTransferRecord {
        OrdTransferRecord {
            id: t.id,
            inscription_id: t.inscription_id.clone(),
            old_satpoint: t.old_satpoint.clone(),
            new_satpoint: t.new_satpoint.clone(),
            new_pkscript: t.new_pkscript.clone(),
            new_wallet: t.new_wallet.clone(),
            sent_as_fee: t.sent_as_fee,
            content: base64::encode(&t.content),
            content_type: t.content_type.clone(),
        }
    }

    fn proof_for(tree: &mut StateTree, transfers: &[OrdTransfer]) -> StateProof {
        let witness = tree.apply_block(transfers);
        StateProof {
            transfers: transfers.iter().map(record).collect(),
            witness,
        }
    }

    #[test]
    fn test_empty_roots_agree() {
        assert_eq!(StateTree::new().root().as_bytes(), zero_hash(TREE_DEPTH));
    }

    #[test]
    fn test_witness_replays_to_tree_root() {
        let mut tree = StateTree::new();
        let pre = tree.root();
        let transfers = vec![
            transfer(1, "aaaai0", "aaaa:0:0", false),
            transfer(2, "bbbbi0", "bbbb:1:0", false),
            transfer(3, "cccci1", "cccc:0:50", false),
        ];
        let proof = proof_for(&mut tree, &transfers);

        let node = Sha256Smt
            .generate_post_root(&pre, 100, &proof)
            .unwrap()
            .expect("proof should cohere with the pre root");
        assert_eq!(node.commit(), tree.root());
        assert_eq!(node.height(), 100);
    }

    #[test]
    fn test_fee_burn_clears_slot() {
        let mut tree = StateTree::new();
        tree.apply(&transfer(1, "aaaai0", "aaaa:0:0", false));
        let pre = tree.root();

        let burn = vec![transfer(2, "aaaai0", "bbbb:0:0", true)];
        let proof = proof_for(&mut tree, &burn);
        assert_eq!(tree.root().as_bytes(), zero_hash(TREE_DEPTH));

        let node = Sha256Smt
            .generate_post_root(&pre, 101, &proof)
            .unwrap()
            .expect("burn proof should replay");
        assert_eq!(node.commit(), tree.root());
    }

    #[test]
    fn test_tampered_witness_rejected() {
        let mut tree = StateTree::new();
        let pre = tree.root();
        let transfers = vec![transfer(1, "aaaai0", "aaaa:0:0", false)];
        let mut proof = proof_for(&mut tree, &transfers);
        proof.witness[0].siblings[3] = Buf32([0xff; 32]);

        let node = Sha256Smt.generate_post_root(&pre, 100, &proof).unwrap();
        assert!(node.is_none(), "tampered sibling must not replay");
    }

    #[test]
    fn test_wrong_pre_root_rejected() {
        let mut tree = StateTree::new();
        let transfers = vec![transfer(1, "aaaai0", "aaaa:0:0", false)];
        let proof = proof_for(&mut tree, &transfers);

        let bogus = StateRoot::new(Buf32([0xab; 32]));
        let node = Sha256Smt.generate_post_root(&bogus, 100, &proof).unwrap();
        assert!(node.is_none(), "proof must be bound to the pre root");
    }

    #[test]
    fn test_witness_length_mismatch_rejected() {
        let mut tree = StateTree::new();
        let pre = tree.root();
        let transfers = vec![
            transfer(1, "aaaai0", "aaaa:0:0", false),
            transfer(2, "bbbbi0", "bbbb:0:0", false),
        ];
        let mut proof = proof_for(&mut tree, &transfers);
        proof.witness.pop();

        let node = Sha256Smt.generate_post_root(&pre, 100, &proof).unwrap();
        assert!(node.is_none());
    }

    #[test]
    fn test_same_inscription_moved_twice() {
        let mut tree = StateTree::new();
        tree.apply(&transfer(1, "aaaai0", "aaaa:0:0", false));
        let pre = tree.root();

        // Two hops inside one block, applied in satpoint order.
        let hops = vec![
            transfer(2, "aaaai0", "bbbb:0:0", false),
            transfer(3, "aaaai0", "cccc:0:0", false),
        ];
        let proof = proof_for(&mut tree, &hops);

        let node = Sha256Smt
            .generate_post_root(&pre, 102, &proof)
            .unwrap()
            .expect("chained updates should replay");
        assert_eq!(node.commit(), tree.root());
    }
}
