//! Builders for checkpoints, transfers, and witness-backed state proofs.

use arbitrary::{Arbitrary, Unstructured};
use rand::RngCore;

use ordlight_commitment::StateTree;
use ordlight_primitives::{Checkpoint, OrdTransfer, OrdTransferRecord, StateProof};

/// Entropy fed to one arbitrary checkpoint. A checkpoint is five strings,
/// so this buys a few dozen bytes of garnish per field without ever
/// running the generator dry.
const CHECKPOINT_ENTROPY: usize = 192;

/// A checkpoint with randomized provider garnish. Callers pin the fields
/// a test actually depends on (commitment, hash, height) and leave the
/// rest to prove they do not matter.
pub fn arbitrary_checkpoint() -> Checkpoint {
    let mut buf = vec![0u8; CHECKPOINT_ENTROPY];
    rand::thread_rng().fill_bytes(&mut buf);
    let mut u = Unstructured::new(&buf);
    Checkpoint::arbitrary(&mut u).expect("checkpoint from random bytes")
}

/// A checkpoint from a named provider, url derived from the name.
pub fn checkpoint(name: &str, commitment: &str, height: u64, hash: &str) -> Checkpoint {
    Checkpoint {
        commitment: commitment.to_owned(),
        hash: hash.to_owned(),
        height: height.to_string(),
        name: name.to_owned(),
        url: format!("http://{name}.indexer.example"),
    }
}

/// A plain inscription transfer landing at `satpoint`.
pub fn transfer(id: u64, inscription_id: &str, satpoint: &str) -> OrdTransfer {
    OrdTransfer {
        id,
        inscription_id: inscription_id.to_owned(),
        old_satpoint: String::new(),
        new_satpoint: satpoint.to_owned(),
        new_pkscript: "0014aabb".to_owned(),
        new_wallet: "bc1qexample".to_owned(),
        sent_as_fee: false,
        content: b"ordinal".to_vec(),
        content_type: "text/plain".to_owned(),
    }
}

pub fn to_record(t: &OrdTransfer) -> OrdTransferRecord {
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

/// Applies `transfers` to `tree` and packages the witnesses into a proof
/// that replays against the tree's previous root.
pub fn proof_from_tree(tree: &mut StateTree, transfers: &[OrdTransfer]) -> StateProof {
    let witness = tree.apply_block(transfers);
    StateProof {
        transfers: transfers.iter().map(to_record).collect(),
        witness,
    }
}

/// `n` distinct transfers, one inscription each.
pub fn transfer_batch(n: usize, tag: &str) -> Vec<OrdTransfer> {
    (0..n)
        .map(|i| {
            transfer(
                i as u64 + 1,
                &format!("{tag}{i:04}i0"),
                &format!("{tag}{i:04}:0:0"),
            )
        })
        .collect()
}
