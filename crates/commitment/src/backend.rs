use ordlight_primitives::StateProof;

use crate::errors::CommitError;
use crate::root::{StateNode, StateRoot};

/// Proof application over some commitment scheme.
///
/// `Ok(None)` means the proof's witness did not cohere with the pre-state
/// root; errors are reserved for payloads that cannot be interpreted at
/// all.
pub trait ProofBackend: Send + Sync + 'static {
    fn generate_post_root(
        &self,
        pre: &StateRoot,
        height: u64,
        proof: &StateProof,
    ) -> Result<Option<StateNode>, CommitError>;
}
