use ordlight_primitives::Buf32;

use crate::errors::CommitError;

/// A 32-byte commitment root, transported as base64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateRoot(Buf32);

impl StateRoot {
    pub fn new(buf: Buf32) -> Self {
        Self(buf)
    }

    /// Decodes a wire commitment, enforcing the 32-byte well-formedness
    /// invariant.
    pub fn from_base64(s: &str) -> Result<Self, CommitError> {
        let bytes = base64::decode(s)?;
        let len = bytes.len();
        let array: [u8; 32] = bytes.try_into().map_err(|_| CommitError::RootLength(len))?;
        Ok(Self(Buf32(array)))
    }

    pub fn to_base64(&self) -> String {
        base64::encode(self.0.as_slice())
    }

    pub fn as_bytes(&self) -> [u8; 32] {
        self.0 .0
    }
}

/// Post-state handle produced by replaying a proof at a height.
#[derive(Debug, Clone, Copy)]
pub struct StateNode {
    root: StateRoot,
    height: u64,
}

impl StateNode {
    pub fn new(root: StateRoot, height: u64) -> Self {
        Self { root, height }
    }

    pub fn commit(&self) -> StateRoot {
        self.root
    }

    pub fn height(&self) -> u64 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_roundtrip() {
        let root = StateRoot::new(Buf32([9; 32]));
        let enc = root.to_base64();
        assert_eq!(StateRoot::from_base64(&enc).unwrap(), root);
    }

    #[test]
    fn test_rejects_wrong_length() {
        let enc = base64::encode([1u8; 16]);
        assert!(matches!(
            StateRoot::from_base64(&enc),
            Err(CommitError::RootLength(16))
        ));
    }

    #[test]
    fn test_rejects_bad_base64() {
        assert!(matches!(
            StateRoot::from_base64("not base64!"),
            Err(CommitError::RootEncoding(_))
        ));
    }
}
