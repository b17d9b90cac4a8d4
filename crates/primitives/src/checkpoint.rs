use arbitrary::Arbitrary;
use serde::{Deserialize, Serialize};

use crate::errors::ParseError;

/// A per-block attestation published by one committee provider.
///
/// The height rides as decimal text and the commitment as base64, exactly as
/// they appear on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Arbitrary)]
pub struct Checkpoint {
    /// Base64 root of the provider's indexed state at this block.
    pub commitment: String,
    /// Block hash the provider indexed up to.
    pub hash: String,
    /// Block height, decimal text.
    pub height: String,
    /// Provider name, used for deny decisions and logging.
    pub name: String,
    /// Provider URL, used for proof follow-ups.
    pub url: String,
}

impl Checkpoint {
    pub fn height(&self) -> Result<u64, ParseError> {
        self.height
            .parse()
            .map_err(|_| ParseError::MalformedHeight(self.height.clone()))
    }
}
