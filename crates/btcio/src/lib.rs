//! Input-output with Bitcoin: the bitcoind RPC client and the on-chain
//! cross-check for claimed ordinal transfers.

pub mod rpc;
pub mod verify;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
