pub mod client;
pub mod error;
pub mod traits;
pub mod types;

pub use client::BitcoinClient;
pub use error::{ClientError, ClientResult};
