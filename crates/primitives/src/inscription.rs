use std::fmt;
use std::str::FromStr;

use crate::errors::ParseError;

/// Inscription identity, the `<txid>i<index>` form split apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InscriptionId {
    pub txid: String,
    pub index: i32,
}

impl FromStr for InscriptionId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Txids are hex, so the first 'i' is the separator. A suffix that
        // does not parse falls back to index 0, which matches what upstream
        // indexers emit for legacy ids.
        let (txid, index) = s
            .split_once('i')
            .ok_or_else(|| ParseError::MalformedInscriptionId(s.to_owned()))?;
        Ok(Self {
            txid: txid.to_owned(),
            index: index.parse().unwrap_or(0),
        })
    }
}

impl fmt::Display for InscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}i{}", self.txid, self.index)
    }
}

/// A location on chain: `<txid>:<vout>:<offset>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SatPoint {
    pub txid: String,
    pub vout: u32,
    pub offset: u64,
}

impl FromStr for SatPoint {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let (Some(txid), Some(vout), Some(offset), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseError::MalformedSatpoint(s.to_owned()));
        };
        let vout = vout
            .parse()
            .map_err(|_| ParseError::MalformedSatpoint(s.to_owned()))?;
        let offset = offset
            .parse()
            .map_err(|_| ParseError::MalformedSatpoint(s.to_owned()))?;
        Ok(Self {
            txid: txid.to_owned(),
            vout,
            offset,
        })
    }
}

impl fmt::Display for SatPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.txid, self.vout, self.offset)
    }
}
