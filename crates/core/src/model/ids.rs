use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::Band;

/// Identifier of a quiz item, unique within a topic's bank.
///
/// Rendered as `<band code>-<sequence>`, e.g. `M-14`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId {
    band: Band,
    seq: u32,
}

impl ItemId {
    #[must_use]
    pub fn new(band: Band, seq: u32) -> Self {
        Self { band, seq }
    }

    #[must_use]
    pub fn band(&self) -> Band {
        self.band
    }

    #[must_use]
    pub fn seq(&self) -> u32 {
        self.seq
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({}-{})", self.band.code(), self.seq)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.band.code(), self.seq)
    }
}

/// Error type for parsing an `ItemId` from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    raw: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse item id from {:?}", self.raw)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for ItemId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseIdError { raw: s.to_string() };
        let (code, seq) = s.split_once('-').ok_or_else(err)?;
        let mut chars = code.chars();
        let band = match (chars.next(), chars.next()) {
            (Some(c), None) => Band::from_code(c).ok_or_else(err)?,
            _ => return Err(err()),
        };
        let seq = seq.parse::<u32>().map_err(|_| err())?;
        Ok(Self::new(band, seq))
    }
}

impl TryFrom<String> for ItemId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.to_string()
    }
}
