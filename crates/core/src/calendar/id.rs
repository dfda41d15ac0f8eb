use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when a string is not 24 hex characters.
pub use bson::oid::Error as ParseObjectIdError;

/// A 12 byte document identifier, rendered as 24 lowercase hex characters.
///
/// Serializes as a bare hex string rather than BSON's `{"$oid": ..}` form,
/// so ids read the same in JSON output and SQLite columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(bson::oid::ObjectId);

impl ObjectId {
    /// Mints a fresh id.
    pub fn new() -> Self {
        Self(bson::oid::ObjectId::new())
    }

    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bson::oid::ObjectId::from_bytes(bytes))
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0.bytes()
    }

    /// Parses 24 hex characters of either case.
    ///
    /// ```
    /// use duedesk_core::calendar::ObjectId;
    ///
    /// let id = ObjectId::parse_str("64B7F0C2A1B2C3D4E5F60718").unwrap();
    /// assert_eq!(id.to_string(), "64b7f0c2a1b2c3d4e5f60718");
    /// assert!(ObjectId::parse_str("64b7f0c2").is_none());
    /// ```
    pub fn parse_str(value: &str) -> Option<Self> {
        value.parse().ok()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<bson::oid::ObjectId> for ObjectId {
    fn from(id: bson::oid::ObjectId) -> Self {
        Self(id)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = ParseObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        bson::oid::ObjectId::parse_str(s).map(Self)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
