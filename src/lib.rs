//! 64-bit snowflake ids: a 41-bit millisecond timestamp, a 10-bit shard id
//! and a 12-bit sequence packed into one sortable integer.
//!
//! ```
//! use shardflake::{GenerateOptions, Generator};
//!
//! let generator = Generator::default();
//! generator.set_sequence(1).unwrap();
//!
//! let options = GenerateOptions::builder()
//!     .timestamp(1653653263221)
//!     .shard_id(1)
//!     .build();
//! let snowflake = generator.generate(options).unwrap();
//! assert_eq!(snowflake, "6935924496540897281");
//!
//! let parts = generator.parse(&snowflake).unwrap();
//! assert_eq!((parts.timestamp, parts.shard_id, parts.sequence), (1653653263221, 1, 1));
//! assert!(generator.is_valid(&snowflake));
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub mod deconstruct;
pub mod defs;
pub mod error;
pub mod generator;
pub mod snowflake;
pub mod timestamp;

pub use deconstruct::{extract_bits, DeconstructedSnowflake};
pub use defs::*;
pub use error::SnowflakeError;
pub use generator::{GenerateOptions, GeneratorSettings};
pub use snowflake::Snowflake;
pub use timestamp::Timestamp;

/// The concrete generator, producing [`SnowflakeId`]s.
pub type Generator = generator::SnowflakeGenerator<SnowflakeId>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId(u64);

// ---------------------------------------------------------------------------
// Snowflake trait implementation
// ---------------------------------------------------------------------------

impl Snowflake for SnowflakeId {
    fn from_raw(raw: u64) -> Self {
        SnowflakeId(raw)
    }

    fn id(&self) -> u64 {
        self.0
    }

    fn timestamp_bits() -> u64 {
        TIMESTAMP_BITS
    }

    fn shard_id_bits() -> u64 {
        SHARD_ID_BITS
    }

    fn sequence_bits() -> u64 {
        SEQUENCE_BITS
    }
}

// ---------------------------------------------------------------------------
// Inherent methods
// ---------------------------------------------------------------------------

impl SnowflakeId {
    pub fn new(value: u64) -> Self {
        SnowflakeId(value)
    }

    pub fn id(&self) -> u64 {
        self.0
    }

    /// Returns the timestamp offset (in milliseconds) stored in this snowflake ID.
    /// This is NOT a Unix timestamp. To get the actual Unix timestamp, use `timestamp_with_epoch()`.
    pub fn timestamp(&self) -> u64 {
        <Self as Snowflake>::timestamp(self)
    }

    /// Returns the timestamp in milliseconds since Unix epoch, using a custom epoch
    pub fn timestamp_with_epoch(&self, epoch: i64) -> i64 {
        <Self as Snowflake>::timestamp_with_epoch(self, epoch)
    }

    pub fn shard_id(&self) -> u64 {
        <Self as Snowflake>::shard_id(self)
    }

    pub fn sequence(&self) -> u64 {
        <Self as Snowflake>::sequence(self)
    }

    /// The id as 64 binary digits, zero-padded.
    pub fn to_binary(&self) -> String {
        deconstruct::to_binary(self.0)
    }

    /// The last 8 decimal digits. Not unique and not parseable.
    pub fn short_id(&self) -> String {
        short_suffix(&self.0.to_string()).to_string()
    }

    pub fn deconstruct(&self) -> DeconstructedSnowflake {
        DeconstructedSnowflake::from(*self)
    }
}

/// The last `SHORT_ID_LENGTH` characters of a decimal id, or all of it when
/// shorter.
pub(crate) fn short_suffix(decimal: &str) -> &str {
    &decimal[decimal.len().saturating_sub(SHORT_ID_LENGTH)..]
}

/// Reads a plain decimal numeral (digits only, no sign) that fits in 64 bits.
pub(crate) fn parse_decimal(s: &str) -> Result<u64, SnowflakeError> {
    if s.starts_with('-') {
        return Err(SnowflakeError::InvalidId(
            "Snowflake ID cannot be negative".to_string(),
        ));
    }
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SnowflakeError::InvalidId(format!(
            "Failed to parse: {s:?} is not a decimal numeral"
        )));
    }

    s.parse::<u64>()
        .map_err(|e| SnowflakeError::InvalidId(format!("Failed to parse: {}", e)))
}

// ---------------------------------------------------------------------------
// FromStr
// ---------------------------------------------------------------------------

impl FromStr for SnowflakeId {
    type Err = SnowflakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal(s).map(SnowflakeId)
    }
}

// ---------------------------------------------------------------------------
// Display, From, Serde
// ---------------------------------------------------------------------------

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SnowflakeId {
    fn from(value: u64) -> Self {
        SnowflakeId(value)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.0
    }
}

impl Serialize for SnowflakeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.0.to_string())
        } else {
            serializer.serialize_u64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for SnowflakeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SnowflakeIdVisitor;

        impl<'de> serde::de::Visitor<'de> for SnowflakeIdVisitor {
            type Value = SnowflakeId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer representing a snowflake id")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(SnowflakeId(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                u64::try_from(value)
                    .map(SnowflakeId)
                    .map_err(|_| E::custom("snowflake id cannot be negative"))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.parse::<SnowflakeId>().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(SnowflakeIdVisitor)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
