use crate::defs::BINARY_WIDTH;
use crate::error::SnowflakeError;
use crate::snowflake::Snowflake;
use crate::SnowflakeId;
use serde::{Deserialize, Serialize};

/// The fields of a snowflake, as returned by `Generator::parse`.
///
/// `timestamp` is the raw delta stored in the id. Add the generator epoch
/// (see [`DeconstructedSnowflake::timestamp_with_epoch`]) to get Unix
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeconstructedSnowflake {
    pub timestamp: u64,
    pub shard_id: u64,
    pub sequence: u64,
    /// The packed value as exactly 64 binary digits.
    pub binary: String,
}

impl DeconstructedSnowflake {
    pub fn timestamp_with_epoch(&self, epoch: i64) -> i64 {
        (self.timestamp as i64) + epoch
    }
}

impl From<SnowflakeId> for DeconstructedSnowflake {
    fn from(id: SnowflakeId) -> Self {
        DeconstructedSnowflake {
            timestamp: Snowflake::timestamp(&id),
            shard_id: Snowflake::shard_id(&id),
            sequence: Snowflake::sequence(&id),
            binary: to_binary(Snowflake::id(&id)),
        }
    }
}

/// Renders `value` as 64 binary digits, most significant bit first.
pub fn to_binary(value: u64) -> String {
    format!("{:0width$b}", value, width = BINARY_WIDTH)
}

/// Reads `binary[start..start + length]` (or `binary[start..]` when `length`
/// is `None`) as a base-2 integer.
///
/// Positions count from the most significant digit, so on a 64-digit
/// rendering the timestamp lives at `(1, Some(41))`, the shard id at
/// `(42, Some(10))` and the sequence at `(52, None)`.
pub fn extract_bits(
    binary: &str,
    start: usize,
    length: Option<usize>,
) -> Result<u64, SnowflakeError> {
    if !binary.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(SnowflakeError::InvalidId(format!(
            "not a binary string: {binary:?}"
        )));
    }

    let width = binary.len();
    let range_error = SnowflakeError::InvalidBitRange {
        start,
        length,
        width,
    };

    let end = match length {
        Some(length) => start.checked_add(length).ok_or_else(|| range_error.clone())?,
        None => width,
    };
    if start >= end || end > width || end - start > 64 {
        return Err(range_error);
    }

    u64::from_str_radix(&binary[start..end], 2)
        .map_err(|e| SnowflakeError::InvalidId(format!("Failed to read bits: {}", e)))
}
