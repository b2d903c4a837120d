use thiserror::Error;

/// Errors returned by snowflake generation and parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SnowflakeError {
    #[error("invalid sequence {0}; expected 0..={max}", max = crate::defs::MAX_SEQUENCE)]
    InvalidSequence(i64),
    #[error("timestamp delta {delta}ms is outside 0..={max}ms", max = crate::defs::MAX_TIMESTAMP_MS)]
    TimestampOutOfRange { delta: i64 },
    #[error("invalid bit range: start={start}, length={length:?}, width={width}")]
    InvalidBitRange {
        start: usize,
        length: Option<usize>,
        width: usize,
    },
    #[error("invalid snowflake id: {0}")]
    InvalidId(String),
}
