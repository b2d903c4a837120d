/// Width of the timestamp delta field.
pub const TIMESTAMP_BITS: u64 = 41;
/// Width of the shard id field.
pub const SHARD_ID_BITS: u64 = 10;
/// Width of the sequence field.
pub const SEQUENCE_BITS: u64 = 12;

/// Largest timestamp delta (in milliseconds) the layout can hold, about 69 years.
pub const MAX_TIMESTAMP_MS: i64 = (1i64 << TIMESTAMP_BITS) - 1;
pub const MAX_SHARD_ID: u64 = (1u64 << SHARD_ID_BITS) - 1;
pub const MAX_SEQUENCE: u64 = (1u64 << SEQUENCE_BITS) - 1;

/// Default epoch, in milliseconds since the Unix epoch: 1970-01-01T00:00:00Z.
pub const SNOWFLAKE_ID_EPOCH: i64 = 0;
pub const DEFAULT_SHARD_ID: u64 = 1;
pub const DEFAULT_SEQUENCE: u64 = 1;

/// Width of the zero-padded binary rendering.
pub const BINARY_WIDTH: usize = 64;
/// Decimal length accepted by `Generator::is_valid`.
pub const CANONICAL_ID_LENGTH: usize = 19;
/// Number of trailing decimal digits kept by `Generator::generate_short_id`.
pub const SHORT_ID_LENGTH: usize = 8;
