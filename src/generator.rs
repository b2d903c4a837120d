use crate::deconstruct::{to_binary, DeconstructedSnowflake};
use crate::defs::{CANONICAL_ID_LENGTH, DEFAULT_SEQUENCE, DEFAULT_SHARD_ID};
use crate::error::SnowflakeError;
use crate::snowflake::Snowflake;
use crate::timestamp::Timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use typed_builder::TypedBuilder;

/// Configures a generator instance.
///
/// Every field has a default, so a config file only needs to name what it
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Zero point of the timestamp field. Defaults to the Unix epoch.
    #[builder(default = DateTime::<Utc>::UNIX_EPOCH)]
    pub epoch: DateTime<Utc>,
    /// Shard id used when a call does not supply one.
    #[builder(default = DEFAULT_SHARD_ID)]
    pub shard_id: u64,
    /// Initial value of the sequence counter, in `[0, 4095]`.
    #[builder(default = DEFAULT_SEQUENCE)]
    pub sequence: u64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Per-call overrides for [`SnowflakeGenerator::generate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, TypedBuilder)]
pub struct GenerateOptions {
    /// Moment to encode. Defaults to now.
    #[builder(default, setter(strip_option, into))]
    pub timestamp: Option<Timestamp>,
    /// Shard to encode, reduced modulo 1024. Defaults to the generator's shard.
    #[builder(default, setter(strip_option))]
    pub shard_id: Option<u64>,
}

/// Encodes and decodes snowflakes for one shard.
///
/// The sequence counter is the only mutable state. It advances by one on
/// every encode, wraps modulo 4096 without touching the timestamp, and is
/// updated atomically so a generator can be shared across threads.
#[derive(Debug)]
pub struct SnowflakeGenerator<S: Snowflake> {
    epoch: DateTime<Utc>,
    shard_id: u64,
    sequence: AtomicU64,
    _marker: PhantomData<S>,
}

impl<S: Snowflake> SnowflakeGenerator<S> {
    /// Creates a generator from `settings`.
    ///
    /// # Example
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use shardflake::{Generator, GeneratorSettings};
    ///
    /// let settings = GeneratorSettings::builder()
    ///     .epoch(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    ///     .shard_id(7)
    ///     .build();
    /// let generator = Generator::new(settings).unwrap();
    /// assert_eq!(generator.shard_id(), 7);
    /// ```
    pub fn new(settings: GeneratorSettings) -> Result<Self, SnowflakeError> {
        if settings.sequence > S::max_sequence() {
            return Err(SnowflakeError::InvalidSequence(
                i64::try_from(settings.sequence).unwrap_or(i64::MAX),
            ));
        }

        tracing::debug!(
            epoch = %settings.epoch,
            shard_id = settings.shard_id,
            sequence = settings.sequence,
            "snowflake generator created"
        );

        Ok(Self::from_settings(settings))
    }

    fn from_settings(settings: GeneratorSettings) -> Self {
        SnowflakeGenerator {
            epoch: settings.epoch,
            shard_id: settings.shard_id,
            sequence: AtomicU64::new(settings.sequence),
            _marker: PhantomData,
        }
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    /// Default shard id, as configured (before the modulo reduction).
    pub fn shard_id(&self) -> u64 {
        self.shard_id
    }

    /// The sequence value the next encode will use.
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::Acquire)
    }

    /// Replaces the sequence counter. Values outside `[0, 4095]` are rejected
    /// and leave the counter untouched.
    pub fn set_sequence(&self, value: i64) -> Result<(), SnowflakeError> {
        match u64::try_from(value) {
            Ok(sequence) if sequence <= S::max_sequence() => {
                self.sequence.store(sequence, Ordering::Release);
                Ok(())
            }
            _ => {
                tracing::debug!(value, "rejected sequence value");
                Err(SnowflakeError::InvalidSequence(value))
            }
        }
    }

    /// Generates one snowflake and returns it in decimal form.
    pub fn generate(&self, options: GenerateOptions) -> Result<String, SnowflakeError> {
        self.generate_id(options).map(|id| id.id().to_string())
    }

    /// Generates one snowflake.
    ///
    /// Fails only if the timestamp falls before the epoch or more than
    /// 2^41 - 1 ms after it; in that case the counter does not move.
    pub fn generate_id(&self, options: GenerateOptions) -> Result<S, SnowflakeError> {
        let timestamp_offset = self.timestamp_offset(options.timestamp)?;
        let shard_id = self.resolve_shard_id(options.shard_id);
        let sequence = self.advance_sequence(1);

        Ok(S::from_component_parts(timestamp_offset, shard_id, sequence))
    }

    /// Generates `count` snowflakes sharing one timestamp and shard, with
    /// consecutive (wrapping) sequence values.
    ///
    /// Only 4096 distinct sequence values exist, so with `count > 4096` the
    /// run wraps and the returned ids repeat. Split larger batches across
    /// timestamps or shards.
    pub fn generate_bulk(
        &self,
        count: usize,
        options: GenerateOptions,
    ) -> Result<Vec<S>, SnowflakeError> {
        let timestamp_offset = self.timestamp_offset(options.timestamp)?;
        let shard_id = self.resolve_shard_id(options.shard_id);

        // Reserve the whole run in one step so concurrent callers can't interleave.
        let first = self.advance_sequence(count as u64);

        Ok((0..count as u64)
            .map(|i| {
                S::from_component_parts(
                    timestamp_offset,
                    shard_id,
                    first.wrapping_add(i) & S::max_sequence(),
                )
            })
            .collect())
    }

    /// Generates a snowflake and keeps only its last 8 decimal digits.
    ///
    /// Short ids can't be parsed back and collide far more often than full
    /// ids. Use them for display only.
    pub fn generate_short_id(&self, options: GenerateOptions) -> Result<String, SnowflakeError> {
        let snowflake = self.generate(options)?;
        Ok(crate::short_suffix(&snowflake).to_string())
    }

    /// Splits a decimal snowflake into its fields.
    ///
    /// Any non-negative decimal that fits in 64 bits is accepted, whether or
    /// not a generator produced it. `timestamp` is returned relative to the
    /// epoch.
    pub fn parse(&self, snowflake: &str) -> Result<DeconstructedSnowflake, SnowflakeError> {
        let raw = crate::parse_decimal(snowflake)?;
        let id = S::from_raw(raw);

        Ok(DeconstructedSnowflake {
            timestamp: id.timestamp(),
            shard_id: id.shard_id(),
            sequence: id.sequence(),
            binary: to_binary(raw),
        })
    }

    /// Checks that `snowflake` has the canonical 19-digit shape and parses.
    pub fn is_valid(&self, snowflake: &str) -> bool {
        if snowflake.len() != CANONICAL_ID_LENGTH || !snowflake.bytes().all(|b| b.is_ascii_digit())
        {
            return false;
        }

        match self.parse(snowflake) {
            Ok(_) => true,
            Err(error) => {
                tracing::warn!(%error, snowflake, "snowflake failed to parse");
                false
            }
        }
    }

    /// The absolute time a parsed snowflake was generated at, using this
    /// generator's epoch.
    pub fn created_at(&self, parts: &DeconstructedSnowflake) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(parts.timestamp_with_epoch(self.epoch.timestamp_millis()))
    }

    fn timestamp_offset(&self, timestamp: Option<Timestamp>) -> Result<u64, SnowflakeError> {
        let millis = timestamp.unwrap_or_else(Timestamp::now).as_unix_millis();
        let delta = millis.saturating_sub(self.epoch.timestamp_millis());

        if delta < 0 || delta > S::max_timestamp() {
            return Err(SnowflakeError::TimestampOutOfRange { delta });
        }
        Ok(delta as u64)
    }

    fn resolve_shard_id(&self, shard_id: Option<u64>) -> u64 {
        shard_id.unwrap_or(self.shard_id) % (S::max_shard_id() + 1)
    }

    /// Moves the counter forward by `n` (mod 4096) and returns the value it
    /// held before.
    fn advance_sequence(&self, n: u64) -> u64 {
        let step = |current: u64| Some(current.wrapping_add(n) & S::max_sequence());
        match self
            .sequence
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, step)
        {
            Ok(previous) | Err(previous) => previous,
        }
    }
}

impl<S: Snowflake> Default for SnowflakeGenerator<S> {
    fn default() -> Self {
        Self::from_settings(GeneratorSettings::default())
    }
}
