use core::hash::Hash;

/// Bit layout shared by the encoder and the decoder.
///
/// From the most significant bit down: one unused bit, the timestamp delta,
/// the shard id, then the sequence. The unused bit is ignored on unpacking.
/// Implementors only supply the field widths and the raw value; packing and
/// unpacking are plain shifts and masks.
pub trait Snowflake:
    Copy + Clone + PartialOrd + Ord + PartialEq + Eq + Hash + std::fmt::Debug
{
    /// Packs the three fields. Each part is masked to its field width first,
    /// so an oversized shard id or sequence wraps instead of bleeding into its
    /// neighbour.
    fn from_component_parts(timestamp_offset: u64, shard_id: u64, sequence: u64) -> Self {
        Self::from_raw(
            ((timestamp_offset & Self::timestamp_mask()) << Self::timestamp_shift())
                | ((shard_id & Self::shard_id_mask()) << Self::sequence_bits())
                | (sequence & Self::sequence_mask()),
        )
    }

    fn from_raw(raw: u64) -> Self;

    fn id(&self) -> u64;

    fn timestamp(&self) -> u64 {
        (self.id() >> Self::timestamp_shift()) & Self::timestamp_mask()
    }

    fn timestamp_with_epoch(&self, epoch: i64) -> i64 {
        (self.timestamp() as i64) + epoch
    }

    fn shard_id(&self) -> u64 {
        (self.id() >> Self::sequence_bits()) & Self::shard_id_mask()
    }

    fn sequence(&self) -> u64 {
        self.id() & Self::sequence_mask()
    }

    fn timestamp_mask() -> u64 {
        (1u64 << Self::timestamp_bits()) - 1
    }

    fn shard_id_mask() -> u64 {
        (1u64 << Self::shard_id_bits()) - 1
    }

    fn sequence_mask() -> u64 {
        (1u64 << Self::sequence_bits()) - 1
    }

    fn timestamp_bits() -> u64;
    fn shard_id_bits() -> u64;
    fn sequence_bits() -> u64;

    fn timestamp_shift() -> u64 {
        Self::shard_id_bits() + Self::sequence_bits()
    }

    fn max_timestamp() -> i64 {
        Self::timestamp_mask() as i64
    }

    fn max_shard_id() -> u64 {
        Self::shard_id_mask()
    }

    fn max_sequence() -> u64 {
        Self::sequence_mask()
    }
}
