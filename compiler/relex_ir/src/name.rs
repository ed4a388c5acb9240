//! Handle to a string held by a [`StringInterner`](crate::StringInterner).

/// Shard number in the top bits, slot within the shard below.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(u32);

impl Name {
    const SHARD_BITS: u32 = 4;
    const SLOT_BITS: u32 = u32::BITS - Self::SHARD_BITS;

    /// Number of interner shards a name can address.
    pub const SHARDS: usize = 1 << Self::SHARD_BITS;

    /// Largest slot a shard can hand out.
    pub const MAX_SLOT: u32 = (1 << Self::SLOT_BITS) - 1;

    /// The empty string, present in every interner.
    pub const EMPTY: Name = Name(0);

    #[expect(
        clippy::cast_possible_truncation,
        reason = "shard is below SHARDS (16)"
    )]
    pub(crate) const fn from_parts(shard: usize, slot: u32) -> Self {
        debug_assert!(shard < Self::SHARDS);
        debug_assert!(slot <= Self::MAX_SLOT);
        Name(((shard as u32) << Self::SLOT_BITS) | slot)
    }

    #[inline]
    pub const fn shard(self) -> usize {
        (self.0 >> Self::SLOT_BITS) as usize
    }

    #[inline]
    pub const fn slot(self) -> usize {
        (self.0 & Self::MAX_SLOT) as usize
    }
}
