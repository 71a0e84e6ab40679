use educe::Educe;

#[derive(Clone, Copy, Educe)]
#[educe(Default)]
pub struct StoreConfig {
    /// How many blocks behind the heaviest tip candidate the memoized chain
    /// summary covers.
    #[educe(Default = 50)]
    pub store_blocks_behind_current: u64,
    /// Base lifetime of an unvalidated block competing for an already seen
    /// solution. Scaled by the length of the fork rooted at the block, so
    /// deeper forks survive longer.
    #[educe(Default = 5)]
    pub alternative_block_expiration_time_seconds: u64,
}
