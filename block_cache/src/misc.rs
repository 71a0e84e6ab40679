use std::{sync::Arc, time::Instant};

use im::HashSet;
use types::{
    containers::Block,
    nonstandard::{BlockStatus, NotValidatedStatus},
    primitives::{IndepHash, TxId},
};

/// The value stored per cached block.
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub block: Arc<Block>,
    pub status: BlockStatus,
    /// Age of the cache entry. Recorded at first insertion and never updated
    /// by re-adds or status transitions.
    pub timestamp: Instant,
    /// Indep hashes of the cached blocks naming this block as their parent.
    pub children: HashSet<IndepHash>,
}

/// Summary of the heaviest chain, memoized by the store and refreshed after
/// every mutation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChainSummary {
    /// `(indep_hash, transaction ids)` pairs sorted newest to oldest.
    pub block_txs_pairs: Vec<(IndepHash, Vec<TxId>)>,
    /// How many of the summarized blocks are not on chain yet.
    pub not_on_chain_count: usize,
}

/// The deepest block of the heaviest fork that still awaits validation,
/// together with the chain connecting it to the current main chain.
#[derive(Clone, Debug)]
pub struct EarliestNotValidated {
    pub block: Arc<Block>,
    /// Blocks from `block`'s parent down to and including the on-chain fork
    /// junction, sorted newest to oldest.
    pub prev_blocks: Vec<Arc<Block>>,
    pub status: NotValidatedStatus,
    pub timestamp: Instant,
}

/// Outbound hook keeping the node-wide registry of recently seen block
/// identifiers in sync with the cache. Both calls are fire-and-forget.
pub trait IgnoreRegistry {
    fn add(&self, indep_hash: IndepHash);

    fn remove(&self, indep_hash: IndepHash);
}

/// Registry hook for callers that do not track seen blocks.
pub struct NullIgnoreRegistry;

impl IgnoreRegistry for NullIgnoreRegistry {
    fn add(&self, _indep_hash: IndepHash) {}

    fn remove(&self, _indep_hash: IndepHash) {}
}
