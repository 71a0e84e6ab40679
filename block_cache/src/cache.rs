use std::sync::Arc;

use anyhow::Result;
use parking_lot::RwLock;
use types::{
    config::Config as ChainConfig,
    containers::Block,
    nonstandard::WithStatus,
    primitives::{CumulativeDiff, IndepHash, SolutionHash},
};

use crate::{
    misc::{ChainSummary, EarliestNotValidated, IgnoreRegistry},
    store::Store,
    store_config::StoreConfig,
};

/// Shares a [`Store`] between one writer and any number of readers.
///
/// Every mutation holds the write lock for its full duration, so readers
/// always observe the indices in a mutually consistent state. No operation
/// suspends or performs I/O while holding a lock; every critical section is
/// a bounded in-memory update.
pub struct BlockCache<I> {
    store: RwLock<Store>,
    ignore_registry: I,
}

impl<I: IgnoreRegistry> BlockCache<I> {
    #[must_use]
    pub fn new(
        chain_config: Arc<ChainConfig>,
        store_config: StoreConfig,
        block: Arc<Block>,
        ignore_registry: I,
    ) -> Self {
        let store = Store::new(chain_config, store_config, block, &ignore_registry);

        Self {
            store: RwLock::new(store),
            ignore_registry,
        }
    }

    /// See [`Store::from_list`].
    ///
    /// # Errors
    ///
    /// Fails if the blocks do not form a chain in the given order.
    pub fn from_list(
        chain_config: Arc<ChainConfig>,
        store_config: StoreConfig,
        blocks: Vec<Arc<Block>>,
        ignore_registry: I,
    ) -> Result<Self> {
        let store = Store::from_list(chain_config, store_config, blocks, &ignore_registry)?;

        Ok(Self {
            store: RwLock::new(store),
            ignore_registry,
        })
    }

    pub fn add(&self, block: Arc<Block>) {
        self.store.write().add(block, &self.ignore_registry);
    }

    /// See [`Store::add_validated`].
    ///
    /// # Errors
    ///
    /// Fails if the parent is missing or not validated.
    pub fn add_validated(&self, block: Arc<Block>) -> Result<()> {
        self.store
            .write()
            .add_validated(block, &self.ignore_registry)
    }

    /// See [`Store::mark_tip`].
    ///
    /// # Errors
    ///
    /// Fails if the block is unknown or an ancestor is not validated.
    pub fn mark_tip(&self, indep_hash: IndepHash) -> Result<()> {
        self.store.write().mark_tip(indep_hash)
    }

    pub fn mark_nonce_limiter_validation_scheduled(&self, indep_hash: IndepHash) {
        self.store
            .write()
            .mark_nonce_limiter_validation_scheduled(indep_hash);
    }

    pub fn mark_nonce_limiter_validated(&self, indep_hash: IndepHash) {
        self.store.write().mark_nonce_limiter_validated(indep_hash);
    }

    pub fn remove(&self, indep_hash: IndepHash) {
        self.store.write().remove(indep_hash, &self.ignore_registry);
    }

    pub fn prune(&self, depth: u64) {
        self.store.write().prune(depth, &self.ignore_registry);
    }

    #[must_use]
    pub fn get(&self, indep_hash: IndepHash) -> Option<Arc<Block>> {
        self.store.read().get(indep_hash).cloned()
    }

    #[must_use]
    pub fn get_block_and_status(&self, indep_hash: IndepHash) -> Option<WithStatus<Arc<Block>>> {
        self.store
            .read()
            .get_block_and_status(indep_hash)
            .map(|with_status| with_status.map(Arc::clone))
    }

    #[must_use]
    pub fn is_known_solution_hash(&self, solution_hash: SolutionHash) -> bool {
        self.store.read().is_known_solution_hash(solution_hash)
    }

    #[must_use]
    pub fn get_by_solution_hash(
        &self,
        solution_hash: SolutionHash,
        exclude: IndepHash,
        cumulative_diff: CumulativeDiff,
        previous_cumulative_diff: CumulativeDiff,
    ) -> Option<Arc<Block>> {
        self.store
            .read()
            .get_by_solution_hash(
                solution_hash,
                exclude,
                cumulative_diff,
                previous_cumulative_diff,
            )
            .cloned()
    }

    #[must_use]
    pub fn get_longest_chain_block_txs_pairs(&self) -> ChainSummary {
        self.store.read().get_longest_chain_block_txs_pairs().clone()
    }

    #[must_use]
    pub fn get_earliest_not_validated_from_longest_chain(&self) -> Option<EarliestNotValidated> {
        self.store
            .read()
            .get_earliest_not_validated_from_longest_chain()
    }

    #[must_use]
    pub fn tip(&self) -> IndepHash {
        self.store.read().tip()
    }

    /// Runs the closure against a consistent snapshot of the store.
    pub fn snapshot<R>(&self, function: impl FnOnce(&Store) -> R) -> R {
        function(&self.store.read())
    }
}
