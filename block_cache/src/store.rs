use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use im::{HashMap, HashSet, OrdSet};
use itertools::Itertools as _;
use log::warn;
use tap::Pipe as _;
use types::{
    config::Config as ChainConfig,
    containers::Block,
    nonstandard::{BlockStatus, NotValidatedStatus, WithStatus},
    primitives::{CumulativeDiff, Height, IndepHash, SolutionHash},
};

use crate::{
    error::Error,
    misc::{CacheEntry, ChainSummary, EarliestNotValidated, IgnoreRegistry},
    store_config::StoreConfig,
};

/// The in-memory DAG of blocks that have passed proof-of-work validation.
///
/// All mutations take `&mut self` and leave the indices mutually consistent
/// when they return. The store is meant to be owned by a single writer; see
/// [`BlockCache`] for the lock-based wrapper. Cloning is cheap thanks to
/// persistent collections and yields an independent snapshot.
///
/// [`BlockCache`]: crate::cache::BlockCache
#[derive(Clone)]
pub struct Store {
    chain_config: Arc<ChainConfig>,
    store_config: StoreConfig,
    blocks: HashMap<IndepHash, CacheEntry>,
    // Ordered by `(height, hash)`. Scanned from the bottom when pruning and
    // when the heaviest block is removed.
    heights: OrdSet<(Height, IndepHash)>,
    solutions: HashMap<SolutionHash, HashSet<IndepHash>>,
    max_cdiff: (CumulativeDiff, IndepHash),
    tip: IndepHash,
    longest_chain: ChainSummary,
}

impl Store {
    /// Starts a cache containing a single on-chain block.
    #[must_use]
    pub fn new(
        chain_config: Arc<ChainConfig>,
        store_config: StoreConfig,
        block: Arc<Block>,
        ignore_registry: &impl IgnoreRegistry,
    ) -> Self {
        let indep_hash = block.indep_hash;
        let cumulative_diff = block.cumulative_diff;

        let mut store = Self {
            chain_config,
            store_config,
            blocks: HashMap::new(),
            heights: OrdSet::new(),
            solutions: HashMap::new(),
            max_cdiff: (cumulative_diff, indep_hash),
            tip: indep_hash,
            longest_chain: ChainSummary::default(),
        };

        store.insert_entry(block, BlockStatus::OnChain, ignore_registry);
        store.refresh_longest_chain();
        store
    }

    /// Rebuilds the cache from a chain of validated blocks sorted newest
    /// first, typically loaded from persistent storage on startup. Every
    /// block ends up on chain and the newest one becomes the tip.
    ///
    /// # Errors
    ///
    /// Fails if the blocks do not form a chain in the given order.
    pub fn from_list(
        chain_config: Arc<ChainConfig>,
        store_config: StoreConfig,
        blocks: Vec<Arc<Block>>,
        ignore_registry: &impl IgnoreRegistry,
    ) -> Result<Self> {
        let (newest, rest) = blocks
            .split_first()
            .expect("the block list should not be empty");

        let oldest = rest.last().unwrap_or(newest).clone();

        let mut store = Self::new(chain_config, store_config, oldest, ignore_registry);

        for block in blocks.iter().rev().skip(1) {
            store.add_validated(block.clone(), ignore_registry)?;
        }

        store.mark_tip(newest.indep_hash)?;

        Ok(store)
    }

    #[must_use]
    pub fn chain_config(&self) -> &ChainConfig {
        &self.chain_config
    }

    #[must_use]
    pub const fn store_config(&self) -> StoreConfig {
        self.store_config
    }

    #[must_use]
    pub const fn tip(&self) -> IndepHash {
        self.tip
    }

    #[must_use]
    pub const fn max_cumulative_diff(&self) -> (CumulativeDiff, IndepHash) {
        self.max_cdiff
    }

    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn contains_block(&self, indep_hash: IndepHash) -> bool {
        self.blocks.contains_key(&indep_hash)
    }

    #[must_use]
    pub fn get(&self, indep_hash: IndepHash) -> Option<&Arc<Block>> {
        self.blocks.get(&indep_hash).map(|entry| &entry.block)
    }

    #[must_use]
    pub fn get_block_and_status(&self, indep_hash: IndepHash) -> Option<WithStatus<&Arc<Block>>> {
        self.blocks.get(&indep_hash).map(|entry| WithStatus {
            value: &entry.block,
            status: entry.status,
        })
    }

    #[must_use]
    pub fn is_known_solution_hash(&self, solution_hash: SolutionHash) -> bool {
        self.solutions.contains_key(&solution_hash)
    }

    /// Returns the memoized summary of the heaviest chain.
    #[must_use]
    pub const fn get_longest_chain_block_txs_pairs(&self) -> &ChainSummary {
        &self.longest_chain
    }

    /// Inserts a block that has not been validated yet.
    ///
    /// The parent must have been inserted beforehand. The cache trusts the
    /// caller to set `block.height` to the parent height plus one.
    ///
    /// Re-adding a block that is still awaiting validation replaces the
    /// stored payload and nothing else, e.g. after the missing transactions
    /// were fetched. Re-adding an already accepted block indicates a bug in
    /// the consensus layer and is ignored with a warning.
    pub fn add(&mut self, block: Arc<Block>, ignore_registry: &impl IgnoreRegistry) {
        let indep_hash = block.indep_hash;

        if let Some(entry) = self.blocks.get_mut(&indep_hash) {
            match entry.status {
                BlockStatus::NotValidated(_) => {
                    entry.block = block;
                }
                BlockStatus::Validated | BlockStatus::OnChain => {
                    warn!("ignoring a duplicate of an already accepted block: {indep_hash:?}");
                    return;
                }
            }

            self.refresh_longest_chain();
            return;
        }

        assert!(
            self.blocks.contains_key(&block.previous_block),
            "the parent of a newly added block should be present in the cache",
        );

        self.purge_expired_alternatives(block.hash, ignore_registry);

        // The purge may have removed the parent together with an expired
        // fork sharing this solution. The new block would extend a fork
        // that no longer exists, so it is dropped the same way.
        let Some(parent) = self.blocks.get_mut(&block.previous_block) else {
            warn!("dropping a block whose fork expired while it was added: {indep_hash:?}");
            return;
        };

        parent.children.insert(indep_hash);

        let status = if self.chain_config.nonce_limiter_active_at(block.height) {
            BlockStatus::NotValidated(NotValidatedStatus::AwaitingNonceLimiterValidation)
        } else {
            BlockStatus::NotValidated(NotValidatedStatus::AwaitingValidation)
        };

        self.insert_entry(block, status, ignore_registry);
        self.refresh_longest_chain();
    }

    /// Inserts a fully validated block, or promotes the existing entry to
    /// `Validated`. An entry that is already on chain keeps its status.
    ///
    /// # Errors
    ///
    /// Fails if the parent is missing from the cache or has not been
    /// validated itself. Both indicate a bug in the validation pipeline:
    /// validated blocks must arrive in topological order.
    pub fn add_validated(
        &mut self,
        block: Arc<Block>,
        ignore_registry: &impl IgnoreRegistry,
    ) -> Result<()> {
        let indep_hash = block.indep_hash;
        let previous_block = block.previous_block;

        match self.blocks.get(&previous_block) {
            None => return Err(Error::PreviousBlockNotFound { previous_block }.into()),
            Some(parent) => {
                if matches!(parent.status, BlockStatus::NotValidated(_)) {
                    return Err(Error::PreviousBlockNotValidated { previous_block }.into());
                }
            }
        }

        if let Some(entry) = self.blocks.get_mut(&indep_hash) {
            entry.block = block;

            if !entry.status.is_on_chain() {
                entry.status = BlockStatus::Validated;
            }
        } else {
            self.purge_expired_alternatives(block.hash, ignore_registry);

            // The purge may have removed the parent together with an
            // expired fork sharing this solution.
            if !self.blocks.contains_key(&previous_block) {
                return Err(Error::PreviousBlockNotFound { previous_block }.into());
            }

            self.insert_entry(block, BlockStatus::Validated, ignore_registry);
        }

        self.blocks
            .get_mut(&previous_block)
            .expect("the parent presence is checked above")
            .children
            .insert(indep_hash);

        self.refresh_longest_chain();
        Ok(())
    }

    /// Records that the nonce limiter validation of the block has been
    /// scheduled. Ignored when the block is absent or in another state;
    /// producers may race with removals.
    pub fn mark_nonce_limiter_validation_scheduled(&mut self, indep_hash: IndepHash) {
        self.advance_nonce_limiter_status(
            indep_hash,
            NotValidatedStatus::AwaitingNonceLimiterValidation,
            NotValidatedStatus::NonceLimiterValidationScheduled,
        );
    }

    /// Records that the nonce limiter validation of the block has succeeded,
    /// making the block eligible for the chain summary. Ignored when the
    /// block is absent or in another state.
    pub fn mark_nonce_limiter_validated(&mut self, indep_hash: IndepHash) {
        self.advance_nonce_limiter_status(
            indep_hash,
            NotValidatedStatus::NonceLimiterValidationScheduled,
            NotValidatedStatus::NonceLimiterValidated,
        );
    }

    fn advance_nonce_limiter_status(
        &mut self,
        indep_hash: IndepHash,
        from: NotValidatedStatus,
        to: NotValidatedStatus,
    ) {
        let Some(entry) = self.blocks.get_mut(&indep_hash) else {
            return;
        };

        if entry.status == BlockStatus::NotValidated(from) {
            entry.status = BlockStatus::NotValidated(to);
            self.refresh_longest_chain();
        }
    }

    /// Makes the given block the tip of the canonical chain, promoting its
    /// validated ancestors to on-chain and recoloring the displaced fork.
    /// Moving the tip back to one of its ancestors flips the abandoned
    /// forward path off chain as well.
    ///
    /// The operation is atomic: when it fails, no status change is
    /// committed.
    ///
    /// # Errors
    ///
    /// Fails if the block is unknown or if any ancestor below the fork
    /// junction has not been validated yet.
    pub fn mark_tip(&mut self, indep_hash: IndepHash) -> Result<()> {
        if !self.blocks.contains_key(&indep_hash) {
            return Err(Error::BlockNotFound { block: indep_hash }.into());
        }

        // Walk the ancestry before changing anything so that a failure
        // leaves the cache untouched.
        let mut to_promote = vec![indep_hash];
        let mut displaced_junction = None;

        loop {
            let child = *to_promote.last().expect("to_promote starts non-empty");

            let parent_hash = self
                .blocks
                .get(&child)
                .expect("every hash in to_promote was looked up during the walk")
                .block
                .previous_block;

            let Some(parent) = self.blocks.get(&parent_hash) else {
                // `child` is the lowest cached block; there is no fork to
                // displace.
                break;
            };

            match parent.status {
                BlockStatus::NotValidated(_) => {
                    return Err(Error::InvalidTip {
                        tip: indep_hash,
                        ancestor: parent_hash,
                    }
                    .into());
                }
                BlockStatus::OnChain => {
                    displaced_junction = Some((parent_hash, child));
                    break;
                }
                BlockStatus::Validated => to_promote.push(parent_hash),
            }
        }

        for hash in to_promote {
            self.blocks
                .get_mut(&hash)
                .expect("the promotion walk only collected cached blocks")
                .status = BlockStatus::OnChain;
        }

        if let Some((junction, arrived_from)) = displaced_junction {
            let displaced = self
                .blocks
                .get(&junction)
                .expect("the junction was found during the promotion walk")
                .children
                .iter()
                .copied()
                .filter(|child| *child != arrived_from)
                .collect_vec();

            for child in displaced {
                self.demote_on_chain_subtree(child);
            }
        }

        // When the tip moves back to one of its ancestors, the blocks that
        // used to sit above it are abandoned; flip that forward path off
        // chain too.
        let forward = self
            .blocks
            .get(&indep_hash)
            .expect("the new tip presence is checked above")
            .children
            .iter()
            .copied()
            .collect_vec();

        for child in forward {
            self.demote_on_chain_subtree(child);
        }

        self.tip = indep_hash;
        self.refresh_longest_chain();
        Ok(())
    }

    // Flips the on-chain blocks of a displaced fork back to validated.
    // Validated and not yet validated blocks never have on-chain
    // descendants, so the walk does not descend into them.
    fn demote_on_chain_subtree(&mut self, root: IndepHash) {
        let mut stack = vec![root];

        while let Some(hash) = stack.pop() {
            let entry = self
                .blocks
                .get_mut(&hash)
                .expect("children sets only refer to cached blocks");

            if entry.status.is_on_chain() {
                entry.status = BlockStatus::Validated;
                stack.extend(entry.children.iter().copied());
            }
        }
    }

    /// Finds the deepest block of the heaviest fork that still awaits
    /// validation, or `None` when the tip is at least as heavy as any cached
    /// block. A heaviest block that is already validated also yields `None`:
    /// its promotion to tip is the caller's next move.
    #[must_use]
    pub fn get_earliest_not_validated_from_longest_chain(&self) -> Option<EarliestNotValidated> {
        let (max_cdiff, heaviest) = self.max_cdiff;

        let tip_cdiff = self
            .blocks
            .get(&self.tip)
            .expect("the tip always refers to a cached block")
            .block
            .cumulative_diff;

        if tip_cdiff >= max_cdiff {
            return None;
        }

        let mut entry = self
            .blocks
            .get(&heaviest)
            .expect("Store.max_cdiff always refers to a cached block");

        if !matches!(entry.status, BlockStatus::NotValidated(_)) {
            return None;
        }

        loop {
            let parent = self
                .blocks
                .get(&entry.block.previous_block)
                .expect("a block awaiting validation always has its parent cached");

            if matches!(parent.status, BlockStatus::NotValidated(_)) {
                entry = parent;
            } else {
                break;
            }
        }

        let BlockStatus::NotValidated(status) = entry.status else {
            unreachable!("the walk only stops on blocks awaiting validation")
        };

        EarliestNotValidated {
            block: entry.block.clone(),
            prev_blocks: self.fork_blocks(&entry.block),
            status,
            timestamp: entry.timestamp,
        }
        .pipe(Some)
    }

    // Blocks from the parent of the given block down to and including the
    // first on-chain ancestor, sorted newest to oldest. The last element is
    // the junction with the current main chain.
    fn fork_blocks(&self, block: &Block) -> Vec<Arc<Block>> {
        let mut prev_blocks = vec![];
        let mut hash = block.previous_block;

        loop {
            let entry = self
                .blocks
                .get(&hash)
                .expect("the lowest cached block is on chain, so the walk stops before falling off");

            prev_blocks.push(entry.block.clone());

            if entry.status.is_on_chain() {
                return prev_blocks;
            }

            hash = entry.block.previous_block;
        }
    }

    /// Finds a cached block sharing the solution hash, preferring candidates
    /// that prove double-signing against the given difficulty pair: an exact
    /// cumulative difficulty twin first, then a block mined at overlapping
    /// heights, then any other member of the set.
    #[must_use]
    pub fn get_by_solution_hash(
        &self,
        solution_hash: SolutionHash,
        exclude: IndepHash,
        cumulative_diff: CumulativeDiff,
        previous_cumulative_diff: CumulativeDiff,
    ) -> Option<&Arc<Block>> {
        let candidates = self.solutions.get(&solution_hash)?;

        let mut fallback = None;
        let mut overlapping = false;

        for indep_hash in candidates {
            if *indep_hash == exclude {
                continue;
            }

            let block = &self
                .blocks
                .get(indep_hash)
                .expect("solution sets only refer to cached blocks")
                .block;

            if block.cumulative_diff == cumulative_diff {
                // An exact twin.
                return Some(block);
            }

            // Each block sits above the other's parent: the two were mined
            // at overlapping heights.
            if block.cumulative_diff > previous_cumulative_diff
                && cumulative_diff > block.previous_cumulative_diff
            {
                fallback = Some(block);
                overlapping = true;
            } else if !overlapping && fallback.is_none() {
                fallback = Some(block);
            }
        }

        fallback
    }

    /// Removes the block and all of its descendants. Unknown hashes are
    /// ignored. Must not be used on blocks of the canonical chain; the tip
    /// and its ancestors have to stay cached.
    pub fn remove(&mut self, indep_hash: IndepHash, ignore_registry: &impl IgnoreRegistry) {
        let Some(entry) = self.blocks.get(&indep_hash) else {
            return;
        };

        let previous_block = entry.block.previous_block;

        if let Some(parent) = self.blocks.get_mut(&previous_block) {
            parent.children.remove(&indep_hash);
        }

        let mut max_cdiff_removed = false;
        let mut stack = vec![indep_hash];

        while let Some(hash) = stack.pop() {
            let Some(entry) = self.delete_entry(hash, ignore_registry) else {
                continue;
            };

            stack.extend(entry.children.iter().copied());
            max_cdiff_removed |= self.max_cdiff.1 == hash;
        }

        if max_cdiff_removed {
            self.max_cdiff = self.find_max_cdiff();
        }

        self.refresh_longest_chain();
    }

    /// Drops the blocks more than `depth` below the tip together with the
    /// abandoned fork subtrees hanging off them. The lowest cached block is
    /// always on chain, before and after.
    pub fn prune(&mut self, depth: u64, ignore_registry: &impl IgnoreRegistry) {
        let tip_height = self
            .blocks
            .get(&self.tip)
            .expect("the tip always refers to a cached block")
            .block
            .height;

        let cutoff = tip_height.saturating_sub(depth);

        loop {
            let Some((height, indep_hash)) = self.heights.get_min().copied() else {
                break;
            };

            if height >= cutoff {
                break;
            }

            let children = self
                .blocks
                .get(&indep_hash)
                .expect("Store.heights only refers to cached blocks")
                .children
                .clone();

            for child in children {
                let status = self
                    .blocks
                    .get(&child)
                    .expect("children sets only refer to cached blocks")
                    .status;

                if !status.is_on_chain() {
                    self.remove(child, ignore_registry);
                }
            }

            // The remaining on-chain child becomes the new lowest block.
            self.delete_entry(indep_hash, ignore_registry)
                .expect("the minimum height entry is cached");

            if self.max_cdiff.1 == indep_hash {
                self.max_cdiff = self.find_max_cdiff();
            }
        }

        self.refresh_longest_chain();
    }

    // Registers the block in every index. The caller links the parent's
    // children set and refreshes the chain summary.
    fn insert_entry(
        &mut self,
        block: Arc<Block>,
        status: BlockStatus,
        ignore_registry: &impl IgnoreRegistry,
    ) {
        let indep_hash = block.indep_hash;

        self.solutions
            .entry(block.hash)
            .or_default()
            .insert(indep_hash);

        self.heights.insert((block.height, indep_hash));

        if block.cumulative_diff > self.max_cdiff.0 {
            self.max_cdiff = (block.cumulative_diff, indep_hash);
        }

        ignore_registry.add(indep_hash);

        self.blocks.insert(
            indep_hash,
            CacheEntry {
                block,
                status,
                timestamp: Instant::now(),
                children: HashSet::new(),
            },
        );
    }

    // Deletes a single block from every index and notifies the registry.
    // The caller takes care of the parent's children set and of rescanning
    // `Store.max_cdiff`.
    fn delete_entry(
        &mut self,
        indep_hash: IndepHash,
        ignore_registry: &impl IgnoreRegistry,
    ) -> Option<CacheEntry> {
        let entry = self.blocks.remove(&indep_hash)?;

        self.heights.remove(&(entry.block.height, indep_hash));

        if let Some(remaining) = self.solutions.get_mut(&entry.block.hash) {
            remaining.remove(&indep_hash);

            if remaining.is_empty() {
                self.solutions.remove(&entry.block.hash);
            }
        }

        ignore_registry.remove(indep_hash);

        Some(entry)
    }

    fn find_max_cdiff(&self) -> (CumulativeDiff, IndepHash) {
        // Scanning in `(height, hash)` order with a strictly-greater fold
        // keeps ties deterministic.
        self.heights
            .iter()
            .map(|(_, indep_hash)| {
                let cumulative_diff = self
                    .blocks
                    .get(indep_hash)
                    .expect("Store.heights only refers to cached blocks")
                    .block
                    .cumulative_diff;

                (cumulative_diff, *indep_hash)
            })
            .fold(
                None,
                |max: Option<(CumulativeDiff, IndepHash)>, candidate| match max {
                    Some((max_cdiff, _)) if candidate.0 <= max_cdiff => max,
                    _ => Some(candidate),
                },
            )
            .expect("the canonical chain always stays cached")
    }

    // Removes the unvalidated blocks whose lifetime has run out from the set
    // of blocks sharing this solution hash. Blocks on chain are never aged
    // out.
    fn purge_expired_alternatives(
        &mut self,
        solution_hash: SolutionHash,
        ignore_registry: &impl IgnoreRegistry,
    ) {
        let Some(candidates) = self.solutions.get(&solution_hash) else {
            return;
        };

        let base_lifetime = self.store_config.alternative_block_expiration_time_seconds;

        let expired = candidates
            .iter()
            .copied()
            .filter(|indep_hash| {
                let entry = self
                    .blocks
                    .get(indep_hash)
                    .expect("solution sets only refer to cached blocks");

                let lifetime = Duration::from_secs(base_lifetime * self.fork_length(*indep_hash));

                !entry.status.is_on_chain() && entry.timestamp.elapsed() > lifetime
            })
            .collect_vec();

        for indep_hash in expired {
            self.remove(indep_hash, ignore_registry);
        }
    }

    // 1 + the number of blocks on the longest chain of descendants.
    fn fork_length(&self, indep_hash: IndepHash) -> u64 {
        let mut max_length = 0;
        let mut stack = vec![(indep_hash, 1)];

        while let Some((hash, length)) = stack.pop() {
            max_length = max_length.max(length);

            let children = &self
                .blocks
                .get(&hash)
                .expect("children sets only refer to cached blocks")
                .children;

            stack.extend(children.iter().map(|child| (*child, length + 1)));
        }

        max_length
    }

    // Recomputed after every mutation so that readers get the summary with a
    // plain lookup.
    fn refresh_longest_chain(&mut self) {
        self.longest_chain = self.compute_longest_chain();
    }

    fn compute_longest_chain(&self) -> ChainSummary {
        let max_len = usize::try_from(self.store_config.store_blocks_behind_current)
            .expect("StoreConfig.store_blocks_behind_current should fit into usize");

        'restart: loop {
            let (_, heaviest) = self.max_cdiff;

            let mut block_txs_pairs = Vec::new();
            let mut not_on_chain_count = 0;
            let mut on_chain_reached = false;
            let mut current = heaviest;

            while block_txs_pairs.len() < max_len {
                // The walk may fall off the pruned bottom of the cache.
                let Some(entry) = self.blocks.get(&current) else {
                    break;
                };

                // Blocks this early in nonce limiter validation are not
                // ready to be published; start the summary at their parent.
                if block_txs_pairs.is_empty() && entry.status.pending_nonce_limiter() {
                    current = entry.block.previous_block;
                    continue;
                }

                match entry.status {
                    BlockStatus::OnChain => on_chain_reached = true,
                    // An off-chain block below an on-chain one means the
                    // chain was reorganized under the walk; start over.
                    _ if on_chain_reached => continue 'restart,
                    BlockStatus::NotValidated(_) | BlockStatus::Validated => {
                        not_on_chain_count += 1;
                    }
                }

                block_txs_pairs.push((current, entry.block.txs.clone()));
                current = entry.block.previous_block;
            }

            return ChainSummary {
                block_txs_pairs,
                not_on_chain_count,
            };
        }
    }
}

#[cfg(test)]
impl Store {
    /// Checks every structural invariant the indices promise each other.
    pub(crate) fn assert_internally_consistent(&self) {
        for (hash, entry) in &self.blocks {
            if let Some(parent) = self.blocks.get(&entry.block.previous_block) {
                assert!(
                    parent.children.contains(hash),
                    "the parent of {hash:?} does not list it as a child",
                );
            }

            for child in &entry.children {
                let child_entry = self
                    .blocks
                    .get(child)
                    .expect("children sets only refer to cached blocks");

                assert_eq!(child_entry.block.previous_block, *hash);
            }

            assert!(self.heights.contains(&(entry.block.height, *hash)));

            assert!(self
                .solutions
                .get(&entry.block.hash)
                .is_some_and(|candidates| candidates.contains(hash)));

            if matches!(entry.status, BlockStatus::NotValidated(_)) {
                for child in &entry.children {
                    let child_status = self
                        .blocks
                        .get(child)
                        .expect("children sets only refer to cached blocks")
                        .status;

                    assert!(
                        !child_status.is_on_chain(),
                        "a block awaiting validation has an on-chain descendant: {hash:?}",
                    );
                }
            }
        }

        assert_eq!(self.heights.len(), self.blocks.len());

        for (solution_hash, candidates) in &self.solutions {
            assert!(
                !candidates.is_empty(),
                "solution sets are deleted when they become empty",
            );

            for hash in candidates {
                let entry = self
                    .blocks
                    .get(hash)
                    .expect("solution sets only refer to cached blocks");

                assert_eq!(entry.block.hash, *solution_hash);
            }
        }

        let (max_cdiff, heaviest) = self.max_cdiff;

        assert_eq!(
            self.blocks
                .get(&heaviest)
                .expect("Store.max_cdiff always refers to a cached block")
                .block
                .cumulative_diff,
            max_cdiff,
        );

        assert!(self
            .blocks
            .values()
            .all(|entry| entry.block.cumulative_diff <= max_cdiff));

        let tip_entry = self
            .blocks
            .get(&self.tip)
            .expect("the tip always refers to a cached block");

        assert!(tip_entry.status.is_on_chain());

        let mut on_chain_path_length = 0;
        let mut current = self.tip;

        loop {
            on_chain_path_length += 1;

            let entry = self
                .blocks
                .get(&current)
                .expect("the on-chain walk only visits cached blocks");

            match self.blocks.get(&entry.block.previous_block) {
                Some(parent) => {
                    assert!(
                        parent.status.is_on_chain(),
                        "an ancestor of the tip is not on chain: {:?}",
                        entry.block.previous_block,
                    );

                    current = entry.block.previous_block;
                }
                None => break,
            }
        }

        let on_chain_count = self
            .blocks
            .values()
            .filter(|entry| entry.status.is_on_chain())
            .count();

        assert_eq!(
            on_chain_count, on_chain_path_length,
            "every on-chain block lies on the path from the tip to the lowest block",
        );

        let summary = &self.longest_chain;

        let max_len = usize::try_from(self.store_config.store_blocks_behind_current)
            .expect("StoreConfig.store_blocks_behind_current should fit into usize");

        assert!(summary.block_txs_pairs.len() <= max_len);

        for (newer, older) in summary
            .block_txs_pairs
            .iter()
            .zip(summary.block_txs_pairs.iter().skip(1))
        {
            let entry = self
                .blocks
                .get(&newer.0)
                .expect("the chain summary only refers to cached blocks");

            assert_eq!(entry.block.txs, newer.1);
            assert_eq!(entry.block.previous_block, older.0);
        }

        let not_on_chain_recount = summary
            .block_txs_pairs
            .iter()
            .filter(|(hash, _)| {
                !self
                    .blocks
                    .get(hash)
                    .expect("the chain summary only refers to cached blocks")
                    .status
                    .is_on_chain()
            })
            .count();

        assert_eq!(not_on_chain_recount, summary.not_on_chain_count);
    }
}
