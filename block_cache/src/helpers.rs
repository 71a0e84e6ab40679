use std::sync::Arc;

use parking_lot::Mutex;
use types::{
    config::Config as ChainConfig,
    containers::Block,
    primitives::{CumulativeDiff, IndepHash, SolutionHash, TxId},
};

use crate::{
    misc::{IgnoreRegistry, NullIgnoreRegistry},
    store::Store,
    store_config::StoreConfig,
};

// Numbered fixtures keep the tests readable: block N carries indep hash N
// and solution hash N unless overridden.

pub fn indep_hash(number: u64) -> IndepHash {
    IndepHash::from_low_u64_be(number)
}

pub fn solution_hash(number: u64) -> SolutionHash {
    SolutionHash::from_low_u64_be(number)
}

pub fn tx_id(number: u64) -> TxId {
    TxId::from_low_u64_be(number)
}

pub fn genesis() -> Arc<Block> {
    Arc::new(Block {
        indep_hash: indep_hash(1),
        previous_block: IndepHash::zero(),
        hash: solution_hash(1),
        cumulative_diff: CumulativeDiff::zero(),
        previous_cumulative_diff: CumulativeDiff::zero(),
        height: 0,
        txs: vec![],
    })
}

pub fn on_top(parent: &Block, number: u64) -> Arc<Block> {
    Arc::new(Block {
        indep_hash: indep_hash(number),
        previous_block: parent.indep_hash,
        hash: solution_hash(number),
        cumulative_diff: parent.cumulative_diff + CumulativeDiff::one(),
        previous_cumulative_diff: parent.cumulative_diff,
        height: parent.height + 1,
        txs: vec![],
    })
}

pub fn on_top_with_diff(parent: &Block, number: u64, cumulative_diff: u64) -> Arc<Block> {
    let mut block = Block::clone(&on_top(parent, number));
    block.cumulative_diff = CumulativeDiff::from(cumulative_diff);
    Arc::new(block)
}

pub fn with_solution_hash(block: &Arc<Block>, hash: SolutionHash) -> Arc<Block> {
    let mut block = Block::clone(block);
    block.hash = hash;
    Arc::new(block)
}

pub fn with_txs(block: &Arc<Block>, txs: Vec<TxId>) -> Arc<Block> {
    let mut block = Block::clone(block);
    block.txs = txs;
    Arc::new(block)
}

pub fn with_diffs(
    block: &Arc<Block>,
    cumulative_diff: u64,
    previous_cumulative_diff: u64,
) -> Arc<Block> {
    let mut block = Block::clone(block);
    block.cumulative_diff = CumulativeDiff::from(cumulative_diff);
    block.previous_cumulative_diff = CumulativeDiff::from(previous_cumulative_diff);
    Arc::new(block)
}

pub fn minimal_store(block: Arc<Block>) -> Store {
    Store::new(
        Arc::new(ChainConfig::minimal()),
        StoreConfig::default(),
        block,
        &NullIgnoreRegistry,
    )
}

/// Registry hook recording every notification for later assertions.
#[derive(Default)]
pub struct RecordingIgnoreRegistry {
    added: Mutex<Vec<IndepHash>>,
    removed: Mutex<Vec<IndepHash>>,
}

impl RecordingIgnoreRegistry {
    pub fn added(&self) -> Vec<IndepHash> {
        self.added.lock().clone()
    }

    pub fn removed(&self) -> Vec<IndepHash> {
        self.removed.lock().clone()
    }
}

impl IgnoreRegistry for RecordingIgnoreRegistry {
    fn add(&self, indep_hash: IndepHash) {
        self.added.lock().push(indep_hash);
    }

    fn remove(&self, indep_hash: IndepHash) {
        self.removed.lock().push(indep_hash);
    }
}
