use serde::{Deserialize, Serialize};

use crate::primitives::{CumulativeDiff, Height, IndepHash, SolutionHash, TxId};

/// The block fields the cache consumes. The cache never parses, serializes
/// or validates blocks; serde is derived for the gossip and API boundaries
/// that feed it.
///
/// `height` is trusted to equal the parent's height plus one. The cache does
/// not verify the link.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub indep_hash: IndepHash,
    pub previous_block: IndepHash,
    pub hash: SolutionHash,
    pub cumulative_diff: CumulativeDiff,
    pub previous_cumulative_diff: CumulativeDiff,
    pub height: Height,
    pub txs: Vec<TxId>,
}
