pub use primitive_types::{H256, H384, U256};

/// 48-byte identifier of a complete block. Unique by construction.
pub type IndepHash = H384;

/// 32-byte proof-of-work output. Not unique: distinct blocks may carry the
/// same solution when miners solve the same slot.
pub type SolutionHash = H256;

pub type TxId = H256;

/// Monotonic big-integer weight of a chain. Higher is heavier.
pub type CumulativeDiff = U256;

pub type Height = u64;
