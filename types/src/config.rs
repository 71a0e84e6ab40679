use serde::{Deserialize, Serialize};

use crate::primitives::Height;

/// Network-level configuration consumed by the block cache.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// The height starting from which nonce limiter validation is a
    /// prerequisite for full block validation.
    pub fork_2_6_height: Height,
}

impl Config {
    #[must_use]
    pub const fn mainnet() -> Self {
        Self {
            fork_2_6_height: 1_132_210,
        }
    }

    /// The testing configuration. Every block goes through nonce limiter
    /// validation.
    #[must_use]
    pub const fn minimal() -> Self {
        Self { fork_2_6_height: 0 }
    }

    #[must_use]
    pub const fn nonce_limiter_active_at(&self, height: Height) -> bool {
        height >= self.fork_2_6_height
    }
}
