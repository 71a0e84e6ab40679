use thiserror::Error;
use types::primitives::IndepHash;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("previous block not found in the cache: {previous_block:?}")]
    PreviousBlockNotFound { previous_block: IndepHash },
    #[error("previous block has not been validated yet: {previous_block:?}")]
    PreviousBlockNotValidated { previous_block: IndepHash },
    #[error("cannot make {tip:?} the tip: its ancestor {ancestor:?} has not been validated")]
    InvalidTip {
        tip: IndepHash,
        ancestor: IndepHash,
    },
    #[error("block not found in the cache: {block:?}")]
    BlockNotFound { block: IndepHash },
}
