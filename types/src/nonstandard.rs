use serde::{Deserialize, Serialize};

/// The cache's coloring of a block. Only on-chain blocks form the canonical
/// chain; everything else is a fork candidate in some stage of validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockStatus {
    NotValidated(NotValidatedStatus),
    Validated,
    OnChain,
}

/// Progress of a block that has not passed full validation yet.
///
/// The nonce limiter stages form a linear progression:
/// `AwaitingNonceLimiterValidation → NonceLimiterValidationScheduled →
/// NonceLimiterValidated`. Blocks below the fork 2.6 activation height skip
/// the nonce limiter entirely and start out as `AwaitingValidation`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotValidatedStatus {
    AwaitingNonceLimiterValidation,
    NonceLimiterValidationScheduled,
    NonceLimiterValidated,
    AwaitingValidation,
}

impl BlockStatus {
    #[must_use]
    pub const fn is_on_chain(self) -> bool {
        matches!(self, Self::OnChain)
    }

    #[must_use]
    pub const fn is_validated(self) -> bool {
        matches!(self, Self::Validated)
    }

    /// True while the block is too early in nonce limiter validation to be
    /// exposed in chain summaries.
    #[must_use]
    pub const fn pending_nonce_limiter(self) -> bool {
        matches!(
            self,
            Self::NotValidated(
                NotValidatedStatus::AwaitingNonceLimiterValidation
                    | NotValidatedStatus::NonceLimiterValidationScheduled,
            ),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WithStatus<T> {
    pub value: T,
    pub status: BlockStatus,
}

impl<T> WithStatus<T> {
    pub fn map<U>(self, function: impl FnOnce(T) -> U) -> WithStatus<U> {
        let Self { value, status } = self;

        WithStatus {
            value: function(value),
            status,
        }
    }
}
