//! In-memory DAG of the blocks that have passed proof-of-work validation.
//!
//! The cache sits between gossip intake, nonce limiter validation and full
//! block validation. It answers every fork choice question the node asks:
//! which block should be validated next, what the heaviest chain looks like,
//! and whether a solution hash has been seen before.
//!
//! Five pieces cooperate inside one state object:
//! - the block store, mapping an indep hash to the block, its validation
//!   status, its insertion time and its children;
//! - the height index, ordered by `(height, hash)` and scanned from the
//!   bottom when pruning and when the heaviest block is removed;
//! - the solution index, grouping blocks that share a proof-of-work output
//!   so that double-signing can be detected and unvalidated alternatives can
//!   be aged out;
//! - the max-cdiff pointer, caching the current heaviest tip candidate;
//! - the tip pointer together with a memoized summary of the heaviest chain,
//!   refreshed after every mutation so reads are plain lookups.
//!
//! Every mutation leaves the indices mutually consistent. Exactly one path
//! of on-chain blocks runs from the tip down to the lowest cached block;
//! reorganizations recolor the displaced fork atomically.
//!
//! The cache is owned by a single writer. [`BlockCache`] wraps the store in
//! a lock so that other tasks can read snapshots without coordination; no
//! operation suspends or performs I/O while holding the lock. [`Store`] uses
//! persistent collections, so cloning one is cheap and yields an independent
//! snapshot.

pub use crate::{
    cache::BlockCache,
    error::Error,
    misc::{ChainSummary, EarliestNotValidated, IgnoreRegistry, NullIgnoreRegistry},
    store::Store,
    store_config::StoreConfig,
};

mod cache;
mod error;
mod misc;
mod store;
mod store_config;

#[cfg(test)]
mod helpers;
