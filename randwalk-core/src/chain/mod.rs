//! Top-level module for the weighted-random-walk engine.
//!
//! A [`Chain`] owns an insertion-ordered store of unique states; each state
//! carries a list of weighted outgoing edges built from observed transition
//! counts. Walks are sampled with an explicit, caller-supplied random source,
//! so seeding the generator identically reproduces identical walks.

/// Engine error conditions (empty chain, dead ends, invalid bounds).
pub mod error;

/// Internal representation of a single state and its weighted edge table.
/// Not exposed publicly; states are addressed through [`StateId`] handles.
mod state;

/// The chain itself: state store, deduplication, sampling and merging.
mod store;

/// Bounded walk generation over a populated chain.
mod walk;

pub use error::ChainError;
pub use state::{StateId, WalkState};
pub use store::Chain;
