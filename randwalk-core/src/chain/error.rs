use thiserror::Error;

/// Errors surfaced by sampling and walk generation.
///
/// Population never fails: growing the store or an edge table follows normal
/// collection semantics, and payload duplication is plain [`Clone`]. The
/// conditions below are the precondition violations a collaborator can run
/// into when querying a chain it populated.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainError {
	/// The chain contains no states at all.
	#[error("chain has no states")]
	EmptyChain,

	/// Every state in the chain is terminal, so no walk can start.
	#[error("every state in the chain is terminal")]
	NoNonTerminalStart,

	/// The current state has no outgoing edges and is not terminal.
	#[error("state has no outgoing transitions")]
	NoTransitions,

	/// A walk was requested with a maximum length of zero.
	#[error("walk length must be at least 1")]
	ZeroLength,
}
