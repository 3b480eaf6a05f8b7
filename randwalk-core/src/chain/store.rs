use rand::Rng;

use serde::{Deserialize, Serialize};

use super::error::ChainError;
use super::state::{State, StateId, WalkState};

/// A directed, frequency-weighted transition graph over payloads of type `T`.
///
/// The chain owns every payload it stores: values are cloned once at first
/// insertion and released exactly once when the chain is dropped. Edges hold
/// [`StateId`] handles, never references, so the whole graph tears down as a
/// single store drop.
///
/// ## Responsibilities
/// - Deduplicate states by payload equality, preserving insertion order
/// - Accumulate transition observations as edge weights
/// - Sample successors and start states with a caller-supplied random source
/// - Merge chains built independently over the same domain
///
/// ## Invariants
/// - At most one state per distinct value
/// - Edge weights are strictly positive and only ever grow
/// - No state is ever removed once added
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Chain<T: WalkState> {
	states: Vec<State<T>>,
}

impl<T: WalkState> Chain<T> {
	/// Creates an empty chain.
	pub fn new() -> Self {
		Self { states: Vec::new() }
	}

	/// Number of distinct states in the store.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	/// True if no state has been added yet.
	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Looks up the state holding a value equal to `value`.
	///
	/// Linear scan over the store in insertion order; adequate at the store
	/// sizes the bundled domains produce (at most a few thousand states).
	pub fn find(&self, value: &T) -> Option<StateId> {
		self.states
			.iter()
			.position(|state| state.value == *value)
			.map(StateId)
	}

	/// Returns the existing state for `value`, or clones and appends it.
	///
	/// New states start with an empty edge list and go to the tail of the
	/// store, so insertion order is preserved. Calling this twice with equal
	/// values returns the same handle.
	pub fn add_or_get(&mut self, value: &T) -> StateId {
		if let Some(id) = self.find(value) {
			return id;
		}
		let id = StateId(self.states.len());
		self.states.push(State::new(value.clone()));
		id
	}

	/// Records one observation of the transition `from -> to`.
	///
	/// If the edge already exists its weight is incremented, otherwise it is
	/// appended with weight 1. Edges are unique per target.
	pub fn add_or_increment_edge(&mut self, from: StateId, to: StateId) {
		self.states[from.0].add_edge(to, 1);
	}

	/// Borrow the payload of a state.
	pub fn value(&self, id: StateId) -> &T {
		&self.states[id.0].value
	}

	/// True if the state's payload is terminal.
	pub fn is_terminal(&self, id: StateId) -> bool {
		self.states[id.0].value.is_terminal()
	}

	/// Iterates over all payloads in insertion order.
	pub fn values(&self) -> impl Iterator<Item = &T> {
		self.states.iter().map(|state| &state.value)
	}

	/// Sum of the outgoing edge weights of a state; 0 if it has no edges.
	pub fn total_weight(&self, id: StateId) -> usize {
		self.states[id.0].total_weight()
	}

	/// Number of distinct outgoing edges of a state.
	pub fn edge_count(&self, id: StateId) -> usize {
		self.states[id.0].edges.len()
	}

	/// Iterates over the `(target, weight)` pairs of a state in insertion order.
	pub fn edges(&self, id: StateId) -> impl Iterator<Item = (StateId, usize)> {
		self.states[id.0]
			.edges
			.iter()
			.map(|edge| (edge.target, edge.weight))
	}

	/// Samples a successor of `id` proportionally to edge weights.
	///
	/// # Errors
	/// Returns [`ChainError::NoTransitions`] if the state has no outgoing
	/// edge. Collaborators normally rule this out by checking
	/// [`Chain::is_terminal`] first.
	pub fn pick_next<R: Rng + ?Sized>(
		&self,
		id: StateId,
		rng: &mut R,
	) -> Result<StateId, ChainError> {
		self.states[id.0].pick(rng).ok_or(ChainError::NoTransitions)
	}

	/// Samples a uniformly random non-terminal start state.
	///
	/// Draws uniform indices over the store and rejects terminal states. The
	/// retry loop is entered only after confirming a non-terminal state
	/// exists, so it terminates with probability 1 instead of spinning
	/// forever on an all-terminal chain.
	///
	/// # Errors
	/// - [`ChainError::EmptyChain`] if the store is empty
	/// - [`ChainError::NoNonTerminalStart`] if every state is terminal
	pub fn pick_start<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<StateId, ChainError> {
		if self.states.is_empty() {
			return Err(ChainError::EmptyChain);
		}
		if self.states.iter().all(|state| state.value.is_terminal()) {
			return Err(ChainError::NoNonTerminalStart);
		}

		loop {
			let id = StateId(rng.random_range(0..self.states.len()));
			if !self.states[id.0].value.is_terminal() {
				return Ok(id);
			}
		}
	}

	/// Merges another chain built over the same domain into this one.
	///
	/// States of `other` are added in `other`'s insertion order (existing
	/// values keep their current handle) and edge weights are summed through
	/// a handle translation table. Intended for combining partial chains
	/// built in parallel.
	pub fn merge(&mut self, other: &Self) {
		let mapping: Vec<StateId> = other
			.states
			.iter()
			.map(|state| self.add_or_get(&state.value))
			.collect();

		for (state, &from) in other.states.iter().zip(&mapping) {
			for edge in &state.edges {
				self.states[from.0].add_edge(mapping[edge.target.0], edge.weight);
			}
		}
	}
}

impl<T: WalkState> Default for Chain<T> {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[derive(Clone, Debug, PartialEq, Eq)]
	struct Tok(&'static str);

	impl WalkState for Tok {
		fn is_terminal(&self) -> bool {
			self.0.ends_with('.')
		}
	}

	#[test]
	fn add_or_get_deduplicates() {
		let mut chain = Chain::new();
		let a = chain.add_or_get(&Tok("a"));
		let b = chain.add_or_get(&Tok("b"));
		let a_again = chain.add_or_get(&Tok("a"));

		assert_eq!(a, a_again);
		assert_ne!(a, b);
		assert_eq!(chain.len(), 2);
		assert_eq!(chain.find(&Tok("a")), Some(a));
		assert_eq!(chain.find(&Tok("missing")), None);
	}

	#[test]
	fn insertion_order_is_preserved() {
		let mut chain = Chain::new();
		for word in ["c", "a", "b"] {
			chain.add_or_get(&Tok(word));
		}
		let order: Vec<&str> = chain.values().map(|tok| tok.0).collect();
		assert_eq!(order, vec!["c", "a", "b"]);
	}

	#[test]
	fn duplicate_edge_increments_weight() {
		let mut chain = Chain::new();
		let a = chain.add_or_get(&Tok("a"));
		let b = chain.add_or_get(&Tok("b"));

		chain.add_or_increment_edge(a, b);
		assert_eq!(chain.edge_count(a), 1);
		assert_eq!(chain.total_weight(a), 1);

		chain.add_or_increment_edge(a, b);
		assert_eq!(chain.edge_count(a), 1);
		assert_eq!(chain.total_weight(a), 2);
	}

	#[test]
	fn total_weight_is_zero_without_edges() {
		let mut chain = Chain::new();
		let a = chain.add_or_get(&Tok("a"));
		assert_eq!(chain.total_weight(a), 0);
	}

	#[test]
	fn pick_next_returns_a_known_target() {
		let mut chain = Chain::new();
		let a = chain.add_or_get(&Tok("a"));
		let b = chain.add_or_get(&Tok("b"));
		let c = chain.add_or_get(&Tok("c"));
		chain.add_or_increment_edge(a, b);
		chain.add_or_increment_edge(a, c);

		let mut rng = StdRng::seed_from_u64(7);
		for _ in 0..100 {
			let next = chain.pick_next(a, &mut rng).unwrap();
			assert!(next == b || next == c);
		}
	}

	#[test]
	fn pick_next_on_dead_end_fails() {
		let mut chain = Chain::new();
		let a = chain.add_or_get(&Tok("a"));
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(chain.pick_next(a, &mut rng), Err(ChainError::NoTransitions));
	}

	#[test]
	fn pick_next_follows_weight_distribution() {
		let mut chain = Chain::new();
		let a = chain.add_or_get(&Tok("a"));
		let b = chain.add_or_get(&Tok("b"));
		let c = chain.add_or_get(&Tok("c"));
		chain.add_or_increment_edge(a, b);
		for _ in 0..3 {
			chain.add_or_increment_edge(a, c);
		}

		let mut rng = StdRng::seed_from_u64(42);
		let draws = 10_000;
		let mut hits_b = 0usize;
		for _ in 0..draws {
			if chain.pick_next(a, &mut rng).unwrap() == b {
				hits_b += 1;
			}
		}

		// Expected frequency 1/4; tolerance is well above sampling noise.
		let freq = hits_b as f64 / draws as f64;
		assert!((freq - 0.25).abs() < 0.02, "observed frequency {freq}");
	}

	#[test]
	fn pick_start_skips_terminal_states() {
		let mut chain = Chain::new();
		let _end = chain.add_or_get(&Tok("end."));
		let a = chain.add_or_get(&Tok("a"));
		let _other_end = chain.add_or_get(&Tok("other."));

		let mut rng = StdRng::seed_from_u64(3);
		for _ in 0..50 {
			assert_eq!(chain.pick_start(&mut rng).unwrap(), a);
		}
	}

	#[test]
	fn pick_start_on_empty_chain_fails() {
		let chain: Chain<Tok> = Chain::new();
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(chain.pick_start(&mut rng), Err(ChainError::EmptyChain));
	}

	#[test]
	fn pick_start_with_only_terminal_states_fails() {
		let mut chain = Chain::new();
		chain.add_or_get(&Tok("a."));
		chain.add_or_get(&Tok("b."));
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(
			chain.pick_start(&mut rng),
			Err(ChainError::NoNonTerminalStart)
		);
	}

	#[test]
	fn merge_sums_weights_and_deduplicates() {
		let mut left = Chain::new();
		let la = left.add_or_get(&Tok("a"));
		let lb = left.add_or_get(&Tok("b"));
		left.add_or_increment_edge(la, lb);

		let mut right = Chain::new();
		let ra = right.add_or_get(&Tok("a"));
		let rb = right.add_or_get(&Tok("b"));
		let rc = right.add_or_get(&Tok("c"));
		right.add_or_increment_edge(ra, rb);
		right.add_or_increment_edge(ra, rc);

		left.merge(&right);

		assert_eq!(left.len(), 3);
		assert_eq!(left.edge_count(la), 2);
		let weights: Vec<(StateId, usize)> = left.edges(la).collect();
		assert_eq!(weights[0], (lb, 2));
		assert_eq!(weights[1].1, 1);
	}
}
