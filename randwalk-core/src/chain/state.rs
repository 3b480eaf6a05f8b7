use rand::Rng;

use serde::{Deserialize, Serialize};

/// Capabilities a payload must provide to be tracked by a [`crate::chain::Chain`].
///
/// These replace the manual lifecycle hooks of a hand-rolled generic store:
/// - duplication at insertion time is [`Clone`]
/// - deduplication equality is [`Eq`]
/// - release at teardown is ordinary ownership (`Drop`)
/// - walk termination is [`WalkState::is_terminal`]
///
/// Equality must be a consistent equivalence relation; the engine only ever
/// tests equal vs. not-equal, never ordering.
pub trait WalkState: Clone + Eq {
	/// True if reaching this value ends a walk.
	fn is_terminal(&self) -> bool;
}

/// Stable handle to a state inside one chain.
///
/// Handles are plain insertion indices into the owning chain's store and are
/// only meaningful for the chain that issued them.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateId(pub(crate) usize);

impl StateId {
	/// Position of the state in insertion order.
	pub fn index(self) -> usize {
		self.0
	}
}

/// A weighted directed edge to another state of the same chain.
///
/// Edges never own their target; they hold a [`StateId`] into the store.
/// The weight is the number of times this transition was observed and is
/// always at least 1.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct Edge {
	pub(crate) target: StateId,
	pub(crate) weight: usize,
}

/// One state of the chain: the owned payload plus its outgoing edge table.
///
/// ## Invariants
/// - Edges are unique by target (the store guarantees at most one state per
///   distinct value, so target-handle equality is value equality)
/// - Every edge weight is strictly positive
/// - The edge list only grows, and only during population
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct State<T> {
	pub(crate) value: T,
	pub(crate) edges: Vec<Edge>,
}

impl<T> State<T> {
	pub(crate) fn new(value: T) -> Self {
		Self { value, edges: Vec::new() }
	}

	/// Records `weight` additional observations of the transition to `target`.
	///
	/// - If the edge already exists, its weight is increased.
	/// - Otherwise, a new edge is appended with the given weight.
	pub(crate) fn add_edge(&mut self, target: StateId, weight: usize) {
		for edge in &mut self.edges {
			if edge.target == target {
				edge.weight += weight;
				return;
			}
		}
		self.edges.push(Edge { target, weight });
	}

	/// Sum of all outgoing edge weights; 0 for a state with no edges.
	pub(crate) fn total_weight(&self) -> usize {
		self.edges.iter().map(|edge| edge.weight).sum()
	}

	/// Picks a successor with probability proportional to edge weight.
	///
	/// Draws once in `[0, total_weight)` and walks the edge list in insertion
	/// order, subtracting weights until the draw lands inside an edge's
	/// bucket. This samples the observed counts without expanding them into a
	/// choice array.
	///
	/// Returns `None` if the state has no outgoing edges.
	pub(crate) fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<StateId> {
		let total = self.total_weight();
		if total == 0 {
			return None;
		}

		let mut draw = rng.random_range(0..total);

		let mut fallback = None;
		for edge in &self.edges {
			if draw < edge.weight {
				return Some(edge.target);
			}
			draw -= edge.weight;
			fallback = Some(edge.target);
		}

		// Fallback: should not happen, but kept for safety.
		fallback
	}
}
