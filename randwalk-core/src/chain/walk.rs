use rand::Rng;

use super::error::ChainError;
use super::state::{StateId, WalkState};
use super::store::Chain;

impl<T: WalkState> Chain<T> {
	/// Generates one bounded random walk, emitting every visited payload.
	///
	/// # Parameters
	/// - `start`: state to begin at, or `None` to draw one with
	///   [`Chain::pick_start`].
	/// - `max_length`: upper bound on the number of emitted values; must be
	///   at least 1.
	/// - `rng`: random source driving all sampling; seed it for reproducible
	///   walks.
	/// - `emit`: sink invoked once per visited state, in walk order.
	///
	/// # Behavior
	/// The walk emits the current payload, stops if it is terminal or the
	/// length bound is reached, and otherwise samples the next state by edge
	/// weight. It therefore emits between 1 and `max_length` values; the only
	/// early exit is a terminal payload.
	///
	/// # Errors
	/// - [`ChainError::ZeroLength`] if `max_length` is 0
	/// - start selection errors from [`Chain::pick_start`]
	/// - [`ChainError::NoTransitions`] if the walk reaches a non-terminal
	///   state without outgoing edges (a population gap in the collaborator)
	///
	/// # Returns
	/// The number of emitted values.
	pub fn generate<R, F>(
		&self,
		start: Option<StateId>,
		max_length: usize,
		rng: &mut R,
		mut emit: F,
	) -> Result<usize, ChainError>
	where
		R: Rng + ?Sized,
		F: FnMut(&T),
	{
		if max_length == 0 {
			return Err(ChainError::ZeroLength);
		}

		let mut current = match start {
			Some(id) => id,
			None => self.pick_start(rng)?,
		};

		let mut emitted = 0;
		loop {
			emit(self.value(current));
			emitted += 1;

			if self.is_terminal(current) || emitted == max_length {
				return Ok(emitted);
			}
			current = self.pick_next(current, rng)?;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[derive(Clone, Debug, PartialEq, Eq)]
	struct Tok(&'static str);

	impl WalkState for Tok {
		fn is_terminal(&self) -> bool {
			self.0.ends_with('.')
		}
	}

	fn collect_walk(
		chain: &Chain<Tok>,
		start: Option<StateId>,
		max_length: usize,
		seed: u64,
	) -> Vec<&'static str> {
		let mut rng = StdRng::seed_from_u64(seed);
		let mut out = Vec::new();
		chain
			.generate(start, max_length, &mut rng, |tok| out.push(tok.0))
			.unwrap();
		out
	}

	#[test]
	fn walk_stops_right_after_terminal() {
		let mut chain = Chain::new();
		let a = chain.add_or_get(&Tok("a"));
		let b = chain.add_or_get(&Tok("b."));
		chain.add_or_increment_edge(a, b);

		let walk = collect_walk(&chain, Some(a), 10, 1);
		assert_eq!(walk, vec!["a", "b."]);
	}

	#[test]
	fn walk_starting_on_terminal_emits_once() {
		let mut chain = Chain::new();
		let a = chain.add_or_get(&Tok("a"));
		let b = chain.add_or_get(&Tok("b."));
		chain.add_or_increment_edge(a, b);

		let walk = collect_walk(&chain, Some(b), 10, 1);
		assert_eq!(walk, vec!["b."]);
	}

	#[test]
	fn walk_respects_length_bound() {
		// Two-state cycle with no terminal: only the bound can stop it.
		let mut chain = Chain::new();
		let a = chain.add_or_get(&Tok("a"));
		let b = chain.add_or_get(&Tok("b"));
		chain.add_or_increment_edge(a, b);
		chain.add_or_increment_edge(b, a);

		let walk = collect_walk(&chain, Some(a), 5, 9);
		assert_eq!(walk.len(), 5);
		assert_eq!(walk, vec!["a", "b", "a", "b", "a"]);
	}

	#[test]
	fn zero_length_walk_is_rejected() {
		let mut chain = Chain::new();
		let a = chain.add_or_get(&Tok("a"));
		let mut rng = StdRng::seed_from_u64(0);
		let result = chain.generate(Some(a), 0, &mut rng, |_| {});
		assert_eq!(result, Err(ChainError::ZeroLength));
	}

	#[test]
	fn dead_end_walk_surfaces_an_error() {
		let mut chain = Chain::new();
		let a = chain.add_or_get(&Tok("a"));
		let b = chain.add_or_get(&Tok("b"));
		chain.add_or_increment_edge(a, b);

		let mut rng = StdRng::seed_from_u64(0);
		let result = chain.generate(Some(a), 10, &mut rng, |_| {});
		assert_eq!(result, Err(ChainError::NoTransitions));
	}

	#[test]
	fn identical_seeds_reproduce_identical_walks() {
		let mut chain = Chain::new();
		let words = ["the", "cat", "sat", "on", "mats", "here."];
		let ids: Vec<StateId> = words.iter().map(|w| chain.add_or_get(&Tok(w))).collect();
		for from in 0..words.len() - 1 {
			for to in from + 1..words.len() {
				chain.add_or_increment_edge(ids[from], ids[to]);
			}
		}

		let first = collect_walk(&chain, None, 6, 1234);
		let second = collect_walk(&chain, None, 6, 1234);
		assert_eq!(first, second);
	}

	/// Payload counting live instances across clones and drops.
	#[derive(Debug)]
	struct Counted {
		id: u32,
		live: Arc<AtomicUsize>,
	}

	impl Counted {
		fn new(id: u32, live: &Arc<AtomicUsize>) -> Self {
			live.fetch_add(1, Ordering::SeqCst);
			Self { id, live: Arc::clone(live) }
		}
	}

	impl Clone for Counted {
		fn clone(&self) -> Self {
			Counted::new(self.id, &self.live)
		}
	}

	impl Drop for Counted {
		fn drop(&mut self) {
			self.live.fetch_sub(1, Ordering::SeqCst);
		}
	}

	impl PartialEq for Counted {
		fn eq(&self, other: &Self) -> bool {
			self.id == other.id
		}
	}

	impl Eq for Counted {}

	impl WalkState for Counted {
		fn is_terminal(&self) -> bool {
			false
		}
	}

	#[test]
	fn teardown_releases_each_payload_exactly_once() {
		let live = Arc::new(AtomicUsize::new(0));

		let chain = {
			let mut chain = Chain::new();
			let values: Vec<Counted> = (0..3).map(|id| Counted::new(id, &live)).collect();
			for value in &values {
				chain.add_or_get(value);
				chain.add_or_get(value);
			}
			chain
		};

		// Caller copies are gone; one owned clone per distinct state remains.
		assert_eq!(chain.len(), 3);
		assert_eq!(live.load(Ordering::SeqCst), 3);

		drop(chain);
		assert_eq!(live.load(Ordering::SeqCst), 0);
	}
}
