use std::fmt;

use crate::chain::{Chain, StateId, WalkState};

/// Number of cells on the board; the last cell ends the game.
pub const BOARD_SIZE: usize = 100;

/// Highest dice outcome; plain cells fan out to the next 1..=6 cells.
pub const DICE_MAX: usize = 6;

/// Upper bound on the number of cells visited in one walk.
pub const MAX_WALK_LENGTH: usize = 60;

/// Shortcuts of the board: each pair `(x, y)` is a ladder from `x` up to `y`
/// if `x < y`, and a snake from `x` down to `y` otherwise.
const TRANSITIONS: [(usize, usize); 20] = [
	(13, 4),
	(85, 17),
	(95, 67),
	(97, 58),
	(66, 89),
	(87, 31),
	(57, 83),
	(91, 25),
	(28, 50),
	(35, 11),
	(8, 30),
	(41, 62),
	(81, 43),
	(69, 32),
	(20, 39),
	(33, 70),
	(79, 99),
	(23, 76),
	(15, 47),
	(61, 14),
];

/// One cell of the board.
///
/// Cells are identified by their number alone: equality ignores the shortcut
/// fields, so a bare probe cell can look up a populated one.
#[derive(Clone, Copy, Debug)]
pub struct Cell {
	pub number: usize,
	pub ladder_to: Option<usize>,
	pub snake_to: Option<usize>,
}

impl Cell {
	/// A plain cell with no shortcut, mainly useful as a lookup probe.
	pub fn new(number: usize) -> Self {
		Self { number, ladder_to: None, snake_to: None }
	}
}

impl PartialEq for Cell {
	fn eq(&self, other: &Self) -> bool {
		self.number == other.number
	}
}

impl Eq for Cell {}

impl WalkState for Cell {
	fn is_terminal(&self) -> bool {
		self.number == BOARD_SIZE
	}
}

impl fmt::Display for Cell {
	/// Renders the cell the way a printed walk shows it:
	/// `[8]-ladder to 30 -> `, `[13]-snake to 4 -> `, `[5] -> ` or `[100]`.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}]", self.number)?;
		if self.is_terminal() {
			return Ok(());
		}
		if let Some(to) = self.ladder_to {
			write!(f, "-ladder to {to} ->")?;
		} else if let Some(to) = self.snake_to {
			write!(f, "-snake to {to} ->")?;
		} else {
			write!(f, " ->")?;
		}
		write!(f, " ")
	}
}

/// Builds the full board chain.
///
/// # Behavior
/// - All `BOARD_SIZE` cells are added in numeric order.
/// - A cell with a shortcut gets exactly one edge, to the shortcut target;
///   dice outcomes do not apply there.
/// - Every other cell gets one edge per dice outcome that stays on the
///   board.
/// - The last cell is terminal and has no outgoing edges.
pub fn build_board() -> Chain<Cell> {
	let mut cells: Vec<Cell> = (1..=BOARD_SIZE).map(Cell::new).collect();
	for &(from, to) in &TRANSITIONS {
		if from < to {
			cells[from - 1].ladder_to = Some(to);
		} else {
			cells[from - 1].snake_to = Some(to);
		}
	}

	let mut chain = Chain::new();
	let ids: Vec<StateId> = cells.iter().map(|cell| chain.add_or_get(cell)).collect();

	for (cell, &from) in cells.iter().zip(&ids) {
		if let Some(to) = cell.ladder_to.or(cell.snake_to) {
			chain.add_or_increment_edge(from, ids[to - 1]);
		} else {
			for dice in 1..=DICE_MAX {
				let target = cell.number + dice;
				if target > BOARD_SIZE {
					break;
				}
				chain.add_or_increment_edge(from, ids[target - 1]);
			}
		}
	}

	chain
}
