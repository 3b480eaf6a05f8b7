use std::env;
use std::process;

use rand::SeedableRng;
use rand::rngs::StdRng;

use randwalk_core::board::{self, Cell, MAX_WALK_LENGTH};

fn usage() -> ! {
    eprintln!("Usage: randwalk-board <seed> <walk_count>");
    process::exit(1);
}

/// Simulates snakes-and-ladders games as random walks.
///
/// Builds the fixed 100-cell board (dice fan-out plus the snake/ladder
/// shortcut table) and prints `walk_count` walks, each starting on cell 1 and
/// ending on cell 100 or after 60 cells.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        usage();
    }

    let seed: u64 = args[1].parse().unwrap_or_else(|_| usage());
    let walk_count: usize = args[2].parse().unwrap_or_else(|_| usage());

    let chain = board::build_board();
    let start = chain
        .find(&Cell::new(1))
        .ok_or("Board has no first cell")?;

    let mut rng = StdRng::seed_from_u64(seed);
    for i in 1..=walk_count {
        print!("Random Walk {}: ", i);
        chain.generate(Some(start), MAX_WALK_LENGTH, &mut rng, |cell| {
            print!("{cell}");
        })?;
        println!();
    }

    Ok(())
}
