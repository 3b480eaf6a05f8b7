use std::env;
use std::process;

use rand::SeedableRng;
use rand::rngs::StdRng;

use randwalk_core::chain::WalkState;
use randwalk_core::text::{self, MAX_TWEET_WORDS};

fn usage() -> ! {
    eprintln!("Usage: randwalk-tweets <seed> <tweet_count> <corpus_path> [word_limit]");
    process::exit(1);
}

/// Generates pseudo-tweets from a text corpus.
///
/// The corpus is ingested as word-pair transitions (with an optional bound on
/// the number of words read), then `tweet_count` weighted random walks are
/// printed, each starting from a random non-terminal word and running until a
/// sentence-ending word or 20 words.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 4 && args.len() != 5 {
        usage();
    }

    let seed: u64 = args[1].parse().unwrap_or_else(|_| usage());
    let tweet_count: usize = args[2].parse().unwrap_or_else(|_| usage());
    let corpus_path = &args[3];
    let word_limit: Option<usize> = match args.get(4) {
        Some(raw) => Some(raw.parse().unwrap_or_else(|_| usage())),
        None => None,
    };

    let chain = text::load_corpus(corpus_path, word_limit)?;

    let mut rng = StdRng::seed_from_u64(seed);
    for i in 1..=tweet_count {
        print!("Tweet {}: ", i);
        chain.generate(None, MAX_TWEET_WORDS, &mut rng, |word| {
            if word.is_terminal() {
                print!("{word}");
            } else {
                print!("{word} ");
            }
        })?;
        println!();
    }

    Ok(())
}
