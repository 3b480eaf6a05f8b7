use std::fmt;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::chain::{Chain, WalkState};
use crate::io::{build_output_path, read_file};

/// A token ending with this character terminates a sentence, and a walk.
pub const SENTENCE_END: char = '.';

/// Default upper bound on the number of words in one generated sentence.
pub const MAX_TWEET_WORDS: usize = 20;

/// One whitespace-delimited token of a corpus.
///
/// Words compare by exact text, so `"Dog"`, `"dog"` and `"dog."` are three
/// distinct states. A word is terminal when it carries sentence-ending
/// punctuation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Word(String);

impl Word {
	pub fn new(word: &str) -> Self {
		Self(word.to_owned())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Word {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl WalkState for Word {
	fn is_terminal(&self) -> bool {
		self.0.ends_with(SENTENCE_END)
	}
}

/// Populates a chain from lines of text, one transition per in-line word pair.
///
/// # Behavior
/// - For each consecutive pair `(a, b)` within a line where `a` is not
///   terminal, both words become states and the edge `a -> b` is recorded.
/// - Terminal words are always added, even without a successor, so a walk
///   can end on them; no edge ever leaves a terminal word.
/// - A trailing non-terminal word with no successor is not added on its own.
/// - Pairs never span lines.
///
/// `word_limit` truncates population: counting every token seen, ingestion
/// stops before processing the token that would exceed the limit.
pub fn fill_from_lines<'a, I>(chain: &mut Chain<Word>, lines: I, word_limit: Option<usize>)
where
	I: IntoIterator<Item = &'a str>,
{
	let mut seen = 0usize;

	for line in lines {
		let mut words = line.split_whitespace().peekable();
		while let Some(word) = words.next() {
			if word_limit.is_some_and(|limit| seen >= limit) {
				return;
			}

			let token = Word::new(word);
			if token.is_terminal() {
				chain.add_or_get(&token);
			} else if let Some(next) = words.peek() {
				let from = chain.add_or_get(&token);
				let to = chain.add_or_get(&Word::new(next));
				chain.add_or_increment_edge(from, to);
			}

			seen += 1;
		}
	}
}

/// Loads a chain from a text corpus, with a binary cache for fast reloads.
///
/// # Parameters
/// - `filepath`: the corpus text file, one or more sentences per line.
/// - `word_limit`: optional bound on the number of ingested tokens.
///
/// # Behavior
/// - Without a limit, a `.bin` file next to the corpus is used as a cache:
///   loaded with `postcard` when present, written after a fresh build.
/// - Fresh unbounded builds are parallelized: lines are chunked across
///   threads into partial chains which are then merged. This is lossless
///   because word pairs never span lines.
/// - With a limit, the corpus is read sequentially (the token count is
///   global) and the cache is bypassed entirely.
pub fn load_corpus<P: AsRef<Path>>(
	filepath: P,
	word_limit: Option<usize>,
) -> Result<Chain<Word>, Box<dyn std::error::Error>> {
	if let Some(limit) = word_limit {
		let lines = read_file(&filepath)?;
		let mut chain = Chain::new();
		fill_from_lines(&mut chain, lines.iter().map(String::as_str), Some(limit));
		return Ok(chain);
	}

	let cache_path = build_output_path(&filepath, "bin")?;
	if cache_path.exists() {
		let bytes = std::fs::read(&cache_path)?;
		return Ok(postcard::from_bytes(&bytes)?);
	}

	let chain = parallel_build(&filepath)?;

	let bytes = postcard::to_stdvec(&chain)?;
	std::fs::write(&cache_path, bytes)?;

	Ok(chain)
}

/// Splits the corpus lines into chunks, builds partial chains in parallel and
/// merges them into one.
///
/// # Notes
/// - Chunk count is derived from the CPU count, as line distribution is
///   rarely uniform.
/// - Uses an MPSC channel to collect partial chains from worker threads.
fn parallel_build<P: AsRef<Path>>(filepath: P) -> Result<Chain<Word>, Box<dyn std::error::Error>> {
	let lines = read_file(&filepath)?;
	if lines.is_empty() {
		return Ok(Chain::new());
	}

	let cpus = num_cpus::get();
	let factor = 8;
	let chunks = cpus * factor;
	let chunk_size = ((lines.len() + chunks - 1) / chunks).max(1);

	let (tx, rx) = mpsc::channel();
	for chunk in lines.chunks(chunk_size) {
		let tx = tx.clone();
		let chunk: Vec<String> = chunk.to_vec();

		thread::spawn(move || {
			let mut partial = Chain::new();
			fill_from_lines(&mut partial, chunk.iter().map(String::as_str), None);
			tx.send(partial).expect("Failed to send from thread");
		});
	}
	drop(tx);

	let mut chain = Chain::new();
	for partial in rx.iter() {
		chain.merge(&partial);
	}

	Ok(chain)
}
