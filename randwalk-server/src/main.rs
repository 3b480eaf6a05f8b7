use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};

use serde::Deserialize;
use randwalk_core::chain::Chain;
use randwalk_core::io::list_files;
use randwalk_core::text::{self, Word, MAX_TWEET_WORDS};

const DATA_DIR: &str = "./data";

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	count: Option<usize>,
	max_length: Option<usize>,
	start: Option<String>, // literal first word; random start if absent
}

#[derive(Deserialize)]
struct CorpusQuery {
	names: Option<String>,
}

struct SharedData {
	chain: Chain<Word>,
	corpora: Vec<String>,
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates one or more sentences by walking the loaded chain.
/// Returns the sentences, one per line, as the response body.
#[get("/v1/generate")]
async fn get_generated(
	data: web::Data<Mutex<SharedData>>,
	query: web::Query<GenerateParams>,
) -> impl Responder {
	let count = query.count.unwrap_or(1);
	let max_length = query.max_length.unwrap_or(MAX_TWEET_WORDS);

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};

	if shared_data.chain.is_empty() {
		return HttpResponse::BadRequest().body("No corpus loaded");
	}

	let start = match &query.start {
		None => None,
		Some(word) => match shared_data.chain.find(&Word::new(word)) {
			Some(id) => Some(id),
			None => return HttpResponse::BadRequest().body(format!("Unknown start word: {word}")),
		},
	};

	let mut rng = rand::rng();
	let mut sentences = Vec::with_capacity(count);
	for _ in 0..count {
		let mut words: Vec<String> = Vec::new();
		match shared_data.chain.generate(start, max_length, &mut rng, |word| {
			words.push(word.to_string())
		}) {
			Ok(_) => sentences.push(words.join(" ")),
			Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
		}
	}

	HttpResponse::Ok().body(sentences.join("\n"))
}

#[get("/v1/corpora")]
async fn get_corpora() -> impl Responder {
	match list_files(DATA_DIR, "txt") {
		Ok(files) => HttpResponse::Ok().body(files.join("\n").replace(".txt", "")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora"),
	}
}

#[get("/v1/loaded")]
async fn get_loaded(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};
	HttpResponse::Ok().body(shared_data.corpora.join("\n"))
}

/// HTTP PUT endpoint `/v1/load`
///
/// Rebuilds the shared chain from the named corpora (comma-separated),
/// merging them into a single transition graph.
#[put("/v1/load")]
async fn put_corpora(
	data: web::Data<Mutex<SharedData>>,
	query: web::Query<CorpusQuery>,
) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};

	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let corpus_names: Vec<&str> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.collect();

	shared_data.chain = Chain::new();
	shared_data.corpora.clear();
	for name in corpus_names {
		let corpus_path = format!("{DATA_DIR}/{name}.txt");
		let partial = match text::load_corpus(&corpus_path, None) {
			Ok(c) => c,
			Err(e) => {
				return HttpResponse::InternalServerError()
					.body(format!("Failed to load corpus: {e}"))
			}
		};
		shared_data.chain.merge(&partial);
		shared_data.corpora.push(name.to_owned());
		log::info!("loaded corpus {name}");
	}

	HttpResponse::Ok().body("Corpora loaded successfully")
}

/// Main entry point for the server.
///
/// Starts with an empty chain; corpora are loaded through `/v1/load` and
/// shared behind a `Mutex` across workers.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - The data directory is hardcoded and should be made configurable.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let shared_data = SharedData {
		chain: Chain::new(),
		corpora: Vec::new(),
	};
	let shared_chain = web::Data::new(Mutex::new(shared_data));

	log::info!("listening on 127.0.0.1:5000");
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_chain.clone())
			.service(get_generated)
			.service(get_corpora)
			.service(get_loaded)
			.service(put_corpora)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
