//! Weighted-random-walk engine.
//!
//! This crate provides a generic frequency-weighted transition graph including:
//! - A deduplicated, insertion-ordered state store
//! - Per-state weighted edge tables built from observed transition counts
//! - A weighted sampler and bounded walk generator
//! - Two reference domains: text corpora and a snakes-and-ladders board
//!
//! The engine is polymorphic over any payload implementing [`chain::WalkState`]
//! and never performs I/O itself; file handling lives in the collaborator
//! modules and binaries.

/// Core chain engine: state store, edge tables, sampler, walk generator.
pub mod chain;

/// Text corpus domain: word payloads and corpus ingestion.
pub mod text;

/// Board domain: numbered cells with snake/ladder shortcuts and dice edges.
pub mod board;

/// I/O utilities (file loading, path helpers).
pub mod io;
