//! semindex - per-namespace embedding index artifacts
//!
//! This crate turns a set of pre-split text chunk files into a durable
//! index under `<index_path>/<namespace>/.artifacts/`: a JSON manifest
//! (authoritative), an optional Parquet mirror, and a Markdown run report.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`chunks`] - Chunk file reading
//! - [`embeddings`] - Embedding client (Ollama HTTP contract)
//! - [`writer`] - Manifest and columnar artifact writing
//! - [`columnar`] - Optional Parquet engine behind the `parquet` feature
//! - [`report`] - Run report generation
//! - [`index`] - Run orchestration
//! - [`error`] - Error types and handling
//!
//! # Concurrency
//!
//! One run is single-threaded and strictly sequential. There is no
//! locking across processes: the caller owns mutual exclusion per
//! namespace.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod chunks;
pub mod cli;
pub mod columnar;
pub mod embeddings;
pub mod error;
pub mod index;
pub mod report;
pub mod writer;

pub use error::{Error, Result};
