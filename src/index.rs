//! Run orchestration: read chunks, embed, write artifacts, report.
//!
//! Strictly sequential, single writer per namespace. The pipeline assumes
//! external mutual exclusion; two concurrent runs against the same
//! namespace can interleave their manifest and table writes.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::chunks;
use crate::columnar;
use crate::embeddings::OllamaClient;
use crate::error::{Error, Result};
use crate::report;
use crate::writer::{self, COLUMNAR_FILE, MANIFEST_FILE, RunStats};

/// Fixed artifacts subdirectory inside a namespace.
pub const ARTIFACTS_DIR: &str = ".artifacts";

/// Resolved configuration for one indexing run.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Base directory of the index store.
    pub index_path: PathBuf,
    /// Namespace under the index store.
    pub namespace: String,
    /// Chunk files to index, in order.
    pub chunks: Vec<PathBuf>,
    /// Embedding provider base URL.
    pub provider_url: String,
    /// Embedding model name.
    pub model: String,
    /// Degrade mode: continue with empty vectors on provider failure.
    pub allow_empty: bool,
}

/// Locations and counts produced by a successful run.
#[derive(Debug)]
pub struct RunOutcome {
    pub artifacts_dir: PathBuf,
    pub stats: RunStats,
    pub manifest: PathBuf,
    /// `None` when the columnar artifact was skipped.
    pub columnar: Option<PathBuf>,
    pub report: PathBuf,
}

/// Create the namespace directory and its artifacts subdirectory.
///
/// Idempotent; existing directories are not an error.
pub fn ensure_layout(namespace_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(namespace_dir)?;
    let artifacts = namespace_dir.join(ARTIFACTS_DIR);
    fs::create_dir_all(&artifacts)?;
    Ok(artifacts)
}

/// Execute one indexing run end to end.
///
/// # Errors
///
/// Directory creation failures, fatal provider errors (degrade mode off),
/// integrity violations, and manifest write failures all abort the run.
/// Artifacts already flushed before the failure stay on disk.
pub fn run(config: &IndexConfig) -> Result<RunOutcome> {
    let namespace_dir = config.index_path.join(&config.namespace);
    let artifacts_dir = ensure_layout(&namespace_dir)?;
    debug!("artifacts dir: {}", artifacts_dir.display());

    let chunks = chunks::read_chunks(&config.chunks, &config.namespace);

    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let client = OllamaClient::new(&config.provider_url, &config.model, config.allow_empty);
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("failed to create async runtime: {e}")))?;
    let embeddings = rt.block_on(client.embed(&texts))?;

    let engine = columnar::default_engine();
    let stats = writer::write_index(
        &artifacts_dir,
        config.chunks.len(),
        chunks,
        embeddings,
        engine.as_deref(),
    )?;

    let report = report::write_report(&artifacts_dir, &stats)?;

    let columnar_path = artifacts_dir.join(COLUMNAR_FILE);
    Ok(RunOutcome {
        manifest: artifacts_dir.join(MANIFEST_FILE),
        columnar: columnar_path.exists().then_some(columnar_path),
        report,
        stats,
        artifacts_dir,
    })
}
