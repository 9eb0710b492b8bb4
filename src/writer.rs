//! Index writer: merges chunks with embeddings and persists the run's
//! artifacts.
//!
//! The JSON manifest is the authoritative output and its write is the
//! commit point of a run. The Parquet table is a derived cache: written
//! when an engine is available, replaced by an on-disk hint (and any
//! stale table deleted) when it is not.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::chunks::Chunk;
use crate::columnar::ColumnarEngine;
use crate::error::{Error, Result};

/// Manifest file name, always present after a successful run.
pub const MANIFEST_FILE: &str = "chunks.json";

/// Columnar artifact file name, present only when the engine ran.
pub const COLUMNAR_FILE: &str = "embeddings.parquet";

/// Hint file left in place of the columnar artifact when the engine is
/// unavailable.
pub const MISSING_ENGINE_FILE: &str = "embeddings.parquet.MISSING_ENGINE.txt";

const MISSING_ENGINE_HINT: &str = "\
Parquet export skipped: this semindex build has no columnar engine.
Rebuild with the default `parquet` cargo feature to enable it.
";

/// One manifest entry: a chunk plus its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestRecord {
    #[serde(flatten)]
    pub chunk: Chunk,
    /// Empty under degrade mode.
    pub embedding: Vec<f32>,
}

/// Counts for one indexing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Chunk paths originally requested.
    pub passed: usize,
    /// Chunks successfully read.
    pub read: usize,
    /// Manifest records written.
    pub embedded: usize,
}

/// Merge chunks with their embeddings and write the run's artifacts into
/// `artifacts_dir`.
///
/// `passed` is the number of chunk paths originally requested, before
/// read failures thinned them out.
///
/// # Errors
///
/// [`Error::DataIntegrity`] if the chunk and embedding counts disagree
/// (checked before anything touches disk), or an I/O/serialization error
/// if the manifest cannot be written. A columnar engine failure is not
/// an error.
pub fn write_index(
    artifacts_dir: &Path,
    passed: usize,
    chunks: Vec<Chunk>,
    embeddings: Vec<Vec<f32>>,
    engine: Option<&dyn ColumnarEngine>,
) -> Result<RunStats> {
    if chunks.len() != embeddings.len() {
        return Err(Error::DataIntegrity {
            chunks: chunks.len(),
            embeddings: embeddings.len(),
        });
    }

    let read = chunks.len();
    let records: Vec<ManifestRecord> = chunks
        .into_iter()
        .zip(embeddings)
        .map(|(chunk, embedding)| ManifestRecord { chunk, embedding })
        .collect();

    write_columnar(artifacts_dir, &records, engine);

    // Manifest last: it is the durable source of truth, and a failure
    // here fails the run.
    let manifest_path = artifacts_dir.join(MANIFEST_FILE);
    let mut manifest = serde_json::to_string_pretty(&records)?;
    manifest.push('\n');
    fs::write(&manifest_path, manifest)?;

    Ok(RunStats {
        passed,
        read,
        embedded: records.len(),
    })
}

/// Best-effort columnar write. Never fails the run.
fn write_columnar(
    artifacts_dir: &Path,
    records: &[ManifestRecord],
    engine: Option<&dyn ColumnarEngine>,
) {
    let columnar_path = artifacts_dir.join(COLUMNAR_FILE);
    let hint_path = artifacts_dir.join(MISSING_ENGINE_FILE);

    match engine {
        Some(engine) => match engine.write(&columnar_path, records) {
            Ok(()) => {
                info!(
                    "wrote {} embeddings to {}",
                    records.len(),
                    columnar_path.display()
                );
                // A hint from an earlier engine-less run no longer applies.
                if hint_path.exists() {
                    let _ = fs::remove_file(&hint_path);
                }
            }
            Err(e) => {
                warn!("parquet export failed, skipping columnar artifact: {e}");
                mark_unavailable(&columnar_path, &hint_path);
            }
        },
        None => {
            warn!("no columnar engine in this build, skipping parquet export");
            mark_unavailable(&columnar_path, &hint_path);
        }
    }
}

/// Write the hint file and drop any stale table so consumers never read a
/// cache that diverges from the current manifest.
fn mark_unavailable(columnar_path: &Path, hint_path: &Path) {
    if let Err(e) = fs::write(hint_path, MISSING_ENGINE_HINT) {
        warn!("failed to write engine hint {}: {e}", hint_path.display());
    }
    if columnar_path.exists() {
        if let Err(e) = fs::remove_file(columnar_path) {
            warn!(
                "failed to remove stale columnar artifact {}: {e}",
                columnar_path.display()
            );
        }
    }
}
