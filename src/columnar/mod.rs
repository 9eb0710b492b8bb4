//! Columnar artifact engine.
//!
//! The Parquet mirror of the manifest is best-effort: it is produced only
//! when the engine is compiled in (default-on `parquet` cargo feature).
//! The JSON manifest stays authoritative either way.

use std::path::Path;

use crate::error::Result;
use crate::writer::ManifestRecord;

#[cfg(feature = "parquet")]
mod engine;

/// Writes manifest records to a columnar table file.
///
/// The trait is the seam that lets the index writer treat the engine as
/// optional, and lets tests exercise the unavailable and failing paths
/// without touching cargo features.
pub trait ColumnarEngine {
    /// Persist `records` as a table at `path`, overwriting any previous file.
    fn write(&self, path: &Path, records: &[ManifestRecord]) -> Result<()>;
}

/// The engine built into this binary, if any.
#[must_use]
pub fn default_engine() -> Option<Box<dyn ColumnarEngine>> {
    #[cfg(feature = "parquet")]
    {
        Some(Box::new(engine::ParquetEngine))
    }
    #[cfg(not(feature = "parquet"))]
    {
        None
    }
}
