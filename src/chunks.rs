//! Chunk reading.
//!
//! Chunks arrive pre-split, one file per chunk. Reading is best-effort:
//! a file that cannot be read (missing, unreadable, not UTF-8) is logged
//! and skipped; the run continues with the remaining chunks.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One unit of source text to be embedded and indexed.
///
/// Immutable after creation; persisted only as part of a manifest record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable identity, derived from the source file's stem.
    pub chunk_id: String,
    /// Path the chunk was read from, as given on the command line.
    pub source: String,
    /// Namespace of the enclosing run.
    pub namespace: String,
    /// Full file contents.
    pub text: String,
}

/// Chunk id = base filename without its last extension.
///
/// Ids are not deduplicated: two paths sharing a stem (`a/note.md`,
/// `b/note.md`) both end up in the manifest with `chunk_id` "note".
/// Avoiding that is the caller's responsibility.
fn chunk_id_for(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.to_string_lossy().into_owned(), |stem| {
            stem.to_string_lossy().into_owned()
        })
}

/// Read chunk files into [`Chunk`] records, in input order.
///
/// Per-file read failures are warned about and the file is excluded;
/// they never abort the batch.
pub fn read_chunks(paths: &[PathBuf], namespace: &str) -> Vec<Chunk> {
    let mut chunks = Vec::with_capacity(paths.len());

    for path in paths {
        match fs::read_to_string(path) {
            Ok(text) => chunks.push(Chunk {
                chunk_id: chunk_id_for(path),
                source: path.to_string_lossy().into_owned(),
                namespace: namespace.to_string(),
                text,
            }),
            Err(e) => warn!("failed to read chunk {}: {e}", path.display()),
        }
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reads_chunks_in_input_order() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.md");
        let b = dir.path().join("b.md");
        fs::write(&a, "hello").unwrap();
        fs::write(&b, "world").unwrap();

        let chunks = read_chunks(&[a.clone(), b.clone()], "default");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chunk_id, "a");
        assert_eq!(chunks[0].text, "hello");
        assert_eq!(chunks[0].source, a.to_string_lossy());
        assert_eq!(chunks[0].namespace, "default");
        assert_eq!(chunks[1].chunk_id, "b");
        assert_eq!(chunks[1].text, "world");
    }

    #[test]
    fn missing_file_is_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.md");
        fs::write(&a, "hello").unwrap();
        let missing = dir.path().join("nope.md");

        let chunks = read_chunks(&[a, missing], "default");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chunk_id, "a");
    }

    #[test]
    fn non_utf8_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("bad.md");
        fs::write(&bad, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let chunks = read_chunks(&[bad], "default");
        assert!(chunks.is_empty());
    }

    #[test]
    fn duplicate_stems_are_both_kept() {
        // Same stem under different directories is accepted, not deduped.
        let dir = TempDir::new().unwrap();
        let sub_a = dir.path().join("a");
        let sub_b = dir.path().join("b");
        fs::create_dir_all(&sub_a).unwrap();
        fs::create_dir_all(&sub_b).unwrap();
        let first = sub_a.join("note.md");
        let second = sub_b.join("note.md");
        fs::write(&first, "one").unwrap();
        fs::write(&second, "two").unwrap();

        let chunks = read_chunks(&[first, second], "default");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chunk_id, "note");
        assert_eq!(chunks[1].chunk_id, "note");
        assert_ne!(chunks[0].source, chunks[1].source);
    }

    #[test]
    fn chunk_id_strips_only_last_extension() {
        assert_eq!(chunk_id_for(Path::new("notes/daily.2024.md")), "daily.2024");
        assert_eq!(chunk_id_for(Path::new("plain")), "plain");
    }
}
