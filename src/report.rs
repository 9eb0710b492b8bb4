//! Run report generation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::writer::{COLUMNAR_FILE, MANIFEST_FILE, RunStats};

/// Subdirectory of the artifacts dir holding reports.
pub const REPORTS_DIR: &str = "reports";

/// Report file name.
pub const REPORT_FILE: &str = "index_report.md";

/// Write the Markdown run report and return its path.
///
/// The columnar line is always present: either the artifact's location or
/// an explicit note that it was skipped.
pub fn write_report(artifacts_dir: &Path, stats: &RunStats) -> Result<PathBuf> {
    let reports = artifacts_dir.join(REPORTS_DIR);
    fs::create_dir_all(&reports)?;
    let report_path = reports.join(REPORT_FILE);

    let columnar_path = artifacts_dir.join(COLUMNAR_FILE);
    let columnar_line = if columnar_path.exists() {
        format!("Parquet artifact: {}", columnar_path.display())
    } else {
        "Parquet artifact: (skipped or failed)".to_string()
    };

    let lines = [
        "# semindex Index Report".to_string(),
        String::new(),
        format!("- Chunks passed: {}", stats.passed),
        format!("- Chunks read: {}", stats.read),
        format!("- Embeddings written: {}", stats.embedded),
        columnar_line,
        format!("Manifest: {}", artifacts_dir.join(MANIFEST_FILE).display()),
    ];

    fs::write(&report_path, lines.join("\n") + "\n")?;
    Ok(report_path)
}
