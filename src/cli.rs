//! CLI definitions using clap.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::error::{Error, Result};
use crate::index::IndexConfig;

/// Default embedding provider base URL.
pub const DEFAULT_PROVIDER_URL: &str = "http://127.0.0.1:11434";

/// Default embedding model.
pub const DEFAULT_MODEL: &str = "nomic-embed-text";

/// semindex - generate per-namespace embedding index artifacts
#[derive(Parser, Debug)]
#[command(name = "semindex", author, version, about, long_about = None)]
pub struct Cli {
    /// Chunk files to index (pre-split markdown or plain text)
    pub chunks: Vec<PathBuf>,

    /// Base directory for the index store
    /// (default: <state dir>/semindex/index)
    #[arg(long, env = "SEMINDEX_INDEX_PATH")]
    pub index_path: Option<PathBuf>,

    /// Namespace under the index store (e.g. default or obsidian)
    #[arg(long, env = "SEMINDEX_NAMESPACE", default_value = "default")]
    pub namespace: String,

    /// Embedding provider base URL
    #[arg(long, env = "SEMINDEX_OLLAMA_URL", default_value = DEFAULT_PROVIDER_URL)]
    pub provider_url: String,

    /// Embedding model name
    #[arg(long, env = "SEMINDEX_EMBED_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Continue with empty vectors when the provider fails (not recommended)
    #[arg(long)]
    pub allow_empty_embeddings: bool,

    /// Output as JSON (for agent integration)
    #[arg(long, alias = "robot")]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Default index base path under the user's state directory.
pub fn default_index_path() -> Result<PathBuf> {
    let base = directories::BaseDirs::new()
        .ok_or_else(|| Error::Config("could not determine home directory".into()))?;
    let state = base
        .state_dir()
        .map_or_else(|| base.home_dir().join(".local").join("state"), Path::to_path_buf);
    Ok(state.join("semindex").join("index"))
}

impl Cli {
    /// Resolve the parsed arguments into a run configuration.
    ///
    /// # Errors
    ///
    /// Fails when no index path is given and none can be derived from the
    /// environment.
    pub fn into_config(self) -> Result<IndexConfig> {
        let index_path = match self.index_path {
            Some(path) => path,
            None => default_index_path()?,
        };

        Ok(IndexConfig {
            index_path,
            namespace: self.namespace,
            chunks: self.chunks,
            provider_url: self.provider_url,
            model: self.model,
            allow_empty: self.allow_empty_embeddings,
        })
    }
}
