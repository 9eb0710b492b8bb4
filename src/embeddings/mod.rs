//! Embedding generation via HTTP providers.
//!
//! A single provider is supported: an Ollama-compatible server speaking
//! the `/api/embed` batch contract. The client makes exactly one attempt
//! per run; retries and backoff are deliberately out of scope for a
//! batch tool.
//!
//! Environment overrides (also exposed as CLI flags):
//! - `SEMINDEX_OLLAMA_URL` - provider base URL (default: `http://127.0.0.1:11434`)
//! - `SEMINDEX_EMBED_MODEL` - embedding model (default: `nomic-embed-text`)

pub mod ollama;

pub use ollama::OllamaClient;
