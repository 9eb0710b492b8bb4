//! Arrow/Parquet implementation of the columnar engine.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow_array::builder::{Float32Builder, ListBuilder, StringBuilder};
use arrow_array::{ArrayRef, RecordBatch};
use arrow_schema::{DataType, Field, Schema};
use parquet::arrow::ArrowWriter;

use super::ColumnarEngine;
use crate::error::{Error, Result};
use crate::writer::ManifestRecord;

/// Parquet-backed columnar engine.
pub struct ParquetEngine;

/// Schema mirrors the manifest record layout. Embeddings are a variable
/// length list rather than a fixed-size one: degrade mode produces empty
/// vectors alongside full-width ones.
fn table_schema() -> Schema {
    Schema::new(vec![
        Field::new("chunk_id", DataType::Utf8, false),
        Field::new("source", DataType::Utf8, false),
        Field::new("namespace", DataType::Utf8, false),
        Field::new("text", DataType::Utf8, false),
        Field::new(
            "embedding",
            DataType::List(Arc::new(Field::new("item", DataType::Float32, true))),
            false,
        ),
    ])
}

fn records_to_batch(records: &[ManifestRecord]) -> Result<RecordBatch> {
    let mut chunk_ids = StringBuilder::new();
    let mut sources = StringBuilder::new();
    let mut namespaces = StringBuilder::new();
    let mut texts = StringBuilder::new();
    let mut embeddings = ListBuilder::new(Float32Builder::new());

    for record in records {
        chunk_ids.append_value(&record.chunk.chunk_id);
        sources.append_value(&record.chunk.source);
        namespaces.append_value(&record.chunk.namespace);
        texts.append_value(&record.chunk.text);
        embeddings.values().append_slice(&record.embedding);
        embeddings.append(true);
    }

    RecordBatch::try_new(
        Arc::new(table_schema()),
        vec![
            Arc::new(chunk_ids.finish()) as ArrayRef,
            Arc::new(sources.finish()),
            Arc::new(namespaces.finish()),
            Arc::new(texts.finish()),
            Arc::new(embeddings.finish()),
        ],
    )
    .map_err(|e| Error::Other(format!("failed to build record batch: {e}")))
}

impl ColumnarEngine for ParquetEngine {
    fn write(&self, path: &Path, records: &[ManifestRecord]) -> Result<()> {
        let batch = records_to_batch(records)?;
        let file = File::create(path)?;
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None)
            .map_err(|e| Error::Other(format!("failed to open parquet writer: {e}")))?;
        writer
            .write(&batch)
            .map_err(|e| Error::Other(format!("failed to write parquet table: {e}")))?;
        writer
            .close()
            .map_err(|e| Error::Other(format!("failed to finalize parquet file: {e}")))?;
        Ok(())
    }
}
