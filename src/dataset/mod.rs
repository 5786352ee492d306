//! Dataset module
//!
//! A `Dataset` is a lazily evaluated handle on a set of source objects.
//! Opening one resolves the files and the schema; records are decoded only
//! when the dataset is collected, counted or written.
//!
//! # Overview
//!
//! - JSON sources (JSON Lines or multiline documents) with schema inference
//!   across all files
//! - Parquet sources, used to read converted output back
//! - Overwrite writes as a directory of `part-*.parquet` files plus `_SUCCESS`

mod json;
mod writer;

pub use json::ReadOptions;
pub use writer::{encode_parquet, ParquetWriterConfig};

use crate::error::{Error, Result};
use crate::session::EngineOptions;
use crate::storage::{Access, ObjectLocation, StorageLocation};
use arrow::datatypes::{Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use object_store::path::Path as ObjectPath;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::sync::Arc;
use tracing::{debug, info};

/// Marker written after every part file of an overwrite
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Encoding of a dataset's source files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// JSON Lines or multiline JSON
    Json,
    /// Apache Parquet
    Parquet,
}

/// Result of writing a dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    /// Output location as given
    pub output: String,
    /// Part files written
    pub files_written: usize,
    /// Rows written across all part files
    pub rows_written: usize,
    /// Objects removed from the output location before writing
    pub objects_replaced: usize,
}

/// Lazily evaluated tabular dataset
#[derive(Debug, Clone)]
pub struct Dataset {
    options: Arc<EngineOptions>,
    source: ObjectLocation,
    files: Vec<ObjectPath>,
    format: SourceFormat,
    schema: SchemaRef,
}

impl Dataset {
    /// Resolve the files at `path` and determine the schema
    pub(crate) async fn open(
        options: Arc<EngineOptions>,
        path: &str,
        format: SourceFormat,
    ) -> Result<Self> {
        let location = StorageLocation::parse(path)?;
        let source = ObjectLocation::open(&location, &options.storage, Access::Read)?;
        let files = source.list_data_files().await?;
        debug!("Resolved {} {:?} file(s) under {}", files.len(), format, path);

        let mut dataset = Self {
            options,
            source,
            files,
            format,
            schema: Arc::new(Schema::empty()),
        };
        dataset.schema = Arc::new(match format {
            SourceFormat::Json => dataset.infer_json_schema().await?,
            SourceFormat::Parquet => dataset.merge_parquet_schemas().await?,
        });
        Ok(dataset)
    }

    /// Schema shared by every source file
    pub fn schema(&self) -> SchemaRef {
        Arc::clone(&self.schema)
    }

    /// Source files, in read order
    pub fn files(&self) -> &[ObjectPath] {
        &self.files
    }

    /// Source encoding
    pub fn format(&self) -> SourceFormat {
        self.format
    }

    async fn fetch(&self, path: &ObjectPath) -> Result<Bytes> {
        let data = self.source.store().get(path).await?.bytes().await?;
        Ok(data)
    }

    async fn infer_json_schema(&self) -> Result<Schema> {
        let read = &self.options.read;
        let mut sources = Vec::with_capacity(self.files.len());
        for path in &self.files {
            let data = self.fetch(path).await?;
            sources.push(json::parse_records(path.as_ref(), &data, read.multiline)?);
        }
        json::infer_schema(&sources, read.infer_max_records)
    }

    async fn merge_parquet_schemas(&self) -> Result<Schema> {
        let mut schemas = Vec::with_capacity(self.files.len());
        for path in &self.files {
            let builder = ParquetRecordBatchReaderBuilder::try_new(self.fetch(path).await?)?;
            schemas.push(builder.schema().as_ref().clone());
        }
        Ok(Schema::try_merge(schemas)?)
    }

    /// Decode one source file into batches conforming to the dataset schema
    async fn read_file(&self, path: &ObjectPath) -> Result<Vec<RecordBatch>> {
        let data = self.fetch(path).await?;
        let read = &self.options.read;

        match self.format {
            SourceFormat::Json => {
                let records = json::parse_records(path.as_ref(), &data, read.multiline)?;
                json::decode(&records, self.schema(), read.batch_size)
            }
            SourceFormat::Parquet => {
                let reader = ParquetRecordBatchReaderBuilder::try_new(data)?
                    .with_batch_size(read.batch_size)
                    .build()?;
                let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(batches)
            }
        }
    }

    /// Decode every source file
    pub async fn collect(&self) -> Result<Vec<RecordBatch>> {
        let mut batches = Vec::new();
        for path in &self.files {
            batches.extend(self.read_file(path).await?);
        }
        Ok(batches)
    }

    /// Count rows, decoding every source file
    pub async fn count(&self) -> Result<usize> {
        let mut rows = 0;
        for path in &self.files {
            rows += self
                .read_file(path)
                .await?
                .iter()
                .map(RecordBatch::num_rows)
                .sum::<usize>();
        }
        Ok(rows)
    }

    /// Write the dataset as Parquet, replacing whatever exists at `output`
    ///
    /// Every object under `output` is deleted first, then one part file is
    /// written per source file and finally an empty `_SUCCESS` marker. A
    /// failure part-way leaves the output incomplete. Outputs that contain,
    /// or lie within, the source location are refused before any delete.
    pub async fn write_parquet(&self, output: &str) -> Result<WriteSummary> {
        let location = StorageLocation::parse(output)?;
        if self.source.location().overlaps(&location) {
            return Err(Error::config(format!(
                "Cannot overwrite {output} while it is also being read from ({})",
                self.source.location()
            )));
        }

        if let StorageLocation::Local(path) = &location {
            if path.is_file() {
                std::fs::remove_file(path)?;
            }
        }

        let target = ObjectLocation::open(&location, &self.options.storage, Access::Write)?;
        let objects_replaced = target.clear().await?;
        if objects_replaced > 0 {
            info!("Overwriting {} existing object(s) at {}", objects_replaced, output);
        }

        let writer = &self.options.writer;
        let mut files_written = 0;
        let mut rows_written = 0;

        if self.schema.fields().is_empty() {
            debug!("Dataset has no columns, writing only {}", SUCCESS_MARKER);
        } else {
            for path in &self.files {
                let batches = self.read_file(path).await?;
                let (data, rows) = encode_parquet(self.schema(), &batches, writer)?;
                let part = target.child(&writer.part_file_name(files_written));
                target
                    .store()
                    .put(&part, data.into())
                    .await
                    .map_err(|e| Error::output(format!("Failed to write {part}: {e}")))?;
                debug!("Wrote {} rows to {}", rows, part);
                files_written += 1;
                rows_written += rows;
            }
        }

        target
            .store()
            .put(&target.child(SUCCESS_MARKER), Bytes::new().into())
            .await?;

        info!(
            "Wrote {} rows in {} part file(s) to {}",
            rows_written, files_written, output
        );

        Ok(WriteSummary {
            output: output.to_string(),
            files_written,
            rows_written,
            objects_replaced,
        })
    }
}
