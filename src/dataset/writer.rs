//! Parquet part-file encoding
//!
//! Provides utilities for encoding Arrow RecordBatches as Parquet bytes.

use crate::error::{Error, Result};
use crate::session::{keys, EngineConfiguration};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;

/// Configuration for Parquet writer
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
    dictionary_enabled: bool,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024, // 1M rows
            dictionary_enabled: true,
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode writer settings from the engine configuration
    pub fn from_config(config: &EngineConfiguration) -> Result<Self> {
        let mut writer = Self::default();
        if let Some(codec) = config.get(keys::PARQUET_COMPRESSION) {
            writer.compression = parse_compression(codec)?;
        }
        if let Some(size) = config.get_positive(keys::PARQUET_ROW_GROUP_SIZE)? {
            writer.row_group_size = size;
        }
        if let Some(enabled) = config.get_bool(keys::PARQUET_DICTIONARY)? {
            writer.dictionary_enabled = enabled;
        }
        Ok(writer)
    }

    /// Set compression algorithm
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Enable or disable dictionary encoding
    #[must_use]
    pub fn with_dictionary(mut self, enabled: bool) -> Self {
        self.dictionary_enabled = enabled;
        self
    }

    /// Get compression algorithm
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Get row group size
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Get dictionary encoding enabled
    pub fn is_dictionary_enabled(&self) -> bool {
        self.dictionary_enabled
    }

    /// File name of the `index`-th part file, tagged with the codec
    ///
    /// `part-00000-c000.snappy.parquet`, `part-00001-c000.parquet` when uncompressed
    pub fn part_file_name(&self, index: usize) -> String {
        let codec = match self.compression {
            Compression::SNAPPY => Some("snappy"),
            Compression::GZIP(_) => Some("gz"),
            Compression::ZSTD(_) => Some("zstd"),
            Compression::LZ4_RAW => Some("lz4raw"),
            _ => None,
        };
        match codec {
            Some(codec) => format!("part-{index:05}-c000.{codec}.parquet"),
            None => format!("part-{index:05}-c000.parquet"),
        }
    }

    /// Build writer properties
    fn build_properties(&self) -> WriterProperties {
        let mut builder = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size);

        if !self.dictionary_enabled {
            builder = builder.set_dictionary_enabled(false);
        }

        builder.build()
    }
}

fn parse_compression(codec: &str) -> Result<Compression> {
    match codec.trim().to_ascii_lowercase().as_str() {
        "snappy" => Ok(Compression::SNAPPY),
        "gzip" => Ok(Compression::GZIP(GzipLevel::default())),
        "zstd" => Ok(Compression::ZSTD(ZstdLevel::default())),
        "lz4" | "lz4_raw" => Ok(Compression::LZ4_RAW),
        "uncompressed" | "none" => Ok(Compression::UNCOMPRESSED),
        other => Err(Error::invalid_value(
            keys::PARQUET_COMPRESSION,
            format!("unsupported codec '{other}'"),
        )),
    }
}

/// Encode batches as one in-memory Parquet file
///
/// Returns the file bytes and the number of rows written.
pub fn encode_parquet(
    schema: SchemaRef,
    batches: &[RecordBatch],
    config: &ParquetWriterConfig,
) -> Result<(Bytes, usize)> {
    let mut buf = Vec::new();
    let props = config.build_properties();

    let mut writer = ArrowWriter::try_new(&mut buf, schema, Some(props))
        .map_err(|e| Error::output(format!("Failed to create Parquet writer: {e}")))?;

    let mut rows = 0;
    for batch in batches {
        writer
            .write(batch)
            .map_err(|e| Error::output(format!("Failed to write batch: {e}")))?;
        rows += batch.num_rows();
    }

    writer
        .close()
        .map_err(|e| Error::output(format!("Failed to close Parquet writer: {e}")))?;

    Ok((Bytes::from(buf), rows))
}
