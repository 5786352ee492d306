//! JSON source decoding
//!
//! Records are parsed with `serde_json`, the schema is inferred with
//! arrow's JSON inference, and batches are produced by arrow's JSON decoder.

use crate::error::{Error, Result, ResultExt};
use crate::session::{keys, EngineConfiguration};
use arrow::datatypes::{Schema, SchemaRef};
use arrow::json::reader::{infer_json_schema_from_iterator, ReaderBuilder};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use serde_json::Value;

const DEFAULT_BATCH_SIZE: usize = 8192;

/// Options controlling how JSON sources are read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Parse each file as one JSON document instead of JSON Lines
    pub multiline: bool,
    /// Rows per decoded batch
    pub batch_size: usize,
    /// Records per file sampled for schema inference (all when unset)
    pub infer_max_records: Option<usize>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            multiline: false,
            batch_size: DEFAULT_BATCH_SIZE,
            infer_max_records: None,
        }
    }
}

impl ReadOptions {
    /// Decode read options from the engine configuration
    pub fn from_config(config: &EngineConfiguration) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            multiline: config
                .get_bool(keys::JSON_MULTILINE)?
                .unwrap_or(defaults.multiline),
            batch_size: config
                .get_positive(keys::JSON_BATCH_SIZE)?
                .unwrap_or(defaults.batch_size),
            infer_max_records: config.get_positive(keys::JSON_INFER_MAX_RECORDS)?,
        })
    }
}

/// Parse the records of one JSON source
///
/// In JSON Lines mode every non-blank line holds one record. In multiline
/// mode the whole source is a single document. In both modes a top-level
/// array contributes each of its elements as a record.
pub(crate) fn parse_records(source: &str, data: &[u8], multiline: bool) -> Result<Vec<Value>> {
    let mut records = Vec::new();

    if multiline {
        let document: Value =
            serde_json::from_slice(data).with_context(|| format!("Malformed JSON in {source}"))?;
        push_records(&mut records, document, source, 1)?;
        return Ok(records);
    }

    for (idx, line) in data.split(|b| *b == b'\n').enumerate() {
        let line = line.trim_ascii();
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let value: Value = serde_json::from_slice(line)
            .with_context(|| format!("Malformed JSON in {source} at line {line_no}"))?;
        push_records(&mut records, value, source, line_no)?;
    }

    Ok(records)
}

fn push_records(records: &mut Vec<Value>, value: Value, source: &str, line: usize) -> Result<()> {
    match value {
        Value::Object(_) => records.push(value),
        Value::Array(items) => {
            for item in items {
                if !item.is_object() {
                    return Err(not_a_record(&item, source, line));
                }
                records.push(item);
            }
        }
        other => return Err(not_a_record(&other, source, line)),
    }
    Ok(())
}

fn not_a_record(value: &Value, source: &str, line: usize) -> Error {
    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    Error::Other(format!(
        "Expected a JSON object record in {source} at line {line}, found {kind}"
    ))
}

/// Infer one schema covering every record of every source
pub(crate) fn infer_schema(sources: &[Vec<Value>], max_per_source: Option<usize>) -> Result<Schema> {
    let limit = max_per_source.unwrap_or(usize::MAX);
    let values = sources
        .iter()
        .flat_map(|records| records.iter().take(limit))
        .map(Ok);
    Ok(infer_json_schema_from_iterator(values)?)
}

/// Decode parsed records into batches of at most `batch_size` rows
pub(crate) fn decode(
    records: &[Value],
    schema: SchemaRef,
    batch_size: usize,
) -> Result<Vec<RecordBatch>> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    // Records such as `{}` leave no columns; keep their row count
    if schema.fields().is_empty() {
        let options = RecordBatchOptions::new().with_row_count(Some(records.len()));
        return Ok(vec![RecordBatch::try_new_with_options(
            schema,
            Vec::new(),
            &options,
        )?]);
    }

    let mut decoder = ReaderBuilder::new(schema)
        .with_batch_size(batch_size)
        .with_coerce_primitive(true)
        .build_decoder()?;

    let mut batches = Vec::new();
    for chunk in records.chunks(batch_size) {
        decoder.serialize(chunk)?;
        if let Some(batch) = decoder.flush()? {
            batches.push(batch);
        }
    }
    Ok(batches)
}
