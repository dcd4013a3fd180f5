// src/data/load.rs

use anyhow::{anyhow, Context, Result};
use arrow::{
    compute::concat_batches,
    csv::ReaderBuilder,
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    sync::Arc,
};
use tracing::{info, instrument};

use super::{clean, clean::source_schema, NameTable};

pub const DELIMITER: u8 = b';';
const BATCH_SIZE: usize = 64 * 1024;

/// Load the name table. `.parquet` files are read back as an already-cleaned
/// table; anything else is parsed as semicolon-delimited text and cleaned.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn load_table(path: &Path) -> Result<NameTable> {
    let is_parquet = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));

    let table = if is_parquet {
        read_parquet(path)?
    } else {
        let raw = read_csv(path)?;
        clean(&raw).with_context(|| format!("cleaning {}", path.display()))?
    };
    info!(rows = table.len(), "loaded name table");
    Ok(table)
}

/// Read the delimited source file into a batch with the source schema.
pub fn read_csv(path: &Path) -> Result<RecordBatch> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_csv_from(BufReader::new(file)).with_context(|| format!("reading {}", path.display()))
}

/// Columns are located by header name; extra columns are skipped.
pub fn read_csv_from<R: BufRead>(mut reader: R) -> Result<RecordBatch> {
    let mut header = String::new();
    reader.read_line(&mut header).context("reading header line")?;
    let names: Vec<String> = header
        .trim_start_matches('\u{feff}')
        .trim_end_matches(['\r', '\n'])
        .split(DELIMITER as char)
        .map(|h| h.trim().trim_matches('"').to_string())
        .collect();

    let source = source_schema();
    let fields: Vec<Field> = names
        .iter()
        .map(|name| match source.field_with_name(name) {
            Ok(field) => field.clone(),
            Err(_) => Field::new(name, DataType::Utf8, true),
        })
        .collect();
    let projection = source
        .fields()
        .iter()
        .map(|field| {
            names
                .iter()
                .position(|n| n == field.name())
                .ok_or_else(|| anyhow!("header has no {:?} column", field.name()))
        })
        .collect::<Result<Vec<_>>>()?;

    let schema = Schema::new(fields);
    let projected = Arc::new(schema.project(&projection)?);
    let csv = ReaderBuilder::new(Arc::new(schema))
        .with_header(false)
        .with_delimiter(DELIMITER)
        .with_batch_size(BATCH_SIZE)
        .with_projection(projection)
        .build(reader)
        .context("building CSV reader")?;

    let batches = csv
        .collect::<Result<Vec<_>, _>>()
        .context("parsing delimited rows")?;
    Ok(concat_batches(&projected, &batches)?)
}

/// Read a cleaned table previously written by [`super::write_parquet`].
pub fn read_parquet(path: &Path) -> Result<NameTable> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("reading parquet metadata from {}", path.display()))?;
    let schema = builder.schema().clone();
    let batches = builder
        .build()?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("decoding {}", path.display()))?;
    NameTable::try_new(concat_batches(&schema, &batches)?)
}
