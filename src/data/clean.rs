// src/data/clean.rs

use anyhow::{bail, Context, Result};
use arrow::{
    array::{Array, ArrayRef, Int32Array, Int64Array, StringArray},
    datatypes::{DataType, Field, Schema, SchemaRef},
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::debug;

use super::{column, int64_column, string_column, table_schema, NameTable};

/// Column names of the source file.
pub const SOURCE_SEX: &str = "sexe";
pub const SOURCE_FIRST_NAME: &str = "preusuel";
pub const SOURCE_YEAR: &str = "annais";
pub const SOURCE_DEPARTMENT: &str = "dpt";
pub const SOURCE_COUNT: &str = "nombre";

/// Typed schema of the five source columns, in source order.
pub fn source_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(SOURCE_SEX, DataType::Utf8, true),
        Field::new(SOURCE_FIRST_NAME, DataType::Utf8, true),
        Field::new(SOURCE_YEAR, DataType::Int32, true),
        Field::new(SOURCE_DEPARTMENT, DataType::Utf8, true),
        Field::new(SOURCE_COUNT, DataType::Int64, true),
    ]))
}

/// One uncleaned row, as it appears in the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub sex: String,
    pub first_name: String,
    pub year: i32,
    pub department: String,
    pub count: i64,
}

/// Map a raw sex code to its label. Unknown codes (and labels) come back unchanged.
pub fn sex_label(raw: &str) -> &str {
    let code = raw.trim();
    match code {
        "1" => "Man",
        "2" => "Woman",
        _ => code,
    }
}

/// Normalise a department code: numeric codes are zero-padded to two digits,
/// Corsican codes (`2A`, `2B`) are upper-cased.
pub fn normalize_department(raw: &str) -> Result<String> {
    let code = raw.trim();
    if let Ok(number) = code.parse::<u32>() {
        return Ok(format!("{number:02}"));
    }
    let mut chars = code.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(d), Some(l), None) if d.is_ascii_digit() && l.is_ascii_alphabetic() => {
            Ok(code.to_ascii_uppercase())
        }
        _ => bail!("invalid department code {:?}", raw),
    }
}

/// Build a batch with the source schema from in-memory records.
pub fn raw_batch(records: &[RawRecord]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| &r.sex))),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| &r.first_name),
        )),
        Arc::new(Int32Array::from_iter_values(records.iter().map(|r| r.year))),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| &r.department),
        )),
        Arc::new(Int64Array::from_iter_values(records.iter().map(|r| r.count))),
    ];
    RecordBatch::try_new(source_schema(), columns).context("building raw record batch")
}

/// Rename the source columns, derive `sex_label` and normalise `department`.
/// Rows with empty fields, negative counts or unreadable department codes fail
/// the whole pass.
pub fn clean(raw: &RecordBatch) -> Result<NameTable> {
    for name in [
        SOURCE_SEX,
        SOURCE_FIRST_NAME,
        SOURCE_YEAR,
        SOURCE_DEPARTMENT,
        SOURCE_COUNT,
    ] {
        let nulls = column(raw, name)?.null_count();
        if nulls > 0 {
            bail!("column {:?} has {} empty values", name, nulls);
        }
    }

    let sex = string_column(raw, SOURCE_SEX)?;
    let counts = int64_column(raw, SOURCE_COUNT)?;
    if let Some(row) = counts.iter().position(|c| c.is_some_and(|c| c < 0)) {
        bail!("negative count at row {}", row);
    }

    let trimmed: StringArray = sex.iter().map(|v| v.map(str::trim)).collect();
    let labels: StringArray = sex.iter().map(|v| v.map(sex_label)).collect();
    let departments = string_column(raw, SOURCE_DEPARTMENT)?
        .iter()
        .enumerate()
        .map(|(row, v)| {
            v.map(normalize_department)
                .transpose()
                .with_context(|| format!("row {}", row))
        })
        .collect::<Result<StringArray>>()?;

    let batch = RecordBatch::try_new(
        table_schema(),
        vec![
            Arc::new(trimmed),
            Arc::new(labels),
            column(raw, SOURCE_FIRST_NAME)?.clone(),
            column(raw, SOURCE_YEAR)?.clone(),
            Arc::new(departments),
            column(raw, SOURCE_COUNT)?.clone(),
        ],
    )
    .context("assembling cleaned table")?;
    debug!(rows = batch.num_rows(), "cleaned name table");

    NameTable::try_new(batch)
}
