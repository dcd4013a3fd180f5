// src/data/mod.rs

pub mod boundaries;
pub mod clean;
pub mod load;
pub mod write;

use anyhow::{anyhow, bail, Context, Result};
use arrow::{
    array::{Array, ArrayRef, Int32Array, Int64Array, StringArray},
    compute::{max, min},
    datatypes::{DataType, Field, Schema, SchemaRef},
    record_batch::RecordBatch,
};
use std::{collections::HashSet, sync::Arc};

pub use boundaries::{load_boundaries, Boundaries, DEFAULT_BOUNDARIES_URL};
pub use clean::{clean, normalize_department, sex_label, RawRecord};
pub use load::load_table;
pub use write::write_parquet;

pub const SEX: &str = "sex";
pub const SEX_LABEL: &str = "sex_label";
pub const FIRST_NAME: &str = "first_name";
pub const YEAR: &str = "year";
pub const DEPARTMENT: &str = "department";
pub const COUNT: &str = "count";

/// Schema of the cleaned table, in canonical column order.
pub fn table_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(SEX, DataType::Utf8, false),
        Field::new(SEX_LABEL, DataType::Utf8, false),
        Field::new(FIRST_NAME, DataType::Utf8, false),
        Field::new(YEAR, DataType::Int32, false),
        Field::new(DEPARTMENT, DataType::Utf8, false),
        Field::new(COUNT, DataType::Int64, false),
    ]))
}

/// The cleaned first-name table. Immutable once built; filters derive new batches.
#[derive(Debug, Clone, PartialEq)]
pub struct NameTable {
    batch: RecordBatch,
}

impl NameTable {
    /// Wrap a batch that already carries the cleaned columns. Columns are
    /// matched by name and reordered into the canonical schema.
    pub fn try_new(batch: RecordBatch) -> Result<Self> {
        let schema = table_schema();
        let mut columns = Vec::with_capacity(schema.fields().len());
        for field in schema.fields() {
            let found = batch
                .schema()
                .field_with_name(field.name())
                .map(|f| f.data_type().clone())
                .map_err(|_| anyhow!("table is missing column {:?}", field.name()))?;
            if &found != field.data_type() {
                bail!(
                    "column {:?} has type {}, expected {}",
                    field.name(),
                    found,
                    field.data_type()
                );
            }
            columns.push(column(&batch, field.name())?.clone());
        }
        let batch = RecordBatch::try_new(schema, columns).context("building name table")?;
        Ok(Self { batch })
    }

    /// Build a table from raw (uncleaned) records, running the same cleaning
    /// pass as the file loader.
    pub fn from_records(records: &[RawRecord]) -> Result<Self> {
        clean(&clean::raw_batch(records)?)
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn len(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    /// Smallest and largest year present, or `None` for an empty table.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let years = int32_column(&self.batch, YEAR).ok()?;
        Some((min(years)?, max(years)?))
    }

    /// Distinct sex labels in order of first appearance.
    pub fn sex_labels(&self) -> Result<Vec<String>> {
        Ok(distinct_in_order(string_column(&self.batch, SEX_LABEL)?))
    }

    /// Distinct normalised department codes in order of first appearance.
    pub fn departments(&self) -> Result<Vec<String>> {
        Ok(distinct_in_order(string_column(&self.batch, DEPARTMENT)?))
    }
}

fn distinct_in_order(array: &StringArray) -> Vec<String> {
    let mut seen = HashSet::new();
    array
        .iter()
        .flatten()
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}

pub(crate) fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| anyhow!("missing column {:?}", name))
}

pub(crate) fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    column(batch, name)?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| anyhow!("column {:?} is not a string column", name))
}

pub(crate) fn int32_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Int32Array> {
    column(batch, name)?
        .as_any()
        .downcast_ref::<Int32Array>()
        .ok_or_else(|| anyhow!("column {:?} is not an Int32 column", name))
}

pub(crate) fn int64_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Int64Array> {
    column(batch, name)?
        .as_any()
        .downcast_ref::<Int64Array>()
        .ok_or_else(|| anyhow!("column {:?} is not an Int64 column", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{record, sample_table};

    #[test]
    fn test_year_bounds_and_distinct_values() {
        let table = sample_table();
        assert_eq!(table.year_bounds(), Some((1950, 2001)));
        assert_eq!(table.sex_labels().unwrap(), vec!["Man", "Woman"]);
        assert_eq!(table.departments().unwrap(), vec!["01", "75", "2A"]);
    }

    #[test]
    fn test_empty_table_has_no_bounds() {
        let table = NameTable::from_records(&[]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.year_bounds(), None);
        assert!(table.departments().unwrap().is_empty());
    }

    #[test]
    fn test_try_new_reorders_columns() {
        let table = NameTable::from_records(&[record("1", "Jean", 1950, "1", 100)]).unwrap();
        let batch = table.batch();
        let reversed_schema = Arc::new(Schema::new(
            batch
                .schema()
                .fields()
                .iter()
                .rev()
                .map(|f| f.as_ref().clone())
                .collect::<Vec<_>>(),
        ));
        let reversed =
            RecordBatch::try_new(reversed_schema, batch.columns().iter().rev().cloned().collect())
                .unwrap();

        let rebuilt = NameTable::try_new(reversed).unwrap();
        assert_eq!(rebuilt, table);
    }

    #[test]
    fn test_try_new_rejects_wrong_type() {
        let schema = Arc::new(Schema::new(vec![Field::new(SEX, DataType::Int32, false)]));
        let batch =
            RecordBatch::try_new(schema, vec![Arc::new(Int32Array::from(vec![1])) as ArrayRef])
                .unwrap();
        let err = NameTable::try_new(batch).unwrap_err();
        assert!(err.to_string().contains("\"sex\""));
    }
}
