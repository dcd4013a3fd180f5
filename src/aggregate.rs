// src/aggregate.rs

use anyhow::Result;
use arrow::record_batch::RecordBatch;
use std::collections::BTreeMap;

use crate::data::{int32_column, int64_column, string_column, COUNT, DEPARTMENT, YEAR};

/// Sum of `count` per year, ascending.
pub fn sum_by_year(batch: &RecordBatch) -> Result<BTreeMap<i32, i64>> {
    let years = int32_column(batch, YEAR)?;
    let counts = int64_column(batch, COUNT)?;

    let mut totals = BTreeMap::new();
    for (year, count) in years.iter().zip(counts.iter()) {
        if let (Some(year), Some(count)) = (year, count) {
            *totals.entry(year).or_insert(0) += count;
        }
    }
    Ok(totals)
}

/// Sum of `count` per department code, ordered by code.
pub fn sum_by_department(batch: &RecordBatch) -> Result<BTreeMap<String, i64>> {
    let departments = string_column(batch, DEPARTMENT)?;
    let counts = int64_column(batch, COUNT)?;

    let mut totals: BTreeMap<String, i64> = BTreeMap::new();
    for (department, count) in departments.iter().zip(counts.iter()) {
        if let (Some(department), Some(count)) = (department, count) {
            match totals.get_mut(department) {
                Some(total) => *total += count,
                None => {
                    totals.insert(department.to_string(), count);
                }
            }
        }
    }
    Ok(totals)
}
