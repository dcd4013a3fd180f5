//! Row filters over the cleaned name table.
//! Each filter is an independent predicate; a row survives when every
//! predicate holds, so the order they are applied in does not matter.

use anyhow::Result;
use arrow::{
    array::{BooleanArray, Int32Array, StringArray},
    compute::{and, filter_record_batch, kernels::cmp::{eq, gt_eq, lt_eq}},
    record_batch::RecordBatch,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::data::{int32_column, string_column, DEPARTMENT, FIRST_NAME, SEX_LABEL, YEAR};

/// Control values sent by the page on every change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    /// Exact, case-sensitive first name. Empty or absent means no name filter.
    pub name: Option<String>,
    /// Sex labels to keep. Empty means all.
    pub sexes: Vec<String>,
    /// Inclusive year bounds. Absent means the table's full range.
    pub years: Option<[i32; 2]>,
    /// Department codes to keep. Absent or empty means all.
    pub departments: Option<Vec<String>>,
}

impl FilterParams {
    /// The name filter text, if it actually filters anything.
    pub fn name_filter(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Translate the control values into predicates. The year predicate is
    /// always present; `full_range` stands in when no years were sent.
    pub fn predicates(&self, full_range: (i32, i32)) -> Vec<Predicate> {
        let mut predicates = Vec::with_capacity(4);
        if let Some(name) = self.name_filter() {
            predicates.push(Predicate::NameEquals(name.to_string()));
        }
        if !self.sexes.is_empty() {
            predicates.push(Predicate::SexIn(self.sexes.iter().cloned().collect()));
        }
        let [from, to] = self.years.unwrap_or([full_range.0, full_range.1]);
        predicates.push(Predicate::YearBetween(from, to));
        if let Some(departments) = self.departments.as_ref().filter(|d| !d.is_empty()) {
            predicates.push(Predicate::DepartmentIn(departments.iter().cloned().collect()));
        }
        predicates
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    NameEquals(String),
    SexIn(BTreeSet<String>),
    /// Inclusive on both ends; an inverted range matches nothing.
    YearBetween(i32, i32),
    DepartmentIn(BTreeSet<String>),
}

impl Predicate {
    /// Row mask for `batch`.
    pub fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        let mask = match self {
            Self::NameEquals(name) => eq(
                string_column(batch, FIRST_NAME)?,
                &StringArray::new_scalar(name.as_str()),
            )?,
            Self::SexIn(labels) => membership(string_column(batch, SEX_LABEL)?, labels),
            Self::YearBetween(from, to) => {
                let years = int32_column(batch, YEAR)?;
                and(
                    &gt_eq(years, &Int32Array::new_scalar(*from))?,
                    &lt_eq(years, &Int32Array::new_scalar(*to))?,
                )?
            }
            Self::DepartmentIn(codes) => membership(string_column(batch, DEPARTMENT)?, codes),
        };
        Ok(mask)
    }
}

fn membership(column: &StringArray, values: &BTreeSet<String>) -> BooleanArray {
    column
        .iter()
        .map(|v| Some(v.is_some_and(|v| values.contains(v))))
        .collect()
}

/// Keep the rows of `batch` that satisfy every predicate.
pub fn apply(batch: &RecordBatch, predicates: &[Predicate]) -> Result<RecordBatch> {
    let mut combined: Option<BooleanArray> = None;
    for predicate in predicates {
        let mask = predicate.mask(batch)?;
        combined = Some(match combined {
            Some(acc) => and(&acc, &mask)?,
            None => mask,
        });
    }

    match combined {
        Some(mask) => Ok(filter_record_batch(batch, &mask)?),
        None => Ok(batch.clone()),
    }
}
