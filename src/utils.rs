//! This module provides a set of shared, low-level `RecordBatch` helpers used
//! throughout the crate.
//!
//! Arrow batches are immutable; every helper here returns a new batch that shares
//! the untouched column buffers with its input. Column lookups are by name and
//! fail with `BolimaError::ColumnError` when the column is absent.

use std::collections::BTreeMap;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Int64Array, RecordBatch, StringArray, UInt32Array};
use arrow::compute::{cast, take};
use arrow::datatypes::{DataType, Field, Schema};

use crate::error::BolimaError;

//==================================================================================
// 1. Column Access
//==================================================================================

pub fn has_column(batch: &RecordBatch, name: &str) -> bool {
    batch.schema().index_of(name).is_ok()
}

pub fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef, BolimaError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| BolimaError::ColumnError(name.to_string()))
}

/// Returns the named column as UTF-8 strings, casting from other string-like types.
pub fn string_column(batch: &RecordBatch, name: &str) -> Result<StringArray, BolimaError> {
    let array = cast(column(batch, name)?, &DataType::Utf8)?;
    array
        .as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| BolimaError::ColumnError(name.to_string()))
}

/// Returns the named column as 64-bit integers, widening narrower integer types.
pub fn int64_column(batch: &RecordBatch, name: &str) -> Result<Int64Array, BolimaError> {
    let array = cast(column(batch, name)?, &DataType::Int64)?;
    array
        .as_any()
        .downcast_ref::<Int64Array>()
        .cloned()
        .ok_or_else(|| BolimaError::ColumnError(name.to_string()))
}

//==================================================================================
// 2. Column Edits
//==================================================================================

fn rebuild(fields: Vec<Field>, columns: Vec<ArrayRef>) -> Result<RecordBatch, BolimaError> {
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

fn parts(batch: &RecordBatch) -> (Vec<Field>, Vec<ArrayRef>) {
    let fields = batch
        .schema()
        .fields()
        .iter()
        .map(|field| field.as_ref().clone())
        .collect();
    (fields, batch.columns().to_vec())
}

/// Replaces the named column in place, or appends it if the batch lacks it.
pub fn replace_column(
    batch: &RecordBatch,
    name: &str,
    array: ArrayRef,
) -> Result<RecordBatch, BolimaError> {
    let (mut fields, mut columns) = parts(batch);
    let field = Field::new(name, array.data_type().clone(), true);
    match batch.schema().index_of(name) {
        Ok(idx) => {
            fields[idx] = field;
            columns[idx] = array;
        }
        Err(_) => {
            fields.push(field);
            columns.push(array);
        }
    }
    rebuild(fields, columns)
}

/// Inserts a column at `position`, shifting later columns right.
pub fn insert_column(
    batch: &RecordBatch,
    position: usize,
    name: &str,
    array: ArrayRef,
) -> Result<RecordBatch, BolimaError> {
    let (mut fields, mut columns) = parts(batch);
    let position = position.min(fields.len());
    fields.insert(position, Field::new(name, array.data_type().clone(), true));
    columns.insert(position, array);
    rebuild(fields, columns)
}

/// Drops the named columns. Names the batch does not have are ignored.
pub fn drop_columns(batch: &RecordBatch, names: &[&str]) -> Result<RecordBatch, BolimaError> {
    let keep: Vec<usize> = batch
        .schema()
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, field)| !names.contains(&field.name().as_str()))
        .map(|(idx, _)| idx)
        .collect();
    if keep.len() == batch.num_columns() {
        return Ok(batch.clone());
    }
    Ok(batch.project(&keep)?)
}

/// Renames `from` to `to`. A batch without `from` is returned unchanged.
pub fn rename_column(batch: &RecordBatch, from: &str, to: &str) -> Result<RecordBatch, BolimaError> {
    let Ok(idx) = batch.schema().index_of(from) else {
        return Ok(batch.clone());
    };
    let (mut fields, columns) = parts(batch);
    fields[idx] = fields[idx].clone().with_name(to);
    rebuild(fields, columns)
}

//==================================================================================
// 3. Row Grouping
//==================================================================================

/// Creates an index map from a `RecordBatch` based on a string key column.
///
/// It scans the key column and produces a map where each key maps to the row
/// indices where that key appeared, in row order. The map iterates in sorted key
/// order. Null keys are skipped.
pub fn create_index_map(
    batch: &RecordBatch,
    key_column: &str,
) -> Result<BTreeMap<String, Vec<u32>>, BolimaError> {
    let keys = string_column(batch, key_column)?;

    let mut key_to_indices: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for (row_idx, key) in keys.iter().enumerate() {
        if let Some(k) = key {
            let row_idx = u32::try_from(row_idx)
                .map_err(|_| BolimaError::ColumnError(key_column.to_string()))?;
            key_to_indices.entry(k.to_string()).or_default().push(row_idx);
        }
    }
    Ok(key_to_indices)
}

/// Gathers the given rows of every column into a new batch.
pub fn take_rows(batch: &RecordBatch, indices: &[u32]) -> Result<RecordBatch, BolimaError> {
    let indices_array = UInt32Array::from(indices.to_vec());
    let mut new_columns = Vec::with_capacity(batch.num_columns());
    for col in batch.columns() {
        new_columns.push(take(col.as_ref(), &indices_array, None)?);
    }
    Ok(RecordBatch::try_new(batch.schema(), new_columns)?)
}
