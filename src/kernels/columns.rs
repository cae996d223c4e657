//! This module contains the pure, stateless column kernels used when shaping
//! tagged frames and document indexes.
//!
//! Each kernel takes one Arrow array and returns a new one. None of them look at
//! column names; picking the column is the caller's job.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Int64Array, StringArray};
use arrow::compute::{self, cast};
use arrow::datatypes::{DataType, Int64Type};
use num_traits::Bounded;

use crate::error::BolimaError;

//==================================================================================
// 1. String Columns
//==================================================================================

/// Lowercases every value, keeping nulls.
pub fn lowercase(array: &StringArray) -> StringArray {
    array.iter().map(|value| value.map(str::to_lowercase)).collect()
}

/// Replaces nulls with `fill`.
pub fn fill_nulls(array: &StringArray, fill: &str) -> StringArray {
    if array.null_count() == 0 {
        return array.clone();
    }
    array
        .iter()
        .map(|value| Some(value.unwrap_or(fill)))
        .collect()
}

//==================================================================================
// 2. Integer Columns
//==================================================================================

/// Adds `offset` to every value, keeping nulls.
pub fn add_offset(array: &Int64Array, offset: i64) -> Int64Array {
    array.unary::<_, Int64Type>(|value| value + offset)
}

/// Returns true if `max` is strictly below the largest value of `T`.
fn fits_below<T: Bounded + Into<i64>>(max: i64) -> bool {
    max < T::max_value().into()
}

/// Picks the narrowest integer type of the ladder `Int16 -> Int32` that holds
/// `max`, falling back to `Int64`.
pub fn narrowest_integer_type(max: i64) -> DataType {
    if fits_below::<i16>(max) {
        DataType::Int16
    } else if fits_below::<i32>(max) {
        DataType::Int32
    } else {
        DataType::Int64
    }
}

/// Casts an integer column to the narrowest type of the ladder that can hold its
/// observed maximum. Empty or all-null columns are returned as `Int64`.
pub fn downcast_integers(array: &ArrayRef) -> Result<ArrayRef, BolimaError> {
    let widened = cast(array, &DataType::Int64)?;
    let values = widened
        .as_any()
        .downcast_ref::<Int64Array>()
        .ok_or_else(|| BolimaError::ColumnError("integer column".to_string()))?;

    match compute::max(values) {
        Some(max) => Ok(cast(&widened, &narrowest_integer_type(max))?),
        None => Ok(Arc::new(values.clone())),
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
