use crate::error::{Result, TransformError};
use crate::process::utils;
use arrow::{
    array::{ArrayRef, BooleanArray, Float64Array, Int64Array, UInt64Array},
    compute::take,
    datatypes::{DataType, Field, FieldRef, Schema},
    record_batch::RecordBatch,
    row::{RowConverter, SortField},
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

pub const VOLUME_COLUMN: &str = "volume";
pub const PERCENT_COLUMN: &str = "percent";

/// Count rows per distinct `group_columns` key and attach each group's share.
///
/// Output: the key columns, `volume` (`Int64`) and `percent` (`Float64`),
/// one row per key, largest volume first. Groups with equal volume keep the
/// order in which their key first appears in `batch`.
///
/// Volume counts the non-missing values of the last column that is not part
/// of the key. Rows with a missing key component are left out entirely.
#[instrument(level = "debug", skip(batch), fields(rows = batch.num_rows()))]
pub fn group_data(batch: &RecordBatch, group_columns: &[&str]) -> Result<RecordBatch> {
    if group_columns.is_empty() {
        return Err(TransformError::EmptyGroup);
    }

    let schema = batch.schema();
    let mut key_fields: Vec<FieldRef> = Vec::with_capacity(group_columns.len());
    let mut keys: Vec<ArrayRef> = Vec::with_capacity(group_columns.len());
    for &name in group_columns {
        let (idx, arr) = utils::column(batch, name)?;
        key_fields.push(Arc::new(schema.field(idx).clone()));
        keys.push(arr.clone());
    }

    let value_idx = (0..batch.num_columns())
        .rev()
        .find(|&i| !group_columns.contains(&schema.field(i).name().as_str()))
        .ok_or(TransformError::NoValueColumn)?;
    let counted = utils::presence_mask(batch.column(value_idx).as_ref());
    let key_present: Vec<BooleanArray> = keys
        .iter()
        .map(|k| utils::presence_mask(k.as_ref()))
        .collect();

    let converter = RowConverter::new(
        keys.iter()
            .map(|k| SortField::new(k.data_type().clone()))
            .collect(),
    )?;
    let rows = converter.convert_columns(&keys)?;

    // group slot -> (first row seen, volume)
    let mut slots = HashMap::new();
    let mut first_rows: Vec<u64> = Vec::new();
    let mut volumes: Vec<i64> = Vec::new();
    for row in 0..batch.num_rows() {
        if !key_present.iter().all(|m| m.value(row)) {
            continue;
        }
        let slot = *slots.entry(rows.row(row)).or_insert_with(|| {
            first_rows.push(row as u64);
            volumes.push(0);
            volumes.len() - 1
        });
        if counted.value(row) {
            volumes[slot] += 1;
        }
    }

    let mut order: Vec<usize> = (0..volumes.len()).collect();
    order.sort_by(|&a, &b| volumes[b].cmp(&volumes[a]));

    let take_idx = UInt64Array::from_iter_values(order.iter().map(|&g| first_rows[g]));
    let mut columns = Vec::with_capacity(keys.len() + 2);
    for key in &keys {
        columns.push(take(key.as_ref(), &take_idx, None)?);
    }

    let total: i64 = volumes.iter().sum();
    let volume = Int64Array::from_iter_values(order.iter().map(|&g| volumes[g]));
    let percent =
        Float64Array::from_iter_values(volume.values().iter().map(|&v| v as f64 / total as f64));
    debug!(
        groups = order.len(),
        total,
        counted_column = %schema.field(value_idx).name(),
        "grouped"
    );
    columns.push(Arc::new(volume) as ArrayRef);
    columns.push(Arc::new(percent) as ArrayRef);

    let mut fields = key_fields;
    fields.push(Arc::new(Field::new(VOLUME_COLUMN, DataType::Int64, false)));
    fields.push(Arc::new(Field::new(PERCENT_COLUMN, DataType::Float64, false)));

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).map_err(Into::into)
}
