use crate::error::Result;
use crate::process::utils;
use arrow::{
    array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray},
    compute::{cast, kernels::cmp},
    datatypes::{DataType, Field, FieldRef, Schema},
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Derive a boolean flag column from `column`.
///
/// With a non-empty `consider_column_value` a row is `true` when its value
/// equals it, nulls are `false`. Numeric columns compare against the parsed
/// number (`"1"` matches `1.0`, text that is not a number matches nothing);
/// every other type compares as text. Otherwise a row is `true`
/// when the value is present. The flag lands in `new_column_name`, defaulting
/// to `column` itself; an existing column of that name is replaced in place.
#[instrument(level = "debug", skip(batch), fields(rows = batch.num_rows()))]
pub fn convert_to_boolean(
    batch: &RecordBatch,
    column: &str,
    new_column_name: Option<&str>,
    consider_column_value: Option<&str>,
) -> Result<RecordBatch> {
    let (_, source) = utils::column(batch, column)?;
    let target = new_column_name.unwrap_or(column);

    let flags = match consider_column_value.filter(|v| !v.is_empty()) {
        Some(value) => equality_mask(source, value)?,
        None => utils::presence_mask(source.as_ref()),
    };
    debug!(column = target, true_count = flags.true_count(), "boolean column built");

    with_column(batch, target, Arc::new(flags))
}

fn equality_mask(source: &ArrayRef, value: &str) -> Result<BooleanArray> {
    let dt = source.data_type();
    let eq = if dt.is_integer() {
        match value.trim().parse::<i64>() {
            Ok(v) => cmp::eq(&cast(source, &DataType::Int64)?, &Int64Array::new_scalar(v))?,
            Err(_) => float_eq(source, value)?,
        }
    } else if dt.is_floating() {
        float_eq(source, value)?
    } else {
        let text = match dt {
            DataType::Utf8 => source.clone(),
            _ => cast(source, &DataType::Utf8)?,
        };
        cmp::eq(&text, &StringArray::new_scalar(value))?
    };
    Ok(eq.iter().map(|v| Some(v.unwrap_or(false))).collect())
}

/// Null everywhere when `value` is not a number.
fn float_eq(source: &ArrayRef, value: &str) -> Result<BooleanArray> {
    match value.trim().parse::<f64>() {
        Ok(v) => {
            let floats = cast(source, &DataType::Float64)?;
            Ok(cmp::eq(&floats, &Float64Array::new_scalar(v))?)
        }
        Err(_) => Ok(BooleanArray::new_null(source.len())),
    }
}

/// Replace the column called `name`, or append it when absent.
fn with_column(batch: &RecordBatch, name: &str, array: ArrayRef) -> Result<RecordBatch> {
    let schema = batch.schema();
    let field: FieldRef = Arc::new(Field::new(name, array.data_type().clone(), false));
    let mut fields: Vec<FieldRef> = schema.fields().iter().cloned().collect();
    let mut columns = batch.columns().to_vec();

    match schema.index_of(name) {
        Ok(idx) => {
            fields[idx] = field;
            columns[idx] = array;
        }
        Err(_) => {
            fields.push(field);
            columns.push(array);
        }
    }

    let schema = Schema::new_with_metadata(fields, schema.metadata().clone());
    RecordBatch::try_new(Arc::new(schema), columns).map_err(Into::into)
}
