use crate::error::{Result, TransformError};
use arrow::{
    array::{Array, ArrayRef, AsArray, BooleanArray, Int64Array},
    datatypes::{
        ArrowPrimitiveType, DataType, Date32Type, Date64Type, Float32Type, Float64Type, Int64Type,
        TimeUnit, TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
        TimestampSecondType,
    },
    error::ArrowError,
    record_batch::RecordBatch,
};

pub const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub const NANOS_PER_DAY: i64 = 86_400 * NANOS_PER_SECOND;

/// Look up `name` in the batch schema.
pub fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<(usize, &'a ArrayRef)> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| TransformError::ColumnNotFound(name.to_string()))?;
    Ok((idx, batch.column(idx)))
}

/// Timestamps of any unit/timezone and both date types count as datetime.
pub fn is_datetime(dt: &DataType) -> bool {
    matches!(
        dt,
        DataType::Timestamp(_, _) | DataType::Date32 | DataType::Date64
    )
}

/// Like [`column`], but also rejects non-datetime columns.
pub fn datetime_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    let (_, arr) = column(batch, name)?;
    if !is_datetime(arr.data_type()) {
        return Err(TransformError::TypeMismatch {
            column: name.to_string(),
            found: arr.data_type().clone(),
        });
    }
    Ok(arr)
}

/// `true` for every row holding a value. Nulls are missing, and so is `NaN`
/// in float columns.
pub fn presence_mask(array: &dyn Array) -> BooleanArray {
    match array.data_type() {
        DataType::Float64 => array
            .as_primitive::<Float64Type>()
            .iter()
            .map(|v| Some(v.is_some_and(|x| !x.is_nan())))
            .collect(),
        DataType::Float32 => array
            .as_primitive::<Float32Type>()
            .iter()
            .map(|v| Some(v.is_some_and(|x| !x.is_nan())))
            .collect(),
        _ => match array.logical_nulls() {
            Some(nulls) => nulls.iter().map(Some).collect(),
            None => BooleanArray::from(vec![true; array.len()]),
        },
    }
}

/// Convert a datetime column into signed nanoseconds since the Unix epoch (UTC).
///
/// Dates are taken at midnight UTC. Values outside the `i64` nanosecond range
/// fail with a compute error rather than wrapping.
pub fn epoch_nanos(array: &dyn Array) -> Result<Int64Array> {
    match array.data_type() {
        DataType::Timestamp(TimeUnit::Second, _) => {
            scale_to_nanos::<TimestampSecondType>(array, NANOS_PER_SECOND)
        }
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            scale_to_nanos::<TimestampMillisecondType>(array, 1_000_000)
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            scale_to_nanos::<TimestampMicrosecondType>(array, 1_000)
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            scale_to_nanos::<TimestampNanosecondType>(array, 1)
        }
        DataType::Date32 => scale_to_nanos::<Date32Type>(array, NANOS_PER_DAY),
        DataType::Date64 => scale_to_nanos::<Date64Type>(array, 1_000_000),
        other => Err(ArrowError::InvalidArgumentError(format!(
            "expected a timestamp or date array, got {other:?}"
        ))
        .into()),
    }
}

fn scale_to_nanos<T>(array: &dyn Array, factor: i64) -> Result<Int64Array>
where
    T: ArrowPrimitiveType,
    T::Native: Into<i64>,
{
    let scaled = array
        .as_primitive::<T>()
        .try_unary::<_, Int64Type, _>(|v| {
            let v: i64 = v.into();
            v.checked_mul(factor).ok_or_else(|| {
                ArrowError::ComputeError(format!("{v} overflows nanosecond precision"))
            })
        })?;
    Ok(scaled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{
        Date32Array, Float64Array, Int32Array, NullArray, StringArray, TimestampSecondArray,
    };
    use arrow::datatypes::{Field, Schema};
    use std::sync::Arc;

    #[test]
    fn test_column_lookup() {
        let schema = Schema::new(vec![
            Field::new("a", DataType::Int32, true),
            Field::new("b", DataType::Utf8, true),
        ]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(Int32Array::from(vec![1, 2])),
                Arc::new(StringArray::from(vec!["x", "y"])),
            ],
        )
        .unwrap();

        let (idx, arr) = column(&batch, "b").unwrap();
        assert_eq!(idx, 1);
        assert_eq!(arr.data_type(), &DataType::Utf8);

        let err = column(&batch, "c").unwrap_err();
        assert!(matches!(err, TransformError::ColumnNotFound(ref c) if c == "c"));

        let err = datetime_column(&batch, "a").unwrap_err();
        assert!(matches!(err, TransformError::TypeMismatch { ref column, .. } if column == "a"));
    }

    #[test]
    fn test_presence_mask_treats_nan_as_missing() {
        let floats = Float64Array::from(vec![Some(1.0), None, Some(f64::NAN)]);
        let mask = presence_mask(&floats);
        assert_eq!(mask, BooleanArray::from(vec![true, false, false]));

        let strings = StringArray::from(vec![None, Some(""), Some("x")]);
        let mask = presence_mask(&strings);
        assert_eq!(mask, BooleanArray::from(vec![false, true, true]));

        let nulls = NullArray::new(2);
        assert_eq!(presence_mask(&nulls), BooleanArray::from(vec![false, false]));
    }

    #[test]
    fn test_epoch_nanos_units() {
        let secs = TimestampSecondArray::from(vec![Some(2), None]);
        let nanos = epoch_nanos(&secs).unwrap();
        assert_eq!(nanos.value(0), 2 * NANOS_PER_SECOND);
        assert!(nanos.is_null(1));

        let days = Date32Array::from(vec![1, -1]);
        let nanos = epoch_nanos(&days).unwrap();
        assert_eq!(nanos.values().to_vec(), vec![NANOS_PER_DAY, -NANOS_PER_DAY]);

        let huge = TimestampSecondArray::from(vec![i64::MAX / 10]);
        assert!(matches!(
            epoch_nanos(&huge),
            Err(TransformError::Arrow(ArrowError::ComputeError(_)))
        ));
    }
}
