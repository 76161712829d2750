use crate::error::Result;
use crate::process::utils::{self, NANOS_PER_SECOND};
use arrow::{
    array::{Array, ArrayRef, DurationNanosecondArray},
    compute::kernels::arity::try_binary,
    datatypes::{DataType, Field, Int64Type, Schema, TimeUnit},
    error::ArrowError,
    record_batch::RecordBatch,
};
use chrono::TimeDelta;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Average Gregorian month (365.2425 / 12 days = 2 629 746 s).
pub const AVG_MONTH_NANOS: i64 = 2_629_746 * NANOS_PER_SECOND;

/// Elapsed time from `column_min` to `column_max`, row by row.
///
/// Returns three columns:
/// - `new_column`: the signed difference as `Duration(Nanosecond)`
/// - `{new_column}_days`: whole days, truncated toward zero
/// - `{new_column}_months`: whole average months, truncated toward zero
///
/// Nothing forces `column_max` to be the later value, so results may be
/// negative. A null on either side yields nulls in all three outputs.
#[instrument(level = "debug", skip(batch), fields(rows = batch.num_rows()))]
pub fn build_date_relationship(
    batch: &RecordBatch,
    column_min: &str,
    column_max: &str,
    new_column: &str,
) -> Result<RecordBatch> {
    let lower = utils::epoch_nanos(utils::datetime_column(batch, column_min)?.as_ref())?;
    let upper = utils::epoch_nanos(utils::datetime_column(batch, column_max)?.as_ref())?;

    let raw: DurationNanosecondArray = try_binary(&upper, &lower, |u: i64, l: i64| {
        u.checked_sub(l).ok_or_else(|| {
            ArrowError::ComputeError(format!("{u} - {l} overflows a nanosecond duration"))
        })
    })?;
    let days = raw.unary::<_, Int64Type>(|ns| TimeDelta::nanoseconds(ns).num_days());
    let months = raw.unary::<_, Int64Type>(|ns| ns / AVG_MONTH_NANOS);
    debug!(nulls = raw.null_count(), "date deltas built");

    let schema = Schema::new(vec![
        Field::new(
            new_column,
            DataType::Duration(TimeUnit::Nanosecond),
            true,
        ),
        Field::new(format!("{new_column}_days"), DataType::Int64, true),
        Field::new(format!("{new_column}_months"), DataType::Int64, true),
    ]);
    let columns: Vec<ArrayRef> = vec![Arc::new(raw), Arc::new(days), Arc::new(months)];
    RecordBatch::try_new(Arc::new(schema), columns).map_err(Into::into)
}
