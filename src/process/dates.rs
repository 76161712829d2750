use crate::error::Result;
use crate::process::utils;
use arrow::{
    array::ArrayRef,
    compute::kernels::temporal::{date_part, DatePart},
    datatypes::{DataType, Field, Schema},
    record_batch::{RecordBatch, RecordBatchOptions},
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Split each datetime column `c` into `c_year` and `c_month` (`Int32`).
///
/// The result carries only the derived columns, in the order given, and keeps
/// the input row count. Nulls stay null. Timestamps with a timezone are read
/// in that timezone.
#[instrument(level = "debug", skip(batch), fields(rows = batch.num_rows()))]
pub fn create_date_columns(batch: &RecordBatch, columns: &[&str]) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(columns.len() * 2);
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(columns.len() * 2);

    for &name in columns {
        let source = utils::datetime_column(batch, name)?;
        for (suffix, part) in [("year", DatePart::Year), ("month", DatePart::Month)] {
            let derived = date_part(source.as_ref(), part)?;
            fields.push(Field::new(format!("{name}_{suffix}"), DataType::Int32, true));
            arrays.push(derived);
        }
    }
    debug!(derived = arrays.len(), "date columns built");

    let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
    RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)
        .map_err(Into::into)
}
