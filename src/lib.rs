//! Preprocessing helpers for tabular data held in Arrow [`RecordBatch`]es.
//!
//! [`RecordBatch`]: arrow::record_batch::RecordBatch

pub mod error;
pub mod process;

pub use error::{Result, TransformError};
pub use process::{
    build_date_relationship, convert_to_boolean, create_date_columns, group_data, read_file,
};
