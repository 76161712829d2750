//! Table transforms over Arrow record batches.
//!
//! Every function takes the batch by reference and returns a new one; none of
//! them depend on each other.

pub mod boolean;
pub mod dates;
pub mod delta;
pub mod group;
pub mod read;
pub mod utils;

pub use boolean::convert_to_boolean;
pub use dates::create_date_columns;
pub use delta::{build_date_relationship, AVG_MONTH_NANOS};
pub use group::{group_data, PERCENT_COLUMN, VOLUME_COLUMN};
pub use read::read_file;

#[cfg(test)]
pub(crate) fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tabprep=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
