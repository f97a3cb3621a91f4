pub mod climate_data;
pub mod sqlite;

pub use climate_data::*;
pub use sqlite::*;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Failed to parse date string: {0}")]
    DateParse(#[from] time::error::Parse),
    #[error("Failed to format date string: {0}")]
    DateFormat(#[from] time::error::Format),
    #[error("Date out of range: {0}")]
    DateRange(String),
    #[error("Dataset schema mismatch: {0}")]
    Schema(String),
}

#[cfg(test)]
pub(crate) mod fixtures;
