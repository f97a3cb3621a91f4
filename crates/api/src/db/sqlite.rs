use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::{str::FromStr, time::Duration};

use super::Error;

/// Tables and columns the queries rely on. Anything else in the dataset is ignored.
const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("measurement", &["station", "date", "prcp", "tobs"]),
    ("station", &["station", "name"]),
];

const MAX_CONNECTIONS: u32 = 5;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the dataset read-only. The file must already exist.
    pub async fn open(path: &str) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .read_only(true)
            .create_if_missing(false)
            .pragma("busy_timeout", "5000")
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "MEMORY");

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        info!("SQLite dataset opened read-only at: {}", path);
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Make sure the measurement and station tables carry the columns we query.
    pub async fn verify_schema(&self) -> Result<(), Error> {
        for (table, columns) in REQUIRED_COLUMNS {
            let present: Vec<String> =
                sqlx::query_scalar("SELECT name FROM pragma_table_info(?)")
                    .bind(*table)
                    .fetch_all(&self.pool)
                    .await?;

            if present.is_empty() {
                return Err(Error::Schema(format!("missing table '{}'", table)));
            }

            let missing: Vec<&str> = columns
                .iter()
                .copied()
                .filter(|column| !present.iter().any(|p| p == column))
                .collect();

            if !missing.is_empty() {
                return Err(Error::Schema(format!(
                    "table '{}' is missing column(s): {}",
                    table,
                    missing.join(", ")
                )));
            }
        }
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("SQLite dataset closed");
    }
}
