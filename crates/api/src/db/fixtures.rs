use sqlx::sqlite::SqlitePoolOptions;

use super::Database;

pub const DATASET_SCHEMA: &str = "
    CREATE TABLE measurement (
        id INTEGER NOT NULL,
        station TEXT,
        date TEXT,
        prcp FLOAT,
        tobs FLOAT,
        PRIMARY KEY (id)
    );
    CREATE TABLE station (
        id INTEGER NOT NULL,
        station TEXT,
        name TEXT,
        latitude FLOAT,
        longitude FLOAT,
        elevation FLOAT,
        PRIMARY KEY (id)
    );
";

/// Single-connection in-memory database; the connection never expires so the data survives.
pub async fn memory_database() -> Database {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    Database::from_pool(pool)
}

/// In-memory database with the dataset schema and the given rows.
pub async fn seeded_database(
    stations: &[(&str, &str)],
    measurements: &[(&str, &str, Option<f64>, Option<f64>)],
) -> Database {
    let db = memory_database().await;
    sqlx::raw_sql(DATASET_SCHEMA)
        .execute(db.pool())
        .await
        .expect("create schema");

    for (station, name) in stations {
        sqlx::query("INSERT INTO station (station, name) VALUES (?, ?)")
            .bind(station)
            .bind(name)
            .execute(db.pool())
            .await
            .expect("insert station");
    }

    for (station, date, prcp, tobs) in measurements {
        sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES (?, ?, ?, ?)")
            .bind(station)
            .bind(date)
            .bind(prcp)
            .bind(tobs)
            .execute(db.pool())
            .await
            .expect("insert measurement");
    }

    db
}
