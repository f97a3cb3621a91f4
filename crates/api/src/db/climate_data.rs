use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqliteConnection};
use time::{macros::format_description, Date, Duration};
use utoipa::ToSchema;

use super::{Database, Error};

/// Ties on the measurement count fall back to the station id so the ranking is stable.
const STATION_COUNTS_SQL: &str = "
    SELECT m.station AS station, s.name AS name, COUNT(m.station) AS count
    FROM measurement m
    JOIN station s ON m.station = s.station
    GROUP BY m.station
    ORDER BY count DESC, m.station ASC";

const STATS_FROM_SQL: &str = "
    SELECT MIN(tobs) AS tmin, AVG(tobs) AS tavg, MAX(tobs) AS tmax
    FROM measurement
    WHERE date >= ?";

const STATS_BETWEEN_SQL: &str = "
    SELECT MIN(tobs) AS tmin, AVG(tobs) AS tavg, MAX(tobs) AS tmax
    FROM measurement
    WHERE date >= ? AND date <= ?";

#[async_trait]
pub trait ClimateData: Sync + Send {
    /// Precipitation for the last year of data
    async fn precipitation(&self) -> Result<Vec<Precipitation>, Error>;
    /// Stations ranked by number of measurements, most active first
    async fn stations(&self) -> Result<Vec<StationActivity>, Error>;
    /// Last year of temperature observations from the most active station
    async fn temperature_observations(&self) -> Result<Vec<TemperatureObservation>, Error>;
    /// Min/avg/max temperature from `range.start` on, up to `range.end` when given
    async fn temperature_stats(&self, range: &DateRange) -> Result<Vec<TemperatureStats>, Error>;
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Precipitation {
    pub date: String,
    pub precipitation: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct StationActivity {
    pub station: String,
    pub name: String,
    pub count: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct TemperatureObservation {
    pub station: String,
    pub date: String,
    pub temperature: Option<f64>,
}

/// Null aggregates mean no observation matched the range.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct TemperatureStats {
    pub tmin: Option<f64>,
    pub tavg: Option<f64>,
    pub tmax: Option<f64>,
}

/// Date bounds as given in the request path. Not validated: dates are compared as strings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DateRange {
    pub start: String,
    pub end: Option<String>,
}

/// `(first, last]` bounds of the year leading up to the latest measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct DateWindow {
    pub first: String,
    pub last: String,
}

/// Parse an ISO `YYYY-MM-DD` date and step back 365 calendar days.
pub fn last_year_window(last_date: &str) -> Result<DateWindow, Error> {
    let day_format = format_description!("[year]-[month]-[day]");
    let last = Date::parse(last_date, day_format)?;
    let first = last
        .checked_sub(Duration::days(365))
        .ok_or_else(|| Error::DateRange(format!("cannot step a year back from {}", last_date)))?;

    Ok(DateWindow {
        first: first.format(day_format)?,
        last: last.format(day_format)?,
    })
}

pub struct ClimateAccess {
    db: Database,
}

impl ClimateAccess {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Window ending at the latest measurement date, `None` when there are no measurements.
    async fn last_year(conn: &mut SqliteConnection) -> Result<Option<DateWindow>, Error> {
        let last_date: Option<String> = sqlx::query_scalar("SELECT MAX(date) FROM measurement")
            .fetch_one(&mut *conn)
            .await?;

        last_date.as_deref().map(last_year_window).transpose()
    }

    async fn station_counts(conn: &mut SqliteConnection) -> Result<Vec<StationActivity>, Error> {
        let rows = sqlx::query(STATION_COUNTS_SQL)
            .fetch_all(&mut *conn)
            .await?;

        rows.iter()
            .map(|row| -> Result<StationActivity, Error> {
                Ok(StationActivity {
                    station: row.try_get("station")?,
                    name: row.try_get("name")?,
                    count: row.try_get("count")?,
                })
            })
            .collect()
    }
}

// Every operation holds a single pooled connection; it goes back to the pool when dropped.
#[async_trait]
impl ClimateData for ClimateAccess {
    async fn precipitation(&self) -> Result<Vec<Precipitation>, Error> {
        let mut conn = self.db.pool().acquire().await?;
        let Some(window) = Self::last_year(&mut conn).await? else {
            return Ok(vec![]);
        };

        let rows = sqlx::query("SELECT date, prcp FROM measurement WHERE date > ? AND date <= ?")
            .bind(&window.first)
            .bind(&window.last)
            .fetch_all(&mut *conn)
            .await?;

        rows.iter()
            .map(|row| -> Result<Precipitation, Error> {
                Ok(Precipitation {
                    date: row.try_get("date")?,
                    precipitation: row.try_get("prcp")?,
                })
            })
            .collect()
    }

    async fn stations(&self) -> Result<Vec<StationActivity>, Error> {
        let mut conn = self.db.pool().acquire().await?;
        Self::station_counts(&mut conn).await
    }

    async fn temperature_observations(&self) -> Result<Vec<TemperatureObservation>, Error> {
        let mut conn = self.db.pool().acquire().await?;
        let Some(most_active) = Self::station_counts(&mut conn).await?.into_iter().next() else {
            return Ok(vec![]);
        };
        let Some(window) = Self::last_year(&mut conn).await? else {
            return Ok(vec![]);
        };

        let rows = sqlx::query(
            "SELECT station, date, tobs FROM measurement
             WHERE station = ? AND date > ? AND date <= ?",
        )
        .bind(&most_active.station)
        .bind(&window.first)
        .bind(&window.last)
        .fetch_all(&mut *conn)
        .await?;

        rows.iter()
            .map(|row| -> Result<TemperatureObservation, Error> {
                Ok(TemperatureObservation {
                    station: row.try_get("station")?,
                    date: row.try_get("date")?,
                    temperature: row.try_get("tobs")?,
                })
            })
            .collect()
    }

    async fn temperature_stats(&self, range: &DateRange) -> Result<Vec<TemperatureStats>, Error> {
        let mut conn = self.db.pool().acquire().await?;
        let query = match &range.end {
            Some(end) => sqlx::query(STATS_BETWEEN_SQL).bind(&range.start).bind(end),
            None => sqlx::query(STATS_FROM_SQL).bind(&range.start),
        };
        let row = query.fetch_one(&mut *conn).await?;

        Ok(vec![TemperatureStats {
            tmin: row.try_get("tmin")?,
            tavg: row.try_get("tavg")?,
            tmax: row.try_get("tmax")?,
        }])
    }
}
