use crate::helpers::{dataset_path, seed_dataset, spawn_dataset_app, MeasurementRow};
use axum::http::StatusCode;
use climate_api::open_dataset;
use serde_json::{json, Value};

const STATIONS: &[(&str, &str)] = &[
    ("USC00519397", "WAIKIKI 717.2, HI US"),
    ("USC00519281", "WAIHEE 837.5, HI US"),
];

const MEASUREMENTS: &[MeasurementRow<'static>] = &[
    ("USC00519281", "2016-08-23", Some(1.79), Some(77.0)),
    ("USC00519281", "2016-08-24", Some(2.15), Some(77.0)),
    ("USC00519281", "2017-08-18", Some(0.06), Some(79.0)),
    ("USC00519397", "2017-08-22", Some(0.0), Some(80.0)),
    ("USC00519397", "2017-08-23", Some(0.1), Some(81.0)),
];

#[tokio::test]
async fn precipitation_over_seeded_dataset() {
    let dir = seed_dataset(STATIONS, MEASUREMENTS).await;
    let test_app = spawn_dataset_app(&dir).await;

    let (status, body) = test_app.get("/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        json,
        json!([
            {"Date": "2016-08-24", "Precipitation": 2.15},
            {"Date": "2017-08-18", "Precipitation": 0.06},
            {"Date": "2017-08-22", "Precipitation": 0.0},
            {"Date": "2017-08-23", "Precipitation": 0.1}
        ])
    );
}

#[tokio::test]
async fn tobs_match_first_ranked_station() {
    let dir = seed_dataset(STATIONS, MEASUREMENTS).await;
    let test_app = spawn_dataset_app(&dir).await;

    let (_, stations) = test_app.get("/api/v1.0/stations").await;
    let stations: Value = serde_json::from_str(&stations).unwrap();
    assert_eq!(
        stations,
        json!([
            {"Station": "USC00519281", "Name": "WAIHEE 837.5, HI US", "Count": 3},
            {"Station": "USC00519397", "Name": "WAIKIKI 717.2, HI US", "Count": 2}
        ])
    );

    let (status, tobs) = test_app.get("/api/v1.0/tobs").await;
    assert_eq!(status, StatusCode::OK);
    let tobs: Value = serde_json::from_str(&tobs).unwrap();
    assert_eq!(
        tobs,
        json!([
            {"Station": "USC00519281", "Date": "2016-08-24", "Temperature": 77.0},
            {"Station": "USC00519281", "Date": "2017-08-18", "Temperature": 79.0}
        ])
    );
}

#[tokio::test]
async fn temperature_stats_over_seeded_dataset() {
    let dir = seed_dataset(STATIONS, MEASUREMENTS).await;
    let test_app = spawn_dataset_app(&dir).await;

    let (status, body) = test_app.get("/api/v1.0/2017-08-22/2017-08-23").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json, json!([{"Tmin": 80.0, "Tavg": 80.5, "Tmax": 81.0}]));

    let (_, body) = test_app.get("/api/v1.0/2017-08-18").await;
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json, json!([{"Tmin": 79.0, "Tavg": 80.0, "Tmax": 81.0}]));

    let (_, body) = test_app.get("/api/v1.0/2017-08-23/2017-08-01").await;
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json, json!([{"Tmin": null, "Tavg": null, "Tmax": null}]));
}

#[tokio::test]
async fn empty_dataset_returns_empty_lists() {
    let dir = seed_dataset(STATIONS, &[]).await;
    let test_app = spawn_dataset_app(&dir).await;

    for uri in ["/api/v1.0/precipitation", "/api/v1.0/stations", "/api/v1.0/tobs"] {
        let (status, body) = test_app.get(uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body, "[]", "{}", uri);
    }
}

#[tokio::test]
async fn missing_dataset_fails_startup() {
    let dir = tempfile::tempdir().unwrap();

    assert!(open_dataset(&dataset_path(&dir)).await.is_err());
}
