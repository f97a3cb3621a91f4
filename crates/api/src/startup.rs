use crate::{
    index_handler, precipitation, routes, stations, temperature_stats_between,
    temperature_stats_from, tobs, ClimateAccess, ClimateData, Database,
};
use anyhow::{anyhow, Context};
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use climate_core::is_file;
use hyper::{header::ACCEPT, Method};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub climate_db: Arc<dyn ClimateData>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::climate_routes::precipitation,
        routes::climate::climate_routes::stations,
        routes::climate::climate_routes::tobs,
        routes::climate::climate_routes::temperature_stats_from,
        routes::climate::climate_routes::temperature_stats_between,
    ),
    components(
        schemas(
            crate::Precipitation,
            crate::StationActivity,
            crate::TemperatureObservation,
            crate::TemperatureStats,
        )
    ),
    tags(
        (name = "hawaii climate api", description = "a read-only RESTful api over daily precipitation and temperature observations from Hawaii weather stations")
    )
)]
struct ApiDoc;

/// Open and check the dataset. The returned [`Database`] is kept by the caller so the
/// pool can be closed on shutdown.
pub async fn open_dataset(database_path: &str) -> Result<Database, anyhow::Error> {
    if !is_file(database_path) {
        return Err(anyhow!("dataset not found at {}", database_path));
    }

    let db = Database::open(database_path)
        .await
        .with_context(|| format!("error opening SQLite dataset {}", database_path))?;
    db.health_check()
        .await
        .context("dataset connectivity check failed")?;
    db.verify_schema()
        .await
        .context("dataset schema check failed")?;

    Ok(db)
}

pub fn build_app_state(db: Database) -> AppState {
    AppState {
        climate_db: Arc::new(ClimateAccess::new(db)),
    }
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(temperature_stats_from))
        .route("/api/v1.0/{start}/{end}", get(temperature_stats_between))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request", "new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, path: {}, time: {}", response.status().as_str(), path, response_time);

    response
}
