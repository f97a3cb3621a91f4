/// Plain text overview of the API served at `/`.
pub const ROUTE_LISTING: &str = "\
Hawaii climate observation API
Available Routes:
/api/v1.0/precipitation
/api/v1.0/stations
/api/v1.0/tobs
/api/v1.0/<start>
/api/v1.0/<start>/<end>
";

pub async fn index_handler() -> &'static str {
    ROUTE_LISTING
}
