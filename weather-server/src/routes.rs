use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use weather_core::{ForecastError, WeatherReply, WeatherService};

/// Raw query pairs, in request order. Repeated keys are kept.
type QueryPairs = Query<Vec<(String, String)>>;

pub fn router(service: WeatherService) -> Router {
    Router::new()
        .route("/weather", get(weather_by_cep))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn health() -> &'static str {
    "ok"
}

/// `GET /weather?cep=01001000`
///
/// Only the first `cep` value counts; a query string that cannot be decoded
/// is handled like a missing `cep`.
async fn weather_by_cep(
    State(service): State<WeatherService>,
    params: Option<QueryPairs>,
) -> Result<Json<WeatherReply>, ApiError> {
    let cep = params.as_ref().and_then(|Query(pairs)| first_value(pairs, "cep"));
    let reply = service.weather_by_cep(cep).await?;

    Ok(Json(reply))
}

fn first_value<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
}

/// Maps each pipeline failure to its status code and fixed plain-text body.
#[derive(Debug)]
pub struct ApiError(ForecastError);

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            ForecastError::InvalidFormat(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ForecastError::LookupFailed(_) | ForecastError::WeatherUnavailable(_) => {
                StatusCode::NOT_FOUND
            }
            ForecastError::WeatherParse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(status = status.as_u16(), cause = %self.0.cause_chain(), "weather request failed");

        (status, self.0.to_string()).into_response()
    }
}
