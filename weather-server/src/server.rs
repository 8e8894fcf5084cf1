//! HTTP surface: `/weather/current/{city}` and `/weather/history/{city}`.

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use weather_core::{
    HistoricalSnapshot, NO_SUCH_PLACE, WeatherAggregationService, WeatherError, WeatherPackage,
};

pub fn router(service: WeatherAggregationService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/weather/current/:city", get(current_weather))
        .route("/weather/history/:city", get(history))
        .with_state(service)
}

pub async fn serve(bind: &str, service: WeatherAggregationService) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;

    tracing::info!(bind, "Weather service listening");
    axum::serve(listener, router(service)).await.context("HTTP server failed")
}

/// Every lookup failure is a 400; the body tells the caller which kind.
#[derive(Debug)]
pub struct ApiError(WeatherError);

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.0 {
            WeatherError::NotFound => NO_SUCH_PLACE.to_string(),
            WeatherError::Validation(msg) => msg,
            WeatherError::Upstream(e) => {
                let endpoint = e.endpoint();
                // `{:#}` keeps the transport or parse cause behind the summary.
                let detail = format!("{:#}", anyhow::Error::new(e));
                tracing::warn!(%endpoint, error = %detail, "Upstream lookup failed");
                detail
            }
        };
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn current_weather(
    State(service): State<WeatherAggregationService>,
    Path(city): Path<String>,
) -> Result<Json<WeatherPackage>, ApiError> {
    Ok(Json(service.current_weather(&city).await?))
}

async fn history(
    State(service): State<WeatherAggregationService>,
    Path(city): Path<String>,
) -> Result<Json<Vec<HistoricalSnapshot>>, ApiError> {
    Ok(Json(service.history(&city).await?.into_inner()))
}
