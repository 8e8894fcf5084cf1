use crate::{
    error::{UpstreamError, WeatherError},
    model::{Coordinate, CurrentConditions, ForecastResult, Observation},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Turns free text into a place.
///
/// Only the provider's first match is returned; its ranking is trusted as is.
/// Zero matches is [`WeatherError::NotFound`], not an upstream failure.
#[async_trait]
pub trait GeoResolver: Send + Sync + Debug {
    async fn resolve(&self, city: &str) -> Result<Coordinate, WeatherError>;
}

/// Weather lookups for an already resolved coordinate. One outbound call per
/// method, metric units, no retries.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn current(&self, coord: &Coordinate) -> Result<CurrentConditions, UpstreamError>;

    async fn forecast(&self, coord: &Coordinate, days: u8)
    -> Result<ForecastResult, UpstreamError>;

    /// Day-granularity snapshot for the day containing `at`.
    async fn historical_day(
        &self,
        coord: &Coordinate,
        at: DateTime<Utc>,
    ) -> Result<Observation, UpstreamError>;
}

/// Reject input that must never reach the provider.
pub fn validate_city(city: &str) -> Result<&str, WeatherError> {
    let trimmed = city.trim();
    if trimmed.is_empty() {
        return Err(WeatherError::Validation("city name must not be empty".into()));
    }
    Ok(trimmed)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_city_trims_and_rejects_blank() {
        assert_eq!(validate_city("  Prague ").unwrap(), "Prague");
        assert!(matches!(validate_city(""), Err(WeatherError::Validation(_))));
        assert!(matches!(validate_city(" \t"), Err(WeatherError::Validation(_))));
    }

    #[test]
    fn short_body_is_kept() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn long_body_is_cut() {
        let body = "x".repeat(500);
        let cut = truncate_body(&body);
        assert_eq!(cut.len(), 203);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn cut_respects_char_boundaries() {
        let body = "é".repeat(150);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert!(cut.len() <= 203);
    }
}
