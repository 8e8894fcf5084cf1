//! City-level weather: resolve once, then fan out to the weather endpoints.

use std::sync::Arc;

use tracing::instrument;

use crate::{
    config::{DEFAULT_FORECAST_DAYS, DEFAULT_HISTORY_DAYS},
    error::WeatherError,
    history::HistoryAggregator,
    model::{Coordinate, CurrentConditions, HistoryWindow, WeatherPackage},
    provider::{GeoResolver, WeatherClient, validate_city},
};

/// Orchestrates geocoding, current conditions, forecast and history lookups.
///
/// Every stage short-circuits on its first failure. Nothing is retried or
/// replaced with defaults.
#[derive(Debug, Clone)]
pub struct WeatherAggregationService {
    geo: Arc<dyn GeoResolver>,
    weather: Arc<dyn WeatherClient>,
    history: HistoryAggregator,
    forecast_days: u8,
    history_days: u32,
}

impl WeatherAggregationService {
    pub fn new(geo: Arc<dyn GeoResolver>, weather: Arc<dyn WeatherClient>) -> Self {
        let history = HistoryAggregator::new(weather.clone());
        Self {
            geo,
            weather,
            history,
            forecast_days: DEFAULT_FORECAST_DAYS,
            history_days: DEFAULT_HISTORY_DAYS,
        }
    }

    pub fn with_forecast_days(mut self, days: u8) -> Self {
        self.forecast_days = days;
        self
    }

    pub fn with_history_days(mut self, days: u32) -> Self {
        self.history_days = days;
        self
    }

    async fn locate(&self, city: &str) -> Result<Coordinate, WeatherError> {
        let city = validate_city(city)?;
        self.geo.resolve(city).await
    }

    /// Current conditions only.
    #[instrument(skip(self), level = "info")]
    pub async fn current_conditions(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
        let coord = self.locate(city).await?;
        Ok(self.weather.current(&coord).await?)
    }

    /// Current conditions merged with the forecast, both for one resolved
    /// coordinate. The two lookups run concurrently; the merge waits for both.
    #[instrument(skip(self), level = "info")]
    pub async fn current_weather(&self, city: &str) -> Result<WeatherPackage, WeatherError> {
        let coord = self.locate(city).await?;

        let (forecast, current) = tokio::try_join!(
            self.weather.forecast(&coord, self.forecast_days),
            self.weather.current(&coord),
        )?;

        Ok(WeatherPackage { current, forecast })
    }

    /// Daily snapshots for the configured number of days before today.
    #[instrument(skip(self), level = "info")]
    pub async fn history(&self, city: &str) -> Result<HistoryWindow, WeatherError> {
        let coord = self.locate(city).await?;
        Ok(self.history.last_n_days(&coord, self.history_days).await?)
    }
}
