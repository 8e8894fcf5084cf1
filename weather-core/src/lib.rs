//! Core library for the `weather` service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the `GeoResolver` and `WeatherClient` traits
//! - History window aggregation and the city-level aggregation service
//! - Shared domain models and the error taxonomy
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod provider;
pub mod service;

#[cfg(test)]
mod testing;

pub use config::{Config, OpenWeatherSettings};
pub use error::{Endpoint, NO_SUCH_PLACE, UpstreamError, WeatherError};
pub use history::HistoryAggregator;
pub use model::{
    Condition, Coordinate, CurrentConditions, DailyTemperature, ForecastDay, ForecastResult,
    HistoricalSnapshot, HistoryWindow, Observation, WeatherPackage, Wind,
};
pub use provider::{GeoResolver, OpenWeatherClient, WeatherClient};
pub use service::WeatherAggregationService;
