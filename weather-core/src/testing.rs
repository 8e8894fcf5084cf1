//! In-memory fakes for the provider traits.

use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::{Endpoint, UpstreamError, WeatherError},
    model::{
        Condition, Coordinate, CurrentConditions, DailyTemperature, ForecastDay, ForecastResult,
        Observation, Wind,
    },
    provider::{GeoResolver, WeatherClient},
};

pub fn coordinate(name: &str, latitude: f64, longitude: f64) -> Coordinate {
    Coordinate { name: name.into(), latitude, longitude, country: None, state: None }
}

pub fn observation(temperature: f64) -> Observation {
    Observation {
        temperature,
        feels_like: temperature,
        humidity: 50,
        pressure: 1013,
        wind: Wind { speed: 1.0, degrees: 90 },
        conditions: vec![Condition {
            id: 800,
            main: "Clear".into(),
            description: "clear sky".into(),
            icon: "01d".into(),
        }],
    }
}

pub fn status_error(endpoint: Endpoint) -> UpstreamError {
    UpstreamError::Status { endpoint, status: 500, body: "Internal Server Error".into() }
}

#[derive(Debug)]
pub struct FakeGeo {
    answer: Option<Coordinate>,
    fail: bool,
    calls: AtomicUsize,
}

impl FakeGeo {
    pub fn found(coord: Coordinate) -> Self {
        Self { answer: Some(coord), fail: false, calls: AtomicUsize::new(0) }
    }

    pub fn not_found() -> Self {
        Self { answer: None, fail: false, calls: AtomicUsize::new(0) }
    }

    pub fn failing() -> Self {
        Self { answer: None, fail: true, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoResolver for FakeGeo {
    async fn resolve(&self, _city: &str) -> Result<Coordinate, WeatherError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(status_error(Endpoint::Geocode).into());
        }
        self.answer.clone().ok_or(WeatherError::NotFound)
    }
}

/// Scripted weather client. Records every coordinate and instant it sees.
#[derive(Debug, Default)]
pub struct FakeWeather {
    pub fail_current: bool,
    pub fail_forecast: bool,
    /// 1-based index of the historical call that fails.
    pub fail_history_call: Option<usize>,
    pub current_calls: AtomicUsize,
    pub forecast_calls: AtomicUsize,
    pub history_calls: AtomicUsize,
    pub seen_coordinates: Mutex<Vec<Coordinate>>,
    pub seen_instants: Mutex<Vec<DateTime<Utc>>>,
}

impl FakeWeather {
    pub fn total_calls(&self) -> usize {
        self.current_calls.load(Ordering::SeqCst)
            + self.forecast_calls.load(Ordering::SeqCst)
            + self.history_calls.load(Ordering::SeqCst)
    }

    fn record(&self, coord: &Coordinate) {
        if let Ok(mut seen) = self.seen_coordinates.lock() {
            seen.push(coord.clone());
        }
    }
}

#[async_trait]
impl WeatherClient for FakeWeather {
    async fn current(&self, coord: &Coordinate) -> Result<CurrentConditions, UpstreamError> {
        self.current_calls.fetch_add(1, Ordering::SeqCst);
        self.record(coord);
        if self.fail_current {
            return Err(status_error(Endpoint::Current));
        }
        Ok(observation(14.7))
    }

    async fn forecast(
        &self,
        coord: &Coordinate,
        days: u8,
    ) -> Result<ForecastResult, UpstreamError> {
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);
        self.record(coord);
        if self.fail_forecast {
            return Err(status_error(Endpoint::Forecast));
        }
        let day = ForecastDay {
            date: None,
            temperature: DailyTemperature {
                day: 16.0,
                min: 9.0,
                max: 17.0,
                night: 10.0,
                eve: 15.0,
                morn: 9.5,
            },
            pressure: None,
            humidity: None,
            wind: None,
            conditions: Vec::new(),
        };
        Ok(ForecastResult {
            city_name: coord.name.clone(),
            days: vec![day; usize::from(days)],
        })
    }

    async fn historical_day(
        &self,
        coord: &Coordinate,
        at: DateTime<Utc>,
    ) -> Result<Observation, UpstreamError> {
        let call = self.history_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.record(coord);
        if let Ok(mut seen) = self.seen_instants.lock() {
            seen.push(at);
        }
        if self.fail_history_call == Some(call) {
            return Err(status_error(Endpoint::History));
        }
        // Temperature encodes the call number so ordering is visible.
        Ok(observation(call as f64))
    }
}
