use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    config::OpenWeatherSettings,
    error::{Endpoint, UpstreamError, WeatherError},
    model::{
        Condition, Coordinate, CurrentConditions, DailyTemperature, ForecastDay, ForecastResult,
        Observation, Wind,
    },
};

use super::{GeoResolver, WeatherClient, truncate_body, validate_city};

/// OpenWeather geocoding and weather endpoints behind one HTTP client.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    settings: OpenWeatherSettings,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(settings: OpenWeatherSettings) -> Self {
        Self::with_http(settings, Client::new())
    }

    /// Use a caller-built client, e.g. one carrying a transport timeout.
    pub fn with_http(settings: OpenWeatherSettings, http: Client) -> Self {
        Self { settings, http }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        tracing::debug!(%endpoint, url, ?query, "Sending OpenWeather request");

        let res = self
            .http
            .get(url)
            .query(query)
            .query(&[("appid", self.settings.api_key.as_str())])
            .send()
            .await
            // The URL carries the API key; keep it out of error text.
            .map_err(|e| UpstreamError::Transport { endpoint, source: e.without_url() })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| UpstreamError::Transport { endpoint, source: e.without_url() })?;

        if !status.is_success() {
            tracing::warn!(%endpoint, %status, "OpenWeather request failed");
            return Err(UpstreamError::Status {
                endpoint,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| {
            tracing::warn!(%endpoint, error = %source, "Failed to parse OpenWeather response");
            UpstreamError::Decode { endpoint, source }
        })
    }

    fn coordinate_query(coord: &Coordinate) -> Vec<(&'static str, String)> {
        vec![("lat", coord.latitude.to_string()), ("lon", coord.longitude.to_string())]
    }
}

#[async_trait]
impl GeoResolver for OpenWeatherClient {
    async fn resolve(&self, city: &str) -> Result<Coordinate, WeatherError> {
        let city = validate_city(city)?;

        let matches: Vec<OwLocation> = self
            .get_json(
                Endpoint::Geocode,
                &self.settings.geocode_base_url,
                &[("q", city.to_string()), ("limit", "1".to_string())],
            )
            .await?;

        let Some(first) = matches.into_iter().next() else {
            tracing::info!(city, "Geocoding returned no matches");
            return Err(WeatherError::NotFound);
        };

        tracing::info!(
            city,
            name = %first.name,
            lat = first.lat,
            lon = first.lon,
            "Resolved location"
        );
        Ok(first.into())
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn current(&self, coord: &Coordinate) -> Result<CurrentConditions, UpstreamError> {
        let mut query = Self::coordinate_query(coord);
        query.push(("units", "metric".to_string()));

        let parsed: OwCurrentResponse = self
            .get_json(Endpoint::Current, &self.settings.weather_base_url, &query)
            .await?;

        Ok(parsed.into())
    }

    async fn forecast(
        &self,
        coord: &Coordinate,
        days: u8,
    ) -> Result<ForecastResult, UpstreamError> {
        let mut query = Self::coordinate_query(coord);
        query.push(("cnt", days.to_string()));
        query.push(("units", "metric".to_string()));

        let parsed: OwForecastResponse = self
            .get_json(Endpoint::Forecast, &self.settings.forecast_base_url, &query)
            .await?;

        let expected = usize::from(days);
        if parsed.list.len() < expected {
            return Err(UpstreamError::Incomplete {
                endpoint: Endpoint::Forecast,
                expected,
                got: parsed.list.len(),
            });
        }

        Ok(ForecastResult {
            city_name: parsed.city.name,
            days: parsed.list.into_iter().take(expected).map(ForecastDay::from).collect(),
        })
    }

    async fn historical_day(
        &self,
        coord: &Coordinate,
        at: DateTime<Utc>,
    ) -> Result<Observation, UpstreamError> {
        let mut query = Self::coordinate_query(coord);
        query.extend([
            ("type", "day".to_string()),
            ("start", at.timestamp().to_string()),
            ("cnt", "1".to_string()),
            ("units", "metric".to_string()),
        ]);

        let parsed: OwHistoryResponse = self
            .get_json(Endpoint::History, &self.settings.history_base_url, &query)
            .await?;

        parsed
            .list
            .into_iter()
            .next()
            .map(Observation::from)
            .ok_or(UpstreamError::Empty { endpoint: Endpoint::History })
    }
}

// Wire schemas. Unknown fields are ignored, missing required fields fail decoding.

#[derive(Debug, Deserialize)]
struct OwLocation {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    pressure: i32,
    humidity: i32,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: i32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: i64,
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    wind: OwWind,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwDailyTemp {
    day: f64,
    min: f64,
    max: f64,
    night: f64,
    eve: f64,
    morn: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: Option<i64>,
    temp: OwDailyTemp,
    pressure: Option<i32>,
    humidity: Option<i32>,
    speed: Option<f64>,
    deg: Option<i32>,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwHistoryEntry {
    main: OwMain,
    wind: OwWind,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwHistoryResponse {
    list: Vec<OwHistoryEntry>,
}

impl From<OwLocation> for Coordinate {
    fn from(loc: OwLocation) -> Self {
        Self {
            name: loc.name,
            latitude: loc.lat,
            longitude: loc.lon,
            country: loc.country,
            state: loc.state,
        }
    }
}

impl From<OwWeather> for Condition {
    fn from(w: OwWeather) -> Self {
        Self { id: w.id, main: w.main, description: w.description, icon: w.icon }
    }
}

fn observation(main: OwMain, wind: OwWind, weather: Vec<OwWeather>) -> Observation {
    Observation {
        temperature: main.temp,
        feels_like: main.feels_like,
        humidity: main.humidity,
        pressure: main.pressure,
        wind: Wind { speed: wind.speed, degrees: wind.deg },
        conditions: weather.into_iter().map(Condition::from).collect(),
    }
}

impl From<OwCurrentResponse> for Observation {
    fn from(r: OwCurrentResponse) -> Self {
        observation(r.main, r.wind, r.weather)
    }
}

impl From<OwHistoryEntry> for Observation {
    fn from(e: OwHistoryEntry) -> Self {
        observation(e.main, e.wind, e.weather)
    }
}

impl From<OwForecastEntry> for ForecastDay {
    fn from(e: OwForecastEntry) -> Self {
        let wind = match (e.speed, e.deg) {
            (Some(speed), Some(degrees)) => Some(Wind { speed, degrees }),
            _ => None,
        };

        Self {
            date: e.dt,
            temperature: DailyTemperature {
                day: e.temp.day,
                min: e.temp.min,
                max: e.temp.max,
                night: e.temp.night,
                eve: e.temp.eve,
                morn: e.temp.morn,
            },
            pressure: e.pressure,
            humidity: e.humidity,
            wind,
            conditions: e.weather.into_iter().map(Condition::from).collect(),
        }
    }
}
