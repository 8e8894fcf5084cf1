use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A resolved place. Lives for a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub degrees: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Point-in-time weather at a coordinate, metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: i32,
    pub pressure: i32,
    pub wind: Wind,
    pub conditions: Vec<Condition>,
}

pub type CurrentConditions = Observation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTemperature {
    pub day: f64,
    pub min: f64,
    pub max: f64,
    pub night: f64,
    pub eve: f64,
    pub morn: f64,
}

/// One entry of a daily forecast. Position in [`ForecastResult::days`] is the
/// day offset from today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    /// Provider timestamp (unix seconds) of the forecast day, when reported.
    pub date: Option<i64>,
    pub temperature: DailyTemperature,
    pub pressure: Option<i32>,
    pub humidity: Option<i32>,
    pub wind: Option<Wind>,
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub city_name: String,
    pub days: Vec<ForecastDay>,
}

/// Merged answer for a "full weather" query. Both halves come from the same
/// resolved coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherPackage {
    pub current: CurrentConditions,
    pub forecast: ForecastResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalSnapshot {
    pub requested_date: NaiveDate,
    #[serde(flatten)]
    pub observation: Observation,
}

/// Trailing window of daily snapshots, yesterday first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryWindow(Vec<HistoricalSnapshot>);

impl HistoryWindow {
    pub fn new(days: Vec<HistoricalSnapshot>) -> Self {
        Self(days)
    }

    pub fn days(&self) -> &[HistoricalSnapshot] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<HistoricalSnapshot> {
        self.0
    }
}
