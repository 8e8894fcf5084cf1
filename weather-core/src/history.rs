//! Trailing window of daily historical snapshots.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::{
    error::UpstreamError,
    model::{Coordinate, HistoricalSnapshot, HistoryWindow},
    provider::WeatherClient,
};

/// Local hour used for every day of the window, so the provider's daily
/// snapshot does not depend on when the request arrives.
pub const SNAPSHOT_HOUR: i64 = 15;

#[derive(Debug, Clone)]
pub struct HistoryAggregator {
    client: Arc<dyn WeatherClient>,
}

impl HistoryAggregator {
    pub fn new(client: Arc<dyn WeatherClient>) -> Self {
        Self { client }
    }

    /// The `n` days before today, yesterday first.
    pub async fn last_n_days(
        &self,
        coord: &Coordinate,
        n: u32,
    ) -> Result<HistoryWindow, UpstreamError> {
        let today = Local::now().date_naive();
        self.last_n_days_from(coord, n, today, &Local).await
    }

    /// Same as [`Self::last_n_days`] with an explicit calendar day and zone.
    ///
    /// Calls are sequential and fail fast: when day `k` fails, days after it
    /// are never requested and no partial window is returned.
    pub async fn last_n_days_from<Tz: TimeZone>(
        &self,
        coord: &Coordinate,
        n: u32,
        today: NaiveDate,
        tz: &Tz,
    ) -> Result<HistoryWindow, UpstreamError> {
        let mut days = Vec::new();

        for offset in 1..=n {
            let requested_date = today - Duration::days(i64::from(offset));
            let at = snapshot_instant(tz, requested_date);

            let observation = self.client.historical_day(coord, at).await.inspect_err(|e| {
                tracing::warn!(offset, %requested_date, error = %e, "History lookup aborted");
            })?;

            days.push(HistoricalSnapshot { requested_date, observation });
        }

        Ok(HistoryWindow::new(days))
    }
}

/// `date` at [`SNAPSHOT_HOUR`] in `tz`, as a UTC instant.
pub fn snapshot_instant<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN) + Duration::hours(SNAPSHOT_HOUR);

    // Earliest of an ambiguous local time; a skipped one is read as UTC.
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}
