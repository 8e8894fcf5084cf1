use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use weather_core::{
    Config, HistoryWindow, OpenWeatherClient, WeatherAggregationService, WeatherPackage,
};

use crate::server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "City weather service")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Run the HTTP service.
    Serve {
        /// Listen address; overrides `server.bind` from the config.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Show current weather and forecast for a city.
    Current {
        /// City name, e.g. "Prague".
        city: String,
    },

    /// Show the trailing daily history for a city.
    History {
        /// City name, e.g. "Prague".
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config_path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };
        let mut config = Config::load_from(&config_path)?;

        match self.command {
            Command::Configure => return configure(config, &config_path),
            Command::Serve { bind } => {
                let service = build_service(&mut config)?;
                let bind = bind.unwrap_or_else(|| config.server.bind.clone());
                server::serve(&bind, service).await?;
            }
            Command::Current { city } => {
                let package = build_service(&mut config)?.current_weather(&city).await?;
                print_package(&city, &package);
            }
            Command::History { city } => {
                let window = build_service(&mut config)?.history(&city).await?;
                print_history(&city, &window);
            }
        }

        Ok(())
    }
}

fn configure(mut config: Config, path: &std::path::Path) -> anyhow::Result<()> {
    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    config.save_to(path)?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}

/// Apply the environment override and wire the client into a service.
fn build_service(config: &mut Config) -> anyhow::Result<WeatherAggregationService> {
    config.apply_env();
    let settings = config.openweather_settings()?;

    let mut http = reqwest::Client::builder();
    if let Some(secs) = config.server.request_timeout_secs {
        http = http.timeout(Duration::from_secs(secs));
    }
    let http = http.build().context("Failed to build HTTP client")?;

    let client = Arc::new(OpenWeatherClient::with_http(settings, http));

    Ok(WeatherAggregationService::new(client.clone(), client)
        .with_forecast_days(config.forecast_days)
        .with_history_days(config.history_days))
}

fn print_package(city: &str, package: &WeatherPackage) {
    let current = &package.current;
    let condition = current
        .conditions
        .first()
        .map(|c| c.description.as_str())
        .unwrap_or("unknown");

    println!(
        "{city}: {:.1}°C (feels like {:.1}°C), {condition}",
        current.temperature, current.feels_like
    );
    println!(
        "Humidity {}%, pressure {} hPa, wind {:.1} m/s from {}°",
        current.humidity, current.pressure, current.wind.speed, current.wind.degrees
    );

    for (i, day) in package.forecast.days.iter().enumerate() {
        let t = &day.temperature;
        println!(
            "Forecast +{}d: day {:.1}°C, min {:.1}°C, max {:.1}°C",
            i + 1,
            t.day,
            t.min,
            t.max
        );
    }
}

fn print_history(city: &str, window: &HistoryWindow) {
    println!("{city}, last {} days:", window.len());
    for snapshot in window.days() {
        let condition = snapshot
            .observation
            .conditions
            .first()
            .map(|c| c.description.as_str())
            .unwrap_or("unknown");
        println!(
            "  {}  {:>5.1}°C  {condition}",
            snapshot.requested_date, snapshot.observation.temperature
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_current_with_global_config() {
        let cli = Cli::try_parse_from(["weather", "current", "Prague", "--config", "/tmp/w.toml"])
            .expect("valid args");

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/w.toml")));
        assert!(matches!(cli.command, Command::Current { ref city } if city == "Prague"));
    }

    #[test]
    fn parses_serve_bind_override() {
        let cli = Cli::try_parse_from(["weather", "serve", "--bind", "0.0.0.0:9000"])
            .expect("valid args");

        assert!(matches!(cli.command, Command::Serve { bind: Some(ref b) } if b == "0.0.0.0:9000"));
    }

    #[test]
    fn history_requires_city() {
        assert!(Cli::try_parse_from(["weather", "history"]).is_err());
    }

    #[test]
    fn build_service_needs_api_key() {
        let mut config = Config::default();
        if std::env::var(weather_core::config::API_KEY_ENV).is_ok() {
            return;
        }
        let err = build_service(&mut config).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
    }

    #[test]
    fn build_service_with_key_and_timeout() {
        let mut config = Config::default();
        config.set_api_key("KEY".into());
        config.server.request_timeout_secs = Some(5);

        assert!(build_service(&mut config).is_ok());
    }

    #[test]
    fn build_service_rejects_oversized_history() {
        let mut config = Config::default();
        config.set_api_key("KEY".into());
        config.history_days = 4_000_000_000;

        let err = build_service(&mut config).unwrap_err();
        assert!(err.to_string().contains("history_days must be between 1 and"));
    }
}
