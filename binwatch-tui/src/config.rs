use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use binwatch_core::model::Coordinate;
use binwatch_provider_http::DEFAULT_BASE_URL;
use binwatch_provider_seed::default_observer;

const DEFAULT_RADIUS_METERS: f64 = 1000.0;
const DEFAULT_LOG_FILE: &str = "binwatch.log";

/// Runtime settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub api_url: String,
    pub observer: Coordinate,
    pub radius_meters: f64,
    pub log_file: String,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fallback = default_observer();

        let api_url = lookup("BINWATCH_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let lat = parse_var(&lookup, "BINWATCH_OBSERVER_LAT")?.unwrap_or(fallback.lat);
        let lng = parse_var(&lookup, "BINWATCH_OBSERVER_LNG")?.unwrap_or(fallback.lng);
        let observer = Coordinate::new(lat, lng)
            .context("BINWATCH_OBSERVER_LAT/BINWATCH_OBSERVER_LNG are not a valid location")?;

        let radius_meters =
            parse_var(&lookup, "BINWATCH_RADIUS_M")?.unwrap_or(DEFAULT_RADIUS_METERS);
        if radius_meters.is_nan() || radius_meters <= 0.0 {
            return Err(anyhow!("BINWATCH_RADIUS_M must be positive, got {radius_meters}"));
        }

        let log_file = lookup("BINWATCH_LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_owned());

        Ok(Self {
            api_url,
            observer,
            radius_meters,
            log_file,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{key} has an invalid value: {raw:?}"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]).expect("defaults are valid");
        assert_eq!(config.api_url, DEFAULT_BASE_URL);
        assert_eq!(config.observer, default_observer());
        assert!((config.radius_meters - DEFAULT_RADIUS_METERS).abs() < f64::EPSILON);
        assert_eq!(config.log_file, DEFAULT_LOG_FILE);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("BINWATCH_API_URL", "https://bins.example.org"),
            ("BINWATCH_OBSERVER_LAT", "21.1"),
            ("BINWATCH_OBSERVER_LNG", " 79.0 "),
            ("BINWATCH_RADIUS_M", "250"),
        ])
        .expect("valid overrides");
        assert_eq!(config.api_url, "https://bins.example.org");
        assert_eq!(config.observer, Coordinate { lat: 21.1, lng: 79.0 });
        assert!((config.radius_meters - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(config_from(&[("BINWATCH_RADIUS_M", "far")]).is_err());
        assert!(config_from(&[("BINWATCH_RADIUS_M", "-1")]).is_err());
        assert!(config_from(&[("BINWATCH_OBSERVER_LAT", "999")]).is_err());
    }
}
