use std::collections::HashSet;
use std::time::Duration;

use crate::weather::DEFAULT_API_BASE;

/// OpenWeatherMap ids: London, Paris, Berlin, New York, Tokyo, Sao Paulo, Sydney.
pub const DEFAULT_CITY_IDS: &[&str] = &[
    "2643743", "2988507", "2950159", "5128581", "1850147", "3448439", "2147714",
];

// Runtime configuration, loaded once from the environment (and `.env`).
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub api_key: String,
    pub api_base: String,
    pub city_ids: Vec<String>,
    pub listen_addr: String,
    pub migrate_on_startup: bool,
    pub fetch_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL is missing"))?;

        let api_key = env_or_fallback("WEATHERFLOW_API_KEY", "OPEN_WEATHER_API_KEY")
            .ok_or_else(|| anyhow::anyhow!("OPEN_WEATHER_API_KEY is missing"))?;

        let api_base = env_or_fallback("WEATHERFLOW_API_BASE", "WEATHER_API_BASE")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let city_ids = match env_or_fallback("WEATHERFLOW_CITY_IDS", "CITY_IDS") {
            Some(raw) => parse_city_ids(&raw)?,
            None => DEFAULT_CITY_IDS.iter().map(|s| s.to_string()).collect(),
        };

        let listen_addr = env_or_fallback("WEATHERFLOW_LISTEN_ADDR", "LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string());

        let migrate_on_startup = env_bool("WEATHERFLOW_MIGRATE_ON_STARTUP").unwrap_or(false);

        let fetch_timeout = std::env::var("WEATHERFLOW_FETCH_TIMEOUT_MS")
            .ok()
            .and_then(|s| parse_timeout_ms(&s));

        Ok(Self {
            database_url,
            api_key,
            api_base,
            city_ids,
            listen_addr,
            migrate_on_startup,
            fetch_timeout,
        })
    }
}

/// Comma-separated city ids. Blank entries are skipped; duplicates are an
/// error because each city would then be counted twice against one slot.
pub fn parse_city_ids(raw: &str) -> anyhow::Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for id in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !seen.insert(id) {
            anyhow::bail!("duplicate city id {id} in city list");
        }
        ids.push(id.to_string());
    }

    if ids.is_empty() {
        anyhow::bail!("city list is empty");
    }
    Ok(ids)
}

/// `0`, `off` and unparsable values mean "no timeout".
pub fn parse_timeout_ms(value: &str) -> Option<Duration> {
    let v = value.trim();
    if matches!(v.to_lowercase().as_str(), "" | "off" | "none") {
        return None;
    }
    v.parse::<u64>()
        .ok()
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}

fn env_or_fallback(primary: &str, fallback: &str) -> Option<String> {
    std::env::var(primary)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| std::env::var(fallback).ok().filter(|s| !s.trim().is_empty()))
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}
