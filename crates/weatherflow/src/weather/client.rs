use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::jobs::CityResult;
use crate::weather::convert::kelvin_to_celsius;
use crate::weather::error::FetchError;
use crate::weather::WeatherSource;

pub const DEFAULT_API_BASE: &str = "https://api.openweathermap.org/data/2.5/weather";

// Only the fields we consume; serde skips the rest of the payload.
#[derive(Deserialize)]
struct CurrentWeather {
    id: i64,
    main: MainBlock,
}

#[derive(Deserialize)]
struct MainBlock {
    temp: f64,
    humidity: f64,
}

/// Parse an OpenWeatherMap "current weather" body into a stored result,
/// converting the kelvin temperature.
pub fn parse_reading(body: &[u8]) -> Result<CityResult, serde_json::Error> {
    let current: CurrentWeather = serde_json::from_slice(body)?;
    Ok(CityResult {
        city_id: current.id,
        temperature_celsius: kelvin_to_celsius(current.main.temp),
        humidity_percent: current.main.humidity,
    })
}

/// Issues `GET <base>?id=<city>&appid=<key>`.
///
/// The underlying `reqwest::Client` is built without a timeout, so a request
/// that never gets a response never completes. Bound it from the caller if
/// latency matters (see `Collector::with_fetch_timeout`).
#[derive(Clone)]
pub struct OpenWeatherClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn request(&self, city_id: &str) -> Result<CityResult, FetchError> {
        let transport = |e: reqwest::Error| FetchError::TransportOrStatus {
            city: city_id.to_string(),
            message: e.to_string(),
        };

        let resp = self
            .http
            .get(&self.base_url)
            .query(&[("id", city_id), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;

        let body = resp.bytes().await.map_err(transport)?;

        parse_reading(&body).map_err(|e| FetchError::UnexpectedSchema {
            city: city_id.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch(&self, city_id: &str) -> Result<CityResult, FetchError> {
        let res = self.request(city_id).await;
        if let Err(err) = &res {
            warn!(city = err.city(), kind = err.kind(), error = %err, "weather fetch failed");
        }
        res
    }
}
