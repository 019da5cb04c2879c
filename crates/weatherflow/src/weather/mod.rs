pub mod client;
pub mod convert;
pub mod error;

use async_trait::async_trait;

use crate::jobs::CityResult;

pub use client::{parse_reading, OpenWeatherClient, DEFAULT_API_BASE};
pub use convert::kelvin_to_celsius;
pub use error::FetchError;

/// Anything that can produce a current reading for one configured city.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch(&self, city_id: &str) -> Result<CityResult, FetchError>;
}
