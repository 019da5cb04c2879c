use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

/// One city's reading as stored inside a job document.
///
/// `city_id` is whatever the weather source reported, which is not
/// necessarily the configured id string that was requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityResult {
    pub city_id: i64,
    #[serde(rename = "temperature")]
    pub temperature_celsius: f64,
    #[serde(rename = "humidity")]
    pub humidity_percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobDocument {
    pub uid: i64,
    pub created_at: DateTime<Utc>,
    /// `None` only when the stored row is damaged.
    pub expected_count: Option<i32>,
    /// Arrival order of completing tasks, not city-list order.
    pub results: Vec<CityResult>,
}

impl JobDocument {
    pub fn new(uid: i64, expected_count: i32) -> Self {
        Self {
            uid,
            created_at: Utc::now(),
            expected_count: Some(expected_count),
            results: Vec::new(),
        }
    }

    /// `100 * results / expected_count`, unclamped.
    ///
    /// Returns `None` when `expected_count` is missing or zero; either way the
    /// document cannot say how far along it is.
    pub fn progress_percent(&self) -> Option<f64> {
        match self.expected_count {
            Some(n) if n > 0 => Some(100.0 * self.results.len() as f64 / n as f64),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JobRow {
    pub uid: i64,
    pub created_at: DateTime<Utc>,
    pub expected_count: Option<i32>,
    pub results: Json<Vec<CityResult>>,
}

impl From<JobRow> for JobDocument {
    fn from(row: JobRow) -> Self {
        Self {
            uid: row.uid,
            created_at: row.created_at,
            expected_count: row.expected_count,
            results: row.results.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    Conflict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// No document existed; the append created it.
    Created,
    Appended,
}

impl AppendOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppendOutcome::Created => "created",
            AppendOutcome::Appended => "appended",
        }
    }
}
