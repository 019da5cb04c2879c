use thiserror::Error;
use tracing::error;

use crate::jobs::{CityResult, JobStore};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("No record with id {uid} found in database.")]
    NotFound { uid: i64 },

    /// The document exists but breaks the schema; a write-path defect, not
    /// something the caller can fix.
    #[error("job {uid} is corrupted: {field} is {problem}")]
    Corrupted {
        uid: i64,
        field: &'static str,
        problem: &'static str,
    },

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Percentage of configured cities that have a recorded result.
pub async fn get_progress(store: &dyn JobStore, uid: i64) -> Result<f64, QueryError> {
    let doc = store
        .find(uid)
        .await?
        .ok_or(QueryError::NotFound { uid })?;

    doc.progress_percent().ok_or_else(|| {
        let problem = match doc.expected_count {
            None => "missing",
            Some(_) => "zero",
        };
        error!(uid, field = "expected_count", problem, "corrupted job document");
        QueryError::Corrupted {
            uid,
            field: "expected_count",
            problem,
        }
    })
}

/// Everything recorded so far, in arrival order. An empty list means the
/// document claims to exist without ever having received a result.
pub async fn get_results(store: &dyn JobStore, uid: i64) -> Result<Vec<CityResult>, QueryError> {
    let doc = store
        .find(uid)
        .await?
        .ok_or(QueryError::NotFound { uid })?;

    if doc.results.is_empty() {
        error!(uid, field = "results", problem = "empty", "corrupted job document");
        return Err(QueryError::Corrupted {
            uid,
            field: "results",
            problem: "empty",
        });
    }

    Ok(doc.results)
}
