use async_trait::async_trait;

use crate::jobs::model::{AppendOutcome, CityResult, CreateOutcome, JobDocument};

/// Persistence contract for job documents.
///
/// Every method is a single atomic operation on the backing store. In
/// particular `append_result` must push server-side; callers never read a
/// document, modify it and write it back.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn find(&self, uid: i64) -> anyhow::Result<Option<JobDocument>>;

    /// Insert an empty document for `uid`. Existing documents are left untouched
    /// and reported as `Conflict`.
    async fn create(&self, uid: i64, expected_count: i32) -> anyhow::Result<CreateOutcome>;

    /// Upsert-or-append. If no document exists it is created holding just
    /// `result`, with `expected_count` as captured at fan-out time.
    async fn append_result(
        &self,
        uid: i64,
        expected_count: i32,
        result: &CityResult,
    ) -> anyhow::Result<AppendOutcome>;
}
