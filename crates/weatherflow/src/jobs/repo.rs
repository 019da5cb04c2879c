// crates/weatherflow/src/jobs/repo.rs

use crate::jobs::model::{AppendOutcome, CityResult, CreateOutcome, JobDocument, JobRow};
use crate::jobs::store::JobStore;
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

/// Postgres-backed job documents. One row per job, results kept as a JSONB array.
#[derive(Clone)]
pub struct JobsRepo {
    pool: PgPool,
}

impl JobsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_job(&self, uid: i64) -> anyhow::Result<Option<JobDocument>> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT uid, created_at, expected_count, results
            FROM weather_jobs
            WHERE uid = $1
            "#,
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(JobDocument::from))
    }

    /// Most recent jobs first.
    pub async fn list_recent(&self, limit: i64) -> anyhow::Result<Vec<JobDocument>> {
        let limit = limit.clamp(1, 500);

        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT uid, created_at, expected_count, results
            FROM weather_jobs
            ORDER BY created_at DESC, uid DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(JobDocument::from).collect())
    }

    pub async fn insert_job(&self, uid: i64, expected_count: i32) -> anyhow::Result<CreateOutcome> {
        // ON CONFLICT keeps concurrent creates for the same uid from both winning.
        let res = sqlx::query(
            r#"
            INSERT INTO weather_jobs (uid, expected_count)
            VALUES ($1, $2)
            ON CONFLICT (uid) DO NOTHING
            "#,
        )
        .bind(uid)
        .bind(expected_count)
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 1 {
            Ok(CreateOutcome::Created)
        } else {
            Ok(CreateOutcome::Conflict)
        }
    }

    pub async fn push_result(
        &self,
        uid: i64,
        expected_count: i32,
        result: &CityResult,
    ) -> anyhow::Result<AppendOutcome> {
        // Single statement: the row lock taken by ON CONFLICT DO UPDATE serialises
        // concurrent pushes, so no entry is lost. xmax = 0 only on a fresh insert.
        let inserted: bool = sqlx::query_scalar(
            r#"
            INSERT INTO weather_jobs (uid, expected_count, results)
            VALUES ($1, $2, jsonb_build_array($3::jsonb))
            ON CONFLICT (uid) DO UPDATE
            SET results = weather_jobs.results || EXCLUDED.results
            RETURNING (xmax = 0)
            "#,
        )
        .bind(uid)
        .bind(expected_count)
        .bind(Json(result))
        .fetch_one(&self.pool)
        .await?;

        if inserted {
            Ok(AppendOutcome::Created)
        } else {
            Ok(AppendOutcome::Appended)
        }
    }

    pub async fn truncate(&self) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM weather_jobs")
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }
}

#[async_trait]
impl JobStore for JobsRepo {
    async fn find(&self, uid: i64) -> anyhow::Result<Option<JobDocument>> {
        self.get_job(uid).await
    }

    async fn create(&self, uid: i64, expected_count: i32) -> anyhow::Result<CreateOutcome> {
        self.insert_job(uid, expected_count).await
    }

    async fn append_result(
        &self,
        uid: i64,
        expected_count: i32,
        result: &CityResult,
    ) -> anyhow::Result<AppendOutcome> {
        self.push_result(uid, expected_count, result).await
    }
}
