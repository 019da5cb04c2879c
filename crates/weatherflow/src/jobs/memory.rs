use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::jobs::model::{AppendOutcome, CityResult, CreateOutcome, JobDocument};
use crate::jobs::store::JobStore;

/// In-process job store with the same atomicity as [`JobsRepo`](crate::jobs::JobsRepo):
/// each operation runs under one lock acquisition.
#[derive(Clone, Default)]
pub struct MemoryJobStore {
    docs: Arc<Mutex<HashMap<i64, JobDocument>>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `doc` as-is, replacing any existing document with the same uid.
    /// Lets callers seed documents the normal write path would never produce.
    pub async fn insert_document(&self, doc: JobDocument) {
        self.docs.lock().await.insert(doc.uid, doc);
    }

    pub async fn len(&self) -> usize {
        self.docs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.lock().await.is_empty()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn find(&self, uid: i64) -> anyhow::Result<Option<JobDocument>> {
        Ok(self.docs.lock().await.get(&uid).cloned())
    }

    async fn create(&self, uid: i64, expected_count: i32) -> anyhow::Result<CreateOutcome> {
        let mut docs = self.docs.lock().await;
        if docs.contains_key(&uid) {
            return Ok(CreateOutcome::Conflict);
        }
        docs.insert(uid, JobDocument::new(uid, expected_count));
        Ok(CreateOutcome::Created)
    }

    async fn append_result(
        &self,
        uid: i64,
        expected_count: i32,
        result: &CityResult,
    ) -> anyhow::Result<AppendOutcome> {
        let mut docs = self.docs.lock().await;
        match docs.get_mut(&uid) {
            Some(doc) => {
                doc.results.push(result.clone());
                Ok(AppendOutcome::Appended)
            }
            None => {
                let mut doc = JobDocument::new(uid, expected_count);
                doc.results.push(result.clone());
                docs.insert(uid, doc);
                Ok(AppendOutcome::Created)
            }
        }
    }
}
