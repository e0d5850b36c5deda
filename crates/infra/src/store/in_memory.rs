use std::cmp::Reverse;
use std::sync::RwLock;

use async_trait::async_trait;

use teethtracks_core::{DemoRequest, DemoRequestId, EmailPolicy, NewDemoRequest};

use super::{DemoRequestStore, StoreError};

/// In-memory demo request store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryDemoRequestStore {
    records: RwLock<Vec<DemoRequest>>,
    email_policy: EmailPolicy,
}

impl InMemoryDemoRequestStore {
    pub fn new(email_policy: EmailPolicy) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            email_policy,
        }
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl DemoRequestStore for InMemoryDemoRequestStore {
    async fn insert(&self, new: NewDemoRequest) -> Result<DemoRequest, StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;

        // Check and push under the same write lock so concurrent duplicates can't both land.
        if self.email_policy.is_unique() && records.iter().any(|r| r.email == new.email) {
            return Err(StoreError::DuplicateEmail(format!(
                "a demo request for {} already exists",
                new.email
            )));
        }

        let stored = new.into_stored(DemoRequestId::new());
        records.push(stored.clone());
        Ok(stored)
    }

    async fn list_recent_first(&self) -> Result<Vec<DemoRequest>, StoreError> {
        let mut out = self.records.read().map_err(|_| poisoned())?.clone();
        out.sort_by_key(|r| Reverse((r.created_at, r.id)));
        Ok(out)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.len() as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.records.read().map(|_| ()).map_err(|_| poisoned())
    }
}
