//! Demo request persistence abstractions.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use teethtracks_core::{DemoRequest, NewDemoRequest};

pub use in_memory::InMemoryDemoRequestStore;
pub use postgres::PostgresDemoRequestStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store's email policy rejected the insert.
    #[error("duplicate email: {0}")]
    DuplicateEmail(String),

    /// The store could not be reached, or failed the operation for infrastructure reasons.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Append-only store of demo requests.
///
/// Records are never updated or deleted through this trait. Implementations own the
/// email uniqueness policy and must enforce it atomically with the insert.
#[async_trait]
pub trait DemoRequestStore: Send + Sync {
    /// Persist exactly one record and return it with its assigned id.
    async fn insert(&self, new: NewDemoRequest) -> Result<DemoRequest, StoreError>;

    /// All records, most recent `created_at` first (ties: higher id first).
    async fn list_recent_first(&self) -> Result<Vec<DemoRequest>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    /// Connectivity check.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> DemoRequestStore for Arc<S>
where
    S: DemoRequestStore + ?Sized,
{
    async fn insert(&self, new: NewDemoRequest) -> Result<DemoRequest, StoreError> {
        (**self).insert(new).await
    }

    async fn list_recent_first(&self) -> Result<Vec<DemoRequest>, StoreError> {
        (**self).list_recent_first().await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        (**self).count().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        (**self).ping().await
    }
}
