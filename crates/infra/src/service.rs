//! Demo request ingestion and retrieval.
//!
//! ```text
//! Submission
//!   ↓
//! 1. Validate (pure, no store access)
//!   ↓
//! 2. Stamp created_at with the submission time
//!   ↓
//! 3. Insert once into the injected store (no retry)
//! ```
//!
//! The service holds no state of its own; every call round-trips to the store.

use chrono::Utc;
use thiserror::Error;

use teethtracks_core::{DemoRequest, Submission, ValidationError};

use crate::store::{DemoRequestStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// One or more required fields were missing, empty or not strings.
    #[error("validation failed: {0}")]
    Validation(ValidationError),

    /// The email is already on file and the store enforces uniqueness.
    #[error("duplicate email: {0}")]
    DuplicateEmail(String),

    /// The store failed; the diagnostic is passed through verbatim.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl SubmitError {
    /// Client-caused failures (bad input, duplicate email) as opposed to infrastructure ones.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SubmitError::Validation(_) | SubmitError::DuplicateEmail(_))
    }
}

impl From<ValidationError> for SubmitError {
    fn from(value: ValidationError) -> Self {
        SubmitError::Validation(value)
    }
}

impl From<StoreError> for SubmitError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateEmail(msg) => SubmitError::DuplicateEmail(msg),
            StoreError::Unavailable(msg) => SubmitError::StoreUnavailable(msg),
        }
    }
}

/// Result of probing the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreStatus {
    Connected,
    Unreachable(String),
}

impl StoreStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreStatus::Connected => "connected",
            StoreStatus::Unreachable(_) => "unreachable",
        }
    }
}

/// Stateless front door to the demo request store.
///
/// The store is injected at construction; tests pass an in-memory or failing store.
#[derive(Debug, Clone)]
pub struct DemoRequestService<S> {
    store: S,
}

impl<S> DemoRequestService<S>
where
    S: DemoRequestStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate and persist a submission.
    ///
    /// Nothing is written when validation fails.
    pub async fn submit(&self, submission: Submission) -> Result<DemoRequest, SubmitError> {
        let new = submission.validate(Utc::now()).inspect_err(|e| {
            tracing::info!(reason = %e, "demo request rejected");
        })?;

        tracing::debug!(email = %new.email, "saving demo request");

        match self.store.insert(new).await {
            Ok(stored) => {
                tracing::info!(id = %stored.id, "demo request saved");
                Ok(stored)
            }
            Err(StoreError::DuplicateEmail(msg)) => {
                tracing::info!(reason = %msg, "demo request rejected: duplicate email");
                Err(SubmitError::DuplicateEmail(msg))
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to save demo request");
                Err(e.into())
            }
        }
    }

    /// Every stored demo request, most recent first.
    pub async fn list(&self) -> Result<Vec<DemoRequest>, SubmitError> {
        match self.store.list_recent_first().await {
            Ok(records) => {
                tracing::debug!(count = records.len(), "fetched demo requests");
                Ok(records)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch demo requests");
                Err(e.into())
            }
        }
    }

    pub async fn store_status(&self) -> StoreStatus {
        match self.store.ping().await {
            Ok(()) => StoreStatus::Connected,
            Err(e) => StoreStatus::Unreachable(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use teethtracks_core::{EmailPolicy, Field, FieldProblem, NewDemoRequest};

    use super::*;
    use crate::store::InMemoryDemoRequestStore;

    fn acme() -> Submission {
        Submission::new("Acme Dental", "a@acme.com", "555-1234", "Interested")
    }

    /// Store that is always down and counts how often it was asked.
    #[derive(Default)]
    struct DownStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DemoRequestStore for DownStore {
        async fn insert(&self, _new: NewDemoRequest) -> Result<DemoRequest, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn list_recent_first(&self) -> Result<Vec<DemoRequest>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn count(&self) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn submit_then_list_includes_record_with_fresh_timestamp() {
        let service = DemoRequestService::new(InMemoryDemoRequestStore::new(EmailPolicy::Unique));
        let before = Utc::now();

        let stored = service.submit(acme()).await.unwrap();
        assert!(stored.created_at >= before);

        let listed = service.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        let first = &listed[0];
        assert_eq!(first.id, stored.id);
        assert_eq!(first.practice_name, "Acme Dental");
        assert_eq!(first.email, "a@acme.com");
        assert_eq!(first.phone_number, "555-1234");
        assert_eq!(first.message, "Interested");
    }

    #[tokio::test]
    async fn invalid_submission_writes_nothing() {
        let service = DemoRequestService::new(InMemoryDemoRequestStore::new(EmailPolicy::Unique));

        let err = service
            .submit(Submission::new("", "x@y.com", "1", "hi"))
            .await
            .unwrap_err();

        match &err {
            SubmitError::Validation(v) => {
                assert!(v.has_issue(Field::PracticeName, FieldProblem::Empty))
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(err.is_client_error());
        assert_eq!(service.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn invalid_submission_never_reaches_store() {
        let store = Arc::new(DownStore::default());
        let service = DemoRequestService::new(store.clone());

        let err = service.submit(Submission::default()).await.unwrap_err();
        assert!(matches!(err, SubmitError::Validation(_)));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn duplicate_email_fails_second_submit_under_unique_policy() {
        let service = DemoRequestService::new(InMemoryDemoRequestStore::new(EmailPolicy::Unique));

        service.submit(acme()).await.unwrap();
        let err = service.submit(acme()).await.unwrap_err();

        assert!(matches!(err, SubmitError::DuplicateEmail(_)));
        assert!(err.is_client_error());
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn store_failure_is_reported_once_without_retry() {
        let store = Arc::new(DownStore::default());
        let service = DemoRequestService::new(store.clone());

        let err = service.submit(acme()).await.unwrap_err();
        assert_eq!(
            err,
            SubmitError::StoreUnavailable("connection refused".to_string())
        );
        assert!(!err.is_client_error());
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);

        let err = service.list().await.unwrap_err();
        assert!(matches!(err, SubmitError::StoreUnavailable(_)));
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn store_status_reflects_ping() {
        let up = DemoRequestService::new(InMemoryDemoRequestStore::default());
        assert_eq!(up.store_status().await, StoreStatus::Connected);

        let down = DemoRequestService::new(DownStore::default());
        assert_eq!(down.store_status().await.as_str(), "unreachable");
    }
}
