//! Infrastructure layer: demo request storage, the ingestion service, configuration.

pub mod config;
pub mod service;
pub mod store;

pub use config::{AppConfig, ConfigError, StoreBackend};
pub use service::{DemoRequestService, StoreStatus, SubmitError};
pub use store::{DemoRequestStore, InMemoryDemoRequestStore, PostgresDemoRequestStore, StoreError};
