//! `teethtracks-core` — demo request domain.
//!
//! This crate contains **pure domain** types and validation (no infrastructure concerns).

pub mod demo_request;
pub mod error;
pub mod id;

pub use demo_request::{DemoRequest, EmailPolicy, Field, NewDemoRequest, Submission};
pub use error::{FieldIssue, FieldProblem, ValidationError};
pub use id::DemoRequestId;
