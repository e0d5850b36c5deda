//! Domain error model.

use serde::Serialize;
use thiserror::Error;

use crate::demo_request::Field;

/// Why a single submitted field was rejected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldProblem {
    /// Absent from the payload, or explicitly `null`.
    Missing,
    /// Present but not a JSON string.
    NotAString,
    /// The empty string.
    Empty,
}

/// A rejected field together with the reason.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: Field,
    pub problem: FieldProblem,
}

impl core::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = self.field.as_str();
        match self.problem {
            FieldProblem::Missing => write!(f, "{name} is required"),
            FieldProblem::NotAString => write!(f, "{name} must be a string"),
            FieldProblem::Empty => write!(f, "{name} must not be empty"),
        }
    }
}

/// A submission failed validation.
///
/// Always carries at least one issue; every rejected field is reported, not just the first.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    pub fn has_issue(&self, field: Field, problem: FieldProblem) -> bool {
        self.issues
            .iter()
            .any(|i| i.field == field && i.problem == problem)
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
