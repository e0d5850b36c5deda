//! The demo request entity and submission validation.
//!
//! A `Submission` is whatever the client sent. `Submission::validate` turns it into a
//! `NewDemoRequest` (or a `ValidationError`) without touching storage. The store then
//! assigns an id and hands back a `DemoRequest`, which is never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;

use crate::error::{FieldIssue, FieldProblem, ValidationError};
use crate::id::DemoRequestId;

/// The four client-supplied fields of a demo request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    #[serde(rename = "practiceName")]
    PracticeName,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "phoneNumber")]
    PhoneNumber,
    #[serde(rename = "message")]
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::PracticeName,
        Field::Email,
        Field::PhoneNumber,
        Field::Message,
    ];

    /// Name of the field on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::PracticeName => "practiceName",
            Field::Email => "email",
            Field::PhoneNumber => "phoneNumber",
            Field::Message => "message",
        }
    }
}

/// Whether two demo requests may share an email address.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum EmailPolicy {
    AllowDuplicates,
    #[default]
    Unique,
}

impl EmailPolicy {
    pub fn is_unique(&self) -> bool {
        matches!(self, EmailPolicy::Unique)
    }
}

impl core::str::FromStr for EmailPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unique" => Ok(EmailPolicy::Unique),
            "allow-duplicates" | "allow_duplicates" => Ok(EmailPolicy::AllowDuplicates),
            other => Err(format!(
                "unknown email policy `{other}` (expected `unique` or `allow-duplicates`)"
            )),
        }
    }
}

/// Untrusted submission payload.
///
/// Fields are kept as raw JSON so that a missing field, a `null`, a number and an empty
/// string can each be reported precisely. Only a JSON object is accepted; unknown keys
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submission {
    pub practice_name: Option<JsonValue>,
    pub email: Option<JsonValue>,
    pub phone_number: Option<JsonValue>,
    pub message: Option<JsonValue>,
}

impl<'de> Deserialize<'de> for Submission {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Deserializing via a map rejects positional (array) bodies.
        let mut object = JsonMap::<String, JsonValue>::deserialize(deserializer)?;
        let mut take = |field: Field| object.remove(field.as_str());
        Ok(Self {
            practice_name: take(Field::PracticeName),
            email: take(Field::Email),
            phone_number: take(Field::PhoneNumber),
            message: take(Field::Message),
        })
    }
}

impl Submission {
    /// Build a submission from plain strings.
    pub fn new(
        practice_name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            practice_name: Some(JsonValue::String(practice_name.into())),
            email: Some(JsonValue::String(email.into())),
            phone_number: Some(JsonValue::String(phone_number.into())),
            message: Some(JsonValue::String(message.into())),
        }
    }

    fn raw(&self, field: Field) -> Option<&JsonValue> {
        match field {
            Field::PracticeName => self.practice_name.as_ref(),
            Field::Email => self.email.as_ref(),
            Field::PhoneNumber => self.phone_number.as_ref(),
            Field::Message => self.message.as_ref(),
        }
    }

    /// Check every required field and stamp the result with `submitted_at`.
    ///
    /// Accepted values are kept verbatim (no trimming).
    pub fn validate(&self, submitted_at: DateTime<Utc>) -> Result<NewDemoRequest, ValidationError> {
        let mut issues = Vec::new();
        let mut values: [String; 4] = Default::default();

        for (slot, field) in values.iter_mut().zip(Field::ALL) {
            match check_field(self.raw(field)) {
                Ok(v) => *slot = v,
                Err(problem) => issues.push(FieldIssue { field, problem }),
            }
        }

        if !issues.is_empty() {
            return Err(ValidationError { issues });
        }

        let [practice_name, email, phone_number, message] = values;
        Ok(NewDemoRequest {
            practice_name,
            email,
            phone_number,
            message,
            created_at: submitted_at,
        })
    }
}

fn check_field(raw: Option<&JsonValue>) -> Result<String, FieldProblem> {
    match raw {
        None | Some(JsonValue::Null) => Err(FieldProblem::Missing),
        Some(JsonValue::String(s)) if s.is_empty() => Err(FieldProblem::Empty),
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(_) => Err(FieldProblem::NotAString),
    }
}

/// A validated demo request that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDemoRequest {
    pub practice_name: String,
    pub email: String,
    pub phone_number: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl NewDemoRequest {
    /// Attach the store-assigned identifier.
    pub fn into_stored(self, id: DemoRequestId) -> DemoRequest {
        DemoRequest {
            id,
            practice_name: self.practice_name,
            email: self.email,
            phone_number: self.phone_number,
            message: self.message,
            created_at: self.created_at,
        }
    }
}

/// A persisted demo request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoRequest {
    pub id: DemoRequestId,
    pub practice_name: String,
    pub email: String,
    pub phone_number: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn acme() -> Submission {
        Submission::new("Acme Dental", "a@acme.com", "555-1234", "Interested")
    }

    #[test]
    fn valid_submission_keeps_fields_verbatim() {
        let now = Utc::now();
        let new = acme().validate(now).unwrap();
        assert_eq!(new.practice_name, "Acme Dental");
        assert_eq!(new.email, "a@acme.com");
        assert_eq!(new.phone_number, "555-1234");
        assert_eq!(new.message, "Interested");
        assert_eq!(new.created_at, now);
    }

    #[test]
    fn empty_practice_name_is_rejected() {
        let s = Submission::new("", "x@y.com", "1", "hi");
        let err = s.validate(Utc::now()).unwrap_err();
        assert_eq!(
            err.issues(),
            &[FieldIssue {
                field: Field::PracticeName,
                problem: FieldProblem::Empty
            }]
        );
        assert_eq!(err.to_string(), "practiceName must not be empty");
    }

    #[test]
    fn whitespace_only_is_accepted_verbatim() {
        let s = Submission::new("Acme", "a@acme.com", "   ", " ");
        let new = s.validate(Utc::now()).unwrap();
        assert_eq!(new.phone_number, "   ");
        assert_eq!(new.message, " ");
    }

    #[test]
    fn positional_array_is_not_a_submission() {
        let parsed = serde_json::from_value::<Submission>(json!([
            "Acme",
            "arr@acme.com",
            "1",
            "hi"
        ]));
        assert!(parsed.is_err());
        assert!(serde_json::from_value::<Submission>(json!("Acme")).is_err());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let s: Submission = serde_json::from_value(json!({
            "practiceName": "Acme Dental",
            "email": "a@acme.com",
            "phoneNumber": "555-1234",
            "message": "Interested",
            "referrer": "newsletter",
        }))
        .unwrap();
        assert_eq!(s, acme());
    }

    #[test]
    fn each_missing_field_is_reported() {
        for field in Field::ALL {
            let mut s = acme();
            match field {
                Field::PracticeName => s.practice_name = None,
                Field::Email => s.email = None,
                Field::PhoneNumber => s.phone_number = None,
                Field::Message => s.message = None,
            }
            let err = s.validate(Utc::now()).unwrap_err();
            assert_eq!(err.issues().len(), 1, "field {}", field.as_str());
            assert!(err.has_issue(field, FieldProblem::Missing));
        }
    }

    #[test]
    fn null_and_non_string_values_are_distinguished() {
        let s: Submission = serde_json::from_value(json!({
            "practiceName": null,
            "email": 42,
            "phoneNumber": "555",
            "message": ["hi"],
        }))
        .unwrap();
        let err = s.validate(Utc::now()).unwrap_err();
        assert_eq!(err.issues().len(), 3);
        assert!(err.has_issue(Field::PracticeName, FieldProblem::Missing));
        assert!(err.has_issue(Field::Email, FieldProblem::NotAString));
        assert!(err.has_issue(Field::Message, FieldProblem::NotAString));
        assert_eq!(
            err.to_string(),
            "practiceName is required, email must be a string, message must be a string"
        );
    }

    #[test]
    fn empty_object_reports_all_four_fields() {
        let s: Submission = serde_json::from_value(json!({})).unwrap();
        let err = s.validate(Utc::now()).unwrap_err();
        let fields: Vec<Field> = err.issues().iter().map(|i| i.field).collect();
        assert_eq!(fields, Field::ALL.to_vec());
    }

    #[test]
    fn stored_record_serializes_camel_case() {
        let record = acme()
            .validate(Utc::now())
            .unwrap()
            .into_stored(DemoRequestId::new());
        let v = serde_json::to_value(&record).unwrap();
        assert_eq!(v["practiceName"], "Acme Dental");
        assert_eq!(v["phoneNumber"], "555-1234");
        assert!(v["createdAt"].is_string());
        assert_eq!(v["id"], record.id.to_string());
    }

    #[test]
    fn email_policy_parses_config_values() {
        assert_eq!("unique".parse::<EmailPolicy>(), Ok(EmailPolicy::Unique));
        assert_eq!(
            "Allow-Duplicates".parse::<EmailPolicy>(),
            Ok(EmailPolicy::AllowDuplicates)
        );
        assert!("sometimes".parse::<EmailPolicy>().is_err());
    }
}
