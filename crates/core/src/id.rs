//! Strongly-typed identifiers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a stored demo request.
///
/// Assigned by the store on insert and never changed afterwards.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemoRequestId(Uuid);

impl DemoRequestId {
    /// Create a new identifier.
    ///
    /// Uses UUIDv7 (time-ordered), so ids generated in-process sort by creation.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for DemoRequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for DemoRequestId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_generated_later_sort_after_earlier_ones() {
        let a = DemoRequestId::new();
        let b = DemoRequestId::new();
        assert!(b > a);
    }

    #[test]
    fn serializes_as_plain_uuid_string() {
        let uuid = Uuid::now_v7();
        let id = DemoRequestId::from_uuid(uuid);
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(uuid.to_string()));
    }
}
