use serde_json::Value;
use uuid::Uuid;

use super::store::Fields;

/// Equality filter over top-level document fields.
///
/// An empty filter matches every document. Conditions are ANDed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Fields,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`. A later condition on the same field replaces the earlier one.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(field.into(), value.into());
        self
    }

    /// Require `field` to hold the given id, in its serialized (hyphenated) form.
    pub fn eq_id(self, field: impl Into<String>, id: Uuid) -> Self {
        self.eq(field, id.to_string())
    }

    /// JSON object form, usable as a containment pattern.
    pub fn to_value(&self) -> Value {
        Value::Object(self.conditions.clone())
    }

    pub fn matches(&self, body: &Fields) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| body.get(field) == Some(expected))
    }
}
