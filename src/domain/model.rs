use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user record as returned by the remote API.
///
/// The fields are kept exactly as received; nothing in this crate looks
/// inside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User {
    fields: Map<String, Value>,
}

impl User {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for User {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Response envelope: `{ "data": [ ... ] }`. `data` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    pub data: Vec<User>,
}
