use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Designer,
    PrintManager,
    #[default]
    Admin,
    // Roles this service does not know about never receive anything.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(default)]
    pub phone: String,

    // Legacy settings key kept for configs written before the rename to "phone".
    #[serde(default)]
    pub number: String,

    #[serde(default, rename = "apiKey")]
    pub api_key: String,

    #[serde(default)]
    pub role: Role,

    #[serde(default, rename = "userId", deserialize_with = "user_id_as_string")]
    pub user_id: Option<String>,

    #[serde(default)]
    pub preferences: Option<HashMap<String, bool>>,
}

impl Recipient {
    pub fn identifier(&self) -> &str {
        if self.phone.is_empty() {
            &self.number
        } else {
            &self.phone
        }
    }
}

fn user_id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "userId must be a string or number, got {other}"
        ))),
    }
}
