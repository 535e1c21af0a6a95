//! Wire types for the Armis API.
//!
//! Policy payloads use camelCase keys (`ruleType`); list entries use
//! snake_case. Response types tolerate missing fields so partial payloads,
//! such as a PATCH response that only echoes the changed fields, still decode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// The `{success, data, error}` wrapper around every API response.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// The kinds of entity a policy can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleType {
    Activity,
    IpConnection,
    Device,
    Vulnerability,
}

impl RuleType {
    pub const ALL: [RuleType; 4] = [
        RuleType::Activity,
        RuleType::IpConnection,
        RuleType::Device,
        RuleType::Vulnerability,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleType::Activity => "ACTIVITY",
            RuleType::IpConnection => "IP_CONNECTION",
            RuleType::Device => "DEVICE",
            RuleType::Vulnerability => "VULNERABILITY",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match against the wire names.
impl FromStr for RuleType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleType::ALL
            .into_iter()
            .find(|rule_type| rule_type.as_str() == s)
            .ok_or_else(|| ValidationError::RuleType(s.to_string()))
    }
}

/// Rule expression of a policy: every token in `and` must match.
///
/// Tokens are opaque to the client and passed through as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    #[serde(default)]
    pub and: Vec<serde_json::Value>,
}

impl Rules {
    pub fn all_of<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<serde_json::Value>,
    {
        Self {
            and: tokens.into_iter().map(Into::into).collect(),
        }
    }
}

/// A policy as sent on create/update and returned on reads.
///
/// `rule_type` is kept as the raw wire string so that values read back from
/// the API are never rejected on decode; `validate` checks it on the way out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicySettings {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rule_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rules: Rules,
}

impl PolicySettings {
    pub fn new(name: impl Into<String>, rule_type: RuleType, rules: Rules) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            rule_type: rule_type.as_str().to_string(),
            rules,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The typed rule type, if the raw value is one of the known kinds.
    pub fn parsed_rule_type(&self) -> Result<RuleType, ValidationError> {
        self.rule_type.parse()
    }
}

/// `data` of a successful create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CreatedPolicy {
    pub id: i64,
}

/// `data` of `GET /api/v1/policies/`.
///
/// The cursor fields are passed through exactly as the API returns them:
/// `null` or a missing key is `None`, anything else (negative numbers,
/// opaque string cursors) is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PolicyPage {
    pub count: Option<serde_json::Value>,
    pub next: Option<serde_json::Value>,
    pub prev: Option<serde_json::Value>,
    pub total: Option<serde_json::Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub policies: Vec<PolicySettings>,
}

/// `data` of `GET /api/v1/lists/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ListCollection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub lists: Vec<ListEntry>,
}

/// A list as reported by the API. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListEntry {
    list_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    list_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    list_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    created_by: String,
    #[serde(default, deserialize_with = "null_as_default")]
    creation_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    last_updated_by: String,
    #[serde(default, deserialize_with = "null_as_default")]
    last_update_time: String,
}

impl ListEntry {
    pub fn list_id(&self) -> i64 {
        self.list_id
    }

    pub fn list_name(&self) -> &str {
        &self.list_name
    }

    pub fn list_type(&self) -> &str {
        &self.list_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn creation_time(&self) -> &str {
        &self.creation_time
    }

    pub fn last_updated_by(&self) -> &str {
        &self.last_updated_by
    }

    pub fn last_update_time(&self) -> &str {
        &self.last_update_time
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
