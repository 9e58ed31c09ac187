use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const FIRST_NAME: &str = "first_name";
pub const LAST_NAME: &str = "last_name";
pub const EMAIL: &str = "email";
pub const SUBSCRIPTION_DATE: &str = "subscription_date";
pub const UNSUBSCRIPTION_DATE: &str = "unsubscription_date";
pub const BIRTHDAY: &str = "birthday";
pub const LATEST_INTERACTION: &str = "latest_interaction";
pub const SUBSCRIPTION_STATUS_EMAIL: &str = "subscription_status_email";
pub const SUBSCRIPTION_STATUS_SMS: &str = "subscription_status_sms";
pub const BUYER_PREFERENCE: &str = "buyer_preference";
pub const TAGS: &str = "tags";

/// Fields every contact must carry a non-empty value for, in reporting order.
pub const REQUIRED_FIELDS: [&str; 3] = [FIRST_NAME, LAST_NAME, EMAIL];

/// Calendar-valued fields, stored as ISO-8601 text.
pub const DATE_FIELDS: [&str; 4] = [
    SUBSCRIPTION_DATE,
    UNSUBSCRIPTION_DATE,
    BIRTHDAY,
    LATEST_INTERACTION,
];

pub const DEFAULT_SUBSCRIPTION_STATUS: &str = "pending";
pub const DEFAULT_BUYER_PREFERENCE: &str = "email";

/// A persisted CRM contact as returned by the datastore.
///
/// `id` and `created_at` are assigned by the datastore. Columns the model does
/// not know about are kept verbatim in `extra`, so a datastore with a wider
/// table round-trips without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub subscription_date: Option<String>,
    #[serde(default)]
    pub unsubscription_date: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub latest_interaction: Option<String>,
    #[serde(
        default = "default_subscription_status",
        deserialize_with = "null_as_subscription_status"
    )]
    pub subscription_status_email: String,
    #[serde(
        default = "default_subscription_status",
        deserialize_with = "null_as_subscription_status"
    )]
    pub subscription_status_sms: String,
    #[serde(
        default = "default_buyer_preference",
        deserialize_with = "null_as_buyer_preference"
    )]
    pub buyer_preference: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_subscription_status() -> String {
    DEFAULT_SUBSCRIPTION_STATUS.to_string()
}

fn default_buyer_preference() -> String {
    DEFAULT_BUYER_PREFERENCE.to_string()
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, found {}",
            other
        ))),
    }
}

fn null_as_subscription_status<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_subscription_status))
}

fn null_as_buyer_preference<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_buyer_preference))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// An unpersisted, partial contact: field name to JSON value.
///
/// Used as the body of create and update requests and as the candidate
/// record flowing through the CSV import pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactDraft(Map<String, Value>);

impl ContactDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn fields_mut(&mut self) -> impl Iterator<Item = (&String, &mut Value)> {
        self.0.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `true` when `field` is unset or holds a falsy value
    /// (`null`, `""`, `false` or zero).
    pub fn is_missing(&self, field: &str) -> bool {
        match self.0.get(field) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(Value::Bool(b)) => !b,
            Some(Value::Number(n)) => n.as_f64() == Some(0.0),
            Some(Value::Array(_)) | Some(Value::Object(_)) => false,
        }
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ContactDraft {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for ContactDraft {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
