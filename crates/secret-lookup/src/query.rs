use std::fmt;

use secret_lookup_api::ClusterCredentials;
use serde::{Deserialize, Deserializer, Serialize};

/// The JSON object Terraform writes to stdin.
///
/// Absent and `null` fields deserialize to the empty string so that the
/// validation gate reports them the same way as `""`. Unknown fields are
/// ignored.
#[derive(Clone, Default, Deserialize)]
pub struct Query {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub namespace: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub key: String,
    /// Accepted for input compatibility; never read.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub context: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub host: String,
    #[serde(
        rename = "cluster_ca_certificate",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub ca_certificate: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub token: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A field that must be present and non-empty, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Namespace,
    Name,
    Key,
    Host,
    ClusterCaCertificate,
    Token,
}

impl RequiredField {
    pub const ALL: [RequiredField; 6] = [
        RequiredField::Namespace,
        RequiredField::Name,
        RequiredField::Key,
        RequiredField::Host,
        RequiredField::ClusterCaCertificate,
        RequiredField::Token,
    ];

    /// The JSON field name.
    pub fn as_str(self) -> &'static str {
        match self {
            RequiredField::Namespace => "namespace",
            RequiredField::Name => "name",
            RequiredField::Key => "key",
            RequiredField::Host => "host",
            RequiredField::ClusterCaCertificate => "cluster_ca_certificate",
            RequiredField::Token => "token",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Query {
    /// Parse a query, accepting only a top-level JSON object.
    ///
    /// A derived struct visitor would also fill fields positionally from an
    /// array, so the input goes through a map first.
    pub fn from_slice(input: &[u8]) -> Result<Self, serde_json::Error> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(input)?;
        serde_json::from_value(serde_json::Value::Object(object))
    }

    pub fn field(&self, field: RequiredField) -> &str {
        match field {
            RequiredField::Namespace => &self.namespace,
            RequiredField::Name => &self.name,
            RequiredField::Key => &self.key,
            RequiredField::Host => &self.host,
            RequiredField::ClusterCaCertificate => &self.ca_certificate,
            RequiredField::Token => &self.token,
        }
    }

    /// Return the first required field that is empty.
    pub fn validate(&self) -> Result<(), RequiredField> {
        match RequiredField::ALL
            .into_iter()
            .find(|&field| self.field(field).is_empty())
        {
            Some(field) => Err(field),
            None => Ok(()),
        }
    }

    pub fn credentials(&self) -> ClusterCredentials<'_> {
        ClusterCredentials {
            host: &self.host,
            ca_certificate: &self.ca_certificate,
            token: &self.token,
        }
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("key", &self.key)
            .field("context", &self.context)
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

/// The JSON object written to stdout on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretValue {
    pub value: String,
}

impl SecretValue {
    /// Render with two-space indentation and no trailing newline.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
