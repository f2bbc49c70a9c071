//! Terraform `external` data source that reads one key of a Kubernetes Secret.
//!
//! The protocol is a single JSON object on stdin ([`Query`]) and a single
//! JSON object on stdout ([`SecretValue`]). Any failure is one diagnostic
//! line on stderr and exit code 1.

pub mod error;
pub mod query;

use secret_lookup_api::{build_client, read_secret_key};
use tracing::debug;

pub use error::LookupError;
pub use query::{Query, RequiredField, SecretValue};

/// Validate `query`, connect to its cluster and read the requested key.
pub async fn lookup(query: &Query) -> Result<SecretValue, LookupError> {
    query.validate().map_err(LookupError::MissingField)?;

    let client = build_client(&query.credentials()).await?;
    debug!(namespace = %query.namespace, name = %query.name, key = %query.key, "reading secret key");

    let value = read_secret_key(&client, &query.namespace, &query.name, &query.key).await?;
    Ok(SecretValue { value })
}

/// Turn raw stdin bytes into the stdout document.
///
/// Nothing is written anywhere: the caller decides what to do with the
/// rendered response or the error.
pub async fn run(input: &[u8]) -> Result<String, LookupError> {
    let query = Query::from_slice(input).map_err(LookupError::Parse)?;
    debug!(?query, "parsed query");

    let response = lookup(&query).await?;
    response.to_json().map_err(LookupError::Encode)
}
