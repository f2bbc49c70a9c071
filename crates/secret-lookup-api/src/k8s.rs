use k8s_openapi::api::core::v1::Secret;
use kube::Client;
use kube::api::Api;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("cannot get the {name:?} secret in {namespace:?} namespace: {source}")]
    Fetch {
        namespace: String,
        name: String,
        #[source]
        source: kube::Error,
    },
    #[error("cannot find the key {key:?} for {name:?} secret in {namespace:?} namespace")]
    KeyNotFound {
        namespace: String,
        name: String,
        key: String,
    },
}

/// Read a single key from a Kubernetes Secret.
///
/// The kube client already decodes the base64 wire encoding of Secret
/// data. Bytes that are not valid UTF-8 are replaced with U+FFFD rather
/// than rejected. A Secret without any `data` is treated as missing the key.
pub async fn read_secret_key(
    client: &Client,
    namespace: &str,
    secret_name: &str,
    key: &str,
) -> Result<String, SecretError> {
    let api = Api::<Secret>::namespaced(client.clone(), namespace);
    let secret = api
        .get(secret_name)
        .await
        .map_err(|source| SecretError::Fetch {
            namespace: namespace.to_string(),
            name: secret_name.to_string(),
            source,
        })?;
    debug!(%namespace, name = %secret_name, "fetched secret");

    let bytes = secret
        .data
        .as_ref()
        .and_then(|data| data.get(key))
        .ok_or_else(|| SecretError::KeyNotFound {
            namespace: namespace.to_string(),
            name: secret_name.to_string(),
            key: key.to_string(),
        })?;

    Ok(String::from_utf8_lossy(&bytes.0).into_owned())
}
