use secret_lookup_api::{ClientError, SecretError};

use crate::query::RequiredField;

/// Every way a lookup can fail. Each one is fatal and maps to exit code 1.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("cannot read stdin input: {0}")]
    Io(#[source] std::io::Error),
    #[error("cannot parse input JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("missing or empty {0} parameter")]
    MissingField(RequiredField),
    #[error(transparent)]
    Config(#[from] ClientError),
    #[error(transparent)]
    Secret(#[from] SecretError),
    #[error("cannot encode result: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("cannot write result: {0}")]
    Write(#[source] std::io::Error),
}

impl LookupError {
    /// The diagnostic as exactly one line of text.
    pub fn diagnostic(&self) -> String {
        self.to_string().replace(['\r', '\n'], " ")
    }
}
