pub mod client;
pub mod k8s;

pub use client::{ClientError, ClusterCredentials, build_client};
pub use k8s::{SecretError, read_secret_key};
