use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use kube::config::{
    AuthInfo, Cluster, Context, KubeConfigOptions, Kubeconfig, KubeconfigError, NamedAuthInfo,
    NamedCluster, NamedContext,
};
use kube::{Client, Config};
use tracing::debug;

/// Name shared by the single cluster, user and context entries of the
/// in-memory kubeconfig.
const KUBECONFIG_ENTRY: &str = "secret-lookup";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("cannot load Kubernetes configuration: {0}")]
    InvalidKubeconfig(#[from] KubeconfigError),
    #[error("cannot load Kubernetes configuration: CA data contains no PEM certificate")]
    InvalidCertificate,
    #[error("cannot create Kubernetes client: {0}")]
    Client(#[from] kube::Error),
}

/// Inline connection details for one API server.
///
/// Nothing here is read from a kubeconfig file or the environment: the
/// three fields are the whole configuration.
#[derive(Clone, Copy)]
pub struct ClusterCredentials<'a> {
    /// API server URL, e.g. `https://10.0.0.1:6443`.
    pub host: &'a str,
    /// PEM-encoded certificate authority bundle.
    pub ca_certificate: &'a str,
    /// Bearer token sent on every request.
    pub token: &'a str,
}

impl ClusterCredentials<'_> {
    /// Build a single-context kubeconfig holding only these credentials.
    ///
    /// The CA bundle is base64-encoded into `certificate-authority-data`,
    /// which is how a kubeconfig carries inline PEM.
    pub fn kubeconfig(&self) -> Kubeconfig {
        Kubeconfig {
            clusters: vec![NamedCluster {
                name: KUBECONFIG_ENTRY.into(),
                cluster: Some(Cluster {
                    server: Some(self.host.to_owned()),
                    certificate_authority_data: Some(STANDARD.encode(self.ca_certificate)),
                    ..Default::default()
                }),
            }],
            contexts: vec![NamedContext {
                name: KUBECONFIG_ENTRY.into(),
                context: Some(Context {
                    cluster: KUBECONFIG_ENTRY.into(),
                    user: Some(KUBECONFIG_ENTRY.into()),
                    ..Default::default()
                }),
            }],
            auth_infos: vec![NamedAuthInfo {
                name: KUBECONFIG_ENTRY.into(),
                auth_info: Some(AuthInfo {
                    token: Some(self.token.to_owned().into()),
                    ..Default::default()
                }),
            }],
            current_context: Some(KUBECONFIG_ENTRY.into()),
            ..Default::default()
        }
    }

    /// Resolve the credentials into a [`kube::Config`].
    pub async fn config(&self) -> Result<Config, ClientError> {
        let config =
            Config::from_custom_kubeconfig(self.kubeconfig(), &KubeConfigOptions::default())
                .await?;

        // Text that is not PEM at all can parse to an empty bundle.
        if config.root_cert.as_ref().is_none_or(|certs| certs.is_empty()) {
            return Err(ClientError::InvalidCertificate);
        }

        Ok(config)
    }
}

impl std::fmt::Debug for ClusterCredentials<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterCredentials")
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

/// Build a [`kube::Client`] that talks to `credentials.host` only.
pub async fn build_client(credentials: &ClusterCredentials<'_>) -> Result<Client, ClientError> {
    let config = credentials.config().await?;
    debug!(cluster_url = %config.cluster_url, "building Kubernetes client");
    Ok(Client::try_from(config)?)
}
