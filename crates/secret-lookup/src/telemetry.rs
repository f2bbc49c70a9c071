use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log records go to stderr; stdout carries only the response document.
pub fn init() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("secret_lookup=warn,secret_lookup_api=warn,kube=warn")
        }))
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();
}
