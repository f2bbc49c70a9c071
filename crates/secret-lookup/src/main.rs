mod telemetry;

use std::io::{Read, Write};
use std::process::ExitCode;

use clap::Parser;
use secret_lookup::LookupError;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "secret-lookup",
    version,
    about = "Read one key of a Kubernetes Secret for a Terraform external data source",
    long_about = "Reads a JSON query from stdin \
        (namespace, name, key, host, cluster_ca_certificate, token) \
        and writes {\"value\": ...} to stdout."
)]
struct Cli {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let Cli {} = Cli::parse();
    telemetry::init();

    match respond().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(error = ?e, "lookup failed");
            eprintln!("{}", e.diagnostic());
            ExitCode::FAILURE
        }
    }
}

async fn respond() -> Result<(), LookupError> {
    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .map_err(LookupError::Io)?;

    let output = secret_lookup::run(&input).await?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(LookupError::Write)
}
