use std::env;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use typesense_indexer::{execute, Cli, Dependencies, IndexingError, Settings};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn run(cli: Cli) -> Result<(), IndexingError> {
    let settings = Settings::from_cli(cli)?;
    let deps = Dependencies::new(&settings)?;

    let output = tokio::select! {
        output = execute(&deps, &settings) => output?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            warn!("Interrupted, in-flight requests cancelled");
            return Err(IndexingError::Interrupted);
        }
    };

    if let Some(output) = output {
        println!("{}", output);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    info!(version = env!("CARGO_PKG_VERSION"), "Starting Typesense indexer");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Typesense indexer failed");
            ExitCode::FAILURE
        }
    }
}
