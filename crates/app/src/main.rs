//! restcheck binary.

use std::sync::Arc;

use clap::Parser;
use restcheck::fixtures::offline_transport;
use restcheck::render::{render_json, render_table};
use restcheck::{Cli, run_suite};
use restcheck_application::{ScenarioReport, ScenarioRunner};
use restcheck_infrastructure::ReqwestTransport;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    let config = cli.client_config().await?;

    tracing::info!(
        base_url = %config.base_url,
        offline = cli.offline,
        "restcheck v{}",
        env!("CARGO_PKG_VERSION")
    );

    let reports = if cli.offline {
        let transport = offline_transport(&config.base_url)?;
        run_suite(&ScenarioRunner::new(Arc::new(transport), config)).await
    } else {
        let transport = ReqwestTransport::new(&config)?;
        run_suite(&ScenarioRunner::new(Arc::new(transport), config)).await
    };

    if cli.json {
        println!("{}", render_json(&reports)?);
    } else {
        print!("{}", render_table(&reports));
    }

    let failed = reports
        .into_iter()
        .map(ScenarioReport::into_result)
        .filter_map(Result::err)
        .inspect(|error| tracing::error!(%error, "scenario failed"))
        .count();
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
