//! Translator entry-point: loads settings, starts one consumer per bounded
//! context and feeds them `{topic, event}` JSON lines from stdin until
//! input ends or the process is interrupted.

use std::env;

use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::io::BufReader;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use translator::bootstrap::Service;
use translator::config::TranslatorSettings;

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = TranslatorSettings::load_from_iter(env::args_os())
        .map_err(|err| eyre!("failed to load translator settings: {err}"))?;
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build translator runtime")?;
    runtime.block_on(run(&settings))
}

async fn run(settings: &TranslatorSettings) -> Result<()> {
    let service = Service::start(settings).wrap_err("failed to start translator")?;
    info!(contexts = ?service.contexts(), "translator started");

    let stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        fed = service.router().feed(stdin) => match fed {
            Ok(summary) => info!(routed = summary.routed, rejected = summary.rejected, "input exhausted"),
            Err(err) => warn!(error = %err, "reading input failed"),
        },
        signal = tokio::signal::ctrl_c() => match signal {
            Ok(()) => info!("interrupt received; shutting down"),
            Err(err) => warn!(error = %err, "signal handler failed; shutting down"),
        },
    }

    service.shutdown().await;
    Ok(())
}
