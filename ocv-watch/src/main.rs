use clap::Parser;
use kube::Client;
use ocv_core::logging;
use ocv_core::prelude::*;
use ocv_store::{
    ViewConfig,
    ViewManager,
};
use tracing::*;

#[derive(Parser, Debug)]
struct Options {
    #[arg(short, long)]
    namespace: Option<String>,

    #[arg(short, long)]
    config_file: Option<String>,

    #[arg(short, long)]
    selector: Option<String>,

    #[arg(short, long, default_value = "info")]
    verbosity: String,
}

// Command-line flags take precedence over whatever is in the config file
fn load_config(args: &Options) -> anyhow::Result<ViewConfig> {
    let mut config = match &args.config_file {
        Some(path) => ViewConfig::load(path)?,
        None => ViewConfig::default(),
    };

    if let Some(ns) = &args.namespace {
        config.namespace = ns.clone();
    }
    if let Some(sel) = &args.selector {
        config.label_selector = LabelSelector::parse(sel)?;
    }
    Ok(config)
}

#[instrument(ret, err)]
async fn run(args: Options) -> EmptyResult {
    let config = load_config(&args)?;
    let client = Client::try_default().await?;
    let mut manager = ViewManager::start(client, config).await?;
    let mut changes = manager.subscribe_changes();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, shutting down");
                break;
            },
            res = changes.changed() => {
                if res.is_err() {
                    warn!("dispatcher exited, shutting down");
                    break;
                }
                if let Some(summary) = manager.summary().await {
                    info!("{summary}");
                }
            },
        }
    }

    manager.teardown().await;
    Ok(())
}

#[tokio::main]
async fn main() -> EmptyResult {
    let args = Options::parse();
    logging::setup(&args.verbosity);
    run(args).await
}
