// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context, Result};
use std::env;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use scrape_router::config::{load_and_validate_config, RouterBuilder};
use scrape_router::model::{Backend, RequestContext, ScrapeOptions};

const DEFAULT_LOG_FILTER: &str = "scrape_router=info";

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} <config.(yaml|toml)> <url> [backend ...]\n\
         Example: {program} configs/router.yaml https://example.com\n\
         Example: {program} configs/router.yaml https://example.com/report.pdf pdf fetch\n\
         \n\
         Log verbosity follows RUST_LOG (default: {DEFAULT_LOG_FILTER})."
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        bail!(usage(args.first().map(String::as_str).unwrap_or("scrape-router")));
    }

    let config_path = &args[1];
    let mut options = ScrapeOptions::new(&args[2]);
    if args.len() > 3 {
        let forced = args[3..]
            .iter()
            .map(|name| name.parse::<Backend>())
            .collect::<Result<Vec<_>, _>>()?;
        options.force_backends = Some(forced);
    }

    let config = load_and_validate_config(config_path)
        .with_context(|| format!("loading {}", config_path))?;
    let endpoints = config.endpoints.clone().with_env_overrides();
    let orchestrator = RouterBuilder::from_config(&config, endpoints)?;

    let request = RequestContext::new(options)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let start = Instant::now();
    let outcome = orchestrator.execute(&request, cancel).await?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    eprintln!(
        "Served by '{}' in {:.2?}",
        outcome.backend,
        start.elapsed()
    );
    Ok(())
}
