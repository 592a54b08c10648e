//! Headless scenario driver.
//!
//! Plays a scripted artillery scenario, prints every report line as it is
//! produced and finishes with the session digest.
mod config;

use anyhow::{Context, Result};
use barrage_runtime::{ReportEvent, Scenario};
use config::CliConfig;
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let config = CliConfig::from_env();
    let path = config
        .scenario
        .clone()
        .context("usage: barrage-cli <scenario.ron> (or set BARRAGE_SCENARIO)")?;

    let mut scenario = Scenario::load_from_file(&path)
        .with_context(|| format!("loading scenario {}", path.display()))?;
    if let Some(seed) = config.seed {
        scenario.seed = seed;
    }
    tracing::info!(scenario = %scenario.name, seed = scenario.seed, turns = scenario.turns.len(), "Scenario loaded");

    let mut runtime = scenario.build_runtime()?;
    let mut events = runtime.subscribe_reports();
    let json = config.json;
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => print_event(&event, json),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Report printer fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let summaries = scenario.play(&mut runtime).await?;
    let digest = runtime.digest_hex();
    let entries = runtime.reports().len();
    // Closes the report channel so the printer drains and stops.
    drop(runtime);
    printer.await?;

    let resolved: usize = summaries.iter().map(|summary| summary.reports.len()).sum();
    tracing::info!(resolved, entries, "Scenario finished");
    println!("digest {digest}");
    Ok(())
}

fn print_event(event: &ReportEvent, json: bool) {
    if json {
        match event.to_json() {
            Ok(line) => println!("{line}"),
            Err(error) => tracing::error!(%error, sequence = event.sequence, "Report encoding failed"),
        }
    } else {
        println!("{}", event.text);
    }
}

/// Logs go to stderr so report output on stdout stays clean.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = include_str!("../scenarios/demo.ron");

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn bundled_demo_plays_to_completion() {
        let scenario = Scenario::parse(DEMO).unwrap();
        let mut runtime = scenario.build_runtime().unwrap();

        let summaries = scenario.play(&mut runtime).await.unwrap();

        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].declared.len(), 3);
        assert!(!runtime.reports().is_empty());
    }
}
