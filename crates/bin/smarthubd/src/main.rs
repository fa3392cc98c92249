//! # smarthubd — smarthub daemon
//!
//! Composition root that wires the controller together and runs it once.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise `tracing` with the configured filter
//! - Construct the log sink and notifier, inject them into the controller
//! - Load the sample household when configured
//! - Run one evaluation pass and print the home report
//!
//! ## Dependency rule
//! This is the **only** crate that depends on every other crate.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use smarthub_app::controller::Controller;
use smarthub_app::ports::{SharedSink, SinkNotifier, TracingSink};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading smarthub.toml")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter)
                .with_context(|| format!("invalid log filter {:?}", config.logging.filter))?,
        )
        .init();

    let sink: SharedSink = Arc::new(TracingSink);
    let mut controller = Controller::new(
        config.controller(),
        sink.clone(),
        SinkNotifier::new(sink),
    );

    if config.seed.sample_data {
        controller
            .seed_sample_data()
            .context("loading sample data")?;
    }

    let evaluation = controller.evaluate_rules();
    tracing::info!(
        fired = evaluation.fired.len(),
        skipped = evaluation.skipped.len(),
        "startup evaluation finished"
    );

    println!("{}", controller.report());
    Ok(())
}
