//! Verus miner framebuffer dashboard
//!
//! Tails the ccminer log, polls the pool for the pending balance on a
//! slow cached cadence, and renders a status frame straight to a raw
//! framebuffer device twice a second.

mod app;
mod config;
mod miner;
mod pool;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{error, info};

use app::Dashboard;
use config::Config;

/// Main entry point
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("verus-fbmon starting...");

    match run() {
        Ok(()) => {
            info!("verus-fbmon exiting cleanly");
            process::exit(0);
        }
        Err(e) => {
            error!("Fatal error: {:#}", e);
            eprintln!("\nFATAL ERROR: {:#}", e);
            process::exit(1);
        }
    }
}

/// Main application logic
fn run() -> Result<()> {
    let config = Config::parse();
    config.validate().context("invalid configuration")?;

    // Interrupt is the one graceful-stop signal; it just breaks the
    // loop, since no resources persist across ticks to release.
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))
            .context("installing interrupt handler")?;
    }

    let display = ui::create_backend(&config);
    let interval = config.interval();
    let mut dashboard = Dashboard::new(config, display)?;

    info!("Entering refresh loop...");
    while running.load(Ordering::SeqCst) {
        dashboard.tick();
        // Fixed cadence: no adaptation to how long the tick took.
        thread::sleep(interval);
    }

    info!("Interrupt received, exiting");
    Ok(())
}
