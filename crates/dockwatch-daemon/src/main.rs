//! Dockwatch Daemon - A50-aware default audio device switching.
//!
//! Polls the A50 base station over USB on a fixed interval, debounces the
//! headset state, and keeps the system default sink/source aligned with a
//! fixed priority policy (headset > HDMI > internal speaker; headset mic >
//! internal mic array > external mic).

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod signals;

use dockwatch_audio::PactlCatalog;
use dockwatch_core::{HeadsetMonitor, MonitorConfig, RoutingEngine};
use dockwatch_usb::A50StatusReader;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("dockwatch_daemon=debug".parse()?)
                .add_directive("dockwatch_core=debug".parse()?)
                .add_directive("dockwatch_audio=info".parse()?)
                .add_directive("dockwatch_usb=info".parse()?),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Dockwatch daemon");

    // Load configuration
    let config = config::load_config()?;
    info!("Configuration loaded");

    let vendor_id = config.device.vendor_id()?;
    let product_id = config.device.product_id()?;

    // Startup probes. These are the only fatal failure points: a daemon that
    // can reach neither subsystem is useless. Everything after this is
    // retried on the poll cadence.
    let catalog = PactlCatalog::new(
        config.audio.headset_sink.clone(),
        config.audio.headset_source.clone(),
    );
    catalog
        .probe()
        .context("Audio server unreachable - is PulseAudio/PipeWire running?")?;
    info!("Audio server reachable");

    let station_present = dockwatch_usb::probe_usb_stack(vendor_id, product_id)
        .context("USB enumeration failed")?;
    if station_present {
        info!("A50 base station present");
    } else {
        warn!("A50 base station not found; starting in fallback mode");
    }

    let reader = A50StatusReader::new(vendor_id, product_id);
    let monitor = HeadsetMonitor::new(MonitorConfig {
        debounce_threshold: config.poll.debounce_threshold,
        degraded_after: config.poll.degraded_after_polls,
    });
    let mut engine = RoutingEngine::new(reader, catalog, monitor);

    // Set up signal handling
    let mut shutdown_rx = signals::setup_signal_handlers()?;

    let mut interval = tokio::time::interval(Duration::from_millis(config.poll.interval_ms));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(interval_ms = config.poll.interval_ms, "Daemon running. Press Ctrl+C to exit.");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                // Ticks run to completion before the next one starts and
                // before the shutdown channel is polled, so a termination
                // signal never leaves a routing decision half-applied.
                engine.tick();
            }

            _ = shutdown_rx.recv() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!("Dockwatch daemon stopped");
    Ok(())
}
