//! The routing engine: one poll cycle from USB reading to applied defaults.
//!
//! The engine owns the debounced monitor and the last successfully applied
//! decision, and talks to the outside world only through the two collaborator
//! traits. Every failure is absorbed at the tick boundary; the poll cadence
//! is the retry interval.

use tracing::{debug, info, warn};

use crate::device::{AudioDevice, Direction};
use crate::error::Result;
use crate::monitor::HeadsetMonitor;
use crate::reading::{HeadsetReading, HeadsetStatus};
use crate::selector::{RoutingDecision, select};

/// Queries the headset base station.
///
/// Infallible at this boundary: adapters map I/O failures to
/// [`HeadsetStatus::Unavailable`], which the state machine treats as a no-op
/// sample.
pub trait StatusReader {
    fn read_status(&mut self) -> HeadsetStatus;
}

/// Enumerates host audio devices and sets system defaults.
///
/// An empty device list is a valid snapshot, not an error. `set_default` is
/// idempotent from the caller's perspective.
pub trait DeviceCatalog {
    /// Current snapshot for one direction. Never cached across ticks.
    fn list_devices(&mut self, direction: Direction) -> Result<Vec<AudioDevice>>;

    /// Make the device with `id` the system default for `direction`.
    fn set_default(&mut self, direction: Direction, id: &str) -> Result<()>;
}

/// Why a tick applied nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Device snapshot could not be taken; never decide on partial data.
    SnapshotFailed,
    /// Selector found no eligible device for this direction.
    NoEligibleDevice(Direction),
    /// A set-default call failed; the decision stays unapplied.
    ApplyFailed,
}

/// Result of one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Decision changed and both defaults were set.
    Applied(RoutingDecision),
    /// Decision matches the last applied one; no system calls made.
    Unchanged,
    /// Nothing applied this tick; retried on the next.
    Skipped(SkipReason),
}

/// Drives one full cycle per call to [`RoutingEngine::tick`].
pub struct RoutingEngine<R, C> {
    reader: R,
    catalog: C,
    monitor: HeadsetMonitor,
    last_applied: Option<RoutingDecision>,
}

impl<R: StatusReader, C: DeviceCatalog> RoutingEngine<R, C> {
    #[must_use]
    pub fn new(reader: R, catalog: C, monitor: HeadsetMonitor) -> Self {
        Self { reader, catalog, monitor, last_applied: None }
    }

    /// The decision most recently applied in full, if any.
    #[must_use]
    pub fn last_applied(&self) -> Option<&RoutingDecision> {
        self.last_applied.as_ref()
    }

    /// Run one poll cycle: sample, debounce, snapshot, select, apply.
    pub fn tick(&mut self) -> TickOutcome {
        let reading = HeadsetReading::now(self.reader.read_status());
        if let Some(state) = self.monitor.observe(reading) {
            info!(?state, "Headset state changed");
        }
        let state = self.monitor.state();

        let devices = match self.snapshot() {
            Ok(devices) => devices,
            Err(e) => {
                debug!(error = %e, "Device snapshot failed; skipping tick");
                return TickOutcome::Skipped(SkipReason::SnapshotFailed);
            }
        };

        let decision = match select(state, &devices) {
            Ok(decision) => decision,
            Err(e) => {
                warn!(direction = ?e.direction, "No eligible audio device; will retry");
                return TickOutcome::Skipped(SkipReason::NoEligibleDevice(e.direction));
            }
        };

        // Apply only on change. Redundant set-default calls can cause audible
        // clicks, so an unchanged decision is a no-op tick.
        if self.last_applied.as_ref() == Some(&decision) {
            return TickOutcome::Unchanged;
        }

        if let Err(e) = self.catalog.set_default(Direction::Output, &decision.output.id) {
            warn!(device = %decision.output.display_name(), error = %e, "Failed to set default output; will retry");
            return TickOutcome::Skipped(SkipReason::ApplyFailed);
        }
        if let Err(e) = self.catalog.set_default(Direction::Input, &decision.input.id) {
            warn!(device = %decision.input.display_name(), error = %e, "Failed to set default input; will retry");
            return TickOutcome::Skipped(SkipReason::ApplyFailed);
        }

        info!(
            output = %decision.output.display_name(),
            input = %decision.input.display_name(),
            ?state,
            "Default audio devices switched"
        );
        self.last_applied = Some(decision.clone());
        TickOutcome::Applied(decision)
    }

    fn snapshot(&mut self) -> Result<Vec<AudioDevice>> {
        let mut devices = self.catalog.list_devices(Direction::Output)?;
        devices.extend(self.catalog.list_devices(Direction::Input)?);
        Ok(devices)
    }
}
