//! Device enumeration and default switching via `pactl`.
//!
//! Parsing is kept pure (`&str` in, devices out) so it can be tested against
//! canned `pactl` output without a running audio server.

use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use dockwatch_core::{AudioDevice, DeviceCategory, Direction, Error};

use crate::error::{AudioError, AudioResult};

/// Port marked unavailable. `pactl` prints this in two styles:
/// `... availability group: ..., not available)` and `available: no`.
static RE_PORT_UNAVAILABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bnot available\b|\bavailable:\s*no\b").expect("static regex")
});

/// Port marked available: `... available)` or `available: yes`. Checked only
/// after the unavailable form, since "not available)" also ends in
/// "available)".
static RE_PORT_AVAILABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bavailable\)|\bavailable:\s*yes\b").expect("static regex")
});

/// Device catalog backed by the `pactl` CLI.
pub struct PactlCatalog {
    headset_sink: String,
    headset_source: String,
}

impl PactlCatalog {
    /// Create a catalog. The headset node names identify which sink/source
    /// belong to the A50 (they are device-specific and stable).
    #[must_use]
    pub fn new(headset_sink: String, headset_source: String) -> Self {
        Self { headset_sink, headset_source }
    }

    /// Check that the audio server is reachable at all.
    ///
    /// # Errors
    /// Returns an error if `pactl info` cannot be run or fails.
    pub fn probe(&self) -> AudioResult<()> {
        run_pactl(&["info"])?;
        Ok(())
    }

    fn list(&self, direction: Direction) -> AudioResult<Vec<AudioDevice>> {
        match direction {
            Direction::Output => {
                let output = run_pactl(&["list", "sinks"])?;
                Ok(parse_sinks(&output, &self.headset_sink))
            }
            Direction::Input => {
                let output = run_pactl(&["list", "sources"])?;
                Ok(parse_sources(&output, &self.headset_source))
            }
        }
    }
}

impl dockwatch_core::DeviceCatalog for PactlCatalog {
    fn list_devices(&mut self, direction: Direction) -> dockwatch_core::Result<Vec<AudioDevice>> {
        self.list(direction).map_err(|e| Error::Catalog(e.to_string()))
    }

    fn set_default(&mut self, direction: Direction, id: &str) -> dockwatch_core::Result<()> {
        let subcommand = match direction {
            Direction::Output => "set-default-sink",
            Direction::Input => "set-default-source",
        };
        run_pactl(&[subcommand, id]).map_err(|e| Error::Catalog(e.to_string()))?;
        debug!(?direction, device = %id, "Default device set");
        Ok(())
    }
}

/// Run `pactl` and return stdout.
fn run_pactl(args: &[&str]) -> AudioResult<String> {
    let output = Command::new("pactl").args(args).output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AudioError::Pactl(format!("pactl {} failed: {stderr}", args.join(" "))));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse `pactl list sinks` output into output devices.
///
/// HDMI sinks are available only if at least one of their ports is (which is
/// how a connected display shows up); other sinks are physical devices and
/// always available.
fn parse_sinks(output: &str, headset_sink: &str) -> Vec<AudioDevice> {
    let mut sinks = Vec::new();
    let mut current_name: Option<&str> = None;
    let mut port_available = Vec::new();
    let mut in_ports = false;

    let mut flush = |name: Option<&str>, ports: &[bool]| {
        if let Some(name) = name {
            let category = classify_sink(name, headset_sink);
            let available = match category {
                DeviceCategory::Hdmi => ports.iter().any(|&a| a),
                _ => true,
            };
            sinks.push(AudioDevice {
                id: name.to_string(),
                direction: Direction::Output,
                category,
                available,
            });
        }
    };

    for line in output.lines() {
        let stripped = line.trim();

        if stripped.starts_with("Sink #") {
            flush(current_name, &port_available);
            current_name = None;
            port_available.clear();
            in_ports = false;
        } else if let Some(name) = stripped.strip_prefix("Name:") {
            current_name = Some(name.trim());
        } else if stripped.starts_with("Ports:") {
            in_ports = true;
        } else if in_ports && !line.starts_with("\t\t") && line.starts_with('\t') {
            // Back at a top-level property; the ports block is over.
            if !stripped.starts_with("Port:") && stripped.contains(':') {
                in_ports = false;
            }
        } else if in_ports {
            if RE_PORT_UNAVAILABLE.is_match(stripped) {
                port_available.push(false);
            } else if RE_PORT_AVAILABLE.is_match(stripped) {
                port_available.push(true);
            }
        }
    }
    flush(current_name, &port_available);

    sinks
}

/// Parse `pactl list sources` output into input devices.
///
/// Monitor sources (sink loopbacks) are not microphones and are dropped.
fn parse_sources(output: &str, headset_source: &str) -> Vec<AudioDevice> {
    let mut sources = Vec::new();
    let mut current_name: Option<&str> = None;

    let mut flush = |name: Option<&str>| {
        if let Some(name) = name
            && let Some(category) = classify_source(name, headset_source)
        {
            sources.push(AudioDevice {
                id: name.to_string(),
                direction: Direction::Input,
                category,
                available: true,
            });
        }
    };

    for line in output.lines() {
        let stripped = line.trim();

        if stripped.starts_with("Source #") {
            flush(current_name);
            current_name = None;
        } else if let Some(name) = stripped.strip_prefix("Name:") {
            current_name = Some(name.trim());
        }
    }
    flush(current_name);

    sources
}

/// Classify a sink by name.
fn classify_sink(name: &str, headset_sink: &str) -> DeviceCategory {
    if name == headset_sink {
        return DeviceCategory::Headset;
    }
    let lower = name.to_lowercase();
    if lower.contains("hdmi") {
        DeviceCategory::Hdmi
    } else if lower.contains("analog") || lower.contains("speaker") {
        DeviceCategory::Internal
    } else {
        // Other USB or unrecognized sinks; never chosen as output fallback.
        DeviceCategory::External
    }
}

/// Classify a source by name. `None` means the source is not a usable
/// microphone (monitor loopbacks, unrelated USB capture devices).
fn classify_source(name: &str, headset_source: &str) -> Option<DeviceCategory> {
    if name == headset_source {
        return Some(DeviceCategory::Headset);
    }
    let lower = name.to_lowercase();
    if lower.contains(".monitor") {
        return None;
    }
    if lower.contains("usb") {
        return None;
    }
    // Laptop mic arrays enumerate as Mic1 or a "digital" profile; the 3.5mm
    // jack shows up as Mic2/analog.
    if lower.contains("mic1") || lower.contains("digital") {
        Some(DeviceCategory::Internal)
    } else {
        Some(DeviceCategory::External)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADSET_SINK: &str = "alsa_output.usb-Astro_Gaming_Astro_A50-00.stereo-game";
    const HEADSET_SOURCE: &str = "alsa_input.usb-Astro_Gaming_Astro_A50-00.mono-chat";

    // Trimmed-down pactl output covering both port-availability styles.
    const SINKS_OUTPUT: &str = "\
Sink #43
\tState: SUSPENDED
\tName: alsa_output.pci-0000_c3_00.1.HiFi__HDMI1__sink
\tDescription: HDMI / DisplayPort 1 Output
\tVolume: front-left: 65536 / 100%
\tPorts:
\t\t[Out] HDMI1: HDMI / DisplayPort 1 Output (type: HDMI, priority: 500, availability group: HDMI/DP,pcm=3, not available)
\tActive Port: [Out] HDMI1
Sink #44
\tState: RUNNING
\tName: alsa_output.pci-0000_c3_00.6.HiFi__Speaker__sink
\tDescription: Speaker
\tPorts:
\t\tPort: Speaker (type: Speaker, priority: 100, available: yes)
\tActive Port: Speaker
Sink #45
\tState: IDLE
\tName: alsa_output.usb-Astro_Gaming_Astro_A50-00.stereo-game
\tDescription: Astro A50 Game
";

    const SINKS_HDMI_CONNECTED: &str = "\
Sink #43
\tName: alsa_output.pci-0000_c3_00.1.HiFi__HDMI1__sink
\tPorts:
\t\t[Out] HDMI1: HDMI / DisplayPort 1 Output (type: HDMI, priority: 500, availability group: HDMI/DP,pcm=3, available)
\tActive Port: [Out] HDMI1
";

    const SOURCES_OUTPUT: &str = "\
Source #50
\tName: alsa_output.pci-0000_c3_00.6.HiFi__Speaker__sink.monitor
\tDescription: Monitor of Speaker
Source #51
\tName: alsa_input.pci-0000_c3_00.6.HiFi__Mic1__source
\tDescription: Digital Microphone
Source #52
\tName: alsa_input.pci-0000_c3_00.6.HiFi__Mic2__source
\tDescription: Headphones Stereo Microphone
Source #53
\tName: alsa_input.usb-Astro_Gaming_Astro_A50-00.mono-chat
\tDescription: Astro A50 Chat
";

    #[test]
    fn test_parse_sinks_classifies_and_flags_availability() {
        let sinks = parse_sinks(SINKS_OUTPUT, HEADSET_SINK);
        assert_eq!(sinks.len(), 3);

        let hdmi = &sinks[0];
        assert_eq!(hdmi.category, DeviceCategory::Hdmi);
        assert!(!hdmi.available, "no display attached");

        let speaker = &sinks[1];
        assert_eq!(speaker.category, DeviceCategory::Internal);
        assert!(speaker.available);

        let headset = &sinks[2];
        assert_eq!(headset.category, DeviceCategory::Headset);
        assert!(headset.available);
    }

    #[test]
    fn test_hdmi_with_display_is_available() {
        let sinks = parse_sinks(SINKS_HDMI_CONNECTED, HEADSET_SINK);
        assert_eq!(sinks.len(), 1);
        assert_eq!(sinks[0].category, DeviceCategory::Hdmi);
        assert!(sinks[0].available);
    }

    #[test]
    fn test_parse_sinks_empty_output() {
        assert!(parse_sinks("", HEADSET_SINK).is_empty());
    }

    #[test]
    fn test_parse_sources_drops_monitors() {
        let sources = parse_sources(SOURCES_OUTPUT, HEADSET_SOURCE);
        let ids: Vec<&str> = sources.iter().map(|d| d.id.as_str()).collect();
        assert!(!ids.iter().any(|id| id.contains(".monitor")));
        assert_eq!(sources.len(), 3);
    }

    #[test]
    fn test_parse_sources_classifies() {
        let sources = parse_sources(SOURCES_OUTPUT, HEADSET_SOURCE);

        assert_eq!(sources[0].category, DeviceCategory::Internal); // Mic1
        assert_eq!(sources[1].category, DeviceCategory::External); // Mic2
        assert_eq!(sources[2].category, DeviceCategory::Headset);
    }

    #[test]
    fn test_classify_sink_patterns() {
        assert_eq!(classify_sink(HEADSET_SINK, HEADSET_SINK), DeviceCategory::Headset);
        assert_eq!(
            classify_sink("alsa_output.pci-0000_00_1f.3.hdmi-stereo", HEADSET_SINK),
            DeviceCategory::Hdmi
        );
        assert_eq!(
            classify_sink("alsa_output.pci-0000_00_1f.3.analog-stereo", HEADSET_SINK),
            DeviceCategory::Internal
        );
        assert_eq!(
            classify_sink("alsa_output.usb-SomeOther_Device-00.stereo", HEADSET_SINK),
            DeviceCategory::External
        );
    }

    #[test]
    fn test_classify_source_patterns() {
        assert_eq!(
            classify_source(HEADSET_SOURCE, HEADSET_SOURCE),
            Some(DeviceCategory::Headset)
        );
        assert_eq!(classify_source("something.monitor", HEADSET_SOURCE), None);
        assert_eq!(
            classify_source("alsa_input.usb-Webcam_C920-02.analog-stereo", HEADSET_SOURCE),
            None
        );
        assert_eq!(
            classify_source("alsa_input.pci-0000.HiFi__Mic1__source", HEADSET_SOURCE),
            Some(DeviceCategory::Internal)
        );
        assert_eq!(
            classify_source("alsa_input.pci-0000.HiFi__Mic2__source", HEADSET_SOURCE),
            Some(DeviceCategory::External)
        );
    }

    #[test]
    fn test_port_availability_regexes() {
        assert!(RE_PORT_UNAVAILABLE.is_match("(type: HDMI, priority: 500, not available)"));
        assert!(RE_PORT_UNAVAILABLE.is_match("Port: HDMI Output (available: no)"));
        assert!(RE_PORT_AVAILABLE.is_match("(type: HDMI, priority: 500, available)"));
        assert!(RE_PORT_AVAILABLE.is_match("Port: HDMI Output (available: yes)"));
        // Check order matters: the unavailable form also matches the
        // available regex, so callers must test unavailable first.
        assert!(RE_PORT_AVAILABLE.is_match("not available)"));
    }
}
