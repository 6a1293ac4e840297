//! Priority-based device selection.
//!
//! Pure policy: given the debounced headset state and one snapshot of
//! available devices, pick the default output and input. No I/O, no history
//! beyond what [`HeadsetState`] already encodes, so repeated calls with an
//! unchanged snapshot always reproduce the same decision.

use thiserror::Error;

use crate::device::{AudioDevice, DeviceCategory, Direction};
use crate::reading::HeadsetState;

/// Output priority, highest first. Headset is only eligible while the
/// headset is active; HDMI only with an attached display (port availability).
const OUTPUT_PRIORITY: &[DeviceCategory] =
    &[DeviceCategory::Headset, DeviceCategory::Hdmi, DeviceCategory::Internal];

/// Input priority, highest first: headset mic, then the internal mic array,
/// then an external analog mic.
const INPUT_PRIORITY: &[DeviceCategory] =
    &[DeviceCategory::Headset, DeviceCategory::Internal, DeviceCategory::External];

/// No device in the snapshot matched any eligible category for a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no eligible {direction:?} device available")]
pub struct NoEligibleDevice {
    pub direction: Direction,
}

/// The (output, input) pair chosen for one decision cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    pub output: AudioDevice,
    pub input: AudioDevice,
}

/// Select default devices for both directions.
///
/// # Errors
/// Returns [`NoEligibleDevice`] for the first direction that cannot be
/// filled; the caller must not apply a partial decision.
pub fn select(
    state: HeadsetState,
    devices: &[AudioDevice],
) -> Result<RoutingDecision, NoEligibleDevice> {
    let output = select_direction(state, Direction::Output, devices)
        .ok_or(NoEligibleDevice { direction: Direction::Output })?;
    let input = select_direction(state, Direction::Input, devices)
        .ok_or(NoEligibleDevice { direction: Direction::Input })?;
    Ok(RoutingDecision { output: output.clone(), input: input.clone() })
}

/// Walk the priority list for one direction; the first category with at
/// least one eligible device wins. Ties inside a category break to the
/// lowest id so the choice is deterministic.
fn select_direction(
    state: HeadsetState,
    direction: Direction,
    devices: &[AudioDevice],
) -> Option<&AudioDevice> {
    let priority = match direction {
        Direction::Output => OUTPUT_PRIORITY,
        Direction::Input => INPUT_PRIORITY,
    };

    for &category in priority {
        if category == DeviceCategory::Headset && state != HeadsetState::Active {
            continue;
        }
        let winner = devices
            .iter()
            .filter(|d| {
                d.direction == direction && d.category == category && d.available
            })
            .min_by(|a, b| a.id.cmp(&b.id));
        if winner.is_some() {
            return winner;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev(
        id: &str,
        direction: Direction,
        category: DeviceCategory,
        available: bool,
    ) -> AudioDevice {
        AudioDevice { id: id.to_string(), direction, category, available }
    }

    fn headset_out() -> AudioDevice {
        dev("a50-game", Direction::Output, DeviceCategory::Headset, true)
    }

    fn headset_in() -> AudioDevice {
        dev("a50-chat", Direction::Input, DeviceCategory::Headset, true)
    }

    fn hdmi_out(available: bool) -> AudioDevice {
        dev("hdmi1", Direction::Output, DeviceCategory::Hdmi, available)
    }

    fn internal_out() -> AudioDevice {
        dev("speaker", Direction::Output, DeviceCategory::Internal, true)
    }

    fn internal_in() -> AudioDevice {
        dev("mic-array", Direction::Input, DeviceCategory::Internal, true)
    }

    fn external_in() -> AudioDevice {
        dev("jack-mic", Direction::Input, DeviceCategory::External, true)
    }

    #[test]
    fn test_active_prefers_headset_both_directions() {
        let devices = vec![
            internal_out(),
            hdmi_out(true),
            headset_out(),
            external_in(),
            internal_in(),
            headset_in(),
        ];
        let decision = select(HeadsetState::Active, &devices).unwrap();
        assert_eq!(decision.output.id, "a50-game");
        assert_eq!(decision.input.id, "a50-chat");
    }

    #[test]
    fn test_inactive_ignores_headset_devices() {
        let devices = vec![headset_out(), internal_out(), headset_in(), internal_in()];
        let decision = select(HeadsetState::Inactive, &devices).unwrap();
        assert_eq!(decision.output.id, "speaker");
        assert_eq!(decision.input.id, "mic-array");
    }

    #[test]
    fn test_per_direction_independent_fallback() {
        // HDMI output present, internal input only: (HDMI, internal).
        let devices = vec![hdmi_out(true), internal_out(), internal_in()];
        let decision = select(HeadsetState::Inactive, &devices).unwrap();
        assert_eq!(decision.output.id, "hdmi1");
        assert_eq!(decision.input.id, "mic-array");
    }

    #[test]
    fn test_hdmi_without_display_is_skipped() {
        let devices = vec![hdmi_out(false), internal_out(), internal_in()];
        let decision = select(HeadsetState::Inactive, &devices).unwrap();
        assert_eq!(decision.output.id, "speaker");
    }

    #[test]
    fn test_input_falls_back_to_external() {
        let devices = vec![internal_out(), external_in()];
        let decision = select(HeadsetState::Inactive, &devices).unwrap();
        assert_eq!(decision.input.id, "jack-mic");
    }

    #[test]
    fn test_internal_input_beats_external() {
        let devices = vec![internal_out(), external_in(), internal_in()];
        let decision = select(HeadsetState::Inactive, &devices).unwrap();
        assert_eq!(decision.input.id, "mic-array");
    }

    #[test]
    fn test_empty_snapshot_is_no_eligible_device() {
        let err = select(HeadsetState::Active, &[]).unwrap_err();
        assert_eq!(err.direction, Direction::Output);

        let err = select(HeadsetState::Inactive, &[]).unwrap_err();
        assert_eq!(err.direction, Direction::Output);
    }

    #[test]
    fn test_missing_input_reports_input_direction() {
        let devices = vec![internal_out()];
        let err = select(HeadsetState::Inactive, &devices).unwrap_err();
        assert_eq!(err.direction, Direction::Input);
    }

    #[test]
    fn test_tie_break_is_lowest_id() {
        let devices = vec![
            dev("hdmi2", Direction::Output, DeviceCategory::Hdmi, true),
            dev("hdmi1", Direction::Output, DeviceCategory::Hdmi, true),
            internal_in(),
        ];
        let decision = select(HeadsetState::Inactive, &devices).unwrap();
        assert_eq!(decision.output.id, "hdmi1");

        // Same snapshot, same answer.
        let again = select(HeadsetState::Inactive, &devices).unwrap();
        assert_eq!(decision, again);
    }

    #[test]
    fn test_active_without_headset_device_falls_back() {
        // State says active but the headset sink has not enumerated yet.
        let devices = vec![hdmi_out(true), internal_out(), internal_in()];
        let decision = select(HeadsetState::Active, &devices).unwrap();
        assert_eq!(decision.output.id, "hdmi1");
    }
}
