//! Core data types for power sequencing

use cs_error::CamseqError;
use cs_hw::{HwWiring, OwnerKind, PinLevel, PowerPin, SensorSlot};
use serde::{Deserialize, Serialize};

use crate::constants::seq;
use crate::data::sequences;

/// Requested power state for a transition
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    On,
    Off,
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerState::On => write!(f, "on"),
            PowerState::Off => write!(f, "off"),
        }
    }
}

/// One step of a power sequence
///
/// Step order is semantic: power-on replays a sequence forward, power-off
/// replays the same steps backward with the `off` level.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PowerStep {
    pub pin: PowerPin,
    pub on: PinLevel,
    /// Level driven during the reverse (power-off) replay; `Low` unless the
    /// sequence says otherwise.
    #[serde(default)]
    pub off: PinLevel,
    /// Settle delay in milliseconds. On power-on the delay follows the pin
    /// assertion; on power-off it precedes it.
    #[serde(default)]
    pub delay_ms: u32,
}

impl PowerStep {
    pub fn new(pin: PowerPin, on: PinLevel, delay_ms: u32) -> Self {
        Self {
            pin,
            on,
            off: PinLevel::Low,
            delay_ms,
        }
    }

    pub fn with_off(mut self, off: PinLevel) -> Self {
        self.off = off;
        self
    }
}

/// A named, ordered power sequence
///
/// Device-table entries are keyed by sensor driver name. Platform-table
/// entries carry [`seq::PLATFORM_SEQ_NAME`] and are matched by `slot`
/// instead of by name.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PowerSequence {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<SensorSlot>,
    pub steps: Vec<PowerStep>,
}

impl PowerSequence {
    /// Sequence for a specific sensor driver
    pub fn for_driver(name: impl Into<String>, steps: Vec<PowerStep>) -> Self {
        Self {
            name: name.into(),
            slot: None,
            steps,
        }
    }

    /// Platform-level sequence for a slot (board rails shared across sensors)
    pub fn platform(slot: SensorSlot, steps: Vec<PowerStep>) -> Self {
        Self {
            name: seq::PLATFORM_SEQ_NAME.to_string(),
            slot: Some(slot),
            steps,
        }
    }
}

/// Assignment of one pin to the backend that drives it
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PinAssignment {
    pub pin: PowerPin,
    pub owner: OwnerKind,
}

/// Per-slot board configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SlotConfig {
    pub slot: SensorSlot,
    pub pins: Vec<PinAssignment>,
    /// Comma-joined driver names allowed on this slot. Empty/absent means
    /// any driver may power the slot; matching is by substring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_list: Option<String>,
}

/// Full board profile: wiring, pin ownership, enable lists, and sequence
/// tables. Loaded from JSON or built from compiled-in defaults. Fields a
/// profile file omits fall back to the built-in tables; an explicit empty
/// list clears them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BoardProfile {
    #[serde(default = "sequences::default_slot_configs")]
    pub slots: Vec<SlotConfig>,
    #[serde(default)]
    pub wiring: HwWiring,
    #[serde(default)]
    pub platform_sequences: Vec<PowerSequence>,
    #[serde(default = "sequences::default_sensor_sequences")]
    pub sensor_sequences: Vec<PowerSequence>,
}

impl Default for BoardProfile {
    fn default() -> Self {
        Self {
            slots: sequences::default_slot_configs(),
            wiring: HwWiring::default(),
            platform_sequences: sequences::default_platform_sequences(),
            sensor_sequences: sequences::default_sensor_sequences(),
        }
    }
}

impl BoardProfile {
    pub fn slot_config(&self, slot: SensorSlot) -> Option<&SlotConfig> {
        self.slots.iter().find(|c| c.slot == slot)
    }
}

/// Outcome of one `power()` transition
///
/// Both table passes are attempted best-effort; callers that care about
/// partial success inspect both results. A missing platform entry is the
/// normal case on boards without shared rails.
#[derive(Debug)]
pub struct PowerReport {
    pub state: PowerState,
    /// Platform-table pass: number of pin assertions made, or why none were
    pub platform: Result<usize, CamseqError>,
    /// Device-table pass, keyed by the driver name
    pub device: Result<usize, CamseqError>,
}

impl PowerReport {
    /// Total pin assertions made across both passes
    pub fn set_calls(&self) -> usize {
        self.platform.as_ref().copied().unwrap_or(0) + self.device.as_ref().copied().unwrap_or(0)
    }

    /// True when the device-table pass applied its sequence
    pub fn device_applied(&self) -> bool {
        self.device.is_ok()
    }
}
