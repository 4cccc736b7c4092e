//! Power-sequence walker
//!
//! Drives a named power sequence to the ON or OFF state for one sensor
//! slot. Power-on replays the sequence forward, asserting each pin and then
//! sleeping its settle delay; power-off replays the same steps backward,
//! sleeping each step's delay *before* re-driving the pin to its off level.
//! The off-side delay-before-assert ordering lets lines settle before they
//! are re-driven; several sensor datasheets require it, so it must not be
//! "normalized" to match the on-side ordering.
//!
//! Pins are resolved to owners once, when the hal is built. A pin without a
//! bound owner is not an error: the step is skipped in both directions,
//! which models optional pins that a given board variant does not populate.

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use cs_hw::{OwnerKind, PinOwner, PowerPin, SensorSlot};

use crate::constants::seq;
use crate::data::{
    validate_board_profile, BoardProfile, PowerReport, PowerSequence, PowerState, PowerStep,
};
use crate::engine::delay::{Delay, ThreadDelay};
use crate::error::{CamseqError, Result};

/// Which sequence table an `apply` call walks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceTable {
    /// Board-level rails shared across sensors, keyed by slot
    Platform,
    /// Sensor-specific wiring, keyed by driver name
    Device,
}

/// Per-slot pin-to-owner bindings, resolved once at init
#[derive(Debug, Clone)]
struct SlotBinding {
    owner_by_pin: [Option<usize>; PowerPin::COUNT],
}

impl SlotBinding {
    fn unbound() -> Self {
        Self {
            owner_by_pin: [None; PowerPin::COUNT],
        }
    }

    fn owner_for(&self, pin: PowerPin) -> Option<usize> {
        self.owner_by_pin[pin.index()]
    }
}

/// The sensor power hal: registered owners, resolved bindings, and the
/// active sequence tables
pub struct PowerHal {
    owners: Vec<Mutex<Box<dyn PinOwner>>>,
    bindings: Vec<SlotBinding>,
    enable_lists: Vec<Option<String>>,
    platform_sequences: Vec<PowerSequence>,
    sensor_sequences: Vec<PowerSequence>,
    delay: Box<dyn Delay>,
}

impl PowerHal {
    /// Build a hal from a board profile and a set of opened owners
    pub fn new(profile: BoardProfile, owners: Vec<Box<dyn PinOwner>>) -> Result<Self> {
        Self::with_delay(profile, owners, Box::new(ThreadDelay))
    }

    /// Like [`PowerHal::new`] with an explicit delay primitive
    pub fn with_delay(
        profile: BoardProfile,
        mut owners: Vec<Box<dyn PinOwner>>,
        delay: Box<dyn Delay>,
    ) -> Result<Self> {
        validate_board_profile(&profile)?;

        for owner in &mut owners {
            owner.init(&profile.wiring)?;
        }

        let mut bindings = vec![SlotBinding::unbound(); SensorSlot::COUNT];
        let mut enable_lists: Vec<Option<String>> = vec![None; SensorSlot::COUNT];

        for config in &profile.slots {
            let binding = &mut bindings[config.slot.index()];
            for assignment in &config.pins {
                let owner_index = owners.iter().position(|o| o.kind() == assignment.owner);
                if owner_index.is_none() {
                    debug!(
                        "no {} owner registered; pin {} on slot {} stays unbound",
                        assignment.owner, assignment.pin, config.slot
                    );
                }
                binding.owner_by_pin[assignment.pin.index()] = owner_index;
            }
            enable_lists[config.slot.index()] = config.enable_list.clone();
        }

        Ok(Self {
            owners: owners.into_iter().map(Mutex::new).collect(),
            bindings,
            enable_lists,
            platform_sequences: profile.platform_sequences,
            sensor_sequences: profile.sensor_sequences,
            delay,
        })
    }

    /// Drive a full power transition for one sensor
    ///
    /// Checks the slot's enable list, then applies the platform table
    /// (selector: decimal slot index) followed by the device table
    /// (selector: driver name). The two passes are best-effort: a missing
    /// platform entry never blocks the device pass, and both outcomes are
    /// returned for callers that care about partial success.
    pub fn power(
        &self,
        slot: SensorSlot,
        driver_name: &str,
        state: PowerState,
    ) -> Result<PowerReport> {
        let enable_list = self.enable_lists[slot.index()].as_deref();
        info!(
            "power {}: slot {} driver {} (enable list: {})",
            state,
            slot,
            driver_name,
            enable_list.unwrap_or("any")
        );

        if let Some(list) = enable_list {
            if !list.is_empty() && !list.contains(driver_name) {
                return Err(CamseqError::SensorNotAllowed {
                    slot: slot.to_string(),
                    driver: driver_name.to_string(),
                    enable_list: list.to_string(),
                });
            }
        }

        let platform = self.apply(
            SequenceTable::Platform,
            slot,
            state,
            &slot.index().to_string(),
        );
        if let Err(e) = &platform {
            // Boards without shared rails have no platform entry; only a
            // lookup miss is routine.
            if e.is_sequence_not_found() {
                debug!("no platform sequence for slot {}", slot);
            } else {
                warn!("platform sequence for slot {} failed: {}", slot, e);
            }
        }

        let device = self.apply(SequenceTable::Device, slot, state, driver_name);
        if let Err(e) = &device {
            warn!("device sequence for {} failed: {}", driver_name, e);
        }

        Ok(PowerReport {
            state,
            platform,
            device,
        })
    }

    /// Apply one sequence table for a slot
    ///
    /// Returns the number of pin assertions attempted, or
    /// `SequenceNotFound` if no entry matches the selector.
    pub fn apply(
        &self,
        table: SequenceTable,
        slot: SensorSlot,
        state: PowerState,
        selector: &str,
    ) -> Result<usize> {
        let sequences = match table {
            SequenceTable::Platform => &self.platform_sequences,
            SequenceTable::Device => &self.sensor_sequences,
        };
        let sequence = self.lookup(sequences, slot, selector)?;
        let steps = &sequence.steps[..sequence.steps.len().min(seq::MAX_STEPS_PER_SEQUENCE)];
        let binding = &self.bindings[slot.index()];

        let count = match state {
            PowerState::On => self.walk_on(slot, steps, binding),
            PowerState::Off => self.walk_off(slot, steps, binding),
        };
        Ok(count)
    }

    fn lookup<'a>(
        &self,
        sequences: &'a [PowerSequence],
        slot: SensorSlot,
        selector: &str,
    ) -> Result<&'a PowerSequence> {
        sequences
            .iter()
            .take(seq::MAX_SEQUENCE_ENTRIES)
            .find(|sequence| {
                if sequence.name == seq::PLATFORM_SEQ_NAME {
                    sequence.slot == Some(slot)
                } else {
                    sequence.name == selector
                }
            })
            .ok_or_else(|| CamseqError::SequenceNotFound {
                selector: selector.to_string(),
                slot: slot.to_string(),
            })
    }

    fn walk_on(&self, slot: SensorSlot, steps: &[PowerStep], binding: &SlotBinding) -> usize {
        let mut count = 0;
        for step in steps {
            if step.pin == PowerPin::Undef {
                continue;
            }
            let Some(owner_index) = binding.owner_for(step.pin) else {
                debug!("power on: slot {} pin {} unbound, skipping", slot, step.pin);
                continue;
            };

            debug!(
                "power on: slot {} pin {} -> {} (settle {} ms after)",
                slot, step.pin, step.on, step.delay_ms
            );
            if let Err(e) = self.owners[owner_index].lock().set(slot, step.pin, step.on) {
                warn!("power on: failed to drive {} on slot {}: {}", step.pin, slot, e);
            }
            count += 1;
            if step.delay_ms > 0 {
                self.delay.sleep_ms(step.delay_ms);
            }
        }
        count
    }

    fn walk_off(&self, slot: SensorSlot, steps: &[PowerStep], binding: &SlotBinding) -> usize {
        let mut count = 0;
        for step in steps.iter().rev() {
            if step.pin == PowerPin::Undef {
                continue;
            }
            let Some(owner_index) = binding.owner_for(step.pin) else {
                debug!(
                    "power off: slot {} pin {} unbound, skipping",
                    slot, step.pin
                );
                continue;
            };

            if step.delay_ms > 0 {
                self.delay.sleep_ms(step.delay_ms);
            }
            debug!(
                "power off: slot {} pin {} -> {} (settled {} ms before)",
                slot, step.pin, step.off, step.delay_ms
            );
            if let Err(e) = self.owners[owner_index].lock().set(slot, step.pin, step.off) {
                warn!(
                    "power off: failed to drive {} on slot {}: {}",
                    step.pin, slot, e
                );
            }
            count += 1;
        }
        count
    }

    /// Owner kind bound to a pin of a slot, if any
    pub fn bound_owner(&self, slot: SensorSlot, pin: PowerPin) -> Option<OwnerKind> {
        self.bindings[slot.index()]
            .owner_for(pin)
            .map(|i| self.owners[i].lock().kind())
    }

    /// Enable list configured for a slot, if any
    pub fn enable_list(&self, slot: SensorSlot) -> Option<&str> {
        self.enable_lists[slot.index()].as_deref()
    }

    /// Active device-table sequences
    pub fn sensor_sequences(&self) -> &[PowerSequence] {
        &self.sensor_sequences
    }

    /// Active platform-table sequences
    pub fn platform_sequences(&self) -> &[PowerSequence] {
        &self.platform_sequences
    }

    /// Release every registered owner's hardware resources
    pub fn release_all(&self) {
        for owner in &self.owners {
            owner.lock().release();
        }
    }

    /// Log every registered owner's current state
    pub fn dump_all(&self) {
        for owner in &self.owners {
            owner.lock().dump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cs_hw::{HwWiring, PinLevel};

    use crate::data::{PinAssignment, PowerStep, SlotConfig};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Set(OwnerKind, PowerPin, PinLevel),
        Sleep(u32),
        Released(OwnerKind),
    }

    struct RecordingOwner {
        kind: OwnerKind,
        events: Arc<Mutex<Vec<Event>>>,
        fail_on: Option<PowerPin>,
    }

    impl PinOwner for RecordingOwner {
        fn kind(&self) -> OwnerKind {
            self.kind
        }

        fn init(&mut self, _wiring: &HwWiring) -> cs_hw::Result<()> {
            Ok(())
        }

        fn set(
            &mut self,
            _slot: SensorSlot,
            pin: PowerPin,
            level: PinLevel,
        ) -> cs_hw::Result<()> {
            self.events.lock().push(Event::Set(self.kind, pin, level));
            if self.fail_on == Some(pin) {
                return Err(CamseqError::pin_write("main", pin.to_string(), "boom"));
            }
            Ok(())
        }

        fn release(&mut self) {
            self.events.lock().push(Event::Released(self.kind));
        }

        fn dump(&self) {}
    }

    struct RecordingDelay {
        events: Arc<Mutex<Vec<Event>>>,
    }

    impl Delay for RecordingDelay {
        fn sleep_ms(&self, ms: u32) {
            self.events.lock().push(Event::Sleep(ms));
        }
    }

    fn example_sequence() -> PowerSequence {
        PowerSequence::for_driver(
            "testcam_mipi_raw",
            vec![
                PowerStep::new(PowerPin::Rst, PinLevel::Low, 1),
                PowerStep::new(PowerPin::Dovdd, PinLevel::V1800, 0),
                PowerStep::new(PowerPin::Mclk, PinLevel::High, 0),
                PowerStep::new(PowerPin::Rst, PinLevel::High, 5),
            ],
        )
    }

    fn main_slot_config() -> SlotConfig {
        SlotConfig {
            slot: SensorSlot::Main,
            pins: vec![
                PinAssignment {
                    pin: PowerPin::Rst,
                    owner: OwnerKind::Gpio,
                },
                PinAssignment {
                    pin: PowerPin::Dovdd,
                    owner: OwnerKind::Regulator,
                },
                PinAssignment {
                    pin: PowerPin::Mclk,
                    owner: OwnerKind::Mclk,
                },
            ],
            enable_list: None,
        }
    }

    fn example_profile() -> BoardProfile {
        BoardProfile {
            slots: vec![main_slot_config()],
            wiring: HwWiring::default(),
            platform_sequences: Vec::new(),
            sensor_sequences: vec![example_sequence()],
        }
    }

    fn recording_hal(profile: BoardProfile) -> (PowerHal, Arc<Mutex<Vec<Event>>>) {
        recording_hal_with(profile, None)
    }

    fn recording_hal_with(
        profile: BoardProfile,
        fail_on: Option<PowerPin>,
    ) -> (PowerHal, Arc<Mutex<Vec<Event>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let owners: Vec<Box<dyn PinOwner>> = vec![
            Box::new(RecordingOwner {
                kind: OwnerKind::Mclk,
                events: events.clone(),
                fail_on: None,
            }),
            Box::new(RecordingOwner {
                kind: OwnerKind::Regulator,
                events: events.clone(),
                fail_on,
            }),
            Box::new(RecordingOwner {
                kind: OwnerKind::Gpio,
                events: events.clone(),
                fail_on: None,
            }),
        ];
        let delay = Box::new(RecordingDelay {
            events: events.clone(),
        });
        let hal = PowerHal::with_delay(profile, owners, delay).unwrap();
        (hal, events)
    }

    #[test]
    fn lookup_miss_returns_not_found() {
        let (hal, events) = recording_hal(example_profile());
        let err = hal
            .apply(
                SequenceTable::Device,
                SensorSlot::Main,
                PowerState::On,
                "unknown_mipi_raw",
            )
            .unwrap_err();
        assert!(err.is_sequence_not_found());
        assert!(events.lock().is_empty());
    }

    #[test]
    fn power_on_asserts_forward_with_delay_after_set() {
        let (hal, events) = recording_hal(example_profile());
        let count = hal
            .apply(
                SequenceTable::Device,
                SensorSlot::Main,
                PowerState::On,
                "testcam_mipi_raw",
            )
            .unwrap();
        assert_eq!(count, 4);
        assert_eq!(
            *events.lock(),
            vec![
                Event::Set(OwnerKind::Gpio, PowerPin::Rst, PinLevel::Low),
                Event::Sleep(1),
                Event::Set(OwnerKind::Regulator, PowerPin::Dovdd, PinLevel::V1800),
                Event::Set(OwnerKind::Mclk, PowerPin::Mclk, PinLevel::High),
                Event::Set(OwnerKind::Gpio, PowerPin::Rst, PinLevel::High),
                Event::Sleep(5),
            ]
        );
    }

    #[test]
    fn power_off_reverses_with_delay_before_set() {
        let (hal, events) = recording_hal(example_profile());
        let count = hal
            .apply(
                SequenceTable::Device,
                SensorSlot::Main,
                PowerState::Off,
                "testcam_mipi_raw",
            )
            .unwrap();
        assert_eq!(count, 4);
        assert_eq!(
            *events.lock(),
            vec![
                Event::Sleep(5),
                Event::Set(OwnerKind::Gpio, PowerPin::Rst, PinLevel::Low),
                Event::Set(OwnerKind::Mclk, PowerPin::Mclk, PinLevel::Low),
                Event::Set(OwnerKind::Regulator, PowerPin::Dovdd, PinLevel::Low),
                Event::Sleep(1),
                Event::Set(OwnerKind::Gpio, PowerPin::Rst, PinLevel::Low),
            ]
        );
    }

    #[test]
    fn unbound_pin_is_skipped_in_both_directions() {
        let mut profile = example_profile();
        // Dovdd loses its owner assignment: the step stays in the sequence
        // but must not produce a set or a sleep.
        profile.slots[0].pins.retain(|a| a.pin != PowerPin::Dovdd);
        let (hal, events) = recording_hal(profile);

        let count = hal
            .apply(
                SequenceTable::Device,
                SensorSlot::Main,
                PowerState::On,
                "testcam_mipi_raw",
            )
            .unwrap();
        assert_eq!(count, 3);
        let on_events = events.lock().clone();
        assert!(!on_events
            .iter()
            .any(|e| matches!(e, Event::Set(_, PowerPin::Dovdd, _))));

        events.lock().clear();
        let count = hal
            .apply(
                SequenceTable::Device,
                SensorSlot::Main,
                PowerState::Off,
                "testcam_mipi_raw",
            )
            .unwrap();
        assert_eq!(count, 3);
        assert!(!events
            .lock()
            .iter()
            .any(|e| matches!(e, Event::Set(_, PowerPin::Dovdd, _))));
    }

    #[test]
    fn undef_step_is_skipped_but_iteration_continues() {
        let mut profile = example_profile();
        profile.sensor_sequences[0]
            .steps
            .insert(2, PowerStep::new(PowerPin::Undef, PinLevel::High, 100));
        let (hal, events) = recording_hal(profile);

        let count = hal
            .apply(
                SequenceTable::Device,
                SensorSlot::Main,
                PowerState::On,
                "testcam_mipi_raw",
            )
            .unwrap();
        assert_eq!(count, 4);
        assert!(!events.lock().contains(&Event::Sleep(100)));
        // the steps after the placeholder still ran
        assert!(events
            .lock()
            .contains(&Event::Set(OwnerKind::Gpio, PowerPin::Rst, PinLevel::High)));
    }

    #[test]
    fn enable_list_blocks_mismatched_driver() {
        let mut profile = example_profile();
        profile.slots[0].enable_list = Some("s5kjn1_mipi_raw".to_string());
        let (hal, events) = recording_hal(profile);

        let err = hal
            .power(SensorSlot::Main, "testcam_mipi_raw", PowerState::On)
            .unwrap_err();
        assert!(matches!(err, CamseqError::SensorNotAllowed { .. }));
        assert!(events.lock().is_empty());
    }

    #[test]
    fn enable_list_matches_by_substring() {
        let mut profile = example_profile();
        profile.slots[0].enable_list =
            Some("s5kjn1_mipi_raw,testcam_mipi_raw".to_string());
        let (hal, _events) = recording_hal(profile);

        let report = hal
            .power(SensorSlot::Main, "testcam_mipi_raw", PowerState::On)
            .unwrap();
        assert!(report.device_applied());
        assert_eq!(report.set_calls(), 4);
    }

    #[test]
    fn platform_pass_runs_before_device_pass() {
        let mut profile = example_profile();
        profile.platform_sequences = vec![PowerSequence::platform(
            SensorSlot::Main,
            vec![PowerStep::new(PowerPin::Mclk, PinLevel::High, 0)],
        )];
        let (hal, events) = recording_hal(profile);

        let report = hal
            .power(SensorSlot::Main, "testcam_mipi_raw", PowerState::On)
            .unwrap();
        assert!(report.platform.is_ok());
        assert_eq!(report.set_calls(), 5);
        assert_eq!(
            events.lock().first(),
            Some(&Event::Set(OwnerKind::Mclk, PowerPin::Mclk, PinLevel::High))
        );
    }

    #[test]
    fn platform_miss_does_not_block_device_pass() {
        let (hal, _events) = recording_hal(example_profile());
        let report = hal
            .power(SensorSlot::Main, "testcam_mipi_raw", PowerState::On)
            .unwrap();
        assert!(report.platform.is_err());
        assert!(report.device_applied());
        assert_eq!(report.set_calls(), 4);
    }

    #[test]
    fn platform_entry_for_other_slot_does_not_match() {
        let mut profile = example_profile();
        profile.platform_sequences = vec![PowerSequence::platform(
            SensorSlot::Sub,
            vec![PowerStep::new(PowerPin::Mclk, PinLevel::High, 0)],
        )];
        let (hal, _events) = recording_hal(profile);

        let err = hal
            .apply(SequenceTable::Platform, SensorSlot::Main, PowerState::On, "0")
            .unwrap_err();
        assert!(err.is_sequence_not_found());
    }

    #[test]
    fn set_failure_does_not_stop_the_walk() {
        let (hal, events) = recording_hal_with(example_profile(), Some(PowerPin::Dovdd));
        let count = hal
            .apply(
                SequenceTable::Device,
                SensorSlot::Main,
                PowerState::On,
                "testcam_mipi_raw",
            )
            .unwrap();
        assert_eq!(count, 4);
        // the failing rail was attempted and the rest of the sequence ran
        assert!(events
            .lock()
            .contains(&Event::Set(OwnerKind::Gpio, PowerPin::Rst, PinLevel::High)));
    }

    #[test]
    fn missing_owner_kind_leaves_pins_unbound() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let owners: Vec<Box<dyn PinOwner>> = vec![Box::new(RecordingOwner {
            kind: OwnerKind::Gpio,
            events: events.clone(),
            fail_on: None,
        })];
        let delay = Box::new(RecordingDelay {
            events: events.clone(),
        });
        let hal = PowerHal::with_delay(example_profile(), owners, delay).unwrap();

        assert_eq!(
            hal.bound_owner(SensorSlot::Main, PowerPin::Rst),
            Some(OwnerKind::Gpio)
        );
        assert_eq!(hal.bound_owner(SensorSlot::Main, PowerPin::Dovdd), None);
        assert_eq!(hal.bound_owner(SensorSlot::Main, PowerPin::Mclk), None);

        let count = hal
            .apply(
                SequenceTable::Device,
                SensorSlot::Main,
                PowerState::On,
                "testcam_mipi_raw",
            )
            .unwrap();
        assert_eq!(count, 2); // both RST steps; DOVDD and MCLK skipped
    }

    #[test]
    fn release_all_reaches_every_owner() {
        let (hal, events) = recording_hal(example_profile());
        hal.release_all();
        assert_eq!(
            *events.lock(),
            vec![
                Event::Released(OwnerKind::Mclk),
                Event::Released(OwnerKind::Regulator),
                Event::Released(OwnerKind::Gpio),
            ]
        );
    }
}
