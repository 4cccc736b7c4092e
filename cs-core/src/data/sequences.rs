//! Built-in board defaults: pin assignments and per-driver power sequences
//!
//! These tables cover the reference board. A board profile may override any
//! of them; the defaults are used when no profile file is present.

use cs_hw::{OwnerKind, PinLevel, PowerPin, SensorSlot};

use crate::data::types::{PinAssignment, PowerSequence, PowerStep, SlotConfig};

fn assign(pin: PowerPin, owner: OwnerKind) -> PinAssignment {
    PinAssignment { pin, owner }
}

/// Default pin-to-owner assignments for the populated slots
pub fn default_slot_configs() -> Vec<SlotConfig> {
    vec![
        SlotConfig {
            slot: SensorSlot::Main,
            pins: vec![
                assign(PowerPin::Mclk, OwnerKind::Mclk),
                assign(PowerPin::Avdd, OwnerKind::Regulator),
                assign(PowerPin::Dovdd, OwnerKind::Regulator),
                assign(PowerPin::Dvdd, OwnerKind::Regulator),
                assign(PowerPin::Afvdd, OwnerKind::Regulator),
                assign(PowerPin::Rst, OwnerKind::Gpio),
            ],
            enable_list: None,
        },
        SlotConfig {
            slot: SensorSlot::Sub,
            pins: vec![
                assign(PowerPin::Mclk, OwnerKind::Mclk),
                assign(PowerPin::Avdd, OwnerKind::Regulator),
                assign(PowerPin::Dovdd, OwnerKind::Regulator),
                assign(PowerPin::Dvdd, OwnerKind::Regulator),
                assign(PowerPin::Dvdd1, OwnerKind::Regulator),
                assign(PowerPin::Rst, OwnerKind::Gpio),
            ],
            enable_list: None,
        },
        SlotConfig {
            slot: SensorSlot::Main2,
            pins: vec![
                assign(PowerPin::Mclk, OwnerKind::Mclk),
                assign(PowerPin::Avdd, OwnerKind::Regulator),
                assign(PowerPin::Dovdd, OwnerKind::Regulator),
                assign(PowerPin::Dvdd, OwnerKind::Regulator),
                assign(PowerPin::Rst, OwnerKind::Gpio),
            ],
            enable_list: None,
        },
        SlotConfig {
            slot: SensorSlot::Sub2,
            pins: vec![
                assign(PowerPin::Mclk, OwnerKind::Mclk),
                assign(PowerPin::Avdd, OwnerKind::Regulator),
                assign(PowerPin::Dovdd, OwnerKind::Regulator),
                assign(PowerPin::Dvdd1, OwnerKind::Regulator),
                assign(PowerPin::Rst, OwnerKind::Gpio),
            ],
            enable_list: None,
        },
    ]
}

/// Default platform-level sequences (none on the reference board; its
/// shared rails are always on)
pub fn default_platform_sequences() -> Vec<PowerSequence> {
    Vec::new()
}

/// Default power-on sequences for the supported sensor drivers
///
/// Step order, levels, and settle delays are the sensor vendors' datasheet
/// bring-up orders. Power-off replays each sequence backward.
pub fn default_sensor_sequences() -> Vec<PowerSequence> {
    vec![
        PowerSequence::for_driver(
            "hi5022q_mipi_raw",
            vec![
                PowerStep::new(PowerPin::Rst, PinLevel::Low, 1),
                PowerStep::new(PowerPin::Dovdd, PinLevel::V1800, 0),
                PowerStep::new(PowerPin::Dvdd, PinLevel::V1100, 0),
                PowerStep::new(PowerPin::Afvdd, PinLevel::V2800, 0),
                PowerStep::new(PowerPin::Avdd, PinLevel::V2800, 0),
                PowerStep::new(PowerPin::Mclk, PinLevel::High, 0),
                PowerStep::new(PowerPin::Rst, PinLevel::High, 5),
            ],
        ),
        PowerSequence::for_driver(
            "s5kjn1_mipi_raw",
            vec![
                PowerStep::new(PowerPin::Rst, PinLevel::Low, 1),
                PowerStep::new(PowerPin::Dovdd, PinLevel::V1800, 1),
                PowerStep::new(PowerPin::Dvdd, PinLevel::V1050, 1),
                PowerStep::new(PowerPin::Afvdd, PinLevel::V2800, 1),
                PowerStep::new(PowerPin::Avdd, PinLevel::V2800, 1),
                PowerStep::new(PowerPin::Mclk, PinLevel::High, 1),
                PowerStep::new(PowerPin::Rst, PinLevel::High, 5),
            ],
        ),
        PowerSequence::for_driver(
            "hi1339_mipi_raw",
            vec![
                PowerStep::new(PowerPin::Rst, PinLevel::Low, 1),
                PowerStep::new(PowerPin::Dovdd, PinLevel::V1800, 0),
                PowerStep::new(PowerPin::Avdd, PinLevel::V2800, 0),
                PowerStep::new(PowerPin::Dvdd, PinLevel::V1100, 0),
                PowerStep::new(PowerPin::Mclk, PinLevel::High, 1),
                PowerStep::new(PowerPin::Rst, PinLevel::High, 2),
            ],
        ),
        PowerSequence::for_driver(
            "gc13a0_mipi_raw",
            vec![
                PowerStep::new(PowerPin::Rst, PinLevel::Low, 1),
                PowerStep::new(PowerPin::Dovdd, PinLevel::V1800, 0),
                PowerStep::new(PowerPin::Avdd, PinLevel::V2800, 0),
                PowerStep::new(PowerPin::Dvdd, PinLevel::V1200, 0),
                PowerStep::new(PowerPin::Dvdd1, PinLevel::V1200, 0),
                PowerStep::new(PowerPin::Mclk, PinLevel::High, 1),
                PowerStep::new(PowerPin::Rst, PinLevel::High, 2),
            ],
        ),
        PowerSequence::for_driver(
            "sc501cs_mipi_raw",
            vec![
                PowerStep::new(PowerPin::Rst, PinLevel::Low, 1),
                PowerStep::new(PowerPin::Dovdd, PinLevel::V1800, 1),
                PowerStep::new(PowerPin::Dvdd, PinLevel::V1200, 1),
                PowerStep::new(PowerPin::Avdd, PinLevel::V2800, 1),
                PowerStep::new(PowerPin::Mclk, PinLevel::High, 1),
                PowerStep::new(PowerPin::Rst, PinLevel::High, 5),
            ],
        ),
        PowerSequence::for_driver(
            "gc02m2_mipi_raw",
            vec![
                PowerStep::new(PowerPin::Rst, PinLevel::Low, 2),
                PowerStep::new(PowerPin::Dovdd, PinLevel::V1800, 1),
                PowerStep::new(PowerPin::Dvdd1, PinLevel::V1200, 0),
                PowerStep::new(PowerPin::Avdd, PinLevel::V2800, 1),
                PowerStep::new(PowerPin::Mclk, PinLevel::High, 2),
                PowerStep::new(PowerPin::Rst, PinLevel::High, 2),
            ],
        ),
    ]
}
