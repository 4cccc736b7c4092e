//! camseq Core Library
//!
//! Camera sensor power sequencing for Linux boards.
//!
//! # Features
//!
//! - **Sequence Walker**: replays per-sensor (pin, level, delay) tables
//!   forward for power-on and backward for power-off
//! - **Owner Binding**: resolves each wired pin to its clock, regulator, or
//!   GPIO backend once at init
//! - **Enable Lists**: keeps a second-source sensor driver from toggling
//!   lines configured for a different part in the same slot
//! - **Board Profiles**: JSON wiring/sequence configuration with
//!   compiled-in defaults for the reference board
//!
//! # Module Structure
//!
//! - `data/` - Data types, board profiles, built-in tables, validation
//! - `engine/` - The power-sequence walker and delay primitive
//!
//! # Example
//!
//! ```no_run
//! use cs_core::{load_board_profile, PowerHal, PowerState, SensorSlot};
//!
//! let profile = load_board_profile().unwrap();
//! let hal = PowerHal::new(profile, cs_hw::open_default_owners()).unwrap();
//! let report = hal
//!     .power(SensorSlot::Main, "s5kjn1_mipi_raw", PowerState::On)
//!     .unwrap();
//! assert!(report.device_applied());
//! ```

// Grouped modules
pub mod data;
pub mod engine;

// Standalone modules
pub mod constants;
pub mod error;

// Re-export primary types from data/
pub use data::{
    BoardProfile, PinAssignment, PowerReport, PowerSequence, PowerState, PowerStep, SlotConfig,
};

// Re-export persistence functions from data/
pub use data::{
    board_profile_path, load_board_profile, load_board_profile_from, save_board_profile,
};

// Re-export validation functions from data/
pub use data::{
    validate_board_profile, validate_driver_name, validate_enable_list, validate_sequence,
};

// Re-export the hardware vocabulary
pub use data::{
    ClockLine, GpioLine, HwWiring, OwnerKind, PinLevel, PinOwner, PowerPin, RegulatorRail,
    SensorSlot,
};

// Re-export error types
pub use error::{CamseqError, Result};

// Re-export engine types
pub use engine::{Delay, PowerHal, SequenceTable, ThreadDelay};
