//! Input validation for board profiles and sequence tables
//!
//! Profiles come from files an administrator edits by hand; everything is
//! validated at load with errors that name the offending field.

use std::collections::HashSet;

use cs_hw::PowerPin;

use crate::constants::{limits, seq};
use crate::data::types::{BoardProfile, PowerSequence};
use crate::error::{CamseqError, Result};

/// Validates a sensor driver name: lowercase alphanumerics and underscores
pub fn validate_driver_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > limits::MAX_DRIVER_NAME_LEN {
        return Err(CamseqError::InvalidDriverName(name.to_string()));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(CamseqError::InvalidDriverName(name.to_string()));
    }
    Ok(())
}

/// Validates an enable list: comma-joined driver names
pub fn validate_enable_list(list: &str) -> Result<()> {
    if list.len() > limits::MAX_ENABLE_LIST_LEN {
        return Err(CamseqError::InvalidConfig {
            field: "enable_list".to_string(),
            reason: format!("longer than {} bytes", limits::MAX_ENABLE_LIST_LEN),
        });
    }
    for entry in list.split(',') {
        validate_driver_name(entry.trim()).map_err(|_| CamseqError::InvalidConfig {
            field: "enable_list".to_string(),
            reason: format!("invalid entry {:?}", entry.trim()),
        })?;
    }
    Ok(())
}

/// Validates one sequence: name, step count, and per-step delays
pub fn validate_sequence(sequence: &PowerSequence) -> Result<()> {
    let is_platform = sequence.name == seq::PLATFORM_SEQ_NAME;
    if !is_platform {
        validate_driver_name(&sequence.name).map_err(|_| CamseqError::InvalidSequence {
            name: sequence.name.clone(),
            reason: "name is not a valid driver name".to_string(),
        })?;
    }
    if is_platform && sequence.slot.is_none() {
        return Err(CamseqError::InvalidSequence {
            name: sequence.name.clone(),
            reason: "platform sequence has no slot".to_string(),
        });
    }
    if sequence.steps.len() > seq::MAX_STEPS_PER_SEQUENCE {
        return Err(CamseqError::InvalidSequence {
            name: sequence.name.clone(),
            reason: format!(
                "{} steps exceeds the {}-step cap",
                sequence.steps.len(),
                seq::MAX_STEPS_PER_SEQUENCE
            ),
        });
    }
    for step in &sequence.steps {
        if step.delay_ms > seq::MAX_STEP_DELAY_MS {
            return Err(CamseqError::InvalidDelay {
                value: step.delay_ms,
                max: seq::MAX_STEP_DELAY_MS,
            });
        }
    }
    Ok(())
}

/// Validates a whole board profile before it is used to build bindings
pub fn validate_board_profile(profile: &BoardProfile) -> Result<()> {
    let mut seen_slots = HashSet::new();
    for config in &profile.slots {
        if !seen_slots.insert(config.slot) {
            return Err(CamseqError::InvalidConfig {
                field: "slots".to_string(),
                reason: format!("slot {} configured twice", config.slot),
            });
        }
        let mut seen_pins = HashSet::new();
        for assignment in &config.pins {
            if assignment.pin == PowerPin::Undef {
                return Err(CamseqError::InvalidConfig {
                    field: "pins".to_string(),
                    reason: format!("slot {} assigns an owner to undef", config.slot),
                });
            }
            if !seen_pins.insert(assignment.pin) {
                return Err(CamseqError::InvalidConfig {
                    field: "pins".to_string(),
                    reason: format!(
                        "slot {} assigns pin {} twice",
                        config.slot, assignment.pin
                    ),
                });
            }
        }
        if let Some(list) = &config.enable_list {
            validate_enable_list(list)?;
        }
    }

    if profile.platform_sequences.len() > seq::MAX_SEQUENCE_ENTRIES
        || profile.sensor_sequences.len() > seq::MAX_SEQUENCE_ENTRIES
    {
        return Err(CamseqError::InvalidConfig {
            field: "sequences".to_string(),
            reason: format!(
                "more than {} entries in a sequence table",
                seq::MAX_SEQUENCE_ENTRIES
            ),
        });
    }
    for sequence in profile
        .platform_sequences
        .iter()
        .chain(&profile.sensor_sequences)
    {
        validate_sequence(sequence)?;
    }
    Ok(())
}
