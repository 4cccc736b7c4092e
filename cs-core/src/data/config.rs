//! Board profile persistence
//!
//! Profiles are stored as JSON, by default under /etc/camseq/board.json
//! (overridable through CAMSEQ_CONFIG_DIR). A missing file yields the
//! compiled-in defaults; a present but invalid file is an error rather than
//! a silent fallback.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::constants::{limits, paths};
use crate::data::types::BoardProfile;
use crate::data::validation::validate_board_profile;
use crate::error::{CamseqError, Result};

/// Resolved location of the board profile file
pub fn board_profile_path() -> PathBuf {
    paths::board_profile_path()
}

/// Load the board profile from the default location
pub fn load_board_profile() -> Result<BoardProfile> {
    let path = board_profile_path();
    if !path.exists() {
        info!(
            "no board profile at {}, using built-in defaults",
            path.display()
        );
        return Ok(BoardProfile::default());
    }
    load_board_profile_from(&path)
}

/// Load and validate a board profile from an explicit path
pub fn load_board_profile_from(path: &Path) -> Result<BoardProfile> {
    let meta = fs::metadata(path).map_err(|e| CamseqError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    if meta.len() > limits::MAX_PROFILE_SIZE_BYTES {
        return Err(CamseqError::InvalidConfig {
            field: "profile".to_string(),
            reason: format!(
                "{} is {} bytes, larger than the {}-byte cap",
                path.display(),
                meta.len(),
                limits::MAX_PROFILE_SIZE_BYTES
            ),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| CamseqError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let profile: BoardProfile = serde_json::from_str(&content)?;
    validate_board_profile(&profile)?;
    debug!(
        "loaded board profile from {}: {} slots, {} sensor sequences",
        path.display(),
        profile.slots.len(),
        profile.sensor_sequences.len()
    );
    Ok(profile)
}

/// Save a board profile to an explicit path (atomic write-then-rename)
pub fn save_board_profile(profile: &BoardProfile, path: &Path) -> Result<()> {
    validate_board_profile(profile)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CamseqError::FileWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let json = serde_json::to_string_pretty(profile)?;

    // Write to a temp file then rename so a crash never leaves a torn profile
    let temp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&temp_path).map_err(|e| CamseqError::FileWrite {
        path: temp_path.clone(),
        source: e,
    })?;
    file.write_all(json.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| CamseqError::FileWrite {
            path: temp_path.clone(),
            source: e,
        })?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|e| CamseqError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
