//! Constants and configuration values for camseq
//!
//! Centralizes magic numbers, paths, and defaults. Never use magic numbers
//! in other files - add them here first.

/// Sequence table limits and conventions
pub mod seq {
    /// Name under which platform-level sequences are keyed. Platform entries
    /// match on their slot rather than on the selector string.
    pub const PLATFORM_SEQ_NAME: &str = "platform_power_seq";

    /// Upper bound on entries consulted in one sequence table
    pub const MAX_SEQUENCE_ENTRIES: usize = 16;

    /// Upper bound on steps applied from one sequence
    pub const MAX_STEPS_PER_SEQUENCE: usize = 16;

    /// Largest per-step settle delay a profile may configure
    pub const MAX_STEP_DELAY_MS: u32 = 1000;
}

/// Input size caps
pub mod limits {
    /// Largest board profile file we will read
    pub const MAX_PROFILE_SIZE_BYTES: u64 = 1024 * 1024;

    /// Longest accepted sensor driver name
    pub const MAX_DRIVER_NAME_LEN: usize = 64;

    /// Longest accepted per-slot enable list
    pub const MAX_ENABLE_LIST_LEN: usize = 256;
}

/// System paths
pub mod paths {
    use std::path::PathBuf;

    /// System configuration directory
    pub const CONFIG_DIR: &str = "/etc/camseq";

    /// Board profile file name
    pub const BOARD_PROFILE_FILE: &str = "board.json";

    /// Environment override for the configuration directory
    pub const CONFIG_DIR_ENV: &str = "CAMSEQ_CONFIG_DIR";

    /// Per-user configuration directory (fallback when /etc/camseq is absent)
    pub fn user_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("camseq"))
    }

    /// Resolve the board profile path: env override, then the system
    /// directory, then the per-user directory if the system file is missing.
    pub fn board_profile_path() -> PathBuf {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return PathBuf::from(dir).join(BOARD_PROFILE_FILE);
        }
        let system = PathBuf::from(CONFIG_DIR).join(BOARD_PROFILE_FILE);
        if system.exists() {
            return system;
        }
        match user_config_dir() {
            Some(user) => {
                let candidate = user.join(BOARD_PROFILE_FILE);
                if candidate.exists() {
                    candidate
                } else {
                    system
                }
            }
            None => system,
        }
    }
}
