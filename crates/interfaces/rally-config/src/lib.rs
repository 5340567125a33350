//! Central configuration constants for runtime limits and defaults.

/// Default side-effect queue capacity per workflow instance.
pub const DEFAULT_EFFECT_CAPACITY: usize = 64;

/// Minimum allowed side-effect queue capacity.
pub const MIN_EFFECT_CAPACITY: usize = 1;

/// Maximum allowed side-effect queue capacity.
pub const MAX_EFFECT_CAPACITY: usize = 1024;

/// File name of the local store inside the data directory.
pub const DATA_FILE_NAME: &str = "rally.redb";

/// Environment variable overriding the CLI data directory.
pub const DATA_DIR_ENV: &str = "RALLY_DATA_DIR";

/// `directories::ProjectDirs` identity for the default data directory.
pub const QUALIFIER: &str = "org";
pub const ORG: &str = "rally";
pub const APP: &str = "rally";

/// Convenience function to clamp a capacity value into allowed range.
pub fn clamp_effect_capacity(v: usize) -> usize {
    v.clamp(MIN_EFFECT_CAPACITY, MAX_EFFECT_CAPACITY)
}
