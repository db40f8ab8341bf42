use serde::Deserialize;

/// Tree policy applied to every tree the runner builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TreeSettings {
    /// Accept keys equal to one already stored
    pub allow_duplicate_keys: bool,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            allow_duplicate_keys: true,
        }
    }
}

/// Fixture runner settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FollowerSettings {
    /// Re-validate the tree after every action
    pub check_invariants: bool,
}

impl Default for FollowerSettings {
    fn default() -> Self {
        Self {
            check_invariants: true,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    /// Filter directive: a level such as `debug`, or `target=level` pairs
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

pub const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

impl LogSettings {
    /// Checks every comma separated directive names a known level.
    pub fn is_valid_level(directive: &str) -> bool {
        !directive.trim().is_empty()
            && directive.split(',').all(|part| {
                let level = part.rsplit('=').next().unwrap_or(part).trim();
                LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str())
            })
    }
}
