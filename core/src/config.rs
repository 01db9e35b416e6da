//! Engine configuration, persisted via confy.

use serde::{Deserialize, Serialize};

/// Tunables for the engine, loaded from the platform config directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Initial capacity of the action-record pool.
    #[serde(default = "default_pool_capacity")]
    pub record_pool_capacity: usize,

    /// Emit periodic frame statistics at debug level.
    #[serde(default)]
    pub log_frame_stats: bool,

    /// Frames between two stats lines when `log_frame_stats` is on.
    #[serde(default = "default_stats_interval")]
    pub frame_stats_interval: u64,

    /// Directory the demo driver loads play definitions from.
    #[serde(default = "default_play_directory")]
    pub play_directory: String,
}

fn default_pool_capacity() -> usize {
    16
}

fn default_stats_interval() -> u64 {
    300
}

fn default_play_directory() -> String {
    "plays".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            record_pool_capacity: default_pool_capacity(),
            log_frame_stats: false,
            frame_stats_interval: default_stats_interval(),
            play_directory: default_play_directory(),
        }
    }
}

impl EngineConfig {
    /// Load the stored configuration, falling back to defaults.
    pub fn load() -> Self {
        confy::load("cadence", None).unwrap_or_default()
    }

    /// Persist this configuration.
    pub fn save(self) {
        confy::store("cadence", None, self).expect("Failed to save configuration");
    }
}
