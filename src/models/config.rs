use serde::{Deserialize, Serialize};

/// User settings from `Crossword Settings.yaml`.
///
/// Every field has a default so a missing or partial file still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub settings: CrosswordSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrosswordSettings {
    /// Name of the persisted guess blob
    pub storage_key: String,

    /// Persist guesses locally; when off, guesses come from the host
    pub use_storage: bool,

    /// Publish local edits as outbound letter updates instead of storing them
    pub share_updates: bool,

    pub debug_mode: bool,
    pub log_dir: String,

    /// Mirror log output to the console
    pub console_log: bool,
}

impl Default for CrosswordSettings {
    fn default() -> Self {
        Self {
            storage_key: "guesses".to_string(),
            use_storage: true,
            share_updates: false,
            debug_mode: false,
            log_dir: "logs".to_string(),
            console_log: false,
        }
    }
}
