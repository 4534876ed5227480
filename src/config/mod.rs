use crate::models::{CrosswordSettings, Grid, PuzzleData, UserConfig};
use crate::services::{FileStore, GuessStore, NoopStore};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Prefix for environment overrides, e.g. `CROSSWORD_SETTINGS__SHARE_UPDATES=true`.
pub const ENV_PREFIX: &str = "CROSSWORD";

/// Configuration manager for the settings file and puzzle files.
///
/// Manages `Crossword Settings.yaml` in the configuration directory, which is
/// also where a [`FileStore`] keeps saved guesses.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    user_config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager, creating `config_dir` if needed.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            user_config_path: config_dir.join("Crossword Settings.yaml"),
            config_dir,
        })
    }

    /// Load user settings: the YAML file if present, then `CROSSWORD_*`
    /// environment overrides on top. Missing values fall back to defaults.
    pub fn load_user_config(&self) -> Result<UserConfig> {
        self.load_user_config_with(Self::environment())
    }

    fn load_user_config_with(&self, environment: config::Environment) -> Result<UserConfig> {
        if self.user_config_path.exists() {
            tracing::info!("Loading user config from {}", self.user_config_path);
        } else {
            tracing::warn!(
                "User config file not found at {}, using defaults",
                self.user_config_path
            );
        }

        let layered = config::Config::builder()
            .add_source(
                config::File::new(self.user_config_path.as_str(), config::FileFormat::Yaml)
                    .required(false),
            )
            .add_source(environment)
            .build()
            .with_context(|| format!("Failed to read user config: {}", self.user_config_path))?;

        let config: UserConfig = layered
            .try_deserialize()
            .with_context(|| format!("Failed to parse user config: {}", self.user_config_path))?;

        Ok(config)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    pub fn save_user_config(&self, config: &UserConfig) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize user config to YAML")?;

        fs::write(&self.user_config_path, yaml_string)
            .with_context(|| format!("Failed to write user config: {}", self.user_config_path))?;

        tracing::info!("Saved user config to {}", self.user_config_path);
        Ok(())
    }

    /// Load and validate a puzzle file. `.json` files are read as JSON,
    /// anything else as YAML.
    pub fn load_puzzle<P: AsRef<Utf8Path>>(&self, path: P) -> Result<PuzzleData> {
        let path = path.as_ref();

        let file_contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read puzzle: {}", path))?;

        let puzzle: PuzzleData = if is_json(path) {
            serde_json::from_str(&file_contents)
                .with_context(|| format!("Failed to parse puzzle: {}", path))?
        } else {
            serde_yaml_ng::from_str(&file_contents)
                .with_context(|| format!("Failed to parse puzzle: {}", path))?
        };

        // Building the grid is the only full check for crossing conflicts.
        Grid::build(&puzzle).with_context(|| format!("Invalid puzzle: {}", path))?;

        tracing::info!(
            "Loaded puzzle from {}: {} across, {} down",
            path,
            puzzle.across.len(),
            puzzle.down.len()
        );
        Ok(puzzle)
    }

    pub fn save_puzzle<P: AsRef<Utf8Path>>(&self, path: P, puzzle: &PuzzleData) -> Result<()> {
        let path = path.as_ref();

        let contents = if is_json(path) {
            serde_json::to_string_pretty(puzzle).context("Failed to serialize puzzle to JSON")?
        } else {
            serde_yaml_ng::to_string(puzzle).context("Failed to serialize puzzle to YAML")?
        };

        fs::write(path, contents).with_context(|| format!("Failed to write puzzle: {}", path))?;

        tracing::info!("Saved puzzle to {}", path);
        Ok(())
    }

    /// The guess store the settings ask for.
    pub fn guess_store(&self, settings: &CrosswordSettings) -> Box<dyn GuessStore + Send> {
        if settings.use_storage {
            let store = FileStore::new(&self.config_dir, &settings.storage_key);
            tracing::info!("Saving guesses to {}", store.path());
            Box::new(store)
        } else {
            tracing::info!("Guess storage disabled");
            Box::new(NoopStore)
        }
    }

    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn user_config_path(&self) -> &Utf8Path {
        &self.user_config_path
    }
}

fn is_json(path: &Utf8Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClueEntry, Direction};
    use tempfile::TempDir;

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let manager = ConfigManager::new(&config_path).unwrap();
        (manager, temp_dir)
    }

    fn no_environment() -> config::Environment {
        ConfigManager::environment().source(Some(config::Map::new()))
    }

    #[test]
    fn test_create_config_manager_creates_dir() {
        let temp_dir = TempDir::new().unwrap();
        let nested = Utf8PathBuf::try_from(temp_dir.path().join("a").join("b")).unwrap();

        let manager = ConfigManager::new(&nested).unwrap();
        assert!(nested.exists());
        assert!(manager.user_config_path().as_str().ends_with("Crossword Settings.yaml"));
    }

    #[test]
    fn test_missing_user_config_uses_defaults() {
        let (manager, _temp_dir) = create_test_config_manager();
        let config = manager.load_user_config_with(no_environment()).unwrap();
        assert_eq!(config, UserConfig::default());
    }

    #[test]
    fn test_load_save_user_config() {
        let (manager, _temp_dir) = create_test_config_manager();

        let mut config = UserConfig::default();
        config.settings.storage_key = "sunday".to_string();
        config.settings.share_updates = true;
        manager.save_user_config(&config).unwrap();

        let loaded = manager.load_user_config_with(no_environment()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_environment_overrides_file() {
        let (manager, _temp_dir) = create_test_config_manager();
        manager.save_user_config(&UserConfig::default()).unwrap();

        let mut vars = config::Map::new();
        vars.insert(
            "CROSSWORD_SETTINGS__USE_STORAGE".to_string(),
            "false".to_string(),
        );
        vars.insert(
            "CROSSWORD_SETTINGS__STORAGE_KEY".to_string(),
            "daily".to_string(),
        );
        let environment = ConfigManager::environment().source(Some(vars));

        let loaded = manager.load_user_config_with(environment).unwrap();
        assert!(!loaded.settings.use_storage);
        assert_eq!(loaded.settings.storage_key, "daily");
        assert_eq!(loaded.settings.log_dir, "logs");
    }

    #[test]
    fn test_puzzle_round_trip_yaml_and_json() {
        let (manager, temp_dir) = create_test_config_manager();
        let puzzle = PuzzleData::new()
            .with_clue(Direction::Across, 1, ClueEntry::new("Feline", "CAT", 0, 0))
            .with_clue(Direction::Down, 1, ClueEntry::new("Bovine", "COW", 0, 0));

        for name in ["puzzle.yaml", "puzzle.json"] {
            let path = Utf8PathBuf::try_from(temp_dir.path().join(name)).unwrap();
            manager.save_puzzle(&path, &puzzle).unwrap();
            assert_eq!(manager.load_puzzle(&path).unwrap(), puzzle);
        }
    }

    #[test]
    fn test_load_puzzle_rejects_conflicts() {
        let (manager, temp_dir) = create_test_config_manager();
        let path = Utf8PathBuf::try_from(temp_dir.path().join("bad.yaml")).unwrap();
        fs::write(
            &path,
            "across:\n  1: { clue: Feline, answer: CAT, row: 0, col: 0 }\n\
             down:\n  1: { clue: Canine, answer: DOG, row: 0, col: 0 }\n",
        )
        .unwrap();

        let err = manager.load_puzzle(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid puzzle"));
    }

    #[test]
    fn test_guess_store_follows_settings() {
        let (manager, _temp_dir) = create_test_config_manager();

        let mut settings = CrosswordSettings::default();
        let mut store = manager.guess_store(&settings);
        store.write("{}").unwrap();
        assert!(manager.config_dir().join("guesses.json").exists());

        settings.use_storage = false;
        let store = manager.guess_store(&settings);
        assert_eq!(store.read().unwrap(), None);
    }
}
