//! Level loading configuration, read from TOML

use crate::error::{self, LevelError};
use crate::screen::DEFAULT_ENTITY_STATE;
use serde::{Deserialize, Serialize};
use stagekit_animation::Point;
use std::path::Path;

/// Knobs for how a level directory is laid out and loaded
///
/// Every field is optional in the TOML file:
///
/// ```toml
/// map_file = "map.json"
/// screen_extension = "scn"
/// default_player_start = [3, 3]
/// default_entity_state = "Start"
/// validate_on_load = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Level document name inside the level directory
    pub map_file: String,
    /// Extension of per-screen grid files
    pub screen_extension: String,
    /// Player start used when the level document has none
    pub default_player_start: [i32; 2],
    /// State given to entity spawns that omit one
    pub default_entity_state: String,
    /// Run [`crate::LevelGraph::validate`] after loading and fail on problems
    pub validate_on_load: bool,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            map_file: "map.json".to_string(),
            screen_extension: "scn".to_string(),
            default_player_start: [3, 3],
            default_entity_state: DEFAULT_ENTITY_STATE.to_string(),
            validate_on_load: false,
        }
    }
}

impl LevelConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let content = error::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| LevelError::malformed(path.display().to_string(), e))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, LevelError> {
        toml::from_str(content).map_err(|e| LevelError::malformed("level config", e))
    }

    pub fn to_toml_string(&self) -> Result<String, LevelError> {
        toml::to_string_pretty(self).map_err(|e| LevelError::malformed("level config", e))
    }

    pub fn player_start(&self) -> Point {
        Point::new(self.default_player_start[0], self.default_player_start[1])
    }

    /// File name of the grid for screen `name`
    pub fn screen_file_name(&self, name: &str) -> String {
        format!("{}.{}", name, self.screen_extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = LevelConfig::from_toml_str("").unwrap();
        assert_eq!(config, LevelConfig::default());
        assert_eq!(config.player_start(), Point::new(3, 3));
        assert_eq!(config.screen_file_name("Intro"), "Intro.scn");
    }

    #[test]
    fn test_partial_config() {
        let config = LevelConfig::from_toml_str(
            r#"
            map_file = "level.json"
            validate_on_load = true
            default_player_start = [5, 12]
            "#,
        )
        .unwrap();
        assert_eq!(config.map_file, "level.json");
        assert!(config.validate_on_load);
        assert_eq!(config.player_start(), Point::new(5, 12));
        assert_eq!(config.screen_extension, "scn");
    }

    #[test]
    fn test_bad_config() {
        let err = LevelConfig::from_toml_str("validate_on_load = \"yes\"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("level.toml");

        let mut config = LevelConfig::default();
        config.screen_extension = "grid".to_string();
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

        assert_eq!(LevelConfig::load(&path).unwrap(), config);
        let missing = LevelConfig::load(tmp.path().join("none.toml")).unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::NotFound);
    }
}
