//! TOML level configuration plus command-line overrides.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dungeon::LevelConfig;

/// Reads a [`LevelConfig`] from TOML. Missing keys keep their defaults.
pub fn load_level_config(path: &Path) -> Result<LevelConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: LevelConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

/// Loads `path` when given, applies the size overrides and validates the result.
pub fn resolve_level_config(
    path: Option<&Path>,
    width: Option<usize>,
    height: Option<usize>,
) -> Result<LevelConfig> {
    let mut config = match path {
        Some(path) => load_level_config(path)?,
        None => LevelConfig::default(),
    };
    if let Some(width) = width {
        config.width = width;
    }
    if let Some(height) = height {
        config.height = height;
    }
    config.validate().context("Invalid level configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon::LookAhead;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("level.toml");
        fs::write(&path, "width = 90\nroom_skip_chance = 0\n").unwrap();

        let config = load_level_config(&path).unwrap();
        assert_eq!(config.width, 90);
        assert_eq!(config.room_skip_chance, 0);
        assert_eq!(config.height, 30);
        assert_eq!(config.look_ahead, LookAhead::Cross);
    }

    #[test]
    fn square_look_ahead_parses_from_a_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("level.toml");
        fs::write(&path, "[look_ahead.square]\nradius = 2\n").unwrap();

        let config = load_level_config(&path).unwrap();
        assert_eq!(config.look_ahead, LookAhead::Square { radius: 2 });
    }

    #[test]
    fn overrides_apply_on_top_of_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("level.toml");
        fs::write(&path, "width = 90\nheight = 45\n").unwrap();

        let config = resolve_level_config(Some(&path), None, Some(33)).unwrap();
        assert_eq!((config.width, config.height), (90, 33));
    }

    #[test]
    fn invalid_configs_are_rejected_after_overrides() {
        let err = resolve_level_config(None, Some(12), None).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid level configuration"));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = load_level_config(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}
