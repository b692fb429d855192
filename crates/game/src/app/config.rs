use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use tilegame::{LevelNaming, LoopConfig};

pub(crate) const CONFIG_FILE_NAME: &str = "game.json";
pub(crate) const LEVEL_PREFIX_ENV_VAR: &str = "TILEGAME_LEVEL_PREFIX";

pub(crate) type ConfigResult<T> = Result<T, String>;

/// Optional overrides read from `assets/game.json`. Absent fields keep the
/// engine defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct GameConfigFile {
    #[serde(default)]
    pub(crate) window_title: Option<String>,
    #[serde(default)]
    pub(crate) window_width: Option<u32>,
    #[serde(default)]
    pub(crate) window_height: Option<u32>,
    #[serde(default)]
    pub(crate) target_tps: Option<u32>,
    #[serde(default)]
    pub(crate) backgrounds: Option<Vec<String>>,
}

pub(crate) fn parse_game_config(raw: &str) -> ConfigResult<GameConfigFile> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, GameConfigFile>(&mut deserializer) {
        Ok(config) => Ok(config),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse game config: {source}"))
            } else {
                Err(format!("parse game config at {path}: {source}"))
            }
        }
    }
}

/// `Ok(None)` when the file does not exist.
pub(crate) fn read_game_config(path: &Path) -> ConfigResult<Option<GameConfigFile>> {
    match fs::read_to_string(path) {
        Ok(raw) => parse_game_config(&raw).map(Some),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(format!("read {}: {error}", path.display())),
    }
}

pub(crate) fn apply_overlay(mut config: LoopConfig, file: GameConfigFile) -> LoopConfig {
    if let Some(title) = file.window_title {
        config.window_title = title;
    }
    if let Some(width) = file.window_width.filter(|value| *value > 0) {
        config.window_width = width;
    }
    if let Some(height) = file.window_height.filter(|value| *value > 0) {
        config.window_height = height;
    }
    if let Some(tps) = file.target_tps.filter(|value| *value > 0) {
        config.target_tps = tps;
    }
    if let Some(backgrounds) = file.backgrounds {
        config.backgrounds = backgrounds;
    }
    config
}

pub(crate) fn level_naming_from_env(value: Option<String>) -> LevelNaming {
    let mut naming = LevelNaming::default();
    if let Some(prefix) = value
        .map(|raw| raw.trim().to_string())
        .filter(|prefix| !prefix.is_empty())
    {
        naming.prefix = prefix;
    }
    naming
}
