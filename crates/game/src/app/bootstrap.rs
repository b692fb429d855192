use std::env;

use tilegame::{resolve_root, LoopConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::config::{
    apply_overlay, level_naming_from_env, read_game_config, CONFIG_FILE_NAME,
    LEVEL_PREFIX_ENV_VAR,
};

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== Tilegame Startup ===");

    let mut config = LoopConfig {
        level_naming: level_naming_from_env(env::var(LEVEL_PREFIX_ENV_VAR).ok()),
        ..LoopConfig::default()
    };

    // Root problems surface again, with detail, when the engine starts.
    match resolve_root() {
        Ok(root) => {
            let path = root.join("assets").join(CONFIG_FILE_NAME);
            match read_game_config(&path) {
                Ok(Some(file)) => {
                    info!(path = %path.display(), "game_config_loaded");
                    config = apply_overlay(config, file);
                }
                Ok(None) => {}
                Err(error) => warn!(error = error.as_str(), "game_config_ignored"),
            }
        }
        Err(error) => warn!(error = %error, "game_config_skipped"),
    }

    info!(
        window_title = config.window_title.as_str(),
        window_width = config.window_width,
        window_height = config.window_height,
        level_prefix = config.level_naming.prefix.as_str(),
        "game_config"
    );
    AppWiring { config }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
