//! Application state

use visibility_engine::{EngineConfig, VisibilityEngine};

pub struct AppState {
    pub engine: VisibilityEngine,
}

impl AppState {
    /// Build state from the environment. `GHOSTSCAN_CONFIG` may point at an
    /// engine TOML file; otherwise defaults apply.
    pub fn new() -> anyhow::Result<Self> {
        let config = match std::env::var("GHOSTSCAN_CONFIG") {
            Ok(path) => EngineConfig::from_file(&path)?,
            Err(_) => EngineConfig::default(),
        };

        Ok(Self {
            engine: VisibilityEngine::with_config(config),
        })
    }
}
