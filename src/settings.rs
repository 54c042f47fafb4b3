//! Layered explorer settings.
//!
//! Precedence (lowest first): built-in defaults → optional TOML file →
//! `EXPLORER_*` environment variables. The binary applies its CLI flags on
//! top of the result.
//!
//! | Key                  | Env                           | Default                 |
//! |----------------------|-------------------------------|-------------------------|
//! | `base_url`           | `EXPLORER_BASE_URL`           | `http://localhost:5000` |
//! | `world_id`           | `EXPLORER_WORLD_ID`           | `demo`                  |
//! | `story_title`        | `EXPLORER_STORY_TITLE`        | `StoryLeaf`             |
//! | `source`             | `EXPLORER_SOURCE`             | `remote`                |
//! | `lock_ms`            | `EXPLORER_LOCK_MS`            | `1500`                  |
//! | `request_timeout_ms` | `EXPLORER_REQUEST_TIMEOUT_MS` | `10000`                 |

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::types::ExplorerConfig;

/// Which [`WorldSource`](crate::source::WorldSource) backs the explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// StoryLeaf REST API, with the fixture as load fallback.
    Remote,
    /// Built-in demo world only; no network access.
    Fixture,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerSettings {
    pub base_url: String,
    pub world_id: String,
    pub story_title: String,
    pub source: SourceKind,
    pub lock_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".into(),
            world_id: "demo".into(),
            story_title: "StoryLeaf".into(),
            source: SourceKind::Remote,
            lock_ms: 1500,
            request_timeout_ms: 10_000,
        }
    }
}

impl ExplorerSettings {
    /// Build settings from defaults, `path` (if given) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::builder(path)?
            .add_source(Environment::with_prefix("EXPLORER").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Defaults and file only; used where the environment must not leak in.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        Self::builder(Some(path))?.build()?.try_deserialize()
    }

    fn builder(
        path: Option<&Path>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let d = Self::default();
        let mut builder = Config::builder()
            .set_default("base_url", d.base_url)?
            .set_default("world_id", d.world_id)?
            .set_default("story_title", d.story_title)?
            .set_default("source", "remote")?
            .set_default("lock_ms", d.lock_ms)?
            .set_default("request_timeout_ms", d.request_timeout_ms)?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        Ok(builder)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn explorer_config(&self) -> ExplorerConfig {
        ExplorerConfig {
            lock_ms: self.lock_ms,
            ..Default::default()
        }
    }

    /// Primary world source selected by `source`.
    #[cfg(feature = "client")]
    pub fn build_source(&self) -> std::sync::Arc<dyn crate::source::WorldSource> {
        use crate::remote::RemoteWorldSource;
        use crate::source::FixtureWorldSource;
        use std::sync::Arc;

        match self.source {
            SourceKind::Remote => Arc::new(RemoteWorldSource::new(
                self.base_url.clone(),
                self.request_timeout(),
            )),
            SourceKind::Fixture => Arc::new(FixtureWorldSource::new(self.story_title.clone())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "world_id = \"treasure_island\"\nsource = \"fixture\"\nlock_ms = 250"
        )
        .unwrap();

        let s = ExplorerSettings::load_file(file.path()).unwrap();
        assert_eq!(s.world_id, "treasure_island");
        assert_eq!(s.source, SourceKind::Fixture);
        assert_eq!(s.lock_ms, 250);
        assert_eq!(s.base_url, ExplorerSettings::default().base_url);
        assert_eq!(s.explorer_config().lock_ms, 250);
        assert_eq!(s.explorer_config().step, 2.0);
    }

    #[test]
    fn missing_file_is_an_error() {
        let r = ExplorerSettings::load_file(Path::new("/definitely/not/here.toml"));
        assert!(r.is_err());
    }

    #[test]
    fn unknown_source_kind_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "source = \"carrier_pigeon\"").unwrap();
        assert!(ExplorerSettings::load_file(file.path()).is_err());
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "world_id = \"treasure_island\"\nlock_ms = 250").unwrap();

        // No other test reads these variables.
        std::env::set_var("EXPLORER_LOCK_MS", "750");
        std::env::set_var("EXPLORER_STORY_TITLE", "Ilha");
        let loaded = ExplorerSettings::load(Some(file.path()));
        std::env::remove_var("EXPLORER_LOCK_MS");
        std::env::remove_var("EXPLORER_STORY_TITLE");

        let s = loaded.unwrap();
        assert_eq!(s.lock_ms, 750);
        assert_eq!(s.story_title, "Ilha");
        assert_eq!(s.world_id, "treasure_island");
        assert_eq!(s.request_timeout_ms, 10_000);
    }
}
