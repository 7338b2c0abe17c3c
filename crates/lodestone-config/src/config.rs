//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level mesher configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub meshing: MeshingConfig,
    pub resource_pack: ResourcePackConfig,
    pub atlas: AtlasConfig,
    pub placeholder: PlaceholderConfig,
    pub debug: DebugConfig,
}

/// Background meshing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshingConfig {
    /// Worker threads. `0` picks a count from the number of CPU cores.
    pub worker_count: usize,
    /// Maximum chunk meshing jobs queued or running at once.
    pub task_budget: usize,
}

/// Resource pack lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResourcePackConfig {
    /// Atlas rectangle used when the missing texture is not in the atlas.
    pub default_texture_bounds: [f32; 4],
    /// Texture drawn for unknown texture identifiers.
    pub missing_texture: String,
}

/// Texture atlas packing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AtlasConfig {
    /// Edge pixels repeated around each packed texture.
    pub border: u32,
    /// Largest atlas edge length in pixels.
    pub max_size: u32,
}

/// Vertical extent of placeholder geometry for chunks that have no mesh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaceholderConfig {
    pub floor_y: f32,
    pub ceiling_y: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter override (e.g., "debug", "info", "warn"). Empty keeps the
    /// logger's built-in filter.
    pub log_level: String,
}

// --- Default implementations ---

impl Default for MeshingConfig {
    fn default() -> Self {
        Self {
            worker_count: 0,
            task_budget: 64,
        }
    }
}

impl MeshingConfig {
    /// The worker count to spawn: the configured value, or all cores but two
    /// (at least one) when it is `0`.
    pub fn resolved_worker_count(&self) -> usize {
        if self.worker_count > 0 {
            return self.worker_count;
        }
        let cpus = num_cpus::get().max(2);
        (cpus - 2).max(1)
    }
}

impl Default for ResourcePackConfig {
    fn default() -> Self {
        Self {
            default_texture_bounds: [0.0, 0.0, 1.0, 1.0],
            missing_texture: "missing_no".to_string(),
        }
    }
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            border: 0,
            max_size: 16384,
        }
    }
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            floor_y: -64.0,
            ceiling_y: 320.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: String::new(),
        }
    }
}

/// Platform config directory for lodestone, if the platform has one.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lodestone"))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized).map_err(ConfigError::WriteError)
    }

    /// Re-reads `config.ron`; `Some` only if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;
        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let ron_str = ron::ser::to_string_pretty(
            &Config::default(),
            ron::ser::PrettyConfig::new().depth_limit(3),
        )
        .unwrap();
        assert!(ron_str.contains("task_budget: 64"));
        assert!(ron_str.contains("missing_texture: \"missing_no\""));
    }

    #[test]
    fn test_missing_section_uses_default() {
        let config: Config = ron::from_str("(meshing: (worker_count: 3))").unwrap();
        assert_eq!(config.meshing.worker_count, 3);
        assert_eq!(config.meshing.task_budget, 64);
        assert_eq!(config.atlas, AtlasConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_resolved_worker_count() {
        let explicit = MeshingConfig {
            worker_count: 5,
            ..MeshingConfig::default()
        };
        assert_eq!(explicit.resolved_worker_count(), 5);
        assert!(MeshingConfig::default().resolved_worker_count() >= 1);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.meshing.worker_count = 6;
        config.resource_pack.missing_texture = "amulet:missing".to_string();
        config.placeholder.ceiling_y = 256.0;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());

        let mut modified = config.clone();
        modified.atlas.border = 2;
        modified.save(dir.path()).unwrap();

        let reloaded = config.reload(dir.path()).unwrap().unwrap();
        assert_eq!(reloaded.atlas.border, 2);
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        assert!(matches!(
            Config::load_or_create(dir.path()),
            Err(ConfigError::ParseError(_))
        ));
    }
}
