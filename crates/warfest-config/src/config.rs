//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use warfest_voxel::Color;

use crate::error::ConfigError;

/// File name of the persisted config inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Meshing worker settings.
    pub mesher: MesherConfig,
    /// Color atlas settings.
    pub atlas: AtlasConfig,
    /// Sample world used by the demo binary.
    pub demo: DemoConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Meshing pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MesherConfig {
    /// Number of meshing worker threads.
    pub worker_count: usize,
    /// Maximum number of chunks queued or meshing at once.
    pub task_budget: usize,
    /// Build the six face directions of a chunk on separate threads.
    pub parallel_directions: bool,
}

/// Color atlas configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AtlasConfig {
    /// Texels per atlas side; the atlas holds `size * size` colors.
    pub size: u32,
    /// Where to write the atlas PNG, if anywhere.
    pub export_path: Option<PathBuf>,
}

/// Demo world configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Chunk dimensions in voxels (x, y, z).
    pub chunk_size: (u32, u32, u32),
    /// Number of chunks to generate.
    pub chunk_count: u32,
    /// Seed for world generation.
    pub seed: u64,
    /// Block colors as `#rrggbb` or `#rrggbbaa`.
    pub palette: Vec<String>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for MesherConfig {
    fn default() -> Self {
        Self {
            worker_count: 4,
            task_budget: 16,
            parallel_directions: false,
        }
    }
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            size: 16,
            export_path: None,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            chunk_size: (16, 16, 16),
            chunk_count: 8,
            seed: 42,
            palette: [
                "#7f7f7f", // stone
                "#6e461e", // dirt
                "#3ca032", // grass
                "#d8c888", // sand
                "#285ac8", // water
                "#f0f0f0", // snow
            ]
            .map(str::to_string)
            .to_vec(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl DemoConfig {
    /// Parses the palette into colors, in order.
    pub fn palette_colors(&self) -> Result<Vec<Color>, ConfigError> {
        self.palette
            .iter()
            .map(|entry| {
                entry.parse().map_err(|source| ConfigError::PaletteColor {
                    entry: entry.clone(),
                    source,
                })
            })
            .collect()
    }

    /// Chunk dimensions as `usize`.
    pub fn chunk_dimensions(&self) -> [usize; 3] {
        let (x, y, z) = self.chunk_size;
        [x as usize, y as usize, z as usize]
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Default config directory: `<platform config dir>/warfest`, falling
    /// back to the working directory.
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("warfest"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
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
            .separate_tuple_members(false)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized).map_err(ConfigError::WriteError)
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Rejects settings the mesher cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mesher.worker_count == 0 {
            return Err(ConfigError::Invalid {
                field: "mesher.worker_count",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.mesher.task_budget == 0 {
            return Err(ConfigError::Invalid {
                field: "mesher.task_budget",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.atlas.size == 0 {
            return Err(ConfigError::Invalid {
                field: "atlas.size",
                reason: "must be at least 1".to_string(),
            });
        }
        let (x, y, z) = self.demo.chunk_size;
        if x == 0 || y == 0 || z == 0 {
            return Err(ConfigError::Invalid {
                field: "demo.chunk_size",
                reason: format!("({x}, {y}, {z}) has an empty axis"),
            });
        }
        let capacity = self.atlas.size as usize * self.atlas.size as usize;
        if self.demo.palette.len() > capacity {
            return Err(ConfigError::Invalid {
                field: "demo.palette",
                reason: format!(
                    "{} colors do not fit a {size}x{size} atlas",
                    self.demo.palette.len(),
                    size = self.atlas.size
                ),
            });
        }
        self.demo.palette_colors().map(|_| ())
    }
}
