use crate::{BiomeConfig, WorldConfig, WorldConfigs};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::{Path, PathBuf};
use terrain_common::WorldName;
use terrain_kernel::{ConfigError, ConfigProvider, IdentifierRegistry, WorldConfiguration};
use tracing::{debug, info, warn};

/// World settings file inside a world's config directory.
pub const WORLD_CONFIG_FILE: &str = "WorldConfig.json";
/// Directory of per-biome files inside a world's config directory.
pub const BIOMES_DIR: &str = "WorldBiomes";

/// Reads world configurations from JSON files, or from the CBOR body of a
/// client sync packet, and claims their custom biome ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileConfigProvider;

impl FileConfigProvider {
    pub fn new() -> Self {
        Self
    }

    /// Parse and validate a world's config directory without touching any
    /// registry.
    pub fn read_directory(&self, dir: &Path) -> Result<WorldConfigs, ConfigError> {
        let world_path = dir.join(WORLD_CONFIG_FILE);
        let world: WorldConfig = if world_path.exists() {
            read_json(&world_path)?
        } else {
            debug!(path = %world_path.display(), "no world config file, using defaults");
            WorldConfig::default()
        };

        let mut configs = WorldConfigs {
            world,
            ..WorldConfigs::default()
        };
        for path in biome_files(&dir.join(BIOMES_DIR))? {
            let mut biome: BiomeConfig = read_json(&path)?;
            if biome.name.is_empty() {
                biome.name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
            }
            configs.biomes.insert(biome.name.clone(), biome);
        }

        configs.validate().map_err(|message| ConfigError::Parse {
            path: dir.to_path_buf(),
            message,
        })?;
        Ok(configs)
    }

    /// Write a configuration out in the layout [`read_directory`](Self::read_directory) expects.
    pub fn write_directory(&self, dir: &Path, configs: &WorldConfigs) -> Result<(), ConfigError> {
        configs.validate().map_err(|message| ConfigError::Write {
            path: dir.to_path_buf(),
            message,
        })?;
        let biomes_dir = dir.join(BIOMES_DIR);
        std::fs::create_dir_all(&biomes_dir)?;
        write_json(&dir.join(WORLD_CONFIG_FILE), &configs.world)?;
        for biome in configs.biomes.values() {
            write_json(&biomes_dir.join(format!("{}.json", biome.name)), biome)?;
        }
        Ok(())
    }
}

impl ConfigProvider for FileConfigProvider {
    type Config = WorldConfigs;

    fn load_from_directory(
        &self,
        dir: &Path,
        world: &WorldName,
        registry: &mut dyn IdentifierRegistry,
    ) -> Result<WorldConfigs, ConfigError> {
        let configs = self.read_directory(dir)?;
        let world_path = dir.join(WORLD_CONFIG_FILE);
        if !world_path.exists() {
            info!(world = %world, path = %world_path.display(), "writing default world config");
            std::fs::create_dir_all(dir)?;
            write_json(&world_path, &configs.world)?;
        }
        claim_all(&configs, world, registry);
        Ok(configs)
    }

    fn load_from_stream(
        &self,
        stream: &mut dyn Read,
        world: &WorldName,
        registry: &mut dyn IdentifierRegistry,
    ) -> Result<WorldConfigs, ConfigError> {
        let configs: WorldConfigs =
            ciborium::from_reader(stream).map_err(|e| ConfigError::Stream(e.to_string()))?;
        configs.validate().map_err(ConfigError::Stream)?;
        claim_all(&configs, world, registry);
        Ok(configs)
    }
}

/// Claim every custom biome id. A refused claim is logged and the
/// configuration keeps listing the id.
fn claim_all(configs: &WorldConfigs, world: &WorldName, registry: &mut dyn IdentifierRegistry) {
    for id in configs.claimed_identifiers() {
        if let Err(e) = registry.claim(id) {
            warn!(world = %world, error = %e, "biome id not registered");
        }
    }
}

fn biome_files(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let file = std::fs::File::open(path)?;
    serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, value).map_err(|e| ConfigError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
