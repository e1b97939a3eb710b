use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use terrain_common::{BiomeId, check_path_component};
use terrain_kernel::WorldConfiguration;

/// How biomes are laid out across the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BiomeMode {
    #[default]
    Normal,
    BeforeGroups,
    FromImage,
}

/// World-wide settings from `WorldConfig.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Custom biomes by name, with the id each one claims.
    pub custom_biomes: BTreeMap<String, BiomeId>,
    pub biome_mode: BiomeMode,
    /// World height as a power of two.
    pub world_height_bits: u8,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            custom_biomes: BTreeMap::new(),
            biome_mode: BiomeMode::Normal,
            world_height_bits: 7,
        }
    }
}

impl WorldConfig {
    /// Check the settings. Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if !(5..=8).contains(&self.world_height_bits) {
            return Err(format!(
                "world_height_bits must be between 5 and 8, got {}",
                self.world_height_bits
            ));
        }
        let mut seen: BTreeMap<BiomeId, &str> = BTreeMap::new();
        for (name, id) in &self.custom_biomes {
            check_path_component(name).map_err(|e| format!("custom biome: {e}"))?;
            if let Some(other) = seen.insert(*id, name) {
                return Err(format!(
                    "custom biomes {other:?} and {name:?} both use id {}",
                    id.0
                ));
            }
        }
        Ok(())
    }
}

/// One biome's settings from `WorldBiomes/<name>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BiomeConfig {
    pub name: String,
    pub temperature: f32,
    pub rainfall: f32,
    pub surface_block: String,
    pub ground_block: String,
}

impl Default for BiomeConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            temperature: 0.5,
            rainfall: 0.5,
            surface_block: "GRASS".into(),
            ground_block: "DIRT".into(),
        }
    }
}

/// Everything loaded for one world. This is the configuration a
/// [`terrain_kernel::WorldHandle`] owns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldConfigs {
    pub world: WorldConfig,
    /// Biome settings keyed by biome name.
    pub biomes: BTreeMap<String, BiomeConfig>,
}

impl WorldConfigs {
    pub fn validate(&self) -> Result<(), String> {
        self.world.validate()?;
        for (key, biome) in &self.biomes {
            check_path_component(key).map_err(|e| format!("biome: {e}"))?;
            if key != &biome.name {
                return Err(format!("biome {key:?} is stored under name {:?}", biome.name));
            }
        }
        Ok(())
    }

    pub fn biome(&self, name: &str) -> Option<&BiomeConfig> {
        self.biomes.get(name)
    }
}

impl WorldConfiguration for WorldConfigs {
    fn claimed_identifiers(&self) -> BTreeSet<BiomeId> {
        self.world.custom_biomes.values().copied().collect()
    }
}
