//! Test doubles shared by the kernel's unit tests.

use crate::{
    ConfigError, ConfigProvider, IdentifierRegistry, RegistryError, RuntimeWorld,
    WorldConfiguration,
};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;
use terrain_common::{BiomeId, WorldName};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeConfig {
    pub ids: BTreeSet<BiomeId>,
}

impl FakeConfig {
    pub fn new(ids: &[u32]) -> Self {
        Self {
            ids: ids.iter().copied().map(BiomeId).collect(),
        }
    }
}

impl WorldConfiguration for FakeConfig {
    fn claimed_identifiers(&self) -> BTreeSet<BiomeId> {
        self.ids.clone()
    }
}

/// Serves scripted id sets per world name. Stream bodies are comma-separated ids.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    pub worlds: BTreeMap<String, Vec<u32>>,
}

impl ScriptedProvider {
    pub fn with_world(mut self, name: &str, ids: &[u32]) -> Self {
        self.worlds.insert(name.to_owned(), ids.to_vec());
        self
    }

    fn claim_all(ids: &[u32], registry: &mut dyn IdentifierRegistry) -> FakeConfig {
        let config = FakeConfig::new(ids);
        for id in &config.ids {
            let _ = registry.claim(*id);
        }
        config
    }
}

impl ConfigProvider for ScriptedProvider {
    type Config = FakeConfig;

    fn load_from_directory(
        &self,
        dir: &Path,
        world: &WorldName,
        registry: &mut dyn IdentifierRegistry,
    ) -> Result<FakeConfig, ConfigError> {
        let ids = self.worlds.get(world.as_str()).ok_or_else(|| ConfigError::Parse {
            path: dir.to_path_buf(),
            message: "no scripted config".into(),
        })?;
        Ok(Self::claim_all(ids, registry))
    }

    fn load_from_stream(
        &self,
        stream: &mut dyn Read,
        _world: &WorldName,
        registry: &mut dyn IdentifierRegistry,
    ) -> Result<FakeConfig, ConfigError> {
        let mut body = String::new();
        stream.read_to_string(&mut body)?;
        let ids = body
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ConfigError::Stream(e.to_string()))?;
        Ok(Self::claim_all(&ids, registry))
    }
}

/// Registry that accepts every claim and records each release call.
#[derive(Debug, Default)]
pub struct RecordingRegistry {
    pub claimed: BTreeSet<BiomeId>,
    pub releases: Vec<BTreeSet<BiomeId>>,
}

impl IdentifierRegistry for RecordingRegistry {
    fn claim(&mut self, id: BiomeId) -> Result<(), RegistryError> {
        if !self.claimed.insert(id) {
            return Err(RegistryError::AlreadyClaimed(id));
        }
        Ok(())
    }

    fn release(&mut self, ids: &BTreeSet<BiomeId>) {
        for id in ids {
            self.claimed.remove(id);
        }
        self.releases.push(ids.clone());
    }

    fn is_claimed(&self, id: BiomeId) -> bool {
        self.claimed.contains(&id)
    }
}

#[derive(Debug)]
pub struct FakeWorld {
    name: String,
}

impl FakeWorld {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
        }
    }
}

impl RuntimeWorld for FakeWorld {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Build a client sync packet for the scripted provider.
pub fn client_packet(name: &str, ids: &[u32]) -> Vec<u8> {
    let mut buf = Vec::new();
    crate::write_framed_string(&mut buf, name).unwrap();
    let body = ids.iter().map(u32::to_string).collect::<Vec<_>>().join(",");
    buf.extend_from_slice(body.as_bytes());
    buf
}
