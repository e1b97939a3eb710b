use crate::{
    ConfigProvider, IdentifierRegistry, LoaderError, RegistryError, RuntimeWorld, WorldHandle,
    read_framed_string, reclaim_identifiers,
};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use terrain_common::{BiomeId, HostContext, WorldName};
use tracing::{debug, info, warn};

/// Directory under the configs root holding one folder per world.
const WORLDS_DIR: &str = "worlds";

/// Observable state of the loader's slot.
///
/// Loading and unloading happen inside a single `&mut self` call, so callers
/// only ever see the slot empty or occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    Unloaded,
    Loaded,
}

/// Outcome of a client-side load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientLoad {
    /// The slot was empty and now holds the streamed world.
    Installed(WorldName),
    /// The slot was occupied; the streamed world was discarded.
    Ignored(WorldName),
}

/// Holds the single active terrain world and drives its lifecycle from the
/// host's hooks.
///
/// All operations run synchronously on the host's lifecycle thread. Wrap in a
/// [`SharedWorldLoader`](crate::SharedWorldLoader) when callers can race.
pub struct WorldLoader<P: ConfigProvider, R> {
    configs_root: PathBuf,
    provider: P,
    registry: R,
    active: Option<WorldHandle<P::Config>>,
}

impl<P: ConfigProvider, R: IdentifierRegistry> WorldLoader<P, R> {
    /// Create a loader reading per-world configs from `<configs_root>/worlds/<name>/`.
    pub fn new(
        configs_root: impl Into<PathBuf>,
        provider: P,
        registry: R,
    ) -> Result<Self, LoaderError> {
        let configs_root = configs_root.into();
        if configs_root.as_os_str().is_empty() {
            return Err(LoaderError::EmptyConfigsRoot);
        }
        Ok(Self {
            configs_root,
            provider,
            registry,
            active: None,
        })
    }

    pub fn configs_root(&self) -> &Path {
        &self.configs_root
    }

    /// Config directory for a world. Its existence is what enables the world.
    pub fn world_dir(&self, name: &WorldName) -> PathBuf {
        self.configs_root.join(WORLDS_DIR).join(name.as_str())
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    pub fn state(&self) -> LoaderState {
        match self.active {
            Some(_) => LoaderState::Loaded,
            None => LoaderState::Unloaded,
        }
    }

    /// The active world, if its name is exactly `name`.
    pub fn lookup_by_name(&self, name: &str) -> Option<&WorldHandle<P::Config>> {
        self.active.as_ref().filter(|h| h.name() == name)
    }

    /// The active world, if it is the one the host's world object names.
    pub fn lookup_runtime(&self, runtime: &dyn RuntimeWorld) -> Option<&WorldHandle<P::Config>> {
        self.lookup_by_name(runtime.name())
    }

    /// Whatever occupies the slot.
    pub fn active_handle(&self) -> Option<&WorldHandle<P::Config>> {
        self.active.as_ref()
    }

    /// Early hook, before the host has decided whether terrain generation is
    /// in play for this session.
    ///
    /// Only dedicated hosts register ids this early; elsewhere this is a no-op.
    /// A missing config directory means the world is not enabled and is
    /// skipped silently.
    pub fn on_pre_registration(
        &mut self,
        host: &HostContext,
    ) -> Result<Option<&WorldHandle<P::Config>>, LoaderError> {
        if !host.is_dedicated_mode {
            debug!("skipping pre-registration: host is not dedicated");
            return Ok(None);
        }

        let name = match WorldName::new(host.session_folder_name.as_str()) {
            Ok(name) => name,
            Err(e) => {
                debug!(error = %e, "skipping pre-registration: unusable session folder name");
                return Ok(None);
            }
        };
        let dir = self.world_dir(&name);
        if !dir.is_dir() {
            debug!(world = %name, dir = %dir.display(), "no config directory, world not enabled");
            return Ok(None);
        }

        info!("Loading configs for world \"{}\"..", name);
        let config = self
            .provider
            .load_from_directory(&dir, &name, &mut self.registry)?;
        let handle = self.install(WorldHandle::new(name, config));
        Ok(Some(&*handle))
    }

    /// Load the world the host has committed to.
    ///
    /// Always builds a fresh handle, even if a world of the same name is
    /// already active: hosts may recreate the world object for the same
    /// logical world without a shutdown in between. The previous occupant is
    /// replaced without reclaiming its ids.
    pub fn demand_load(
        &mut self,
        runtime: &Arc<dyn RuntimeWorld>,
    ) -> Result<&WorldHandle<P::Config>, LoaderError> {
        let name = WorldName::new(runtime.name())?;
        info!("Loading configs for world \"{}\"....", name);

        let dir = self.world_dir(&name);
        let config = self
            .provider
            .load_from_directory(&dir, &name, &mut self.registry)?;

        let handle = self.install(WorldHandle::new(name, config));
        handle.bind_runtime(runtime);
        Ok(&*handle)
    }

    /// Load a world whose configuration arrives over the client sync stream.
    ///
    /// The stream starts with the framed world name; the provider consumes the
    /// rest. An occupied slot is never evicted, and ids claimed while reading
    /// a discarded world are handed back before returning.
    pub fn demand_client_load(
        &mut self,
        stream: &mut dyn Read,
        runtime: &Arc<dyn RuntimeWorld>,
    ) -> Result<ClientLoad, LoaderError> {
        let name = WorldName::new(read_framed_string(stream)?)?;
        let mut log = ClaimLog::new(&mut self.registry);
        let config = self.provider.load_from_stream(stream, &name, &mut log)?;
        let newly_claimed = log.claimed;

        let mut handle = WorldHandle::new(name.clone(), config);
        handle.bind_runtime(runtime);

        if self.active.is_some() {
            debug!(world = %name, "client world received while another is active, ignoring");
            if !newly_claimed.is_empty() {
                self.registry.release(&newly_claimed);
            }
            return Ok(ClientLoad::Ignored(name));
        }
        info!("Loaded client configs for world \"{}\"", name);
        self.active = Some(handle);
        Ok(ClientLoad::Installed(name))
    }

    /// Host process stopped.
    pub fn on_shutdown(&mut self) -> Option<BTreeSet<BiomeId>> {
        self.unload()
    }

    /// Client left the server.
    pub fn on_disconnect(&mut self) -> Option<BTreeSet<BiomeId>> {
        self.unload()
    }

    /// Release the active world's ids, then clear the slot.
    ///
    /// Returns the released ids, or `None` if the slot was already empty.
    pub fn unload(&mut self) -> Option<BTreeSet<BiomeId>> {
        let handle = self.active.as_ref()?;
        info!("Unloading world \"{}\"...", handle.name());
        let released = reclaim_identifiers(handle, &mut self.registry);
        self.active = None;
        Some(released)
    }

    fn install(&mut self, handle: WorldHandle<P::Config>) -> &mut WorldHandle<P::Config> {
        if let Some(previous) = &self.active {
            warn!(
                previous = %previous.name(),
                world = %handle.name(),
                "replacing active world without releasing its biome ids"
            );
        }
        self.active.insert(handle)
    }
}

/// Registry wrapper that remembers which claims went through.
struct ClaimLog<'a> {
    registry: &'a mut dyn IdentifierRegistry,
    claimed: BTreeSet<BiomeId>,
}

impl<'a> ClaimLog<'a> {
    fn new(registry: &'a mut dyn IdentifierRegistry) -> Self {
        Self {
            registry,
            claimed: BTreeSet::new(),
        }
    }
}

impl IdentifierRegistry for ClaimLog<'_> {
    fn claim(&mut self, id: BiomeId) -> Result<(), RegistryError> {
        self.registry.claim(id)?;
        self.claimed.insert(id);
        Ok(())
    }

    fn release(&mut self, ids: &BTreeSet<BiomeId>) {
        self.registry.release(ids);
        for id in ids {
            self.claimed.remove(id);
        }
    }

    fn is_claimed(&self, id: BiomeId) -> bool {
        self.registry.is_claimed(id)
    }
}
