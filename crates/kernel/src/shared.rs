use crate::{
    ClientLoad, ConfigProvider, IdentifierRegistry, LoaderError, LoaderState, RuntimeWorld,
    WorldHandle, WorldLoader,
};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::io::Read;
use std::sync::Arc;
use terrain_common::{BiomeId, HostContext, WorldName};

/// A [`WorldLoader`] behind a mutex, for hosts whose lifecycle hooks may run
/// on different threads.
///
/// Every operation holds the lock for its whole duration, so a lookup never
/// sees a handle whose ids are being released and two unloads cannot release
/// the same ids twice.
pub struct SharedWorldLoader<P: ConfigProvider, R> {
    inner: Mutex<WorldLoader<P, R>>,
}

impl<P: ConfigProvider, R: IdentifierRegistry> SharedWorldLoader<P, R> {
    pub fn new(loader: WorldLoader<P, R>) -> Self {
        Self {
            inner: Mutex::new(loader),
        }
    }

    pub fn state(&self) -> LoaderState {
        self.inner.lock().state()
    }

    /// Name of the active world, if any.
    pub fn active_name(&self) -> Option<WorldName> {
        self.inner.lock().active_handle().map(|h| h.name().clone())
    }

    /// Run `f` against the active world while holding the lock.
    pub fn with_active<T>(&self, f: impl FnOnce(Option<&WorldHandle<P::Config>>) -> T) -> T {
        let loader = self.inner.lock();
        f(loader.active_handle())
    }

    /// Run `f` against the world named `name` while holding the lock.
    pub fn with_world<T>(
        &self,
        name: &str,
        f: impl FnOnce(Option<&WorldHandle<P::Config>>) -> T,
    ) -> T {
        let loader = self.inner.lock();
        f(loader.lookup_by_name(name))
    }

    /// Run `f` against the registry while holding the lock.
    pub fn with_registry<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        let loader = self.inner.lock();
        f(loader.registry())
    }

    pub fn on_pre_registration(&self, host: &HostContext) -> Result<bool, LoaderError> {
        Ok(self.inner.lock().on_pre_registration(host)?.is_some())
    }

    pub fn demand_load(&self, runtime: &Arc<dyn RuntimeWorld>) -> Result<WorldName, LoaderError> {
        let mut loader = self.inner.lock();
        Ok(loader.demand_load(runtime)?.name().clone())
    }

    pub fn demand_client_load(
        &self,
        stream: &mut dyn Read,
        runtime: &Arc<dyn RuntimeWorld>,
    ) -> Result<ClientLoad, LoaderError> {
        self.inner.lock().demand_client_load(stream, runtime)
    }

    pub fn on_shutdown(&self) -> Option<BTreeSet<BiomeId>> {
        self.inner.lock().on_shutdown()
    }

    pub fn on_disconnect(&self) -> Option<BTreeSet<BiomeId>> {
        self.inner.lock().on_disconnect()
    }

    pub fn unload(&self) -> Option<BTreeSet<BiomeId>> {
        self.inner.lock().unload()
    }

    pub fn into_inner(self) -> WorldLoader<P, R> {
        self.inner.into_inner()
    }
}
