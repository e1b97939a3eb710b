use crate::{RuntimeWorld, WorldConfiguration};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Weak};
use terrain_common::{BiomeId, WorldName};

/// One loaded terrain world: its name, the configuration it owns, and an
/// optional weak binding to the host's live world object.
pub struct WorldHandle<C> {
    name: WorldName,
    configuration: C,
    runtime: Option<Weak<dyn RuntimeWorld>>,
}

impl<C: WorldConfiguration> WorldHandle<C> {
    /// Build a handle. The configuration is attached up front so a handle is
    /// never observable without one.
    pub fn new(name: WorldName, configuration: C) -> Self {
        Self {
            name,
            configuration,
            runtime: None,
        }
    }

    pub fn name(&self) -> &WorldName {
        &self.name
    }

    pub fn configuration(&self) -> &C {
        &self.configuration
    }

    /// Ids the configuration claimed. Only consulted at unload.
    pub fn claimed_identifiers(&self) -> BTreeSet<BiomeId> {
        self.configuration.claimed_identifiers()
    }

    /// Record the host's world object. The handle does not keep it alive.
    pub fn bind_runtime(&mut self, runtime: &Arc<dyn RuntimeWorld>) {
        self.runtime = Some(Arc::downgrade(runtime));
    }

    pub fn has_runtime_binding(&self) -> bool {
        self.runtime.is_some()
    }

    /// The host's world object, if bound and still alive.
    pub fn runtime(&self) -> Option<Arc<dyn RuntimeWorld>> {
        self.runtime.as_ref().and_then(Weak::upgrade)
    }
}

impl<C> fmt::Debug for WorldHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldHandle")
            .field("name", &self.name)
            .field("runtime_bound", &self.runtime.is_some())
            .finish_non_exhaustive()
    }
}
