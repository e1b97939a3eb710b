use crate::{ConfigError, IdentifierRegistry};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use terrain_common::{BiomeId, WorldName};

/// A loaded world configuration, as far as the loader cares about it.
pub trait WorldConfiguration {
    /// Biome ids this configuration declares it owns in the shared namespace.
    fn claimed_identifiers(&self) -> BTreeSet<BiomeId>;
}

/// Produces world configurations from disk or from the client sync stream.
///
/// Implementations claim the configuration's ids in `registry` while loading,
/// so the rest of the process sees them as in use. A parse failure must be
/// reported before any id is claimed.
pub trait ConfigProvider {
    type Config: WorldConfiguration;

    /// Load the configuration stored in a world's config directory.
    fn load_from_directory(
        &self,
        dir: &Path,
        world: &WorldName,
        registry: &mut dyn IdentifierRegistry,
    ) -> Result<Self::Config, ConfigError>;

    /// Load the configuration from the rest of a client sync stream, after the
    /// world name has already been consumed.
    fn load_from_stream(
        &self,
        stream: &mut dyn Read,
        world: &WorldName,
        registry: &mut dyn IdentifierRegistry,
    ) -> Result<Self::Config, ConfigError>;
}

/// The host's live world object. The loader only records a weak reference.
pub trait RuntimeWorld: Send + Sync {
    fn name(&self) -> &str;
}
