//! World Kernel: the single active terrain world, its lifecycle, and the
//! reclamation of the biome ids it claimed in the shared registry.
//!
//! # Invariants
//! - At most one world occupies the loader's slot at any time.
//! - A handle is only installed once its configuration is attached.
//! - Identifiers are released before the slot is cleared.
//!
//! # Limitation
//! Only one world is tracked. A host running several terrain worlds at once
//! will see the most recently demand-loaded one.

mod error;
mod frame;
mod handle;
mod loader;
mod provider;
mod reclaim;
mod registry;
mod shared;

#[cfg(test)]
mod testing;

pub use error::{ConfigError, LoaderError};
pub use frame::{MAX_FRAMED_STRING_LEN, read_framed_string, write_framed_string};
pub use handle::WorldHandle;
pub use loader::{ClientLoad, LoaderState, WorldLoader};
pub use provider::{ConfigProvider, RuntimeWorld, WorldConfiguration};
pub use reclaim::reclaim_identifiers;
pub use registry::{BiomeIdRegistry, DEFAULT_BIOME_CAPACITY, IdentifierRegistry, RegistryError};
pub use shared::SharedWorldLoader;

pub fn crate_info() -> &'static str {
    "terrain-kernel v0.1.0"
}
