//! Persistence: world configuration files on disk and the client sync packet.
//!
//! Layout inside a world's config directory:
//! ```text
//! WorldConfig.json          - custom biome ids and world-wide settings
//! WorldBiomes/
//!   <Biome>.json            - one biome configuration per file
//! ```
//!
//! # Invariants
//! - A configuration is fully parsed and validated before any id is claimed.
//! - The client sync packet is the framed world name followed by CBOR.

mod config;
mod provider;
mod sync;

pub use config::{BiomeConfig, BiomeMode, WorldConfig, WorldConfigs};
pub use provider::{BIOMES_DIR, FileConfigProvider, WORLD_CONFIG_FILE};
pub use sync::{encode_client_sync, write_client_sync};

pub fn crate_info() -> &'static str {
    "terrain-persist v0.1.0"
}
