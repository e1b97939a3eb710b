//! Shared value types for the terrain world loader.
//!
//! # Invariants
//! - A `WorldName` is never empty and never contains a path separator.
//!   Biome names follow the same rule via `check_path_component`.
//! - A `BiomeId` is a small integer in the shared, process-wide id namespace.

mod types;

pub use types::{BiomeId, HostContext, NameError, WorldName, check_path_component};

pub fn crate_info() -> &'static str {
    "terrain-common v0.1.0"
}
