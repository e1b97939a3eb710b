use crate::{IdentifierRegistry, WorldConfiguration, WorldHandle};
use std::collections::BTreeSet;
use terrain_common::BiomeId;
use tracing::debug;

/// Hand the ids a departing world claimed back to the shared registry so the
/// next world can reuse them.
///
/// The set is not checked against the registry: the configuration may claim
/// ids the registry refused at load time, and releasing those is a no-op.
/// Returns the set that was released.
pub fn reclaim_identifiers<C: WorldConfiguration>(
    handle: &WorldHandle<C>,
    registry: &mut dyn IdentifierRegistry,
) -> BTreeSet<BiomeId> {
    let ids = handle.claimed_identifiers();
    debug!(world = %handle.name(), count = ids.len(), "releasing biome ids");
    registry.release(&ids);
    ids
}
