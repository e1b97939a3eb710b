//! Client sync packet: what a server sends so a client can build the same
//! world configuration.

use crate::WorldConfigs;
use std::io::Write;
use terrain_common::WorldName;
use terrain_kernel::{ConfigError, write_framed_string};

/// Write the packet: framed world name, then the CBOR-encoded configuration.
pub fn write_client_sync(
    writer: &mut dyn Write,
    world: &WorldName,
    configs: &WorldConfigs,
) -> Result<(), ConfigError> {
    write_framed_string(writer, world.as_str())?;
    ciborium::into_writer(configs, writer).map_err(|e| ConfigError::Stream(e.to_string()))
}

/// Encode the packet into a fresh buffer.
pub fn encode_client_sync(world: &WorldName, configs: &WorldConfigs) -> Result<Vec<u8>, ConfigError> {
    let mut buf = Vec::new();
    write_client_sync(&mut buf, world, configs)?;
    Ok(buf)
}
