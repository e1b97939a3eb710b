//! Length-prefixed strings on the client sync stream.
//!
//! Wire format: a big-endian `u16` byte length followed by that many bytes of
//! UTF-8.

use crate::ConfigError;
use std::io::{Read, Write};

/// Longest string that fits in a frame.
pub const MAX_FRAMED_STRING_LEN: usize = u16::MAX as usize;

/// Read one framed string off the stream.
pub fn read_framed_string(stream: &mut dyn Read) -> Result<String, ConfigError> {
    let mut len = [0u8; 2];
    stream.read_exact(&mut len)?;
    let len = u16::from_be_bytes(len) as usize;

    let mut bytes = vec![0u8; len];
    stream.read_exact(&mut bytes)?;
    String::from_utf8(bytes).map_err(|e| ConfigError::Stream(format!("framed string: {e}")))
}

/// Write one framed string to the stream.
pub fn write_framed_string(stream: &mut dyn Write, value: &str) -> Result<(), ConfigError> {
    let len = u16::try_from(value.len()).map_err(|_| {
        ConfigError::Stream(format!(
            "string of {} bytes exceeds frame limit of {MAX_FRAMED_STRING_LEN}",
            value.len()
        ))
    })?;
    stream.write_all(&len.to_be_bytes())?;
    stream.write_all(value.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn frame_layout_is_length_then_bytes() {
        let mut buf = Vec::new();
        write_framed_string(&mut buf, "beta").unwrap();
        assert_eq!(buf, [0, 4, b'b', b'e', b't', b'a']);
    }

    #[test]
    fn reads_only_its_own_frame() {
        let mut cursor = Cursor::new(vec![0, 2, b'o', b'k', 0xAA, 0xBB]);
        assert_eq!(read_framed_string(&mut cursor).unwrap(), "ok");
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn truncated_frame_is_io_error() {
        let mut cursor = Cursor::new(vec![0, 9, b'x']);
        assert!(matches!(
            read_framed_string(&mut cursor),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn invalid_utf8_is_stream_error() {
        let mut cursor = Cursor::new(vec![0, 1, 0xFF]);
        assert!(matches!(
            read_framed_string(&mut cursor),
            Err(ConfigError::Stream(_))
        ));
    }

    #[test]
    fn oversized_string_rejected() {
        let long = "x".repeat(MAX_FRAMED_STRING_LEN + 1);
        let mut buf = Vec::new();
        assert!(write_framed_string(&mut buf, &long).is_err());
        assert!(buf.is_empty());
    }
}
