use crate::error::IoError;

// =============================================================================
// Endian Helper Functions
// =============================================================================

/// Read a little-endian u16 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 2 bytes.
#[inline]
pub fn read_u16_le(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

/// Read a big-endian u16 from a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 2 bytes.
#[inline]
pub fn read_u16_be(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}

// =============================================================================
// UTF-16 Decoding
// =============================================================================

const BOM_LE: [u8; 2] = [0xFF, 0xFE];
const BOM_BE: [u8; 2] = [0xFE, 0xFF];

/// Check if bytes start with a UTF-16 byte order mark.
pub fn has_utf16_bom(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && (bytes[..2] == BOM_LE || bytes[..2] == BOM_BE)
}

/// Decode UTF-16 text.
///
/// The byte order is taken from the BOM; text without a BOM is read as
/// little-endian, which is what FluoView writes.
pub fn decode_utf16(bytes: &[u8]) -> Result<String, IoError> {
    let big_endian = bytes.starts_with(&BOM_BE);
    let body = if has_utf16_bom(bytes) {
        &bytes[2..]
    } else {
        bytes
    };

    if body.len() % 2 != 0 {
        return Err(IoError::Decode(format!(
            "odd number of bytes ({}) in UTF-16 data",
            body.len()
        )));
    }

    let units = body.chunks_exact(2).map(|unit| {
        if big_endian {
            read_u16_be(unit)
        } else {
            read_u16_le(unit)
        }
    });
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|e| IoError::Decode(e.to_string()))
}
