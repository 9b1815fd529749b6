//! Minimal PNG header reading: enough to learn the pixel size of a capture
//! without decoding it.

use crate::export::ExportError;

const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
const IHDR: &[u8; 4] = b"IHDR";

/// Width and height from the IHDR chunk, which must directly follow the
/// signature.
pub fn dimensions(bytes: &[u8]) -> Result<(u32, u32), ExportError> {
    if bytes.len() < 24 || bytes[..8] != SIGNATURE || bytes[12..16] != *IHDR {
        return Err(ExportError::NotPng);
    }
    let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    Ok((width, height))
}

/// Signature plus IHDR for a `width` × `height` RGBA image. The CRC is not
/// computed; only the header is read back.
#[cfg(test)]
pub(crate) fn header(width: u32, height: u32) -> Vec<u8> {
    let mut out = SIGNATURE.to_vec();
    out.extend_from_slice(&13u32.to_be_bytes());
    out.extend_from_slice(IHDR);
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&height.to_be_bytes());
    out.extend_from_slice(&[8, 6, 0, 0, 0]);
    out.extend_from_slice(&[0; 4]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_ihdr_dimensions() {
        assert_eq!(dimensions(&header(1588, 4000)).unwrap(), (1588, 4000));
    }

    #[test]
    fn test_rejects_non_png() {
        assert!(matches!(dimensions(b"GIF89a"), Err(ExportError::NotPng)));
        assert!(matches!(
            dimensions(b"\x89PNG fake capture bytes!"),
            Err(ExportError::NotPng)
        ));
        // Truncated right after the signature.
        assert!(matches!(
            dimensions(&header(10, 10)[..20]),
            Err(ExportError::NotPng)
        ));
    }
}
