//! Dimensions-only probe
//!
//! Walks the marker segments of a stream just far enough to pull width and
//! height out of the SOF0 payload, without building tables or touching the
//! entropy-coded data. Useful for sizing buffers before committing to a
//! full decode.

use crate::decoder::ImageInfo;
use crate::errors::DecodeErrors;

/// Read the dimensions of a baseline JPEG without decoding it.
///
/// Performs no allocation. Only `width` and `height` of the returned info
/// are filled in.
///
/// # Errors
/// Fails when the SOI signature is missing, when the stream ends or
/// reaches EOI before a baseline frame header, or when the frame header is
/// truncated.
pub fn read_dimensions(buffer: &[u8]) -> Result<ImageInfo, DecodeErrors>
{
    if buffer.len() < 2
    {
        return Err(DecodeErrors::ExhaustedData);
    }

    if buffer[0] != 0xFF || buffer[1] != 0xD8
    {
        return Err(DecodeErrors::IllegalMagicBytes(
            (u16::from(buffer[0]) << 8) | u16::from(buffer[1]),
        ));
    }

    let mut position = 2;

    while position + 4 <= buffer.len()
    {
        if buffer[position] != 0xFF
        {
            position += 1;
            continue;
        }

        let marker = buffer[position + 1];

        if marker == 0xC0
        {
            // FF C0 len_hi len_lo precision h h w w
            if position + 9 > buffer.len()
            {
                return Err(DecodeErrors::ExhaustedData);
            }

            let mut info = ImageInfo::default();

            info.set_height(u16::from_be_bytes([
                buffer[position + 5],
                buffer[position + 6],
            ]));
            info.set_width(u16::from_be_bytes([
                buffer[position + 7],
                buffer[position + 8],
            ]));

            return Ok(info);
        }

        if marker == 0xD9
        {
            break;
        }

        let length = usize::from(u16::from_be_bytes([
            buffer[position + 2],
            buffer[position + 3],
        ]));

        position += 2 + length;
    }

    Err(DecodeErrors::SofError(
        "No baseline frame header before end of image".to_string(),
    ))
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn probe_reads_sof0_dimensions()
    {
        // SOI, APP0 (minimal), SOF0 with height 0x0102 and width 0x0304
        let data = [
            0xFF, 0xD8, // SOI
            0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, // APP0
            0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x01, 0x02, 0x03, 0x04, 0x01, 0x01, 0x11, 0x00,
        ];

        let info = read_dimensions(&data).unwrap();

        assert_eq!(info.height, 0x0102);
        assert_eq!(info.width, 0x0304);
    }

    #[test]
    fn probe_rejects_missing_signature()
    {
        assert!(read_dimensions(&[0x00, 0x01, 0x02]).is_err());
        assert!(read_dimensions(&[0xFF]).is_err());
    }

    #[test]
    fn probe_rejects_eoi_before_frame()
    {
        let data = [0xFF, 0xD8, 0xFF, 0xD9, 0x00, 0x00];

        assert!(read_dimensions(&data).is_err());
    }
}
