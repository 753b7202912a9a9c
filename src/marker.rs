//! JPEG marker bytes
//!
//! A marker is the byte following an `0xFF` in the stream, outside of the
//! entropy-coded data. The header walk dispatches on these.

/// Markers that may appear in a JPEG stream.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub(crate) enum Marker
{
    /// Start of image
    SOI,
    /// End of image
    EOI,
    /// Start of scan
    SOS,
    /// Define quantization table(s)
    DQT,
    /// Define Huffman table(s)
    DHT,
    /// Define restart interval
    DRI,
    /// Define arithmetic coding conditioning
    DAC,
    /// Define number of lines
    DNL,
    /// Comment
    COM,
    /// Temporary private use
    TEM,
    /// Start of frame, `n` is the low nibble of the marker byte
    SOF(u8),
    /// Restart marker, `n` in `0..=7`
    RST(u8),
    /// Application segment
    APP(u8),
}

impl Marker
{
    /// Identify the marker for a byte, `None` for reserved values.
    pub fn from_u8(byte: u8) -> Option<Marker>
    {
        match byte
        {
            0x01 => Some(Marker::TEM),
            // SOF0..SOF15, minus DHT(0xC4), JPG(0xC8) and DAC(0xCC) which
            // share the range
            0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF =>
            {
                Some(Marker::SOF(byte - 0xC0))
            }
            0xC4 => Some(Marker::DHT),
            0xCC => Some(Marker::DAC),
            0xD0..=0xD7 => Some(Marker::RST(byte & 7)),
            0xD8 => Some(Marker::SOI),
            0xD9 => Some(Marker::EOI),
            0xDA => Some(Marker::SOS),
            0xDB => Some(Marker::DQT),
            0xDC => Some(Marker::DNL),
            0xDD => Some(Marker::DRI),
            0xE0..=0xEF => Some(Marker::APP(byte - 0xE0)),
            0xFE => Some(Marker::COM),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn known_markers_resolve()
    {
        assert_eq!(Marker::from_u8(0xC0), Some(Marker::SOF(0)));
        assert_eq!(Marker::from_u8(0xC2), Some(Marker::SOF(2)));
        assert_eq!(Marker::from_u8(0xC4), Some(Marker::DHT));
        assert_eq!(Marker::from_u8(0xD3), Some(Marker::RST(3)));
        assert_eq!(Marker::from_u8(0xDA), Some(Marker::SOS));
        assert_eq!(Marker::from_u8(0xE1), Some(Marker::APP(1)));
    }

    #[test]
    fn reserved_bytes_do_not_resolve()
    {
        assert_eq!(Marker::from_u8(0x00), None);
        assert_eq!(Marker::from_u8(0xC8), None);
        assert_eq!(Marker::from_u8(0xFF), None);
    }
}
