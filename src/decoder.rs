//! Main decoder state and the public decode entry point
#![allow(clippy::doc_markdown)]

use crate::components::Components;
use crate::errors::{DecodeErrors, UnsupportedSchemes};
use crate::headers::{
    parse_dqt, parse_dri, parse_huffman, parse_sos, parse_start_of_frame, skip_marker,
};
use crate::huffman::HuffmanTable;
use crate::marker::Marker;
use crate::misc::{ByteReader, START_OF_FRAME_BASE};

/// Quantization and Huffman table slots the decoder keeps, ids 0 and 1
pub(crate) const MAX_TABLES: usize = 2;

/// A baseline JPEG decoder producing RGB565 rows.
///
/// One decode occupies the calling thread from entry to return; rows are
/// handed to the sink synchronously, in strictly increasing order, and the
/// row slice is only valid for the duration of the call.
///
/// # Example
/// ```no_run
/// let data = std::fs::read("image.jpg").unwrap();
/// let mut decoder = jpeg565::Decoder::new();
/// let mut pixels = vec![];
///
/// decoder
///     .decode_buffer(&data, |_y, row| pixels.extend_from_slice(row))
///     .unwrap();
/// ```
pub struct Decoder
{
    /// Image information from the frame header
    pub(crate) info: ImageInfo,
    /// Pre-scaled quantization tables
    pub(crate) qt_tables: [Option<[i16; 64]>; MAX_TABLES],
    /// DC Huffman tables
    pub(crate) dc_huffman_tables: [Option<HuffmanTable>; MAX_TABLES],
    /// AC Huffman tables
    pub(crate) ac_huffman_tables: [Option<HuffmanTable>; MAX_TABLES],
    /// Per-component state, in scan order
    pub(crate) components: Vec<Components>,

    /// MCU width in pixels, 8 or 16
    pub(crate) mcu_width: usize,
    /// MCU height in pixels, 8 or 16
    pub(crate) mcu_height: usize,
    /// Number of MCUs across
    pub(crate) mcu_x: usize,
    /// Number of MCUs down
    pub(crate) mcu_y: usize,

    /// MCUs between restart markers, zero when restarts are disabled
    pub(crate) restart_interval: u16,
    /// MCUs left before the next expected restart marker
    pub(crate) restarts_left: u16,
    /// Low nibble of the next expected restart marker, wraps at 8
    pub(crate) next_restart: u8,
}

impl Default for Decoder
{
    fn default() -> Self
    {
        Decoder {
            info: ImageInfo::default(),
            qt_tables: [None, None],
            dc_huffman_tables: [None, None],
            ac_huffman_tables: [None, None],
            components: vec![],
            mcu_width: 0,
            mcu_height: 0,
            mcu_x: 0,
            mcu_y: 0,
            restart_interval: 0,
            restarts_left: 0,
            next_restart: 0,
        }
    }
}

impl Decoder
{
    /// Create a new decoder instance
    #[must_use]
    pub fn new() -> Decoder
    {
        Decoder::default()
    }

    /// Decode a JPEG stream already in memory, handing each finished pixel
    /// row to `sink` as `(row index, RGB565 samples)`.
    ///
    /// The sink is called exactly `height` times on success, with row
    /// indices increasing from zero; the slice holds `width` samples and
    /// must be copied if it is to outlive the call. Rows delivered before
    /// a failure are not revoked.
    ///
    /// # Errors
    /// Any structural, unsupported-feature or entropy problem in the
    /// stream; see [`DecodeErrors`].
    pub fn decode_buffer<F>(&mut self, buf: &[u8], mut sink: F) -> Result<(), DecodeErrors>
    where
        F: FnMut(usize, &[u16]),
    {
        self.reset();

        let mut reader = ByteReader::new(buf);

        self.decode_headers(&mut reader)?;
        self.check_tables()?;
        self.decode_mcu_rows(&mut reader, &mut sink)
    }

    /// Returns the image information parsed from the frame header.
    ///
    /// `None` until a decode has progressed past the frame header.
    #[must_use]
    pub fn info(&self) -> Option<ImageInfo>
    {
        if self.info.width == 0
        {
            return None;
        }

        Some(self.info.clone())
    }

    /// Image width in pixels, zero before a decode
    #[must_use]
    pub fn width(&self) -> u16
    {
        self.info.width
    }

    /// Image height in pixels, zero before a decode
    #[must_use]
    pub fn height(&self) -> u16
    {
        self.info.height
    }

    /// Drop state a previous decode may have left behind.
    fn reset(&mut self)
    {
        *self = Decoder::default();
    }

    /// Walk the marker segments up to and including the start of scan.
    ///
    /// The walk requires SOI first, then dispatches on each marker found
    /// after an `0xFF` (skipping fill bytes) until SOS hands over to the
    /// entropy decoder.
    fn decode_headers(&mut self, reader: &mut ByteReader) -> Result<(), DecodeErrors>
    {
        let magic_bytes = reader.get_u16_be();

        if magic_bytes != 0xFFD8
        {
            return Err(DecodeErrors::IllegalMagicBytes(magic_bytes));
        }

        while reader.has_more()
        {
            let mut byte = reader.get_u8();

            if byte != 0xFF
            {
                continue;
            }

            // skip fill bytes
            while byte == 0xFF
            {
                byte = reader.get_u8();
            }

            // a stuffed zero is not a marker
            if byte == 0x00
            {
                continue;
            }

            match Marker::from_u8(byte)
            {
                Some(Marker::SOF(0)) =>
                {
                    parse_start_of_frame(self, reader)?;
                }
                Some(Marker::SOF(version)) =>
                {
                    let marker_value = START_OF_FRAME_BASE + u16::from(version);

                    return match UnsupportedSchemes::from_int(marker_value)
                    {
                        Some(scheme) => Err(DecodeErrors::Unsupported(scheme)),
                        None => Err(DecodeErrors::Format(format!(
                            "Unsupported start of frame marker {marker_value:#06x}"
                        ))),
                    };
                }
                Some(Marker::DHT) =>
                {
                    parse_huffman(self, reader)?;
                }
                Some(Marker::DQT) =>
                {
                    parse_dqt(self, reader)?;
                }
                Some(Marker::DRI) =>
                {
                    parse_dri(self, reader)?;
                }
                Some(Marker::SOS) =>
                {
                    if self.components.is_empty()
                    {
                        return Err(DecodeErrors::SosError(
                            "Start of scan before a frame header".to_string(),
                        ));
                    }

                    parse_sos(self, reader)?;

                    // entropy-coded data follows
                    return Ok(());
                }
                Some(Marker::EOI) =>
                {
                    return Err(DecodeErrors::Format(
                        "End of image reached before a scan was seen".to_string(),
                    ));
                }
                Some(Marker::SOI | Marker::TEM | Marker::RST(_)) =>
                {
                    // standalone markers with no payload, nothing to skip
                    warn!("Stray standalone marker {byte:#04x} between segments");
                }
                Some(marker) =>
                {
                    debug!("Skipping {marker:?} segment");
                    skip_marker(reader)?;
                }
                None =>
                {
                    warn!("Unknown marker {byte:#04x}, skipping by length");
                    skip_marker(reader)?;
                }
            }
        }

        Err(DecodeErrors::ExhaustedData)
    }

    /// Confirm every table the scan references was actually defined,
    /// before the hot loop starts leaning on them.
    fn check_tables(&self) -> Result<(), DecodeErrors>
    {
        for component in &self.components
        {
            if self.qt_tables[component.quantization_table_number].is_none()
            {
                return Err(DecodeErrors::DqtError(format!(
                    "No quantization table for component {:?}",
                    component.component_id
                )));
            }

            if self.dc_huffman_tables[component.dc_huff_table].is_none()
            {
                return Err(DecodeErrors::HuffmanDecode(format!(
                    "No DC table for component {:?}",
                    component.component_id
                )));
            }

            if self.ac_huffman_tables[component.ac_huff_table].is_none()
            {
                return Err(DecodeErrors::HuffmanDecode(format!(
                    "No AC table for component {:?}",
                    component.component_id
                )));
            }
        }

        Ok(())
    }
}

/// Image information from the frame header
#[derive(Default, Clone, Eq, PartialEq, Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct ImageInfo
{
    /// Width of the image
    pub width: u16,
    /// Height of the image
    pub height: u16,
    /// Number of components, 1 (grayscale) or 3 (YCbCr)
    pub components: u8,
}

impl ImageInfo
{
    /// Set width of the image
    pub(crate) fn set_width(&mut self, width: u16)
    {
        self.width = width;
    }

    /// Set height of the image
    pub(crate) fn set_height(&mut self, height: u16)
    {
        self.height = height;
    }
}
