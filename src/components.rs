//! Per-component decode state
//!
//! The data is extracted from the SOF header; the Huffman table selectors
//! are filled in later by the SOS header.

use crate::errors::DecodeErrors;

/// Component data from the start of frame
#[derive(Clone)]
pub(crate) struct Components
{
    /// The plane this component carries, bound by scan position
    pub component_id: ComponentID,
    /// Sub-sampling ratio of this component in the x-plane
    pub horizontal_sample: usize,
    /// Sub-sampling ratio of this component in the y-plane
    pub vertical_sample: usize,
    /// Quantization table selector
    pub quantization_table_number: usize,
    /// DC Huffman table selector, set by SOS
    pub dc_huff_table: usize,
    /// AC Huffman table selector, set by SOS
    pub ac_huff_table: usize,
    /// DC predictor, the running DC value differences accumulate onto
    pub dc_pred: i16,
}

impl Components
{
    /// Create a component from its three SOF bytes and its position in the
    /// frame header.
    ///
    /// The declared component id (the first byte) is read and ignored:
    /// planes are bound positionally as Y, Cb, Cr in scan order. Encoders
    /// that declare them in another order will come out color-swapped,
    /// which matches how nearly every small decoder treats them.
    #[inline]
    pub fn from(data: [u8; 3], position: u8) -> Result<Components, DecodeErrors>
    {
        let component_id = match position
        {
            0 => ComponentID::Y,
            1 => ComponentID::Cb,
            _ => ComponentID::Cr,
        };

        let horizontal_sample = usize::from(data[1] >> 4);
        let vertical_sample = usize::from(data[1] & 0x0F);
        let quantization_table_number = usize::from(data[2]);

        if quantization_table_number > 1
        {
            return Err(DecodeErrors::SofError(format!(
                "Quantization table {quantization_table_number} for component {component_id:?}, only tables 0 and 1 are supported"
            )));
        }

        // Luma may be 1x1 up to 2x2, chroma planes must be 1x1; anything
        // else produces MCU shapes the engine does not iterate.
        let sample_limit = if position == 0 { 2 } else { 1 };

        if !(1..=sample_limit).contains(&horizontal_sample)
            || !(1..=sample_limit).contains(&vertical_sample)
        {
            return Err(DecodeErrors::SofError(format!(
                "Unsupported sampling factors {horizontal_sample}x{vertical_sample} for component {component_id:?}"
            )));
        }

        debug!(
            "Component {:?} sampling {}x{} quantization table {}",
            component_id, horizontal_sample, vertical_sample, quantization_table_number
        );

        Ok(Components {
            component_id,
            horizontal_sample,
            vertical_sample,
            quantization_table_number,
            // set when the scan header is parsed
            dc_huff_table: 0,
            ac_huff_table: 0,
            dc_pred: 0,
        })
    }
}

/// Component identifiers
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub(crate) enum ComponentID
{
    /// Luminance channel
    Y,
    /// Blue chrominance
    Cb,
    /// Red chrominance
    Cr,
}
