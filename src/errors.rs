//! Errors that may be encountered while decoding a JPEG stream
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

use crate::misc::{
    START_OF_FRAME_EXT_AR, START_OF_FRAME_EXT_SEQ, START_OF_FRAME_LOS_SEQ,
    START_OF_FRAME_LOS_SEQ_AR, START_OF_FRAME_PROG_DCT, START_OF_FRAME_PROG_DCT_AR,
};

/// Common decode errors
///
/// The public entry points collapse to a simple pass/fail boundary; callers
/// that want to know why a stream was rejected can match on these.
#[allow(clippy::module_name_repetitions)]
pub enum DecodeErrors
{
    /// The stream does not start with `FF D8`
    IllegalMagicBytes(u16),
    /// A malformed segment or stream structure problem
    Format(String),
    /// Problems with Huffman tables or the entropy-coded data
    HuffmanDecode(String),
    /// Quantization table errors
    DqtError(String),
    /// Start of frame errors
    SofError(String),
    /// Start of scan errors
    SosError(String),
    /// The image uses an encoding scheme this decoder does not support
    Unsupported(UnsupportedSchemes),
    /// The stream ended before a complete scan was seen
    ExhaustedData,
    /// Image width or height is zero
    ZeroError,
}

impl Display for DecodeErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match &self
        {
            Self::IllegalMagicBytes(bytes) =>
            {
                write!(f, "Error parsing image. Illegal start bytes:{bytes:#06x}")
            }
            Self::Format(reason) => write!(f, "Error parsing image. Reason:{reason}"),
            Self::HuffmanDecode(reason) =>
            {
                write!(f, "Error decoding huffman data. Reason:{reason}")
            }
            Self::DqtError(reason) => write!(f, "Error parsing DQT segment. Reason:{reason}"),
            Self::SofError(reason) => write!(f, "Error parsing SOF segment. Reason:{reason}"),
            Self::SosError(reason) => write!(f, "Error parsing SOS segment. Reason:{reason}"),
            Self::Unsupported(scheme) => write!(f, "{scheme:?}"),
            Self::ExhaustedData => write!(f, "Stream ended before the scan was complete"),
            Self::ZeroError => write!(f, "Image width or height is set to zero, cannot continue"),
        }
    }
}

impl Debug for DecodeErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        Display::fmt(self, f)
    }
}

impl Error for DecodeErrors {}

/// Encoding schemes a baseline-only decoder rejects outright.
#[derive(Eq, PartialEq, Copy, Clone)]
pub enum UnsupportedSchemes
{
    /// SOF1, extended sequential DCT, Huffman coding
    ExtendedSequentialHuffman,
    /// SOF2, progressive DCT, Huffman coding
    ProgressiveDctHuffman,
    /// SOF3, lossless sequential, Huffman coding
    LosslessHuffman,
    /// SOF9, extended sequential DCT, arithmetic coding
    ExtendedSequentialDctArithmetic,
    /// SOF10, progressive DCT, arithmetic coding
    ProgressiveDctArithmetic,
    /// SOF11, lossless sequential, arithmetic coding
    LosslessArithmetic,
}

impl Debug for UnsupportedSchemes
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        let scheme = match self
        {
            Self::ExtendedSequentialHuffman => "extended sequential, Huffman coding",
            Self::ProgressiveDctHuffman => "progressive, Huffman coding",
            Self::LosslessHuffman => "lossless sequential, Huffman coding",
            Self::ExtendedSequentialDctArithmetic => "extended sequential, arithmetic coding",
            Self::ProgressiveDctArithmetic => "progressive, arithmetic coding",
            Self::LosslessArithmetic => "lossless sequential, arithmetic coding",
        };

        write!(
            f,
            "The decoder handles baseline sequential images only, cannot decode {scheme}"
        )
    }
}

impl UnsupportedSchemes
{
    /// Map a start-of-frame marker value to the scheme it announces.
    #[must_use]
    pub fn from_int(int: u16) -> Option<UnsupportedSchemes>
    {
        match int
        {
            START_OF_FRAME_PROG_DCT => Some(Self::ProgressiveDctHuffman),
            START_OF_FRAME_PROG_DCT_AR => Some(Self::ProgressiveDctArithmetic),
            START_OF_FRAME_LOS_SEQ => Some(Self::LosslessHuffman),
            START_OF_FRAME_LOS_SEQ_AR => Some(Self::LosslessArithmetic),
            START_OF_FRAME_EXT_SEQ => Some(Self::ExtendedSequentialHuffman),
            START_OF_FRAME_EXT_AR => Some(Self::ExtendedSequentialDctArithmetic),
            _ => None,
        }
    }
}
