//! jpeg565 — decode baseline JPEG straight to RGB565 rows
//!
//! A small baseline sequential JPEG decoder (SOF0, 8-bit precision,
//! Huffman-coded, grayscale or YCbCr) aimed at memory-constrained hosts:
//! pixels are produced one row at a time as packed 16-bit 5-6-5 RGB and
//! pushed through a caller-supplied sink, so the only allocation is a
//! buffer covering a single MCU row of output.
//!
//! ```no_run
//! let data = std::fs::read("photo.jpg").unwrap();
//!
//! // size things up front without decoding
//! let info = jpeg565::read_dimensions(&data).unwrap();
//! let mut framebuffer = vec![0u16; usize::from(info.width) * usize::from(info.height)];
//!
//! let mut decoder = jpeg565::Decoder::new();
//! decoder
//!     .decode_buffer(&data, |y, row| {
//!         let offset = y * usize::from(info.width);
//!         framebuffer[offset..offset + row.len()].copy_from_slice(row);
//!     })
//!     .unwrap();
//! ```
#![allow(clippy::needless_return, clippy::similar_names)]
#![warn(clippy::correctness, clippy::perf, clippy::pedantic)]
#[macro_use]
extern crate log;

pub use crate::decoder::{Decoder, ImageInfo};
pub use crate::errors::DecodeErrors;
pub use crate::probe::read_dimensions;

mod bitstream;
mod color_convert;
mod components;
mod decoder;
pub mod errors;
mod headers;
mod huffman;
mod idct;
mod marker;
mod mcu;
mod misc;
mod probe;
