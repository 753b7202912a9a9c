#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
//! Decode JPEG marker segments
//!
//! Each parser is handed the decoder state and the byte cursor positioned
//! just past the two marker bytes. Segment length fields are big-endian
//! and include their own two bytes.
//!
//! A good guide on markers can be found
//! [here](http://vip.sugovica.hu/Sardi/kepnezo/JPEG%20File%20Layout%20and%20Format.htm)

use crate::components::Components;
use crate::decoder::Decoder;
use crate::errors::DecodeErrors;
use crate::huffman::HuffmanTable;
use crate::idct::prescale_quantization_table;
use crate::misc::ByteReader;

/// **B.2.4.2 Huffman table-specification syntax**
///
/// A single DHT marker may carry multiple tables.
pub(crate) fn parse_huffman(
    decoder: &mut Decoder, reader: &mut ByteReader,
) -> Result<(), DecodeErrors>
{
    let dht_length = i32::from(segment_length(reader, "DHT")?) - 2;

    let mut length_read = 0;

    while length_read < dht_length
    {
        let ht_info = reader.get_u8();

        // bit 4 tells DC from AC, the low nibble is the destination slot
        let dc_or_ac = (ht_info >> 4) & 0x01;
        let index = usize::from(ht_info & 0x0F);

        if index > 1
        {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "Huffman table id {index}, only ids 0 and 1 are supported"
            )));
        }

        let mut counts = [0_u8; 16];

        for count in &mut counts
        {
            *count = reader.get_u8();
        }

        let symbols_sum: u16 = counts.iter().map(|&count| u16::from(count)).sum();

        if symbols_sum > 256
        {
            return Err(DecodeErrors::HuffmanDecode(
                "Encountered Huffman table with excessive length in DHT".to_string(),
            ));
        }

        let mut symbols = [0_u8; 256];

        for symbol in &mut symbols[..usize::from(symbols_sum)]
        {
            *symbol = reader.get_u8();
        }

        debug!(
            "DHT: {} table {} with {} symbols",
            if dc_or_ac == 0 { "DC" } else { "AC" },
            index,
            symbols_sum
        );

        let table = HuffmanTable::new(&counts, &symbols[..usize::from(symbols_sum)]);

        if dc_or_ac == 0
        {
            decoder.dc_huffman_tables[index] = Some(table);
        }
        else
        {
            decoder.ac_huffman_tables[index] = Some(table);
        }

        length_read += 17 + i32::from(symbols_sum);
    }

    Ok(())
}

/// **B.2.4.1 Quantization table-specification syntax**
///
/// Tables are stored in zig-zag order and are pre-scaled for the Winograd
/// IDCT as soon as they are read.
pub(crate) fn parse_dqt(decoder: &mut Decoder, reader: &mut ByteReader) -> Result<(), DecodeErrors>
{
    let mut length_left = i32::from(segment_length(reader, "DQT")?) - 2;

    while length_left > 0
    {
        let qt_info = reader.get_u8();

        // top nibble precision (0 = 8 bit, 1 = 16 bit), low nibble slot
        let precision = qt_info >> 4;
        let table_position = usize::from(qt_info & 0x0F);

        if table_position > 1
        {
            return Err(DecodeErrors::DqtError(format!(
                "Quantization table id {table_position}, only ids 0 and 1 are supported"
            )));
        }

        if precision > 1
        {
            return Err(DecodeErrors::DqtError(format!(
                "Expected precision value of either 0 or 1, found {precision}"
            )));
        }

        let mut table = [0_i16; 64];

        for value in &mut table
        {
            *value = if precision == 0
            {
                i16::from(reader.get_u8())
            }
            else
            {
                reader.get_u16_be() as i16
            };
        }

        prescale_quantization_table(&mut table);

        decoder.qt_tables[table_position] = Some(table);

        debug!("DQT: table {} precision {}", table_position, precision);

        length_left -= 65 + i32::from(precision) * 64;
    }

    Ok(())
}

/// **B.2.2 Frame header syntax**
pub(crate) fn parse_start_of_frame(
    decoder: &mut Decoder, reader: &mut ByteReader,
) -> Result<(), DecodeErrors>
{
    let length = segment_length(reader, "SOF")?;

    // only 8-bit sample precision is supported
    let precision = reader.get_u8();

    if precision != 8
    {
        return Err(DecodeErrors::SofError(format!(
            "The decoder can only handle 8-bit images, the image has {precision} bits of precision"
        )));
    }

    let height = reader.get_u16_be();
    let width = reader.get_u16_be();

    if width == 0 || height == 0
    {
        return Err(DecodeErrors::ZeroError);
    }

    let num_components = reader.get_u8();

    if num_components != 1 && num_components != 3
    {
        return Err(DecodeErrors::SofError(format!(
            "Expected 1 (grayscale) or 3 (YCbCr) components, found {num_components}"
        )));
    }

    if length != u16::from(8 + 3 * num_components)
    {
        return Err(DecodeErrors::SofError(format!(
            "Length of start of frame differs from expected {}, value is {length}",
            8 + 3 * num_components
        )));
    }

    decoder.info.set_width(width);
    decoder.info.set_height(height);
    decoder.info.components = num_components;

    let mut components = Vec::with_capacity(usize::from(num_components));

    for position in 0..num_components
    {
        let bytes = [reader.get_u8(), reader.get_u8(), reader.get_u8()];

        components.push(Components::from(bytes, position)?);
    }

    // MCU geometry: grayscale is always one 8x8 block per MCU, color MCUs
    // follow the luma sampling factors
    if num_components == 1
    {
        decoder.mcu_width = 8;
        decoder.mcu_height = 8;
    }
    else
    {
        decoder.mcu_width = components[0].horizontal_sample * 8;
        decoder.mcu_height = components[0].vertical_sample * 8;
    }

    decoder.mcu_x = (usize::from(width) + decoder.mcu_width - 1) / decoder.mcu_width;
    decoder.mcu_y = (usize::from(height) + decoder.mcu_height - 1) / decoder.mcu_height;

    decoder.components = components;

    debug!(
        "SOF0: {}x{} pixels, {} components, {}x{} MCUs of {}x{}",
        width,
        height,
        num_components,
        decoder.mcu_x,
        decoder.mcu_y,
        decoder.mcu_width,
        decoder.mcu_height
    );

    Ok(())
}

/// **B.2.3 Scan header syntax**
pub(crate) fn parse_sos(decoder: &mut Decoder, reader: &mut ByteReader) -> Result<(), DecodeErrors>
{
    let ls = segment_length(reader, "SOS")?;

    // number of image components in the scan
    let ns = reader.get_u8();

    if ls != u16::from(6 + 2 * ns)
    {
        return Err(DecodeErrors::SosError(
            "Bad SOS length, corrupt jpeg".to_string(),
        ));
    }

    if usize::from(ns) != decoder.components.len()
    {
        return Err(DecodeErrors::SosError(format!(
            "Scan has {ns} components but the frame declared {}, interleaved single-scan images only",
            decoder.components.len()
        )));
    }

    for i in 0..usize::from(ns)
    {
        // component selector, positional binding means the value is unused
        let _ = reader.get_u8();

        // top nibble DC table, low nibble AC table
        let tables = reader.get_u8();

        let dc_table = usize::from(tables >> 4);
        let ac_table = usize::from(tables & 0x0F);

        if dc_table > 1 || ac_table > 1
        {
            return Err(DecodeErrors::SosError(format!(
                "Huffman table selectors DC {dc_table} AC {ac_table}, only ids 0 and 1 are supported"
            )));
        }

        decoder.components[i].dc_huff_table = dc_table;
        decoder.components[i].ac_huff_table = ac_table;
    }

    // spectral selection and successive approximation, read and ignored in
    // a baseline scan
    reader.skip(3);

    Ok(())
}

/// **B.2.4.4 Restart interval definition syntax**
pub(crate) fn parse_dri(decoder: &mut Decoder, reader: &mut ByteReader) -> Result<(), DecodeErrors>
{
    let length = segment_length(reader, "DRI")?;

    if length != 4
    {
        return Err(DecodeErrors::Format(format!(
            "DRI segment length should be 4, found {length}"
        )));
    }

    decoder.restart_interval = reader.get_u16_be();

    debug!("DRI: restart interval {} MCUs", decoder.restart_interval);

    Ok(())
}

/// Skip over a segment the decoder has no use for.
pub(crate) fn skip_marker(reader: &mut ByteReader) -> Result<(), DecodeErrors>
{
    let length = segment_length(reader, "segment")?;

    reader.skip(usize::from(length) - 2);

    Ok(())
}

/// Read a segment length field, rejecting lengths too short to contain
/// themselves.
fn segment_length(reader: &mut ByteReader, segment: &str) -> Result<u16, DecodeErrors>
{
    let length = reader.get_u16_be();

    if length < 2
    {
        return Err(DecodeErrors::Format(format!(
            "Inconsistent {segment} length field {length}"
        )));
    }

    Ok(length)
}
