//! The MCU engine
//!
//! Drives entropy decoding MCU by MCU, resynchronizes on restart markers,
//! upsamples chroma and converts finished MCU rows to RGB565 before handing
//! each pixel row to the caller's sink.

use crate::bitstream::BitStream;
use crate::color_convert::ycbcr_to_rgb565;
use crate::decoder::Decoder;
use crate::errors::DecodeErrors;
use crate::idct::idct_block;
use crate::misc::ByteReader;

/// Coefficients in one 8x8 block
pub(crate) const DCT_BLOCK: usize = 64;

/// Luma blocks per MCU, at most 2x2 for the supported sampling factors
const MAX_LUMA_BLOCKS: usize = 4;

impl Decoder
{
    /// Decode the entropy-coded scan and emit pixel rows.
    ///
    /// Iterates MCUs in raster order; one MCU is `luma_h * luma_v` Y blocks
    /// (raster order within the MCU) followed by one Cb and one Cr block
    /// for color images. Finished rows are delivered from a single row
    /// buffer holding one MCU row of RGB565 output, the only allocation
    /// this decoder makes.
    pub(crate) fn decode_mcu_rows<F>(
        &mut self, reader: &mut ByteReader, sink: &mut F,
    ) -> Result<(), DecodeErrors>
    where
        F: FnMut(usize, &[u16]),
    {
        let width = usize::from(self.info.width);
        let height = usize::from(self.info.height);
        let grayscale = self.info.components == 1;

        let (luma_h, luma_v) = if grayscale
        {
            (1, 1)
        }
        else
        {
            (
                self.components[0].horizontal_sample,
                self.components[0].vertical_sample,
            )
        };

        // nearest-neighbor chroma upsampling is a shift per axis
        let h_shift = usize::from(luma_h > 1);
        let v_shift = usize::from(luma_v > 1);

        let mut stream = BitStream::new();
        let mut row_buffer = vec![0_u16; width * self.mcu_height];

        let mut luma_blocks = [[0_u8; DCT_BLOCK]; MAX_LUMA_BLOCKS];
        let mut cb_block = [0_u8; DCT_BLOCK];
        let mut cr_block = [0_u8; DCT_BLOCK];

        self.restarts_left = self.restart_interval;
        self.next_restart = 0;

        for component in &mut self.components
        {
            component.dc_pred = 0;
        }

        for mcu_y in 0..self.mcu_y
        {
            row_buffer.fill(0);

            for mcu_x in 0..self.mcu_x
            {
                if self.restart_interval != 0
                {
                    if self.restarts_left == 0
                    {
                        self.handle_restart(reader, &mut stream);
                    }

                    self.restarts_left -= 1;
                }

                for v in 0..luma_v
                {
                    for h in 0..luma_h
                    {
                        self.decode_block(
                            reader,
                            &mut stream,
                            0,
                            &mut luma_blocks[v * luma_h + h],
                        )?;
                    }
                }

                if !grayscale
                {
                    self.decode_block(reader, &mut stream, 1, &mut cb_block)?;
                    self.decode_block(reader, &mut stream, 2, &mut cr_block)?;
                }

                // upsample and color convert this MCU into the row buffer,
                // skipping pixels that fall outside the image
                let px0 = mcu_x * self.mcu_width;

                for py in 0..self.mcu_height
                {
                    if mcu_y * self.mcu_height + py >= height
                    {
                        break;
                    }

                    for px in 0..self.mcu_width
                    {
                        let img_x = px0 + px;

                        if img_x >= width
                        {
                            break;
                        }

                        let (luma, cb, cr) = if grayscale
                        {
                            (luma_blocks[0][py * 8 + px], 128, 128)
                        }
                        else
                        {
                            let block = (py >> 3) * luma_h + (px >> 3);
                            let luma = luma_blocks[block][(py & 7) * 8 + (px & 7)];

                            let cx = px >> h_shift;
                            let cy = py >> v_shift;

                            (luma, cb_block[cy * 8 + cx], cr_block[cy * 8 + cx])
                        };

                        row_buffer[py * width + img_x] = ycbcr_to_rgb565(luma, cb, cr);
                    }
                }
            }

            // deliver the finished rows of this MCU row
            for py in 0..self.mcu_height
            {
                let img_y = mcu_y * self.mcu_height + py;

                if img_y >= height
                {
                    break;
                }

                sink(img_y, &row_buffer[py * width..(py + 1) * width]);
            }
        }

        debug!("Finished decoding image, {} MCU rows", self.mcu_y);

        Ok(())
    }

    /// Decode one 8x8 block of component `comp` into level-shifted pixels.
    fn decode_block(
        &mut self, reader: &mut ByteReader, stream: &mut BitStream, comp: usize,
        pixels: &mut [u8; DCT_BLOCK],
    ) -> Result<(), DecodeErrors>
    {
        let dc_index = self.components[comp].dc_huff_table;
        let ac_index = self.components[comp].ac_huff_table;
        let qt_index = self.components[comp].quantization_table_number;

        let dc_table = self.dc_huffman_tables[dc_index]
            .as_ref()
            .ok_or_else(|| {
                DecodeErrors::HuffmanDecode(format!("No DC table in slot {dc_index}"))
            })?;
        let ac_table = self.ac_huffman_tables[ac_index]
            .as_ref()
            .ok_or_else(|| {
                DecodeErrors::HuffmanDecode(format!("No AC table in slot {ac_index}"))
            })?;
        let qtable = self.qt_tables[qt_index]
            .as_ref()
            .ok_or_else(|| DecodeErrors::DqtError(format!("No quantization table in slot {qt_index}")))?;

        let mut block = [0_i16; DCT_BLOCK];
        let mut dc_pred = self.components[comp].dc_pred;

        stream.decode_block(reader, dc_table, ac_table, qtable, &mut block, &mut dc_pred)?;

        self.components[comp].dc_pred = dc_pred;

        idct_block(&mut block, pixels);

        Ok(())
    }

    /// Resynchronize at a restart boundary.
    ///
    /// Buffered bits are discarded, the cursor advances to just past the
    /// next `FF D0..D7` pair and the DC predictors start over. A missing
    /// marker leaves the cursor at the end of the stream, which the next
    /// block decode reports as an entropy error if blocks remain.
    fn handle_restart(&mut self, reader: &mut ByteReader, stream: &mut BitStream)
    {
        stream.reset();

        while let Some((byte, marker)) = reader.peek_pair()
        {
            if byte == 0xFF && (0xD0..=0xD7).contains(&marker)
            {
                reader.skip(2);

                let found = marker & 7;

                if found != self.next_restart
                {
                    warn!(
                        "Restart marker RST{} where RST{} was expected",
                        found, self.next_restart
                    );
                }

                break;
            }

            reader.skip(1);
        }

        for component in &mut self.components
        {
            component.dc_pred = 0;
        }

        self.restarts_left = self.restart_interval;
        self.next_restart = (self.next_restart + 1) & 7;
    }
}
