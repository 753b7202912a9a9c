//! Helpers for assembling synthetic JPEG streams in memory.
//!
//! The decoder reads byte slices, so tests build tiny but fully valid
//! streams directly instead of shipping binary fixtures; every expected
//! pixel value below is then exact.
#![allow(dead_code)]

/// Quantization table of all ones, stored in zig-zag order.
pub const QT_UNIT: [u8; 64] = [1; 64];

/// DC table: 2-bit codes `00` -> category 0, `01` -> category 7,
/// `10` -> category 4.
pub const DC_SYMBOLS: [u8; 3] = [0x00, 0x07, 0x04];

/// AC table: 2-bit codes `00` -> EOB, `01` -> ZRL, `10` -> (run 0, size 1),
/// `11` -> (run 15, size 1).
pub const AC_SYMBOLS: [u8; 4] = [0x00, 0xF0, 0x01, 0xF1];

pub fn dc_counts() -> [u8; 16]
{
    let mut counts = [0; 16];
    counts[1] = DC_SYMBOLS.len() as u8;
    counts
}

pub fn ac_counts() -> [u8; 16]
{
    let mut counts = [0; 16];
    counts[1] = AC_SYMBOLS.len() as u8;
    counts
}

/// Pack a gray level the way the decoder does.
pub fn gray565(v: u8) -> u16
{
    let v = u16::from(v);
    ((v & 0xF8) << 8) | ((v & 0xFC) << 3) | (v >> 3)
}

/// MSB-first bit assembler for entropy-coded data, with `FF 00` byte
/// stuffing and 1-bit padding to the final byte boundary.
pub struct BitWriter
{
    bytes: Vec<u8>,
    acc:   u8,
    used:  u8,
}

impl BitWriter
{
    pub fn new() -> BitWriter
    {
        BitWriter {
            bytes: vec![],
            acc:   0,
            used:  0,
        }
    }

    /// Append the low `count` bits of `value`, most significant first.
    pub fn put(&mut self, value: u16, count: u8)
    {
        for i in (0..count).rev()
        {
            let bit = ((value >> i) & 1) as u8;

            self.acc = (self.acc << 1) | bit;
            self.used += 1;

            if self.used == 8
            {
                self.flush_byte();
            }
        }
    }

    /// DC coefficient with a zero difference: category-0 code plus nothing.
    pub fn dc_zero(&mut self)
    {
        self.put(0b00, 2);
    }

    /// DC difference of +64: category-7 code, then the 7 value bits.
    pub fn dc_diff_64(&mut self)
    {
        self.put(0b01, 2);
        self.put(64, 7);
    }

    /// End of block.
    pub fn eob(&mut self)
    {
        self.put(0b00, 2);
    }

    /// Zero run length, sixteen zero AC coefficients.
    pub fn zrl(&mut self)
    {
        self.put(0b01, 2);
    }

    fn flush_byte(&mut self)
    {
        self.bytes.push(self.acc);

        if self.acc == 0xFF
        {
            self.bytes.push(0x00);
        }

        self.acc = 0;
        self.used = 0;
    }

    /// Pad the last partial byte with one-bits and return the stuffed
    /// stream.
    pub fn finish(mut self) -> Vec<u8>
    {
        if self.used > 0
        {
            while self.used < 8
            {
                self.acc = (self.acc << 1) | 1;
                self.used += 1;
            }

            self.flush_byte();
        }

        self.bytes
    }
}

/// Assembles marker segments around entropy data.
pub struct JpegBuilder
{
    bytes: Vec<u8>,
}

impl JpegBuilder
{
    pub fn new() -> JpegBuilder
    {
        JpegBuilder {
            bytes: vec![0xFF, 0xD8],
        }
    }

    fn push_u16(&mut self, value: u16)
    {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    /// An arbitrary marker segment with a correct length field.
    pub fn segment(mut self, marker: u8, payload: &[u8]) -> Self
    {
        self.bytes.extend_from_slice(&[0xFF, marker]);
        self.push_u16(2 + payload.len() as u16);
        self.bytes.extend_from_slice(payload);
        self
    }

    /// 8-bit precision quantization table in zig-zag order.
    pub fn dqt(mut self, id: u8, values: &[u8; 64]) -> Self
    {
        self.bytes.extend_from_slice(&[0xFF, 0xDB]);
        self.push_u16(2 + 65);
        self.bytes.push(id);
        self.bytes.extend_from_slice(values);
        self
    }

    /// Huffman table, `class` 0 for DC and 1 for AC.
    pub fn dht(mut self, class: u8, id: u8, counts: &[u8; 16], symbols: &[u8]) -> Self
    {
        self.bytes.extend_from_slice(&[0xFF, 0xC4]);
        self.push_u16(2 + 1 + 16 + symbols.len() as u16);
        self.bytes.push((class << 4) | id);
        self.bytes.extend_from_slice(counts);
        self.bytes.extend_from_slice(symbols);
        self
    }

    /// Baseline frame header; `components` are `(sampling byte, qt id)`.
    pub fn sof0(mut self, width: u16, height: u16, components: &[(u8, u8)]) -> Self
    {
        self.bytes.extend_from_slice(&[0xFF, 0xC0]);
        self.push_u16(8 + 3 * components.len() as u16);
        self.bytes.push(8);
        self.push_u16(height);
        self.push_u16(width);
        self.bytes.push(components.len() as u8);

        for (i, &(sampling, qt)) in components.iter().enumerate()
        {
            self.bytes.push(i as u8 + 1);
            self.bytes.push(sampling);
            self.bytes.push(qt);
        }

        self
    }

    /// Restart interval definition.
    pub fn dri(mut self, interval: u16) -> Self
    {
        self.bytes.extend_from_slice(&[0xFF, 0xDD]);
        self.push_u16(4);
        self.push_u16(interval);
        self
    }

    /// Scan header; `tables` are `(dc id, ac id)` per component.
    pub fn sos(mut self, tables: &[(u8, u8)]) -> Self
    {
        self.bytes.extend_from_slice(&[0xFF, 0xDA]);
        self.push_u16(6 + 2 * tables.len() as u16);
        self.bytes.push(tables.len() as u8);

        for (i, &(dc, ac)) in tables.iter().enumerate()
        {
            self.bytes.push(i as u8 + 1);
            self.bytes.push((dc << 4) | ac);
        }

        // spectral selection 0..63, no successive approximation
        self.bytes.extend_from_slice(&[0, 63, 0]);
        self
    }

    /// Raw bytes, e.g. finished entropy data.
    pub fn raw(mut self, bytes: &[u8]) -> Self
    {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// A restart marker `RSTn`.
    pub fn rst(mut self, n: u8) -> Self
    {
        self.bytes.extend_from_slice(&[0xFF, 0xD0 + n]);
        self
    }

    /// Terminate with EOI and return the stream.
    pub fn eoi(mut self) -> Vec<u8>
    {
        self.bytes.extend_from_slice(&[0xFF, 0xD9]);
        self.bytes
    }

    /// Return the stream without an EOI, for truncation tests.
    pub fn truncated(self) -> Vec<u8>
    {
        self.bytes
    }
}

/// A grayscale image with the shared test tables, ready for entropy data.
pub fn gray_image(width: u16, height: u16) -> JpegBuilder
{
    JpegBuilder::new()
        .dqt(0, &QT_UNIT)
        .dht(0, 0, &dc_counts(), &DC_SYMBOLS)
        .dht(1, 0, &ac_counts(), &AC_SYMBOLS)
        .sof0(width, height, &[(0x11, 0)])
        .sos(&[(0, 0)])
}

/// Collect `(row index, pixels)` pairs from a decode.
pub fn collect_rows(data: &[u8]) -> Result<Vec<(usize, Vec<u16>)>, jpeg565::DecodeErrors>
{
    let mut rows = vec![];
    let mut decoder = jpeg565::Decoder::new();

    decoder.decode_buffer(data, |y, row| rows.push((y, row.to_vec())))?;

    Ok(rows)
}
