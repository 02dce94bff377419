// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! A minimal baseline JPEG writer used to build test inputs for the decoder.
//!
//! It writes exactly the segments a test asks for, in the order it asks for
//! them, so tests can produce both valid files and deliberately broken ones.

/// Zigzag position -> natural (row-major) position.
pub const ZIGZAG: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, //
    17, 24, 32, 25, 18, 11, 4, 5, //
    12, 19, 26, 33, 40, 48, 41, 34, //
    27, 20, 13, 6, 7, 14, 21, 28, //
    35, 42, 49, 56, 57, 50, 43, 36, //
    29, 22, 15, 23, 30, 37, 44, 51, //
    58, 59, 52, 45, 38, 31, 39, 46, //
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// A DHT table description: how many codes of each length, then the symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanSpec {
    pub counts: [u8; 16],
    pub symbols: Vec<u8>,
}

impl HuffmanSpec {
    pub fn new(counts: [u8; 16], symbols: Vec<u8>) -> HuffmanSpec {
        let total: usize = counts.iter().map(|&c| c as usize).sum();
        assert_eq!(total, symbols.len(), "counts do not match symbol list");
        HuffmanSpec { counts, symbols }
    }

    /// Puts every symbol at the same code length, leaving the all-ones code unused.
    pub fn flat(symbols: &[u8]) -> HuffmanSpec {
        assert!(!symbols.is_empty() && symbols.len() < 256);
        let mut len = 1;
        while (1usize << len) < symbols.len() + 1 {
            len += 1;
        }
        let mut counts = [0u8; 16];
        counts[len - 1] = symbols.len() as u8;
        HuffmanSpec::new(counts, symbols.to_vec())
    }

    /// DC table covering every magnitude category of 8-bit baseline data.
    pub fn dc_default() -> HuffmanSpec {
        HuffmanSpec::flat(&(0..=11).collect::<Vec<u8>>())
    }

    /// AC table covering every run/size pair of 8-bit baseline data, plus EOB and ZRL.
    pub fn ac_default() -> HuffmanSpec {
        let mut symbols = vec![0x00, 0xf0];
        for run in 0..16u8 {
            for size in 1..=10u8 {
                symbols.push((run << 4) | size);
            }
        }
        HuffmanSpec::flat(&symbols)
    }

    /// The luminance DC table from ITU-T T.81 Annex K.3.
    pub fn dc_luminance() -> HuffmanSpec {
        HuffmanSpec::new(
            [0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0],
            (0..=11).collect(),
        )
    }

    /// Canonical code assignment: `(symbol, code, length)` in table order.
    pub fn codes(&self) -> Vec<(u8, u16, u8)> {
        let mut out = Vec::with_capacity(self.symbols.len());
        let mut code = 0u32;
        let mut k = 0;
        for (i, &count) in self.counts.iter().enumerate() {
            for _ in 0..count {
                out.push((self.symbols[k], code as u16, i as u8 + 1));
                code += 1;
                k += 1;
            }
            code <<= 1;
        }
        out
    }

    pub fn code_for(&self, symbol: u8) -> (u16, u8) {
        self.codes()
            .into_iter()
            .find(|&(s, _, _)| s == symbol)
            .map(|(_, code, len)| (code, len))
            .unwrap_or_else(|| panic!("symbol {symbol:#04x} is not in the table"))
    }

    /// DHT payload bytes for this table (without marker or length).
    pub fn dht_payload(&self, class: u8, id: u8) -> Vec<u8> {
        let mut out = vec![(class << 4) | id];
        out.extend_from_slice(&self.counts);
        out.extend_from_slice(&self.symbols);
        out
    }
}

/// MSB-first bit packer with JPEG byte stuffing.
#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    acc: u32,
    nbits: u32,
}

impl BitWriter {
    pub fn new() -> BitWriter {
        BitWriter::default()
    }

    pub fn write(&mut self, value: u32, nbits: u8) {
        for i in (0..nbits).rev() {
            self.acc = (self.acc << 1) | ((value >> i) & 1);
            self.nbits += 1;
            if self.nbits == 8 {
                self.push_byte(self.acc as u8);
                self.acc = 0;
                self.nbits = 0;
            }
        }
    }

    fn push_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
        if byte == 0xff {
            self.bytes.push(0x00);
        }
    }

    /// Pads the last byte with one bits.
    pub fn flush(&mut self) {
        if self.nbits > 0 {
            let pad = 8 - self.nbits;
            self.write((1 << pad) - 1, pad as u8);
        }
    }

    /// Appends bytes verbatim, after flushing. Used for markers.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.flush();
        self.bytes.extend_from_slice(bytes);
    }

    pub fn into_bytes(mut self) -> Vec<u8> {
        self.flush();
        self.bytes
    }
}

/// Number of bits needed for the magnitude of `value`.
pub fn magnitude_category(value: i32) -> u8 {
    (32 - value.unsigned_abs().leading_zeros()) as u8
}

/// The raw bits JPEG stores for `value` in its magnitude category.
pub fn magnitude_bits(value: i32) -> u32 {
    if value >= 0 {
        value as u32
    } else {
        (value - 1) as u32 & ((1u32 << magnitude_category(value)) - 1)
    }
}

/// Entropy coder for baseline blocks.
#[derive(Debug, Default)]
pub struct EntropyEncoder {
    bits: BitWriter,
}

impl EntropyEncoder {
    pub fn new() -> EntropyEncoder {
        EntropyEncoder::default()
    }

    pub fn write_symbol(&mut self, table: &HuffmanSpec, symbol: u8) {
        let (code, len) = table.code_for(symbol);
        self.bits.write(code as u32, len);
    }

    fn write_value(&mut self, value: i32) {
        let size = magnitude_category(value);
        if size > 0 {
            self.bits.write(magnitude_bits(value), size);
        }
    }

    /// Encodes one block. `zigzag[0]` is the DC *difference*, `zigzag[1..]` are the
    /// quantized AC coefficients in zigzag order.
    pub fn encode_block(&mut self, zigzag: &[i32; 64], dc: &HuffmanSpec, ac: &HuffmanSpec) {
        self.write_symbol(dc, magnitude_category(zigzag[0]));
        self.write_value(zigzag[0]);
        let mut run = 0;
        for &coefficient in &zigzag[1..] {
            if coefficient == 0 {
                run += 1;
                continue;
            }
            while run > 15 {
                self.write_symbol(ac, 0xf0);
                run -= 16;
            }
            self.write_symbol(ac, (run << 4) | magnitude_category(coefficient));
            self.write_value(coefficient);
            run = 0;
        }
        if run > 0 {
            self.write_symbol(ac, 0x00);
        }
    }

    /// Byte-aligns the stream and emits `RSTn`.
    pub fn restart_marker(&mut self, n: u8) {
        self.bits.write_raw(&[0xff, 0xd0 | (n & 7)]);
    }

    pub fn finish(self) -> Vec<u8> {
        self.bits.into_bytes()
    }
}

/// One frame / scan component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    pub id: u8,
    pub h: u8,
    pub v: u8,
    pub quant_table: u8,
    pub dc_table: u8,
    pub ac_table: u8,
}

impl Component {
    pub fn new(id: u8, h: u8, v: u8) -> Component {
        let table = if id == 1 { 0 } else { 1 };
        Component {
            id,
            h,
            v,
            quant_table: table,
            dc_table: table,
            ac_table: table,
        }
    }
}

/// Segment-level JPEG writer. Starts with SOI.
#[derive(Debug)]
pub struct JpegWriter {
    bytes: Vec<u8>,
}

impl Default for JpegWriter {
    fn default() -> Self {
        JpegWriter::new()
    }
}

impl JpegWriter {
    pub fn new() -> JpegWriter {
        JpegWriter {
            bytes: vec![0xff, 0xd8],
        }
    }

    /// Writes `FF marker`, a big-endian length that includes itself, then `payload`.
    pub fn segment(&mut self, marker: u8, payload: &[u8]) -> &mut Self {
        self.segment_with_length(marker, payload.len() as u16 + 2, payload)
    }

    /// Like `segment`, but with an arbitrary declared length.
    pub fn segment_with_length(&mut self, marker: u8, length: u16, payload: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(&[0xff, marker]);
        self.bytes.extend_from_slice(&length.to_be_bytes());
        self.bytes.extend_from_slice(payload);
        self
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn app0_jfif(&mut self) -> &mut Self {
        self.segment(
            0xe0,
            &[b'J', b'F', b'I', b'F', 0, 1, 2, 0, 0, 72, 0, 72, 0, 0],
        )
    }

    /// `values` are given in zigzag order, as they are stored in the file.
    pub fn dqt(&mut self, id: u8, values: &[u16; 64], sixteen_bit: bool) -> &mut Self {
        let mut payload = vec![((sixteen_bit as u8) << 4) | id];
        for &value in values {
            if sixteen_bit {
                payload.extend_from_slice(&value.to_be_bytes());
            } else {
                payload.push(value as u8);
            }
        }
        self.segment(0xdb, &payload)
    }

    pub fn dht(&mut self, class: u8, id: u8, table: &HuffmanSpec) -> &mut Self {
        self.segment(0xc4, &table.dht_payload(class, id))
    }

    pub fn dri(&mut self, interval: u16) -> &mut Self {
        self.segment(0xdd, &interval.to_be_bytes())
    }

    pub fn sof0(&mut self, width: u16, height: u16, components: &[Component]) -> &mut Self {
        self.sof(0xc0, 8, width, height, components)
    }

    pub fn sof(
        &mut self,
        marker: u8,
        precision: u8,
        width: u16,
        height: u16,
        components: &[Component],
    ) -> &mut Self {
        let mut payload = vec![precision];
        payload.extend_from_slice(&height.to_be_bytes());
        payload.extend_from_slice(&width.to_be_bytes());
        payload.push(components.len() as u8);
        for c in components {
            payload.extend_from_slice(&[c.id, (c.h << 4) | c.v, c.quant_table]);
        }
        self.segment(marker, &payload)
    }

    pub fn sos(&mut self, components: &[Component]) -> &mut Self {
        let mut payload = vec![components.len() as u8];
        for c in components {
            payload.extend_from_slice(&[c.id, (c.dc_table << 4) | c.ac_table]);
        }
        payload.extend_from_slice(&[0x00, 0x3f, 0x00]);
        self.segment(0xda, &payload)
    }

    pub fn eoi(&mut self) -> &mut Self {
        self.raw(&[0xff, 0xd9])
    }

    pub fn finish(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.bytes)
    }
}

/// A whole image made of blocks with a single flat color per component.
///
/// Uses all-ones quantization tables, so a DC coefficient of `8 * (s - 128)`
/// decodes to sample value `s`.
#[derive(Debug, Clone)]
pub struct UniformImage {
    pub width: u16,
    pub height: u16,
    /// `(h, v)` sampling factors of Y, Cb, Cr.
    pub sampling: [(u8, u8); 3],
    pub ycbcr: [u8; 3],
    pub restart_interval: u16,
}

impl UniformImage {
    pub fn new(width: u16, height: u16, ycbcr: [u8; 3]) -> UniformImage {
        UniformImage {
            width,
            height,
            sampling: [(1, 1); 3],
            ycbcr,
            restart_interval: 0,
        }
    }

    pub fn components(&self) -> [Component; 3] {
        [1, 2, 3].map(|id| {
            let (h, v) = self.sampling[id as usize - 1];
            Component::new(id, h, v)
        })
    }

    pub fn mcu_count(&self) -> usize {
        let h_max = self.sampling.iter().map(|s| s.0).max().unwrap_or(1) as usize;
        let v_max = self.sampling.iter().map(|s| s.1).max().unwrap_or(1) as usize;
        (self.width as usize).div_ceil(8 * h_max) * (self.height as usize).div_ceil(8 * v_max)
    }

    /// Only the entropy-coded data.
    pub fn scan_data(&self) -> Vec<u8> {
        let dc = HuffmanSpec::dc_default();
        let ac = HuffmanSpec::ac_default();
        let components = self.components();
        let mut encoder = EntropyEncoder::new();
        let mut prediction = [0i32; 3];
        let interval = self.restart_interval as usize;
        for mcu in 0..self.mcu_count() {
            if interval > 0 && mcu > 0 && mcu % interval == 0 {
                encoder.restart_marker(((mcu / interval - 1) % 8) as u8);
                prediction = [0; 3];
            }
            for (c, component) in components.iter().enumerate() {
                let value = 8 * (self.ycbcr[c] as i32 - 128);
                for _ in 0..(component.h * component.v) {
                    let mut block = [0i32; 64];
                    block[0] = value - prediction[c];
                    prediction[c] = value;
                    encoder.encode_block(&block, &dc, &ac);
                }
            }
        }
        encoder.finish()
    }

    /// Everything up to and including the SOS segment.
    pub fn headers(&self) -> JpegWriter {
        let dc = HuffmanSpec::dc_default();
        let ac = HuffmanSpec::ac_default();
        let components = self.components();
        let mut writer = JpegWriter::new();
        writer
            .app0_jfif()
            .dqt(0, &[1; 64], false)
            .dqt(1, &[1; 64], false)
            .sof0(self.width, self.height, &components)
            .dht(0, 0, &dc)
            .dht(1, 0, &ac)
            .dht(0, 1, &dc)
            .dht(1, 1, &ac);
        if self.restart_interval > 0 {
            writer.dri(self.restart_interval);
        }
        writer.sos(&components);
        writer
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut writer = self.headers();
        writer.raw(&self.scan_data()).eoi();
        writer.finish()
    }
}
