// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::BLOCK_SIZE;
use crate::bit_reader::BitReader;
use crate::entropy_coding::huffman::HuffmanTable;
use crate::error::{Error, Result};
use crate::util::ZIGZAG;
use crate::var_dct::idct_8x8;

/// Largest DC difference category for 8-bit samples.
const MAX_DC_CATEGORY: u8 = 11;
/// Largest AC coefficient category for 8-bit samples.
const MAX_AC_CATEGORY: u8 = 10;

const END_OF_BLOCK: u8 = 0x00;
const ZERO_RUN_16: u8 = 0xf0;

/// Maps the `len` raw bits that follow a Huffman symbol to a signed value.
/// A leading zero bit means the value is negative.
/// ```
/// # use jfif::frame::block::extend;
/// assert_eq!(extend(0b101, 3), 5);
/// assert_eq!(extend(0b010, 3), -5);
/// assert_eq!(extend(0, 1), -1);
/// ```
pub fn extend(bits: u32, len: u8) -> i32 {
    if len == 0 {
        return 0;
    }
    if bits < 1 << (len - 1) {
        bits as i32 - ((1 << len) - 1)
    } else {
        bits as i32
    }
}

fn dequantize(value: i32, quant: u16) -> i32 {
    value
        .saturating_mul(quant as i32)
        .clamp(i16::MIN as i32, i16::MAX as i32)
}

/// Decodes the blocks of one component: the tables it uses and its DC
/// predictor.
#[derive(Debug, Clone)]
pub struct BlockDecoder<'a> {
    dc_table: &'a HuffmanTable,
    ac_table: &'a HuffmanTable,
    quant: &'a [u16; BLOCK_SIZE],
    prediction: i32,
}

impl<'a> BlockDecoder<'a> {
    pub fn new(
        dc_table: &'a HuffmanTable,
        ac_table: &'a HuffmanTable,
        quant: &'a [u16; BLOCK_SIZE],
    ) -> BlockDecoder<'a> {
        BlockDecoder {
            dc_table,
            ac_table,
            quant,
            prediction: 0,
        }
    }

    pub fn reset_prediction(&mut self) {
        self.prediction = 0;
    }

    /// The last decoded (unquantized) DC value.
    pub fn prediction(&self) -> i32 {
        self.prediction
    }

    /// Reads one block and writes its dequantized coefficients in natural
    /// order. Coefficients that are not coded are set to zero.
    pub fn decode_coefficients(
        &mut self,
        br: &mut BitReader,
        coefficients: &mut [i32; BLOCK_SIZE],
    ) -> Result<()> {
        coefficients.fill(0);

        let category = self.dc_table.decode_symbol(br)?;
        if category > MAX_DC_CATEGORY {
            return Err(Error::InvalidCoefficient(format!(
                "DC difference category {category}"
            )));
        }
        let diff = extend(br.read(category as usize)?, category);
        self.prediction = self.prediction.wrapping_add(diff);
        coefficients[0] = dequantize(self.prediction, self.quant[0]);

        let mut pos = 1;
        while pos < BLOCK_SIZE {
            let symbol = self.ac_table.decode_symbol(br)?;
            match symbol {
                END_OF_BLOCK => break,
                ZERO_RUN_16 => {
                    pos += 16;
                    continue;
                }
                _ => {}
            }
            let run = (symbol >> 4) as usize;
            let size = symbol & 0x0f;
            if pos + run >= BLOCK_SIZE {
                return Err(Error::InvalidCoefficient(format!(
                    "run of {run} zeros at position {pos} leaves the block"
                )));
            }
            if size > MAX_AC_CATEGORY {
                return Err(Error::InvalidCoefficient(format!(
                    "AC coefficient category {size}"
                )));
            }
            pos += run;
            let value = extend(br.read(size as usize)?, size);
            let natural = ZIGZAG[pos];
            coefficients[natural] = dequantize(value, self.quant[natural]);
            pos += 1;
        }
        Ok(())
    }

    /// Decodes one block into level-shifted samples, row-major.
    pub fn decode_block(&mut self, br: &mut BitReader, out: &mut [i32; BLOCK_SIZE]) -> Result<()> {
        self.decode_coefficients(br, out)?;
        idct_8x8(out);
        Ok(())
    }
}
