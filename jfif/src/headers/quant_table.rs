// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::BLOCK_SIZE;
use crate::error::{Error, Result};
use crate::headers::segment::SegmentReader;
use crate::util::ZIGZAG;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizationTable {
    pub id: u8,
    /// Entries were stored as 16-bit values.
    pub sixteen_bit: bool,
    /// Natural (row-major) order.
    pub values: [u16; BLOCK_SIZE],
}

impl QuantizationTable {
    /// Reads every table of a DQT segment.
    pub fn read_all(r: &mut SegmentReader) -> Result<Vec<QuantizationTable>> {
        let mut tables = Vec::new();
        while r.remaining() > 0 {
            let info = r.read_u8()?;
            let (precision, id) = (info >> 4, info & 0x0f);
            let sixteen_bit = match precision {
                0 => false,
                1 => true,
                _ => {
                    return Err(Error::NotSupported(format!(
                        "quantization table precision {precision}"
                    )));
                }
            };
            if id > 1 {
                return Err(Error::InvalidQuantizationTableId(id));
            }
            let mut values = [0u16; BLOCK_SIZE];
            for &natural in ZIGZAG.iter() {
                values[natural] = if sixteen_bit {
                    r.read_u16()?
                } else {
                    r.read_u8()? as u16
                };
            }
            tables.push(QuantizationTable {
                id,
                sixteen_bit,
                values,
            });
        }
        Ok(tables)
    }
}
