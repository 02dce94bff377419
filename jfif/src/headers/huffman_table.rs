// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::entropy_coding::huffman::{HUFFMAN_MAX_BITS, HUFFMAN_MAX_SYMBOLS, HuffmanTable};
use crate::error::{Error, Result};
use crate::headers::segment::SegmentReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum HuffmanClass {
    Dc = 0,
    Ac = 1,
}

impl fmt::Display for HuffmanClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HuffmanClass::Dc => write!(f, "DC"),
            HuffmanClass::Ac => write!(f, "AC"),
        }
    }
}

/// One table out of a DHT segment.
#[derive(Debug, Clone)]
pub struct HuffmanTableDefinition {
    pub class: HuffmanClass,
    pub id: u8,
    pub table: HuffmanTable,
}

impl HuffmanTableDefinition {
    /// Reads every table of a DHT segment. Trailing bytes too short to hold
    /// another table header are ignored.
    pub fn read_all(r: &mut SegmentReader) -> Result<Vec<HuffmanTableDefinition>> {
        let mut tables = Vec::new();
        while r.remaining() > HUFFMAN_MAX_BITS {
            let info = r.read_u8()?;
            let class = HuffmanClass::from_u8(info >> 4)
                .ok_or_else(|| Error::NotSupported(format!("Huffman table class {}", info >> 4)))?;
            let id = info & 0x0f;
            if id > 1 {
                return Err(Error::InvalidHuffmanTableId(id));
            }

            let mut counts = [0u8; HUFFMAN_MAX_BITS];
            counts.copy_from_slice(r.read_bytes(HUFFMAN_MAX_BITS)?);
            let total: usize = counts.iter().map(|&c| c as usize).sum();
            if total > HUFFMAN_MAX_SYMBOLS {
                return Err(Error::HuffmanTableOverflow(total));
            }
            let symbols = r.read_bytes(total)?;
            let table = HuffmanTable::from_counts(&counts, symbols)?;
            tables.push(HuffmanTableDefinition { class, id, table });
        }
        Ok(tables)
    }
}
