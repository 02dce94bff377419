// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use thiserror::Error;

use crate::bit_reader::{BitReader, EndOfStream};

pub const HUFFMAN_MAX_BITS: usize = 16;
pub const HUFFMAN_MAX_SYMBOLS: usize = 256;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuffmanError {
    #[error("row {row} cannot hold {count} codes")]
    RowOverflow { row: usize, count: usize },
    #[error("bit sequence does not lead to a symbol")]
    NoSymbolFound,
    #[error("end of stream inside a Huffman code")]
    EndOfStream,
}

impl From<EndOfStream> for HuffmanError {
    fn from(_: EndOfStream) -> Self {
        HuffmanError::EndOfStream
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    /// Slot on the deepest row that is neither a leaf nor split yet.
    Open,
    Leaf(u8),
    Internal { left: u32, right: u32 },
}

/// Binary code tree of one DHT table.
///
/// Rows are appended in order of increasing code length. Every row splits each
/// open slot of the previous row into two and hands out the new slots left to
/// right, which yields exactly the canonical code assignment of ITU-T T.81
/// Annex C.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    nodes: Vec<Node>,
    open: Vec<u32>,
    rows: usize,
    num_symbols: usize,
}

impl Default for HuffmanTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HuffmanTable {
    pub fn new() -> HuffmanTable {
        HuffmanTable {
            nodes: vec![Node::Open],
            open: vec![0],
            rows: 0,
            num_symbols: 0,
        }
    }

    /// Builds a table from the 16 per-length counts and the symbol list of a
    /// DHT segment. Rows past the last non-empty one are not materialized.
    pub fn from_counts(
        counts: &[u8; HUFFMAN_MAX_BITS],
        symbols: &[u8],
    ) -> Result<HuffmanTable, HuffmanError> {
        let num_rows = counts.iter().rposition(|&c| c != 0).map_or(0, |i| i + 1);
        let mut table = HuffmanTable::new();
        let mut start = 0;
        for &count in &counts[..num_rows] {
            let end = start + count as usize;
            let row = symbols
                .get(start..end)
                .ok_or(HuffmanError::RowOverflow {
                    row: table.rows + 1,
                    count: count as usize,
                })?;
            table.append_row(row)?;
            start = end;
        }
        Ok(table)
    }

    /// Adds the codes of the next bit length.
    pub fn append_row(&mut self, symbols: &[u8]) -> Result<(), HuffmanError> {
        let row = self.rows + 1;
        let overflow = HuffmanError::RowOverflow {
            row,
            count: symbols.len(),
        };
        if row > HUFFMAN_MAX_BITS || symbols.len() > 1 << row {
            return Err(overflow);
        }
        if symbols.len() > 2 * self.open.len() {
            return Err(overflow);
        }

        let mut slots = Vec::with_capacity(2 * self.open.len());
        for &parent in &self.open {
            let left = self.nodes.len() as u32;
            self.nodes.push(Node::Open);
            self.nodes.push(Node::Open);
            self.nodes[parent as usize] = Node::Internal {
                left,
                right: left + 1,
            };
            slots.push(left);
            slots.push(left + 1);
        }
        for (&slot, &symbol) in slots.iter().zip(symbols) {
            self.nodes[slot as usize] = Node::Leaf(symbol);
        }
        slots.drain(..symbols.len());
        self.open = slots;
        self.rows = row;
        self.num_symbols += symbols.len();
        Ok(())
    }

    pub fn num_symbols(&self) -> usize {
        self.num_symbols
    }

    /// Length in bits of the longest code.
    pub fn max_code_length(&self) -> usize {
        self.rows
    }

    /// Walks the tree one bit at a time until it reaches a leaf.
    pub fn decode_symbol(&self, br: &mut BitReader) -> Result<u8, HuffmanError> {
        let mut node = 0;
        loop {
            match self.nodes[node] {
                Node::Leaf(symbol) => return Ok(symbol),
                Node::Open => return Err(HuffmanError::NoSymbolFound),
                Node::Internal { left, right } => {
                    let next = if br.read_bit()? == 0 { left } else { right };
                    node = next as usize;
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use jfif_test_utils::{BitWriter, HuffmanSpec};
    use test_log::test;

    use super::*;

    fn table_for(spec: &HuffmanSpec) -> HuffmanTable {
        HuffmanTable::from_counts(&spec.counts, &spec.symbols).unwrap()
    }

    fn encode(spec: &HuffmanSpec, symbols: &[u8]) -> Vec<u8> {
        let mut bits = BitWriter::new();
        for &symbol in symbols {
            let (code, len) = spec.code_for(symbol);
            bits.write(code as u32, len);
        }
        bits.into_bytes()
    }

    #[test]
    fn empty_table_finds_nothing() {
        let table = HuffmanTable::new();
        let mut br = BitReader::new(&[0x00]);
        assert_eq!(table.decode_symbol(&mut br), Err(HuffmanError::NoSymbolFound));
    }

    #[test]
    fn two_symbol_table() {
        let mut table = HuffmanTable::new();
        table.append_row(&[7, 9]).unwrap();
        assert_eq!(table.num_symbols(), 2);
        let mut br = BitReader::new(&[0b0110_0000]);
        assert_eq!(table.decode_symbol(&mut br), Ok(7));
        assert_eq!(table.decode_symbol(&mut br), Ok(9));
        assert_eq!(table.decode_symbol(&mut br), Ok(9));
        assert_eq!(table.decode_symbol(&mut br), Ok(7));
        assert_eq!(br.total_bits_read(), 4);
    }

    #[test]
    fn row_overflow() {
        let mut table = HuffmanTable::new();
        assert_eq!(
            table.append_row(&[1, 2, 3]),
            Err(HuffmanError::RowOverflow { row: 1, count: 3 })
        );

        table.append_row(&[1]).unwrap();
        table.append_row(&[2]).unwrap();
        // One open slot left, which splits into two.
        assert_eq!(
            table.append_row(&[3, 4, 5]),
            Err(HuffmanError::RowOverflow { row: 3, count: 3 })
        );
        table.append_row(&[3, 4]).unwrap();
        assert_eq!(
            table.append_row(&[5]),
            Err(HuffmanError::RowOverflow { row: 4, count: 1 })
        );
    }

    #[test]
    fn at_most_sixteen_rows() {
        let mut table = HuffmanTable::new();
        for _ in 0..15 {
            table.append_row(&[]).unwrap();
        }
        table.append_row(&[0xab]).unwrap();
        assert_eq!(table.max_code_length(), 16);
        assert_eq!(
            table.append_row(&[]),
            Err(HuffmanError::RowOverflow { row: 17, count: 0 })
        );

        let mut br = BitReader::new(&[0x00, 0x00]);
        assert_eq!(table.decode_symbol(&mut br), Ok(0xab));
    }

    #[test]
    fn counts_must_match_symbols() {
        let mut counts = [0u8; 16];
        counts[1] = 3;
        assert_eq!(
            HuffmanTable::from_counts(&counts, &[1, 2]).unwrap_err(),
            HuffmanError::RowOverflow { row: 2, count: 3 }
        );
    }

    #[test]
    fn trailing_empty_rows_are_not_built() {
        let spec = HuffmanSpec::dc_luminance();
        let table = table_for(&spec);
        assert_eq!(table.max_code_length(), 9);
        assert_eq!(table.num_symbols(), 12);
    }

    #[test]
    fn luminance_dc_round_trip() {
        let spec = HuffmanSpec::dc_luminance();
        let table = table_for(&spec);
        let symbols = [0, 11, 5, 6, 1, 10, 0, 0, 9, 3, 2, 4, 7, 8];
        let data = encode(&spec, &symbols);
        let mut br = BitReader::new(&data);
        for &expected in &symbols {
            assert_eq!(table.decode_symbol(&mut br), Ok(expected));
        }
    }

    #[test]
    fn truncated_code() {
        let table = table_for(&HuffmanSpec::dc_luminance());
        // 1111 1111 then the stuffed zero: symbol 11 needs a ninth bit.
        let mut br = BitReader::new(&[0xff, 0x00]);
        assert_eq!(table.decode_symbol(&mut br), Err(HuffmanError::EndOfStream));
    }

    #[test]
    fn random_tables_round_trip() {
        arbtest::arbtest(|u| {
            let mut counts = [0u8; 16];
            let mut available = 2usize;
            let mut total = 0usize;
            for count in counts.iter_mut() {
                let max = available.min(HUFFMAN_MAX_SYMBOLS - total).min(255);
                let c = u.int_in_range(0..=max)?;
                *count = c as u8;
                total += c;
                available = (available - c) * 2;
            }
            if total == 0 {
                return Ok(());
            }
            let offset = u.int_in_range(0..=255usize)?;
            let symbols: Vec<u8> = (0..total).map(|i| ((i + offset) % 256) as u8).collect();
            let spec = HuffmanSpec::new(counts, symbols);
            let table = table_for(&spec);
            assert_eq!(table.num_symbols(), total);

            let len = u.int_in_range(1..=64usize)?;
            let mut message = Vec::with_capacity(len);
            for _ in 0..len {
                message.push(*u.choose(&spec.symbols)?);
            }
            let data = encode(&spec, &message);
            let mut br = BitReader::new(&data);
            for &expected in &message {
                assert_eq!(table.decode_symbol(&mut br), Ok(expected));
            }
            Ok(())
        });
    }
}
