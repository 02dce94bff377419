// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use thiserror::Error;

/// A read went past the last bit of the stream.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("End of stream")]
pub struct EndOfStream;

pub const MAX_BITS_PER_CALL: usize = 16;

/// Reads bits, most significant first, from the entropy-coded segment of a JPEG
/// file, dropping the zero byte the encoder stuffs after every `0xFF`.
#[derive(Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    checkpoints: Vec<usize>,
}

impl Debug for BitReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BitReader{{ data: [{} bytes], pos: {}, checkpoints: {:?} }}",
            self.data.len(),
            self.pos,
            self.checkpoints
        )
    }
}

impl<'a> BitReader<'a> {
    /// Constructs a BitReader for a given range of data.
    pub fn new(data: &'a [u8]) -> BitReader<'a> {
        BitReader {
            data,
            pos: 0,
            checkpoints: Vec::new(),
        }
    }

    fn total_bits(&self) -> usize {
        self.data.len() * 8
    }

    /// Returns the total number of bits that have been read or skipped.
    pub fn total_bits_read(&self) -> usize {
        self.pos
    }

    /// Returns the total number of bits that can still be read or skipped.
    pub fn total_bits_available(&self) -> usize {
        self.total_bits() - self.pos
    }

    /// Index of the first byte that has not been touched yet.
    pub fn byte_position(&self) -> usize {
        self.pos.div_ceil(8)
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.total_bits()
    }

    pub fn has_available(&self, num: usize) -> bool {
        num <= self.total_bits_available()
    }

    /// Steps over a stuffed `0x00` if the cursor sits on one.
    ///
    /// Recomputed from the bytes on every call, so it stays correct after
    /// `restore` moves the cursor backwards.
    pub fn skip_stuffing(&mut self) {
        let byte = self.pos / 8;
        if byte > 0
            && byte < self.data.len()
            && self.data[byte] == 0x00
            && self.data[byte - 1] == 0xff
        {
            self.pos += 8;
        }
    }

    /// Reads one bit without any stuffing logic.
    pub fn read_bit_raw(&mut self) -> Result<u8, EndOfStream> {
        if self.is_at_end() {
            return Err(EndOfStream);
        }
        let byte = self.data[self.pos / 8];
        let bit = (byte >> (7 - self.pos % 8)) & 1;
        self.pos += 1;
        Ok(bit)
    }

    /// Reads one bit of entropy-coded data.
    /// ```
    /// # use jfif::bit_reader::BitReader;
    /// let mut br = BitReader::new(&[0xff, 0x00, 0x80]);
    /// for _ in 0..8 {
    ///     assert_eq!(br.read_bit()?, 1);
    /// }
    /// assert_eq!(br.read_bit()?, 1);
    /// assert_eq!(br.total_bits_read(), 17);
    /// # Ok::<(), jfif::bit_reader::EndOfStream>(())
    /// ```
    pub fn read_bit(&mut self) -> Result<u8, EndOfStream> {
        self.skip_stuffing();
        self.read_bit_raw()
    }

    /// Reads `num` bits, most significant first.
    /// ```
    /// # use jfif::bit_reader::BitReader;
    /// let mut br = BitReader::new(&[0xa5, 0x0f]);
    /// assert_eq!(br.read(4)?, 0xa);
    /// assert_eq!(br.read(12)?, 0x50f);
    /// assert!(br.read(1).is_err());
    /// # Ok::<(), jfif::bit_reader::EndOfStream>(())
    /// ```
    pub fn read(&mut self, num: usize) -> Result<u32, EndOfStream> {
        debug_assert!(num <= MAX_BITS_PER_CALL);
        let mut value = 0u32;
        for _ in 0..num {
            value = (value << 1) | self.read_bit()? as u32;
        }
        Ok(value)
    }

    pub fn read_byte(&mut self, destuff: bool) -> Result<u8, EndOfStream> {
        let mut value = 0u8;
        for _ in 0..8 {
            let bit = if destuff {
                self.read_bit()?
            } else {
                self.read_bit_raw()?
            };
            value = (value << 1) | bit;
        }
        Ok(value)
    }

    /// Jumps to the next byte boundary.
    /// ```
    /// # use jfif::bit_reader::BitReader;
    /// let mut br = BitReader::new(&[0, 1]);
    /// br.read(3)?;
    /// br.skip_to_byte_boundary();
    /// assert_eq!(br.total_bits_read(), 8);
    /// br.skip_to_byte_boundary();
    /// assert_eq!(br.total_bits_read(), 8);
    /// # Ok::<(), jfif::bit_reader::EndOfStream>(())
    /// ```
    pub fn skip_to_byte_boundary(&mut self) {
        self.pos = self.pos.div_ceil(8) * 8;
    }

    /// Pushes the current position.
    pub fn save(&mut self) {
        self.checkpoints.push(self.pos);
    }

    /// Drops the most recent checkpoint, keeping the current position.
    pub fn discard(&mut self) {
        self.checkpoints
            .pop()
            .expect("BitReader::discard without a matching save");
    }

    /// Rewinds to the most recent checkpoint and drops it.
    pub fn restore(&mut self) {
        self.pos = self
            .checkpoints
            .pop()
            .expect("BitReader::restore without a matching save");
    }
}
