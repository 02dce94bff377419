// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};

/// Byte-level cursor over the container. Offsets in errors are absolute
/// positions in the file, also for readers returned by [`Self::read_segment`].
#[derive(Debug, Clone)]
pub struct SegmentReader<'a> {
    data: &'a [u8],
    base: usize,
    pos: usize,
}

impl<'a> SegmentReader<'a> {
    pub fn new(data: &'a [u8]) -> SegmentReader<'a> {
        SegmentReader {
            data,
            base: 0,
            pos: 0,
        }
    }

    /// Absolute offset of the cursor.
    pub fn position(&self) -> usize {
        self.base + self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if needed > self.remaining() {
            return Err(Error::OutOfRange {
                offset: self.position(),
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let value = self.data[self.pos];
        self.pos += 1;
        Ok(value)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        let value = BigEndian::read_u16(&self.data[self.pos..]);
        self.pos += 2;
        Ok(value)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }

    /// Moves past the next marker and returns its code. Fill bytes, stuffed
    /// `FF 00` pairs and anything else that is not a marker are stepped over.
    /// Returns `None` once the data runs out.
    pub fn next_marker(&mut self) -> Option<u8> {
        while self.pos + 1 < self.data.len() {
            let code = self.data[self.pos + 1];
            if self.data[self.pos] == 0xff && code != 0x00 && code != 0xff {
                self.pos += 2;
                return Some(code);
            }
            self.pos += 1;
        }
        self.pos = self.data.len();
        None
    }

    /// Reads a length field and returns a reader over the payload that follows
    /// it. The length counts its own two bytes.
    pub fn read_segment(&mut self) -> Result<SegmentReader<'a>> {
        let length = self.read_u16()?;
        self.read_payload(length)
    }

    /// Like [`Self::read_segment`], with the length field already consumed.
    pub fn read_payload(&mut self, length: u16) -> Result<SegmentReader<'a>> {
        if length < 2 {
            return Err(Error::InvalidSegmentLength(length));
        }
        let base = self.position();
        let data = self.read_bytes(length as usize - 2)?;
        Ok(SegmentReader { data, base, pos: 0 })
    }

    /// The unread part of the data.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}
