// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::util::tracing_wrappers::*;

const CHANNELS: usize = 3;

/// Interleaved 8-bit RGB raster.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PixelBuffer {}x{}", self.width, self.height)
    }
}

impl PixelBuffer {
    /// Allocates a black image.
    pub fn new(width: usize, height: usize) -> Result<PixelBuffer> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidImageSize(width, height));
        }
        let total_size = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(CHANNELS))
            .ok_or(Error::ImageTooLarge(width, height))?;
        debug!(width, height, "allocating pixel buffer");
        let mut data = vec![];
        data.try_reserve_exact(total_size)?;
        data.resize(total_size, 0);
        Ok(PixelBuffer {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.width + x) * CHANNELS;
        Some(Rgb::new(
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ))
    }

    /// One row of interleaved RGB samples.
    ///
    /// Panics if `y` is out of bounds.
    pub fn row(&self, y: usize) -> &[u8] {
        let stride = self.width * CHANNELS;
        &self.data[y * stride..(y + 1) * stride]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub(crate) fn set_pixel(&mut self, x: usize, y: usize, rgb: Rgb) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::PixelOutOfBounds(x, y));
        }
        let offset = (y * self.width + x) * CHANNELS;
        self.data[offset..offset + CHANNELS].copy_from_slice(&rgb.to_array());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;

    #[test]
    fn starts_black() -> Result<()> {
        let buffer = PixelBuffer::new(3, 2)?;
        assert_eq!(buffer.size(), (3, 2));
        assert_eq!(buffer.as_bytes().len(), 18);
        assert!(buffer.as_bytes().iter().all(|&b| b == 0));
        Ok(())
    }

    #[test]
    fn bounds_checked_writes() -> Result<()> {
        let mut buffer = PixelBuffer::new(3, 2)?;
        buffer.set_pixel(2, 1, Rgb::new(1, 2, 3))?;
        assert_eq!(buffer.pixel(2, 1), Some(Rgb::new(1, 2, 3)));
        assert_eq!(buffer.row(1), [0, 0, 0, 0, 0, 0, 1, 2, 3]);
        assert!(matches!(
            buffer.set_pixel(3, 0, Rgb::default()),
            Err(Error::PixelOutOfBounds(3, 0))
        ));
        assert!(matches!(
            buffer.set_pixel(0, 2, Rgb::default()),
            Err(Error::PixelOutOfBounds(0, 2))
        ));
        assert_eq!(buffer.pixel(3, 0), None);
        Ok(())
    }

    #[test]
    fn invalid_sizes() {
        assert!(matches!(
            PixelBuffer::new(0, 5),
            Err(Error::InvalidImageSize(0, 5))
        ));
        assert!(matches!(
            PixelBuffer::new(usize::MAX, 2),
            Err(Error::ImageTooLarge(_, 2))
        ));
    }
}
