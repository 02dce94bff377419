// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::error::{Error, Result};
use crate::headers::JpegHeader;
use crate::headers::segment::SegmentReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
pub enum ComponentId {
    Y = 1,
    Cb = 2,
    Cr = 3,
}

impl ComponentId {
    pub fn from_byte(byte: u8) -> Option<ComponentId> {
        ComponentId::from_u8(byte)
    }

    /// Position of the component in a `[Y, Cb, Cr]` triple.
    pub fn index(self) -> usize {
        self as usize - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentInfo {
    pub id: ComponentId,
    /// Horizontal sampling factor, 1 or 2.
    pub h: u8,
    /// Vertical sampling factor, 1 or 2.
    pub v: u8,
    pub quant_table: u8,
}

/// Baseline (SOF0) frame header. Only three-component 8-bit YCbCr frames are
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub precision: u8,
    pub height: u16,
    pub width: u16,
    /// Indexed by [`ComponentId::index`], whatever order the file lists them in.
    pub components: [ComponentInfo; 3],
}

const FRAME_HEADER_SIZE: usize = 6 + 3 * 3;

impl FrameHeader {
    pub fn component(&self, id: ComponentId) -> &ComponentInfo {
        &self.components[id.index()]
    }

    pub fn h_max(&self) -> u8 {
        self.components.iter().map(|c| c.h).max().unwrap_or(1)
    }

    pub fn v_max(&self) -> u8 {
        self.components.iter().map(|c| c.v).max().unwrap_or(1)
    }

    /// Width and height of one MCU in pixels.
    pub fn mcu_size(&self) -> (usize, usize) {
        (8 * self.h_max() as usize, 8 * self.v_max() as usize)
    }

    pub fn mcu_count(&self) -> usize {
        let (mcu_width, mcu_height) = self.mcu_size();
        (self.width as usize).div_ceil(mcu_width) * (self.height as usize).div_ceil(mcu_height)
    }
}

impl JpegHeader for FrameHeader {
    fn read(r: &mut SegmentReader) -> Result<FrameHeader> {
        if r.remaining() < FRAME_HEADER_SIZE {
            return Err(Error::UnsupportedColorScheme);
        }
        let precision = r.read_u8()?;
        if precision != 8 {
            return Err(Error::UnsupportedPrecision(precision));
        }
        let height = r.read_u16()?;
        let width = r.read_u16()?;
        if r.read_u8()? != 3 {
            return Err(Error::UnsupportedColorScheme);
        }

        let mut seen = [false; 3];
        let mut components: [ComponentInfo; 3] =
            array_init::try_array_init(|_| -> Result<ComponentInfo> {
                let id = r.read_u8()?;
                let sampling = r.read_u8()?;
                let quant_table = r.read_u8()?;
                let id = ComponentId::from_byte(id)
                    .ok_or_else(|| Error::NotSupported(format!("component id {id}")))?;
                if std::mem::replace(&mut seen[id.index()], true) {
                    return Err(Error::NotSupported(format!("duplicate component {id:?}")));
                }
                let (h, v) = (sampling >> 4, sampling & 0x0f);
                if !matches!(h, 1 | 2) || !matches!(v, 1 | 2) {
                    return Err(Error::NotSupported(format!(
                        "sampling factors {h}x{v} for component {id:?}"
                    )));
                }
                if quant_table > 1 {
                    return Err(Error::InvalidQuantizationTableId(quant_table));
                }
                Ok(ComponentInfo {
                    id,
                    h,
                    v,
                    quant_table,
                })
            })?;
        components.sort_by_key(|c| c.id.index());

        if width == 0 || height == 0 {
            return Err(Error::InvalidImageSize(width as usize, height as usize));
        }
        Ok(FrameHeader {
            precision,
            height,
            width,
            components,
        })
    }
}
