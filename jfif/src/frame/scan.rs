// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::bit_reader::BitReader;
use crate::color::ycbcr_to_rgb;
use crate::error::{Error, Result};
use crate::frame::FrameState;
use crate::frame::block::BlockDecoder;
use crate::frame::upsample::{GRID_DIM, GRID_SIZE, upsample};
use crate::headers::marker::is_restart;
use crate::headers::{ComponentId, HuffmanClass};
use crate::image::PixelBuffer;
use crate::util::tracing_wrappers::*;
use crate::{BLOCK_DIM, BLOCK_SIZE};

/// Consumes a restart marker if one starts at the next byte boundary,
/// otherwise leaves the reader where it was.
///
/// Returns whether a marker was consumed.
pub fn skip_restart_marker(br: &mut BitReader) -> bool {
    br.save();
    br.skip_to_byte_boundary();
    br.skip_stuffing();
    if br.has_available(16)
        && let (Ok(0xff), Ok(code)) = (br.read_byte(false), br.read_byte(false))
        && is_restart(code)
    {
        br.discard();
        return true;
    }
    br.restore();
    false
}

/// Per-component state while walking the MCUs.
struct ComponentDecoder<'a> {
    id: ComponentId,
    sampling: (u8, u8),
    blocks: BlockDecoder<'a>,
    grid: [i32; GRID_SIZE],
}

impl<'a> ComponentDecoder<'a> {
    fn new(frame: &'a FrameState, index: usize) -> Result<ComponentDecoder<'a>> {
        let scan_component = &frame.scan.components[index];
        let info = frame.component(scan_component);
        let quant = frame.quant_table(info.quant_table)?;
        let dc = frame.huffman_table(HuffmanClass::Dc, scan_component.dc_table)?;
        let ac = frame.huffman_table(HuffmanClass::Ac, scan_component.ac_table)?;
        Ok(ComponentDecoder {
            id: info.id,
            sampling: (info.h, info.v),
            blocks: BlockDecoder::new(dc, ac, &quant.values),
            grid: [0; GRID_SIZE],
        })
    }

    /// Decodes this component's `v x h` blocks of the current MCU into the grid.
    fn decode_mcu(&mut self, br: &mut BitReader, block: &mut [i32; BLOCK_SIZE]) -> Result<()> {
        let (h, v) = self.sampling;
        for by in 0..v as usize {
            for bx in 0..h as usize {
                self.blocks.decode_block(br, block)?;
                let origin = by * BLOCK_DIM * GRID_DIM + bx * BLOCK_DIM;
                for (row, samples) in block.chunks_exact(BLOCK_DIM).enumerate() {
                    let start = origin + row * GRID_DIM;
                    self.grid[start..start + BLOCK_DIM].copy_from_slice(samples);
                }
                if skip_restart_marker(br) {
                    trace!(component = ?self.id, "restart marker");
                }
            }
        }
        Ok(())
    }
}

/// Decodes the entropy-coded data of an interleaved baseline scan into
/// `pixels`.
///
/// `data` starts right after the scan header and may run to the end of the
/// file.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
pub fn decode_scan(frame: &FrameState, data: &[u8], pixels: &mut PixelBuffer) -> Result<()> {
    let header = &frame.header;
    let (width, height) = (header.width as usize, header.height as usize);
    if pixels.size() != (width, height) {
        return Err(Error::InvalidImageSize(pixels.width(), pixels.height()));
    }
    let max_sampling = (header.h_max(), header.v_max());
    let (mcu_width, mcu_height) = header.mcu_size();

    let mut components: [ComponentDecoder; 3] =
        array_init::try_array_init(|index| ComponentDecoder::new(frame, index))?;
    let mut br = BitReader::new(data);
    let mut block = [0; BLOCK_SIZE];
    let interval = frame.restart_interval as usize;

    let mut mcu = 0;
    let (mut x, mut y) = (0, 0);
    while y < height {
        if interval > 0 && mcu % interval == 0 {
            for component in components.iter_mut() {
                component.blocks.reset_prediction();
            }
        }
        for component in components.iter_mut() {
            component.decode_mcu(&mut br, &mut block)?;
            upsample(&mut component.grid, component.sampling, max_sampling);
        }

        for dy in 0..mcu_height.min(height - y) {
            for dx in 0..mcu_width.min(width - x) {
                let mut ycbcr = [0; 3];
                for component in components.iter() {
                    ycbcr[component.id.index()] = component.grid[dy * GRID_DIM + dx];
                }
                let [luma, cb, cr] = ycbcr;
                pixels.set_pixel(x + dx, y + dy, ycbcr_to_rgb(luma, cb, cr))?;
            }
        }

        mcu += 1;
        x += mcu_width;
        if x >= width {
            x = 0;
            y += mcu_height;
        }
    }
    debug!(mcus = mcu, bytes = br.byte_position(), "scan decoded");
    Ok(())
}
