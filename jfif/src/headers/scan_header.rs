// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::error::{Error, Result};
use crate::headers::JpegHeader;
use crate::headers::frame_header::ComponentId;
use crate::headers::segment::SegmentReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanComponent {
    pub id: ComponentId,
    pub dc_table: u8,
    pub ac_table: u8,
}

/// Start-of-scan header of an interleaved baseline scan over all three
/// components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHeader {
    /// In the order their blocks appear in each MCU.
    pub components: [ScanComponent; 3],
}

const SCAN_HEADER_SIZE: usize = 1 + 3 * 2 + 3;

impl JpegHeader for ScanHeader {
    fn read(r: &mut SegmentReader) -> Result<ScanHeader> {
        if r.remaining() != SCAN_HEADER_SIZE || r.read_u8()? != 3 {
            return Err(Error::UnsupportedColorScheme);
        }

        let mut seen = [false; 3];
        let components = array_init::try_array_init(|_| -> Result<ScanComponent> {
            let id = ComponentId::from_byte(r.read_u8()?).ok_or(Error::UnsupportedColorScheme)?;
            if std::mem::replace(&mut seen[id.index()], true) {
                return Err(Error::UnsupportedColorScheme);
            }
            let tables = r.read_u8()?;
            let (dc_table, ac_table) = (tables >> 4, tables & 0x0f);
            for table in [dc_table, ac_table] {
                if table > 1 {
                    return Err(Error::InvalidHuffmanTableId(table));
                }
            }
            Ok(ScanComponent {
                id,
                dc_table,
                ac_table,
            })
        })?;

        // Spectral selection 0..=63 and no successive approximation.
        let selection = r.read_bytes(3)?;
        if selection != [0x00, 0x3f, 0x00] {
            return Err(Error::NotSupported(format!(
                "spectral selection {selection:02x?} in a baseline scan"
            )));
        }
        Ok(ScanHeader { components })
    }
}
