// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod block;
pub mod scan;
pub mod upsample;

use crate::entropy_coding::huffman::HuffmanTable;
use crate::error::{Error, Result};
use crate::headers::{
    ComponentInfo, FrameHeader, Headers, HuffmanClass, QuantizationTable, ScanComponent,
    ScanHeader,
};

/// Tables and geometry needed to decode the entropy-coded data of a frame.
#[derive(Debug, Clone)]
pub struct FrameState {
    pub header: FrameHeader,
    pub scan: ScanHeader,
    /// MCUs between restart markers; 0 when restart markers are not used.
    pub restart_interval: u16,
    quant_tables: [Option<QuantizationTable>; 2],
    dc_tables: [Option<HuffmanTable>; 2],
    ac_tables: [Option<HuffmanTable>; 2],
}

impl FrameState {
    pub fn new(headers: Headers) -> FrameState {
        FrameState {
            header: headers.frame,
            scan: headers.scan,
            restart_interval: headers.restart_interval,
            quant_tables: headers.quant_tables,
            dc_tables: headers.dc_tables,
            ac_tables: headers.ac_tables,
        }
    }

    pub fn component(&self, scan_component: &ScanComponent) -> &ComponentInfo {
        self.header.component(scan_component.id)
    }

    pub fn quant_table(&self, id: u8) -> Result<&QuantizationTable> {
        self.quant_tables
            .get(id as usize)
            .and_then(Option::as_ref)
            .ok_or(Error::MissingQuantizationTable(id))
    }

    pub fn huffman_table(&self, class: HuffmanClass, id: u8) -> Result<&HuffmanTable> {
        let tables = match class {
            HuffmanClass::Dc => &self.dc_tables,
            HuffmanClass::Ac => &self.ac_tables,
        };
        tables
            .get(id as usize)
            .and_then(Option::as_ref)
            .ok_or(Error::MissingHuffmanTable { class, id })
    }
}

#[cfg(test)]
mod test {
    use jfif_test_utils::{JpegWriter, UniformImage};
    use test_log::test;

    use super::*;

    #[test]
    fn missing_tables() -> Result<()> {
        let components = UniformImage::new(8, 8, [0; 3]).components();
        let mut writer = JpegWriter::new();
        writer
            .dqt(0, &[1; 64], false)
            .sof0(8, 8, &components)
            .sos(&components);
        let frame = FrameState::new(Headers::read(&writer.finish())?);
        assert!(frame.quant_table(0).is_ok());
        assert!(matches!(
            frame.quant_table(1),
            Err(Error::MissingQuantizationTable(1))
        ));
        assert!(matches!(
            frame.huffman_table(HuffmanClass::Ac, 1),
            Err(Error::MissingHuffmanTable {
                class: HuffmanClass::Ac,
                id: 1
            })
        ));
        Ok(())
    }
}
