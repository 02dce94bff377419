// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod app_data;
pub mod frame_header;
pub mod huffman_table;
pub mod marker;
pub mod quant_table;
pub mod scan_header;
pub mod segment;

use crate::entropy_coding::huffman::HuffmanTable;
use crate::error::{Error, Result};
use crate::util::tracing_wrappers::*;

pub use app_data::{DensityUnits, JfifInfo};
pub use frame_header::{ComponentId, ComponentInfo, FrameHeader};
pub use huffman_table::{HuffmanClass, HuffmanTableDefinition};
pub use marker::Marker;
pub use quant_table::QuantizationTable;
pub use scan_header::{ScanComponent, ScanHeader};
pub use segment::SegmentReader;

/// A header that occupies exactly one marker segment.
pub trait JpegHeader
where
    Self: Sized,
{
    fn read(r: &mut SegmentReader) -> Result<Self>;
}

/// Everything the container says before the entropy-coded data of the first
/// scan.
#[derive(Debug, Clone)]
pub struct Headers {
    pub frame: FrameHeader,
    pub scan: ScanHeader,
    /// Offset of the first byte after the scan header.
    pub scan_offset: usize,
    /// MCUs between restart markers; 0 when restart markers are not used.
    pub restart_interval: u16,
    pub quant_tables: [Option<QuantizationTable>; 2],
    pub dc_tables: [Option<HuffmanTable>; 2],
    pub ac_tables: [Option<HuffmanTable>; 2],
    pub jfif: Option<JfifInfo>,
    pub has_exif: bool,
}

impl Headers {
    /// Parses marker segments from SOI up to and including the first SOS.
    pub fn read(data: &[u8]) -> Result<Headers> {
        let mut r = SegmentReader::new(data);
        loop {
            match r.next_marker().map(Marker::from_byte) {
                None | Some(Some(Marker::Eoi)) => return Err(Error::NoImageData),
                Some(Some(Marker::Soi)) => break,
                Some(_) => {}
            }
        }

        let mut frame = None;
        let mut restart_interval = 0;
        let mut quant_tables = [None, None];
        let mut dc_tables = [None, None];
        let mut ac_tables = [None, None];
        let mut jfif = None;
        let mut has_exif = false;

        loop {
            let Some(code) = r.next_marker() else {
                return Err(Error::NoImageData);
            };
            trace!(offset = r.position() - 2, "marker {code:#04x}");
            let Some(marker) = Marker::from_byte(code) else {
                if marker::has_length(code) {
                    r.read_segment()?;
                }
                continue;
            };
            match marker {
                Marker::Soi => {}
                Marker::Eoi => return Err(Error::NoImageData),
                Marker::Sof0 => {
                    let header = FrameHeader::read(&mut r.read_segment()?)?;
                    debug!(?header, "frame header");
                    frame = Some(header);
                }
                Marker::Sof2 => return Err(Error::UnsupportedProgressiveDct),
                Marker::Sof9
                | Marker::Sof10
                | Marker::Sof11
                | Marker::Sof13
                | Marker::Sof14
                | Marker::Sof15
                | Marker::Dac => return Err(Error::UnsupportedArithmeticCoding),
                Marker::Sof1 | Marker::Sof3 | Marker::Sof5 | Marker::Sof6 | Marker::Sof7 => {
                    return Err(Error::NotSupported(format!(
                        "frame type SOF{}",
                        code - Marker::Sof0 as u8
                    )));
                }
                Marker::Dht => {
                    for definition in HuffmanTableDefinition::read_all(&mut r.read_segment()?)? {
                        debug!(
                            class = %definition.class,
                            id = definition.id,
                            symbols = definition.table.num_symbols(),
                            "Huffman table"
                        );
                        let tables = match definition.class {
                            HuffmanClass::Dc => &mut dc_tables,
                            HuffmanClass::Ac => &mut ac_tables,
                        };
                        tables[definition.id as usize] = Some(definition.table);
                    }
                }
                Marker::Dqt => {
                    for table in QuantizationTable::read_all(&mut r.read_segment()?)? {
                        debug!(
                            id = table.id,
                            sixteen_bit = table.sixteen_bit,
                            "quantization table"
                        );
                        let id = table.id as usize;
                        quant_tables[id] = Some(table);
                    }
                }
                Marker::Dri => {
                    let length = r.read_u16()?;
                    if length != 4 {
                        return Err(Error::InvalidRestartInterval(length));
                    }
                    restart_interval = r.read_payload(length)?.read_u16()?;
                    debug!(restart_interval, "restart interval");
                }
                Marker::Sos => {
                    let frame = frame.ok_or(Error::MissingFrameHeader)?;
                    let scan = ScanHeader::read(&mut r.read_segment()?)?;
                    debug!(?scan, "scan header");
                    return Ok(Headers {
                        frame,
                        scan,
                        scan_offset: r.position(),
                        restart_interval,
                        quant_tables,
                        dc_tables,
                        ac_tables,
                        jfif,
                        has_exif,
                    });
                }
                Marker::App0 => {
                    let payload = r.read_segment()?;
                    if let Some(info) = JfifInfo::parse(payload.rest()) {
                        debug!(?info, "JFIF");
                        jfif = Some(info);
                    }
                }
                Marker::App1 => {
                    has_exif |= app_data::is_exif(r.read_segment()?.rest());
                }
                Marker::Com => {
                    r.read_segment()?;
                }
            }
        }
    }
}
