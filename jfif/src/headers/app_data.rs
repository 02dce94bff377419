// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use byteorder::{BigEndian, ByteOrder};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum DensityUnits {
    /// Only the aspect ratio is meaningful.
    AspectRatio = 0,
    DotsPerInch = 1,
    DotsPerCm = 2,
}

/// Contents of an APP0 `JFIF` segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JfifInfo {
    pub version: (u8, u8),
    pub units: DensityUnits,
    pub x_density: u16,
    pub y_density: u16,
    pub thumbnail_size: (u8, u8),
}

const JFIF_IDENTIFIER: &[u8] = b"JFIF\0";
const EXIF_IDENTIFIER: &[u8] = b"Exif\0\0";

impl JfifInfo {
    /// Returns `None` for APP0 segments of other formats (such as JFXX) and for
    /// malformed ones; both are skipped like any other application segment.
    pub fn parse(payload: &[u8]) -> Option<JfifInfo> {
        let fields = payload.strip_prefix(JFIF_IDENTIFIER)?;
        if fields.len() < 9 {
            return None;
        }
        Some(JfifInfo {
            version: (fields[0], fields[1]),
            units: DensityUnits::from_u8(fields[2])?,
            x_density: BigEndian::read_u16(&fields[3..5]),
            y_density: BigEndian::read_u16(&fields[5..7]),
            thumbnail_size: (fields[7], fields[8]),
        })
    }
}

/// Whether an APP1 payload carries Exif metadata.
pub fn is_exif(payload: &[u8]) -> bool {
    payload.starts_with(EXIF_IDENTIFIER)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn jfif_segment() {
        let payload = [
            b'J', b'F', b'I', b'F', 0, 1, 2, 1, 0x01, 0x2c, 0x00, 0x48, 0, 0,
        ];
        let info = JfifInfo::parse(&payload).unwrap();
        assert_eq!(info.version, (1, 2));
        assert_eq!(info.units, DensityUnits::DotsPerInch);
        assert_eq!((info.x_density, info.y_density), (300, 72));
        assert_eq!(info.thumbnail_size, (0, 0));
    }

    #[test]
    fn other_app0_segments() {
        assert_eq!(JfifInfo::parse(b"JFXX\0\x10"), None);
        assert_eq!(JfifInfo::parse(b"JFIF\0\x01\x02"), None);
        assert_eq!(
            JfifInfo::parse(&[b'J', b'F', b'I', b'F', 0, 1, 2, 7, 0, 1, 0, 1, 0, 0]),
            None
        );
    }

    #[test]
    fn exif() {
        assert!(is_exif(b"Exif\0\0MM\0*"));
        assert!(!is_exif(b"http://ns.adobe.com/xap/1.0/\0"));
    }
}
