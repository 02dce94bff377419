// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// The second byte of the marker codes the decoder cares about. Everything else
/// is either a standalone marker or a segment that gets skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum Marker {
    Sof0 = 0xc0,
    Sof1 = 0xc1,
    Sof2 = 0xc2,
    Sof3 = 0xc3,
    Dht = 0xc4,
    Sof5 = 0xc5,
    Sof6 = 0xc6,
    Sof7 = 0xc7,
    Sof9 = 0xc9,
    Sof10 = 0xca,
    Sof11 = 0xcb,
    Dac = 0xcc,
    Sof13 = 0xcd,
    Sof14 = 0xce,
    Sof15 = 0xcf,
    Soi = 0xd8,
    Eoi = 0xd9,
    Sos = 0xda,
    Dqt = 0xdb,
    Dri = 0xdd,
    App0 = 0xe0,
    App1 = 0xe1,
    Com = 0xfe,
}

impl Marker {
    pub fn from_byte(byte: u8) -> Option<Marker> {
        Marker::from_u8(byte)
    }
}

pub const TEM: u8 = 0x01;

/// `RST0..=RST7`.
pub fn is_restart(byte: u8) -> bool {
    (0xd0..=0xd7).contains(&byte)
}

/// Whether a length field follows the marker.
pub fn has_length(byte: u8) -> bool {
    !(byte == TEM || is_restart(byte) || byte == Marker::Soi as u8 || byte == Marker::Eoi as u8)
}
