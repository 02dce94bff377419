// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Rgb {
        Rgb { r, g, b }
    }
}

// JFIF 1.02 conversion in 8-bit fixed point.
const CR_TO_R: i32 = 359;
const CB_TO_G: i32 = -88;
const CR_TO_G: i32 = -183;
const CB_TO_B: i32 = 454;

#[inline(always)]
fn to_channel(scaled: i32) -> u8 {
    ((scaled + 128) >> 8).clamp(0, 255) as u8
}

/// Converts one full-range YCbCr sample to RGB.
/// ```
/// # use jfif::color::{Rgb, ycbcr_to_rgb};
/// assert_eq!(ycbcr_to_rgb(76, 85, 255), Rgb::new(254, 0, 0));
/// assert_eq!(ycbcr_to_rgb(200, 128, 128), Rgb::new(200, 200, 200));
/// ```
pub fn ycbcr_to_rgb(y: i32, cb: i32, cr: i32) -> Rgb {
    let y = y << 8;
    let cb = cb - 128;
    let cr = cr - 128;
    Rgb {
        r: to_channel(y + CR_TO_R * cr),
        g: to_channel(y + CB_TO_G * cb + CR_TO_G * cr),
        b: to_channel(y + CB_TO_B * cb),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn neutral_chroma_is_gray() {
        for v in 0..=255 {
            let v8 = v as u8;
            assert_eq!(ycbcr_to_rgb(v, 128, 128), Rgb::new(v8, v8, v8));
        }
    }

    #[test]
    fn primaries() {
        assert_eq!(ycbcr_to_rgb(76, 85, 255), Rgb::new(254, 0, 0));
        assert_eq!(ycbcr_to_rgb(150, 44, 21), Rgb::new(0, 255, 1));
        assert_eq!(ycbcr_to_rgb(29, 255, 107), Rgb::new(0, 0, 254));
    }

    #[test]
    fn clamps_out_of_gamut() {
        assert_eq!(ycbcr_to_rgb(255, 255, 255), Rgb::new(255, 121, 255));
        assert_eq!(ycbcr_to_rgb(0, 0, 0), Rgb::new(0, 136, 0));
    }
}
