// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Write;

use color_eyre::eyre::Result;
use jfif::image::PixelBuffer;

/// Binary PPM (P6) with 8-bit samples.
pub fn to_ppm<W: Write>(pixels: &PixelBuffer, buf: &mut W) -> Result<()> {
    write!(buf, "P6\n{} {}\n255\n", pixels.width(), pixels.height())?;
    buf.write_all(pixels.as_bytes())?;
    Ok(())
}
