// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Write;

use color_eyre::eyre::{Result, eyre};
use jfif::image::PixelBuffer;

/// 8-bit RGB PNG tagged as sRGB, which is what JFIF samples are assumed to be.
pub fn to_png<W: Write>(pixels: &PixelBuffer, buf: &mut W) -> Result<()> {
    let width = u32::try_from(pixels.width()).map_err(|_| eyre!("Image too wide for PNG"))?;
    let height = u32::try_from(pixels.height()).map_err(|_| eyre!("Image too tall for PNG"))?;
    let mut info = png::Info::with_size(width, height);
    info.srgb = Some(png::SrgbRenderingIntent::Perceptual);
    let mut encoder = png::Encoder::with_info(buf, info)?;
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Fast);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixels.as_bytes())?;
    writer.finish()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use jfif::decode;
    use jfif_test_utils::UniformImage;

    use super::to_png;

    #[test]
    fn signature_and_size() {
        let data = UniformImage::new(17, 9, [128; 3]).encode();
        let pixels = decode(&data).unwrap().into_pixels();

        let mut out = vec![];
        to_png(&pixels, &mut out).unwrap();
        assert_eq!(&out[..8], b"\x89PNG\r\n\x1a\n");
        // The IHDR chunk comes first.
        assert_eq!(&out[12..16], b"IHDR");
        assert_eq!(u32::from_be_bytes(out[16..20].try_into().unwrap()), 17);
        assert_eq!(u32::from_be_bytes(out[20..24].try_into().unwrap()), 9);
    }
}
