// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::error::{Error, Result};
use crate::frame::FrameState;
use crate::frame::scan::decode_scan;
use crate::headers::{ComponentId, Headers, JfifInfo, Marker};
use crate::image::PixelBuffer;
use crate::util::tracing_wrappers::*;

/// Resource limits for decoding untrusted input.
///
/// The default is unlimited; use [`DecodeLimits::default_safe()`] for
/// content from untrusted sources.
///
/// ```
/// use jfif::DecodeLimits;
///
/// let limits = DecodeLimits::default_safe();
/// assert!(limits.max_pixels.is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct DecodeLimits {
    /// Maximum total pixels allowed (width * height).
    /// Default: `None` (unlimited).
    pub max_pixels: Option<usize>,
}

impl DecodeLimits {
    pub fn default_safe() -> Self {
        Self {
            max_pixels: Some(1 << 28),
        }
    }

    pub fn unlimited() -> Self {
        Self::default()
    }

    fn check(&self, width: usize, height: usize) -> Result<()> {
        match self.max_pixels {
            Some(max) if width.saturating_mul(height) > max => {
                Err(Error::ImageTooLarge(width, height))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct DecodeOptions {
    pub limits: DecodeLimits,
}

impl DecodeOptions {
    pub fn new() -> DecodeOptions {
        DecodeOptions::default()
    }
}

/// What the headers say about an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: usize,
    pub height: usize,
    /// `(h, v)` sampling factors of Y, Cb and Cr.
    pub sampling: [(u8, u8); 3],
    /// MCUs between restart markers; 0 when restart markers are not used.
    pub restart_interval: u16,
    /// Component ids in the order they are interleaved in the scan.
    pub scan_order: [ComponentId; 3],
    pub jfif: Option<JfifInfo>,
    pub has_exif: bool,
}

impl ImageInfo {
    fn from_headers(headers: &Headers) -> ImageInfo {
        let frame = &headers.frame;
        ImageInfo {
            width: frame.width as usize,
            height: frame.height as usize,
            sampling: frame.components.map(|c| (c.h, c.v)),
            restart_interval: headers.restart_interval,
            scan_order: headers.scan.components.map(|c| c.id),
            jfif: headers.jfif,
            has_exif: headers.has_exif,
        }
    }

    /// Width and height of one MCU in pixels.
    pub fn mcu_size(&self) -> (usize, usize) {
        let h_max = self.sampling.iter().map(|s| s.0).max().unwrap_or(1);
        let v_max = self.sampling.iter().map(|s| s.1).max().unwrap_or(1);
        (8 * h_max as usize, 8 * v_max as usize)
    }

    /// Whether the chroma planes are stored at a lower resolution than luma.
    pub fn is_subsampled(&self) -> bool {
        self.sampling.iter().any(|&s| s != self.sampling[0])
    }
}

#[derive(Debug, Clone)]
pub struct DecodedImage {
    info: ImageInfo,
    pixels: PixelBuffer,
}

impl DecodedImage {
    pub fn info(&self) -> &ImageInfo {
        &self.info
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn into_pixels(self) -> PixelBuffer {
        self.pixels
    }
}

/// Parses the headers of a JPEG file up to the start of the scan, without
/// decoding any pixels.
pub fn read_info(data: &[u8]) -> Result<ImageInfo> {
    Ok(ImageInfo::from_headers(&Headers::read(data)?))
}

/// Decodes a baseline JFIF file to 8-bit RGB.
pub fn decode(data: &[u8]) -> Result<DecodedImage> {
    decode_with_options(data, &DecodeOptions::default())
}

#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip_all, fields(bytes = data.len()))
)]
pub fn decode_with_options(data: &[u8], options: &DecodeOptions) -> Result<DecodedImage> {
    let headers = Headers::read(data)?;
    let info = ImageInfo::from_headers(&headers);
    debug!(
        width = info.width,
        height = info.height,
        sampling = ?info.sampling,
        "decoding"
    );
    options.limits.check(info.width, info.height)?;

    let scan_data = data.get(headers.scan_offset..).unwrap_or_default();
    let frame = FrameState::new(headers);
    let mut pixels = PixelBuffer::new(info.width, info.height)?;
    decode_scan(&frame, scan_data, &mut pixels)?;

    if !data.ends_with(&[0xff, Marker::Eoi as u8]) {
        return Err(Error::MissingEoiMarker);
    }
    Ok(DecodedImage { info, pixels })
}

#[cfg(test)]
mod test {
    use jfif_test_utils::UniformImage;
    use test_log::test;

    use super::*;
    use crate::color::Rgb;
    use crate::headers::DensityUnits;
    use crate::util::test::assert_uniform;

    #[test]
    fn info_without_decoding() -> Result<()> {
        let mut image = UniformImage::new(33, 17, [1, 2, 3]);
        image.sampling[0] = (2, 1);
        image.restart_interval = 2;
        // Headers only: no scan data, no EOI.
        let info = read_info(&image.headers().finish())?;
        assert_eq!((info.width, info.height), (33, 17));
        assert_eq!(info.sampling, [(2, 1), (1, 1), (1, 1)]);
        assert_eq!(info.mcu_size(), (16, 8));
        assert!(info.is_subsampled());
        assert_eq!(info.restart_interval, 2);
        assert_eq!(
            info.scan_order,
            [ComponentId::Y, ComponentId::Cb, ComponentId::Cr]
        );
        assert_eq!(info.jfif.map(|j| j.units), Some(DensityUnits::AspectRatio));
        assert!(!info.has_exif);
        Ok(())
    }

    #[test]
    fn decodes_uniform_color() -> Result<()> {
        let data = UniformImage::new(24, 8, [150, 44, 21]).encode();
        let pixels = assert_uniform(&data, [0, 255, 1])?;
        assert_eq!(pixels.size(), (24, 8));
        Ok(())
    }

    #[test]
    fn pixel_limit() {
        let data = UniformImage::new(64, 64, [128; 3]).encode();
        let options = DecodeOptions {
            limits: DecodeLimits {
                max_pixels: Some(64 * 63),
            },
        };
        assert!(matches!(
            decode_with_options(&data, &options),
            Err(Error::ImageTooLarge(64, 64))
        ));
        let options = DecodeOptions {
            limits: DecodeLimits {
                max_pixels: Some(64 * 64),
            },
        };
        assert!(decode_with_options(&data, &options).is_ok());
    }

    #[test]
    fn unlimited_options() -> Result<()> {
        let options = DecodeOptions::new();
        assert_eq!(options.limits.max_pixels, None);
        let options = DecodeOptions {
            limits: DecodeLimits::unlimited(),
        };
        let data = UniformImage::new(4, 2, [76, 85, 255]).encode();
        let bytes = decode_with_options(&data, &options)?.into_pixels().into_bytes();
        assert_eq!(bytes.len(), 4 * 2 * 3);
        assert!(
            bytes
                .chunks_exact(3)
                .all(|px| Rgb::from([px[0], px[1], px[2]]) == Rgb::new(254, 0, 0))
        );
        Ok(())
    }

    #[test]
    fn needs_end_of_image() {
        let mut data = UniformImage::new(8, 8, [128; 3]).encode();
        data.pop();
        assert!(matches!(decode(&data), Err(Error::MissingEoiMarker)));
    }
}
