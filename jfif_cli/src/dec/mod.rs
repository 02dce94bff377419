// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use color_eyre::eyre::{Result, WrapErr};
use jfif::headers::{ComponentId, DensityUnits};
use jfif::{DecodeOptions, DecodedImage, ImageInfo, decode_with_options, read_info};

pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).wrap_err_with(|| format!("Cannot read input file {path:?}"))
}

/// Decodes a whole file, returning the image and the time spent decoding.
pub fn decode_bytes(data: &[u8], options: &DecodeOptions) -> Result<(DecodedImage, Duration)> {
    let start = Instant::now();
    let image = decode_with_options(data, options).wrap_err("Failed to decode JPEG")?;
    Ok((image, start.elapsed()))
}

pub fn header_info(data: &[u8]) -> Result<ImageInfo> {
    read_info(data).wrap_err("Failed to read JPEG headers")
}

fn sampling_name(info: &ImageInfo) -> &'static str {
    match info.sampling {
        [(1, 1), (1, 1), (1, 1)] | [(2, 2), (2, 2), (2, 2)] => "4:4:4",
        [(2, 1), (1, 1), (1, 1)] => "4:2:2",
        [(1, 2), (1, 1), (1, 1)] => "4:4:0",
        [(2, 2), (1, 1), (1, 1)] => "4:2:0",
        _ => "custom",
    }
}

/// One-line summary followed by the optional metadata, like
/// `640x480, YCbCr 4:2:0, restart interval 4`.
pub fn describe(info: &ImageInfo) -> String {
    let mut out = format!(
        "{}x{}, YCbCr {}",
        info.width,
        info.height,
        sampling_name(info)
    );
    if info.restart_interval > 0 {
        let _ = write!(out, ", restart interval {}", info.restart_interval);
    }
    if info.scan_order != [ComponentId::Y, ComponentId::Cb, ComponentId::Cr] {
        let _ = write!(out, ", scan order {:?}", info.scan_order);
    }
    if let Some(jfif) = &info.jfif {
        let units = match jfif.units {
            DensityUnits::AspectRatio => "aspect ratio",
            DensityUnits::DotsPerInch => "dpi",
            DensityUnits::DotsPerCm => "dots/cm",
        };
        let _ = write!(
            out,
            "\nJFIF {}.{:02}, density {}x{} {}",
            jfif.version.0, jfif.version.1, jfif.x_density, jfif.y_density, units
        );
        if jfif.thumbnail_size != (0, 0) {
            let _ = write!(
                out,
                ", {}x{} thumbnail",
                jfif.thumbnail_size.0, jfif.thumbnail_size.1
            );
        }
    }
    if info.has_exif {
        out.push_str("\nExif metadata present");
    }
    out
}
