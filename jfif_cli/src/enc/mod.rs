// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod png;
pub mod pnm;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, eyre};
use jfif::image::PixelBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Ppm,
    Png,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<OutputFormat> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("ppm") | Some("pnm") => Ok(OutputFormat::Ppm),
            Some("png") => Ok(OutputFormat::Png),
            _ => Err(eyre!(
                "Output format of {:?} not supported, use .ppm or .png",
                path
            )),
        }
    }
}

pub fn write_image<W: Write>(pixels: &PixelBuffer, format: OutputFormat, buf: &mut W) -> Result<()> {
    match format {
        OutputFormat::Ppm => pnm::to_ppm(pixels, buf),
        OutputFormat::Png => png::to_png(pixels, buf),
    }
}

pub fn save_image(pixels: &PixelBuffer, path: &Path) -> Result<()> {
    let format = OutputFormat::from_path(path)?;
    let file =
        File::create(path).wrap_err_with(|| format!("Failed to create output file {path:?}"))?;
    let mut output = BufWriter::new(file);
    write_image(pixels, format, &mut output)?;
    output.flush()?;
    Ok(())
}
