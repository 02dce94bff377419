// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use jfif::{DecodeLimits, DecodeOptions};
use jfif_cli::dec::{decode_bytes, describe, header_info, read_file};
use jfif_cli::enc::save_image;

#[derive(Parser)]
#[command(about = "Decodes baseline JPEG (JFIF) files")]
struct Opt {
    /// Input JPEG file
    input: PathBuf,

    /// Output image file, should end in .ppm or .png
    output: Option<PathBuf>,

    /// Only print what the headers say about the image
    #[clap(long)]
    info: bool,

    /// Refuse images with more pixels than this
    #[clap(long)]
    max_pixels: Option<usize>,

    /// Print decoding time
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    #[cfg(feature = "tracing-subscriber")]
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(EnvFilter::from_default_env())
            .init();
    }

    let opt = Opt::parse();
    let data = read_file(&opt.input)?;

    if opt.info {
        println!("{}", describe(&header_info(&data)?));
        return Ok(());
    }

    let output = opt
        .output
        .ok_or_else(|| eyre!("An output file is required unless --info is given"))?;
    let mut options = DecodeOptions::new();
    options.limits = match opt.max_pixels {
        Some(max_pixels) => DecodeLimits {
            max_pixels: Some(max_pixels),
        },
        None => DecodeLimits::unlimited(),
    };
    let (image, duration) = decode_bytes(&data, &options)?;
    if opt.verbose {
        let (width, height) = image.pixels().size();
        let megapixels = (width * height) as f64 / 1e6;
        println!(
            "Decoded {width}x{height} in {:.3} ms, {:.2} MP/s",
            duration.as_secs_f64() * 1e3,
            megapixels / duration.as_secs_f64().max(f64::EPSILON)
        );
    }
    save_image(image.pixels(), &output)
}
