// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::bit_reader::EndOfStream;
use crate::entropy_coding::huffman::{HUFFMAN_MAX_SYMBOLS, HuffmanError};
use crate::headers::HuffmanClass;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No image data: start of image marker not found")]
    NoImageData,
    #[error("Segment out of range: {needed} bytes needed at offset {offset}, {available} available")]
    OutOfRange {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("Invalid segment length {0}")]
    InvalidSegmentLength(u16),
    #[error("Not supported: {0}")]
    NotSupported(String),
    #[error("Unsupported color scheme: only 3-component YCbCr is supported")]
    UnsupportedColorScheme,
    #[error("Unsupported sample precision {0}, only 8 bits are supported")]
    UnsupportedPrecision(u8),
    #[error("Arithmetic coding is not supported")]
    UnsupportedArithmeticCoding,
    #[error("Progressive DCT is not supported")]
    UnsupportedProgressiveDct,
    #[error("Invalid restart interval segment length {0}, expected 4")]
    InvalidRestartInterval(u16),
    #[error("Huffman table has {0} symbols, max is {max}", max = HUFFMAN_MAX_SYMBOLS)]
    HuffmanTableOverflow(usize),
    #[error("Invalid quantization table id {0}")]
    InvalidQuantizationTableId(u8),
    #[error("Invalid Huffman table id {0}")]
    InvalidHuffmanTableId(u8),
    #[error("Huffman decoding failed: {0}")]
    HuffmanDecodeFailure(HuffmanError),
    #[error("Entropy-coded data is truncated")]
    BitstreamExhausted,
    #[error("No end of image marker at the end of the file")]
    MissingEoiMarker,
    #[error("Scan header found before the frame header")]
    MissingFrameHeader,
    #[error("Quantization table {0} is used but never defined")]
    MissingQuantizationTable(u8),
    #[error("{class} Huffman table {id} is used but never defined")]
    MissingHuffmanTable { class: HuffmanClass, id: u8 },
    #[error("Invalid coefficient data: {0}")]
    InvalidCoefficient(String),
    #[error("Invalid image size: {0}x{1}")]
    InvalidImageSize(usize, usize),
    #[error("Image size too large: {0}x{1}")]
    ImageTooLarge(usize, usize),
    #[error("Out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),
    #[error("Pixel ({0}, {1}) is outside the image")]
    PixelOutOfBounds(usize, usize),
}

impl From<EndOfStream> for Error {
    fn from(_: EndOfStream) -> Self {
        Error::BitstreamExhausted
    }
}

impl From<HuffmanError> for Error {
    fn from(err: HuffmanError) -> Self {
        match err {
            HuffmanError::EndOfStream => Error::BitstreamExhausted,
            other => Error::HuffmanDecodeFailure(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn messages_include_limits() {
        assert_eq!(
            Error::HuffmanTableOverflow(257).to_string(),
            "Huffman table has 257 symbols, max is 256"
        );
        let reserve = Vec::<u8>::new().try_reserve_exact(usize::MAX).unwrap_err();
        assert!(matches!(Error::from(reserve), Error::OutOfMemory(_)));
    }

    #[test]
    fn nested_errors_keep_their_origin() {
        assert!(matches!(Error::from(EndOfStream), Error::BitstreamExhausted));
        assert!(matches!(
            Error::from(HuffmanError::EndOfStream),
            Error::BitstreamExhausted
        ));
        assert!(matches!(
            Error::from(HuffmanError::NoSymbolFound),
            Error::HuffmanDecodeFailure(HuffmanError::NoSymbolFound)
        ));
    }

    #[test]
    fn messages() {
        assert_eq!(
            Error::HuffmanTableOverflow(257).to_string(),
            "Huffman table has 257 symbols, max is 256"
        );
        assert_eq!(
            Error::MissingHuffmanTable {
                class: HuffmanClass::Ac,
                id: 1
            }
            .to_string(),
            "AC Huffman table 1 is used but never defined"
        );
    }
}
