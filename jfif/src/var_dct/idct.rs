// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Fixed-point 8x8 inverse DCT (Chen-Wang factorization, as in the MPEG
//! reference decoder), bit-exact with its classic C formulation.

use crate::{BLOCK_DIM, BLOCK_SIZE};

// 2048 * sqrt(2) * cos(k * pi / 16)
const W1: i64 = 2841;
const W2: i64 = 2676;
const W3: i64 = 2408;
const W5: i64 = 1609;
const W6: i64 = 1108;
const W7: i64 = 565;
// 256 / sqrt(2)
const R2: i64 = 181;

#[inline(always)]
fn clip(x: i64) -> i32 {
    x.clamp(0, 255) as i32
}

/// 11-bit fixed point output, scaled by 8.
fn idct_row(row: &mut [i32]) {
    let mut x1 = (row[4] as i64) << 11;
    let mut x2 = row[6] as i64;
    let mut x3 = row[2] as i64;
    let mut x4 = row[1] as i64;
    let mut x5 = row[7] as i64;
    let mut x6 = row[5] as i64;
    let mut x7 = row[3] as i64;

    if (x1 | x2 | x3 | x4 | x5 | x6 | x7) == 0 {
        let dc = row[0] << 3;
        row[..BLOCK_DIM].fill(dc);
        return;
    }

    let mut x0 = ((row[0] as i64) << 11) + 128;
    let mut x8 = W7 * (x4 + x5);
    x4 = x8 + (W1 - W7) * x4;
    x5 = x8 - (W1 + W7) * x5;
    x8 = W3 * (x6 + x7);
    x6 = x8 - (W3 - W5) * x6;
    x7 = x8 - (W3 + W5) * x7;

    x8 = x0 + x1;
    x0 -= x1;
    x1 = W6 * (x3 + x2);
    x2 = x1 - (W2 + W6) * x2;
    x3 = x1 + (W2 - W6) * x3;
    x1 = x4 + x6;
    x4 -= x6;
    x6 = x5 + x7;
    x5 -= x7;

    x7 = x8 + x3;
    x8 -= x3;
    x3 = x0 + x2;
    x0 -= x2;
    x2 = (R2 * (x4 + x5) + 128) >> 8;
    x4 = (R2 * (x4 - x5) + 128) >> 8;

    let out = [
        x7 + x1,
        x3 + x2,
        x0 + x4,
        x8 + x6,
        x8 - x6,
        x0 - x4,
        x3 - x2,
        x7 - x1,
    ];
    for (dst, value) in row.iter_mut().zip(out) {
        *dst = (value >> 8) as i32;
    }
}

/// Undoes the row scaling, level shifts by 128 and clips to 8 bits.
fn idct_column(block: &[i32; BLOCK_SIZE], column: usize, out: &mut [i32; BLOCK_SIZE]) {
    let at = |row: usize| block[row * BLOCK_DIM + column] as i64;
    let mut x1 = at(4) << 8;
    let mut x2 = at(6);
    let mut x3 = at(2);
    let mut x4 = at(1);
    let mut x5 = at(7);
    let mut x6 = at(5);
    let mut x7 = at(3);

    if (x1 | x2 | x3 | x4 | x5 | x6 | x7) == 0 {
        let sample = clip(((at(0) + 32) >> 6) + 128);
        for row in 0..BLOCK_DIM {
            out[row * BLOCK_DIM + column] = sample;
        }
        return;
    }

    let mut x0 = (at(0) << 8) + 8192;
    let mut x8 = W7 * (x4 + x5) + 4;
    x4 = (x8 + (W1 - W7) * x4) >> 3;
    x5 = (x8 - (W1 + W7) * x5) >> 3;
    x8 = W3 * (x6 + x7) + 4;
    x6 = (x8 - (W3 - W5) * x6) >> 3;
    x7 = (x8 - (W3 + W5) * x7) >> 3;

    x8 = x0 + x1;
    x0 -= x1;
    x1 = W6 * (x3 + x2) + 4;
    x2 = (x1 - (W2 + W6) * x2) >> 3;
    x3 = (x1 + (W2 - W6) * x3) >> 3;
    x1 = x4 + x6;
    x4 -= x6;
    x6 = x5 + x7;
    x5 -= x7;

    x7 = x8 + x3;
    x8 -= x3;
    x3 = x0 + x2;
    x0 -= x2;
    x2 = (R2 * (x4 + x5) + 128) >> 8;
    x4 = (R2 * (x4 - x5) + 128) >> 8;

    let samples = [
        x7 + x1,
        x3 + x2,
        x0 + x4,
        x8 + x6,
        x8 - x6,
        x0 - x4,
        x3 - x2,
        x7 - x1,
    ];
    for (row, value) in samples.into_iter().enumerate() {
        out[row * BLOCK_DIM + column] = clip((value >> 14) + 128);
    }
}

/// Transforms dequantized coefficients in natural order into level-shifted
/// samples in `0..=255`, in place.
///
/// Coefficients are expected to fit in 16 bits, which holds for everything
/// the block decoder produces.
pub fn idct_8x8(block: &mut [i32; BLOCK_SIZE]) {
    for row in block.chunks_exact_mut(BLOCK_DIM) {
        idct_row(row);
    }
    let mut samples = [0; BLOCK_SIZE];
    for column in 0..BLOCK_DIM {
        idct_column(block, column, &mut samples);
    }
    *block = samples;
}
