// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Floating point transforms, used to check the integer IDCT.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::{BLOCK_DIM, BLOCK_SIZE};

#[inline(always)]
fn alpha(u: usize) -> f64 {
    if u == 0 { FRAC_1_SQRT_2 } else { 1.0 }
}

/// Unnormalized DCT-II: `X[k] = scale * sum_n x[n] cos(pi / N * (n + 1/2) * k)`.
pub fn dct2<const N: usize>(input: &[f64; N], scale: f64) -> [f64; N] {
    std::array::from_fn(|k| {
        let sum: f64 = input
            .iter()
            .enumerate()
            .map(|(n, x)| x * (PI / N as f64 * (n as f64 + 0.5) * k as f64).cos())
            .sum();
        scale * sum
    })
}

/// Unnormalized DCT-III. With `scale = 2 / N` it inverts [`dct2`].
pub fn dct3<const N: usize>(input: &[f64; N], scale: f64) -> [f64; N] {
    std::array::from_fn(|n| {
        let sum: f64 = input
            .iter()
            .enumerate()
            .skip(1)
            .map(|(k, x)| x * (PI / N as f64 * (n as f64 + 0.5) * k as f64).cos())
            .sum();
        scale * (0.5 * input[0] + sum)
    })
}

/// `f(x) = 1/2 * sum_u C(u) F(u) cos((2x + 1) u pi / 16)`, with `C(0) = 1/sqrt(2)`.
pub fn idct1d(input: &[f64; BLOCK_DIM]) -> [f64; BLOCK_DIM] {
    let mut weighted = *input;
    weighted[0] *= 2.0 * alpha(0);
    dct3(&weighted, 0.5)
}

/// Separable 2-D JPEG inverse transform of a block in natural order, without
/// level shift.
pub fn idct2d(coefficients: &[f64; BLOCK_SIZE]) -> [f64; BLOCK_SIZE] {
    let mut rows = [0.0; BLOCK_SIZE];
    for (src, dst) in coefficients
        .chunks_exact(BLOCK_DIM)
        .zip(rows.chunks_exact_mut(BLOCK_DIM))
    {
        let row: [f64; BLOCK_DIM] = std::array::from_fn(|x| src[x]);
        dst.copy_from_slice(&idct1d(&row));
    }
    let mut out = [0.0; BLOCK_SIZE];
    for x in 0..BLOCK_DIM {
        let column: [f64; BLOCK_DIM] = std::array::from_fn(|y| rows[y * BLOCK_DIM + x]);
        for (y, value) in idct1d(&column).into_iter().enumerate() {
            out[y * BLOCK_DIM + x] = value;
        }
    }
    out
}

/// Level-shifted, rounded and clipped samples.
pub fn reference_samples(block: &[i32; BLOCK_SIZE]) -> [i32; BLOCK_SIZE] {
    let coefficients = block.map(|c| c as f64);
    idct2d(&coefficients).map(|f| (f.round() + 128.0).clamp(0.0, 255.0) as i32)
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;
    use test_log::test;

    use crate::util::test::assert_all_almost_eq;

    use super::*;

    #[test]
    fn dct3_inverts_dct2() {
        let input = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let encoded = dct2(&input, 1.0);
        assert_all_almost_eq!([encoded[0]], [28.0], 1e-9);
        let decoded = dct3(&encoded, 2.0 / 8.0);
        assert_all_almost_eq!(decoded, input, 1e-9);
    }

    #[test]
    fn dc_only_vector() {
        let mut input = [0.0; 8];
        input[0] = 1024.0;
        assert_all_almost_eq!(dct3(&input, 2.0 / 8.0), [128.0; 8], 1e-9);
        assert_all_almost_eq!(idct1d(&input), [1024.0 * FRAC_1_SQRT_2 / 2.0; 8], 1e-9);
    }

    #[test]
    fn dc_only_block() {
        let mut block = [0.0; BLOCK_SIZE];
        block[0] = 1024.0;
        assert_all_almost_eq!(idct2d(&block), [128.0; BLOCK_SIZE], 1e-9);
    }

    #[test]
    fn idct2d_is_separable_in_both_orders() {
        let mut rng = XorShiftRng::seed_from_u64(7);
        let block: [f64; BLOCK_SIZE] = std::array::from_fn(|_| rng.random_range(-64.0..64.0));
        let transposed: [f64; BLOCK_SIZE] =
            std::array::from_fn(|i| block[(i % BLOCK_DIM) * BLOCK_DIM + i / BLOCK_DIM]);
        let out = idct2d(&block);
        let out_transposed = idct2d(&transposed);
        for y in 0..BLOCK_DIM {
            for x in 0..BLOCK_DIM {
                assert_all_almost_eq!(
                    [out[y * BLOCK_DIM + x]],
                    [out_transposed[x * BLOCK_DIM + y]],
                    1e-9
                );
            }
        }
    }
}
