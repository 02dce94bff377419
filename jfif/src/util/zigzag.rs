// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::BLOCK_SIZE;

/// Natural (row-major) index of the `i`-th coefficient in zigzag scan order.
pub const ZIGZAG: [usize; BLOCK_SIZE] = [
    0, 1, 8, 16, 9, 2, 3, 10, //
    17, 24, 32, 25, 18, 11, 4, 5, //
    12, 19, 26, 33, 40, 48, 41, 34, //
    27, 20, 13, 6, 7, 14, 21, 28, //
    35, 42, 49, 56, 57, 50, 43, 36, //
    29, 22, 15, 23, 30, 37, 44, 51, //
    58, 59, 52, 45, 38, 31, 39, 46, //
    53, 60, 61, 54, 47, 55, 62, 63,
];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn is_permutation() {
        let mut seen = [false; BLOCK_SIZE];
        for &pos in ZIGZAG.iter() {
            assert!(!seen[pos]);
            seen[pos] = true;
        }
    }

    #[test]
    fn walks_anti_diagonals() {
        // Consecutive entries move by one step along a diagonal, or to the next one.
        for pair in ZIGZAG.windows(2) {
            let (r0, c0) = ((pair[0] / 8) as i32, (pair[0] % 8) as i32);
            let (r1, c1) = ((pair[1] / 8) as i32, (pair[1] % 8) as i32);
            let diagonal_step = (r1 + c1) - (r0 + c0);
            assert!(diagonal_step == 0 || diagonal_step == 1, "{pair:?}");
        }
    }
}
