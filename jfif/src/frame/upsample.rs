// Copyright (c) the JFIF decoder authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::BLOCK_DIM;

/// Side of the per-component sample grid; large enough for a 2x2 MCU.
pub const GRID_DIM: usize = 2 * BLOCK_DIM;
pub const GRID_SIZE: usize = GRID_DIM * GRID_DIM;

/// Stretches the `8h x 8v` samples decoded into the top left corner of `grid`
/// to cover a whole `8 h_max x 8 v_max` MCU by duplicating samples.
///
/// Sampling factors are 1 or 2, so each direction is either left alone or
/// doubled.
pub fn upsample(grid: &mut [i32; GRID_SIZE], (h, v): (u8, u8), (h_max, v_max): (u8, u8)) {
    if h < h_max {
        for row in grid.chunks_exact_mut(GRID_DIM).take(BLOCK_DIM * v as usize) {
            for x in (0..GRID_DIM).rev() {
                row[x] = row[x / 2];
            }
        }
    }
    if v < v_max {
        for y in (0..GRID_DIM).rev() {
            let src = y / 2 * GRID_DIM;
            grid.copy_within(src..src + GRID_DIM, y * GRID_DIM);
        }
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;

    fn ramp(width: usize, height: usize) -> [i32; GRID_SIZE] {
        let mut grid = [-1; GRID_SIZE];
        for y in 0..height {
            for x in 0..width {
                grid[y * GRID_DIM + x] = (100 * y + x) as i32;
            }
        }
        grid
    }

    #[test]
    fn full_resolution_is_untouched() {
        let mut grid = ramp(16, 16);
        let before = grid;
        upsample(&mut grid, (2, 2), (2, 2));
        assert_eq!(grid, before);

        let mut grid = ramp(8, 8);
        let before = grid;
        upsample(&mut grid, (1, 1), (1, 1));
        assert_eq!(grid, before);
    }

    #[test]
    fn doubles_both_directions() {
        let mut grid = ramp(8, 8);
        upsample(&mut grid, (1, 1), (2, 2));
        for y in 0..GRID_DIM {
            for x in 0..GRID_DIM {
                assert_eq!(grid[y * GRID_DIM + x], (100 * (y / 2) + x / 2) as i32);
            }
        }
    }

    #[test]
    fn doubles_horizontally() {
        let mut grid = ramp(8, 16);
        upsample(&mut grid, (1, 2), (2, 2));
        for y in 0..GRID_DIM {
            for x in 0..GRID_DIM {
                assert_eq!(grid[y * GRID_DIM + x], (100 * y + x / 2) as i32);
            }
        }
    }

    #[test]
    fn doubles_vertically() {
        let mut grid = ramp(16, 8);
        upsample(&mut grid, (2, 1), (2, 2));
        for y in 0..GRID_DIM {
            for x in 0..GRID_DIM {
                assert_eq!(grid[y * GRID_DIM + x], (100 * (y / 2) + x) as i32);
            }
        }
    }

    #[test]
    fn only_the_mcu_area_is_filled() {
        // 4:2:2 style frame: MCU is 16x8, chroma is 8x8.
        let mut grid = ramp(8, 8);
        upsample(&mut grid, (1, 1), (2, 1));
        for y in 0..BLOCK_DIM {
            for x in 0..GRID_DIM {
                assert_eq!(grid[y * GRID_DIM + x], (100 * y + x / 2) as i32);
            }
        }
        assert!(grid[BLOCK_DIM * GRID_DIM..].iter().all(|&s| s == -1));
    }
}
