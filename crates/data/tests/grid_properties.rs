// Copyright (C) 2024 Wodi contributors
//
// This file is part of Wodi.
//
// Wodi is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Wodi is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Wodi.  If not, see <http://www.gnu.org/licenses/>.

use std::cell::Cell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wodi_data::collections::{Capacity, TwoDimensionalList};

fn block(rng: &mut StdRng, count: usize, len: usize) -> Vec<Vec<u32>> {
    (0..count)
        .map(|_| (0..len).map(|_| rng.gen()).collect())
        .collect()
}

/// Occasionally off by one so that ragged input gets exercised.
fn length(rng: &mut StdRng, len: usize) -> usize {
    if rng.gen_ratio(1, 8) {
        len + 1
    } else {
        len
    }
}

fn assert_rectangular(grid: &TwoDimensionalList<u32>) {
    for row in grid.rows() {
        assert_eq!(row.len(), grid.column_len());
    }
    assert!(grid.row_capacity().allows(grid.row_len()));
    assert!(grid.column_capacity().allows(grid.column_len()));
}

#[test]
fn random_operations_keep_the_grid_rectangular() {
    let mut rng = StdRng::seed_from_u64(0x00C0_FFEE);
    let mut grid = TwoDimensionalList::with_size(
        3,
        3,
        Capacity::restricted(1, 8).unwrap(),
        Capacity::restricted(1, 6).unwrap(),
        |row, column| (row * 10 + column) as u32,
    )
    .unwrap();

    let notifications = Rc::new(Cell::new(0));
    let counter = notifications.clone();
    grid.subscribe(move |_| counter.set(counter.get() + 1));

    for _ in 0..2_000 {
        let before = grid.clone();
        let (rows, columns) = (grid.row_len(), grid.column_len());
        notifications.set(0);

        let result = match rng.gen_range(0..10) {
            0 => {
                let index = rng.gen_range(0..=rows + 1);
                let len = length(&mut rng, columns);
                let count = rng.gen_range(0..3);
                let new_rows = block(&mut rng, count, len);
                grid.insert_rows(index, new_rows)
            }
            1 => {
                let index = rng.gen_range(0..=columns + 1);
                let len = length(&mut rng, rows);
                let count = rng.gen_range(0..3);
                let new_columns = block(&mut rng, count, len);
                grid.insert_columns(index, new_columns)
            }
            2 => {
                let index = rng.gen_range(0..=rows);
                let count = rng.gen_range(0..3);
                grid.remove_rows(index, count).map(|_| ())
            }
            3 => {
                let index = rng.gen_range(0..=columns);
                let count = rng.gen_range(0..3);
                grid.remove_columns(index, count).map(|_| ())
            }
            4 => {
                let count = rng.gen_range(0..3);
                let old = rng.gen_range(0..=rows);
                let new = rng.gen_range(0..=rows);
                grid.move_rows(old, new, count)
            }
            5 => {
                let count = rng.gen_range(0..3);
                let old = rng.gen_range(0..=columns);
                let new = rng.gen_range(0..=columns);
                grid.move_columns(old, new, count)
            }
            6 => {
                let index = rng.gen_range(0..=rows);
                let len = length(&mut rng, columns);
                let count = rng.gen_range(0..3);
                let new_rows = block(&mut rng, count, len);
                grid.overwrite_rows(index, new_rows)
            }
            7 => {
                let index = rng.gen_range(0..=columns);
                let len = length(&mut rng, rows);
                let count = rng.gen_range(0..3);
                let new_columns = block(&mut rng, count, len);
                grid.overwrite_columns(index, new_columns)
            }
            8 => {
                let new_rows = rng.gen_range(0..=9);
                let new_columns = rng.gen_range(0..=7);
                grid.adjust_length(new_rows, new_columns, |_, _| 1, |_, _| 2)
            }
            _ => {
                let new_rows = rng.gen_range(0..=9);
                let len = rng.gen_range(0..=7);
                let grid_rows = block(&mut rng, new_rows, len);
                grid.reset(grid_rows)
            }
        };

        assert_rectangular(&grid);
        assert!(notifications.get() <= 1);
        if result.is_err() {
            assert_eq!(grid, before);
            assert_eq!(notifications.get(), 0);
        }
    }
}

#[test]
fn adjust_length_keeps_overlapping_cells() {
    let mut grid = TwoDimensionalList::with_size(
        4,
        4,
        Capacity::Unrestricted,
        Capacity::Unrestricted,
        |row, column| (row * 10 + column) as u32,
    )
    .unwrap();

    grid.adjust_length(2, 6, |_, _| 0, |_, _| 99).unwrap();
    assert_eq!(grid.row(1).unwrap(), [10, 11, 12, 13, 99, 99]);

    grid.adjust_length(3, 2, |row, column| (row * 100 + column) as u32, |_, _| 0)
        .unwrap();
    assert_eq!(grid.to_vec(), [vec![0, 1], vec![10, 11], vec![200, 201]]);
}
