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

use super::{check_index, check_range, move_range, Capacity, ChangeAction, HandlerId, Observers};
use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(strum::Display)]
pub enum Direction {
    Row,
    Column,
}

/// One structural change of a [`TwoDimensionalList`].
///
/// For [`Direction::Column`] the item vectors hold columns (one value per row),
/// otherwise they hold rows.
#[derive(Clone, Debug, PartialEq)]
pub struct GridChange<T> {
    pub direction: Direction,
    pub action: ChangeAction,
    pub old_index: usize,
    pub new_index: usize,
    pub old_items: Vec<Vec<T>>,
    pub new_items: Vec<Vec<T>>,
}

/// A rectangular grid whose row count and column count each follow their own [`Capacity`].
///
/// The column count is tracked separately so that a grid without rows still knows its width.
pub struct TwoDimensionalList<T> {
    rows: Vec<Vec<T>>,
    column_len: usize,
    row_capacity: Capacity,
    column_capacity: Capacity,
    observers: Observers<GridChange<T>>,
}

fn check_rows<T>(rows: &[Vec<T>], column_len: usize) -> Result<()> {
    match rows.iter().position(|row| row.len() != column_len) {
        Some(index) => Err(Error::ValidationMessage(format!(
            "row {index} has {} columns, expected {column_len}",
            rows[index].len()
        ))),
        None => Ok(()),
    }
}

fn check_columns<T>(columns: &[Vec<T>], row_len: usize) -> Result<()> {
    match columns.iter().position(|column| column.len() != row_len) {
        Some(index) => Err(Error::ValidationMessage(format!(
            "column {index} has {} rows, expected {row_len}",
            columns[index].len()
        ))),
        None => Ok(()),
    }
}

impl<T: Clone> TwoDimensionalList<T> {
    /// An empty `rows` takes the smallest column count `column_capacity` allows.
    pub fn new(
        rows: Vec<Vec<T>>,
        row_capacity: Capacity,
        column_capacity: Capacity,
    ) -> Result<Self> {
        let column_len = rows.first().map_or(column_capacity.min(), Vec::len);
        check_rows(&rows, column_len)?;
        row_capacity.check(rows.len())?;
        column_capacity.check(column_len)?;

        Ok(Self {
            rows,
            column_len,
            row_capacity,
            column_capacity,
            observers: Observers::new(),
        })
    }

    /// Builds a `row_len` by `column_len` grid, `default` receives `(row, column)`.
    pub fn with_size(
        row_len: usize,
        column_len: usize,
        row_capacity: Capacity,
        column_capacity: Capacity,
        mut default: impl FnMut(usize, usize) -> T,
    ) -> Result<Self> {
        row_capacity.check(row_len)?;
        column_capacity.check(column_len)?;

        let mut rows = Vec::with_capacity(row_len);
        for row in 0..row_len {
            rows.push((0..column_len).map(|column| default(row, column)).collect());
        }

        Ok(Self {
            rows,
            column_len,
            row_capacity,
            column_capacity,
            observers: Observers::new(),
        })
    }

    pub fn row_len(&self) -> usize {
        self.rows.len()
    }

    pub fn column_len(&self) -> usize {
        self.column_len
    }

    pub fn row_capacity(&self) -> Capacity {
        self.row_capacity
    }

    pub fn column_capacity(&self) -> Capacity {
        self.column_capacity
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.column_len == 0
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&T> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn row(&self, row: usize) -> Option<&[T]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn column(&self, column: usize) -> Option<Vec<T>> {
        (column < self.column_len).then(|| self.columns(column, 1).remove(0))
    }

    pub fn rows(&self) -> &[Vec<T>] {
        &self.rows
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<Vec<T>> {
        self.rows.clone()
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&GridChange<T>) + 'static) -> HandlerId {
        self.observers.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: HandlerId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn columns(&self, index: usize, count: usize) -> Vec<Vec<T>> {
        (index..index + count)
            .map(|column| self.rows.iter().map(|row| row[column].clone()).collect())
            .collect()
    }

    fn notify(
        &mut self,
        direction: Direction,
        action: ChangeAction,
        (old_index, new_index): (usize, usize),
        old_items: Vec<Vec<T>>,
        new_items: Vec<Vec<T>>,
    ) {
        self.observers.notify(&GridChange {
            direction,
            action,
            old_index,
            new_index,
            old_items,
            new_items,
        });
    }

    pub fn insert_rows(&mut self, index: usize, rows: impl IntoIterator<Item = Vec<T>>) -> Result<()> {
        let rows: Vec<Vec<T>> = rows.into_iter().collect();
        check_index(index, self.row_len())?;
        check_rows(&rows, self.column_len)?;
        self.row_capacity.check(self.row_len() + rows.len())?;
        if rows.is_empty() {
            return Ok(());
        }

        self.rows.splice(index..index, rows.iter().cloned());
        self.notify(Direction::Row, ChangeAction::Add, (index, index), Vec::new(), rows);
        Ok(())
    }

    /// Each inserted column holds one value per row.
    pub fn insert_columns(
        &mut self,
        index: usize,
        columns: impl IntoIterator<Item = Vec<T>>,
    ) -> Result<()> {
        let columns: Vec<Vec<T>> = columns.into_iter().collect();
        check_index(index, self.column_len)?;
        check_columns(&columns, self.row_len())?;
        self.column_capacity.check(self.column_len + columns.len())?;
        if columns.is_empty() {
            return Ok(());
        }

        for (row_index, row) in self.rows.iter_mut().enumerate() {
            row.splice(index..index, columns.iter().map(|column| column[row_index].clone()));
        }
        self.column_len += columns.len();
        self.notify(Direction::Column, ChangeAction::Add, (index, index), Vec::new(), columns);
        Ok(())
    }

    pub fn remove_rows(&mut self, index: usize, count: usize) -> Result<Vec<Vec<T>>> {
        check_range(index, count, self.row_len())?;
        self.row_capacity.check(self.row_len() - count)?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let removed: Vec<Vec<T>> = self.rows.drain(index..index + count).collect();
        self.notify(Direction::Row, ChangeAction::Remove, (index, index), removed.clone(), Vec::new());
        Ok(removed)
    }

    /// Returns the removed columns.
    pub fn remove_columns(&mut self, index: usize, count: usize) -> Result<Vec<Vec<T>>> {
        check_range(index, count, self.column_len)?;
        self.column_capacity.check(self.column_len - count)?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let removed = self.columns(index, count);
        for row in &mut self.rows {
            row.drain(index..index + count);
        }
        self.column_len -= count;
        self.notify(Direction::Column, ChangeAction::Remove, (index, index), removed.clone(), Vec::new());
        Ok(removed)
    }

    /// `new_index` is measured after the rows were taken out, as in [`ConstrainedList::move_items`].
    ///
    /// [`ConstrainedList::move_items`]: super::ConstrainedList::move_items
    pub fn move_rows(&mut self, old_index: usize, new_index: usize, count: usize) -> Result<()> {
        check_range(old_index, count, self.row_len())?;
        check_range(new_index, count, self.row_len())?;
        if count == 0 || old_index == new_index {
            return Ok(());
        }

        move_range(&mut self.rows, old_index, new_index, count);
        let moved = self.rows[new_index..new_index + count].to_vec();
        self.notify(Direction::Row, ChangeAction::Move, (old_index, new_index), moved.clone(), moved);
        Ok(())
    }

    pub fn move_columns(&mut self, old_index: usize, new_index: usize, count: usize) -> Result<()> {
        check_range(old_index, count, self.column_len)?;
        check_range(new_index, count, self.column_len)?;
        if count == 0 || old_index == new_index {
            return Ok(());
        }

        for row in &mut self.rows {
            move_range(row, old_index, new_index, count);
        }
        let moved = self.columns(new_index, count);
        self.notify(Direction::Column, ChangeAction::Move, (old_index, new_index), moved.clone(), moved);
        Ok(())
    }

    /// Replaces the rows starting at `index`.
    pub fn overwrite_rows(&mut self, index: usize, rows: impl IntoIterator<Item = Vec<T>>) -> Result<()> {
        let rows: Vec<Vec<T>> = rows.into_iter().collect();
        check_range(index, rows.len(), self.row_len())?;
        check_rows(&rows, self.column_len)?;
        if rows.is_empty() {
            return Ok(());
        }

        let old: Vec<Vec<T>> = self
            .rows
            .splice(index..index + rows.len(), rows.iter().cloned())
            .collect();
        self.notify(Direction::Row, ChangeAction::Replace, (index, index), old, rows);
        Ok(())
    }

    /// Replaces the columns starting at `index`.
    pub fn overwrite_columns(
        &mut self,
        index: usize,
        columns: impl IntoIterator<Item = Vec<T>>,
    ) -> Result<()> {
        let columns: Vec<Vec<T>> = columns.into_iter().collect();
        check_range(index, columns.len(), self.column_len)?;
        check_columns(&columns, self.row_len())?;
        if columns.is_empty() {
            return Ok(());
        }

        let old = self.columns(index, columns.len());
        for (row_index, row) in self.rows.iter_mut().enumerate() {
            for (offset, column) in columns.iter().enumerate() {
                row[index + offset] = column[row_index].clone();
            }
        }
        self.notify(Direction::Column, ChangeAction::Replace, (index, index), old, columns);
        Ok(())
    }

    /// Reported as a row replacement.
    pub fn set_cell(&mut self, row: usize, column: usize, value: T) -> Result<()> {
        if row >= self.row_len() {
            return Err(Error::IndexOutOfRange {
                index: row,
                len: self.row_len(),
            });
        }
        if column >= self.column_len {
            return Err(Error::IndexOutOfRange {
                index: column,
                len: self.column_len,
            });
        }

        let old = vec![self.rows[row].clone()];
        self.rows[row][column] = value;
        let new = vec![self.rows[row].clone()];
        self.notify(Direction::Row, ChangeAction::Replace, (row, row), old, new);
        Ok(())
    }

    /// Replaces the whole grid. An empty `rows` keeps the current column count.
    pub fn reset(&mut self, rows: Vec<Vec<T>>) -> Result<()> {
        let column_len = rows.first().map_or(self.column_len, Vec::len);
        check_rows(&rows, column_len)?;
        self.row_capacity.check(rows.len())?;
        self.column_capacity.check(column_len)?;

        let old = std::mem::replace(&mut self.rows, rows.clone());
        self.column_len = column_len;
        self.notify(Direction::Row, ChangeAction::Reset, (0, 0), old, rows);
        Ok(())
    }

    /// Resizes both directions, keeping the cells where old and new index ranges overlap.
    ///
    /// Cells of appended rows come from `row_default`, cells of appended columns in rows that
    /// already existed come from `column_default`, both receive `(row, column)`.
    /// A change in only one direction is reported as an add or remove in that direction,
    /// a change in both as a single reset.
    pub fn adjust_length(
        &mut self,
        row_len: usize,
        column_len: usize,
        row_default: impl FnMut(usize, usize) -> T,
        column_default: impl FnMut(usize, usize) -> T,
    ) -> Result<()> {
        self.row_capacity.check(row_len)?;
        self.column_capacity.check(column_len)?;

        let both = row_len != self.row_len() && column_len != self.column_len;
        let old_rows = both.then(|| self.rows.clone());
        let column_change = self.apply_column_len(column_len, column_default);
        let row_change = self.apply_row_len(row_len, row_default);

        let change = match old_rows {
            Some(old) => Some(GridChange {
                direction: Direction::Row,
                action: ChangeAction::Reset,
                old_index: 0,
                new_index: 0,
                old_items: old,
                new_items: self.rows.clone(),
            }),
            None => column_change.or(row_change),
        };
        if let Some(change) = change {
            self.observers.notify(&change);
        }
        Ok(())
    }

    fn apply_column_len(
        &mut self,
        len: usize,
        mut default: impl FnMut(usize, usize) -> T,
    ) -> Option<GridChange<T>> {
        let old_len = self.column_len;
        let (action, old_items, new_items) = match len.cmp(&old_len) {
            std::cmp::Ordering::Equal => return None,
            std::cmp::Ordering::Less => {
                let removed = self.columns(len, old_len - len);
                for row in &mut self.rows {
                    row.truncate(len);
                }
                (ChangeAction::Remove, removed, Vec::new())
            }
            std::cmp::Ordering::Greater => {
                for (row_index, row) in self.rows.iter_mut().enumerate() {
                    row.extend((old_len..len).map(|column| default(row_index, column)));
                }
                (ChangeAction::Add, Vec::new(), self.columns(old_len, len - old_len))
            }
        };
        self.column_len = len;

        let index = len.min(old_len);
        Some(GridChange {
            direction: Direction::Column,
            action,
            old_index: index,
            new_index: index,
            old_items,
            new_items,
        })
    }

    fn apply_row_len(
        &mut self,
        len: usize,
        mut default: impl FnMut(usize, usize) -> T,
    ) -> Option<GridChange<T>> {
        let old_len = self.rows.len();
        let (action, old_items, new_items) = match len.cmp(&old_len) {
            std::cmp::Ordering::Equal => return None,
            std::cmp::Ordering::Less => {
                let removed: Vec<Vec<T>> = self.rows.drain(len..).collect();
                (ChangeAction::Remove, removed, Vec::new())
            }
            std::cmp::Ordering::Greater => {
                let column_len = self.column_len;
                let added: Vec<Vec<T>> = (old_len..len)
                    .map(|row| (0..column_len).map(|column| default(row, column)).collect())
                    .collect();
                self.rows.extend(added.iter().cloned());
                (ChangeAction::Add, Vec::new(), added)
            }
        };

        let index = len.min(old_len);
        Some(GridChange {
            direction: Direction::Row,
            action,
            old_index: index,
            new_index: index,
            old_items,
            new_items,
        })
    }
}

impl<T> std::ops::Index<(usize, usize)> for TwoDimensionalList<T> {
    type Output = T;

    fn index(&self, (row, column): (usize, usize)) -> &Self::Output {
        &self.rows[row][column]
    }
}

impl<T: Clone> Clone for TwoDimensionalList<T> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            column_len: self.column_len,
            row_capacity: self.row_capacity,
            column_capacity: self.column_capacity,
            observers: Observers::new(),
        }
    }
}

impl<T: PartialEq> PartialEq for TwoDimensionalList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.column_len == other.column_len
            && self.row_capacity == other.row_capacity
            && self.column_capacity == other.column_capacity
            && self.rows == other.rows
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for TwoDimensionalList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwoDimensionalList")
            .field("row_capacity", &self.row_capacity)
            .field("column_capacity", &self.column_capacity)
            .field("column_len", &self.column_len)
            .field("rows", &self.rows)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn grid(rows: usize, columns: usize) -> TwoDimensionalList<(usize, usize)> {
        TwoDimensionalList::with_size(
            rows,
            columns,
            Capacity::Unrestricted,
            Capacity::Unrestricted,
            |r, c| (r, c),
        )
        .unwrap()
    }

    fn recorded<T: Clone + 'static>(
        list: &mut TwoDimensionalList<T>,
    ) -> Rc<RefCell<Vec<GridChange<T>>>> {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = changes.clone();
        list.subscribe(move |change| sink.borrow_mut().push(change.clone()));
        changes
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let result = TwoDimensionalList::new(
            vec![vec![1, 2], vec![3]],
            Capacity::Unrestricted,
            Capacity::Unrestricted,
        );
        assert!(matches!(result, Err(Error::ValidationMessage(_))));

        let mut list = grid(2, 2);
        assert!(list.insert_rows(0, [vec![(9, 9)]]).is_err());
        assert!(list.insert_columns(0, [vec![(9, 9)]]).is_err());
        assert_eq!(list, grid(2, 2));
    }

    #[test]
    fn insert_and_remove_columns() {
        let mut list = grid(2, 3);
        let changes = recorded(&mut list);

        list.insert_columns(1, [vec![(7, 0), (7, 1)]]).unwrap();
        assert_eq!(list.column_len(), 4);
        assert_eq!(list.row(0).unwrap(), [(0, 0), (7, 0), (0, 1), (0, 2)]);
        assert_eq!(list.column(1).unwrap(), [(7, 0), (7, 1)]);

        let removed = list.remove_columns(0, 2).unwrap();
        assert_eq!(removed, [vec![(0, 0), (1, 0)], vec![(7, 0), (7, 1)]]);
        assert_eq!(list.column_len(), 2);

        let changes = changes.borrow();
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().all(|c| c.direction == Direction::Column));
        assert_eq!(changes[1].action, ChangeAction::Remove);
    }

    #[test]
    fn move_rows_and_columns() {
        let mut list = grid(3, 3);
        list.move_rows(0, 2, 1).unwrap();
        assert_eq!(list[(2, 0)], (0, 0));
        assert_eq!(list[(0, 0)], (1, 0));

        list.move_columns(2, 0, 1).unwrap();
        assert_eq!(list.row(0).unwrap(), [(1, 2), (1, 0), (1, 1)]);
    }

    #[test]
    fn overwrite_keeps_shape() {
        let mut list = grid(2, 2);
        list.overwrite_columns(1, [vec![(5, 5), (6, 6)]]).unwrap();
        assert_eq!(list.column(1).unwrap(), [(5, 5), (6, 6)]);
        list.overwrite_rows(0, [vec![(8, 8), (8, 9)]]).unwrap();
        assert_eq!(list.row(0).unwrap(), [(8, 8), (8, 9)]);
        assert!(list.overwrite_rows(1, [vec![(0, 0), (0, 0)], vec![(0, 0), (0, 0)]]).is_err());
        assert_eq!((list.row_len(), list.column_len()), (2, 2));
    }

    #[test]
    fn capacities_are_independent() {
        let mut list = TwoDimensionalList::with_size(
            2,
            2,
            Capacity::restricted(1, 3).unwrap(),
            Capacity::Fixed(2),
            |_, _| 0,
        )
        .unwrap();

        list.insert_rows(2, [vec![1, 1]]).unwrap();
        assert!(matches!(list.insert_rows(0, [vec![1, 1]]), Err(Error::Capacity { .. })));
        assert!(matches!(list.insert_columns(0, [vec![1, 1, 1]]), Err(Error::Capacity { .. })));
        assert!(list.remove_columns(0, 1).is_err());
        list.remove_rows(0, 2).unwrap();
        assert!(list.remove_rows(0, 1).is_err());
        assert_eq!((list.row_len(), list.column_len()), (1, 2));
    }

    #[test]
    fn adjust_length_in_one_direction() {
        let mut list = grid(2, 2);
        let changes = recorded(&mut list);

        list.adjust_length(2, 3, |_, _| (0, 0), |r, c| (r + 10, c + 10)).unwrap();
        assert_eq!(list.row(1).unwrap(), [(1, 0), (1, 1), (11, 12)]);

        list.adjust_length(1, 3, |_, _| (0, 0), |_, _| (0, 0)).unwrap();
        assert_eq!(list.row_len(), 1);

        let changes = changes.borrow();
        assert_eq!(changes.len(), 2);
        assert_eq!((changes[0].direction, changes[0].action), (Direction::Column, ChangeAction::Add));
        assert_eq!(changes[0].new_items, [vec![(10, 12), (11, 12)]]);
        assert_eq!((changes[1].direction, changes[1].action), (Direction::Row, ChangeAction::Remove));
    }

    #[test]
    fn adjust_length_in_both_directions_is_one_reset() {
        let mut list = grid(2, 2);
        let changes = recorded(&mut list);

        list.adjust_length(3, 1, |r, c| (r + 20, c + 20), |_, _| (0, 0)).unwrap();
        assert_eq!(list.to_vec(), [vec![(0, 0)], vec![(1, 0)], vec![(22, 20)]]);

        let changes = changes.borrow();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].action, ChangeAction::Reset);
        assert_eq!(changes[0].old_items, grid(2, 2).to_vec());
    }

    #[test]
    fn empty_grid_remembers_width() {
        let mut list = grid(1, 3);
        list.remove_rows(0, 1).unwrap();
        assert_eq!(list.column_len(), 3);
        assert!(list.insert_rows(0, [vec![(0, 0); 2]]).is_err());
        list.insert_rows(0, [vec![(0, 0); 3]]).unwrap();

        let empty = TwoDimensionalList::<u8>::new(
            Vec::new(),
            Capacity::Unrestricted,
            Capacity::restricted(4, 8).unwrap(),
        )
        .unwrap();
        assert_eq!(empty.column_len(), 4);
    }

    #[test]
    fn set_cell_reports_the_row() {
        let mut list = grid(2, 2);
        let changes = recorded(&mut list);
        list.set_cell(1, 0, (9, 9)).unwrap();
        assert!(list.set_cell(2, 0, (9, 9)).is_err());

        let changes = changes.borrow();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].old_items, [vec![(1, 0), (1, 1)]]);
        assert_eq!(changes[0].new_items, [vec![(9, 9), (1, 1)]]);
    }
}
