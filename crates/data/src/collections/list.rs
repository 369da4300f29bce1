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

use std::ops::Deref;

use super::{check_index, check_range, move_range, Capacity, ChangeAction, HandlerId, Observers};
use crate::Result;

/// One structural change of a [`ConstrainedList`].
#[derive(Clone, Debug, PartialEq)]
pub struct ListChange<T> {
    pub action: ChangeAction,
    /// Where the affected elements were before the change.
    pub old_index: usize,
    /// Where the affected elements are after the change.
    pub new_index: usize,
    pub old_items: Vec<T>,
    pub new_items: Vec<T>,
    pub old_len: usize,
    pub new_len: usize,
}

/// A list whose length is kept inside a [`Capacity`].
///
/// Every mutation validates first and applies second, so a failed call leaves the list untouched.
/// A successful mutation notifies the subscribed handlers exactly once; calls that change nothing
/// (inserting no items, moving an element onto itself) do not notify.
pub struct ConstrainedList<T> {
    items: Vec<T>,
    capacity: Capacity,
    observers: Observers<ListChange<T>>,
}

impl<T: Clone> ConstrainedList<T> {
    pub fn new(items: impl IntoIterator<Item = T>, capacity: Capacity) -> Result<Self> {
        let items: Vec<T> = items.into_iter().collect();
        capacity.check(items.len())?;
        Ok(Self {
            items,
            capacity,
            observers: Observers::new(),
        })
    }

    pub fn fixed(items: impl IntoIterator<Item = T>, len: usize) -> Result<Self> {
        Self::new(items, Capacity::Fixed(len))
    }

    pub fn restricted(items: impl IntoIterator<Item = T>, min: usize, max: usize) -> Result<Self> {
        Self::new(items, Capacity::restricted(min, max)?)
    }

    #[must_use]
    pub fn unrestricted(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items.into_iter().collect(),
            capacity: Capacity::Unrestricted,
            observers: Observers::new(),
        }
    }

    /// For statically known contents that satisfy `capacity`.
    pub(crate) fn new_unchecked(items: Vec<T>, capacity: Capacity) -> Self {
        debug_assert!(capacity.allows(items.len()));
        Self {
            items,
            capacity,
            observers: Observers::new(),
        }
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&ListChange<T>) + 'static) -> HandlerId {
        self.observers.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: HandlerId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn notify(
        &mut self,
        action: ChangeAction,
        (old_index, new_index): (usize, usize),
        old_items: Vec<T>,
        new_items: Vec<T>,
        old_len: usize,
    ) {
        if self.observers.is_empty() {
            return;
        }
        let change = ListChange {
            action,
            old_index,
            new_index,
            old_items,
            new_items,
            old_len,
            new_len: self.items.len(),
        };
        self.observers.notify(&change);
    }

    pub fn insert(&mut self, index: usize, items: impl IntoIterator<Item = T>) -> Result<()> {
        let items: Vec<T> = items.into_iter().collect();
        let old_len = self.items.len();
        check_index(index, old_len)?;
        self.capacity.check(old_len + items.len())?;
        if items.is_empty() {
            return Ok(());
        }

        self.items.splice(index..index, items.iter().cloned());
        self.notify(ChangeAction::Add, (index, index), Vec::new(), items, old_len);
        Ok(())
    }

    pub fn push(&mut self, item: T) -> Result<()> {
        self.insert(self.items.len(), [item])
    }

    /// Removes `count` elements starting at `index` and returns them.
    pub fn remove(&mut self, index: usize, count: usize) -> Result<Vec<T>> {
        let old_len = self.items.len();
        check_range(index, count, old_len)?;
        self.capacity.check(old_len - count)?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let removed: Vec<T> = self.items.drain(index..index + count).collect();
        self.notify(ChangeAction::Remove, (index, index), removed.clone(), Vec::new(), old_len);
        Ok(removed)
    }

    /// Overwrites the elements starting at `index` with `items`. The length does not change.
    pub fn set(&mut self, index: usize, items: impl IntoIterator<Item = T>) -> Result<()> {
        let items: Vec<T> = items.into_iter().collect();
        let len = self.items.len();
        check_range(index, items.len(), len)?;
        if items.is_empty() {
            return Ok(());
        }

        let old_items: Vec<T> = self
            .items
            .splice(index..index + items.len(), items.iter().cloned())
            .collect();
        self.notify(ChangeAction::Replace, (index, index), old_items, items, len);
        Ok(())
    }

    pub fn set_item(&mut self, index: usize, item: T) -> Result<()> {
        self.set(index, [item])
    }

    /// Moves `count` elements from `old_index` so that they start at `new_index`.
    /// `new_index` is measured after the elements were taken out of the list.
    pub fn move_items(&mut self, old_index: usize, new_index: usize, count: usize) -> Result<()> {
        let len = self.items.len();
        check_range(old_index, count, len)?;
        check_range(new_index, count, len)?;
        if count == 0 || old_index == new_index {
            return Ok(());
        }

        move_range(&mut self.items, old_index, new_index, count);
        let moved = self.items[new_index..new_index + count].to_vec();
        self.notify(ChangeAction::Move, (old_index, new_index), moved.clone(), moved, len);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.reset(Vec::new())
    }

    /// Replaces the whole content.
    pub fn reset(&mut self, items: impl IntoIterator<Item = T>) -> Result<()> {
        let items: Vec<T> = items.into_iter().collect();
        self.capacity.check(items.len())?;

        let old_len = self.items.len();
        let old_items = std::mem::replace(&mut self.items, items.clone());
        self.notify(ChangeAction::Reset, (0, 0), old_items, items, old_len);
        Ok(())
    }

    /// Truncates or extends the list to `len`, building new elements with `default`.
    /// `default` receives the index of the element it creates.
    pub fn adjust_length(&mut self, len: usize, default: impl FnMut(usize) -> T) -> Result<()> {
        self.capacity.check(len)?;
        let old_len = self.items.len();
        match len.cmp(&old_len) {
            std::cmp::Ordering::Less => self.remove(len, old_len - len).map(|_| ()),
            std::cmp::Ordering::Greater => self.insert(old_len, (old_len..len).map(default)),
            std::cmp::Ordering::Equal => Ok(()),
        }
    }
}

impl<T> Deref for ConstrainedList<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T: Clone> Clone for ConstrainedList<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            capacity: self.capacity,
            observers: Observers::new(),
        }
    }
}

impl<T: PartialEq> PartialEq for ConstrainedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.capacity == other.capacity && self.items == other.items
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ConstrainedList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstrainedList")
            .field("capacity", &self.capacity)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl<'a, T> IntoIterator for &'a ConstrainedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: serde::Serialize> serde::Serialize for ConstrainedList<T> {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&self.items, serializer)
    }
}

/// Deserialized lists are unrestricted, types with a policy re-apply it on top.
impl<'de, T: serde::Deserialize<'de> + Clone> serde::Deserialize<'de> for ConstrainedList<T> {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <Vec<T> as serde::Deserialize<'de>>::deserialize(deserializer).map(Self::unrestricted)
    }
}
