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

//! Collections that keep their size inside a capacity policy and report every structural change.

mod grid;
mod list;

pub use grid::{Direction, GridChange, TwoDimensionalList};
pub use list::{ConstrainedList, ListChange};

use crate::{Error, Result};

/// How many elements a collection may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
pub enum Capacity {
    /// Exactly this many.
    Fixed(usize),
    /// Between `min` and `max`, inclusive.
    Restricted { min: usize, max: usize },
    Unrestricted,
}

impl Capacity {
    pub fn restricted(min: usize, max: usize) -> Result<Self> {
        if min > max {
            return Err(Error::ValidationMessage(format!(
                "minimum capacity {min} is greater than maximum capacity {max}"
            )));
        }
        Ok(Self::Restricted { min, max })
    }

    #[must_use]
    pub fn allows(self, len: usize) -> bool {
        match self {
            Self::Fixed(n) => len == n,
            Self::Restricted { min, max } => (min..=max).contains(&len),
            Self::Unrestricted => true,
        }
    }

    /// The smallest length this policy accepts.
    #[must_use]
    pub fn min(self) -> usize {
        match self {
            Self::Fixed(n) | Self::Restricted { min: n, .. } => n,
            Self::Unrestricted => 0,
        }
    }

    #[must_use]
    pub fn max(self) -> Option<usize> {
        match self {
            Self::Fixed(n) | Self::Restricted { max: n, .. } => Some(n),
            Self::Unrestricted => None,
        }
    }

    pub(crate) fn check(self, len: usize) -> Result<()> {
        if self.allows(len) {
            Ok(())
        } else {
            Err(Error::Capacity {
                len,
                capacity: self,
            })
        }
    }
}

impl std::fmt::Display for Capacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "exactly {n}"),
            Self::Restricted { min, max } => write!(f, "{min}..={max}"),
            Self::Unrestricted => f.write_str("unrestricted"),
        }
    }
}

/// What kind of structural change happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(strum::Display)]
pub enum ChangeAction {
    Add,
    Remove,
    Replace,
    Move,
    Reset,
}

/// Returned by `subscribe`, used to unsubscribe again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler<E> = Box<dyn FnMut(&E)>;

/// Change handlers of one collection, called in subscription order after each mutation.
///
/// Handlers must not mutate the collection that is notifying them.
pub struct Observers<E> {
    next_id: u64,
    handlers: Vec<(HandlerId, Handler<E>)>,
}

impl<E> Observers<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&E) + 'static) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Returns false if the handler was not registered.
    pub fn unsubscribe(&mut self, id: HandlerId) -> bool {
        let len = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        self.handlers.len() != len
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(crate) fn notify(&mut self, event: &E) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

// Handlers belong to one collection instance, a clone starts without any.
impl<E> Clone for Observers<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// Declares a newtype over [`ConstrainedList`] that always carries the same restricted capacity.
///
/// Read access goes through `Deref<Target = [T]>`, mutations are forwarded. `default` lists the
/// contents of `Default::default()`, which must fit the capacity. Deserialization re-applies the
/// capacity.
macro_rules! restricted_list {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($item:ty), $min:expr, $max:expr;
        default [$($default:expr),* $(,)?];
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        $vis struct $name($crate::collections::ConstrainedList<$item>);

        impl $name {
            pub const MIN_CAPACITY: usize = $min;
            pub const MAX_CAPACITY: usize = $max;

            pub fn new(items: impl IntoIterator<Item = $item>) -> $crate::Result<Self> {
                $crate::collections::ConstrainedList::restricted(items, $min, $max).map(Self)
            }

            #[must_use]
            pub fn as_list(&self) -> &$crate::collections::ConstrainedList<$item> {
                &self.0
            }

            #[must_use]
            pub fn into_vec(self) -> Vec<$item> {
                self.0.into_vec()
            }

            pub fn subscribe(
                &mut self,
                handler: impl FnMut(&$crate::collections::ListChange<$item>) + 'static,
            ) -> $crate::collections::HandlerId {
                self.0.subscribe(handler)
            }

            pub fn unsubscribe(&mut self, id: $crate::collections::HandlerId) -> bool {
                self.0.unsubscribe(id)
            }

            pub fn insert(
                &mut self,
                index: usize,
                items: impl IntoIterator<Item = $item>,
            ) -> $crate::Result<()> {
                self.0.insert(index, items)
            }

            pub fn push(&mut self, item: $item) -> $crate::Result<()> {
                self.0.push(item)
            }

            pub fn remove(&mut self, index: usize, count: usize) -> $crate::Result<Vec<$item>> {
                self.0.remove(index, count)
            }

            pub fn set(
                &mut self,
                index: usize,
                items: impl IntoIterator<Item = $item>,
            ) -> $crate::Result<()> {
                self.0.set(index, items)
            }

            pub fn set_item(&mut self, index: usize, item: $item) -> $crate::Result<()> {
                self.0.set_item(index, item)
            }

            pub fn move_items(
                &mut self,
                old_index: usize,
                new_index: usize,
                count: usize,
            ) -> $crate::Result<()> {
                self.0.move_items(old_index, new_index, count)
            }

            pub fn clear(&mut self) -> $crate::Result<()> {
                self.0.clear()
            }

            pub fn reset(&mut self, items: impl IntoIterator<Item = $item>) -> $crate::Result<()> {
                self.0.reset(items)
            }

            pub fn adjust_length(
                &mut self,
                len: usize,
                default: impl FnMut(usize) -> $item,
            ) -> $crate::Result<()> {
                self.0.adjust_length(len, default)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self($crate::collections::ConstrainedList::new_unchecked(
                    vec![$($default),*],
                    $crate::collections::Capacity::Restricted {
                        min: $min,
                        max: $max,
                    },
                ))
            }
        }

        impl std::ops::Deref for $name {
            type Target = [$item];

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }

        impl TryFrom<Vec<$item>> for $name {
            type Error = $crate::Error;

            fn try_from(items: Vec<$item>) -> $crate::Result<Self> {
                Self::new(items)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serde::Serialize::serialize(&self.0, serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let items = <Vec<$item> as serde::Deserialize<'de>>::deserialize(deserializer)?;
                Self::new(items).map_err(serde::de::Error::custom)
            }
        }
    };
}
pub(crate) use restricted_list;

fn check_index(index: usize, len: usize) -> Result<()> {
    if index <= len {
        Ok(())
    } else {
        Err(Error::IndexOutOfRange { index, len })
    }
}

fn check_range(index: usize, count: usize, len: usize) -> Result<()> {
    match index.checked_add(count) {
        Some(end) if end <= len => Ok(()),
        _ => Err(Error::IndexOutOfRange {
            index: index.max(len),
            len,
        }),
    }
}

/// Moves `count` elements starting at `old_index` so that they start at `new_index`,
/// where `new_index` is measured after the elements were taken out.
fn move_range<T>(items: &mut Vec<T>, old_index: usize, new_index: usize, count: usize) {
    let moved: Vec<T> = items.drain(old_index..old_index + count).collect();
    items.splice(new_index..new_index, moved);
}
