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

use crate::{Error, Result};

/// An integer that is guaranteed to lie inside `MIN..=MAX`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(into = "i32")]
#[serde(try_from = "i32")]
pub struct Bounded<const MIN: i64, const MAX: i64>(i32);

impl<const MIN: i64, const MAX: i64> Bounded<MIN, MAX> {
    pub const LOWER: i64 = MIN;
    pub const UPPER: i64 = MAX;

    /// Validates `value` against `MIN..=MAX`.
    /// `what` names the value in the error.
    pub fn new_named(what: &'static str, value: i32) -> Result<Self> {
        if (MIN..=MAX).contains(&i64::from(value)) {
            Ok(Self(value))
        } else {
            Err(Error::invalid(what, value))
        }
    }

    pub fn new(value: i32) -> Result<Self> {
        Self::new_named("bounded value", value)
    }

    #[must_use]
    pub fn get(self) -> i32 {
        self.0
    }
}

impl<const MIN: i64, const MAX: i64> Default for Bounded<MIN, MAX> {
    fn default() -> Self {
        // zero clamped into the range, so MIN for positive ranges and MAX for negative ones
        Self(MIN.max(0).min(MAX) as i32)
    }
}

impl<const MIN: i64, const MAX: i64> TryFrom<i32> for Bounded<MIN, MAX> {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        Self::new(value)
    }
}

impl<const MIN: i64, const MAX: i64> From<Bounded<MIN, MAX>> for i32 {
    fn from(value: Bounded<MIN, MAX>) -> Self {
        value.0
    }
}

impl<const MIN: i64, const MAX: i64> std::fmt::Display for Bounded<MIN, MAX> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

pub type Indent = Bounded<0, 127>;
pub type DbTypeId = Bounded<0, 99>;
pub type DbDataId = Bounded<0, 9999>;
pub type DbItemId = Bounded<0, 99>;
pub type CommonEventId = Bounded<0, 9999>;
pub type MapEventId = Bounded<0, 9999>;
pub type MoveSpeed = Bounded<0, 5>;
pub type MoveFrequency = Bounded<0, 5>;
pub type Opacity = Bounded<0, 255>;
pub type WaitFrames = Bounded<0, { i32::MAX as i64 }>;
/// Branch taken when a choice is cancelled, 0 disallows cancelling.
pub type CancelCase = Bounded<0, 11>;
/// One-based position in the party.
pub type PartyMember = Bounded<1, 5>;
