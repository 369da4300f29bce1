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

//! Sub-codes packed into the flag arguments of commands.

use num_enum::TryFromPrimitive;

use crate::{Error, Result};

/// Extracts a sub-code enumeration from `bits`.
pub(crate) fn sub_code<T>(what: &'static str, bits: i32) -> Result<T>
where
    T: TryFromPrimitive<Primitive = u8>,
{
    u8::try_from(bits)
        .ok()
        .and_then(|bits| T::try_from_primitive(bits).ok())
        .ok_or(Error::invalid(what, bits))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(
    num_enum::TryFromPrimitive,
    num_enum::IntoPrimitive,
    strum::Display,
    strum::EnumIter
)]
#[derive(serde::Deserialize, serde::Serialize)]
#[repr(u8)]
pub enum AssignmentOperator {
    #[strum(to_string = "=")]
    Assign = 0,
    #[strum(to_string = "+=")]
    Add = 1,
    #[strum(to_string = "-=")]
    Subtract = 2,
    #[strum(to_string = "*=")]
    Multiply = 3,
    #[strum(to_string = "/=")]
    Divide = 4,
    #[strum(to_string = "%=")]
    Modulo = 5,
    #[strum(to_string = "max=")]
    Max = 6,
    #[strum(to_string = "min=")]
    Min = 7,
}

// Not derived: num_enum would turn a `#[default]` variant into the catch-all for unknown values.
impl Default for AssignmentOperator {
    fn default() -> Self {
        Self::Assign
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(
    num_enum::TryFromPrimitive,
    num_enum::IntoPrimitive,
    strum::Display,
    strum::EnumIter
)]
#[derive(serde::Deserialize, serde::Serialize)]
#[repr(u8)]
pub enum ArithmeticOperator {
    #[strum(to_string = "+")]
    Add = 0,
    #[strum(to_string = "-")]
    Subtract = 1,
    #[strum(to_string = "*")]
    Multiply = 2,
    #[strum(to_string = "/")]
    Divide = 3,
    #[strum(to_string = "%")]
    Modulo = 4,
    #[strum(to_string = "&")]
    BitAnd = 5,
    /// A random number between both operands.
    #[strum(to_string = "~")]
    Random = 6,
}

impl Default for ArithmeticOperator {
    fn default() -> Self {
        Self::Add
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(
    num_enum::TryFromPrimitive,
    num_enum::IntoPrimitive,
    strum::Display,
    strum::EnumIter
)]
#[derive(serde::Deserialize, serde::Serialize)]
#[repr(u8)]
pub enum NumberComparison {
    #[strum(to_string = ">")]
    Greater = 0,
    #[strum(to_string = ">=")]
    GreaterOrEqual = 1,
    #[strum(to_string = "=")]
    Equal = 2,
    #[strum(to_string = "<=")]
    LessOrEqual = 3,
    #[strum(to_string = "<")]
    Less = 4,
    #[strum(to_string = "!=")]
    NotEqual = 5,
    /// True when the bitwise and is not zero.
    #[strum(to_string = "&")]
    BitAnd = 6,
}

impl Default for NumberComparison {
    fn default() -> Self {
        Self::Greater
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(
    num_enum::TryFromPrimitive,
    num_enum::IntoPrimitive,
    strum::Display,
    strum::EnumIter
)]
#[derive(serde::Deserialize, serde::Serialize)]
#[repr(u8)]
pub enum StringComparison {
    #[strum(to_string = "=")]
    Equal = 0,
    #[strum(to_string = "!=")]
    NotEqual = 1,
    #[strum(to_string = "contains")]
    Contains = 2,
    #[strum(to_string = "starts with")]
    StartsWith = 3,
}

impl Default for StringComparison {
    fn default() -> Self {
        Self::Equal
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(
    num_enum::TryFromPrimitive,
    num_enum::IntoPrimitive,
    strum::Display,
    strum::EnumIter
)]
#[derive(serde::Deserialize, serde::Serialize)]
#[repr(u8)]
pub enum StringAssignment {
    #[strum(to_string = "=")]
    Assign = 0,
    #[strum(to_string = "+=")]
    Append = 1,
    #[strum(to_string = "remove first line")]
    RemoveFirstLine = 2,
    #[strum(to_string = "cut first character")]
    CutFirstCharacter = 3,
}

impl Default for StringAssignment {
    fn default() -> Self {
        Self::Assign
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(
    num_enum::TryFromPrimitive,
    num_enum::IntoPrimitive,
    strum::Display,
    strum::EnumIter
)]
#[derive(serde::Deserialize, serde::Serialize)]
#[repr(u8)]
pub enum SoundKind {
    #[strum(to_string = "BGM")]
    Bgm = 0,
    #[strum(to_string = "BGS")]
    Bgs = 1,
    #[strum(to_string = "SE")]
    Se = 2,
}

impl Default for SoundKind {
    fn default() -> Self {
        Self::Bgm
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(
    num_enum::TryFromPrimitive,
    num_enum::IntoPrimitive,
    strum::Display,
    strum::EnumIter
)]
#[derive(serde::Deserialize, serde::Serialize)]
#[repr(u8)]
pub enum DatabaseOperation {
    Read = 0,
    Write = 1,
}

impl Default for DatabaseOperation {
    fn default() -> Self {
        Self::Read
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn sub_codes_match_their_discriminants() {
        for operator in AssignmentOperator::iter() {
            let code: u8 = operator.into();
            assert_eq!(sub_code::<AssignmentOperator>("assignment", i32::from(code)).unwrap(), operator);
        }
        assert_eq!(ArithmeticOperator::iter().count(), 7);
        assert_eq!(NumberComparison::iter().count(), 7);
    }

    #[test]
    fn unknown_sub_codes_are_rejected() {
        assert!(matches!(
            sub_code::<SoundKind>("sound kind", 3),
            Err(Error::Validation { what: "sound kind", value: 3 })
        ));
        assert!(sub_code::<StringComparison>("comparison", -1).is_err());
        assert!(sub_code::<StringComparison>("comparison", 256).is_err());
    }

    #[test]
    fn operators_display_as_symbols() {
        assert_eq!(AssignmentOperator::Max.to_string(), "max=");
        assert_eq!(NumberComparison::GreaterOrEqual.to_string(), ">=");
        assert_eq!(SoundKind::Se.to_string(), "SE");
    }
}
