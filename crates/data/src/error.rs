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

use thiserror::Error;

use crate::collections::Capacity;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid {what}: {value}")]
    Validation { what: &'static str, value: i64 },
    #[error("{0}")]
    ValidationMessage(String),
    #[error("Length {len} does not satisfy capacity {capacity}")]
    Capacity { len: usize, capacity: Capacity },
    #[error("Index {index} is out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Unknown event command code {0}")]
    UnknownCommandCode(i32),
    #[error("Unknown move command code {0}")]
    UnknownMoveCommandCode(u8),
    #[error("{0} is not a variable address")]
    AddressOutOfRange(i32),
    #[error("Unexpected end of data at offset {offset} (needed {needed} more bytes)")]
    UnexpectedEof { offset: usize, needed: usize },
    #[error("Invalid record footer {value:#04x} at offset {offset}")]
    InvalidFooter { offset: usize, value: u8 },
    #[error("Text encoding error: {0}")]
    Encoding(String),
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(what: &'static str, value: impl Into<i64>) -> Self {
        Self::Validation {
            what,
            value: value.into(),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
