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

//! Data model and binary codec for WOLF RPG Editor projects.

pub mod address;
pub mod binary;
pub mod collections;
pub mod commands;
pub mod database;
mod error;
pub mod io;
pub mod sentence;
pub mod value;

pub use address::{AddressKind, Operand, VariableAddress, VariableAddressExt};
pub use binary::{ByteReader, ByteWriter, TextEncoding};
pub use collections::{Capacity, ChangeAction, ConstrainedList, TwoDimensionalList};
pub use commands::{EventCommand, EventCommandKind, EventCommandList, MoveCommand, MoveRoute};
pub use error::{Error, Result};
pub use sentence::{NameTable, NoContext, ProjectContext, SentenceOptions};
