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

//! Event commands, move commands, and their binary records.
//!
//! Decoding reads a [`RawCommand`] and gives its arguments meaning according to the opcode.
//! Encoding goes the other way and produces the exact bytes decoding consumed.

mod event;
mod list;
mod movement;
mod operator;
mod raw;

pub use event::{
    CallCommonEvent, Choice, ChoiceList, CommonEventRef, ConditionNumber,
    ConditionString, DatabaseAccess, DatabaseRef, EventCode, EventCommand, EventCommandKind,
    IntArgumentList, MoveRouteCommand, MoveTarget, NumberCondition, NumberConditionList,
    SetString, SetVariable, SetVariableFlags, Sound, SoundSource, StringArgumentList,
    StringCondition, StringConditionList, StringOperand,
};
pub use list::EventCommandList;
pub use movement::{MoveCode, MoveCommand, MoveCommandList, MoveRoute, MoveRouteOptions};
pub use operator::{
    ArithmeticOperator, AssignmentOperator, DatabaseOperation, NumberComparison, SoundKind,
    StringAssignment, StringComparison,
};
pub use raw::RawCommand;
