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

use itertools::Itertools;

use super::movement::{MoveRoute, MoveRouteOptions};
use super::operator::{
    sub_code, ArithmeticOperator, AssignmentOperator, DatabaseOperation, NumberComparison,
    SoundKind, StringAssignment, StringComparison,
};
use super::raw::RawCommand;
use crate::address::Operand;
use crate::binary::{ByteReader, ByteWriter};
use crate::collections::restricted_list;
use crate::database::DatabaseKind;
use crate::sentence::ProjectContext;
use crate::value::{CancelCase, CommonEventId, Indent, MapEventId, PartyMember, WaitFrames};
use crate::{Error, Result};

/// Every event command opcode this crate understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(
    num_enum::TryFromPrimitive,
    num_enum::IntoPrimitive,
    strum::Display,
    strum::EnumIter
)]
#[repr(i32)]
pub enum EventCode {
    Blank = 0,
    Message = 101,
    Choice = 102,
    Comment = 103,
    DebugText = 106,
    ConditionNumber = 111,
    ConditionString = 112,
    SetVariable = 121,
    SetString = 122,
    Sound = 140,
    LoopStart = 170,
    LoopBreak = 171,
    LoopContinue = 172,
    Wait = 180,
    MoveRoute = 201,
    CallCommonEvent = 210,
    Label = 212,
    JumpToLabel = 213,
    Database = 250,
    CaseStart = 401,
    ElseStart = 420,
    LoopEnd = 498,
    BranchEnd = 499,
}

restricted_list! {
    pub struct ChoiceList(String), 1, 10;
    default [String::new()];
}

restricted_list! {
    pub struct NumberConditionList(NumberCondition), 1, 4;
    default [NumberCondition::default()];
}

restricted_list! {
    pub struct StringConditionList(StringCondition), 1, 4;
    default [StringCondition::default()];
}

restricted_list! {
    pub struct IntArgumentList(Operand), 0, 4;
    default [];
}

restricted_list! {
    pub struct StringArgumentList(String), 0, 4;
    default [];
}

const LITERAL_FLAG: i32 = 1 << 4;
const ELSE_BRANCH_FLAG: i32 = 1 << 4;
const STRING_REFERENCE_FLAG: i32 = 1 << 8;
const SOUND_FILE_FLAG: i32 = 1 << 4;
const RETURN_VALUE_FLAG: i32 = 1 << 24;
const COMMON_EVENT_OFFSET: i32 = 500_000;

/// Fails when `value` has bits set outside of `mask`.
fn check_bits(what: &'static str, value: i32, mask: i32) -> Result<()> {
    if value & !mask == 0 {
        Ok(())
    } else {
        Err(Error::invalid(what, value))
    }
}

fn bits(value: i32, shift: u32) -> i32 {
    (value >> shift) & 0xF
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct Choice {
    pub choices: ChoiceList,
    pub cancel_case: CancelCase,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct NumberCondition {
    pub left: Operand,
    pub operator: NumberComparison,
    pub right: Operand,
    /// Compare against the raw number even if it looks like a variable address.
    pub right_is_literal: bool,
}

impl NumberCondition {
    fn from_raw(left: i32, right: i32, flags: i32) -> Result<Self> {
        check_bits("number condition flags", flags, 0x1F)?;
        Ok(Self {
            left: Operand::from_raw(left),
            operator: sub_code("number comparison", bits(flags, 0))?,
            right: Operand::from_raw(right),
            right_is_literal: flags & LITERAL_FLAG != 0,
        })
    }

    fn flags(&self) -> i32 {
        let mut flags = i32::from(u8::from(self.operator));
        if self.right_is_literal {
            flags |= LITERAL_FLAG;
        }
        flags
    }

    fn sentence(&self, context: &dyn ProjectContext) -> String {
        format!(
            "{} {} {}",
            self.left.sentence(context),
            self.operator,
            operand_sentence(self.right, self.right_is_literal, context)
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct ConditionNumber {
    pub conditions: NumberConditionList,
    pub else_branch: bool,
}

/// The right-hand side of a string command.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
pub enum StringOperand {
    Literal(String),
    Reference(Operand),
}

impl Default for StringOperand {
    fn default() -> Self {
        Self::Literal(String::new())
    }
}

impl StringOperand {
    fn sentence(&self, context: &dyn ProjectContext) -> String {
        match self {
            Self::Literal(text) => format!("\"{}\"", one_line(text)),
            Self::Reference(operand) => operand.sentence(context),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct StringCondition {
    pub left: Operand,
    pub operator: StringComparison,
    pub right: StringOperand,
}

impl StringCondition {
    fn from_raw(left: i32, flags: i32, right: i32, text: &str) -> Result<Self> {
        check_bits("string condition flags", flags, 0x1F)?;
        let right = if flags & LITERAL_FLAG != 0 {
            if !text.is_empty() {
                return Err(Error::ValidationMessage(
                    "string condition compares with a variable but also stores text".to_string(),
                ));
            }
            StringOperand::Reference(Operand::from_raw(right))
        } else {
            if right != 0 {
                return Err(Error::invalid("string condition reference", right));
            }
            StringOperand::Literal(text.to_string())
        };
        Ok(Self {
            left: Operand::from_raw(left),
            operator: sub_code("string comparison", bits(flags, 0))?,
            right,
        })
    }

    /// `(ints, text)`
    fn to_raw(&self) -> ([i32; 3], String) {
        let operator = i32::from(u8::from(self.operator));
        match &self.right {
            StringOperand::Literal(text) => ([self.left.to_raw(), operator, 0], text.clone()),
            StringOperand::Reference(operand) => (
                [self.left.to_raw(), operator | LITERAL_FLAG, operand.to_raw()],
                String::new(),
            ),
        }
    }

    fn sentence(&self, context: &dyn ProjectContext) -> String {
        format!(
            "{} {} {}",
            self.left.sentence(context),
            self.operator,
            self.right.sentence(context)
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct ConditionString {
    pub conditions: StringConditionList,
    pub else_branch: bool,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[derive(serde::Deserialize, serde::Serialize)]
    pub struct SetVariableFlags: u16 {
        /// The left side names the variable holding the target address.
        const LeftIndirect = 0b0001_0000_0000;
        const Right1Literal = 0b0010_0000_0000;
        const Right2Literal = 0b0100_0000_0000;
        /// Calculate with real numbers and round the result.
        const RealNumber = 0b1000_0000_0000;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct SetVariable {
    pub left: Operand,
    pub right1: Operand,
    pub right2: Operand,
    pub assignment: AssignmentOperator,
    pub arithmetic: ArithmeticOperator,
    pub flags: SetVariableFlags,
}

impl SetVariable {
    fn calculation(&self) -> i32 {
        i32::from(u8::from(self.assignment))
            | (i32::from(u8::from(self.arithmetic)) << 4)
            | i32::from((self.flags & SetVariableFlags::all()).bits())
    }

    fn from_raw(ints: &[i32]) -> Result<Self> {
        let calculation = ints[3];
        check_bits("calculation flags", calculation, 0xFFF)?;
        Ok(Self {
            left: Operand::from_raw(ints[0]),
            right1: Operand::from_raw(ints[1]),
            right2: Operand::from_raw(ints[2]),
            assignment: sub_code("assignment operator", bits(calculation, 0))?,
            arithmetic: sub_code("arithmetic operator", bits(calculation, 4))?,
            flags: SetVariableFlags::from_bits_truncate((calculation & 0xF00) as u16),
        })
    }

    fn sentence(&self, context: &dyn ProjectContext) -> String {
        let left = self.left.sentence(context);
        let left = if self.flags.contains(SetVariableFlags::LeftIndirect) {
            format!("V[{left}]")
        } else {
            left
        };
        let right1 = operand_sentence(
            self.right1,
            self.flags.contains(SetVariableFlags::Right1Literal),
            context,
        );
        let right2 = operand_sentence(
            self.right2,
            self.flags.contains(SetVariableFlags::Right2Literal),
            context,
        );
        let right = match self.arithmetic {
            ArithmeticOperator::Random => format!("Random({right1}~{right2})"),
            arithmetic => format!("{right1} {arithmetic} {right2}"),
        };
        let real = if self.flags.contains(SetVariableFlags::RealNumber) {
            " (real)"
        } else {
            ""
        };
        format!("{left} {} {right}{real}", self.assignment)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct SetString {
    pub left: Operand,
    pub operator: StringAssignment,
    pub right: StringOperand,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
pub enum SoundSource {
    Id(Operand),
    File(String),
}

impl Default for SoundSource {
    fn default() -> Self {
        Self::Id(Operand::default())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct Sound {
    pub kind: SoundKind,
    pub source: SoundSource,
    pub volume: i32,
    pub pitch: i32,
}

/// The character a move route is applied to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
pub enum MoveTarget {
    MapEvent(MapEventId),
    #[default]
    ThisEvent,
    Hero,
    Member(PartyMember),
}

impl MoveTarget {
    pub fn from_raw(value: i32) -> Result<Self> {
        match value {
            0..=i32::MAX => MapEventId::new_named("map event", value).map(Self::MapEvent),
            -1 => Ok(Self::ThisEvent),
            -2 => Ok(Self::Hero),
            -7..=-3 => PartyMember::new_named("party member", -value - 2).map(Self::Member),
            _ => Err(Error::invalid("move target", value)),
        }
    }

    #[must_use]
    pub fn to_raw(self) -> i32 {
        match self {
            Self::MapEvent(id) => id.get(),
            Self::ThisEvent => -1,
            Self::Hero => -2,
            Self::Member(member) => -member.get() - 2,
        }
    }
}

impl std::fmt::Display for MoveTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MapEvent(id) => write!(f, "Ev{id}"),
            Self::ThisEvent => write!(f, "This Event"),
            Self::Hero => write!(f, "Hero"),
            Self::Member(member) => write!(f, "Member{member}"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct MoveRouteCommand {
    pub target: MoveTarget,
    pub route: MoveRoute,
}

/// Which common event to call: a fixed id stored as `500_000 + id`, or any other value read as
/// an operand holding the id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct CommonEventRef(i32);

impl Default for CommonEventRef {
    fn default() -> Self {
        Self(COMMON_EVENT_OFFSET)
    }
}

impl CommonEventRef {
    #[must_use]
    pub fn id(id: CommonEventId) -> Self {
        Self(COMMON_EVENT_OFFSET + id.get())
    }

    #[must_use]
    pub fn from_raw(value: i32) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn to_raw(self) -> i32 {
        self.0
    }

    /// The called id when it is fixed.
    #[must_use]
    pub fn common_event_id(self) -> Option<i32> {
        self.0
            .checked_sub(COMMON_EVENT_OFFSET)
            .filter(|id| CommonEventId::new(*id).is_ok())
    }

    pub fn sentence(self, context: &dyn ProjectContext) -> String {
        match self.common_event_id() {
            Some(id) => match context.common_event_name(id) {
                Some(name) => format!("CommonEvent[{id}({name})]"),
                None => format!("CommonEvent[{id}]"),
            },
            None => format!("CommonEvent[{}]", Operand::from_raw(self.0).sentence(context)),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct CallCommonEvent {
    pub event: CommonEventRef,
    pub int_args: IntArgumentList,
    pub string_args: StringArgumentList,
    /// Variable receiving the return value.
    pub return_to: Option<Operand>,
}

impl CallCommonEvent {
    fn from_raw(code: EventCode, raw: &RawCommand) -> Result<Self> {
        let arg_spec = arg(code, &raw.ints, 1)?;
        check_bits("argument specification", arg_spec, 0xFF | RETURN_VALUE_FLAG)?;
        let int_count = bits(arg_spec, 0) as usize;
        let string_count = bits(arg_spec, 4) as usize;
        let has_return = arg_spec & RETURN_VALUE_FLAG != 0;
        expect_shape(code, raw, 2 + int_count + usize::from(has_return), string_count)?;

        let int_args = raw.ints[2..2 + int_count].iter().copied().map(Operand::from_raw);
        Ok(Self {
            event: CommonEventRef::from_raw(raw.ints[0]),
            int_args: IntArgumentList::new(int_args)?,
            string_args: StringArgumentList::new(raw.strings.iter().cloned())?,
            return_to: has_return.then(|| Operand::from_raw(raw.ints[2 + int_count])),
        })
    }

    fn to_raw(&self) -> (Vec<i32>, Vec<String>) {
        let mut arg_spec = self.int_args.len() as i32 | ((self.string_args.len() as i32) << 4);
        if self.return_to.is_some() {
            arg_spec |= RETURN_VALUE_FLAG;
        }
        let ints = [self.event.to_raw(), arg_spec]
            .into_iter()
            .chain(self.int_args.iter().map(|arg| arg.to_raw()))
            .chain(self.return_to.map(Operand::to_raw))
            .collect();
        (ints, self.string_args.to_vec())
    }

    fn sentence(&self, context: &dyn ProjectContext) -> String {
        let mut sentence = format!("Call {}", self.event.sentence(context));
        if !self.int_args.is_empty() || !self.string_args.is_empty() {
            let args = self
                .int_args
                .iter()
                .map(|arg| arg.sentence(context))
                .chain(self.string_args.iter().map(|arg| format!("\"{}\"", one_line(arg))))
                .join(", ");
            sentence.push_str(&format!(" ({args})"));
        }
        if let Some(target) = self.return_to {
            sentence.push_str(&format!(" -> {}", target.sentence(context)));
        }
        sentence
    }
}

/// A database coordinate, addressed by name when `name` is not empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct DatabaseRef {
    pub id: Operand,
    pub name: String,
}

impl DatabaseRef {
    pub fn id(id: impl Into<Operand>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self {
            id: Operand::default(),
            name: name.into(),
        }
    }

    /// The fixed numeric id, when neither a name nor a variable is used.
    fn literal(&self) -> Option<i32> {
        (self.name.is_empty() && !self.id.is_address()).then(|| self.id.to_raw())
    }

    fn sentence(&self, resolved: Option<String>, context: &dyn ProjectContext) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        match resolved {
            Some(name) => format!("{}({name})", self.id.to_raw()),
            None => self.id.sentence(context),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct DatabaseAccess {
    pub kind: DatabaseKind,
    pub operation: DatabaseOperation,
    pub type_ref: DatabaseRef,
    pub data_ref: DatabaseRef,
    pub item_ref: DatabaseRef,
    /// The variable read into or the value written.
    pub value: Operand,
}

impl DatabaseAccess {
    fn from_raw(ints: &[i32], strings: &[String]) -> Result<Self> {
        let flags = ints[3];
        check_bits("database flags", flags, 0xFF)?;
        let reference = |index: usize| DatabaseRef {
            id: Operand::from_raw(ints[index]),
            name: strings[index].clone(),
        };
        Ok(Self {
            kind: sub_code("database kind", bits(flags, 0))?,
            operation: sub_code("database operation", bits(flags, 4))?,
            type_ref: reference(0),
            data_ref: reference(1),
            item_ref: reference(2),
            value: Operand::from_raw(ints[4]),
        })
    }

    fn to_raw(&self) -> (Vec<i32>, Vec<String>) {
        let flags = i32::from(u8::from(self.kind)) | (i32::from(u8::from(self.operation)) << 4);
        let ints = vec![
            self.type_ref.id.to_raw(),
            self.data_ref.id.to_raw(),
            self.item_ref.id.to_raw(),
            flags,
            self.value.to_raw(),
        ];
        let strings = vec![
            self.type_ref.name.clone(),
            self.data_ref.name.clone(),
            self.item_ref.name.clone(),
        ];
        (ints, strings)
    }

    fn sentence(&self, context: &dyn ProjectContext) -> String {
        let kind = self.kind;
        let type_id = self.type_ref.literal();
        let type_name = type_id.and_then(|t| context.database_type_name(kind, t));
        let data_name = type_id
            .zip(self.data_ref.literal())
            .and_then(|(t, d)| context.database_data_name(kind, t, d));
        let item_name = type_id
            .zip(self.item_ref.literal())
            .and_then(|(t, i)| context.database_item_name(kind, t, i));

        let cell = format!(
            "{}[{}:{}:{}]",
            kind.short_name(),
            self.type_ref.sentence(type_name, context),
            self.data_ref.sentence(data_name, context),
            self.item_ref.sentence(item_name, context),
        );
        let value = self.value.sentence(context);
        match self.operation {
            DatabaseOperation::Read => format!("{value} = {cell}"),
            DatabaseOperation::Write => format!("{cell} = {value}"),
        }
    }
}

/// The typed arguments of an event command.
#[derive(Clone, Debug, Default, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub enum EventCommandKind {
    #[default]
    Blank,
    Message(String),
    Choice(Choice),
    Comment(String),
    DebugText(String),
    ConditionNumber(ConditionNumber),
    ConditionString(ConditionString),
    SetVariable(SetVariable),
    SetString(SetString),
    Sound(Sound),
    /// `None` loops until broken out of.
    LoopStart(Option<Operand>),
    LoopBreak,
    LoopContinue,
    Wait(WaitFrames),
    MoveRoute(MoveRouteCommand),
    CallCommonEvent(CallCommonEvent),
    Label(String),
    JumpToLabel(String),
    Database(DatabaseAccess),
    CaseStart(i32),
    ElseStart,
    LoopEnd,
    BranchEnd,
}

fn shape_error(code: EventCode, kind: &str, expected: usize, found: usize) -> Error {
    Error::ValidationMessage(format!(
        "{code} takes {expected} {kind} arguments, found {found}"
    ))
}

fn expect_shape(code: EventCode, raw: &RawCommand, ints: usize, strings: usize) -> Result<()> {
    if raw.ints.len() != ints {
        return Err(shape_error(code, "int", ints, raw.ints.len()));
    }
    if raw.strings.len() != strings {
        return Err(shape_error(code, "string", strings, raw.strings.len()));
    }
    Ok(())
}

/// Reads an int argument that decides the shape of the rest.
fn arg(code: EventCode, ints: &[i32], index: usize) -> Result<i32> {
    ints.get(index)
        .copied()
        .ok_or_else(|| shape_error(code, "int", index + 1, ints.len()))
}

fn operand_sentence(operand: Operand, literal: bool, context: &dyn ProjectContext) -> String {
    if literal {
        operand.to_raw().to_string()
    } else {
        operand.sentence(context)
    }
}

fn one_line(text: &str) -> String {
    text.lines().join(" / ")
}

fn condition_header(count: usize, else_branch: bool) -> i32 {
    let mut header = count as i32;
    if else_branch {
        header |= ELSE_BRANCH_FLAG;
    }
    header
}

impl EventCommandKind {
    #[must_use]
    pub fn code(&self) -> EventCode {
        match self {
            Self::Blank => EventCode::Blank,
            Self::Message(_) => EventCode::Message,
            Self::Choice(_) => EventCode::Choice,
            Self::Comment(_) => EventCode::Comment,
            Self::DebugText(_) => EventCode::DebugText,
            Self::ConditionNumber(_) => EventCode::ConditionNumber,
            Self::ConditionString(_) => EventCode::ConditionString,
            Self::SetVariable(_) => EventCode::SetVariable,
            Self::SetString(_) => EventCode::SetString,
            Self::Sound(_) => EventCode::Sound,
            Self::LoopStart(_) => EventCode::LoopStart,
            Self::LoopBreak => EventCode::LoopBreak,
            Self::LoopContinue => EventCode::LoopContinue,
            Self::Wait(_) => EventCode::Wait,
            Self::MoveRoute(_) => EventCode::MoveRoute,
            Self::CallCommonEvent(_) => EventCode::CallCommonEvent,
            Self::Label(_) => EventCode::Label,
            Self::JumpToLabel(_) => EventCode::JumpToLabel,
            Self::Database(_) => EventCode::Database,
            Self::CaseStart(_) => EventCode::CaseStart,
            Self::ElseStart => EventCode::ElseStart,
            Self::LoopEnd => EventCode::LoopEnd,
            Self::BranchEnd => EventCode::BranchEnd,
        }
    }

    /// The command with the default arguments for `code`.
    #[must_use]
    pub fn new(code: EventCode) -> Self {
        match code {
            EventCode::Blank => Self::Blank,
            EventCode::Message => Self::Message(String::new()),
            EventCode::Choice => Self::Choice(Choice::default()),
            EventCode::Comment => Self::Comment(String::new()),
            EventCode::DebugText => Self::DebugText(String::new()),
            EventCode::ConditionNumber => Self::ConditionNumber(ConditionNumber::default()),
            EventCode::ConditionString => Self::ConditionString(ConditionString::default()),
            EventCode::SetVariable => Self::SetVariable(SetVariable::default()),
            EventCode::SetString => Self::SetString(SetString::default()),
            EventCode::Sound => Self::Sound(Sound::default()),
            EventCode::LoopStart => Self::LoopStart(None),
            EventCode::LoopBreak => Self::LoopBreak,
            EventCode::LoopContinue => Self::LoopContinue,
            EventCode::Wait => Self::Wait(WaitFrames::default()),
            EventCode::MoveRoute => Self::MoveRoute(MoveRouteCommand::default()),
            EventCode::CallCommonEvent => Self::CallCommonEvent(CallCommonEvent::default()),
            EventCode::Label => Self::Label(String::new()),
            EventCode::JumpToLabel => Self::JumpToLabel(String::new()),
            EventCode::Database => Self::Database(DatabaseAccess::default()),
            EventCode::CaseStart => Self::CaseStart(0),
            EventCode::ElseStart => Self::ElseStart,
            EventCode::LoopEnd => Self::LoopEnd,
            EventCode::BranchEnd => Self::BranchEnd,
        }
    }

    fn from_raw(raw: &RawCommand) -> Result<Self> {
        let code = EventCode::try_from(raw.code).map_err(|_| Error::UnknownCommandCode(raw.code))?;
        if code == EventCode::MoveRoute {
            if raw.move_route.is_none() {
                return Err(Error::ValidationMessage(format!("{code} without a move route")));
            }
        } else if raw.move_route.is_some() {
            return Err(Error::ValidationMessage(format!("{code} carries a move route")));
        }

        let ints = raw.ints.as_slice();
        let strings = raw.strings.as_slice();
        let text = || -> Result<String> {
            expect_shape(code, raw, 0, 1)?;
            Ok(strings[0].clone())
        };
        let unit = |kind: Self| expect_shape(code, raw, 0, 0).map(|()| kind);

        match code {
            EventCode::Blank => unit(Self::Blank),
            EventCode::Message => text().map(Self::Message),
            EventCode::Comment => text().map(Self::Comment),
            EventCode::DebugText => text().map(Self::DebugText),
            EventCode::Label => text().map(Self::Label),
            EventCode::JumpToLabel => text().map(Self::JumpToLabel),
            EventCode::LoopBreak => unit(Self::LoopBreak),
            EventCode::LoopContinue => unit(Self::LoopContinue),
            EventCode::ElseStart => unit(Self::ElseStart),
            EventCode::LoopEnd => unit(Self::LoopEnd),
            EventCode::BranchEnd => unit(Self::BranchEnd),

            EventCode::Choice => {
                expect_shape(code, raw, 1, strings.len())?;
                let packed = ints[0];
                check_bits("choice header", packed, 0xFFFF)?;
                let count = (packed & 0xFF) as usize;
                if count != strings.len() {
                    return Err(shape_error(code, "string", count, strings.len()));
                }
                Ok(Self::Choice(Choice {
                    choices: ChoiceList::new(strings.iter().cloned())?,
                    cancel_case: CancelCase::new_named("cancel case", packed >> 8)?,
                }))
            }
            EventCode::ConditionNumber => {
                let header = arg(code, ints, 0)?;
                check_bits("condition header", header, 0x1F)?;
                let count = bits(header, 0) as usize;
                expect_shape(code, raw, 1 + 3 * count, 0)?;
                let conditions = ints[1..]
                    .chunks_exact(3)
                    .map(|c| NumberCondition::from_raw(c[0], c[1], c[2]))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::ConditionNumber(ConditionNumber {
                    conditions: NumberConditionList::new(conditions)?,
                    else_branch: header & ELSE_BRANCH_FLAG != 0,
                }))
            }
            EventCode::ConditionString => {
                let header = arg(code, ints, 0)?;
                check_bits("condition header", header, 0x1F)?;
                let count = bits(header, 0) as usize;
                expect_shape(code, raw, 1 + 3 * count, count)?;
                let conditions = ints[1..]
                    .chunks_exact(3)
                    .zip(strings)
                    .map(|(c, text)| StringCondition::from_raw(c[0], c[1], c[2], text))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::ConditionString(ConditionString {
                    conditions: StringConditionList::new(conditions)?,
                    else_branch: header & ELSE_BRANCH_FLAG != 0,
                }))
            }
            EventCode::SetVariable => {
                expect_shape(code, raw, 4, 0)?;
                SetVariable::from_raw(ints).map(Self::SetVariable)
            }
            EventCode::SetString => {
                let flags = arg(code, ints, 1)?;
                check_bits("string assignment flags", flags, 0xF | STRING_REFERENCE_FLAG)?;
                let right = if flags & STRING_REFERENCE_FLAG != 0 {
                    expect_shape(code, raw, 3, 0)?;
                    StringOperand::Reference(Operand::from_raw(ints[2]))
                } else {
                    expect_shape(code, raw, 2, 1)?;
                    StringOperand::Literal(strings[0].clone())
                };
                Ok(Self::SetString(SetString {
                    left: Operand::from_raw(ints[0]),
                    operator: sub_code("string assignment", bits(flags, 0))?,
                    right,
                }))
            }
            EventCode::Sound => {
                let flags = arg(code, ints, 0)?;
                check_bits("sound flags", flags, 0x1F)?;
                let source = if flags & SOUND_FILE_FLAG != 0 {
                    expect_shape(code, raw, 4, 1)?;
                    if ints[1] != 0 {
                        return Err(Error::invalid("sound id alongside a file name", ints[1]));
                    }
                    SoundSource::File(strings[0].clone())
                } else {
                    expect_shape(code, raw, 4, 0)?;
                    SoundSource::Id(Operand::from_raw(ints[1]))
                };
                Ok(Self::Sound(Sound {
                    kind: sub_code("sound kind", bits(flags, 0))?,
                    source,
                    volume: ints[2],
                    pitch: ints[3],
                }))
            }
            EventCode::LoopStart => {
                if ints.len() > 1 || !strings.is_empty() {
                    return Err(shape_error(code, "int", 1, ints.len()));
                }
                Ok(Self::LoopStart(ints.first().copied().map(Operand::from_raw)))
            }
            EventCode::Wait => {
                expect_shape(code, raw, 1, 0)?;
                WaitFrames::new_named("wait frames", ints[0]).map(Self::Wait)
            }
            EventCode::MoveRoute => {
                expect_shape(code, raw, 1, 0)?;
                Ok(Self::MoveRoute(MoveRouteCommand {
                    target: MoveTarget::from_raw(ints[0])?,
                    route: raw.move_route.clone().unwrap_or_default(),
                }))
            }
            EventCode::CallCommonEvent => {
                CallCommonEvent::from_raw(code, raw).map(Self::CallCommonEvent)
            }
            EventCode::Database => {
                expect_shape(code, raw, 5, 3)?;
                DatabaseAccess::from_raw(ints, strings).map(Self::Database)
            }
            EventCode::CaseStart => {
                expect_shape(code, raw, 1, 0)?;
                Ok(Self::CaseStart(ints[0]))
            }
        }
    }

    fn to_raw(&self, indent: i8) -> RawCommand {
        let mut move_route = None;
        let (ints, strings) = match self {
            Self::Blank
            | Self::LoopBreak
            | Self::LoopContinue
            | Self::ElseStart
            | Self::LoopEnd
            | Self::BranchEnd => (Vec::new(), Vec::new()),
            Self::Message(text)
            | Self::Comment(text)
            | Self::DebugText(text)
            | Self::Label(text)
            | Self::JumpToLabel(text) => (Vec::new(), vec![text.clone()]),
            Self::Choice(choice) => {
                let packed = choice.choices.len() as i32 | (choice.cancel_case.get() << 8);
                (vec![packed], choice.choices.to_vec())
            }
            Self::ConditionNumber(condition) => {
                let header = condition_header(condition.conditions.len(), condition.else_branch);
                let ints = std::iter::once(header)
                    .chain(
                        condition
                            .conditions
                            .iter()
                            .flat_map(|c| [c.left.to_raw(), c.right.to_raw(), c.flags()]),
                    )
                    .collect();
                (ints, Vec::new())
            }
            Self::ConditionString(condition) => {
                let header = condition_header(condition.conditions.len(), condition.else_branch);
                let (ints, strings): (Vec<[i32; 3]>, Vec<String>) =
                    condition.conditions.iter().map(StringCondition::to_raw).unzip();
                let ints = std::iter::once(header).chain(ints.into_iter().flatten()).collect();
                (ints, strings)
            }
            Self::SetVariable(set) => (
                vec![
                    set.left.to_raw(),
                    set.right1.to_raw(),
                    set.right2.to_raw(),
                    set.calculation(),
                ],
                Vec::new(),
            ),
            Self::SetString(set) => {
                let operator = i32::from(u8::from(set.operator));
                match &set.right {
                    StringOperand::Literal(text) => {
                        (vec![set.left.to_raw(), operator], vec![text.clone()])
                    }
                    StringOperand::Reference(operand) => (
                        vec![
                            set.left.to_raw(),
                            operator | STRING_REFERENCE_FLAG,
                            operand.to_raw(),
                        ],
                        Vec::new(),
                    ),
                }
            }
            Self::Sound(sound) => {
                let kind = i32::from(u8::from(sound.kind));
                match &sound.source {
                    SoundSource::Id(id) => {
                        (vec![kind, id.to_raw(), sound.volume, sound.pitch], Vec::new())
                    }
                    SoundSource::File(file) => (
                        vec![kind | SOUND_FILE_FLAG, 0, sound.volume, sound.pitch],
                        vec![file.clone()],
                    ),
                }
            }
            Self::LoopStart(count) => (count.iter().map(|c| c.to_raw()).collect(), Vec::new()),
            Self::Wait(frames) => (vec![frames.get()], Vec::new()),
            Self::MoveRoute(command) => {
                move_route = Some(command.route.clone());
                (vec![command.target.to_raw()], Vec::new())
            }
            Self::CallCommonEvent(call) => call.to_raw(),
            Self::Database(access) => access.to_raw(),
            Self::CaseStart(case) => (vec![*case], Vec::new()),
        };

        RawCommand {
            code: self.code().into(),
            ints,
            indent,
            strings,
            move_route,
        }
    }

    /// Renders the command as one line of text.
    pub fn sentence(&self, context: &dyn ProjectContext) -> String {
        match self {
            Self::Blank => String::new(),
            Self::Message(text) => format!("Message: {}", one_line(text)),
            Self::Comment(text) => format!("// {}", one_line(text)),
            Self::DebugText(text) => format!("Debug: {}", one_line(text)),
            Self::Choice(choice) => {
                let choices = choice
                    .choices
                    .iter()
                    .enumerate()
                    .map(|(i, text)| format!("[{}]{}", i + 1, one_line(text)))
                    .join(" ");
                match choice.cancel_case.get() {
                    0 => format!("Choice: {choices}"),
                    case => format!("Choice: {choices} (cancel: {case})"),
                }
            }
            Self::ConditionNumber(condition) => {
                let branches = condition
                    .conditions
                    .iter()
                    .enumerate()
                    .map(|(i, c)| format!("[{}] {}", i + 1, c.sentence(context)))
                    .join(" ");
                let otherwise = if condition.else_branch { " [else]" } else { "" };
                format!("Branch: {branches}{otherwise}")
            }
            Self::ConditionString(condition) => {
                let branches = condition
                    .conditions
                    .iter()
                    .enumerate()
                    .map(|(i, c)| format!("[{}] {}", i + 1, c.sentence(context)))
                    .join(" ");
                let otherwise = if condition.else_branch { " [else]" } else { "" };
                format!("String Branch: {branches}{otherwise}")
            }
            Self::SetVariable(set) => format!("Variable: {}", set.sentence(context)),
            Self::SetString(set) => format!(
                "String: {} {} {}",
                set.left.sentence(context),
                set.operator,
                set.right.sentence(context)
            ),
            Self::Sound(sound) => {
                let source = match &sound.source {
                    SoundSource::Id(id) => id.sentence(context),
                    SoundSource::File(file) => format!("\"{file}\""),
                };
                format!(
                    "{}: {source} volume {} pitch {}",
                    sound.kind, sound.volume, sound.pitch
                )
            }
            Self::LoopStart(None) => "Loop".to_string(),
            Self::LoopStart(Some(count)) => format!("Loop {} times", count.sentence(context)),
            Self::LoopBreak => "Break Loop".to_string(),
            Self::LoopContinue => "Continue Loop".to_string(),
            Self::Wait(frames) => format!("Wait {frames} frames"),
            Self::MoveRoute(command) => {
                let options = [
                    (MoveRouteOptions::Repeat, "repeat"),
                    (MoveRouteOptions::SkipIfBlocked, "skip"),
                    (MoveRouteOptions::WaitForCompletion, "wait"),
                ]
                .into_iter()
                .filter(|(flag, _)| command.route.options.contains(*flag))
                .map(|(_, name)| name)
                .join(", ");
                let moves = command
                    .route
                    .commands
                    .iter()
                    .map(|m| m.sentence(context))
                    .join(", ");
                if options.is_empty() {
                    format!("Move Route: {} [{moves}]", command.target)
                } else {
                    format!("Move Route: {} ({options}) [{moves}]", command.target)
                }
            }
            Self::CallCommonEvent(call) => call.sentence(context),
            Self::Label(name) => format!("Label: {name}"),
            Self::JumpToLabel(name) => format!("Jump to Label: {name}"),
            Self::Database(access) => format!("DB: {}", access.sentence(context)),
            Self::CaseStart(case) => format!("Case {case}"),
            Self::ElseStart => "Else".to_string(),
            Self::LoopEnd => "Loop End".to_string(),
            Self::BranchEnd => "Branch End".to_string(),
        }
    }
}

/// One decoded event command.
#[derive(Clone, Debug, Default, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct EventCommand {
    pub indent: Indent,
    pub kind: EventCommandKind,
}

impl EventCommand {
    #[must_use]
    pub fn new(kind: EventCommandKind) -> Self {
        Self {
            indent: Indent::default(),
            kind,
        }
    }

    #[must_use]
    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn code(&self) -> EventCode {
        self.kind.code()
    }

    pub fn from_raw(raw: &RawCommand) -> Result<Self> {
        Ok(Self {
            indent: Indent::new_named("indent", raw.indent.into())?,
            kind: EventCommandKind::from_raw(raw)?,
        })
    }

    #[must_use]
    pub fn to_raw(&self) -> RawCommand {
        // Indent is bounded to 0..=127
        self.kind.to_raw(self.indent.get() as i8)
    }

    pub fn decode(reader: &mut ByteReader<'_>) -> Result<Self> {
        let raw = RawCommand::read(reader)?;
        Self::from_raw(&raw)
    }

    pub fn encode(&self, writer: &mut ByteWriter) -> Result<()> {
        self.to_raw().write(writer)
    }

    #[must_use]
    pub fn to_event_code_string(&self) -> String {
        self.to_raw().to_event_code_string()
    }

    pub fn sentence(&self, context: &dyn ProjectContext) -> String {
        self.kind.sentence(context)
    }
}

impl From<EventCommandKind> for EventCommand {
    fn from(kind: EventCommandKind) -> Self {
        Self::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::TextEncoding;
    use crate::commands::movement::MoveCommand;
    use crate::sentence::{NameTable, NoContext};
    use strum::IntoEnumIterator;

    fn round_trip(command: &EventCommand) -> EventCommand {
        let mut writer = ByteWriter::new(TextEncoding::ShiftJis);
        command.encode(&mut writer).unwrap();
        let mut reader = ByteReader::new(writer.as_bytes(), TextEncoding::ShiftJis);
        let decoded = EventCommand::decode(&mut reader).unwrap();
        assert!(reader.is_empty());
        decoded
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn default_commands_round_trip() {
        for code in EventCode::iter() {
            let command = EventCommand::new(EventCommandKind::new(code));
            assert_eq!(command.code(), code);
            assert_eq!(round_trip(&command), command, "{code}");
        }
    }

    #[test]
    fn populated_commands_round_trip() {
        let commands = [
            EventCommandKind::Choice(Choice {
                choices: ChoiceList::new(strings(&["はい", "いいえ", "Maybe"])).unwrap(),
                cancel_case: CancelCase::new(3).unwrap(),
            }),
            EventCommandKind::ConditionNumber(ConditionNumber {
                conditions: NumberConditionList::new([
                    NumberCondition {
                        left: Operand::from_raw(2_000_001),
                        operator: NumberComparison::GreaterOrEqual,
                        right: Operand::from_raw(10),
                        right_is_literal: false,
                    },
                    NumberCondition {
                        left: Operand::from_raw(1_600_003),
                        operator: NumberComparison::BitAnd,
                        right: Operand::from_raw(2_000_000),
                        right_is_literal: true,
                    },
                ])
                .unwrap(),
                else_branch: true,
            }),
            EventCommandKind::ConditionString(ConditionString {
                conditions: StringConditionList::new([
                    StringCondition {
                        left: Operand::from_raw(3_000_000),
                        operator: StringComparison::Contains,
                        right: StringOperand::Literal("key".to_string()),
                    },
                    StringCondition {
                        left: Operand::from_raw(3_000_001),
                        operator: StringComparison::NotEqual,
                        right: StringOperand::Reference(Operand::from_raw(3_000_002)),
                    },
                ])
                .unwrap(),
                else_branch: false,
            }),
            EventCommandKind::SetVariable(SetVariable {
                left: Operand::from_raw(1_100_005),
                right1: Operand::from_raw(8_000_100),
                right2: Operand::from_raw(-3),
                assignment: AssignmentOperator::Min,
                arithmetic: ArithmeticOperator::Random,
                flags: SetVariableFlags::Right2Literal | SetVariableFlags::RealNumber,
            }),
            EventCommandKind::SetString(SetString {
                left: Operand::from_raw(3_000_004),
                operator: StringAssignment::Append,
                right: StringOperand::Reference(Operand::from_raw(3_000_005)),
            }),
            EventCommandKind::SetString(SetString {
                left: Operand::from_raw(3_000_004),
                operator: StringAssignment::Assign,
                right: StringOperand::Literal("line1\nline2".to_string()),
            }),
            EventCommandKind::Sound(Sound {
                kind: SoundKind::Bgm,
                source: SoundSource::File("BGM/town.ogg".to_string()),
                volume: 80,
                pitch: 100,
            }),
            EventCommandKind::Sound(Sound {
                kind: SoundKind::Se,
                source: SoundSource::Id(Operand::from_raw(12)),
                volume: 100,
                pitch: 150,
            }),
            EventCommandKind::LoopStart(Some(Operand::from_raw(3))),
            EventCommandKind::Wait(WaitFrames::new(60).unwrap()),
            EventCommandKind::MoveRoute(MoveRouteCommand {
                target: MoveTarget::Member(PartyMember::new(3).unwrap()),
                route: MoveRoute::new(
                    MoveRouteOptions::SkipIfBlocked,
                    [
                        MoveCommand::MoveLeft,
                        MoveCommand::Wait(WaitFrames::new(5).unwrap()),
                        MoveCommand::MoveToPosition { x: 4, y: -2 },
                    ],
                )
                .unwrap(),
            }),
            EventCommandKind::CallCommonEvent(CallCommonEvent {
                event: CommonEventRef::id(CommonEventId::new(12).unwrap()),
                int_args: IntArgumentList::new([Operand::from_raw(1), Operand::from_raw(2_000_001)])
                    .unwrap(),
                string_args: StringArgumentList::new(strings(&["arg"])).unwrap(),
                return_to: Some(Operand::from_raw(2_000_002)),
            }),
            EventCommandKind::Database(DatabaseAccess {
                kind: DatabaseKind::Changeable,
                operation: DatabaseOperation::Write,
                type_ref: DatabaseRef::name("Hero"),
                data_ref: DatabaseRef::id(Operand::from_raw(2_000_003)),
                item_ref: DatabaseRef::id(4),
                value: Operand::from_raw(-50),
            }),
            EventCommandKind::CaseStart(-1),
            EventCommandKind::Label("start".to_string()),
        ];

        for (indent, kind) in commands.into_iter().enumerate() {
            let command = EventCommand::new(kind).with_indent(Indent::new(indent as i32).unwrap());
            assert_eq!(round_trip(&command), command);
        }
    }

    #[test]
    fn message_record_bytes() {
        let command = EventCommand::new(EventCommandKind::Message("Hello".to_string()));
        let mut writer = ByteWriter::new(TextEncoding::ShiftJis);
        command.encode(&mut writer).unwrap();

        let mut expected = vec![1];
        expected.extend(101i32.to_le_bytes());
        expected.extend([0, 1]);
        expected.extend(6i32.to_le_bytes());
        expected.extend(b"Hello\0");
        expected.push(0);
        assert_eq!(writer.into_bytes(), expected);
        assert_eq!(command.to_event_code_string(), "[101][1,1]<0>()(\"Hello\")");
    }

    #[test]
    fn packed_arguments() {
        let choice = EventCommandKind::Choice(Choice {
            choices: ChoiceList::new(strings(&["a", "b"])).unwrap(),
            cancel_case: CancelCase::new(2).unwrap(),
        });
        assert_eq!(EventCommand::new(choice).to_raw().ints, [0x0202]);

        let call = EventCommandKind::CallCommonEvent(CallCommonEvent {
            event: CommonEventRef::id(CommonEventId::new(7).unwrap()),
            int_args: IntArgumentList::new([Operand::from_raw(5)]).unwrap(),
            string_args: StringArgumentList::new(strings(&["x", "y"])).unwrap(),
            return_to: Some(Operand::from_raw(2_000_000)),
        });
        let raw = EventCommand::new(call).to_raw();
        assert_eq!(raw.ints, [500_007, 0x0100_0021, 5, 2_000_000]);
        assert_eq!(raw.strings, ["x", "y"]);
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        let raw = |code: i32, ints: &[i32], texts: &[&str]| RawCommand {
            code,
            ints: ints.to_vec(),
            strings: strings(texts),
            ..Default::default()
        };

        assert!(matches!(
            EventCommand::from_raw(&raw(999, &[], &[])),
            Err(Error::UnknownCommandCode(999))
        ));
        assert!(matches!(
            EventCommand::from_raw(&raw(101, &[], &[])),
            Err(Error::ValidationMessage(_))
        ));
        // two choices declared, one stored
        assert!(EventCommand::from_raw(&raw(102, &[2], &["a"])).is_err());
        // five conditions
        assert!(EventCommand::from_raw(&raw(111, &[5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0], &[])).is_err());
        // unknown comparison
        assert!(EventCommand::from_raw(&raw(111, &[1, 0, 0, 7], &[])).is_err());
        // unknown assignment bits
        assert!(EventCommand::from_raw(&raw(121, &[0, 0, 0, 0x1000], &[])).is_err());
        // by reference but without the reference
        assert!(EventCommand::from_raw(&raw(122, &[0, 0x100], &[])).is_err());
        assert!(EventCommand::from_raw(&raw(201, &[-2], &[])).is_err());
        assert!(EventCommand::from_raw(&raw(250, &[0, 0, 0, 3, 0], &["", "", ""])).is_err());

        let mut blank = raw(0, &[], &[]);
        blank.move_route = Some(MoveRoute::default());
        assert!(EventCommand::from_raw(&blank).is_err());

        let mut negative_indent = raw(0, &[], &[]);
        negative_indent.indent = -1;
        assert!(matches!(
            EventCommand::from_raw(&negative_indent),
            Err(Error::Validation { what: "indent", value: -1 })
        ));
    }

    #[test]
    fn move_targets() {
        for raw in [-7, -3, -2, -1, 0, 9999] {
            assert_eq!(MoveTarget::from_raw(raw).unwrap().to_raw(), raw);
        }
        assert_eq!(MoveTarget::from_raw(-3).unwrap().to_string(), "Member1");
        assert!(MoveTarget::from_raw(-8).is_err());
        assert!(MoveTarget::from_raw(10_000).is_err());
    }

    #[test]
    fn sentences_resolve_names() {
        let mut names = NameTable::default();
        names.common_events.insert(12, "Shop".to_string());
        names.database_types.insert((DatabaseKind::User, 1), "Items".to_string());
        names
            .database_data
            .insert((DatabaseKind::User, 1, 3), "Potion".to_string());

        let call = EventCommandKind::CallCommonEvent(CallCommonEvent {
            event: CommonEventRef::id(CommonEventId::new(12).unwrap()),
            int_args: IntArgumentList::new([Operand::from_raw(2_000_001)]).unwrap(),
            string_args: StringArgumentList::new(strings(&["abc"])).unwrap(),
            return_to: Some(Operand::from_raw(2_000_002)),
        });
        assert_eq!(
            call.sentence(&names),
            "Call CommonEvent[12(Shop)] (Variable1, \"abc\") -> Variable2"
        );

        let read = EventCommandKind::Database(DatabaseAccess {
            kind: DatabaseKind::User,
            operation: DatabaseOperation::Read,
            type_ref: DatabaseRef::id(1),
            data_ref: DatabaseRef::id(3),
            item_ref: DatabaseRef::name("Price"),
            value: Operand::from_raw(2_000_000),
        });
        assert_eq!(read.sentence(&names), "DB: Variable0 = UserDB[1(Items):3(Potion):Price]");
        assert_eq!(read.sentence(&NoContext), "DB: Variable0 = UserDB[1:3:Price]");

        let set = EventCommandKind::SetVariable(SetVariable {
            left: Operand::from_raw(2_000_001),
            right1: Operand::from_raw(2_000_000),
            right2: Operand::from_raw(5),
            assignment: AssignmentOperator::Add,
            arithmetic: ArithmeticOperator::Multiply,
            flags: SetVariableFlags::Right1Literal,
        });
        assert_eq!(set.sentence(&NoContext), "Variable: Variable1 += 2000000 * 5");
    }

    #[test]
    fn unresolved_names_fall_back_to_numbers() {
        let call = EventCommandKind::CallCommonEvent(CallCommonEvent {
            event: CommonEventRef::from_raw(2_000_005),
            ..Default::default()
        });
        assert_eq!(call.sentence(&NoContext), "Call CommonEvent[Variable5]");

        let call = EventCommandKind::CallCommonEvent(CallCommonEvent::default());
        assert_eq!(call.sentence(&NoContext), "Call CommonEvent[0]");
        assert_eq!(EventCommandKind::Blank.sentence(&NoContext), "");
    }

    #[test]
    fn bits_outside_the_flag_set_leave_operators_alone() {
        let flags = SetVariableFlags::from_bits_retain(0x0001) | SetVariableFlags::Right1Literal;
        let command = EventCommand::new(EventCommandKind::SetVariable(SetVariable {
            left: Operand::from_raw(2_000_000),
            right1: Operand::from_raw(7),
            assignment: AssignmentOperator::Assign,
            arithmetic: ArithmeticOperator::Add,
            flags,
            ..Default::default()
        }));
        match round_trip(&command).kind {
            EventCommandKind::SetVariable(decoded) => {
                assert_eq!(decoded.assignment, AssignmentOperator::Assign);
                assert_eq!(decoded.arithmetic, ArithmeticOperator::Add);
                assert_eq!(decoded.flags, SetVariableFlags::Right1Literal);
            }
            other => panic!("decoded {other:?}"),
        }
    }

    #[test]
    fn messages_that_shift_jis_would_alter_are_not_encoded() {
        let command = EventCommand::new(EventCommandKind::Message("¥100".to_string()));
        let mut writer = ByteWriter::new(TextEncoding::ShiftJis);
        assert!(matches!(command.encode(&mut writer), Err(Error::Encoding(_))));

        let mut writer = ByteWriter::new(TextEncoding::Utf8);
        command.encode(&mut writer).unwrap();
        let mut reader = ByteReader::new(writer.as_bytes(), TextEncoding::Utf8);
        assert_eq!(EventCommand::decode(&mut reader).unwrap(), command);
    }
}
