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

//! Move commands and move routes.

use super::operator::{sub_code, AssignmentOperator};
use crate::address::Operand;
use crate::binary::{ByteReader, ByteWriter};
use crate::collections::restricted_list;
use crate::sentence::ProjectContext;
use crate::value::{MoveFrequency, MoveSpeed, Opacity, WaitFrames};
use crate::{Error, Result};

/// Bytes closing every move command.
const MOVE_COMMAND_TERMINATOR: [u8; 2] = [0x01, 0x00];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(
    num_enum::TryFromPrimitive,
    num_enum::IntoPrimitive,
    strum::Display,
    strum::EnumIter
)]
#[repr(u8)]
pub enum MoveCode {
    MoveDown = 0,
    MoveLeft = 1,
    MoveRight = 2,
    MoveUp = 3,
    MoveLowerLeft = 4,
    MoveLowerRight = 5,
    MoveUpperLeft = 6,
    MoveUpperRight = 7,
    TurnDown = 8,
    TurnLeft = 9,
    TurnRight = 10,
    TurnUp = 11,
    MoveRandom = 12,
    MoveTowardHero = 13,
    MoveAwayFromHero = 14,
    StepForward = 15,
    SetVariable = 16,
    ChangeSpeed = 17,
    ChangeFrequency = 18,
    Wait = 19,
    PlaySe = 20,
    ChangeGraphic = 21,
    ChangeOpacity = 22,
    Jump = 23,
    MoveToPosition = 24,
    PassThroughOn = 25,
    PassThroughOff = 26,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
pub enum MoveCommand {
    MoveDown,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveLowerLeft,
    MoveLowerRight,
    MoveUpperLeft,
    MoveUpperRight,
    TurnDown,
    TurnLeft,
    TurnRight,
    TurnUp,
    MoveRandom,
    MoveTowardHero,
    MoveAwayFromHero,
    StepForward,
    SetVariable {
        target: Operand,
        value: i32,
        operator: AssignmentOperator,
    },
    ChangeSpeed(MoveSpeed),
    ChangeFrequency(MoveFrequency),
    Wait(WaitFrames),
    PlaySe(i32),
    ChangeGraphic(i32),
    ChangeOpacity(Opacity),
    /// Offsets in tiles, negative values jump left or up.
    Jump {
        right: i32,
        down: i32,
    },
    MoveToPosition {
        x: i32,
        y: i32,
    },
    PassThroughOn,
    PassThroughOff,
}

fn expect_args(code: MoveCode, args: &[i32], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(Error::ValidationMessage(format!(
            "move command {code} takes {expected} arguments, found {}",
            args.len()
        )))
    }
}

impl MoveCommand {
    #[must_use]
    pub fn code(&self) -> MoveCode {
        match self {
            Self::MoveDown => MoveCode::MoveDown,
            Self::MoveLeft => MoveCode::MoveLeft,
            Self::MoveRight => MoveCode::MoveRight,
            Self::MoveUp => MoveCode::MoveUp,
            Self::MoveLowerLeft => MoveCode::MoveLowerLeft,
            Self::MoveLowerRight => MoveCode::MoveLowerRight,
            Self::MoveUpperLeft => MoveCode::MoveUpperLeft,
            Self::MoveUpperRight => MoveCode::MoveUpperRight,
            Self::TurnDown => MoveCode::TurnDown,
            Self::TurnLeft => MoveCode::TurnLeft,
            Self::TurnRight => MoveCode::TurnRight,
            Self::TurnUp => MoveCode::TurnUp,
            Self::MoveRandom => MoveCode::MoveRandom,
            Self::MoveTowardHero => MoveCode::MoveTowardHero,
            Self::MoveAwayFromHero => MoveCode::MoveAwayFromHero,
            Self::StepForward => MoveCode::StepForward,
            Self::SetVariable { .. } => MoveCode::SetVariable,
            Self::ChangeSpeed(_) => MoveCode::ChangeSpeed,
            Self::ChangeFrequency(_) => MoveCode::ChangeFrequency,
            Self::Wait(_) => MoveCode::Wait,
            Self::PlaySe(_) => MoveCode::PlaySe,
            Self::ChangeGraphic(_) => MoveCode::ChangeGraphic,
            Self::ChangeOpacity(_) => MoveCode::ChangeOpacity,
            Self::Jump { .. } => MoveCode::Jump,
            Self::MoveToPosition { .. } => MoveCode::MoveToPosition,
            Self::PassThroughOn => MoveCode::PassThroughOn,
            Self::PassThroughOff => MoveCode::PassThroughOff,
        }
    }

    /// Builds a command from its code and integer arguments.
    pub fn from_raw(code: u8, args: &[i32]) -> Result<Self> {
        let code = MoveCode::try_from(code).map_err(|_| Error::UnknownMoveCommandCode(code))?;

        let unit = |command: Self| expect_args(code, args, 0).map(|()| command);
        match code {
            MoveCode::MoveDown => unit(Self::MoveDown),
            MoveCode::MoveLeft => unit(Self::MoveLeft),
            MoveCode::MoveRight => unit(Self::MoveRight),
            MoveCode::MoveUp => unit(Self::MoveUp),
            MoveCode::MoveLowerLeft => unit(Self::MoveLowerLeft),
            MoveCode::MoveLowerRight => unit(Self::MoveLowerRight),
            MoveCode::MoveUpperLeft => unit(Self::MoveUpperLeft),
            MoveCode::MoveUpperRight => unit(Self::MoveUpperRight),
            MoveCode::TurnDown => unit(Self::TurnDown),
            MoveCode::TurnLeft => unit(Self::TurnLeft),
            MoveCode::TurnRight => unit(Self::TurnRight),
            MoveCode::TurnUp => unit(Self::TurnUp),
            MoveCode::MoveRandom => unit(Self::MoveRandom),
            MoveCode::MoveTowardHero => unit(Self::MoveTowardHero),
            MoveCode::MoveAwayFromHero => unit(Self::MoveAwayFromHero),
            MoveCode::StepForward => unit(Self::StepForward),
            MoveCode::PassThroughOn => unit(Self::PassThroughOn),
            MoveCode::PassThroughOff => unit(Self::PassThroughOff),
            MoveCode::SetVariable => {
                expect_args(code, args, 3)?;
                Ok(Self::SetVariable {
                    target: Operand::from_raw(args[0]),
                    value: args[1],
                    operator: sub_code("assignment operator", args[2])?,
                })
            }
            MoveCode::ChangeSpeed => {
                expect_args(code, args, 1)?;
                MoveSpeed::new_named("move speed", args[0]).map(Self::ChangeSpeed)
            }
            MoveCode::ChangeFrequency => {
                expect_args(code, args, 1)?;
                MoveFrequency::new_named("move frequency", args[0]).map(Self::ChangeFrequency)
            }
            MoveCode::Wait => {
                expect_args(code, args, 1)?;
                WaitFrames::new_named("wait frames", args[0]).map(Self::Wait)
            }
            MoveCode::PlaySe => {
                expect_args(code, args, 1)?;
                Ok(Self::PlaySe(args[0]))
            }
            MoveCode::ChangeGraphic => {
                expect_args(code, args, 1)?;
                Ok(Self::ChangeGraphic(args[0]))
            }
            MoveCode::ChangeOpacity => {
                expect_args(code, args, 1)?;
                Opacity::new_named("opacity", args[0]).map(Self::ChangeOpacity)
            }
            MoveCode::Jump => {
                expect_args(code, args, 2)?;
                Ok(Self::Jump {
                    right: args[0],
                    down: args[1],
                })
            }
            MoveCode::MoveToPosition => {
                expect_args(code, args, 2)?;
                Ok(Self::MoveToPosition {
                    x: args[0],
                    y: args[1],
                })
            }
        }
    }

    #[must_use]
    pub fn args(&self) -> Vec<i32> {
        match self {
            Self::SetVariable {
                target,
                value,
                operator,
            } => vec![target.to_raw(), *value, i32::from(u8::from(*operator))],
            Self::ChangeSpeed(speed) => vec![speed.get()],
            Self::ChangeFrequency(frequency) => vec![frequency.get()],
            Self::Wait(frames) => vec![frames.get()],
            Self::PlaySe(id) | Self::ChangeGraphic(id) => vec![*id],
            Self::ChangeOpacity(opacity) => vec![opacity.get()],
            Self::Jump { right, down } => vec![*right, *down],
            Self::MoveToPosition { x, y } => vec![*x, *y],
            _ => Vec::new(),
        }
    }

    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        let code = reader.read_u8()?;
        let arg_count = reader.read_u8()?;
        let args = (0..arg_count)
            .map(|_| reader.read_i32())
            .collect::<Result<Vec<_>>>()?;

        for expected in MOVE_COMMAND_TERMINATOR {
            let offset = reader.offset();
            let value = reader.read_u8()?;
            if value != expected {
                return Err(Error::InvalidFooter { offset, value });
            }
        }

        Self::from_raw(code, &args)
    }

    pub fn write(&self, writer: &mut ByteWriter) {
        let args = self.args();
        writer.write_u8(self.code().into());
        // at most three arguments
        writer.write_u8(args.len() as u8);
        for arg in args {
            writer.write_i32(arg);
        }
        writer.write_bytes(&MOVE_COMMAND_TERMINATOR);
    }

    pub fn sentence(&self, context: &dyn ProjectContext) -> String {
        match self {
            Self::SetVariable {
                target,
                value,
                operator,
            } => format!("{} {operator} {value}", target.sentence(context)),
            Self::ChangeSpeed(speed) => format!("Speed {speed}"),
            Self::ChangeFrequency(frequency) => format!("Frequency {frequency}"),
            Self::Wait(frames) => format!("Wait {frames}"),
            Self::PlaySe(id) => format!("SE {id}"),
            Self::ChangeGraphic(id) => format!("Graphic {id}"),
            Self::ChangeOpacity(opacity) => format!("Opacity {opacity}"),
            Self::Jump { right, down } => format!("Jump({right}, {down})"),
            Self::MoveToPosition { x, y } => format!("Move to ({x}, {y})"),
            _ => self.code().to_string(),
        }
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[derive(serde::Deserialize, serde::Serialize)]
    pub struct MoveRouteOptions: u8 {
        const Repeat = 0b00000001;
        const SkipIfBlocked = 0b00000010;
        const WaitForCompletion = 0b00000100;
    }
}

restricted_list! {
    /// Bounded only by the `i32` command count of the route block.
    pub struct MoveCommandList(MoveCommand), 0, i32::MAX as usize;
    default [];
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct MoveRoute {
    pub options: MoveRouteOptions,
    pub commands: MoveCommandList,
}

impl MoveRoute {
    pub fn new(
        options: MoveRouteOptions,
        commands: impl IntoIterator<Item = MoveCommand>,
    ) -> Result<Self> {
        Ok(Self {
            options,
            commands: MoveCommandList::new(commands)?,
        })
    }

    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        let flags = reader.read_u8()?;
        let options = MoveRouteOptions::from_bits(flags)
            .ok_or(Error::invalid("move route options", flags))?;

        let count = reader.read_i32()?;
        let count = usize::try_from(count).map_err(|_| Error::invalid("move command count", count))?;
        let commands = (0..count)
            .map(|_| MoveCommand::read(reader))
            .collect::<Result<Vec<_>>>()?;

        Self::new(options, commands)
    }

    pub fn write(&self, writer: &mut ByteWriter) -> Result<()> {
        writer.write_u8(self.options.bits());
        let count = i32::try_from(self.commands.len())
            .map_err(|_| Error::ValidationMessage("too many move commands".to_string()))?;
        writer.write_i32(count);
        for command in &self.commands {
            command.write(writer);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::TextEncoding;
    use crate::sentence::NoContext;
    use strum::IntoEnumIterator;

    fn encode(route: &MoveRoute) -> Vec<u8> {
        let mut writer = ByteWriter::new(TextEncoding::ShiftJis);
        route.write(&mut writer).unwrap();
        writer.into_bytes()
    }

    #[test]
    fn move_command_layout() {
        let route = MoveRoute::new(
            MoveRouteOptions::Repeat | MoveRouteOptions::WaitForCompletion,
            [MoveCommand::MoveUp, MoveCommand::Jump { right: -1, down: 2 }],
        )
        .unwrap();

        let mut expected = vec![0b101];
        expected.extend(2i32.to_le_bytes());
        expected.extend([3, 0, 1, 0]);
        expected.extend([23, 2]);
        expected.extend((-1i32).to_le_bytes());
        expected.extend(2i32.to_le_bytes());
        expected.extend([1, 0]);
        assert_eq!(encode(&route), expected);

        let mut reader = ByteReader::new(&expected, TextEncoding::ShiftJis);
        assert_eq!(MoveRoute::read(&mut reader).unwrap(), route);
        assert!(reader.is_empty());
    }

    #[test]
    fn every_code_has_a_command() {
        for code in MoveCode::iter() {
            let raw: u8 = code.into();
            let args = match code {
                MoveCode::SetVariable => vec![2_000_000, 5, 1],
                MoveCode::Jump | MoveCode::MoveToPosition => vec![1, 1],
                MoveCode::ChangeSpeed
                | MoveCode::ChangeFrequency
                | MoveCode::Wait
                | MoveCode::PlaySe
                | MoveCode::ChangeGraphic
                | MoveCode::ChangeOpacity => vec![3],
                _ => Vec::new(),
            };
            let command = MoveCommand::from_raw(raw, &args).unwrap();
            assert_eq!(command.code(), code);
            assert_eq!(command.args(), args);
        }
    }

    #[test]
    fn invalid_move_commands() {
        assert!(matches!(MoveCommand::from_raw(27, &[]), Err(Error::UnknownMoveCommandCode(27))));
        assert!(MoveCommand::from_raw(0, &[1]).is_err());
        assert!(MoveCommand::from_raw(17, &[6]).is_err());
        assert!(MoveCommand::from_raw(22, &[256]).is_err());
        assert!(MoveCommand::from_raw(16, &[0, 0, 8]).is_err());

        let bytes = [0, 0, 1, 1];
        let mut reader = ByteReader::new(&bytes, TextEncoding::ShiftJis);
        assert!(matches!(
            MoveCommand::read(&mut reader),
            Err(Error::InvalidFooter { offset: 3, value: 1 })
        ));
    }

    #[test]
    fn unknown_option_bits_are_rejected() {
        let mut bytes = vec![0b1000];
        bytes.extend(0i32.to_le_bytes());
        let mut reader = ByteReader::new(&bytes, TextEncoding::ShiftJis);
        assert!(MoveRoute::read(&mut reader).is_err());
    }

    #[test]
    fn decoded_routes_keep_their_list_capacity() {
        let mut route = MoveRoute::default();
        route.commands.push(MoveCommand::MoveUp).unwrap();
        route.commands.push(MoveCommand::StepForward).unwrap();

        let bytes = encode(&route);
        let mut reader = ByteReader::new(&bytes, TextEncoding::ShiftJis);
        let decoded = MoveRoute::read(&mut reader).unwrap();
        assert_eq!(decoded, route);
        assert_eq!(decoded.commands.as_list().capacity(), route.commands.as_list().capacity());
        assert_eq!(MoveCommandList::MAX_CAPACITY, i32::MAX as usize);
    }

    #[test]
    fn sentences() {
        let set = MoveCommand::SetVariable {
            target: Operand::from_raw(2_000_003),
            value: 4,
            operator: AssignmentOperator::Add,
        };
        assert_eq!(set.sentence(&NoContext), "Variable3 += 4");
        assert_eq!(MoveCommand::TurnLeft.sentence(&NoContext), "TurnLeft");
    }
}
