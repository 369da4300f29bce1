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

use super::movement::MoveRoute;
use crate::binary::{ByteReader, ByteWriter};
use crate::{Error, Result};

const FOOTER_PLAIN: u8 = 0x00;
const FOOTER_MOVE_ROUTE: u8 = 0x01;

/// An event command record before its arguments are given meaning.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawCommand {
    pub code: i32,
    /// Integer arguments following the opcode.
    pub ints: Vec<i32>,
    pub indent: i8,
    pub strings: Vec<String>,
    pub move_route: Option<MoveRoute>,
}

impl RawCommand {
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        let int_count = reader.read_u8()?;
        if int_count == 0 {
            return Err(Error::invalid("int count", int_count));
        }
        let code = reader.read_i32()?;
        let ints = (1..int_count)
            .map(|_| reader.read_i32())
            .collect::<Result<Vec<_>>>()?;
        let indent = reader.read_i8()?;
        let string_count = reader.read_u8()?;
        let strings = (0..string_count)
            .map(|_| reader.read_string())
            .collect::<Result<Vec<_>>>()?;

        let offset = reader.offset();
        let move_route = match reader.read_u8()? {
            FOOTER_PLAIN => None,
            FOOTER_MOVE_ROUTE => Some(MoveRoute::read(reader)?),
            value => return Err(Error::InvalidFooter { offset, value }),
        };

        tracing::trace!("read command {code} at offset {offset}");
        Ok(Self {
            code,
            ints,
            indent,
            strings,
            move_route,
        })
    }

    pub fn write(&self, writer: &mut ByteWriter) -> Result<()> {
        let int_count = u8::try_from(self.ints.len() + 1)
            .map_err(|_| Error::ValidationMessage(format!("too many int arguments for {}", self.code)))?;
        let string_count = u8::try_from(self.strings.len()).map_err(|_| {
            Error::ValidationMessage(format!("too many string arguments for {}", self.code))
        })?;

        writer.write_u8(int_count);
        writer.write_i32(self.code);
        for int in &self.ints {
            writer.write_i32(*int);
        }
        writer.write_i8(self.indent);
        writer.write_u8(string_count);
        for string in &self.strings {
            writer.write_string(string)?;
        }

        match &self.move_route {
            Some(route) => {
                writer.write_u8(FOOTER_MOVE_ROUTE);
                route.write(writer)
            }
            None => {
                writer.write_u8(FOOTER_PLAIN);
                Ok(())
            }
        }
    }

    /// `[code][int count,string count]<indent>(ints)("strings")`, the int count includes the opcode.
    #[must_use]
    pub fn to_event_code_string(&self) -> String {
        format!(
            "[{}][{},{}]<{}>({})({})",
            self.code,
            self.ints.len() + 1,
            self.strings.len(),
            self.indent,
            self.ints.iter().join(","),
            self.strings.iter().map(|s| format!("\"{s}\"")).join(","),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::TextEncoding;
    use crate::commands::movement::{MoveCommand, MoveRouteOptions};

    fn message() -> RawCommand {
        RawCommand {
            code: 101,
            strings: vec!["Hello".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn plain_record_layout() {
        let mut writer = ByteWriter::new(TextEncoding::ShiftJis);
        message().write(&mut writer).unwrap();

        let mut expected = vec![1];
        expected.extend(101i32.to_le_bytes());
        expected.extend([0, 1]);
        expected.extend(6i32.to_le_bytes());
        expected.extend(b"Hello\0");
        expected.push(0);
        assert_eq!(writer.as_bytes(), expected);

        let mut reader = ByteReader::new(&expected, TextEncoding::ShiftJis);
        assert_eq!(RawCommand::read(&mut reader).unwrap(), message());
        assert!(reader.is_empty());
    }

    #[test]
    fn record_with_move_route() {
        let raw = RawCommand {
            code: 201,
            ints: vec![-2],
            indent: 3,
            strings: Vec::new(),
            move_route: Some(
                MoveRoute::new(MoveRouteOptions::Repeat, [MoveCommand::MoveDown]).unwrap(),
            ),
        };
        let mut writer = ByteWriter::new(TextEncoding::ShiftJis);
        raw.write(&mut writer).unwrap();

        let mut reader = ByteReader::new(writer.as_bytes(), TextEncoding::ShiftJis);
        assert_eq!(RawCommand::read(&mut reader).unwrap(), raw);
        assert!(reader.is_empty());
    }

    #[test]
    fn malformed_records() {
        let mut bytes = vec![1];
        bytes.extend(0i32.to_le_bytes());
        bytes.extend([0, 0, 7]);
        let mut reader = ByteReader::new(&bytes, TextEncoding::ShiftJis);
        assert!(matches!(
            RawCommand::read(&mut reader),
            Err(Error::InvalidFooter { offset: 7, value: 7 })
        ));

        let mut reader = ByteReader::new(&[0], TextEncoding::ShiftJis);
        assert!(RawCommand::read(&mut reader).is_err());

        let mut reader = ByteReader::new(&bytes[..4], TextEncoding::ShiftJis);
        assert!(matches!(RawCommand::read(&mut reader), Err(Error::UnexpectedEof { .. })));
    }

    #[test]
    fn event_code_string() {
        assert_eq!(message().to_event_code_string(), "[101][1,1]<0>()(\"Hello\")");

        let raw = RawCommand {
            code: 121,
            ints: vec![2_000_000, 5, 0, 0],
            indent: 1,
            ..Default::default()
        };
        assert_eq!(raw.to_event_code_string(), "[121][5,0]<1>(2000000,5,0,0)()");
    }
}
