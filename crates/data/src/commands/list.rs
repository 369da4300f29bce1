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

use super::event::EventCommand;
use crate::binary::{ByteReader, ByteWriter, TextEncoding};
use crate::collections::restricted_list;
use crate::sentence::{ProjectContext, SentenceOptions};
use crate::{Error, Result};

restricted_list! {
    /// The commands of an event page or a common event.
    ///
    /// Lists written by the editor end with a blank command, so a new list holds exactly one.
    pub struct EventCommandList(EventCommand), 1, 10_000;
    default [EventCommand::default()];
}

impl EventCommandList {
    /// Reads the command count followed by that many commands.
    pub fn decode(reader: &mut ByteReader<'_>) -> Result<Self> {
        let start = reader.offset();
        let count = reader.read_i32()?;
        let count = usize::try_from(count)
            .ok()
            .filter(|count| *count <= Self::MAX_CAPACITY)
            .ok_or(Error::invalid("event command count", count))?;

        let commands = (0..count)
            .map(|_| EventCommand::decode(reader))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            "decoded {count} event commands from {} bytes",
            reader.offset() - start
        );
        Self::new(commands)
    }

    pub fn encode(&self, writer: &mut ByteWriter) -> Result<()> {
        let start = writer.len();
        // bounded by MAX_CAPACITY
        writer.write_i32(self.len() as i32);
        for command in self {
            command.encode(writer)?;
        }

        tracing::debug!(
            "encoded {} event commands into {} bytes",
            self.len(),
            writer.len() - start
        );
        Ok(())
    }

    /// Decodes a buffer holding exactly one command list.
    pub fn from_bytes(bytes: &[u8], encoding: TextEncoding) -> Result<Self> {
        let mut reader = ByteReader::new(bytes, encoding);
        let list = Self::decode(&mut reader)?;
        if !reader.is_empty() {
            return Err(Error::invalid("trailing bytes after command list", reader.remaining() as i64));
        }
        Ok(list)
    }

    pub fn to_bytes(&self, encoding: TextEncoding) -> Result<Vec<u8>> {
        let mut writer = ByteWriter::new(encoding);
        self.encode(&mut writer)?;
        Ok(writer.into_bytes())
    }

    #[must_use]
    pub fn event_code_strings(&self) -> Vec<String> {
        self.iter().map(EventCommand::to_event_code_string).collect()
    }

    /// One line per command, indented by its nesting depth.
    pub fn sentences(&self, context: &dyn ProjectContext, options: &SentenceOptions) -> Vec<String> {
        self.iter()
            .map(|command| {
                let indent = options.indent(command.indent.get() as usize);
                let sentence = command.sentence(context);
                if options.show_event_codes {
                    let code = command.to_event_code_string();
                    if sentence.is_empty() {
                        format!("{indent}{code}")
                    } else {
                        format!("{indent}{code} {sentence}")
                    }
                } else {
                    format!("{indent}{sentence}")
                }
            })
            .collect()
    }
}
