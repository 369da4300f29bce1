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

use encoding_rs::{SHIFT_JIS, UTF_8};

use crate::{Error, Result};

/// Byte encoding used for every string stored in a project file.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Default)]
#[derive(strum::Display, strum::EnumIter)]
#[derive(serde::Deserialize, serde::Serialize)]
pub enum TextEncoding {
    /// WOLF RPG Editor 2.x and earlier.
    #[default]
    #[strum(to_string = "Shift_JIS")]
    ShiftJis,
    /// WOLF RPG Editor 3.x.
    #[strum(to_string = "UTF-8")]
    Utf8,
}

impl TextEncoding {
    fn encoding(self) -> &'static encoding_rs::Encoding {
        match self {
            Self::ShiftJis => SHIFT_JIS,
            Self::Utf8 => UTF_8,
        }
    }

    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        let (bytes, _, errors) = self.encoding().encode(text);
        if errors {
            return Err(Error::Encoding(format!("cannot encode {text:?} as {self}")));
        }
        // WHATWG Shift_JIS maps a few characters onto bytes that decode as something else
        let survives = self.encoding().decode_without_bom_handling(&bytes).0 == text;
        if !survives {
            let lossy = text
                .chars()
                .find(|c| {
                    let mut buf = [0; 4];
                    let c: &str = c.encode_utf8(&mut buf);
                    let (bytes, _, _) = self.encoding().encode(c);
                    let changed = self.encoding().decode_without_bom_handling(&bytes).0 != c;
                    changed
                })
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            return Err(Error::Encoding(format!(
                "cannot encode {lossy:?} in {text:?} as {self} without changing it"
            )));
        }
        Ok(bytes.into_owned())
    }

    /// Malformed sequences are replaced rather than rejected, some shipped games contain them.
    pub fn decode(self, bytes: &[u8]) -> String {
        let (text, _, errors) = self.encoding().decode(bytes);
        if errors {
            tracing::warn!("string is not valid {self}, replacement characters were inserted");
        }
        text.into_owned()
    }
}

/// A sequential little-endian cursor over a byte slice.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
    encoding: TextEncoding,
}

impl<'a> ByteReader<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8], encoding: TextEncoding) -> Self {
        Self {
            bytes,
            offset: 0,
            encoding,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(Error::UnexpectedEof {
                offset: self.offset,
                needed: len - self.remaining(),
            });
        }
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    pub fn peek_u8(&self) -> Option<u8> {
        self.bytes.get(self.offset).copied()
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_le_bytes([self.read_u8()?]))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let mut buffer = [0; 4];
        buffer.copy_from_slice(self.read_bytes(4)?);
        Ok(i32::from_le_bytes(buffer))
    }

    /// Reads a length-prefixed, NUL-terminated string.
    /// The length counts the terminator, a length of zero is read as an empty string.
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.offset;
        let len = self.read_i32()?;
        if len < 0 {
            return Err(Error::ValidationMessage(format!(
                "negative string length {len} at offset {start}"
            )));
        }
        if len == 0 {
            return Ok(String::new());
        }
        let bytes = self.read_bytes(len as usize)?;
        let (text, terminator) = bytes.split_at(bytes.len() - 1);
        if terminator != [0] {
            return Err(Error::ValidationMessage(format!(
                "string at offset {start} is not NUL-terminated"
            )));
        }
        Ok(self.encoding.decode(text))
    }

    pub fn read_remaining(&mut self) -> &'a [u8] {
        let rest = &self.bytes[self.offset..];
        self.offset = self.bytes.len();
        rest
    }
}

/// The write-side counterpart of [`ByteReader`].
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    buffer: Vec<u8>,
    encoding: TextEncoding,
}

impl ByteWriter {
    #[must_use]
    pub fn new(encoding: TextEncoding) -> Self {
        Self {
            buffer: Vec::new(),
            encoding,
        }
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_string(&mut self, text: &str) -> Result<()> {
        let bytes = self.encoding.encode(text)?;
        let len = i32::try_from(bytes.len() + 1)
            .map_err(|_| Error::ValidationMessage("string is too long to encode".to_string()))?;
        self.write_i32(len);
        self.write_bytes(&bytes);
        self.write_u8(0);
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_little_endian() {
        let mut writer = ByteWriter::new(TextEncoding::ShiftJis);
        writer.write_i32(-2);
        writer.write_u8(7);
        assert_eq!(writer.as_bytes(), &[0xFE, 0xFF, 0xFF, 0xFF, 7]);

        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes, TextEncoding::ShiftJis);
        assert_eq!(reader.read_i32().unwrap(), -2);
        assert_eq!(reader.read_u8().unwrap(), 7);
        assert!(reader.is_empty());
    }

    #[test]
    fn strings_carry_length_and_terminator() {
        let mut writer = ByteWriter::new(TextEncoding::ShiftJis);
        writer.write_string("あ").unwrap();
        // Shift_JIS "あ" is 0x82 0xA0
        assert_eq!(writer.as_bytes(), &[3, 0, 0, 0, 0x82, 0xA0, 0]);

        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes, TextEncoding::ShiftJis);
        assert_eq!(reader.read_string().unwrap(), "あ");
    }

    #[test]
    fn zero_length_string_is_empty() {
        let bytes = [0, 0, 0, 0];
        let mut reader = ByteReader::new(&bytes, TextEncoding::Utf8);
        assert_eq!(reader.read_string().unwrap(), "");
        assert!(reader.is_empty());
    }

    #[test]
    fn underrun_reports_offset() {
        let bytes = [1, 2];
        let mut reader = ByteReader::new(&bytes, TextEncoding::Utf8);
        reader.read_u8().unwrap();
        match reader.read_i32() {
            Err(Error::UnexpectedEof { offset, needed }) => {
                assert_eq!(offset, 1);
                assert_eq!(needed, 3);
            }
            other => panic!("unexpected result {other:?}"),
        }
        // nothing was consumed by the failed read
        assert_eq!(reader.offset(), 1);
    }

    #[test]
    fn unencodable_text_is_rejected() {
        let mut writer = ByteWriter::new(TextEncoding::ShiftJis);
        assert!(matches!(writer.write_string("🐺"), Err(Error::Encoding(_))));
        assert!(writer.is_empty());
    }

    #[test]
    fn text_that_would_not_survive_shift_jis_is_rejected() {
        for text in ["¥100", "‾", "1−2"] {
            let mut writer = ByteWriter::new(TextEncoding::ShiftJis);
            match writer.write_string(text) {
                Err(Error::Encoding(message)) => {
                    let bad = text.chars().find(|c| !c.is_ascii()).unwrap();
                    assert!(message.contains(bad), "{message}");
                }
                other => panic!("{text:?} encoded to {other:?}"),
            }
            assert!(writer.is_empty());
        }

        // the same characters are fine in UTF-8
        let mut writer = ByteWriter::new(TextEncoding::Utf8);
        writer.write_string("¥100").unwrap();
        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes, TextEncoding::Utf8);
        assert_eq!(reader.read_string().unwrap(), "¥100");
    }
}
