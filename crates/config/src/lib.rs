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

//! Configuration for reading project files and rendering event commands.
//!
//! Nothing here is global: callers load a [`Config`] and pass it (or what it produces) to the
//! decoders and renderers that need it.

use once_cell::sync::Lazy;
use wodi_data::{ByteReader, ByteWriter, SentenceOptions, TextEncoding};

static DEFAULT: Lazy<Config> = Lazy::new(|| {
    ron::from_str(include_str!("default.ron"))
        .expect("failed to statically load the default configuration. please report this bug")
});

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse configuration: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("Failed to write configuration: {0}")]
    RonSerialize(#[from] ron::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Settings shared by everything that reads, writes or renders project data.
///
/// Fields missing from a configuration file take their value from the built-in default.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct Config {
    #[serde(default = "defaults::text_encoding")]
    pub text_encoding: TextEncoding,
    #[serde(default = "defaults::indent_width")]
    pub indent_width: usize,
    #[serde(default = "defaults::show_event_codes")]
    pub show_event_codes: bool,
}

// Only consulted for fields a file leaves out.
mod defaults {
    use super::DEFAULT;
    use wodi_data::TextEncoding;

    pub fn text_encoding() -> TextEncoding {
        DEFAULT.text_encoding
    }

    pub fn indent_width() -> usize {
        DEFAULT.indent_width
    }

    pub fn show_event_codes() -> bool {
        DEFAULT.show_event_codes
    }
}

impl Default for Config {
    fn default() -> Self {
        DEFAULT.clone()
    }
}

impl Config {
    pub fn from_ron(text: &str) -> Result<Self> {
        let config: Self = ron::from_str(text)?;
        tracing::debug!(
            "loaded configuration: {} text, indent width {}",
            config.text_encoding,
            config.indent_width
        );
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// A reader over `bytes` decoding strings with the configured encoding.
    #[must_use]
    pub fn reader<'a>(&self, bytes: &'a [u8]) -> ByteReader<'a> {
        ByteReader::new(bytes, self.text_encoding)
    }

    #[must_use]
    pub fn writer(&self) -> ByteWriter {
        ByteWriter::new(self.text_encoding)
    }

    #[must_use]
    pub fn sentence_options(&self) -> SentenceOptions {
        SentenceOptions {
            indent_width: self.indent_width,
            show_event_codes: self.show_event_codes,
        }
    }
}
