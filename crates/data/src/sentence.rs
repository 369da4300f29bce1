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

use std::collections::HashMap;

use crate::address::VariableAddress;
use crate::database::DatabaseKind;

/// Name lookups used when rendering commands as sentences.
///
/// Every lookup is best-effort: `None` means "not resolved" and the caller falls back to
/// displaying the raw number.
pub trait ProjectContext {
    fn common_event_name(&self, _id: i32) -> Option<String> {
        None
    }

    fn database_type_name(&self, _kind: DatabaseKind, _type_id: i32) -> Option<String> {
        None
    }

    fn database_data_name(
        &self,
        _kind: DatabaseKind,
        _type_id: i32,
        _data_id: i32,
    ) -> Option<String> {
        None
    }

    fn database_item_name(
        &self,
        _kind: DatabaseKind,
        _type_id: i32,
        _item_id: i32,
    ) -> Option<String> {
        None
    }

    fn variable_name(&self, _address: &VariableAddress) -> Option<String> {
        None
    }
}

/// A context that resolves nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContext;

impl ProjectContext for NoContext {}

/// A context backed by plain maps.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    pub common_events: HashMap<i32, String>,
    pub database_types: HashMap<(DatabaseKind, i32), String>,
    pub database_data: HashMap<(DatabaseKind, i32, i32), String>,
    pub database_items: HashMap<(DatabaseKind, i32, i32), String>,
    /// Keyed by raw address.
    pub variables: HashMap<i32, String>,
}

impl ProjectContext for NameTable {
    fn common_event_name(&self, id: i32) -> Option<String> {
        self.common_events.get(&id).cloned()
    }

    fn database_type_name(&self, kind: DatabaseKind, type_id: i32) -> Option<String> {
        self.database_types.get(&(kind, type_id)).cloned()
    }

    fn database_data_name(&self, kind: DatabaseKind, type_id: i32, data_id: i32) -> Option<String> {
        self.database_data.get(&(kind, type_id, data_id)).cloned()
    }

    fn database_item_name(&self, kind: DatabaseKind, type_id: i32, item_id: i32) -> Option<String> {
        self.database_items.get(&(kind, type_id, item_id)).cloned()
    }

    fn variable_name(&self, address: &VariableAddress) -> Option<String> {
        self.variables.get(&address.to_int()).cloned()
    }
}

/// How a command list is laid out when rendered as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct SentenceOptions {
    /// Spaces per indent level.
    pub indent_width: usize,
    /// Prefix each line with the raw event code string.
    pub show_event_codes: bool,
}

impl SentenceOptions {
    /// Wider settings are clamped to this when rendering.
    pub const MAX_INDENT_WIDTH: usize = 16;

    /// Leading whitespace for a command nested `depth` levels deep.
    #[must_use]
    pub fn indent(&self, depth: usize) -> String {
        " ".repeat(depth * self.indent_width.min(Self::MAX_INDENT_WIDTH))
    }
}

impl Default for SentenceOptions {
    fn default() -> Self {
        Self {
            indent_width: 2,
            show_event_codes: false,
        }
    }
}
