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

//! Database values and the case descriptions attached to database items.

use crate::binary::{ByteReader, ByteWriter};
use crate::collections::restricted_list;
use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(
    num_enum::TryFromPrimitive,
    num_enum::IntoPrimitive,
    strum::Display,
    strum::EnumIter
)]
#[derive(serde::Deserialize, serde::Serialize)]
#[repr(u8)]
pub enum DatabaseKind {
    User = 0,
    Changeable = 1,
    System = 2,
}

// Not derived: num_enum would turn a `#[default]` variant into the catch-all for unknown values.
impl Default for DatabaseKind {
    fn default() -> Self {
        Self::User
    }
}

impl DatabaseKind {
    #[must_use]
    pub fn short_name(self) -> &'static str {
        match self {
            Self::User => "UserDB",
            Self::Changeable => "ChangeableDB",
            Self::System => "SystemDB",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct DatabaseValueCase {
    pub case_number: i32,
    pub description: String,
}

impl DatabaseValueCase {
    pub fn new(case_number: i32, description: impl Into<String>) -> Self {
        Self {
            case_number,
            description: description.into(),
        }
    }
}

restricted_list! {
    /// The selectable cases of a database item.
    ///
    /// Case numbers are not required to be unique, lookups return the first match.
    pub struct DatabaseValueCaseList(DatabaseValueCase), 0, 10_000;
    default [];
}

impl DatabaseValueCaseList {
    #[must_use]
    pub fn get_for_case_number(&self, case_number: i32) -> Option<&DatabaseValueCase> {
        self.iter().find(|case| case.case_number == case_number)
    }

    #[must_use]
    pub fn get_description_for_case_number(&self, case_number: i32) -> Option<&str> {
        self.get_for_case_number(case_number)
            .map(|case| case.description.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::EnumIter)]
#[derive(serde::Deserialize, serde::Serialize)]
pub enum ItemType {
    #[default]
    Int,
    String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
pub enum DatabaseItemValue {
    Int(i32),
    Str(String),
}

impl DatabaseItemValue {
    #[must_use]
    pub fn item_type(&self) -> ItemType {
        match self {
            Self::Int(_) => ItemType::Int,
            Self::Str(_) => ItemType::String,
        }
    }

    /// The zero value for an item of type `item_type`.
    #[must_use]
    pub fn default_for(item_type: ItemType) -> Self {
        match item_type {
            ItemType::Int => Self::Int(0),
            ItemType::String => Self::Str(String::new()),
        }
    }
}

impl std::fmt::Display for DatabaseItemValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => write!(f, "{value:?}"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct DatabaseItemSetting {
    pub name: String,
    pub item_type: ItemType,
    #[serde(default)]
    pub cases: DatabaseValueCaseList,
}

restricted_list! {
    /// The values of one database record, in item order.
    pub struct DatabaseValueList(DatabaseItemValue), 0, 100;
    default [];
}

fn read_count(reader: &mut ByteReader<'_>, what: &'static str) -> Result<usize> {
    let count = reader.read_i32()?;
    usize::try_from(count).map_err(|_| Error::invalid(what, count))
}

fn write_count(writer: &mut ByteWriter, what: &'static str, count: usize) -> Result<()> {
    let count = i32::try_from(count).map_err(|_| Error::ValidationMessage(format!("too many {what}")))?;
    writer.write_i32(count);
    Ok(())
}

impl DatabaseValueList {
    #[must_use]
    pub fn item_types(&self) -> Vec<ItemType> {
        self.iter().map(DatabaseItemValue::item_type).collect()
    }

    /// Writes all int values, then all string values, each group prefixed with its count.
    pub fn encode(&self, writer: &mut ByteWriter) -> Result<()> {
        let ints: Vec<i32> = self
            .iter()
            .filter_map(|value| match value {
                DatabaseItemValue::Int(n) => Some(*n),
                DatabaseItemValue::Str(_) => None,
            })
            .collect();
        let strings: Vec<&str> = self
            .iter()
            .filter_map(|value| match value {
                DatabaseItemValue::Str(s) => Some(s.as_str()),
                DatabaseItemValue::Int(_) => None,
            })
            .collect();

        write_count(writer, "int values", ints.len())?;
        for n in ints {
            writer.write_i32(n);
        }
        write_count(writer, "string values", strings.len())?;
        for s in strings {
            writer.write_string(s)?;
        }
        Ok(())
    }

    /// Reads values laid out by [`Self::encode`] and puts them back in item order.
    pub fn decode(reader: &mut ByteReader<'_>, item_types: &[ItemType]) -> Result<Self> {
        let expected_ints = item_types.iter().filter(|t| **t == ItemType::Int).count();
        let expected_strings = item_types.len() - expected_ints;

        let int_count = read_count(reader, "database int count")?;
        if int_count != expected_ints {
            return Err(Error::ValidationMessage(format!(
                "record has {int_count} int values, its type declares {expected_ints}"
            )));
        }
        let ints = (0..int_count)
            .map(|_| reader.read_i32())
            .collect::<Result<Vec<_>>>()?;

        let string_count = read_count(reader, "database string count")?;
        if string_count != expected_strings {
            return Err(Error::ValidationMessage(format!(
                "record has {string_count} string values, its type declares {expected_strings}"
            )));
        }
        let strings = (0..string_count)
            .map(|_| reader.read_string())
            .collect::<Result<Vec<_>>>()?;

        let mut ints = ints.into_iter();
        let mut strings = strings.into_iter();
        let values = item_types.iter().map(|item_type| match item_type {
            ItemType::Int => ints.next().map(DatabaseItemValue::Int),
            ItemType::String => strings.next().map(DatabaseItemValue::Str),
        });
        let values: Option<Vec<_>> = values.collect();
        let values = values.ok_or_else(|| {
            Error::ValidationMessage("value count does not match item types".to_string())
        })?;

        tracing::trace!("decoded {} database values", values.len());
        Self::new(values)
    }

    /// Checks that every value has the type declared for its item.
    pub fn validate_against(&self, item_types: &[ItemType]) -> Result<()> {
        if self.len() != item_types.len() {
            return Err(Error::ValidationMessage(format!(
                "record has {} values, its type declares {} items",
                self.len(),
                item_types.len()
            )));
        }
        match self
            .iter()
            .zip(item_types)
            .position(|(value, item_type)| value.item_type() != *item_type)
        {
            Some(index) => Err(Error::ValidationMessage(format!(
                "item {index} holds {} but is declared as {}",
                self[index].item_type(),
                item_types[index]
            ))),
            None => Ok(()),
        }
    }
}

/// One data entry of a database type.
#[derive(Clone, Debug, Default, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct DatabaseRecord {
    pub name: String,
    pub values: DatabaseValueList,
}

impl DatabaseRecord {
    /// A record holding the zero value of each item.
    pub fn new(name: impl Into<String>, settings: &[DatabaseItemSetting]) -> Result<Self> {
        let values = settings
            .iter()
            .map(|setting| DatabaseItemValue::default_for(setting.item_type));
        Ok(Self {
            name: name.into(),
            values: DatabaseValueList::new(values)?,
        })
    }

    /// Renders the value of item `item_index`, using the case description of an int value
    /// when the item declares one for it.
    #[must_use]
    pub fn describe(&self, item_index: usize, settings: &[DatabaseItemSetting]) -> Option<String> {
        let value = self.values.get(item_index)?;
        let description = match value {
            DatabaseItemValue::Int(n) => settings
                .get(item_index)
                .and_then(|setting| setting.cases.get_description_for_case_number(*n))
                .map(|description| format!("{n}: {description}")),
            DatabaseItemValue::Str(_) => None,
        };
        Some(description.unwrap_or_else(|| value.to_string()))
    }

    pub fn encode(&self, writer: &mut ByteWriter) -> Result<()> {
        writer.write_string(&self.name)?;
        self.values.encode(writer)
    }

    pub fn decode(reader: &mut ByteReader<'_>, item_types: &[ItemType]) -> Result<Self> {
        let name = reader.read_string()?;
        let values = DatabaseValueList::decode(reader, item_types)?;
        Ok(Self { name, values })
    }
}
