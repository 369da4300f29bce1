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

//! Variable addresses.
//!
//! WOLF RPG Editor refers to every readable value (variables, self variables, database cells,
//! event information, random numbers) through a single `i32`. Which store is meant is decided by
//! the range the integer falls in. The ranges are disjoint and the gaps between them are reserved.

use crate::database::DatabaseKind;
use crate::sentence::ProjectContext;
use crate::value::{CommonEventId, DbDataId, DbItemId, DbTypeId, MapEventId};
use crate::{Error, Result};

macro_rules! address_variants {
    ($($(#[$meta:meta])* $name:ident => $lower:literal .. $upper:literal, $display:literal;)*) => {
        paste::paste! {
            /// The category of a [`VariableAddress`].
            #[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
            #[derive(strum::Display, strum::EnumIter)]
            #[derive(serde::Deserialize, serde::Serialize)]
            pub enum AddressKind {
                $(
                    #[strum(to_string = $display)]
                    $name,
                )*
            }

            impl AddressKind {
                /// The half-open range of raw values belonging to this category.
                #[must_use]
                pub fn range(self) -> std::ops::Range<i32> {
                    match self {
                        $(Self::$name => $lower..$upper,)*
                    }
                }
            }

            /// `(lower inclusive, upper exclusive, kind)`, ordered by `lower`.
            pub const ADDRESS_TABLE: &[(i32, i32, AddressKind)] = &[
                $(($lower, $upper, AddressKind::$name),)*
            ];

            $(
                $(#[$meta])*
                #[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
                pub struct [<$name Address>](i32);

                impl [<$name Address>] {
                    pub const LOWER: i32 = $lower;
                    pub const UPPER: i32 = $upper;

                    pub fn new(value: i32) -> Result<Self> {
                        if (Self::LOWER..Self::UPPER).contains(&value) {
                            Ok(Self(value))
                        } else {
                            Err(Error::AddressOutOfRange(value))
                        }
                    }

                    #[must_use]
                    pub fn to_int(self) -> i32 {
                        self.0
                    }

                    /// Distance from the start of the range.
                    #[must_use]
                    pub fn offset(self) -> i32 {
                        self.0 - Self::LOWER
                    }
                }

                impl From<[<$name Address>]> for VariableAddress {
                    fn from(value: [<$name Address>]) -> Self {
                        Self::$name(value)
                    }
                }
            )*

            /// A validated variable address.
            ///
            /// Variants are declared in range order, so the derived ordering matches the raw value.
            #[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
            #[derive(serde::Deserialize, serde::Serialize)]
            #[serde(into = "i32")]
            #[serde(try_from = "i32")]
            pub enum VariableAddress {
                $($name([<$name Address>]),)*
            }

            impl VariableAddress {
                #[must_use]
                pub fn to_int(self) -> i32 {
                    match self {
                        $(Self::$name(address) => address.to_int(),)*
                    }
                }

                #[must_use]
                pub fn kind(self) -> AddressKind {
                    match self {
                        $(Self::$name(_) => AddressKind::$name,)*
                    }
                }

                fn from_kind(kind: AddressKind, value: i32) -> Self {
                    match kind {
                        $(AddressKind::$name => Self::$name([<$name Address>](value)),)*
                    }
                }
            }
        }
    };
}

address_variants! {
    /// Self variable of a map event: `1_000_000 + event_id * 10 + index`.
    MapEventVariable => 1_000_000..1_100_000, "Map event self variable";
    /// Self variable of the map event that is currently running.
    ThisMapEventVariable => 1_100_000..1_100_010, "This map event self variable";
    /// Self variable of a common event: `1_500_000 + common_event_id * 100 + index`.
    CommonEventVariable => 1_500_000..1_600_000, "Common event self variable";
    /// Self variable of the common event that is currently running.
    ThisCommonEventVariable => 1_600_000..1_600_100, "This common event self variable";
    NormalNumberVariable => 2_000_000..2_100_000, "Normal variable";
    /// Spare variables 1 to 9: `2_000_000 + spare * 100_000 + index`.
    SpareNumberVariable => 2_100_000..3_000_000, "Spare variable";
    StringVariable => 3_000_000..3_100_000, "String variable";
    /// A random number between 0 and `value - 8_000_000`, inclusive.
    RandomNumber => 8_000_000..9_000_000, "Random number";
    /// Information about a map event: `9_000_000 + event_id * 10 + info`.
    EventInfo => 9_000_000..9_100_000, "Map event information";
    ThisEventInfo => 9_100_000..9_100_010, "This event information";
    HeroInfo => 9_180_000..9_180_010, "Hero information";
    /// Information about a party member: `9_180_010 + member * 10 + info`.
    MemberInfo => 9_180_010..9_180_060, "Party member information";
    SystemVariable => 9_900_000..9_910_000, "System variable";
    SystemStringVariable => 9_910_000..9_920_000, "System string";
    /// User database cell: `1_000_000_000 + type * 1_000_000 + data * 100 + item`.
    UserDatabase => 1_000_000_000..1_100_000_000, "User database";
    ChangeableDatabase => 1_100_000_000..1_200_000_000, "Changeable database";
    SystemDatabase => 1_300_000_000..1_400_000_000, "System database";
}

impl VariableAddress {
    /// Finds the range `value` belongs to and wraps it in the matching variant.
    pub fn new(value: i32) -> Result<Self> {
        value
            .address_kind()
            .map(|kind| Self::from_kind(kind, value))
            .ok_or(Error::AddressOutOfRange(value))
    }

    /// `(database, type, data, item)` for database addresses.
    #[must_use]
    pub fn database_cell(self) -> Option<(DatabaseKind, i32, i32, i32)> {
        let (kind, cell): (DatabaseKind, &dyn DatabaseCell) = match &self {
            Self::UserDatabase(a) => (DatabaseKind::User, a as &dyn DatabaseCell),
            Self::ChangeableDatabase(a) => (DatabaseKind::Changeable, a as &dyn DatabaseCell),
            Self::SystemDatabase(a) => (DatabaseKind::System, a as &dyn DatabaseCell),
            _ => return None,
        };
        Some((kind, cell.type_id(), cell.data_id(), cell.item_id()))
    }

    /// Renders the address for display, resolving names through `context` where possible.
    pub fn sentence(self, context: &dyn ProjectContext) -> String {
        let base = match self {
            Self::MapEventVariable(a) => format!("Ev{} SelfVar{}", a.event_id(), a.variable_index()),
            Self::ThisMapEventVariable(a) => format!("This Ev SelfVar{}", a.variable_index()),
            Self::CommonEventVariable(a) => {
                let id = a.common_event_id();
                match context.common_event_name(id) {
                    Some(name) => format!("CommonEv{id}[{name}] SelfVar{}", a.variable_index()),
                    None => format!("CommonEv{id} SelfVar{}", a.variable_index()),
                }
            }
            Self::ThisCommonEventVariable(a) => {
                format!("This CommonEv SelfVar{}", a.variable_index())
            }
            Self::NormalNumberVariable(a) => format!("Variable{}", a.variable_index()),
            Self::SpareNumberVariable(a) => {
                format!("Spare{} Variable{}", a.spare_number(), a.variable_index())
            }
            Self::StringVariable(a) => format!("StringVar{}", a.variable_index()),
            Self::RandomNumber(a) => format!("Random(0~{})", a.max()),
            Self::EventInfo(a) => format!("Ev{} Info{}", a.event_id(), a.info()),
            Self::ThisEventInfo(a) => format!("This Ev Info{}", a.info()),
            Self::HeroInfo(a) => format!("Hero Info{}", a.info()),
            Self::MemberInfo(a) => format!("Member{} Info{}", a.member_index() + 1, a.info()),
            Self::SystemVariable(a) => format!("SysVar{}", a.variable_index()),
            Self::SystemStringVariable(a) => format!("SysString{}", a.variable_index()),
            Self::UserDatabase(a) => database_sentence(context, DatabaseKind::User, a),
            Self::ChangeableDatabase(a) => database_sentence(context, DatabaseKind::Changeable, a),
            Self::SystemDatabase(a) => database_sentence(context, DatabaseKind::System, a),
        };

        match context.variable_name(&self) {
            Some(name) => format!("{base}[{name}]"),
            None => base,
        }
    }
}

fn database_sentence(
    context: &dyn ProjectContext,
    kind: DatabaseKind,
    cell: impl DatabaseCell,
) -> String {
    let (type_id, data_id, item_id) = (cell.type_id(), cell.data_id(), cell.item_id());
    let part = |id: i32, name: Option<String>| match name {
        Some(name) => format!("{id}({name})"),
        None => id.to_string(),
    };
    format!(
        "{}[{}:{}:{}]",
        kind.short_name(),
        part(type_id, context.database_type_name(kind, type_id)),
        part(data_id, context.database_data_name(kind, type_id, data_id)),
        part(item_id, context.database_item_name(kind, type_id, item_id)),
    )
}

impl TryFrom<i32> for VariableAddress {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<VariableAddress> for i32 {
    fn from(value: VariableAddress) -> Self {
        value.to_int()
    }
}

impl std::fmt::Display for VariableAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.to_int(), self.kind())
    }
}

/// Range checks on raw integers that do not construct an address.
pub trait VariableAddressExt {
    fn address_kind(&self) -> Option<AddressKind>;

    fn is_variable_address(&self) -> bool {
        self.address_kind().is_some()
    }
}

impl VariableAddressExt for i32 {
    fn address_kind(&self) -> Option<AddressKind> {
        // the table is sorted, so find the last range starting at or before the value
        let index = ADDRESS_TABLE.partition_point(|(lower, _, _)| lower <= self);
        let (_, upper, kind) = ADDRESS_TABLE.get(index.checked_sub(1)?)?;
        (self < upper).then_some(*kind)
    }
}

fn check(what: &'static str, value: i32, range: std::ops::RangeInclusive<i32>) -> Result<i32> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(Error::invalid(what, value))
    }
}

impl MapEventVariableAddress {
    pub fn from_parts(event_id: MapEventId, variable_index: i32) -> Result<Self> {
        let index = check("self variable index", variable_index, 0..=9)?;
        Self::new(Self::LOWER + event_id.get() * 10 + index)
    }

    #[must_use]
    pub fn event_id(self) -> i32 {
        self.offset() / 10
    }

    #[must_use]
    pub fn variable_index(self) -> i32 {
        self.0 % 10
    }
}

impl CommonEventVariableAddress {
    pub fn from_parts(common_event_id: CommonEventId, variable_index: i32) -> Result<Self> {
        let index = check("self variable index", variable_index, 0..=99)?;
        Self::new(Self::LOWER + common_event_id.get() * 100 + index)
    }

    #[must_use]
    pub fn common_event_id(self) -> i32 {
        self.offset() / 100
    }

    #[must_use]
    pub fn variable_index(self) -> i32 {
        self.0 % 100
    }
}

impl SpareNumberVariableAddress {
    pub fn from_parts(spare_number: i32, variable_index: i32) -> Result<Self> {
        let spare = check("spare variable number", spare_number, 1..=9)?;
        let index = check("spare variable index", variable_index, 0..=99_999)?;
        Self::new(NormalNumberVariableAddress::LOWER + spare * 100_000 + index)
    }

    /// 1 to 9.
    #[must_use]
    pub fn spare_number(self) -> i32 {
        (self.0 - NormalNumberVariableAddress::LOWER) / 100_000
    }

    #[must_use]
    pub fn variable_index(self) -> i32 {
        self.0 % 100_000
    }
}

impl RandomNumberAddress {
    /// Largest value the random number can take.
    #[must_use]
    pub fn max(self) -> i32 {
        self.offset()
    }
}

impl EventInfoAddress {
    pub fn from_parts(event_id: MapEventId, info: i32) -> Result<Self> {
        let info = check("event information", info, 0..=9)?;
        Self::new(Self::LOWER + event_id.get() * 10 + info)
    }

    #[must_use]
    pub fn event_id(self) -> i32 {
        self.offset() / 10
    }

    #[must_use]
    pub fn info(self) -> i32 {
        self.0 % 10
    }
}

impl MemberInfoAddress {
    /// `member_index` is zero-based.
    pub fn from_parts(member_index: i32, info: i32) -> Result<Self> {
        let member = check("party member", member_index, 0..=4)?;
        let info = check("member information", info, 0..=9)?;
        Self::new(Self::LOWER + member * 10 + info)
    }

    #[must_use]
    pub fn member_index(self) -> i32 {
        self.offset() / 10
    }

    #[must_use]
    pub fn info(self) -> i32 {
        self.0 % 10
    }
}

macro_rules! indexed_address {
    ($($name:ident => $accessor:ident),* $(,)?) => {
        $(
            impl $name {
                pub fn from_index(index: i32) -> Result<Self> {
                    let value = Self::LOWER
                        .checked_add(index)
                        .filter(|_| index >= 0)
                        .ok_or(Error::invalid(stringify!($accessor), index))?;
                    Self::new(value).map_err(|_| Error::invalid(stringify!($accessor), index))
                }

                #[must_use]
                pub fn $accessor(self) -> i32 {
                    self.offset()
                }
            }
        )*
    };
}

indexed_address! {
    ThisMapEventVariableAddress => variable_index,
    ThisCommonEventVariableAddress => variable_index,
    NormalNumberVariableAddress => variable_index,
    StringVariableAddress => variable_index,
    ThisEventInfoAddress => info,
    HeroInfoAddress => info,
    SystemVariableAddress => variable_index,
    SystemStringVariableAddress => variable_index,
}

/// The three components of a database cell address.
pub trait DatabaseCell {
    fn raw(&self) -> i32;

    fn type_id(&self) -> i32 {
        self.raw() / 1_000_000 % 100
    }

    fn data_id(&self) -> i32 {
        self.raw() / 100 % 10_000
    }

    fn item_id(&self) -> i32 {
        self.raw() % 100
    }
}

macro_rules! database_address {
    ($($name:ident),* $(,)?) => {
        $(
            impl $name {
                pub fn from_parts(type_id: DbTypeId, data_id: DbDataId, item_id: DbItemId) -> Result<Self> {
                    Self::new(
                        Self::LOWER + type_id.get() * 1_000_000 + data_id.get() * 100 + item_id.get(),
                    )
                }
            }

            impl DatabaseCell for $name {
                fn raw(&self) -> i32 {
                    self.0
                }
            }
        )*
    };
}

database_address!(
    UserDatabaseAddress,
    ChangeableDatabaseAddress,
    SystemDatabaseAddress
);

/// A raw command argument read as a variable address when it falls inside an address range
/// and as a literal number otherwise.
///
/// The raw integer is kept as is, so an operand always encodes back to the value it was read from.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct Operand(i32);

impl Operand {
    #[must_use]
    pub fn from_raw(value: i32) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn to_raw(self) -> i32 {
        self.0
    }

    #[must_use]
    pub fn address(self) -> Option<VariableAddress> {
        VariableAddress::new(self.0).ok()
    }

    #[must_use]
    pub fn is_address(self) -> bool {
        self.0.is_variable_address()
    }

    pub fn sentence(self, context: &dyn ProjectContext) -> String {
        match self.address() {
            Some(address) => address.sentence(context),
            None => self.0.to_string(),
        }
    }
}

impl From<VariableAddress> for Operand {
    fn from(value: VariableAddress) -> Self {
        Self(value.to_int())
    }
}

impl From<i32> for Operand {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::{NameTable, NoContext};
    use strum::IntoEnumIterator;

    fn kind_of(value: i32) -> Result<AddressKind> {
        VariableAddress::new(value).map(VariableAddress::kind)
    }

    #[test]
    fn range_boundaries() {
        assert!(kind_of(999_999).is_err());
        assert_eq!(kind_of(1_000_000).unwrap(), AddressKind::MapEventVariable);
        assert_eq!(kind_of(1_099_999).unwrap(), AddressKind::MapEventVariable);
        assert_eq!(kind_of(1_100_000).unwrap(), AddressKind::ThisMapEventVariable);
        assert!(kind_of(1_100_010).is_err());
        assert_eq!(kind_of(1_600_099).unwrap(), AddressKind::ThisCommonEventVariable);
        assert!(kind_of(1_600_100).is_err());
        assert!(kind_of(1_200_000_000).is_err());
        assert!(kind_of(i32::MIN).is_err());
        assert!(kind_of(i32::MAX).is_err());
    }

    #[test]
    fn table_is_sorted_and_disjoint() {
        for pair in ADDRESS_TABLE.windows(2) {
            let (_, upper, _) = pair[0];
            let (lower, _, _) = pair[1];
            assert!(upper <= lower, "{pair:?} overlap");
        }
        assert_eq!(ADDRESS_TABLE.len(), AddressKind::iter().count());
    }

    #[test]
    fn every_range_edge_maps_to_its_kind() {
        for kind in AddressKind::iter() {
            let range = kind.range();
            assert_eq!(kind_of(range.start).unwrap(), kind);
            assert_eq!(kind_of(range.end - 1).unwrap(), kind);
            assert_ne!(kind_of(range.end).ok(), Some(kind));
            assert_ne!(kind_of(range.start - 1).ok(), Some(kind));
        }
    }

    #[test]
    fn ext_agrees_with_factory() {
        for value in [0, 999_999, 1_000_000, 1_100_009, 1_100_010, 2_999_999, 9_180_059, 1_399_999_999] {
            assert_eq!(value.is_variable_address(), VariableAddress::new(value).is_ok());
        }
    }

    #[test]
    fn database_components() {
        let address = VariableAddress::new(1_112_345_678).unwrap();
        let VariableAddress::ChangeableDatabase(cell) = address else {
            panic!("wrong kind {address:?}");
        };
        assert_eq!(cell.type_id(), 12);
        assert_eq!(cell.data_id(), 3456);
        assert_eq!(cell.item_id(), 78);

        let rebuilt = ChangeableDatabaseAddress::from_parts(
            DbTypeId::new(12).unwrap(),
            DbDataId::new(3456).unwrap(),
            DbItemId::new(78).unwrap(),
        )
        .unwrap();
        assert_eq!(rebuilt, cell);
    }

    #[test]
    fn self_variable_components() {
        let a = MapEventVariableAddress::new(1_000_123).unwrap();
        assert_eq!((a.event_id(), a.variable_index()), (12, 3));

        let c = CommonEventVariableAddress::new(1_512_345).unwrap();
        assert_eq!((c.common_event_id(), c.variable_index()), (123, 45));

        let s = SpareNumberVariableAddress::new(2_312_345).unwrap();
        assert_eq!((s.spare_number(), s.variable_index()), (3, 12_345));

        let m = MemberInfoAddress::new(9_180_047).unwrap();
        assert_eq!((m.member_index(), m.info()), (3, 7));

        assert!(MapEventVariableAddress::from_parts(MapEventId::new(1).unwrap(), 10).is_err());
        assert!(NormalNumberVariableAddress::from_index(100_000).is_err());
        assert!(NormalNumberVariableAddress::from_index(-1).is_err());
        assert_eq!(
            NormalNumberVariableAddress::from_index(5).unwrap().to_int(),
            2_000_005
        );
    }

    #[test]
    fn ordering_follows_raw_value() {
        let mut addresses: Vec<_> = [1_300_000_000, 2_000_000, 1_000_000, 9_910_001]
            .into_iter()
            .map(|v| VariableAddress::new(v).unwrap())
            .collect();
        addresses.sort();
        let raw: Vec<_> = addresses.into_iter().map(i32::from).collect();
        assert_eq!(raw, [1_000_000, 2_000_000, 9_910_001, 1_300_000_000]);
    }

    #[test]
    fn operands() {
        assert_eq!(Operand::from_raw(42).address(), None);
        assert!(!Operand::from_raw(-7).is_address());
        let address = Operand::from_raw(2_000_001);
        assert!(matches!(address.address(), Some(VariableAddress::NormalNumberVariable(_))));
        assert_eq!(address.to_raw(), 2_000_001);
        assert_eq!(address.sentence(&NoContext), "Variable1");
        assert_eq!(Operand::from_raw(1_099_999_999).sentence(&NoContext), "UserDB[99:9999:99]");
    }

    #[test]
    fn sentences_fall_back_to_numbers() {
        let address = VariableAddress::new(1_001_020_304).unwrap();
        assert_eq!(address.sentence(&NoContext), "UserDB[1:203:4]");

        let mut names = NameTable::default();
        names.database_types.insert((DatabaseKind::User, 1), "Items".to_string());
        assert_eq!(address.sentence(&names), "UserDB[1(Items):203:4]");

        let variable = VariableAddress::new(2_000_010).unwrap();
        names.variables.insert(2_000_010, "Gold".to_string());
        assert_eq!(variable.sentence(&names), "Variable10[Gold]");
        assert_eq!(VariableAddress::new(8_000_006).unwrap().sentence(&NoContext), "Random(0~6)");
    }
}
