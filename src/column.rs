//! Column descriptors shared by every row format.

use enumset::{enum_set, EnumSet, EnumSetType};
use std::fmt;

/// The typed reads a field value provider offers.
#[derive(EnumSetType, Debug)]
pub enum Accessor {
    Boolean,
    Long,
    Double,
    Slice,
}

impl Accessor {
    pub fn name(self) -> &'static str {
        match self {
            Accessor::Boolean => "boolean",
            Accessor::Long => "long",
            Accessor::Double => "double",
            Accessor::Slice => "slice",
        }
    }
}

/// Declared type of an output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Double,
    /// Text, optionally bounded to a number of characters.
    Varchar(Option<u32>),
}

impl ColumnType {
    /// Accessors a consumer may use to read a column of this type.
    pub fn accessors(self) -> EnumSet<Accessor> {
        match self {
            ColumnType::Boolean => enum_set!(Accessor::Boolean),
            ColumnType::TinyInt
            | ColumnType::SmallInt
            | ColumnType::Integer
            | ColumnType::BigInt => enum_set!(Accessor::Long),
            ColumnType::Double => enum_set!(Accessor::Double),
            ColumnType::Varchar(_) => enum_set!(Accessor::Slice),
        }
    }

    /// Whether `value` fits in this type. Always false for non-integral types.
    pub fn holds(self, value: i64) -> bool {
        match self {
            ColumnType::TinyInt => i8::try_from(value).is_ok(),
            ColumnType::SmallInt => i16::try_from(value).is_ok(),
            ColumnType::Integer => i32::try_from(value).is_ok(),
            ColumnType::BigInt => true,
            _ => false,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Boolean => f.write_str("boolean"),
            ColumnType::TinyInt => f.write_str("tinyint"),
            ColumnType::SmallInt => f.write_str("smallint"),
            ColumnType::Integer => f.write_str("integer"),
            ColumnType::BigInt => f.write_str("bigint"),
            ColumnType::Double => f.write_str("double"),
            ColumnType::Varchar(None) => f.write_str("varchar"),
            ColumnType::Varchar(Some(len)) => write!(f, "varchar({len})"),
        }
    }
}

/// Immutable identity of one output column.
///
/// `ordinal` is the index of the token the column reads. `data_format` and
/// `format_hint` are format specific; the CSV decoder accepts neither.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnHandle {
    pub name: String,
    pub column_type: ColumnType,
    pub ordinal: usize,
    pub data_format: Option<String>,
    pub format_hint: Option<String>,
    pub internal: bool,
}

impl ColumnHandle {
    pub fn new(name: impl Into<String>, column_type: ColumnType, ordinal: usize) -> Self {
        Self {
            name: name.into(),
            column_type,
            ordinal,
            data_format: None,
            format_hint: None,
            internal: false,
        }
    }

    pub fn with_data_format(mut self, format: impl Into<String>) -> Self {
        self.data_format = Some(format.into());
        self
    }

    pub fn with_format_hint(mut self, hint: impl Into<String>) -> Self {
        self.format_hint = Some(hint.into());
        self
    }

    /// Mark the column as produced by the connector rather than the payload.
    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }
}
