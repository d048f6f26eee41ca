//! The decoding interface every row format implements.
//!
//! A [`RowDecoder`] turns one raw record into a [`DecodedRow`]: one lazy
//! [`FieldValueProvider`] per configured column. Providers convert their
//! raw value only when read, so a bad value in a column nobody reads never
//! costs anything.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use crate::column::{Accessor, ColumnHandle, ColumnType};
use crate::errors::{FieldError, Result};

/// Column handle to field value, for every configured column.
pub type DecodedRow = HashMap<Arc<ColumnHandle>, Box<dyn FieldValueProvider>>;

/// A materialized field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Boolean(bool),
    Long(i64),
    Double(f64),
    Text(String),
}

/// Lazy access to one field of a decoded row.
///
/// The typed getters fail with [`FieldError::ConversionNotSupported`] unless
/// a format overrides them.
pub trait FieldValueProvider: Send + Sync {
    /// The column this value belongs to.
    fn column(&self) -> &ColumnHandle;

    fn is_null(&self) -> bool;

    fn get_boolean(&self) -> Result<bool> {
        Err(conversion_not_supported(self.column(), Accessor::Boolean))
    }

    fn get_long(&self) -> Result<i64> {
        Err(conversion_not_supported(self.column(), Accessor::Long))
    }

    fn get_double(&self) -> Result<f64> {
        Err(conversion_not_supported(self.column(), Accessor::Double))
    }

    fn get_slice(&self) -> Result<Cow<'_, str>> {
        Err(conversion_not_supported(self.column(), Accessor::Slice))
    }

    /// Read the value through the accessor matching the declared type.
    ///
    /// Returns `Ok(None)` for null.
    fn value(&self) -> Result<Option<FieldValue>> {
        if self.is_null() {
            return Ok(None);
        }
        let value = match self.column().column_type {
            ColumnType::Boolean => FieldValue::Boolean(self.get_boolean()?),
            ColumnType::TinyInt
            | ColumnType::SmallInt
            | ColumnType::Integer
            | ColumnType::BigInt => FieldValue::Long(self.get_long()?),
            ColumnType::Double => FieldValue::Double(self.get_double()?),
            ColumnType::Varchar(_) => FieldValue::Text(self.get_slice()?.into_owned()),
        };
        Ok(Some(value))
    }
}

pub(crate) fn conversion_not_supported(column: &ColumnHandle, accessor: Accessor) -> FieldError {
    FieldError::ConversionNotSupported {
        column: column.name.clone(),
        accessor: accessor.name(),
    }
}

/// A field with no value at all.
#[derive(Debug, Clone)]
pub struct NullProvider {
    column: Arc<ColumnHandle>,
}

impl NullProvider {
    pub fn new(column: Arc<ColumnHandle>) -> Self {
        Self { column }
    }

    fn null_value(&self) -> FieldError {
        FieldError::NullValue {
            column: self.column.name.clone(),
        }
    }
}

impl FieldValueProvider for NullProvider {
    fn column(&self) -> &ColumnHandle {
        &self.column
    }

    fn is_null(&self) -> bool {
        true
    }

    fn get_boolean(&self) -> Result<bool> {
        Err(self.null_value())
    }

    fn get_long(&self) -> Result<i64> {
        Err(self.null_value())
    }

    fn get_double(&self) -> Result<f64> {
        Err(self.null_value())
    }

    fn get_slice(&self) -> Result<Cow<'_, str>> {
        Err(self.null_value())
    }
}

/// Decodes one raw record into field value providers.
///
/// Implementations are built once per stream and shared by every worker
/// decoding it.
pub trait RowDecoder: Send + Sync {
    /// Decode `data` into one provider per configured column.
    ///
    /// Returns `None` when the record is malformed and was dropped.
    fn decode_row(&self, data: &[u8]) -> Option<DecodedRow>;

    /// Name of the format this decoder handles (e.g. `"csv"`).
    fn format_name(&self) -> &str;
}
