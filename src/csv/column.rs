use std::borrow::Cow;
use std::sync::Arc;

use super::tokenizer::Tokens;
use crate::column::{Accessor, ColumnHandle, ColumnType};
use crate::decoder::{conversion_not_supported, FieldValueProvider, NullProvider};
use crate::errors::{ColumnError, FieldError, Result};

/// Which empty fields read as null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyFieldPolicy {
    /// Every empty field is null, quoted or not.
    #[default]
    Null,
    /// A bare empty field is null; `""` is an empty string.
    UnquotedNull,
    /// Empty fields are empty strings, never null.
    Empty,
}

impl EmptyFieldPolicy {
    fn is_null(self, token: &str, quoted: bool) -> bool {
        token.is_empty()
            && match self {
                EmptyFieldPolicy::Null => true,
                EmptyFieldPolicy::UnquotedNull => !quoted,
                EmptyFieldPolicy::Empty => false,
            }
    }
}

/// Reads one configured column out of a tokenized row.
#[derive(Debug, Clone)]
pub struct CsvColumnDecoder {
    column: Arc<ColumnHandle>,
    empty_fields: EmptyFieldPolicy,
}

impl CsvColumnDecoder {
    pub fn new(
        column: Arc<ColumnHandle>,
        empty_fields: EmptyFieldPolicy,
    ) -> Result<Self, ColumnError> {
        if column.internal {
            return Err(ColumnError::InternalColumn(column.name.clone()));
        }
        if let Some(format) = &column.data_format {
            return Err(ColumnError::UnexpectedDataFormat {
                column: column.name.clone(),
                format: format.clone(),
            });
        }
        if let Some(hint) = &column.format_hint {
            return Err(ColumnError::UnexpectedFormatHint {
                column: column.name.clone(),
                hint: hint.clone(),
            });
        }
        Ok(Self {
            column,
            empty_fields,
        })
    }

    pub fn column(&self) -> &Arc<ColumnHandle> {
        &self.column
    }

    /// Bind this column to its token in `tokens`.
    ///
    /// A row too short to reach the column yields a null provider. Nothing
    /// is converted until the provider is read.
    pub fn decode_field(&self, tokens: &Arc<Tokens>) -> Box<dyn FieldValueProvider> {
        let index = self.column.ordinal;
        if index >= tokens.len() {
            return Box::new(NullProvider::new(Arc::clone(&self.column)));
        }
        Box::new(CsvFieldValue {
            column: Arc::clone(&self.column),
            tokens: Arc::clone(tokens),
            index,
            empty_fields: self.empty_fields,
        })
    }
}

/// One raw CSV token, converted on read.
#[derive(Debug, Clone)]
pub struct CsvFieldValue {
    column: Arc<ColumnHandle>,
    tokens: Arc<Tokens>,
    index: usize,
    empty_fields: EmptyFieldPolicy,
}

impl CsvFieldValue {
    fn raw(&self) -> &str {
        self.tokens.get(self.index).unwrap_or_default()
    }

    /// The raw token, if `accessor` is valid for the column and the value
    /// is not null.
    fn token_for(&self, accessor: Accessor) -> Result<&str> {
        if !self.column.column_type.accessors().contains(accessor) {
            return Err(conversion_not_supported(&self.column, accessor));
        }
        if self.is_null() {
            return Err(FieldError::NullValue {
                column: self.column.name.clone(),
            });
        }
        Ok(self.raw())
    }

    fn invalid(&self, value: &str) -> FieldError {
        FieldError::InvalidValue {
            column: self.column.name.clone(),
            value: value.to_string(),
            target: self.column.column_type.to_string(),
        }
    }
}

impl FieldValueProvider for CsvFieldValue {
    fn column(&self) -> &ColumnHandle {
        &self.column
    }

    fn is_null(&self) -> bool {
        self.empty_fields
            .is_null(self.raw(), self.tokens.is_quoted(self.index))
    }

    fn get_boolean(&self) -> Result<bool> {
        let value = self.token_for(Accessor::Boolean)?.trim();
        if value.eq_ignore_ascii_case("true") || value == "1" {
            Ok(true)
        } else if value.eq_ignore_ascii_case("false") || value == "0" {
            Ok(false)
        } else {
            Err(self.invalid(value))
        }
    }

    fn get_long(&self) -> Result<i64> {
        let value = self.token_for(Accessor::Long)?.trim();
        let parsed: i64 = value.parse().map_err(|_| self.invalid(value))?;
        if !self.column.column_type.holds(parsed) {
            return Err(FieldError::OutOfRange {
                column: self.column.name.clone(),
                value: parsed,
                target: self.column.column_type.to_string(),
            });
        }
        Ok(parsed)
    }

    fn get_double(&self) -> Result<f64> {
        let value = self.token_for(Accessor::Double)?.trim();
        value.parse().map_err(|_| self.invalid(value))
    }

    fn get_slice(&self) -> Result<Cow<'_, str>> {
        let value = self.token_for(Accessor::Slice)?;
        if let ColumnType::Varchar(Some(max_chars)) = self.column.column_type {
            if let Some((cut, _)) = value.char_indices().nth(max_chars as usize) {
                return Ok(Cow::Borrowed(&value[..cut]));
            }
        }
        Ok(Cow::Borrowed(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::tokenizer::tokenize;
    use crate::decoder::FieldValue;

    fn decoder(column_type: ColumnType, ordinal: usize) -> CsvColumnDecoder {
        let column = ColumnHandle::new("col", column_type, ordinal);
        CsvColumnDecoder::new(Arc::new(column), EmptyFieldPolicy::default()).unwrap()
    }

    fn tokens(line: &str) -> Arc<Tokens> {
        Arc::new(tokenize(line).unwrap())
    }

    #[test]
    fn test_reads_token_at_ordinal() {
        let field = decoder(ColumnType::Varchar(None), 1).decode_field(&tokens("a,b,c"));
        assert!(!field.is_null());
        assert_eq!(field.get_slice().unwrap(), "b");
    }

    #[test]
    fn test_short_row_is_null() {
        let field = decoder(ColumnType::BigInt, 2).decode_field(&tokens("x"));
        assert!(field.is_null());
        assert_eq!(field.value(), Ok(None));
    }

    #[test]
    fn test_integers() {
        let field = decoder(ColumnType::Integer, 0).decode_field(&tokens(" -42 "));
        assert_eq!(field.get_long(), Ok(-42));

        let field = decoder(ColumnType::TinyInt, 0).decode_field(&tokens("300"));
        assert_eq!(
            field.get_long(),
            Err(FieldError::OutOfRange {
                column: "col".into(),
                value: 300,
                target: "tinyint".into(),
            })
        );
    }

    #[test]
    fn test_conversion_deferred_until_read() {
        let field = decoder(ColumnType::BigInt, 0).decode_field(&tokens("abc"));
        assert!(!field.is_null());
        assert_eq!(
            field.get_long(),
            Err(FieldError::InvalidValue {
                column: "col".into(),
                value: "abc".into(),
                target: "bigint".into(),
            })
        );
    }

    #[test]
    fn test_booleans() {
        let decoder = decoder(ColumnType::Boolean, 0);
        for (line, expected) in [("true", true), ("FALSE", false), ("1", true), (" 0", false)] {
            assert_eq!(decoder.decode_field(&tokens(line)).get_boolean(), Ok(expected));
        }
        assert!(matches!(
            decoder.decode_field(&tokens("yes")).get_boolean(),
            Err(FieldError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_doubles() {
        let field = decoder(ColumnType::Double, 0).decode_field(&tokens("2.5e1"));
        assert_eq!(field.value(), Ok(Some(FieldValue::Double(25.0))));
        let field = decoder(ColumnType::Double, 0).decode_field(&tokens("two"));
        assert!(field.get_double().is_err());
    }

    #[test]
    fn test_bounded_varchar_truncates() {
        let field = decoder(ColumnType::Varchar(Some(3)), 0).decode_field(&tokens("héllo"));
        assert_eq!(field.get_slice().unwrap(), "hél");
        let field = decoder(ColumnType::Varchar(Some(10)), 0).decode_field(&tokens("short"));
        assert_eq!(field.get_slice().unwrap(), "short");
    }

    #[test]
    fn test_accessor_must_match_type() {
        let field = decoder(ColumnType::Varchar(None), 0).decode_field(&tokens("12"));
        assert_eq!(
            field.get_long(),
            Err(FieldError::ConversionNotSupported {
                column: "col".into(),
                accessor: "long",
            })
        );
    }

    #[test]
    fn test_empty_field_policy() {
        let row = tokens("\"\",");
        let column = Arc::new(ColumnHandle::new("col", ColumnType::Varchar(None), 0));
        let bare = Arc::new(ColumnHandle::new("bare", ColumnType::Varchar(None), 1));
        let check = |policy, quoted_null, bare_null| {
            let quoted_field = CsvColumnDecoder::new(column.clone(), policy).unwrap();
            let bare_field = CsvColumnDecoder::new(bare.clone(), policy).unwrap();
            assert_eq!(quoted_field.decode_field(&row).is_null(), quoted_null);
            assert_eq!(bare_field.decode_field(&row).is_null(), bare_null);
        };
        check(EmptyFieldPolicy::Null, true, true);
        check(EmptyFieldPolicy::UnquotedNull, false, true);
        check(EmptyFieldPolicy::Empty, false, false);
    }

    #[test]
    fn test_null_field_reads_fail() {
        let field = decoder(ColumnType::Integer, 0).decode_field(&tokens(",x"));
        assert!(field.is_null());
        assert!(matches!(field.get_long(), Err(FieldError::NullValue { .. })));
    }

    #[test]
    fn test_rejects_unsupported_handles() {
        let internal = ColumnHandle::new("_key", ColumnType::Varchar(None), 0).internal();
        assert_eq!(
            CsvColumnDecoder::new(Arc::new(internal), EmptyFieldPolicy::Null).unwrap_err(),
            ColumnError::InternalColumn("_key".into())
        );

        let formatted = ColumnHandle::new("ts", ColumnType::BigInt, 0).with_data_format("iso8601");
        assert!(matches!(
            CsvColumnDecoder::new(Arc::new(formatted), EmptyFieldPolicy::Null),
            Err(ColumnError::UnexpectedDataFormat { .. })
        ));

        let hinted = ColumnHandle::new("ts", ColumnType::BigInt, 0).with_format_hint("yyyy");
        assert!(matches!(
            CsvColumnDecoder::new(Arc::new(hinted), EmptyFieldPolicy::Null),
            Err(ColumnError::UnexpectedFormatHint { .. })
        ));
    }
}
