use crate::Position;
use std::str::Utf8Error;
use thiserror::Error;

/// The line could not be split into tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("Invalid line at byte {offset}: {1}", offset = .0.offset)]
    Invalid(Position, &'static str),
}

/// Failures that drop a whole row.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("Row is not valid UTF-8: {0}")]
    Utf8(#[from] Utf8Error),

    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
}

/// Failures raised when a consumer reads a field value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("conversion to {accessor} not supported for column '{column}'")]
    ConversionNotSupported {
        column: String,
        accessor: &'static str,
    },

    #[error("could not parse value '{value}' as '{target}' for column '{column}'")]
    InvalidValue {
        column: String,
        value: String,
        target: String,
    },

    #[error("value {value} exceeds range of '{target}' for column '{column}'")]
    OutOfRange {
        column: String,
        value: i64,
        target: String,
    },

    #[error("value of column '{column}' is null")]
    NullValue { column: String },
}

/// A column handle that the CSV decoder cannot serve.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColumnError {
    #[error("unexpected internal column '{0}'")]
    InternalColumn(String),

    #[error("unexpected data format '{format}' for column '{column}'")]
    UnexpectedDataFormat { column: String, format: String },

    #[error("unexpected format hint '{hint}' for column '{column}'")]
    UnexpectedFormatHint { column: String, hint: String },

    #[error("duplicate column '{0}'")]
    Duplicate(String),
}

pub type Result<T, E = FieldError> = std::result::Result<T, E>;
