pub mod column;
pub mod csv;
pub mod decoder;
pub mod errors;

pub use column::{ColumnHandle, ColumnType};
pub use decoder::{DecodedRow, FieldValue, FieldValueProvider, RowDecoder};

/// Byte offset of a problem within the decoded line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
}
