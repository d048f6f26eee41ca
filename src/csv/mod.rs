//! Decode records that hold a single line of comma-separated values.
//!
//! Decoding is split in three steps. [`tokenize`] turns the line into
//! fields, honouring double-quoted fields and doubled quotes. A
//! [`CsvColumnDecoder`] per configured column picks its field by ordinal
//! and wraps it in a lazily converting provider. [`CsvRowDecoder`] drives
//! both and drops any record that is not valid UTF-8 or not well-formed.
mod column;
mod row;
mod tokenizer;

pub use column::{CsvColumnDecoder, CsvFieldValue, EmptyFieldPolicy};
pub use row::{CsvRowDecoder, CsvRowDecoderConfig};
pub use tokenizer::{tokenize, Tokens};
