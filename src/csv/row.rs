use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use itertools::Itertools;
use tracing::debug;

use super::column::{CsvColumnDecoder, EmptyFieldPolicy};
use super::tokenizer::{tokenize, Tokens};
use crate::column::ColumnHandle;
use crate::decoder::{DecodedRow, RowDecoder};
use crate::errors::{ColumnError, RowError};

/// Options for [`CsvRowDecoder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CsvRowDecoderConfig {
    /// Which empty fields read as null. Default: all of them.
    pub empty_fields: EmptyFieldPolicy,
}

/// Decodes one CSV line per record.
///
/// Built once for a fixed set of columns; the column table is read-only
/// afterwards, so one decoder can be shared by any number of threads.
/// Rows that are not valid UTF-8 or not well-formed CSV are dropped and
/// counted rather than reported as errors.
#[derive(Debug)]
pub struct CsvRowDecoder {
    columns: Vec<CsvColumnDecoder>,
    dropped_rows: AtomicU64,
}

impl CsvRowDecoder {
    pub const NAME: &'static str = "csv";

    pub fn new<I>(columns: I) -> Result<Self, ColumnError>
    where
        I: IntoIterator<Item = ColumnHandle>,
    {
        Self::with_config(columns, CsvRowDecoderConfig::default())
    }

    pub fn with_config<I>(columns: I, config: CsvRowDecoderConfig) -> Result<Self, ColumnError>
    where
        I: IntoIterator<Item = ColumnHandle>,
    {
        let columns = columns
            .into_iter()
            .map(|column| CsvColumnDecoder::new(Arc::new(column), config.empty_fields))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(duplicate) = columns.iter().map(CsvColumnDecoder::column).duplicates().next() {
            return Err(ColumnError::Duplicate(duplicate.name.clone()));
        }
        debug!(columns = columns.len(), "created CSV row decoder");

        Ok(Self {
            columns,
            dropped_rows: AtomicU64::new(0),
        })
    }

    /// The configured columns, in construction order.
    pub fn columns(&self) -> impl Iterator<Item = &Arc<ColumnHandle>> + '_ {
        self.columns.iter().map(CsvColumnDecoder::column)
    }

    /// Number of rows dropped as malformed so far.
    pub fn dropped_rows(&self) -> u64 {
        self.dropped_rows.load(Ordering::Relaxed)
    }

    fn tokenize_row(data: &[u8]) -> Result<Tokens, RowError> {
        let line = std::str::from_utf8(data)?;
        Ok(tokenize(line)?)
    }
}

impl RowDecoder for CsvRowDecoder {
    fn decode_row(&self, data: &[u8]) -> Option<DecodedRow> {
        let tokens = match Self::tokenize_row(data) {
            Ok(tokens) => Arc::new(tokens),
            Err(error) => {
                self.dropped_rows.fetch_add(1, Ordering::Relaxed);
                debug!(%error, bytes = data.len(), "dropping malformed CSV row");
                return None;
            }
        };

        Some(
            self.columns
                .iter()
                .map(|decoder| (Arc::clone(decoder.column()), decoder.decode_field(&tokens)))
                .collect(),
        )
    }

    fn format_name(&self) -> &str {
        Self::NAME
    }
}
