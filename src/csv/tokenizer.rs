use crate::errors::TokenizeError;
use crate::Position;
use bitvec::prelude::*;
use itertools::Itertools;
use std::fmt;

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// The fields of one line, with quoting resolved.
///
/// All field text lives in one buffer; `ends` marks where each field stops
/// and `quoted` records which fields were enclosed in quotes.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Tokens {
    text: String,
    ends: Vec<usize>,
    quoted: BitVec,
}

impl Tokens {
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// The field at `index`, or `None` past the end of the row.
    pub fn get(&self, index: usize) -> Option<&str> {
        let end = *self.ends.get(index)?;
        let start = match index {
            0 => 0,
            _ => self.ends[index - 1],
        };
        Some(&self.text[start..end])
    }

    /// Whether the field at `index` was written in quotes.
    pub fn is_quoted(&self, index: usize) -> bool {
        self.quoted.get(index).map_or(false, |bit| *bit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index))
    }

    fn finish_field(&mut self, quoted: bool) {
        self.ends.push(self.text.len());
        self.quoted.push(quoted);
    }
}

impl fmt::Debug for Tokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.iter().map(|token| format!("{token:?}")).join(", "))
    }
}

fn invalid(offset: usize, reason: &'static str) -> TokenizeError {
    TokenizeError::Invalid(Position { offset }, reason)
}

/// Split one line of CSV into its fields.
///
/// A field may be enclosed in double quotes, in which case it can contain
/// commas and doubled quotes (`""` is a literal `"`). Blanks before an
/// opening quote are dropped, and a quote in the middle of an unquoted
/// field is kept as text. A single trailing `\n` or `\r\n` is ignored;
/// any other line break is an error.
pub fn tokenize(line: &str) -> Result<Tokens, TokenizeError> {
    let line = match line.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => line,
    };
    let mut tokens = Tokens {
        text: String::with_capacity(line.len()),
        ends: Vec::new(),
        quoted: BitVec::new(),
    };
    let mut chars = line.char_indices().peekable();
    let mut field_begin = 0;
    let mut field_quoted = false;
    let mut within_quotes = false;
    let mut after_close = false;

    while let Some((offset, ch)) = chars.next() {
        match ch {
            '\n' | '\r' => {
                return Err(invalid(offset, "Line break inside a record."));
            }
            QUOTE if within_quotes => {
                if chars.peek().map(|&(_, next)| next) == Some(QUOTE) {
                    // `""` inside quotes stands for one quote
                    tokens.text.push(QUOTE);
                    chars.next();
                } else {
                    within_quotes = false;
                    after_close = true;
                }
            }
            _ if within_quotes => tokens.text.push(ch),
            DELIMITER => {
                tokens.finish_field(field_quoted);
                field_begin = tokens.text.len();
                field_quoted = false;
                after_close = false;
            }
            _ if after_close => {
                return Err(invalid(offset, "Text after the closing quote of a field."));
            }
            QUOTE if tokens.text[field_begin..].trim().is_empty() => {
                // Leading blanks before an opening quote are not part of the field.
                tokens.text.truncate(field_begin);
                within_quotes = true;
                field_quoted = true;
            }
            _ => tokens.text.push(ch),
        }
    }
    if within_quotes {
        return Err(invalid(line.len(), "Unterminated quoted field."));
    }
    tokens.finish_field(field_quoted);

    Ok(tokens)
}
