//! Line cursor shared by the manifest readers.

use winnow::ascii::{digit1, line_ending, till_line_ending};
use winnow::combinator::{opt, terminated};
use winnow::error::ContextError;
use winnow::prelude::*;

use crate::error::{Error, Result};

fn next_line<'s>(input: &mut &'s str) -> PResult<&'s str> {
    terminated(till_line_ending, opt(line_ending)).parse_next(input)
}

/// Reads a manifest one line at a time, tracking the line number for error reports
pub(crate) struct Lines<'s> {
    input: &'s str,
    line: usize,
}

impl<'s> Lines<'s> {
    pub fn new(input: &'s str) -> Self {
        Self { input, line: 0 }
    }

    /// The next line without its terminator, or an empty string past the end of the input
    fn next_raw(&mut self) -> &'s str {
        self.line += 1;
        if self.input.is_empty() {
            return "";
        }
        next_line(&mut self.input).unwrap_or_default()
    }

    /// Read a line that must be exactly `expected`
    pub fn header(&mut self, expected: &'static str) -> Result<()> {
        let found = self.next_raw();
        if found != expected {
            return Err(Error::HeaderMismatch {
                line: self.line,
                expected,
                found: found.to_owned(),
            });
        }
        Ok(())
    }

    /// Read a non-empty value
    pub fn field(&mut self, field: &'static str) -> Result<&'s str> {
        let value = self.next_raw().trim();
        if value.is_empty() {
            return Err(Error::EmptyField {
                line: self.line,
                field,
            });
        }
        Ok(value)
    }

    /// Read an unsigned decimal number
    pub fn number(&mut self, field: &'static str) -> Result<u32> {
        let value = self.next_raw().trim();
        digit1::<_, ContextError>
            .parse_to::<u32>()
            .parse(value)
            .map_err(|_| Error::MalformedField {
                line: self.line,
                field,
                found: value.to_owned(),
            })
    }
}
