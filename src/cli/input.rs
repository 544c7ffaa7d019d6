//! Scalar input: pure validation plus a line-based prompter that retries.

use std::{
    io::{BufRead, ErrorKind, Write},
    ops::RangeInclusive,
};

use crate::{DatabaseError, common::error::InputError};

/// Parses an integer and, when a range is given, checks it lies inside.
pub fn parse_integer(raw: &str, range: Option<&RangeInclusive<i64>>) -> Result<i64, InputError> {
    let trimmed = raw.trim();
    let value = trimmed
        .parse::<i64>()
        .map_err(|_| InputError::NotAnInteger(trimmed.to_string()))?;

    match range {
        Some(range) if !range.contains(&value) => Err(InputError::OutOfRange {
            value,
            min: *range.start(),
            max: *range.end(),
        }),
        _ => Ok(value),
    }
}

pub fn parse_real(raw: &str) -> Result<f64, InputError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| InputError::NotANumber(trimmed.to_string()))
}

/// Strips the line ending and cuts the text to at most `max_chars` characters.
pub fn parse_text(raw: &str, max_chars: Option<usize>) -> String {
    let line = raw.trim_end_matches(['\r', '\n']);
    match max_chars {
        Some(max) => line.chars().take(max).collect(),
        None => line.to_string(),
    }
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// The input side of the interactive session.
///
/// Every method blocks until it can return a value that passed validation.
/// Errors only signal that no more input can be read.
pub trait Prompter {
    fn read_integer(
        &mut self,
        prompt: &str,
        range: Option<RangeInclusive<i64>>,
    ) -> Result<i64, DatabaseError>;

    fn read_real(&mut self, prompt: &str) -> Result<f64, DatabaseError>;

    fn read_text(&mut self, prompt: &str, max_chars: Option<usize>) -> Result<String, DatabaseError>;
}

/// Reads answers line by line, writing prompts and rejections to `out`.
pub struct LineInput<R, W> {
    reader: R,
    out: W,
    buf: String,
}

impl<R: BufRead, W: Write> LineInput<R, W> {
    pub fn new(reader: R, out: W) -> Self {
        Self {
            reader,
            out,
            buf: String::new(),
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<&str, DatabaseError> {
        write!(self.out, "{prompt} > ")?;
        self.out.flush()?;

        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            return Err(std::io::Error::new(ErrorKind::UnexpectedEof, "input closed").into());
        }
        Ok(&self.buf)
    }

    fn reject(&mut self, err: &InputError) -> Result<(), DatabaseError> {
        tracing::debug!(%err, "rejected input");
        writeln!(self.out, "{err}")?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Prompter for LineInput<R, W> {
    fn read_integer(
        &mut self,
        prompt: &str,
        range: Option<RangeInclusive<i64>>,
    ) -> Result<i64, DatabaseError> {
        loop {
            let line = self.read_line(prompt)?;
            match parse_integer(line, range.as_ref()) {
                Ok(value) => return Ok(value),
                Err(err) => self.reject(&err)?,
            }
        }
    }

    fn read_real(&mut self, prompt: &str) -> Result<f64, DatabaseError> {
        loop {
            let line = self.read_line(prompt)?;
            match parse_real(line) {
                Ok(value) => return Ok(value),
                Err(err) => self.reject(&err)?,
            }
        }
    }

    fn read_text(&mut self, prompt: &str, max_chars: Option<usize>) -> Result<String, DatabaseError> {
        let line = self.read_line(prompt)?;
        Ok(parse_text(line, max_chars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer(" 42\n", None), Ok(42));
        assert_eq!(parse_integer("-3", None), Ok(-3));
        assert_eq!(
            parse_integer("abc", None),
            Err(InputError::NotAnInteger("abc".to_string()))
        );
    }

    #[test]
    fn test_parse_integer_range() {
        let years = 1970..=2024;
        assert_eq!(parse_integer("1970", Some(&years)), Ok(1970));
        assert_eq!(parse_integer("2024", Some(&years)), Ok(2024));
        assert_eq!(
            parse_integer("1969", Some(&years)),
            Err(InputError::OutOfRange {
                value: 1969,
                min: 1970,
                max: 2024
            })
        );
    }

    #[test]
    fn test_parse_text_truncates() {
        assert_eq!(parse_text("Volkswagen Golf\n", Some(9)), "Volkswage");
        assert_eq!(parse_text("Ka\r\n", Some(9)), "Ka");
        assert_eq!(parse_text("  spaced  \n", None), "  spaced  ");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("hatchBACK"), "Hatchback");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_read_integer_retries_until_valid() {
        let mut out = Vec::new();
        let mut input = LineInput::new(Cursor::new("x\n99\n3\n"), &mut out);
        assert_eq!(input.read_integer("Choose option", Some(0..=5)).unwrap(), 3);

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Error - Input x is not an integer"));
        assert!(printed.contains("Error, number must be between 0 and 5"));
    }

    #[test]
    fn test_read_fails_when_input_closed() {
        let mut input = LineInput::new(Cursor::new("oops\n"), std::io::sink());
        let err = input.read_integer("Choose option", None).unwrap_err();
        assert!(matches!(err, DatabaseError::Io(ref e) if e.kind() == ErrorKind::UnexpectedEof));
    }
}
