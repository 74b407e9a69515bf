use super::{Challenge, Library, Shipment, Solution};
use std::collections::HashSet;
use thiserror::Error;

/// Malformed input or submission text. Line numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: unexpected end of input")]
    MissingLine { line: usize },
    #[error("line {line}: '{token}' is not a valid non-negative integer")]
    InvalidToken { line: usize, token: String },
    #[error("line {line}: expected {expected} values, found {found}")]
    WrongTokenCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: book {book} is out of range (the instance has {num_books} books)")]
    BookOutOfRange {
        line: usize,
        book: usize,
        num_books: usize,
    },
    #[error("line {line}: book {book} is listed more than once")]
    DuplicateBook { line: usize, book: usize },
    #[error("line {line}: unexpected trailing input")]
    TrailingInput { line: usize },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::MissingLine { line }
            | ParseError::InvalidToken { line, .. }
            | ParseError::WrongTokenCount { line, .. }
            | ParseError::BookOutOfRange { line, .. }
            | ParseError::DuplicateBook { line, .. }
            | ParseError::TrailingInput { line } => *line,
        }
    }
}

struct LineReader<'a> {
    lines: Vec<&'a str>,
    cursor: usize,
}

impl<'a> LineReader<'a> {
    fn new(text: &'a str) -> Self {
        let mut lines: Vec<&str> = text.lines().collect();
        while lines.last().map_or(false, |l| l.trim().is_empty()) {
            lines.pop();
        }
        Self { lines, cursor: 0 }
    }

    /// Reads the next line as exactly `expected` integers. Returns the 1-based
    /// line number alongside the values. A line that should hold no values may
    /// be missing at the end of the input.
    fn numbers(&mut self, expected: usize) -> Result<(usize, Vec<u64>), ParseError> {
        let line = self.cursor + 1;
        let text = match self.lines.get(self.cursor) {
            Some(text) => *text,
            None if expected == 0 => {
                self.cursor += 1;
                return Ok((line, Vec::new()));
            }
            None => return Err(ParseError::MissingLine { line }),
        };
        self.cursor += 1;

        let values = text
            .split_whitespace()
            .map(|token| {
                token.parse::<u64>().map_err(|_| ParseError::InvalidToken {
                    line,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if values.len() != expected {
            return Err(ParseError::WrongTokenCount {
                line,
                expected,
                found: values.len(),
            });
        }
        Ok((line, values))
    }

    /// Lines not read yet.
    fn remaining(&self) -> usize {
        self.lines.len().saturating_sub(self.cursor)
    }

    fn finish(&self) -> Result<(), ParseError> {
        match self.lines.get(self.cursor..) {
            Some(rest) if !rest.is_empty() => Err(ParseError::TrailingInput {
                line: self.cursor + 1,
            }),
            _ => Ok(()),
        }
    }
}

fn to_u32(line: usize, value: u64) -> Result<u32, ParseError> {
    u32::try_from(value).map_err(|_| ParseError::InvalidToken {
        line,
        token: value.to_string(),
    })
}

fn to_usize(line: usize, value: u64) -> Result<usize, ParseError> {
    usize::try_from(value).map_err(|_| ParseError::InvalidToken {
        line,
        token: value.to_string(),
    })
}

pub(super) fn parse_challenge(text: &str) -> Result<Challenge, ParseError> {
    let mut reader = LineReader::new(text);

    let (line, header) = reader.numbers(3)?;
    let num_books = to_usize(line, header[0])?;
    let num_libraries = to_usize(line, header[1])?;
    let num_days = to_u32(line, header[2])?;

    let (line, raw_scores) = reader.numbers(num_books)?;
    let scores = raw_scores
        .into_iter()
        .map(|s| to_u32(line, s))
        .collect::<Result<Vec<_>, _>>()?;

    let mut libraries = Vec::with_capacity(num_libraries.min(reader.remaining() / 2));
    for id in 0..num_libraries {
        let (line, library_header) = reader.numbers(3)?;
        let num_held = to_usize(line, library_header[0])?;
        let signup_time = to_u32(line, library_header[1])?;
        let ship_capacity = to_u32(line, library_header[2])?;

        let (line, raw_books) = reader.numbers(num_held)?;
        let books = parse_books(line, raw_books, Some(num_books))?;
        libraries.push(Library {
            id,
            books,
            signup_time,
            ship_capacity,
        });
    }
    reader.finish()?;

    Ok(Challenge {
        num_books,
        num_days,
        scores,
        libraries,
    })
}

fn parse_books(
    line: usize,
    raw_books: Vec<u64>,
    num_books: Option<usize>,
) -> Result<Vec<usize>, ParseError> {
    let mut seen = HashSet::with_capacity(raw_books.len());
    let mut books = Vec::with_capacity(raw_books.len());
    for raw in raw_books {
        let book = to_usize(line, raw)?;
        if let Some(num_books) = num_books {
            if book >= num_books {
                return Err(ParseError::BookOutOfRange {
                    line,
                    book,
                    num_books,
                });
            }
        }
        if !seen.insert(book) {
            return Err(ParseError::DuplicateBook { line, book });
        }
        books.push(book);
    }
    Ok(books)
}

/// Parses the submission format. Library ids and book ranges are checked
/// later against the instance by `Challenge::verify_solution`.
pub(super) fn parse_submission(text: &str) -> Result<Solution, ParseError> {
    let mut reader = LineReader::new(text);

    let (line, header) = reader.numbers(1)?;
    let num_shipments = to_usize(line, header[0])?;

    let mut shipments = Vec::with_capacity(num_shipments.min(reader.remaining() / 2));
    for _ in 0..num_shipments {
        let (line, shipment_header) = reader.numbers(2)?;
        let library = to_usize(line, shipment_header[0])?;
        let num_shipped = to_usize(line, shipment_header[1])?;

        let (line, raw_books) = reader.numbers(num_shipped)?;
        let books = parse_books(line, raw_books, None)?;
        shipments.push(Shipment { library, books });
    }
    reader.finish()?;

    Ok(Solution { shipments })
}
