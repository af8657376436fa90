// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use getset::{CopyGetters, Getters};
use log::debug;
use serde::Serialize;
use std::{iter::Peekable, str::Chars};


/// One row of the export. `None` marks a blank or malformed line, which the
/// header extractor and the segmenter treat as a boundary.
pub type Row = Option<Vec<Field>>;


/// A single token of a row. Keeps the token text and, if the trimmed text is
/// a plain finite decimal number, its numeric value.
#[derive(Clone, Debug, PartialEq, CopyGetters, Getters, Serialize)]
pub struct Field {
  #[getset(get = "pub")]
  text:   String,
  #[getset(get_copy = "pub")]
  number: Option<f64>,
}

impl Field {
  pub fn new(text: String) -> Self {
    let number = parse_number(&text);
    Self { text, number }
  }

  pub fn is_number(&self) -> bool {
    self.number.is_some()
  }
}

impl From<&str> for Field {
  fn from(text: &str) -> Self {
    Self::new(text.to_string())
  }
}


/// Coerces `text` to a number if it is one. `inf`, `NaN` and anything else
/// that would not survive a round trip as a finite decimal stays text.
fn parse_number(text: &str) -> Option<f64> {
  let text = text.trim();
  if text.is_empty()
     || !text.chars()
             .all(|c| c.is_ascii_digit() || "+-.eE".contains(c))
  {
    return None;
  }
  text.parse::<f64>().ok().filter(|number| number.is_finite())
}


/// Splits the whole document into rows. Lines which can't be tokenized end
/// up as `None` rows, same as blank lines; they never abort ingestion.
pub fn parse(text: &str) -> Vec<Row> {
  text.split('\n')
      .enumerate()
      .map(|(idx, line)| match parse_line(line) {
        Some(tokens) if !tokens.is_empty() => {
          Some(tokens.into_iter().map(Field::new).collect())
        }
        Some(_) => None,
        None => {
          debug!("line {} is not well formed, treating it as blank", idx + 1);
          None
        }
      })
      .collect()
}


/// Tokenizes a single line.
///
/// Fields are comma separated and may be quoted with `'` or `"`. Within
/// quotes, commas are literal and the quote character can be escaped with a
/// backslash. Unquoted fields are trimmed, may contain inner whitespace but no
/// quotes or backslashes. A trailing comma adds one empty field.
///
/// # Returns
/// - `Some(tokens)` for a well formed line, empty for a blank line
/// - `None` if the line is not well formed
pub fn parse_line(line: &str) -> Option<Vec<String>> {
  if line.trim().is_empty() {
    return Some(Vec::new());
  }

  let mut tokens = Vec::new();
  let mut chars = line.chars().peekable();
  loop {
    skip_whitespace(&mut chars);
    let token = match chars.peek() {
      Some(&quote) if quote == '\'' || quote == '"' => {
        chars.next();
        quoted(&mut chars, quote)?
      }
      _ => unquoted(&mut chars)?,
    };
    tokens.push(token);

    skip_whitespace(&mut chars);
    match chars.next() {
      None => break,
      Some(',') => {
        skip_whitespace(&mut chars);
        if chars.peek().is_none() {
          tokens.push(String::new());
          break;
        }
      }
      Some(_) => return None,
    }
  }

  Some(tokens)
}

fn skip_whitespace(chars: &mut Peekable<Chars>) {
  while chars.peek().map_or(false, |c| c.is_whitespace()) {
    chars.next();
  }
}

/// Reads up to the closing `quote`; the opening one is already consumed.
fn quoted(chars: &mut Peekable<Chars>, quote: char) -> Option<String> {
  let mut token = String::new();
  loop {
    match chars.next()? {
      '\\' => {
        let escaped = chars.next()?;
        if escaped != quote {
          token.push('\\');
        }
        token.push(escaped);
      }
      c if c == quote => return Some(token),
      c => token.push(c),
    }
  }
}

/// Reads up to the next comma or the end of the line.
fn unquoted(chars: &mut Peekable<Chars>) -> Option<String> {
  let mut token = String::new();
  while let Some(&c) = chars.peek() {
    match c {
      ',' => break,
      '\'' | '"' | '\\' => return None,
      _ => {
        token.push(c);
        chars.next();
      }
    }
  }
  Some(token.trim_end().to_string())
}
