use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::error::{Error, ParseError, ParseErrorKind};
use crate::model::{Entry, EnvMap, to_map};

/// Parse dotenv text into a map of decoded values.
///
/// Lines that are not assignments are skipped, so this only fails on
/// structural scanner errors.
pub fn parse(input: &str) -> Result<EnvMap, Error> {
    parse_str(input).map(to_map)
}

/// Parse dotenv entries from UTF-8 text.
pub fn parse_str(input: &str) -> Result<Vec<Entry>, Error> {
    parse_str_with_source(input, None).map_err(Error::from)
}

/// Parse dotenv entries from UTF-8 bytes.
pub fn parse_bytes(input: &[u8]) -> Result<Vec<Entry>, Error> {
    let text = std::str::from_utf8(input)?;
    parse_str(text)
}

/// Parse dotenv entries from a buffered reader.
pub fn parse_reader<R: BufRead>(mut reader: R) -> Result<Vec<Entry>, Error> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    parse_bytes(&buf)
}

/// One recognized assignment. Offsets are absolute within the document.
struct Statement<'a> {
    key: &'a str,
    raw_value: &'a str,
    /// Index of the `\n` (or end of input) terminating the statement.
    end: usize,
}

pub(crate) fn parse_str_with_source(
    input: &str,
    source: Option<&Path>,
) -> Result<Vec<Entry>, ParseError> {
    let bytes = input.as_bytes();

    let mut entries = Vec::new();
    let mut by_key = HashMap::<String, usize>::new();

    let mut offset = 0usize;
    let mut line_num = 1u32;

    while offset < bytes.len() {
        let line_end = find_line_end(bytes, offset);
        let statement_end = match scan_statement(input, offset, line_end) {
            Some(statement) => {
                let entry = Entry {
                    key: statement.key.to_owned(),
                    value: decode_value(statement.raw_value),
                    source: source.map(Path::to_path_buf),
                    line: line_num,
                };

                if let Some(existing_idx) = by_key.get(&entry.key).copied() {
                    entries[existing_idx] = entry;
                } else {
                    by_key.insert(entry.key.clone(), entries.len());
                    entries.push(entry);
                }

                statement.end
            }
            None => line_end,
        };

        let mut next = statement_end;
        if next < bytes.len() && bytes[next] == b'\n' {
            next += 1;
        }
        if next <= offset {
            return Err(ParseError::new(line_num, 1, ParseErrorKind::Stalled));
        }

        line_num += count_newlines(&bytes[offset..next]);
        offset = next;
    }

    Ok(entries)
}

fn scan_statement(input: &str, start: usize, line_end: usize) -> Option<Statement<'_>> {
    let bytes = input.as_bytes();
    let cursor = skip_blanks(bytes, start, line_end);

    // `export` is only a prefix when what follows is itself an assignment;
    // otherwise it is an ordinary key.
    if let Some(after_export) = strip_export(bytes, cursor, line_end)
        && let Some(statement) = scan_assignment(input, after_export, line_end)
    {
        return Some(statement);
    }

    scan_assignment(input, cursor, line_end)
}

fn strip_export(bytes: &[u8], cursor: usize, line_end: usize) -> Option<usize> {
    let after = cursor + "export".len();
    if after < line_end && bytes[cursor..].starts_with(b"export") && is_blank(bytes[after]) {
        Some(skip_blanks(bytes, after, line_end))
    } else {
        None
    }
}

fn scan_assignment(input: &str, key_start: usize, line_end: usize) -> Option<Statement<'_>> {
    let bytes = input.as_bytes();

    let mut key_end = key_start;
    while key_end < line_end && is_key_byte(bytes[key_end]) {
        key_end += 1;
    }
    if key_end == key_start {
        return None;
    }

    let value_start = scan_separator(bytes, key_end, line_end)?;
    let (raw_value, end) = scan_value(input, value_start, line_end)?;

    Some(Statement {
        key: &input[key_start..key_end],
        raw_value,
        end,
    })
}

/// Returns the offset just past `KEY =` or `KEY: `.
fn scan_separator(bytes: &[u8], key_end: usize, line_end: usize) -> Option<usize> {
    let eq_idx = skip_blanks(bytes, key_end, line_end);
    if eq_idx < line_end && bytes[eq_idx] == b'=' {
        return Some(eq_idx + 1);
    }

    if key_end + 1 < line_end && bytes[key_end] == b':' && is_blank(bytes[key_end + 1]) {
        return Some(key_end + 2);
    }

    None
}

fn scan_value(input: &str, value_start: usize, line_end: usize) -> Option<(&str, usize)> {
    let bytes = input.as_bytes();

    let run_start = skip_blanks(bytes, value_start, line_end);
    if run_start < line_end
        && is_quote(bytes[run_start])
        && let Some(close_idx) = find_closing_quote(bytes, run_start)
    {
        let end = find_line_end(bytes, close_idx + 1);
        return Some((&input[run_start..=close_idx], end));
    }

    let run_end = bytes[run_start..line_end]
        .iter()
        .position(|byte| *byte == b'#' || *byte == b'\r')
        .map_or(line_end, |idx| run_start + idx);
    if !is_trailer(&bytes[run_end..line_end]) {
        return None;
    }

    Some((&input[run_start..run_end], line_end))
}

/// Locate the delimiter closing the quoted span opened at `open_idx`.
///
/// The span may cross newlines. The first unescaped quote is preferred; if
/// the rest of its line is not blank or a comment, escaped quotes (`\'`)
/// seen before it are tried as the delimiter, latest first.
fn find_closing_quote(bytes: &[u8], open_idx: usize) -> Option<usize> {
    let quote = bytes[open_idx];
    let mut escaped = Vec::new();
    let mut closing = None;

    let mut idx = open_idx + 1;
    while idx < bytes.len() {
        let byte = bytes[idx];
        if byte == b'\\' && bytes.get(idx + 1) == Some(&quote) {
            escaped.push(idx + 1);
            idx += 2;
            continue;
        }
        if byte == quote {
            closing = Some(idx);
            break;
        }
        idx += 1;
    }

    closing
        .into_iter()
        .chain(escaped.into_iter().rev())
        .find(|&close_idx| {
            let line_end = find_line_end(bytes, close_idx + 1);
            is_trailer(&bytes[close_idx + 1..line_end])
        })
}

fn decode_value(raw: &str) -> String {
    let value = raw.trim();
    let Some(first) = value.chars().next() else {
        return String::new();
    };

    let unwrapped = if is_quote_char(first) && value.len() >= 2 && value.ends_with(first) {
        &value[1..value.len() - 1]
    } else {
        value
    };

    if first == '"' {
        unwrapped.replace("\\n", "\n").replace("\\r", "\r")
    } else {
        unwrapped.to_owned()
    }
}

/// Whitespace followed by an optional `#` comment.
fn is_trailer(tail: &[u8]) -> bool {
    match tail.iter().find(|byte| !is_blank(**byte)) {
        None => true,
        Some(byte) => *byte == b'#',
    }
}

fn find_line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|byte| *byte == b'\n')
        .map_or(bytes.len(), |idx| from + idx)
}

fn skip_blanks(bytes: &[u8], mut idx: usize, line_end: usize) -> usize {
    while idx < line_end && is_blank(bytes[idx]) {
        idx += 1;
    }
    idx
}

fn count_newlines(bytes: &[u8]) -> u32 {
    bytes.iter().filter(|byte| **byte == b'\n').count() as u32
}

fn is_blank(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\x0c')
}

fn is_quote(byte: u8) -> bool {
    matches!(byte, b'\'' | b'"' | b'`')
}

fn is_quote_char(ch: char) -> bool {
    matches!(ch, '\'' | '"' | '`')
}

fn is_key_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'.' || byte == b'-'
}
