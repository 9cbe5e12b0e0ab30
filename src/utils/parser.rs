//! Core parsing primitives for delimited text.
//!
//! Splits comma-separated content into records while tracking the physical
//! line each record starts on, so loaders can point at the offending row.
//! Supports double-quoted fields (with `""` as an escaped quote, embedded
//! commas and embedded newlines). Blank lines are ignored.

/// One parsed row and the 1-based line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Problem found while tokenizing, with the line it was detected on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub problem: String,
}

/// Split `content` into comma-separated records.
pub fn split_records(content: &str) -> Result<Vec<Record>, ParseError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted_field = false;
    let mut line = 1usize;
    let mut record_line = 1usize;

    let mut chars = content.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push('\n');
                }
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' if field.trim().is_empty() && !quoted_field => {
                field.clear();
                in_quotes = true;
                quoted_field = true;
            }
            '"' => {
                return Err(ParseError {
                    line,
                    problem: "bare \" in non-quoted field".to_string(),
                });
            }
            ',' => {
                fields.push(std::mem::take(&mut field));
                quoted_field = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                push_record(&mut records, record_line, std::mem::take(&mut fields));
                quoted_field = false;
                line += 1;
                record_line = line;
            }
            _ if quoted_field && !ch.is_whitespace() => {
                return Err(ParseError {
                    line,
                    problem: "extraneous text after quoted field".to_string(),
                });
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(ParseError {
            line: record_line,
            problem: "unterminated quoted field".to_string(),
        });
    }

    if !field.is_empty() || !fields.is_empty() || quoted_field {
        fields.push(field);
        push_record(&mut records, record_line, fields);
    }

    Ok(records)
}

fn push_record(records: &mut Vec<Record>, line: usize, fields: Vec<String>) {
    let blank = fields.len() == 1 && fields[0].trim().is_empty();
    if !blank {
        records.push(Record { line, fields });
    }
}
