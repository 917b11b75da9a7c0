//! Workout-log CSV parser.
//!
//! Tokenizes an export into a [`Header`] and typed [`Row`]s. Fields may be
//! wrapped in double quotes to carry commas; `""` inside a quoted field is a
//! literal quote. Quoted fields cannot span lines.
//!
//! Only an empty file or an unusable header aborts parsing. A data line that
//! does not split into exactly one field per column is skipped and reported
//! as an [`ImportWarning`].

use crate::workouts::types::{Header, ImportError, ImportWarning, Row};

const BOM: char = '\u{feff}';

/// Output of [`parse_csv`].
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub header: Header,
    pub rows: Vec<Row>,
    /// Non-empty data lines seen, including skipped ones
    pub total_rows: usize,
    /// One entry per skipped line
    pub warnings: Vec<ImportWarning>,
}

impl ParsedFile {
    /// Lines that did not make it into `rows`.
    pub fn skipped_rows(&self) -> usize {
        self.total_rows - self.rows.len()
    }
}

/// Parse an export from text content.
pub fn parse_csv(content: &str) -> Result<ParsedFile, ImportError> {
    let content = content.strip_prefix(BOM).unwrap_or(content);

    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header_line) = lines.next().ok_or(ImportError::EmptyFile)?;
    let header = parse_header(header_line)?;

    let mut rows = Vec::new();
    let mut warnings = Vec::new();
    let mut total_rows = 0;

    for (line_number, line) in lines {
        total_rows += 1;

        let Some(fields) = split_fields(line) else {
            tracing::warn!("Skipping line {}: unterminated quoted field", line_number);
            warnings.push(ImportWarning::MalformedQuotes { line: line_number });
            continue;
        };

        if fields.len() != header.len() {
            tracing::warn!(
                "Skipping line {}: expected {} fields, found {}",
                line_number,
                header.len(),
                fields.len()
            );
            warnings.push(ImportWarning::FieldCountMismatch {
                line: line_number,
                expected: header.len(),
                found: fields.len(),
            });
            continue;
        }

        rows.push(Row::from_fields(&header, fields, line_number));
    }

    tracing::debug!(
        "Parsed {} of {} data rows ({} columns)",
        rows.len(),
        total_rows,
        header.len()
    );

    Ok(ParsedFile {
        header,
        rows,
        total_rows,
        warnings,
    })
}

/// Parse and validate the header line.
fn parse_header(line: &str) -> Result<Header, ImportError> {
    let fields = split_fields(line)
        .ok_or_else(|| ImportError::InvalidHeader("unterminated quoted field".to_string()))?;

    let columns: Vec<String> = fields.iter().map(|f| f.trim().to_string()).collect();

    for (i, column) in columns.iter().enumerate() {
        if !column.is_empty() && columns[..i].contains(column) {
            return Err(ImportError::InvalidHeader(format!(
                "duplicate column '{}'",
                column
            )));
        }
    }

    let header = Header::new(columns);
    let missing = header.missing_required();
    if !missing.is_empty() {
        return Err(ImportError::MissingRequiredColumns(missing));
    }

    Ok(header)
}

/// Split one physical line into fields. Returns `None` if a quote is left open.
pub fn split_fields(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            ',' => fields.push(std::mem::take(&mut field)),
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return None;
    }

    fields.push(field);
    Some(fields)
}
