//! Comma-delimited upload parsing

use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

use super::normalizer::RawRow;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("No columns to parse from file")]
    MissingHeader,

    #[error("File is not valid UTF-8 text (invalid byte at offset {0})")]
    Encoding(usize),

    #[error("Expected {expected} fields in line {line}, saw {found}")]
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{0}")]
    Csv(#[from] csv::Error),
}

/// Header labels plus the data rows of one upload
#[derive(Debug, Clone, Default)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<StringRecord>,
}

impl ParsedTable {
    pub fn raw_rows(&self) -> impl Iterator<Item = RawRow<'_>> {
        self.rows
            .iter()
            .map(move |cells| RawRow::new(&self.headers, cells))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A line holding nothing but whitespace
fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0).is_some_and(|cell| cell.trim().is_empty())
}

/// Parse an upload body with a header row
///
/// Rows shorter than the header are kept; rows longer than it are an error.
pub fn parse_csv(bytes: &[u8]) -> Result<ParsedTable, ParseError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let text = std::str::from_utf8(bytes).map_err(|e| ParseError::Encoding(e.valid_up_to()))?;
    if text.trim().is_empty() {
        return Err(ParseError::MissingHeader);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ParseError::MissingHeader);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        if record.len() > headers.len() {
            return Err(ParseError::TooManyFields {
                line: record.position().map_or(0, |p| p.line()),
                expected: headers.len(),
                found: record.len(),
            });
        }
        rows.push(record);
    }

    Ok(ParsedTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_are_trimmed() {
        let table = parse_csv(b" Equipment Name , Type ,Flowrate\nP1,Pump,1.0\n").unwrap();
        assert_eq!(table.headers, vec!["Equipment Name", "Type", "Flowrate"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let table = parse_csv(b"Equipment Name,Type\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers.len(), 2);
    }

    #[test]
    fn test_empty_body_is_missing_header() {
        assert!(matches!(parse_csv(b""), Err(ParseError::MissingHeader)));
        assert!(matches!(parse_csv(b"  \n\n"), Err(ParseError::MissingHeader)));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let table = parse_csv(b"Equipment Name,Type\nP1,Pump\n\n   \nP2,Valve\n").unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_short_rows_are_accepted() {
        let table = parse_csv(b"Equipment Name,Type,Flowrate\nP1\n").unwrap();
        assert_eq!(table.rows[0].len(), 1);
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let err = parse_csv(b"Equipment Name,Type\nP1,Pump,extra\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::TooManyFields {
                line: 2,
                expected: 2,
                found: 3
            }
        ));
        assert_eq!(err.to_string(), "Expected 2 fields in line 2, saw 3");
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let err = parse_csv(b"Equipment Name\n\xff\xfe\n").unwrap_err();
        assert!(matches!(err, ParseError::Encoding(15)));
    }

    #[test]
    fn test_bom_is_stripped() {
        let table = parse_csv(b"\xEF\xBB\xBFEquipment Name\nP1\n").unwrap();
        assert_eq!(table.headers, vec!["Equipment Name"]);
    }

    #[test]
    fn test_quoted_fields() {
        let table = parse_csv(b"Equipment Name,Type\n\"Pump, north\",Pump\n").unwrap();
        let row = table.raw_rows().next().unwrap();
        assert_eq!(row.get("Equipment Name"), Some("Pump, north"));
    }
}
