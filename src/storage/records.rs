use std::{
    io::{self, BufRead},
    str::FromStr,
};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{FlatRecord, RecordError};

const ID_INDEX: usize = 0;
const FIRST_NAME_INDEX: usize = 1;
const LAST_NAME_INDEX: usize = 2;
const SALARY_INDEX: usize = 3;
const MANAGER_ID_INDEX: usize = 4;
const MIN_FIELDS: usize = 4;
const MAX_FIELDS: usize = 5;

/// Errors that can occur when parsing employee records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The input does not even contain a header line.
    #[error("input is empty; expected a header line")]
    MissingHeader,
    /// A line is not valid UTF-8 text.
    #[error("line {line_number}: not valid UTF-8")]
    InvalidEncoding {
        /// 1-based line number, counting the header as line 1.
        line_number: usize,
    },
    /// A data line could not be turned into a record.
    #[error("line {line_number}: {source} in '{line}'")]
    Record {
        /// 1-based line number, counting the header as line 1.
        line_number: usize,
        /// The offending line.
        line: String,
        /// What was wrong with it.
        #[source]
        source: RecordError,
    },
}

impl ParseError {
    /// The record-level error, if this error concerns a single line.
    #[must_use]
    pub const fn record_error(&self) -> Option<&RecordError> {
        match self {
            Self::MissingHeader | Self::InvalidEncoding { .. } => None,
            Self::Record { source, .. } => Some(source),
        }
    }
}

/// Parses one data line into a record.
///
/// Fields are separated by commas and surrounding whitespace is ignored. The
/// manager id is the fifth field, when present and not empty.
///
/// # Errors
///
/// Returns [`ParseError::Record`] wrapping [`RecordError::MalformedRecord`]
/// for a line without 4 or 5 fields or with an empty id or name, and
/// [`RecordError::InvalidSalary`] for a salary that is not a decimal number
/// greater than zero.
pub fn parse_record(line_number: usize, line: &str) -> Result<FlatRecord, ParseError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let wrap = |source| ParseError::Record {
        line_number,
        line: line.to_string(),
        source,
    };

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if !(MIN_FIELDS..=MAX_FIELDS).contains(&fields.len()) {
        return Err(wrap(RecordError::malformed(format!(
            "expected {MIN_FIELDS} or {MAX_FIELDS} fields, found {}",
            fields.len()
        ))));
    }

    let salary = parse_salary(fields[SALARY_INDEX]).map_err(wrap)?;
    let manager_id = fields
        .get(MANAGER_ID_INDEX)
        .copied()
        .filter(|id| !id.is_empty());

    FlatRecord::new(
        fields[ID_INDEX],
        fields[FIRST_NAME_INDEX],
        fields[LAST_NAME_INDEX],
        salary,
        manager_id,
    )
    .map_err(wrap)
}

fn parse_salary(field: &str) -> Result<Decimal, RecordError> {
    let invalid = || RecordError::InvalidSalary {
        value: field.to_string(),
        reason: "not a decimal number",
    };

    // `Decimal` tolerates `_` digit separators; plain decimals do not.
    if field.contains('_') {
        return Err(invalid());
    }
    Decimal::from_str(field).map_err(|_| invalid())
}

/// Parses a header line followed by data lines.
///
/// The header is discarded without inspection and blank lines are skipped.
/// Parsing stops at the first bad line.
///
/// # Errors
///
/// Returns [`ParseError::MissingHeader`] if there are no lines at all,
/// otherwise the error for the first line that fails [`parse_record`].
pub fn parse_records<I, S>(lines: I) -> Result<Vec<FlatRecord>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lines = lines.into_iter();
    if lines.next().is_none() {
        return Err(ParseError::MissingHeader);
    }

    lines
        .enumerate()
        .filter(|(_, line)| !line.as_ref().trim().is_empty())
        // The header is line 1.
        .map(|(i, line)| parse_record(i + 2, line.as_ref()))
        .collect()
}

/// Reads and parses every line from `reader`.
///
/// A line that is not UTF-8 is bad data rather than a read failure, and is
/// reported as [`ParseError::InvalidEncoding`].
///
/// # Errors
///
/// Returns the outer [`io::Error`] if reading fails, and the inner
/// [`ParseError`] if the text is not a valid record set.
pub fn read_records<R: BufRead>(reader: R) -> io::Result<Result<Vec<FlatRecord>, ParseError>> {
    let mut lines = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        match line {
            Ok(line) => lines.push(line),
            Err(error) if error.kind() == io::ErrorKind::InvalidData => {
                return Ok(Err(ParseError::InvalidEncoding { line_number: i + 1 }));
            }
            Err(error) => return Err(error),
        }
    }
    Ok(parse_records(lines))
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    const SAMPLE: &str = "\
Id,firstName,lastName,salary,managerId
123,Joe,Doe,60000,
124,Martin,Chekov,45000,123
125,Bob,Ronstad,47000,123
300,Alice,Hasacat,50000,124
305,Brett,Hardleaf,34000,300
";

    #[test]
    fn parses_sample_file() {
        let records = parse_records(SAMPLE.lines()).unwrap();

        assert_eq!(records.len(), 5);
        assert_eq!(records[0].id().as_str(), "123");
        assert!(records[0].is_root());
        assert_eq!(records[4].first_name(), "Brett");
        assert_eq!(records[4].salary(), dec("34000"));
        assert_eq!(records[4].manager_id().unwrap().as_str(), "300");
    }

    #[test_case("1,Joe,Doe,100"; "four fields")]
    #[test_case("1,Joe,Doe,100,"; "empty manager")]
    #[test_case(" 1 , Joe , Doe , 100 ,  "; "padded")]
    #[test_case("1,Joe,Doe,100\r"; "carriage return")]
    fn root_record_variants(line: &str) {
        let record = parse_record(2, line).unwrap();
        assert_eq!(record.id().as_str(), "1");
        assert_eq!(record.first_name(), "Joe");
        assert_eq!(record.salary(), dec("100"));
        assert!(record.is_root());
    }

    #[test]
    fn decimal_salary_is_kept_exactly() {
        let record = parse_record(2, "7,Ann,Lee,1234.565,1").unwrap();
        assert_eq!(record.salary().to_string(), "1234.565");
    }

    #[test_case("1,Joe,Doe"; "too few")]
    #[test_case("101,Dulcinea,Greenwald,8998,107,89989"; "too many")]
    #[test_case(""; "empty line")]
    fn wrong_field_count_is_malformed(line: &str) {
        let err = parse_record(3, line).unwrap_err();
        assert!(matches!(
            err.record_error(),
            Some(RecordError::MalformedRecord { .. })
        ));
        assert!(err.to_string().starts_with("line 3:"));
        assert!(err.to_string().contains(line));
    }

    #[test_case(",Joe,Doe,100,1"; "empty id")]
    #[test_case("2,,Doe,100,1"; "empty first name")]
    #[test_case("2,Joe,,100,1"; "empty last name")]
    fn empty_field_is_malformed(line: &str) {
        let err = parse_record(2, line).unwrap_err();
        assert!(matches!(
            err.record_error(),
            Some(RecordError::MalformedRecord { .. })
        ));
    }

    #[test_case("2,Joe,Doe,abc,1", "not a decimal number"; "unparsable")]
    #[test_case("2,Joe,Doe,,1", "not a decimal number"; "missing")]
    #[test_case("2,Joe,Doe,0,1", "greater than zero"; "zero")]
    #[test_case("2,Joe,Doe,-5,1", "greater than zero"; "negative")]
    #[test_case("2,Joe,Doe,1_000,1", "not a decimal number"; "digit separator")]
    fn bad_salary_is_invalid(line: &str, reason: &str) {
        let err = parse_record(2, line).unwrap_err();
        assert!(matches!(
            err.record_error(),
            Some(RecordError::InvalidSalary { .. })
        ));
        assert!(err.to_string().contains(reason), "{err}");
    }

    #[test]
    fn first_bad_line_is_reported() {
        let input = "header\n1,Joe,Doe,100\n2,Ann,Lee,x,1\n3,,Lee,100,1\n";
        let err = parse_records(input.lines()).unwrap_err();

        match err {
            ParseError::Record {
                line_number, line, ..
            } => {
                assert_eq!(line_number, 3);
                assert_eq!(line, "2,Ann,Lee,x,1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_lines_are_skipped_but_counted() {
        let input = "header\n1,Joe,Doe,100\n\n   \n2,Ann,Lee,0,1\n";
        let err = parse_records(input.lines()).unwrap_err();
        assert!(matches!(err, ParseError::Record { line_number: 5, .. }));
    }

    #[test]
    fn header_only_gives_no_records() {
        let records = parse_records(["Id,firstName,lastName,salary,managerId"]).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn no_lines_at_all_is_missing_header() {
        let lines: [&str; 0] = [];
        assert_eq!(parse_records(lines), Err(ParseError::MissingHeader));
    }

    #[test]
    fn non_utf8_line_is_a_parse_error() {
        let input: &[u8] = b"Id,firstName,lastName,salary,managerId\n1,J\xffoe,Doe,100,\n";
        assert_eq!(
            read_records(input).unwrap(),
            Err(ParseError::InvalidEncoding { line_number: 2 })
        );
    }

    #[test]
    fn reads_from_buffered_reader() {
        let records = read_records(SAMPLE.as_bytes()).unwrap().unwrap();
        assert_eq!(records.len(), 5);
    }
}
