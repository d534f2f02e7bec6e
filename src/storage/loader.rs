use std::{
    fs::File,
    io::{self, BufReader},
    path::Path,
};

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::{
    domain::{BuildError, Hierarchy, LoadMode},
    storage::{ParseError, read_records},
};

/// Errors that can occur when loading a hierarchy from a file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input could not be opened or read.
    #[error("failed to read employee records")]
    Io(#[from] io::Error),
    /// The input was read but is not a valid record set.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The records do not form a single rooted tree.
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Loads and validates a hierarchy from the file at `path`.
///
/// With [`LoadMode::Lenient`], an input that cannot be opened or read is
/// logged and treated as an empty organisation. Invalid data is an error in
/// either mode.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read (strict mode only),
/// [`LoadError::Parse`] for the first malformed or non-UTF-8 line, and
/// [`LoadError::Build`] if the records are not a valid hierarchy.
#[instrument(level = "debug")]
pub fn load(path: &Path, mode: LoadMode) -> Result<Hierarchy, LoadError> {
    let read = File::open(path).map(BufReader::new).and_then(read_records);

    let records = match read {
        Ok(parsed) => parsed?,
        Err(error) if mode == LoadMode::Lenient => {
            warn!(
                path = %path.display(),
                %error,
                "employee records unreadable; continuing with an empty organisation"
            );
            return Ok(Hierarchy::default());
        }
        Err(error) => return Err(error.into()),
    };

    info!(records = records.len(), path = %path.display(), "read employee records");
    Ok(Hierarchy::build(records)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_input(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const VALID: &str = "\
Id,firstName,lastName,salary,managerId
123,Joe,Doe,60000,
124,Martin,Chekov,45000,123
125,Bob,Ronstad,47000,123
300,Alice,Hasacat,50000,124
305,Brett,Hardleaf,34000,300
";

    #[test]
    fn loads_valid_file() {
        let file = write_input(VALID);
        let hierarchy = load(file.path(), LoadMode::Strict).unwrap();

        assert_eq!(hierarchy.len(), 5);
        assert_eq!(hierarchy.root().unwrap().first_name(), "Joe");
    }

    #[test]
    fn missing_file_fails_in_strict_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.csv");

        let err = load(&missing, LoadMode::Strict).unwrap_err();
        match err {
            LoadError::Io(io_error) => assert_eq!(io_error.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_empty_in_lenient_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.csv");

        let hierarchy = load(&missing, LoadMode::Lenient).unwrap();
        assert!(hierarchy.is_empty());
        assert!(hierarchy.root().is_none());
    }

    #[test]
    fn invalid_data_fails_even_in_lenient_mode() {
        let file = write_input("Id,firstName,lastName,salary,managerId\n1,Joe,Doe,-1\n");

        let err = load(file.path(), LoadMode::Lenient).unwrap_err();
        assert!(matches!(err, LoadError::Parse(ParseError::Record { .. })));
    }

    #[test]
    fn non_utf8_data_fails_even_in_lenient_mode() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Id,firstName,lastName,salary,managerId\n1,J\xffoe,Doe,100,\n")
            .unwrap();

        let err = load(file.path(), LoadMode::Lenient).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Parse(ParseError::InvalidEncoding { line_number: 2 })
        ));
    }

    #[test]
    fn structural_errors_surface_as_build_errors() {
        let file = write_input(&format!("{VALID}900,Second,Root,1000,\n"));

        let err = load(file.path(), LoadMode::Strict).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Build(BuildError::MultipleRoots { .. })
        ));
    }

    #[test]
    fn empty_file_has_no_header() {
        let file = write_input("");

        let err = load(file.path(), LoadMode::Strict).unwrap_err();
        assert!(matches!(err, LoadError::Parse(ParseError::MissingHeader)));
    }

    #[test]
    fn header_only_file_has_no_root() {
        let file = write_input("Id,firstName,lastName,salary,managerId\n");

        let err = load(file.path(), LoadMode::Strict).unwrap_err();
        assert!(matches!(err, LoadError::Build(BuildError::MissingRoot)));
    }
}
