//! Reading employee records from delimited text.
//!
//! The input is a header line followed by one employee per line, shaped
//! `id,firstName,lastName,salary[,managerId]`. Parsing is pure and stops at
//! the first bad line; [`load`] adds the file handling around it.

mod loader;
mod records;

pub use loader::{LoadError, load};
pub use records::{ParseError, parse_record, parse_records, read_records};
