//! Delimited input: a header row followed by one tweet per row.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::AppError;

/// Reads raw rows from a CSV source.
///
/// The header row is skipped and rows may carry any number of fields;
/// arity is checked when a row is parsed.
pub struct RecordSource<R: Read> {
    reader: csv::Reader<R>,
}

impl RecordSource<File> {
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let reader = Self::builder().from_path(path)?;
        Ok(Self { reader })
    }
}

impl<R: Read> RecordSource<R> {
    pub fn from_reader(input: R) -> Self {
        Self {
            reader: Self::builder().from_reader(input),
        }
    }

    fn builder() -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder.has_headers(true).flexible(true);
        builder
    }

    /// Fails with [`AppError::EmptyInput`] when there is no header row.
    pub fn require_header(&mut self) -> Result<(), AppError> {
        if self.reader.headers()?.is_empty() {
            return Err(AppError::EmptyInput);
        }
        Ok(())
    }

    /// Rows in file order, each with its 1-based line number.
    pub fn rows(&mut self) -> impl Iterator<Item = Result<(StringRecord, u64), AppError>> + '_ {
        self.reader.records().map(|row| {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            Ok((row, line))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_header_and_tolerates_arity() {
        let input = "\
tweet_id,user_id,hashtags,urls,mentions,timestamp,lang
100,7,\"['a', 'b']\",['u1'],[],1609459200,en
101,7,['a'],['u1'],7,1609459201
";
        let mut source = RecordSource::from_reader(input.as_bytes());
        let rows: Vec<_> = source.rows().collect::<Result<_, _>>().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0].0[2], "['a', 'b']");
        assert_eq!(rows[0].0.len(), 7);
        assert_eq!(rows[1].0.len(), 6);
        assert_eq!(rows[0].1, 2);
        assert_eq!(rows[1].1, 3);
    }

    #[test]
    fn test_zero_byte_input_has_no_header() {
        let mut source = RecordSource::from_reader("".as_bytes());
        assert!(matches!(source.require_header(), Err(AppError::EmptyInput)));
    }

    #[test]
    fn test_header_only_input_is_accepted() {
        let mut source = RecordSource::from_reader("tweet_id,user_id\n".as_bytes());
        source.require_header().unwrap();
        assert_eq!(source.rows().count(), 0);
    }

    #[test]
    fn test_missing_file_is_input_error() {
        let result = RecordSource::open(Path::new("/nonexistent/tweets.csv"));
        assert!(matches!(result, Err(AppError::Input(_))));
    }
}
