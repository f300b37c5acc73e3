//! Input rows: list-cell normalization, record parsing and timestamp decomposition.

use chrono::{Datelike, Month, TimeZone, Timelike};
use csv::StringRecord;

use crate::error::AppError;
use crate::models::graph::Attribute;

/// Fixed column positions in the input file.
const TWEET_ID: usize = 0;
const AUTHOR_ID: usize = 1;
const HASHTAGS: usize = 2;
const URLS: usize = 3;
const MENTIONS: usize = 4;
const TIMESTAMP: usize = 5;
const MIN_FIELDS: usize = 6;

/// Splits a list-valued cell such as `['a', 'b']` into its tokens.
///
/// Brackets, single quotes and spaces are dropped before splitting on commas,
/// so `[]` and `""` yield a single empty token. Callers filter empty tokens
/// with [`non_empty`].
pub fn split_list_cell(raw: &str) -> Vec<String> {
    let cleaned: String = raw
        .chars()
        .filter(|&c| !matches!(c, '[' | ']' | '\'' | ' '))
        .collect();
    cleaned.split(',').map(str::to_string).collect()
}

/// Tokens of a list cell that name an entity.
pub fn non_empty(tokens: Vec<String>) -> Vec<String> {
    tokens.into_iter().filter(|t| !t.is_empty()).collect()
}

/// One parsed input row.
#[derive(Debug, Clone, PartialEq)]
pub struct TweetRecord {
    /// Line number in the input, for diagnostics.
    pub line: u64,
    pub tweet_id: i64,
    pub author_id: i64,
    pub hashtags: Vec<String>,
    pub urls: Vec<String>,
    pub mentions: Vec<i64>,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
}

impl TweetRecord {
    /// Parses the six leading fields of a row; extra fields are ignored.
    pub fn parse(fields: &StringRecord, line: u64) -> Result<Self, AppError> {
        if fields.len() < MIN_FIELDS {
            return Err(malformed(
                line,
                format!("expected at least {} fields, found {}", MIN_FIELDS, fields.len()),
            ));
        }
        let field = |idx: usize| fields.get(idx).unwrap_or_default();

        let mentions = non_empty(split_list_cell(field(MENTIONS)))
            .iter()
            .map(|m| parse_int(m, "mentioned user id", line))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            line,
            tweet_id: parse_int(field(TWEET_ID), "tweet id", line)?,
            author_id: parse_int(field(AUTHOR_ID), "author id", line)?,
            hashtags: non_empty(split_list_cell(field(HASHTAGS))),
            urls: non_empty(split_list_cell(field(URLS))),
            mentions,
            timestamp: parse_int(field(TIMESTAMP), "timestamp", line)?,
        })
    }

    /// Decomposes the timestamp in the given time zone.
    pub fn time_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<TweetTime, AppError> {
        TweetTime::from_unix(self.timestamp, tz).ok_or_else(|| {
            malformed(
                self.line,
                format!("timestamp {} is out of range", self.timestamp),
            )
        })
    }
}

/// Calendar breakdown of a tweet's timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetTime {
    pub day: u32,
    pub month: &'static str,
    pub year: i32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl TweetTime {
    pub fn from_unix<Tz: TimeZone>(secs: i64, tz: &Tz) -> Option<Self> {
        let at = tz.timestamp_opt(secs, 0).single()?;
        let month = Month::try_from(u8::try_from(at.month()).ok()?).ok()?;
        Some(Self {
            day: at.day(),
            month: month.name(),
            year: at.year(),
            hour: at.hour(),
            minute: at.minute(),
            second: at.second(),
        })
    }

    pub fn attributes(&self) -> Vec<Attribute> {
        vec![
            Attribute::new("day", i64::from(self.day)),
            Attribute::new("month", self.month),
            Attribute::new("year", i64::from(self.year)),
            Attribute::new("hour", i64::from(self.hour)),
            Attribute::new("minute", i64::from(self.minute)),
            Attribute::new("second", i64::from(self.second)),
        ]
    }
}

fn parse_int(raw: &str, what: &str, line: u64) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|e| malformed(line, format!("invalid {} '{}': {}", what, raw, e)))
}

fn malformed(line: u64, reason: String) -> AppError {
    AppError::MalformedRecord { line, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_split_list_cell() {
        assert_eq!(split_list_cell("['a', 'b']"), vec!["a", "b"]);
        assert_eq!(split_list_cell("'x'"), vec!["x"]);
        assert_eq!(split_list_cell("[]"), vec![""]);
        assert_eq!(split_list_cell(""), vec![""]);
    }

    #[test]
    fn test_tokens_carry_no_noise_characters() {
        for raw in ["['a b', 'c']", "[ 'http://x.y/z' ,'q']", "[[a]]", "['', ' ']"] {
            for token in split_list_cell(raw) {
                assert!(
                    !token.contains(|c: char| matches!(c, '[' | ']' | '\'' | ' ')),
                    "{:?} from {:?}",
                    token,
                    raw
                );
            }
        }
    }

    #[test]
    fn test_non_empty_drops_blank_tokens() {
        assert!(non_empty(split_list_cell("[]")).is_empty());
        assert_eq!(non_empty(split_list_cell("['a',,'b',]")), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_full_row() {
        let parsed = TweetRecord::parse(
            &record(&["100", "7", "['a', 'b']", "['u1']", "['8', '9']", "1609459200", "extra"]),
            2,
        )
        .unwrap();
        assert_eq!(parsed.tweet_id, 100);
        assert_eq!(parsed.author_id, 7);
        assert_eq!(parsed.hashtags, vec!["a", "b"]);
        assert_eq!(parsed.urls, vec!["u1"]);
        assert_eq!(parsed.mentions, vec![8, 9]);
        assert_eq!(parsed.timestamp, 1609459200);
    }

    #[test]
    fn test_parse_empty_lists() {
        let parsed = TweetRecord::parse(&record(&["1", "2", "[]", "", "[]", "0"]), 2).unwrap();
        assert!(parsed.hashtags.is_empty());
        assert!(parsed.urls.is_empty());
        assert!(parsed.mentions.is_empty());
    }

    #[test]
    fn test_parse_rejects_short_row() {
        let err = TweetRecord::parse(&record(&["1", "2", "[]"]), 9).unwrap_err();
        assert!(matches!(err, AppError::MalformedRecord { line: 9, .. }));
    }

    #[test]
    fn test_parse_rejects_bad_numbers() {
        for fields in [
            ["x", "2", "[]", "[]", "[]", "0"],
            ["1", "y", "[]", "[]", "[]", "0"],
            ["1", "2", "[]", "[]", "['bob']", "0"],
            ["1", "2", "[]", "[]", "[]", "noon"],
        ] {
            let err = TweetRecord::parse(&record(&fields), 4).unwrap_err();
            assert!(err.is_record_local(), "{:?}", fields);
        }
    }

    #[test]
    fn test_time_decomposition_utc() {
        let time = TweetTime::from_unix(1609459200, &Utc).unwrap();
        assert_eq!(
            time,
            TweetTime {
                day: 1,
                month: "January",
                year: 2021,
                hour: 0,
                minute: 0,
                second: 0,
            }
        );

        let later = TweetTime::from_unix(1609459200 + 3600 * 13 + 62, &Utc).unwrap();
        assert_eq!((later.hour, later.minute, later.second), (13, 1, 2));
    }

    #[test]
    fn test_time_out_of_range() {
        let parsed = TweetRecord::parse(
            &record(&["1", "2", "[]", "[]", "[]", &i64::MAX.to_string()]),
            3,
        )
        .unwrap();
        assert!(parsed.time_in(&Utc).is_err());
    }
}
