//! The cache entry value and its on-disk text format.
//!
//! Disk entries begin with a single header line:
//!
//! ```text
//! /*NNNNNNNNNN:<relativePath>:<yyyy-MM-dd HH:mm:ss.fffffff>:<MMMMM>ms*/
//! ```
//!
//! `NNNNNNNNNN` is the byte length of the relative path, zero-padded to
//! the width of `i32::MAX` (10 digits) so the path may itself contain
//! colons. The timestamp carries seven fractional digits (100 ns ticks)
//! in UTC, and `MMMMM` is the generation time in milliseconds, zero-padded
//! to five digits and capped at 99999. The header is followed by the
//! platform line ending and then the cached content verbatim. Any
//! deviation is rejected on parse.

use crate::error::CacheError;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Width of the zero-padded path-length prefix (`i32::MAX` is 10 digits).
const LENGTH_WIDTH: usize = 10;

/// Length of the `yyyy-MM-dd HH:mm:ss.fffffff` timestamp text.
const TIMESTAMP_LEN: usize = 27;

/// Width of the zero-padded elapsed-milliseconds field.
const ELAPSED_WIDTH: usize = 5;

/// Ceiling for the recorded generation time, in milliseconds.
const ELAPSED_CAP: u128 = 99_999;

/// A cached pipeline result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
    /// The relative path the content was generated for.
    pub relative_path: String,
    /// The freshness timestamp the entry was stored with.
    pub last_modified: SystemTime,
    /// The transformed stylesheet text.
    pub content: String,
    /// How long the pipeline took to generate the content.
    pub build_elapsed: Duration,
}

impl CacheEntry {
    /// Renders this entry in the on-disk format.
    pub fn to_disk_format(&self) -> String {
        let newline = if cfg!(windows) { "\r\n" } else { "\n" };
        format!(
            "/*{:010}:{}:{}:{:05}ms*/{}{}",
            self.relative_path.len(),
            self.relative_path,
            format_timestamp(self.last_modified),
            self.build_elapsed.as_millis().min(ELAPSED_CAP),
            newline,
            self.content,
        )
    }

    /// Parses an entry from the on-disk format.
    ///
    /// `file` is only used to attribute errors. Every deviation from the
    /// format is a hard [`CacheError::InvalidFormat`]; callers decide
    /// whether that deletes the file or merely counts as a miss.
    pub fn from_disk_format(text: &str, file: &Path) -> Result<Self, CacheError> {
        let fail = |reason: &str| CacheError::InvalidFormat {
            path: file.to_path_buf(),
            reason: reason.to_string(),
        };

        let rest = text
            .strip_prefix("/*")
            .ok_or_else(|| fail("header does not open with /*"))?;

        if rest.len() < LENGTH_WIDTH + 1 {
            return Err(fail("header truncated in length prefix"));
        }
        let (len_text, rest) = rest.split_at(LENGTH_WIDTH);
        if !len_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(fail("length prefix is not numeric"));
        }
        let path_len: usize = len_text
            .parse()
            .map_err(|_| fail("length prefix out of range"))?;
        let rest = rest
            .strip_prefix(':')
            .ok_or_else(|| fail("missing separator after length prefix"))?;

        if rest.len() < path_len || !rest.is_char_boundary(path_len) {
            return Err(fail("relative path shorter than its declared length"));
        }
        let (relative_path, rest) = rest.split_at(path_len);
        if relative_path.is_empty() {
            return Err(fail("relative path is empty"));
        }
        let rest = rest
            .strip_prefix(':')
            .ok_or_else(|| fail("missing separator after relative path"))?;

        if rest.len() < TIMESTAMP_LEN {
            return Err(fail("header truncated in timestamp"));
        }
        let (ts_text, rest) = rest.split_at(TIMESTAMP_LEN);
        let last_modified =
            parse_timestamp(ts_text).ok_or_else(|| fail("malformed timestamp"))?;
        let rest = rest
            .strip_prefix(':')
            .ok_or_else(|| fail("missing separator after timestamp"))?;

        if rest.len() < ELAPSED_WIDTH {
            return Err(fail("header truncated in elapsed field"));
        }
        let (elapsed_text, rest) = rest.split_at(ELAPSED_WIDTH);
        if !elapsed_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(fail("elapsed field is not numeric"));
        }
        let elapsed_ms: u64 = elapsed_text
            .parse()
            .map_err(|_| fail("elapsed field out of range"))?;
        let rest = rest
            .strip_prefix("ms*/")
            .ok_or_else(|| fail("missing ms*/ header close"))?;

        let content = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .ok_or_else(|| fail("missing line break after header"))?;

        Ok(Self {
            relative_path: relative_path.to_string(),
            last_modified,
            content: content.to_string(),
            build_elapsed: Duration::from_millis(elapsed_ms),
        })
    }
}

fn format_timestamp(t: SystemTime) -> String {
    let dt: DateTime<Utc> = t.into();
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:07}",
        dt.year(),
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
        dt.nanosecond() % 1_000_000_000 / 100,
    )
}

fn parse_timestamp(text: &str) -> Option<SystemTime> {
    let bytes = text.as_bytes();
    if bytes.len() != TIMESTAMP_LEN {
        return None;
    }
    for (i, b) in bytes.iter().enumerate() {
        let ok = match i {
            4 | 7 => *b == b'-',
            10 => *b == b' ',
            13 | 16 => *b == b':',
            19 => *b == b'.',
            _ => b.is_ascii_digit(),
        };
        if !ok {
            return None;
        }
    }
    let num = |range: std::ops::Range<usize>| -> u32 {
        text[range].parse().unwrap_or(0)
    };
    let date = NaiveDate::from_ymd_opt(num(0..4) as i32, num(5..7), num(8..10))?;
    let naive = date.and_hms_nano_opt(num(11..13), num(14..16), num(17..19), num(20..27) * 100)?;
    Some(SystemTime::from(Utc.from_utc_datetime(&naive)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_entry() -> CacheEntry {
        CacheEntry {
            relative_path: "test.css".to_string(),
            // 1970-01-02 03:04:05 UTC
            last_modified: SystemTime::UNIX_EPOCH + Duration::from_secs(97_445),
            content: "a{x:1}".to_string(),
            build_elapsed: Duration::from_millis(42),
        }
    }

    #[test]
    fn header_is_bit_exact() {
        let text = make_entry().to_disk_format();
        assert!(text.starts_with(
            "/*0000000008:test.css:1970-01-02 03:04:05.0000000:00042ms*/"
        ));
        assert!(text.ends_with("a{x:1}"));
    }

    #[test]
    fn roundtrip() {
        let entry = make_entry();
        let parsed =
            CacheEntry::from_disk_format(&entry.to_disk_format(), Path::new("x.cache")).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn sub_second_precision_survives_to_100ns() {
        let entry = CacheEntry {
            last_modified: SystemTime::UNIX_EPOCH + Duration::new(5, 123_456_700),
            ..make_entry()
        };
        let text = entry.to_disk_format();
        assert!(text.contains(".1234567:"));
        let parsed = CacheEntry::from_disk_format(&text, Path::new("x.cache")).unwrap();
        assert_eq!(parsed.last_modified, entry.last_modified);
    }

    #[test]
    fn elapsed_is_capped_at_five_digits() {
        let entry = CacheEntry {
            build_elapsed: Duration::from_secs(1_000),
            ..make_entry()
        };
        assert!(entry.to_disk_format().contains(":99999ms*/"));
    }

    #[test]
    fn path_containing_colons_roundtrips() {
        let entry = CacheEntry {
            relative_path: "odd:name.css".to_string(),
            ..make_entry()
        };
        let parsed =
            CacheEntry::from_disk_format(&entry.to_disk_format(), Path::new("x.cache")).unwrap();
        assert_eq!(parsed.relative_path, "odd:name.css");
    }

    #[test]
    fn both_line_endings_are_accepted() {
        let entry = make_entry();
        let text = entry.to_disk_format();
        let body_start = text.find("ms*/").unwrap() + 4;
        let (header, _) = text.split_at(body_start);
        for newline in ["\n", "\r\n"] {
            let candidate = format!("{header}{newline}a{{x:1}}");
            let parsed =
                CacheEntry::from_disk_format(&candidate, Path::new("x.cache")).unwrap();
            assert_eq!(parsed.content, "a{x:1}");
        }
    }

    #[test]
    fn deviations_are_rejected() {
        let good = make_entry().to_disk_format();
        let cases = [
            "".to_string(),
            "not a cache file".to_string(),
            "/*123:short".to_string(),
            // Length prefix disagrees with the actual path length.
            good.replacen("0000000008", "0000000003", 1),
            // Month 13 in the timestamp.
            good.replacen("1970-01-02", "1970-13-02", 1),
            // Header close mangled.
            good.replacen("ms*/", "ms-/", 1),
            // Missing line break after the header.
            good.replace('\n', "").replace('\r', ""),
        ];
        for case in cases {
            assert!(
                CacheEntry::from_disk_format(&case, Path::new("x.cache")).is_err(),
                "accepted malformed input {case:?}"
            );
        }
    }
}
