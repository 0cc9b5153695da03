use crate::error::Error;
use mailparse::MailHeaderMap;
use regex::Regex;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{error, trace};

/// Raw lines scanned for a `Subject: ` header before giving up on the fast path.
pub const FAST_SCAN_LINE_LIMIT: usize = 100;

const SUBJECT_MARKER: &str = "Subject: ";

lazy_static::lazy_static! {
    static ref ENCODED_WORD_REGEX: Regex =
        Regex::new(r"=\?([^?\s]+)\?[bBqQ]\?[^?\s]*\?=").expect("encoded-word pattern is valid");
}

/// Two-tier subject extraction:
/// 1. Fast scan of the first lines for a plain `Subject: ` header
/// 2. Full header parse with charset decoding when the fast scan finds nothing usable
pub fn extract_subject(path: &Path) -> Result<Option<String>, Error> {
    if let Some(subject) = fast_subject(path)? {
        return Ok(Some(subject));
    }
    trace!("Falling back to header parse for {}", path.display());
    slow_subject(path)
}

/// Scan at most [`FAST_SCAN_LINE_LIMIT`] lines for `Subject: <text>`.
///
/// Returns `None` when no such line exists in range, or when the first one
/// found captured a single character or less, which usually means the real
/// value is encoded or folded onto the next line.
pub fn fast_subject(path: &Path) -> io::Result<Option<String>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut buf = Vec::new();

    for _ in 0..FAST_SCAN_LINE_LIMIT {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches('\n').trim_end_matches('\r');

        if let Some(captured) = line.strip_prefix(SUBJECT_MARKER) {
            if captured.chars().count() > 1 {
                return Ok(Some(captured.to_string()));
            }
            return Ok(None);
        }
    }

    Ok(None)
}

/// Parse the header block and decode the first `Subject` header.
///
/// Only the first segment of a multi-part encoded subject is kept: plain text
/// ahead of the first encoded-word, or else the run of adjacent encoded-words
/// sharing the first word's charset. A file without any Subject header
/// yields `Ok(None)`.
pub fn slow_subject(path: &Path) -> Result<Option<String>, Error> {
    let data = fs::read(path)?;
    let (headers, _) = mailparse::parse_headers(&data)?;

    let header = match headers.get_first_header("Subject") {
        Some(header) => header,
        None => {
            error!("Not an email file: {}", path.display());
            return Ok(None);
        }
    };

    let raw = String::from_utf8_lossy(header.get_value_raw()).into_owned();
    let words = encoded_words(&raw);
    let first = match words.first() {
        Some(first) => first,
        None => return Ok(Some(header.get_value())),
    };

    let leading = raw[..first.start].trim();
    if !leading.is_empty() {
        return Ok(Some(leading.to_string()));
    }

    let mut decoded = String::new();
    let mut end = first.start;
    for word in &words {
        // whitespace between adjacent encoded-words is not part of the text
        if !raw[end..word.start].trim().is_empty()
            || !word.charset.eq_ignore_ascii_case(first.charset)
        {
            break;
        }
        decoded.push_str(&decode_encoded_word(&raw[word.start..word.end])?);
        end = word.end;
    }

    Ok(Some(decoded))
}

struct EncodedWord<'a> {
    start: usize,
    end: usize,
    charset: &'a str,
}

fn encoded_words(raw: &str) -> Vec<EncodedWord<'_>> {
    ENCODED_WORD_REGEX
        .captures_iter(raw)
        .filter_map(|caps| {
            let word = caps.get(0)?;
            let charset = caps.get(1)?;
            Some(EncodedWord {
                start: word.start(),
                end: word.end(),
                charset: charset.as_str(),
            })
        })
        .collect()
}

fn decode_encoded_word(word: &str) -> Result<String, Error> {
    let line = format!("{}{}", SUBJECT_MARKER, word);
    let (header, _) = mailparse::parse_header(line.as_bytes())?;
    Ok(header.get_value())
}
