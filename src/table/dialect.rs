//! Delimiter detection for loosely formatted delimited files.
//!
//! Measurement exports often start with a preamble (instrument settings,
//! free-text notes) whose lines look delimited in a different way than the
//! table that follows. Detection sniffs each line of a bounded sample on its
//! own, takes the delimiter of the last sampled line as the table's, and
//! reports the first line that agrees with it as the start of the table.
//!
//! The sniffing itself ([`sniff_line`], [`detect_in_lines`]) works on lines
//! handed in by the caller and never touches the filesystem.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;

use crate::error::RoiError;

/// Default number of leading lines sampled by [`detect`].
pub const DEFAULT_SAMPLE_LINES: usize = 100;

/// Candidate delimiters, in order of preference for ties.
pub const DEFAULT_CANDIDATES: &[u8] = b",\t;|:";

/// Parsing parameters needed to re-tokenize a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Dialect {
    pub delimiter: u8,
    pub quote: u8,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "delimiter {:?}, quote {:?}",
            self.delimiter as char, self.quote as char
        )
    }
}

/// Options for dialect detection.
#[derive(Clone, Debug)]
pub struct DetectOptions {
    /// Number of leading lines to sample.
    pub sample_lines: usize,
    /// Candidate delimiters, most preferred first.
    pub candidates: Vec<u8>,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            sample_lines: DEFAULT_SAMPLE_LINES,
            candidates: DEFAULT_CANDIDATES.to_vec(),
        }
    }
}

/// Where the tabular data of a file starts and how to parse it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DialectDetection {
    pub dialect: Dialect,
    /// Byte offset of the first line of the table (its header).
    pub offset: u64,
    /// Zero-based index of that line.
    pub line: usize,
}

/// Why no dialect could be detected in a sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectFailure {
    /// The sample holds no non-blank line.
    EmptySample,
    /// The last sampled line has no candidate delimiter.
    NoDelimiter { line: usize },
}

impl fmt::Display for DetectFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectFailure::EmptySample => write!(f, "no non-blank line in the sample window"),
            DetectFailure::NoDelimiter { line } => write!(
                f,
                "last sampled line ({}) contains no candidate delimiter",
                line + 1
            ),
        }
    }
}

/// Counts candidate occurrences outside sections quoted with `quote`.
fn delimiter_counts(line: &str, candidates: &[u8], quote: u8) -> Vec<usize> {
    let mut counts = vec![0; candidates.len()];
    let mut quoted = false;
    for b in line.bytes() {
        if b == quote {
            quoted = !quoted;
        } else if !quoted {
            if let Some(i) = candidates.iter().position(|&c| c == b) {
                counts[i] += 1;
            }
        }
    }
    counts
}

/// Most frequent candidate outside `quote` sections, ties to the first listed.
fn best_delimiter(line: &str, candidates: &[u8], quote: u8) -> Option<u8> {
    let counts = delimiter_counts(line, candidates, quote);
    let (best, &count) = counts
        .iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| a.cmp(b).then(ib.cmp(ia)))?;
    (count > 0).then(|| candidates[best])
}

/// Guesses the quote character of a line split by `delimiter`.
///
/// Single quotes are only chosen when some field is wrapped in them and no
/// double quote appears at all.
fn guess_quote(line: &str, delimiter: u8) -> u8 {
    if line.contains('"') {
        return b'"';
    }
    let single_quoted = line
        .split(delimiter as char)
        .map(str::trim)
        .any(|field| field.len() >= 2 && field.starts_with('\'') && field.ends_with('\''));
    if single_quoted {
        b'\''
    } else {
        b'"'
    }
}

/// Infers the dialect of a single line.
///
/// The delimiter is the candidate occurring most often outside quotes; ties
/// go to the candidate listed first. A line without double quotes is first
/// read with single quotes, which are kept only if they wrap a whole field.
/// Returns `None` for blank lines and for lines containing none of the
/// candidates.
pub fn sniff_line(line: &str, candidates: &[u8]) -> Option<Dialect> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }

    if !line.contains('"') && line.contains('\'') {
        if let Some(delimiter) = best_delimiter(line, candidates, b'\'') {
            if guess_quote(line, delimiter) == b'\'' {
                return Some(Dialect {
                    delimiter,
                    quote: b'\'',
                });
            }
        }
    }

    let delimiter = best_delimiter(line, candidates, b'"')?;
    Some(Dialect {
        delimiter,
        quote: guess_quote(line, delimiter),
    })
}

/// Detects the table dialect in a sample of lines.
///
/// Each line must carry its original terminator so that byte offsets add up
/// to positions in the source. Blank lines are skipped when picking the
/// reference line, so trailing empty lines do not decide the dialect.
pub fn detect_in_lines<S: AsRef<[u8]>>(
    lines: &[S],
    candidates: &[u8],
) -> Result<DialectDetection, DetectFailure> {
    let mut sniffed: Vec<(u64, Option<Dialect>, bool)> = Vec::with_capacity(lines.len());
    let mut offset = 0u64;
    for line in lines {
        let bytes = line.as_ref();
        let text = String::from_utf8_lossy(bytes);
        sniffed.push((offset, sniff_line(&text, candidates), text.trim().is_empty()));
        offset += bytes.len() as u64;
    }

    let (last_index, (_, reference, _)) = sniffed
        .iter()
        .enumerate()
        .rev()
        .find(|(_, (_, _, blank))| !blank)
        .ok_or(DetectFailure::EmptySample)?;
    let reference = (*reference).ok_or(DetectFailure::NoDelimiter { line: last_index })?;

    sniffed
        .iter()
        .enumerate()
        .find_map(|(line, (offset, dialect, _))| match dialect {
            Some(d) if d.delimiter == reference.delimiter => Some(DialectDetection {
                dialect: *d,
                offset: *offset,
                line,
            }),
            _ => None,
        })
        .ok_or(DetectFailure::NoDelimiter { line: last_index })
}

/// Reads up to `max` lines, each with its terminator.
fn sample_lines<R: BufRead>(mut reader: R, max: usize) -> std::io::Result<Vec<Vec<u8>>> {
    let mut lines = Vec::new();
    while lines.len() < max {
        let mut line = Vec::new();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        lines.push(line);
    }
    Ok(lines)
}

/// Detects the table dialect of a file.
///
/// The caller must skip to the returned offset before parsing rows with the
/// returned dialect; everything before it is preamble.
///
/// # Errors
/// Returns [`RoiError::DialectNotFound`] when the sample holds no usable
/// delimiter, or an IO error if the file cannot be read.
pub fn detect(path: &Path, opts: &DetectOptions) -> Result<DialectDetection, RoiError> {
    let file = File::open(path).map_err(RoiError::Io)?;
    let lines = sample_lines(BufReader::new(file), opts.sample_lines)?;

    let detection =
        detect_in_lines(&lines, &opts.candidates).map_err(|failure| RoiError::DialectNotFound {
            path: path.to_path_buf(),
            reason: failure.to_string(),
        })?;

    log::debug!(
        "{}: {} starting at byte {} (line {})",
        path.display(),
        detection.dialect,
        detection.offset,
        detection.line + 1
    );
    Ok(detection)
}

/// Detects the table dialect of in-memory bytes.
///
/// Useful for fuzzing and testing without file I/O.
pub fn detect_in_slice(
    bytes: &[u8],
    opts: &DetectOptions,
) -> Result<DialectDetection, DetectFailure> {
    let lines: Vec<&[u8]> = bytes
        .split_inclusive(|&b| b == b'\n')
        .take(opts.sample_lines)
        .collect();
    detect_in_lines(&lines, &opts.candidates)
}
