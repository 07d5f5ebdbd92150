// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Range file grammar. One work packet per non-empty line:
//
//     title ":" range ("," range)*
//     range = N | N "-" M
//
// Page numbers are 1-based and inclusive in the file and 0-based internally.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use folio_core::error::{FolioError, Result};
use folio_core::{Interval, WorkPacket};
use tracing::debug;

/// Parse one line. `line_no` is 1-based and only used in errors.
pub fn parse_line(line: &str, line_no: usize) -> Result<WorkPacket> {
    let mut parts = line.split(':');
    let (Some(title), Some(ranges), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FolioError::parse(
            line_no,
            format!("expected exactly one ':' between title and ranges in {:?}", line.trim()),
        ));
    };

    let title = title.trim();
    if title.is_empty() {
        return Err(FolioError::parse(line_no, "empty title"));
    }
    // The title names a file in the output directory.
    if title.contains(['/', '\\']) || title == ".." || title == "." {
        return Err(FolioError::parse(
            line_no,
            format!("title {title:?} must be a plain file name"),
        ));
    }

    let intervals = ranges
        .trim()
        .split(',')
        .map(|token| parse_range(token, line_no))
        .collect::<Result<Vec<_>>>()?;

    Ok(WorkPacket::new(title, intervals))
}

/// Parse `N` or `N-M` (1-based) into a 0-based interval.
pub fn parse_range(token: &str, line_no: usize) -> Result<Interval> {
    let token = token.trim();
    let (start, end) = match token.split_once('-') {
        Some((start, end)) => (
            parse_page_number(start, line_no)?,
            parse_page_number(end, line_no)?,
        ),
        None => {
            let page = parse_page_number(token, line_no)?;
            (page, page)
        }
    };

    Interval::new(start - 1, end - 1).ok_or_else(|| {
        FolioError::parse(line_no, format!("range {token:?} ends before it starts"))
    })
}

/// A positive 1-based page number.
fn parse_page_number(text: &str, line_no: usize) -> Result<usize> {
    let text = text.trim();
    let number: i64 = text
        .parse()
        .map_err(|_| FolioError::parse(line_no, format!("{text:?} is not a page number")))?;
    if number <= 0 {
        return Err(FolioError::parse(
            line_no,
            format!("page numbers start at 1, got {number}"),
        ));
    }
    usize::try_from(number)
        .map_err(|_| FolioError::parse(line_no, format!("page number {number} is too large")))
}

/// Lazily parsed work packets, one per non-empty line, in file order.
pub struct WorkPackets<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
    failed: bool,
}

impl<R: BufRead> WorkPackets<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for WorkPackets<R> {
    type Item = Result<WorkPacket>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err.into()));
                }
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let packet = parse_line(&line, self.line_no);
            // Fail fast: nothing after a malformed line is yielded.
            self.failed = packet.is_err();
            return Some(packet);
        }
    }
}

/// Parse an in-memory range specification.
pub fn parse_ranges(text: &str) -> WorkPackets<&[u8]> {
    WorkPackets::new(text.as_bytes())
}

/// A range file on disk. Each call to [`RangeFile::packets`] reads it afresh,
/// so the sequence can be restarted.
#[derive(Debug, Clone)]
pub struct RangeFile {
    path: PathBuf,
}

impl RangeFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the file and return its work packets.
    pub fn packets(&self) -> Result<WorkPackets<BufReader<File>>> {
        let file = File::open(&self.path).map_err(|err| {
            FolioError::InvalidInput(format!(
                "cannot open range file {}: {}",
                self.path.display(),
                err
            ))
        })?;
        debug!(path = %self.path.display(), "Reading range file");
        Ok(WorkPackets::new(BufReader::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(start: usize, end: usize) -> Interval {
        Interval::new(start, end).unwrap()
    }

    #[test]
    fn parses_span_and_single_page() {
        let packet = parse_line("Chapter1: 2-4,7", 1).unwrap();
        assert_eq!(
            packet,
            WorkPacket::new("Chapter1", vec![interval(1, 3), interval(6, 6)])
        );
    }

    #[test]
    fn whitespace_around_parts_is_ignored() {
        let packet = parse_line("  Part Two :  10 - 12 , 1 ", 1).unwrap();
        assert_eq!(packet.title, "Part Two");
        assert_eq!(packet.intervals, vec![interval(9, 11), interval(0, 0)]);
    }

    #[test]
    fn non_numeric_range_is_a_parse_error() {
        let err = parse_line("Bad:abc", 4).err().unwrap();
        assert!(matches!(err, FolioError::Parse { line: 4, .. }));
    }

    #[test]
    fn colon_count_must_be_exactly_one() {
        assert!(matches!(parse_line("no separator 1-3", 1), Err(FolioError::Parse { .. })));
        assert!(matches!(parse_line("a:b:1-3", 1), Err(FolioError::Parse { .. })));
    }

    #[test]
    fn rejects_zero_negative_and_reversed_ranges() {
        for line in ["Zero:0", "Zero span:0-2", "Negative:-3", "Reversed:5-2", "Empty:", "Gap:1,,2"] {
            assert!(
                matches!(parse_line(line, 1), Err(FolioError::Parse { .. })),
                "{line} should fail"
            );
        }
    }

    #[test]
    fn empty_title_is_rejected() {
        assert!(matches!(parse_line("  : 1-2", 1), Err(FolioError::Parse { .. })));
    }

    #[test]
    fn titles_cannot_leave_the_output_directory() {
        for line in ["../escape: 1", "nested/part: 1-2", r"win\part: 3", "..: 1"] {
            assert!(
                matches!(parse_line(line, 2), Err(FolioError::Parse { line: 2, .. })),
                "{line} should fail"
            );
        }
        assert_eq!(parse_line("v1.2 draft: 1", 1).unwrap().title, "v1.2 draft");
    }

    #[test]
    fn blank_lines_are_skipped_and_line_numbers_kept() {
        let text = "Intro: 1\n\n   \nBody: 2-5\nBroken: x\nNever: 9\n";
        let results: Vec<_> = parse_ranges(text).collect();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().title, "Intro");
        assert_eq!(results[1].as_ref().unwrap().intervals, vec![interval(1, 4)]);
        assert!(matches!(results[2], Err(FolioError::Parse { line: 5, .. })));
    }

    #[test]
    fn windows_line_endings_parse() {
        let packets: Vec<_> = parse_ranges("A: 1-2\r\nB: 3\r\n")
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[1], WorkPacket::new("B", vec![interval(2, 2)]));
    }

    #[test]
    fn range_file_can_be_read_twice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranges.txt");
        std::fs::write(&path, "First: 1-2\nSecond: 3,1\n").unwrap();

        let file = RangeFile::new(&path);
        let first: Vec<WorkPacket> = file.packets().unwrap().collect::<Result<_>>().unwrap();
        let second: Vec<WorkPacket> = file.packets().unwrap().collect::<Result<_>>().unwrap();

        assert_eq!(first, second);
        assert_eq!(first[1].intervals, vec![interval(2, 2), interval(0, 0)]);
    }

    #[test]
    fn missing_range_file_is_reported() {
        let file = RangeFile::new("/nonexistent/ranges.txt");
        assert!(matches!(file.packets(), Err(FolioError::InvalidInput(_))));
    }
}
