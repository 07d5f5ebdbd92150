// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Folio.

use serde::{Deserialize, Serialize};

/// A 0-based, inclusive range of page indices.
///
/// `start <= end` always holds; use [`Interval::new`] to construct one from
/// untrusted values. Deserialisation goes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IntervalBounds")]
pub struct Interval {
    start: usize,
    end: usize,
}

/// Unchecked wire form of [`Interval`].
#[derive(Deserialize)]
struct IntervalBounds {
    start: usize,
    end: usize,
}

impl TryFrom<IntervalBounds> for Interval {
    type Error = String;

    fn try_from(bounds: IntervalBounds) -> Result<Self, Self::Error> {
        Interval::new(bounds.start, bounds.end).ok_or_else(|| {
            format!(
                "interval ends at {} before it starts at {}",
                bounds.end, bounds.start
            )
        })
    }
}

impl Interval {
    /// Create an interval, returning `None` when `end < start`.
    pub fn new(start: usize, end: usize) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Page indices in ascending order.
    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// One named extraction request: the output title plus the page intervals
/// that make it up, in output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkPacket {
    pub title: String,
    pub intervals: Vec<Interval>,
}

impl WorkPacket {
    pub fn new(title: impl Into<String>, intervals: Vec<Interval>) -> Self {
        Self {
            title: title.into(),
            intervals,
        }
    }
}

/// Document-level metadata written into the PDF `/Info` dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub producer: Option<String>,
}
