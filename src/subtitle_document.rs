use std::fmt;

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::timecode::TimeCode;

// @module: In-memory caption document model

// @const: HTML-style markup tags
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

// @const: Runs of blank lines
static BLANK_RUN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

/// Why a caption entry was rejected during parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// `start >= end`, so the entry can never be displayed
    InvertedTiming {
        start_ms: u64,
        end_ms: u64,
    },
    /// Nothing left after text cleaning
    EmptyText,
    /// The timing line was present but not parseable
    BadTimestamp(String),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::InvertedTiming { start_ms, end_ms } => {
                write!(f, "end time {} <= start time {}", end_ms, start_ms)
            }
            DropReason::EmptyText => write!(f, "empty text after cleaning"),
            DropReason::BadTimestamp(line) => write!(f, "unparseable timing line '{}'", line),
        }
    }
}

/// Record of a caption entry skipped during parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedEntry {
    /// Position of the entry in the source file (1-based)
    pub source_index: usize,
    /// Why it was skipped
    pub reason: DropReason,
}

// @struct: Single timed caption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionEntry {
    // @field: 1-based index, contiguous after normalization
    pub index: usize,

    // @field: Display start
    pub start: TimeCode,

    // @field: Display end
    pub end: TimeCode,

    // @field: Cleaned caption text
    pub text: String,

    // @field: WebVTT cue identifier line, preserved verbatim
    pub identifier: Option<String>,

    // @field: Opaque position/style token from the source format
    pub position: Option<String>,
}

/// Ordered sequence of caption entries plus the ledger of entries that were
/// skipped while parsing. Insertion order is display order; entries are
/// never re-sorted by time.
#[derive(Debug, Clone, Default)]
pub struct CaptionDocument {
    /// Accepted entries, renumbered contiguously from 1
    pub entries: Vec<CaptionEntry>,

    /// Entries skipped during parsing, with reasons
    pub dropped: Vec<DroppedEntry>,
}

impl CaptionDocument {
    pub fn new() -> Self {
        CaptionDocument::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clean and validate a candidate entry, appending it on success or
    /// recording the drop on failure. Returns whether the entry was kept.
    pub fn push_checked(
        &mut self,
        source_index: usize,
        start: TimeCode,
        end: TimeCode,
        text: &str,
        position: Option<String>,
    ) -> bool {
        self.push_checked_with_identifier(source_index, start, end, text, None, position)
    }

    /// [`push_checked`](Self::push_checked) carrying a WebVTT cue identifier.
    pub fn push_checked_with_identifier(
        &mut self,
        source_index: usize,
        start: TimeCode,
        end: TimeCode,
        text: &str,
        identifier: Option<String>,
        position: Option<String>,
    ) -> bool {
        let cleaned = clean_text(text);
        if cleaned.is_empty() {
            self.record_drop(source_index, DropReason::EmptyText);
            return false;
        }
        if start >= end {
            self.record_drop(
                source_index,
                DropReason::InvertedTiming {
                    start_ms: start.ms(),
                    end_ms: end.ms(),
                },
            );
            return false;
        }

        self.entries.push(CaptionEntry {
            index: self.entries.len() + 1,
            start,
            end,
            text: cleaned,
            identifier,
            position,
        });
        true
    }

    /// Record a skipped entry without appending anything.
    pub fn record_drop(&mut self, source_index: usize, reason: DropReason) {
        warn!("Skipping subtitle entry {}: {}", source_index, reason);
        self.dropped.push(DroppedEntry { source_index, reason });
    }

    /// Produce a new document with every start and end moved by
    /// `offset_ms`. A boundary that would go below zero clamps to zero;
    /// entries are never dropped here, and `start < end` is not
    /// re-validated — entries inverted by the clamp are left for sync
    /// validation to surface.
    pub fn shifted(&self, offset_ms: i64) -> CaptionDocument {
        let entries = self
            .entries
            .iter()
            .map(|entry| CaptionEntry {
                start: entry.start.saturating_offset(offset_ms),
                end: entry.end.saturating_offset(offset_ms),
                ..entry.clone()
            })
            .collect();

        CaptionDocument {
            entries,
            dropped: Vec::new(),
        }
    }

    /// Time span covered by the document: last end minus first start.
    /// This is a span, not a sum — captions may have gaps. Zero for an
    /// empty document.
    pub fn span_ms(&self) -> u64 {
        match (self.entries.first(), self.entries.last()) {
            (Some(first), Some(last)) => last.end.ms().saturating_sub(first.start.ms()),
            _ => 0,
        }
    }
}

/// Normalize caption text: strip HTML-style markup, collapse runs of blank
/// lines, trim surrounding whitespace. Two semantically identical captions
/// differing only in markup or whitespace normalize identically.
pub fn clean_text(text: &str) -> String {
    let without_tags = TAG_REGEX.replace_all(text, "");
    let collapsed = BLANK_RUN_REGEX.replace_all(&without_tags, "\n");
    collapsed.trim().to_string()
}
