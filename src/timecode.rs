use std::fmt;

use crate::errors::SubtitleError;

// @module: Timestamp value type and textual conversions

/// An absolute offset into a caption document, counted in milliseconds.
/// Always non-negative; arithmetic that would underflow clamps to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeCode(u64);

impl TimeCode {
    pub const ZERO: TimeCode = TimeCode(0);

    pub fn from_ms(ms: u64) -> Self {
        TimeCode(ms)
    }

    pub fn ms(&self) -> u64 {
        self.0
    }

    /// Apply a signed offset, clamping at zero instead of underflowing.
    pub fn saturating_offset(&self, offset_ms: i64) -> Self {
        TimeCode(self.0.saturating_add_signed(offset_ms))
    }

    // @creates: TimeCode from clock components
    // @validates: Component ranges
    fn from_parts(hours: u64, minutes: u64, seconds: u64, millis: u64, raw: &str) -> Result<Self, SubtitleError> {
        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(SubtitleError::MalformedDocument(format!(
                "invalid time components in timestamp '{}'", raw
            )));
        }
        Ok(TimeCode(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis))
    }

    /// Parse an SRT timestamp (`HH:MM:SS,mmm`), milliseconds exactly 3 digits.
    pub fn parse_srt(text: &str) -> Result<Self, SubtitleError> {
        Self::parse_with_separator(text, ',', false)
    }

    /// Parse a WebVTT timestamp (`HH:MM:SS.mmm`). Some producers omit the
    /// hours field, so `MM:SS.mmm` is accepted as well.
    pub fn parse_vtt(text: &str) -> Result<Self, SubtitleError> {
        Self::parse_with_separator(text, '.', true)
    }

    fn parse_with_separator(text: &str, millis_sep: char, hours_optional: bool) -> Result<Self, SubtitleError> {
        let malformed = || SubtitleError::MalformedDocument(format!("invalid timestamp '{}'", text));

        let (clock, millis) = text.trim().split_once(millis_sep).ok_or_else(malformed)?;
        if millis.len() != 3 {
            return Err(malformed());
        }
        let millis: u64 = millis.parse().map_err(|_| malformed())?;

        let fields: Vec<&str> = clock.split(':').collect();
        let (hours, minutes, seconds) = match fields.as_slice() {
            [h, m, s] => (
                h.parse().map_err(|_| malformed())?,
                m.parse().map_err(|_| malformed())?,
                s.parse().map_err(|_| malformed())?,
            ),
            [m, s] if hours_optional => (
                0,
                m.parse().map_err(|_| malformed())?,
                s.parse().map_err(|_| malformed())?,
            ),
            _ => return Err(malformed()),
        };

        Self::from_parts(hours, minutes, seconds, millis, text)
    }

    /// Format as an SRT timestamp (`HH:MM:SS,mmm`)
    pub fn format_srt(&self) -> String {
        self.format_with_separator(',')
    }

    /// Format as a WebVTT timestamp (`HH:MM:SS.mmm`). The hours field is
    /// always emitted even when zero.
    pub fn format_vtt(&self) -> String {
        self.format_with_separator('.')
    }

    fn format_with_separator(&self, millis_sep: char) -> String {
        let hours = self.0 / 3_600_000;
        let minutes = (self.0 % 3_600_000) / 60_000;
        let seconds = (self.0 % 60_000) / 1_000;
        let millis = self.0 % 1_000;

        format!("{:02}:{:02}:{:02}{}{:03}", hours, minutes, seconds, millis_sep, millis)
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_srt())
    }
}

impl From<u64> for TimeCode {
    fn from(ms: u64) -> Self {
        TimeCode(ms)
    }
}
