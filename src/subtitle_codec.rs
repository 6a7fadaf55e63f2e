use std::path::Path;

use encoding_rs::Encoding;
use log::warn;

use crate::errors::SubtitleError;
use crate::subtitle_document::{CaptionDocument, DropReason};
use crate::timecode::TimeCode;

// @module: SRT and WebVTT codecs

/// The caption formats this engine reads and writes. Selection is always
/// by file extension or explicit name, never by content sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    Srt,
    Vtt,
}

impl SubtitleFormat {
    /// Select a codec from a file extension, before any byte is read.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Self::from_name(&ext)
            .map_err(|_| SubtitleError::UnsupportedFormat(format!("{:?}", path)))
    }

    /// Select a codec from a format name such as `srt` or `.vtt`.
    pub fn from_name(name: &str) -> Result<Self, SubtitleError> {
        match name.trim().trim_start_matches('.').to_lowercase().as_str() {
            "srt" => Ok(SubtitleFormat::Srt),
            "vtt" => Ok(SubtitleFormat::Vtt),
            other => Err(SubtitleError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "srt",
            SubtitleFormat::Vtt => "vtt",
        }
    }

    /// Content type served for payloads of this format
    pub fn content_type(&self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "application/x-subrip",
            SubtitleFormat::Vtt => "text/vtt; charset=utf-8",
        }
    }

    /// Decode raw bytes into a caption document. Individual entries with
    /// invalid timing are skipped and recorded; the whole parse fails only
    /// when the input is not recognizable as this format at all.
    pub fn decode(&self, bytes: &[u8], encoding: &'static Encoding) -> Result<CaptionDocument, SubtitleError> {
        let (content, _, had_errors) = encoding.decode(bytes);
        if had_errors {
            warn!("Replacement characters while decoding as {}", encoding.name());
        }
        match self {
            SubtitleFormat::Srt => decode_srt(&content),
            SubtitleFormat::Vtt => decode_vtt(&content),
        }
    }

    /// Encode a caption document to bytes. Deterministic: encoding the
    /// result of decoding well-formed input reproduces equivalent timings
    /// and text.
    pub fn encode(&self, document: &CaptionDocument, encoding: &'static Encoding) -> Vec<u8> {
        let text = match self {
            SubtitleFormat::Srt => encode_srt(document),
            SubtitleFormat::Vtt => encode_vtt(document),
        };
        encoding.encode(&text).0.into_owned()
    }
}

impl std::fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Split a timing line on `-->`, yielding start text, end text and the
/// trailing opaque position/settings token if any.
fn split_timing_line(line: &str) -> Option<(&str, &str, Option<String>)> {
    let (left, right) = line.split_once("-->")?;
    let mut right_fields = right.split_whitespace();
    let end_text = right_fields.next()?;
    let settings: Vec<&str> = right_fields.collect();
    let position = if settings.is_empty() {
        None
    } else {
        Some(settings.join(" "))
    };
    Some((left.trim(), end_text, position))
}

fn decode_srt(content: &str) -> Result<CaptionDocument, SubtitleError> {
    let mut document = CaptionDocument::new();

    let mut current_seq: Option<usize> = None;
    let mut current_timing: Option<(TimeCode, TimeCode)> = None;
    let mut current_position: Option<String> = None;
    let mut current_text = String::new();
    let mut bad_timing: Option<DropReason> = None;
    let mut timing_lines_seen = 0usize;
    let mut block_ordinal = 0usize;

    // Finalize one cue block: either record the drop or validate and push
    let mut flush = |document: &mut CaptionDocument,
                     seq: &mut Option<usize>,
                     timing: &mut Option<(TimeCode, TimeCode)>,
                     position: &mut Option<String>,
                     text: &mut String,
                     bad: &mut Option<DropReason>,
                     ordinal: usize| {
        let source_index = seq.unwrap_or(ordinal);
        if let Some(reason) = bad.take() {
            document.record_drop(source_index, reason);
        } else if let Some((start, end)) = timing.take() {
            document.push_checked(source_index, start, end, text, position.take());
        }
        *seq = None;
        *timing = None;
        *position = None;
        text.clear();
    };

    for line in content.lines() {
        let trimmed = line.trim_start_matches('\u{feff}').trim();

        if trimmed.is_empty() {
            if current_timing.is_some() || bad_timing.is_some() {
                flush(
                    &mut document,
                    &mut current_seq,
                    &mut current_timing,
                    &mut current_position,
                    &mut current_text,
                    &mut bad_timing,
                    block_ordinal,
                );
            }
            continue;
        }

        // Sequence number starts a new block
        if current_timing.is_none() && bad_timing.is_none() && current_text.is_empty() {
            if let Ok(num) = trimmed.parse::<usize>() {
                current_seq = Some(num);
                continue;
            }
        }

        if trimmed.contains("-->") && current_timing.is_none() && bad_timing.is_none() {
            timing_lines_seen += 1;
            block_ordinal += 1;
            match split_timing_line(trimmed) {
                Some((start_text, end_text, position)) => {
                    match (TimeCode::parse_srt(start_text), TimeCode::parse_srt(end_text)) {
                        (Ok(start), Ok(end)) => {
                            current_timing = Some((start, end));
                            current_position = position;
                        }
                        _ => bad_timing = Some(DropReason::BadTimestamp(trimmed.to_string())),
                    }
                }
                None => bad_timing = Some(DropReason::BadTimestamp(trimmed.to_string())),
            }
            continue;
        }

        if current_timing.is_some() || bad_timing.is_some() {
            if !current_text.is_empty() {
                current_text.push('\n');
            }
            current_text.push_str(line.trim_end());
        } else {
            warn!("Unexpected text before timing line: {}", trimmed);
        }
    }

    flush(
        &mut document,
        &mut current_seq,
        &mut current_timing,
        &mut current_position,
        &mut current_text,
        &mut bad_timing,
        block_ordinal,
    );

    if timing_lines_seen == 0 {
        return Err(SubtitleError::MalformedDocument(
            "no SRT timestamp lines found".to_string(),
        ));
    }

    Ok(document)
}

fn decode_vtt(content: &str) -> Result<CaptionDocument, SubtitleError> {
    let content = content.trim_start_matches('\u{feff}');
    let mut lines = content.lines();

    match lines.next() {
        Some(header) if header.trim_end().starts_with("WEBVTT") => {}
        _ => {
            return Err(SubtitleError::MalformedDocument(
                "missing WEBVTT header".to_string(),
            ));
        }
    }

    let mut document = CaptionDocument::new();
    let mut cue_ordinal = 0usize;
    let mut block: Vec<&str> = Vec::new();

    let mut flush_block = |document: &mut CaptionDocument, block: &[&str], ordinal: &mut usize| {
        if block.is_empty() {
            return;
        }
        // Comment and styling blocks carry no cues
        let first = block[0].trim();
        if first.starts_with("NOTE") || first.starts_with("STYLE") || first.starts_with("REGION") {
            return;
        }

        let timing_idx = match block.iter().position(|l| l.contains("-->")) {
            Some(idx) => idx,
            None => return,
        };
        *ordinal += 1;

        let timing_line = block[timing_idx].trim();
        // Lines before the timing line form the optional cue identifier
        let identifier = if timing_idx > 0 {
            let id = block[..timing_idx].join("\n").trim().to_string();
            (!id.is_empty()).then_some(id)
        } else {
            None
        };
        match split_timing_line(timing_line) {
            Some((start_text, end_text, position)) => {
                match (TimeCode::parse_vtt(start_text), TimeCode::parse_vtt(end_text)) {
                    (Ok(start), Ok(end)) => {
                        let text = block[timing_idx + 1..].join("\n");
                        document.push_checked_with_identifier(
                            *ordinal, start, end, &text, identifier, position,
                        );
                    }
                    _ => document.record_drop(
                        *ordinal,
                        DropReason::BadTimestamp(timing_line.to_string()),
                    ),
                }
            }
            None => document.record_drop(
                *ordinal,
                DropReason::BadTimestamp(timing_line.to_string()),
            ),
        }
    };

    for line in lines {
        if line.trim().is_empty() {
            flush_block(&mut document, &block, &mut cue_ordinal);
            block.clear();
        } else {
            block.push(line);
        }
    }
    flush_block(&mut document, &block, &mut cue_ordinal);

    if cue_ordinal == 0 {
        return Err(SubtitleError::MalformedDocument(
            "no WebVTT cue timing lines found".to_string(),
        ));
    }

    Ok(document)
}

fn encode_srt(document: &CaptionDocument) -> String {
    let mut out = String::new();
    for (i, entry) in document.entries.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            entry.start.format_srt(),
            entry.end.format_srt(),
            entry.text
        ));
    }
    out
}

fn encode_vtt(document: &CaptionDocument) -> String {
    let mut out = String::from("WEBVTT\n\n");
    for entry in &document.entries {
        if let Some(identifier) = &entry.identifier {
            out.push_str(identifier);
            out.push('\n');
        }
        out.push_str(&format!(
            "{} --> {}",
            entry.start.format_vtt(),
            entry.end.format_vtt()
        ));
        if let Some(position) = &entry.position {
            out.push(' ');
            out.push_str(position);
        }
        out.push('\n');
        out.push_str(&entry.text);
        out.push_str("\n\n");
    }
    out
}
