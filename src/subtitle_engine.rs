use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::UTF_8;
use log::{debug, warn};

use crate::app_config::Config;
use crate::encoding_detector;
use crate::errors::SubtitleError;
use crate::file_utils::FileManager;
use crate::media_probe::MediaProbe;
use crate::subtitle_codec::SubtitleFormat;
use crate::subtitle_document::CaptionDocument;

// @module: Subtitle engine orchestration

/// Default allowed relative difference between media duration and caption
/// span during sync validation (5%)
pub const DEFAULT_SYNC_TOLERANCE: f64 = 0.05;

/// Orchestrates detect/decode, shift, convert and sync-validate operations.
/// Stateless apart from configuration; every operation produces a new value,
/// so concurrent calls on distinct inputs require no locking.
pub struct SubtitleEngine {
    default_encoding: Option<String>,
    sync_tolerance: f64,
}

impl SubtitleEngine {
    pub fn new() -> Self {
        SubtitleEngine {
            default_encoding: None,
            sync_tolerance: DEFAULT_SYNC_TOLERANCE,
        }
    }

    pub fn with_config(config: &Config) -> Self {
        SubtitleEngine {
            default_encoding: config.default_encoding.clone(),
            sync_tolerance: config.sync_tolerance,
        }
    }

    /// Override the sync tolerance ratio (must be in (0, 1])
    pub fn with_sync_tolerance(mut self, tolerance: f64) -> Self {
        self.sync_tolerance = tolerance;
        self
    }

    /// Parse a subtitle file into a caption document. The codec is chosen
    /// by extension; the encoding is detected from the file prefix when not
    /// supplied. All codec-level failures surface as `InvalidSubtitle`;
    /// an unrecognized extension is `UnsupportedFormat` before any read.
    pub fn parse(&self, path: &Path, encoding: Option<&str>) -> Result<CaptionDocument, SubtitleError> {
        let format = SubtitleFormat::from_extension(path)?;
        let bytes = fs::read(path)?;

        let label = encoding.or(self.default_encoding.as_deref());
        let resolved = encoding_detector::resolve(label, &bytes);
        debug!("Parsing {:?} as {} ({})", path, format, resolved.name());

        let document = format.decode(&bytes, resolved).map_err(|e| SubtitleError::InvalidSubtitle {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        if !document.dropped.is_empty() {
            warn!(
                "Parsed {:?}: {} entries kept, {} skipped",
                path,
                document.len(),
                document.dropped.len()
            );
        }
        Ok(document)
    }

    /// Shift every entry by `offset_ms`, clamping at zero. See
    /// [`CaptionDocument::shifted`] for the clamp policy.
    pub fn shift(&self, document: &CaptionDocument, offset_ms: i64) -> CaptionDocument {
        document.shifted(offset_ms)
    }

    /// Re-encode a document in the named target format. Fails with
    /// `UnsupportedFormat` for anything other than SRT or WebVTT; nothing
    /// is written anywhere.
    pub fn convert_format(&self, document: &CaptionDocument, target: &str) -> Result<Vec<u8>, SubtitleError> {
        let format = SubtitleFormat::from_name(target)?;
        Ok(format.encode(document, UTF_8))
    }

    /// Shift a subtitle file and write the result next to the input
    /// (`<stem>_shifted.<ext>`) unless an output path is given. Returns the
    /// path written.
    pub fn shift_file(
        &self,
        input: &Path,
        offset_ms: i64,
        output: Option<&Path>,
    ) -> Result<PathBuf, SubtitleError> {
        let format = SubtitleFormat::from_extension(input)?;
        let document = self.parse(input, None)?;
        let shifted = document.shifted(offset_ms);

        let output_path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| FileManager::shifted_output_path(input));

        // Encode fully before touching the filesystem so a failure leaves
        // no partial file and never disturbs the input
        let bytes = format.encode(&shifted, UTF_8);
        FileManager::write_bytes(&output_path, &bytes)?;
        Ok(output_path)
    }

    /// Convert a subtitle file to the named format, writing
    /// `<stem>.<target ext>` unless an output path is given. Returns the
    /// path written.
    pub fn convert_file(
        &self,
        input: &Path,
        target: &str,
        output: Option<&Path>,
    ) -> Result<PathBuf, SubtitleError> {
        let target_format = SubtitleFormat::from_name(target)?;
        let document = self.parse(input, None)?;

        let output_path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| FileManager::sibling_with_extension(input, target_format.extension()));

        let bytes = target_format.encode(&document, UTF_8);
        FileManager::write_bytes(&output_path, &bytes)?;
        Ok(output_path)
    }

    /// Time span covered by the document in milliseconds
    pub fn compute_duration(&self, document: &CaptionDocument) -> u64 {
        document.span_ms()
    }

    /// Check whether the document's span is consistent with the media
    /// duration. Out-of-sync is a normal `false`, never an error.
    pub fn validate_sync(&self, document: &CaptionDocument, media_duration_ms: u64) -> bool {
        if media_duration_ms == 0 {
            // Cannot anchor a relative check; only an empty document is
            // trivially consistent with a zero-length media file
            return document.is_empty();
        }

        let span = document.span_ms();
        let relative_diff =
            (media_duration_ms as f64 - span as f64).abs() / media_duration_ms as f64;

        if relative_diff > self.sync_tolerance {
            warn!(
                "Subtitle sync mismatch: {:.2}% (span {} ms vs media {} ms)",
                relative_diff * 100.0,
                span,
                media_duration_ms
            );
            return false;
        }
        true
    }

    /// Probe the media file for its duration and validate sync against it.
    /// A probe failure is `SyncValidationFailed` so callers can distinguish
    /// "could not check" from "checked and it's wrong".
    pub async fn validate_sync_with_probe(
        &self,
        probe: &dyn MediaProbe,
        document: &CaptionDocument,
        media_path: &Path,
    ) -> Result<bool, SubtitleError> {
        let media_duration_ms = probe.duration_ms(media_path).await?;
        Ok(self.validate_sync(document, media_duration_ms))
    }
}

impl Default for SubtitleEngine {
    fn default() -> Self {
        Self::new()
    }
}
