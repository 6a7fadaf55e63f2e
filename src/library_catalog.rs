use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, info};

use crate::errors::SubtitleError;
use crate::file_utils::FileManager;
use crate::subtitle_codec::SubtitleFormat;
use crate::subtitle_engine::SubtitleEngine;

// @module: Library boundary and subtitle delivery

/// Identifier of a media record in the surrounding library layer
pub type MediaId = i64;

/// Lookup boundary to the excluded library CRUD layer. The core never
/// queries storage directly; path resolution happens behind this trait.
#[async_trait]
pub trait LibraryCatalog: Send + Sync {
    /// Path of the media file for an id, if the media exists
    async fn media_path(&self, media_id: MediaId) -> Option<PathBuf>;

    /// Path of the best on-disk subtitle for an id and language, if any.
    /// May point at either a `.vtt` or a `.srt` file.
    async fn subtitle_path(&self, media_id: MediaId, language: &str) -> Option<PathBuf>;
}

/// External subtitle sourcing boundary. Network retrieval is a non-goal,
/// so the shipped implementation always reports unavailable.
#[async_trait]
pub trait SubtitleSource: Send + Sync {
    async fn fetch(&self, media_id: MediaId, language: &str) -> Result<PathBuf, SubtitleError>;
}

/// Stub [`SubtitleSource`] that never finds anything
pub struct NoopSubtitleSource;

#[async_trait]
impl SubtitleSource for NoopSubtitleSource {
    async fn fetch(&self, _media_id: MediaId, language: &str) -> Result<PathBuf, SubtitleError> {
        Err(SubtitleError::SubtitleNotFound {
            language: language.to_string(),
        })
    }
}

/// Caption payload ready to hand to the HTTP layer
#[derive(Debug, Clone)]
pub struct SubtitlePayload {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

/// Build the caption payload for a resolved subtitle path. WebVTT files are
/// served as-is; an SRT file is converted on demand (a pre-converted `.vtt`
/// sibling wins when present). The payload content type is always WebVTT.
pub fn deliver_subtitle(engine: &SubtitleEngine, path: &Path) -> Result<SubtitlePayload, SubtitleError> {
    let format = SubtitleFormat::from_extension(path)?;

    let vtt_bytes = match format {
        SubtitleFormat::Vtt => FileManager::read_bytes(path)?,
        SubtitleFormat::Srt => {
            let sibling = FileManager::sibling_with_extension(path, SubtitleFormat::Vtt.extension());
            if FileManager::file_exists(&sibling) {
                debug!("Serving pre-converted sibling {:?}", sibling);
                FileManager::read_bytes(&sibling)?
            } else {
                info!("Converting {:?} to WebVTT on demand", path);
                let document = engine.parse(path, None)?;
                engine.convert_format(&document, SubtitleFormat::Vtt.extension())?
            }
        }
    };

    let file_name = path
        .with_extension(SubtitleFormat::Vtt.extension())
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "subtitle.vtt".to_string());

    Ok(SubtitlePayload {
        bytes: vtt_bytes,
        content_type: SubtitleFormat::Vtt.content_type(),
        file_name,
    })
}

/// Resolve and deliver a subtitle for a media id and language: catalog
/// lookup first, then the external source stub, then `SubtitleNotFound`.
pub async fn fetch_subtitle(
    catalog: &dyn LibraryCatalog,
    source: &dyn SubtitleSource,
    engine: &SubtitleEngine,
    media_id: MediaId,
    language: &str,
) -> Result<SubtitlePayload, SubtitleError> {
    if let Some(path) = catalog.subtitle_path(media_id, language).await {
        return deliver_subtitle(engine, &path);
    }

    let fetched = source.fetch(media_id, language).await?;
    deliver_subtitle(engine, &fetched)
}
