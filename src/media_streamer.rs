use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use bytes::Bytes;
use log::debug;

use crate::app_config::Config;
use crate::errors::StreamError;

// @module: Byte-range plan computation and chunked file delivery

/// Baseline chunk size for media delivery (1 MiB)
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// How a request will be served, selected once per request from the file
/// size and the optional Range header. No further transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServePlan {
    /// Serve the whole file, status OK
    FullContent {
        /// Total file size in bytes
        size: u64,
    },
    /// Serve `[start, end]` inclusive, status Partial Content
    PartialContent {
        start: u64,
        end: u64,
        size: u64,
    },
}

impl ServePlan {
    /// Compute the plan for an optional `bytes=<start>-<end>` header value
    /// against a known file size.
    ///
    /// An omitted end means "to EOF" (`end = size - 1`); an explicit end
    /// past EOF is rejected, not clamped. The suffix form `bytes=-N`
    /// requests the last N bytes.
    pub fn from_range_header(header: Option<&str>, size: u64) -> Result<Self, StreamError> {
        let header = match header {
            None => return Ok(ServePlan::FullContent { size }),
            Some(h) => h,
        };

        let invalid = || StreamError::InvalidRange {
            header: header.to_string(),
            size,
        };

        let spec = header.trim().strip_prefix("bytes=").ok_or_else(invalid)?;
        let (start_text, end_text) = spec.split_once('-').ok_or_else(invalid)?;
        let (start_text, end_text) = (start_text.trim(), end_text.trim());

        let (start, end) = match (start_text.is_empty(), end_text.is_empty()) {
            // bytes=-500 (last 500 bytes)
            (true, false) => {
                let suffix_len: u64 = end_text.parse().map_err(|_| invalid())?;
                if suffix_len == 0 || size == 0 {
                    return Err(invalid());
                }
                (size.saturating_sub(suffix_len), size - 1)
            }
            // bytes=500- (from 500 to EOF)
            (false, true) => {
                let start: u64 = start_text.parse().map_err(|_| invalid())?;
                if start >= size {
                    return Err(invalid());
                }
                (start, size - 1)
            }
            // bytes=200-499
            (false, false) => {
                let start: u64 = start_text.parse().map_err(|_| invalid())?;
                let end: u64 = end_text.parse().map_err(|_| invalid())?;
                if start > end || start >= size || end >= size {
                    return Err(invalid());
                }
                (start, end)
            }
            // bytes=-
            (true, true) => return Err(invalid()),
        };

        Ok(ServePlan::PartialContent { start, end, size })
    }

    /// HTTP status for this plan (200 or 206)
    pub fn status(&self) -> u16 {
        match self {
            ServePlan::FullContent { .. } => 200,
            ServePlan::PartialContent { .. } => 206,
        }
    }

    /// Number of bytes this plan will deliver
    pub fn content_length(&self) -> u64 {
        match self {
            ServePlan::FullContent { size } => *size,
            ServePlan::PartialContent { start, end, .. } => end - start + 1,
        }
    }

    /// `Content-Range: bytes start-end/size` descriptor, only for partial
    /// plans. Produced bit-exact for interoperability with media clients.
    pub fn content_range(&self) -> Option<String> {
        match self {
            ServePlan::FullContent { .. } => None,
            ServePlan::PartialContent { start, end, size } => {
                Some(format!("bytes {}-{}/{}", start, end, size))
            }
        }
    }

    /// First byte offset to read
    pub fn offset(&self) -> u64 {
        match self {
            ServePlan::FullContent { .. } => 0,
            ServePlan::PartialContent { start, .. } => *start,
        }
    }
}

/// Lazy, finite, non-restartable sequence of byte chunks covering exactly
/// the planned range. The consumer drives pacing, so a slow downstream
/// socket reads no more file data than it has written; dropping the stream
/// stops further reads and closes the file handle.
pub struct ChunkStream {
    file: File,
    remaining: u64,
    chunk_size: usize,
}

impl ChunkStream {
    /// Open the file and seek to the plan's start offset.
    pub fn open(path: &Path, plan: &ServePlan) -> Result<Self, StreamError> {
        Self::open_with_chunk_size(path, plan, DEFAULT_CHUNK_SIZE)
    }

    /// [`open`](Self::open) with the chunk size taken from configuration.
    pub fn open_with_config(
        path: &Path,
        plan: &ServePlan,
        config: &Config,
    ) -> Result<Self, StreamError> {
        Self::open_with_chunk_size(path, plan, config.chunk_size)
    }

    pub fn open_with_chunk_size(
        path: &Path,
        plan: &ServePlan,
        chunk_size: usize,
    ) -> Result<Self, StreamError> {
        let mut file = File::open(path)?;
        file.seek(SeekFrom::Start(plan.offset()))?;
        debug!(
            "Streaming {:?}: {} bytes from offset {}",
            path,
            plan.content_length(),
            plan.offset()
        );
        Ok(ChunkStream {
            file,
            remaining: plan.content_length(),
            chunk_size: chunk_size.max(1),
        })
    }
}

impl Iterator for ChunkStream {
    type Item = Result<Bytes, std::io::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let to_read = self.remaining.min(self.chunk_size as u64) as usize;
        let mut buf = vec![0u8; to_read];
        match self.file.read(&mut buf) {
            // File ended before the requested range did; stop cleanly
            Ok(0) => {
                self.remaining = 0;
                None
            }
            Ok(n) => {
                buf.truncate(n);
                self.remaining -= n as u64;
                Some(Ok(Bytes::from(buf)))
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }
}
