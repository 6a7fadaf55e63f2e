use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::error;
use tokio::process::Command;

use crate::errors::ProbeError;

// @module: External media duration probe

/// Supplies the true duration of a media file. Probe failures are fatal to
/// the calling operation only; the engine never treats them as "in sync".
#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// Duration of the media file in milliseconds
    async fn duration_ms(&self, path: &Path) -> Result<u64, ProbeError>;
}

/// ffprobe-backed implementation of [`MediaProbe`]
pub struct FfprobeProbe {
    timeout: Duration,
}

impl FfprobeProbe {
    pub fn new() -> Self {
        FfprobeProbe {
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        FfprobeProbe { timeout }
    }
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
    async fn duration_ms(&self, path: &Path) -> Result<u64, ProbeError> {
        if !path.exists() {
            return Err(ProbeError::Failed(format!(
                "media file does not exist: {:?}",
                path
            )));
        }

        let ffprobe_future = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .output();

        // Guard against ffprobe hanging on problematic files
        let output = tokio::select! {
            result = ffprobe_future => {
                result.map_err(|e| ProbeError::Failed(format!("failed to execute ffprobe: {}", e)))?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(ProbeError::Failed(format!(
                    "ffprobe timed out after {} seconds", self.timeout.as_secs()
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("ffprobe failed: {}", stderr.trim());
            return Err(ProbeError::Failed(format!(
                "ffprobe exited with error: {}",
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let seconds: f64 = stdout
            .trim()
            .parse()
            .map_err(|_| ProbeError::Unavailable(format!("no duration in ffprobe output for {:?}", path)))?;

        let duration_ms = (seconds * 1000.0) as u64;
        if duration_ms == 0 {
            // A zero duration cannot anchor a relative sync check
            return Err(ProbeError::Unavailable(format!(
                "ffprobe reported zero duration for {:?}",
                path
            )));
        }

        Ok(duration_ms)
    }
}
