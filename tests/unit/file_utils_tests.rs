/*!
 * Tests for file and path utilities
 */

use anyhow::Result;
use std::path::Path;
use substream::file_utils::FileManager;

use crate::common;

/// Test derived output path for shifted subtitles
#[test]
fn test_shifted_output_path_withSrtInput_shouldAppendSuffix() {
    let path = FileManager::shifted_output_path("/library/movie.srt");
    assert_eq!(path, Path::new("/library/movie_shifted.srt"));
}

/// Test sibling path derivation for on-demand conversion
#[test]
fn test_sibling_with_extension_withSrtInput_shouldSwapExtension() {
    let path = FileManager::sibling_with_extension("/subs/42/en.srt", "vtt");
    assert_eq!(path, Path::new("/subs/42/en.vtt"));
}

/// Test write creates parent directories and read returns the same bytes
#[test]
fn test_write_bytes_withNestedPath_shouldCreateParentsAndRoundTrip() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("nested/deeper/out.srt");

    FileManager::write_bytes(&path, b"payload")?;
    assert!(FileManager::file_exists(&path));
    assert_eq!(FileManager::read_bytes(&path)?, b"payload");
    Ok(())
}
