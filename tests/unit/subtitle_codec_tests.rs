/*!
 * Tests for the SRT and WebVTT codecs
 */

use encoding_rs::{UTF_8, WINDOWS_1252};
use substream::errors::SubtitleError;
use substream::subtitle_codec::SubtitleFormat;
use substream::subtitle_document::DropReason;

const FIVE_ENTRY_SRT: &str = r#"1
00:00:01,000 --> 00:00:04,000
First entry.

2
00:00:05,000 --> 00:00:09,000
Second entry.

3
00:00:10,000 --> 00:00:10,000
Third entry with zero duration.

4
00:00:12,000 --> 00:00:15,000
Fourth entry.

5
00:00:16,000 --> 00:00:20,000
Fifth entry.
"#;

/// Test codec selection from file extensions
#[test]
fn test_from_extension_withKnownExtensions_shouldSelectCodec() {
    assert_eq!(SubtitleFormat::from_extension("movie.srt").unwrap(), SubtitleFormat::Srt);
    assert_eq!(SubtitleFormat::from_extension("movie.VTT").unwrap(), SubtitleFormat::Vtt);
}

/// Test that an unrecognized extension fails before any byte is read
#[test]
fn test_from_extension_withUnknownExtension_shouldFail() {
    let err = SubtitleFormat::from_extension("movie.ass").unwrap_err();
    assert!(matches!(err, SubtitleError::UnsupportedFormat(_)));

    assert!(SubtitleFormat::from_extension("no_extension").is_err());
}

/// Test SRT decoding of a well-formed document
#[test]
fn test_decode_srt_withWellFormedInput_shouldParseAllEntries() {
    let content = "1\n00:00:01,000 --> 00:00:04,000\nHello there.\n\n2\n00:00:05,500 --> 00:00:09,250\nSecond line.\nWith a continuation.\n";
    let document = SubtitleFormat::Srt.decode(content.as_bytes(), UTF_8).unwrap();

    assert_eq!(document.len(), 2);
    assert_eq!(document.entries[0].start.ms(), 1_000);
    assert_eq!(document.entries[0].end.ms(), 4_000);
    assert_eq!(document.entries[0].text, "Hello there.");
    assert_eq!(document.entries[1].start.ms(), 5_500);
    assert_eq!(document.entries[1].end.ms(), 9_250);
    assert_eq!(document.entries[1].text, "Second line.\nWith a continuation.");
}

/// Test that a single zero-duration entry is skipped, not fatal
#[test]
fn test_decode_srt_withOneInvertedEntry_shouldSkipOnlyThatEntry() {
    let document = SubtitleFormat::Srt.decode(FIVE_ENTRY_SRT.as_bytes(), UTF_8).unwrap();

    assert_eq!(document.len(), 4);
    assert_eq!(document.dropped.len(), 1);
    assert_eq!(document.dropped[0].source_index, 3);
    assert!(matches!(
        document.dropped[0].reason,
        DropReason::InvertedTiming { start_ms: 10_000, end_ms: 10_000 }
    ));

    // Survivors are renumbered contiguously
    let indices: Vec<usize> = document.entries.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);
}

/// Test that input order is preserved even when times are not monotonic
#[test]
fn test_decode_srt_withOutOfOrderTimes_shouldPreserveInputOrder() {
    let content = "1\n00:01:00,000 --> 00:01:05,000\nLater.\n\n2\n00:00:10,000 --> 00:00:15,000\nEarlier.\n";
    let document = SubtitleFormat::Srt.decode(content.as_bytes(), UTF_8).unwrap();

    assert_eq!(document.entries[0].text, "Later.");
    assert_eq!(document.entries[1].text, "Earlier.");
}

/// Test that markup is stripped uniformly during decode
#[test]
fn test_decode_srt_withMarkup_shouldCleanText() {
    let content = "1\n00:00:01,000 --> 00:00:04,000\n<i>Emphasized</i> words\n";
    let document = SubtitleFormat::Srt.decode(content.as_bytes(), UTF_8).unwrap();
    assert_eq!(document.entries[0].text, "Emphasized words");
}

/// Test that input with no timestamp lines at all is a malformed document
#[test]
fn test_decode_srt_withNoTimestampLines_shouldFail() {
    let err = SubtitleFormat::Srt
        .decode(b"just some\nprose text\nwith no cues", UTF_8)
        .unwrap_err();
    assert!(matches!(err, SubtitleError::MalformedDocument(_)));
}

/// Test that an unparseable timing line is recorded as a drop
#[test]
fn test_decode_srt_withBadTimingLine_shouldRecordDrop() {
    let content = "1\n00:00:xx,000 --> 00:00:04,000\nBroken.\n\n2\n00:00:05,000 --> 00:00:09,000\nFine.\n";
    let document = SubtitleFormat::Srt.decode(content.as_bytes(), UTF_8).unwrap();

    assert_eq!(document.len(), 1);
    assert_eq!(document.entries[0].text, "Fine.");
    assert_eq!(document.dropped.len(), 1);
    assert!(matches!(document.dropped[0].reason, DropReason::BadTimestamp(_)));
}

/// Test SRT round-trip: timings exactly, text modulo whitespace
#[test]
fn test_encode_srt_thenDecode_shouldRoundTrip() {
    let original = SubtitleFormat::Srt.decode(FIVE_ENTRY_SRT.as_bytes(), UTF_8).unwrap();
    let encoded = SubtitleFormat::Srt.encode(&original, UTF_8);
    let reparsed = SubtitleFormat::Srt.decode(&encoded, UTF_8).unwrap();

    assert_eq!(original.len(), reparsed.len());
    assert!(reparsed.dropped.is_empty());
    for (a, b) in original.entries.iter().zip(reparsed.entries.iter()) {
        assert_eq!(a.start, b.start);
        assert_eq!(a.end, b.end);
        assert_eq!(a.text, b.text);
    }
}

/// Test WebVTT decoding with cue identifiers, settings and a NOTE block
#[test]
fn test_decode_vtt_withIdentifiersAndSettings_shouldParse() {
    let content = "WEBVTT\n\nNOTE this block is a comment\nand spans two lines\n\nintro\n00:00:01.000 --> 00:00:04.000 align:start line:0%\nFirst cue.\n\n00:05.000 --> 00:09.000\nSecond cue without hours.\n";
    let document = SubtitleFormat::Vtt.decode(content.as_bytes(), UTF_8).unwrap();

    assert_eq!(document.len(), 2);
    assert_eq!(document.entries[0].start.ms(), 1_000);
    assert_eq!(document.entries[0].identifier.as_deref(), Some("intro"));
    assert_eq!(document.entries[0].position.as_deref(), Some("align:start line:0%"));
    assert_eq!(document.entries[0].text, "First cue.");
    assert_eq!(document.entries[1].start.ms(), 5_000);
    assert_eq!(document.entries[1].end.ms(), 9_000);
    assert_eq!(document.entries[1].identifier, None);
}

/// Test that cue identifiers survive a WebVTT round trip
#[test]
fn test_encode_vtt_withCueIdentifier_shouldReEmitIdentifier() {
    let content = "WEBVTT\n\nintro\n00:00:01.000 --> 00:00:04.000\nFirst cue.\n";
    let document = SubtitleFormat::Vtt.decode(content.as_bytes(), UTF_8).unwrap();
    let encoded = String::from_utf8(SubtitleFormat::Vtt.encode(&document, UTF_8)).unwrap();

    assert!(encoded.contains("intro\n00:00:01.000 --> 00:00:04.000"));

    let reparsed = SubtitleFormat::Vtt.decode(encoded.as_bytes(), UTF_8).unwrap();
    assert_eq!(reparsed.entries[0].identifier.as_deref(), Some("intro"));
    assert_eq!(reparsed.entries[0].text, "First cue.");
}

/// Test that a missing WEBVTT header is a malformed document
#[test]
fn test_decode_vtt_withMissingHeader_shouldFail() {
    let content = "00:00:01.000 --> 00:00:04.000\nNo header.\n";
    let err = SubtitleFormat::Vtt.decode(content.as_bytes(), UTF_8).unwrap_err();
    assert!(matches!(err, SubtitleError::MalformedDocument(_)));
}

/// Test that a header with no cues at all is a malformed document
#[test]
fn test_decode_vtt_withHeaderButNoCues_shouldFail() {
    let err = SubtitleFormat::Vtt.decode(b"WEBVTT\n\nNOTE nothing here\n", UTF_8).unwrap_err();
    assert!(matches!(err, SubtitleError::MalformedDocument(_)));
}

/// Test WebVTT encoding always emits the hours field and cue settings
#[test]
fn test_encode_vtt_withSettings_shouldEmitHoursAndSettings() {
    let content = "WEBVTT\n\n00:05.000 --> 00:09.000 align:middle\nShort form in, long form out.\n";
    let document = SubtitleFormat::Vtt.decode(content.as_bytes(), UTF_8).unwrap();
    let encoded = String::from_utf8(SubtitleFormat::Vtt.encode(&document, UTF_8)).unwrap();

    assert!(encoded.starts_with("WEBVTT\n"));
    assert!(encoded.contains("00:00:05.000 --> 00:00:09.000 align:middle"));
}

/// Test cross-format conversion round-trip through both codecs
#[test]
fn test_decode_srt_thenEncodeVtt_shouldPreserveTimings() {
    let document = SubtitleFormat::Srt.decode(FIVE_ENTRY_SRT.as_bytes(), UTF_8).unwrap();
    let vtt_bytes = SubtitleFormat::Vtt.encode(&document, UTF_8);
    let reparsed = SubtitleFormat::Vtt.decode(&vtt_bytes, UTF_8).unwrap();

    assert_eq!(document.len(), reparsed.len());
    for (a, b) in document.entries.iter().zip(reparsed.entries.iter()) {
        assert_eq!(a.start, b.start);
        assert_eq!(a.end, b.end);
        assert_eq!(a.text, b.text);
    }
}

/// Test decoding legacy single-byte encoded input
#[test]
fn test_decode_srt_withWindows1252Bytes_shouldDecodeAccents() {
    let content = b"1\n00:00:01,000 --> 00:00:04,000\ncaf\xe9 au lait\n";
    let document = SubtitleFormat::Srt.decode(content, WINDOWS_1252).unwrap();
    assert_eq!(document.entries[0].text, "café au lait");
}

/// Test content types used for delivery
#[test]
fn test_content_type_withBothFormats_shouldMatchDeliveryTypes() {
    assert_eq!(SubtitleFormat::Vtt.content_type(), "text/vtt; charset=utf-8");
    assert_eq!(SubtitleFormat::Srt.content_type(), "application/x-subrip");
}
