use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use log::debug;

// @module: Best-effort charset sniffing

/// How much of the file prefix participates in detection
pub const SNIFF_LEN: usize = 1024;

/// Sniff a character encoding from up to the first [`SNIFF_LEN`] bytes of a
/// file. Never fails: when detection is ambiguous the answer is UTF-8.
/// Pure function over the byte buffer.
pub fn detect(prefix: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(prefix) {
        return encoding;
    }

    let window = &prefix[..prefix.len().min(SNIFF_LEN)];
    if window.is_empty() {
        return UTF_8;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(window, true);
    let guess = detector.guess(None, true);
    debug!("Detected encoding {} from {} byte prefix", guess.name(), window.len());
    guess
}

/// Resolve a caller-supplied encoding label, falling back to detection when
/// the label is absent or unknown.
pub fn resolve(label: Option<&str>, prefix: &[u8]) -> &'static Encoding {
    match label {
        Some(name) => Encoding::for_label(name.as_bytes()).unwrap_or_else(|| {
            debug!("Unknown encoding label '{}', falling back to detection", name);
            detect(prefix)
        }),
        None => detect(prefix),
    }
}
