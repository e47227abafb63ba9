//! Response post-processing.
//!
//! Model answers are formatted as markdown, which reads poorly in a plain
//! terminal or output panel.  [`clean`] strips the emphasis markup and then
//! drops sentences that repeat verbatim.  The repeat check is a heuristic for
//! one failure mode (the same text delivered twice), not a general
//! deduplication algorithm: only exact repeats longer than
//! [`DEDUP_MIN_CHARS`] UTF-16 code units are removed, so a sentence of
//! emoji or other astral-plane characters reaches the limit at half the
//! character count.

use std::sync::LazyLock;

use regex::Regex;

/// Segments this long or shorter, in UTF-16 code units, are never treated
/// as duplicates.
pub const DEDUP_MIN_CHARS: usize = 10;

/// Characters that end a sentence-like segment.
const SENTENCE_TERMINATORS: &[char] = &['。', '！', '？', '.', '!', '?'];

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*").expect("valid regex"));
static STAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*").expect("valid regex"));
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]*)`").expect("valid regex"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));

/// Cleans a raw model response for display.
///
/// Deterministic; not guaranteed to be idempotent.
pub fn clean(raw: &str) -> String {
    let text = BOLD.replace_all(raw, "");
    let text = STAR.replace_all(&text, "•");
    let text = INLINE_CODE.replace_all(&text, "'$1'");
    let text = BLANK_LINES.replace_all(&text, "\n");
    dedup_sentences(text.trim())
}

/// Splits `text` after each terminator, yielding the terminators as their
/// own segments and skipping whitespace-only segments.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        if SENTENCE_TERMINATORS.contains(&ch) {
            segments.push(&text[start..idx]);
            let end = idx + ch.len_utf8();
            segments.push(&text[idx..end]);
            start = end;
        }
    }
    segments.push(&text[start..]);
    segments.retain(|segment| !segment.trim().is_empty());
    segments
}

fn dedup_sentences(text: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    for segment in split_sentences(text) {
        if is_long(segment) {
            let repeated = kept
                .iter()
                .any(|prev| is_long(prev) && prev.trim() == segment.trim());
            if repeated {
                continue;
            }
        }
        kept.push(segment);
    }
    kept.concat()
}

fn is_long(segment: &str) -> bool {
    segment.encode_utf16().count() > DEDUP_MIN_CHARS
}
