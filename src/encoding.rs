//! Raw text <-> byte mapping.
//!
//! Raw HTTP text is treated as Latin-1: every character is one byte and every
//! byte is one character. Characters above U+00FF cannot be represented and are
//! encoded as `?`.

use std::borrow::Cow;

use encoding_rs::mem::{decode_latin1, encode_latin1_lossy, is_str_latin1};
use tracing::warn;

/// 変換前に適用する文字数の上限
pub const MAX_CHARS: usize = 10_240;

/// Latin-1で表現できない文字の置換先
const REPLACEMENT_BYTE: u8 = b'?';

/// 上限で切り詰めたテキスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CappedText<'a> {
    /// 切り詰め後のテキスト
    pub text: &'a str,
    /// 元のテキストが上限を超えていたか
    pub truncated: bool,
}

/// テキストを `max_chars` 文字で切り詰める
pub fn cap_text(text: &str, max_chars: usize) -> CappedText<'_> {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => CappedText {
            text: &text[..end],
            truncated: true,
        },
        None => CappedText {
            text,
            truncated: false,
        },
    }
}

/// テキストをバイト列に変換（1文字 = 1バイト）
pub fn encode_text(text: &str) -> Vec<u8> {
    if is_str_latin1(text) {
        return encode_latin1_lossy(text).into_owned();
    }

    warn!("text contains characters outside Latin-1; replacing with '?'");
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(REPLACEMENT_BYTE))
        .collect()
}

/// バイト列をテキストに戻す（1バイト = 1文字）
pub fn decode_bytes(bytes: &[u8]) -> Cow<'_, str> {
    decode_latin1(bytes)
}

/// 上限を適用してからバイト列に変換
pub fn encode_capped(text: &str, max_chars: usize) -> (Vec<u8>, bool) {
    let capped = cap_text(text, max_chars);
    (encode_text(capped.text), capped.truncated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cap_leaves_short_text_alone() {
        let capped = cap_text("GET / HTTP/1.1", 100);
        assert_eq!(capped.text, "GET / HTTP/1.1");
        assert!(!capped.truncated);
    }

    #[test]
    fn cap_exact_length_is_not_truncated() {
        let capped = cap_text("abcd", 4);
        assert_eq!(capped.text, "abcd");
        assert!(!capped.truncated);
    }

    #[test]
    fn cap_counts_characters_not_bytes() {
        let capped = cap_text("ééééé", 3);
        assert_eq!(capped.text, "ééé");
        assert!(capped.truncated);
    }

    #[test]
    fn default_cap_truncates_long_input() {
        let long = "A".repeat(MAX_CHARS + 5);
        let (bytes, truncated) = encode_capped(&long, MAX_CHARS);
        assert_eq!(bytes.len(), MAX_CHARS);
        assert!(truncated);
    }

    #[test]
    fn latin1_round_trip() {
        let bytes: Vec<u8> = (0..=255).collect();
        let text = decode_bytes(&bytes);
        assert_eq!(text.chars().count(), 256);
        assert_eq!(encode_text(&text), bytes);
    }

    #[test]
    fn non_latin1_becomes_question_mark() {
        assert_eq!(encode_text("a\u{3042}b"), b"a?b".to_vec());
    }
}
