//! Hex token / ASCII preview / byte conversions.
//!
//! None of these functions fail: tokens that do not parse as a byte are
//! dropped, so the output can be shorter than the input.

use serde::Deserialize;

/// HEXトークンの大文字/小文字
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HexCase {
    #[default]
    Lower,
    /// 編集セル表示用
    Upper,
}

/// 表示可能なASCII範囲
pub fn is_printable(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}

/// ASCIIプレビュー用の文字（表示不可能なバイトは '.'）
pub fn display_char(byte: u8) -> char {
    if is_printable(byte) {
        byte as char
    } else {
        '.'
    }
}

/// 1バイトを2桁のHEXトークンに変換
pub fn format_byte(byte: u8, case: HexCase) -> String {
    match case {
        HexCase::Lower => format!("{:02x}", byte),
        HexCase::Upper => format!("{:02X}", byte),
    }
}

/// バイト列をスペース区切りのHEXトークン列に変換
pub fn format_hex(bytes: &[u8], case: HexCase) -> String {
    bytes
        .iter()
        .map(|&b| format_byte(b, case))
        .collect::<Vec<_>>()
        .join(" ")
}

/// 2桁のHEXトークンをパース（大文字/小文字は問わない）
pub fn parse_token(token: &str) -> Option<u8> {
    let mut chars = token.chars();
    let hi = chars.next()?.to_digit(16)?;
    let lo = chars.next()?.to_digit(16)?;
    if chars.next().is_some() {
        return None;
    }
    Some(((hi << 4) | lo) as u8)
}

/// 空白区切りのHEXトークン列をバイト列に変換（不正なトークンは捨てる）
pub fn hex_tokens_to_bytes(hex: &str) -> Vec<u8> {
    hex.split_whitespace().filter_map(parse_token).collect()
}

/// HEXトークン列からASCIIプレビューを生成
pub fn hex_to_ascii(hex: &str) -> String {
    hex_tokens_to_bytes(hex).into_iter().map(display_char).collect()
}

/// ASCII文字列をHEXトークン列に変換
///
/// A `.` may stand for a byte that was not printable. When `original_hex` has a
/// token at the same position, that token is reused so the byte survives the
/// round trip; otherwise `.` encodes as `2e`.
pub fn ascii_to_hex(ascii: &str, original_hex: Option<&str>) -> String {
    let original: Vec<&str> = original_hex
        .map(|hex| hex.split_whitespace().collect())
        .unwrap_or_default();

    ascii
        .chars()
        .enumerate()
        .map(|(i, c)| match original.get(i) {
            Some(token) if c == '.' => token.to_ascii_lowercase(),
            _ => {
                // Latin-1外の文字は '?' として扱う
                let byte = u8::try_from(u32::from(c)).unwrap_or(b'?');
                format_byte(byte, HexCase::Lower)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 空白を除去したHEX文字列を2文字ずつ貪欲にパース
///
/// A window that is not a valid byte is dropped rather than replaced, so every
/// later byte boundary shifts. A trailing single digit is dropped as well.
pub fn parse_hex_greedy(text: &str) -> Vec<u8> {
    let digits: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    digits
        .chunks(2)
        .filter_map(|window| match window {
            [hi, lo] => {
                let value = (hi.to_digit(16)? << 4) | lo.to_digit(16)?;
                Some(value as u8)
            }
            _ => None,
        })
        .collect()
}
