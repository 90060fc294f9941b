//! Fixed-width hex dump layout.
//!
//! A row is `offset  hex-tokens  ascii`: an 8 digit offset, up to 16 two digit
//! hex tokens and one preview character per token.

use crate::codec::{self, HexCase};

/// 1行あたりのバイト数
pub const BYTES_PER_ROW: usize = 16;

/// テキスト表示でのHEX列の幅（16トークン × 3）
pub const HEX_COLUMN_WIDTH: usize = BYTES_PER_ROW * 3;

/// データがない場合の表示
pub const NO_DATA: &str = "(no data)";

/// ダンプの1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpRow {
    /// 8桁のオフセット
    pub offset_label: String,
    /// 2桁のHEXトークン（最大16個）
    pub hex_tokens: Vec<String>,
    /// HEXトークンと同じ長さのASCIIプレビュー
    pub ascii_preview: String,
}

impl DumpRow {
    fn from_chunk(offset: usize, chunk: &[u8], case: HexCase) -> Self {
        Self {
            offset_label: format!("{:08x}", offset),
            hex_tokens: chunk.iter().map(|&b| codec::format_byte(b, case)).collect(),
            ascii_preview: chunk.iter().map(|&b| codec::display_char(b)).collect(),
        }
    }

    /// 空バッファ用の番兵行
    pub fn placeholder() -> Self {
        Self {
            offset_label: format!("{:08x}", 0),
            hex_tokens: Vec::new(),
            ascii_preview: String::new(),
        }
    }

    /// 番兵行かどうか
    pub fn is_placeholder(&self) -> bool {
        self.hex_tokens.is_empty()
    }

    /// スペース区切りのHEX文字列
    pub fn hex(&self) -> String {
        self.hex_tokens.join(" ")
    }

    /// HEX文字列を置き換え、ASCIIプレビューを再計算
    pub fn set_hex(&mut self, hex: &str) {
        self.hex_tokens = hex.split_whitespace().map(str::to_string).collect();
        self.ascii_preview = codec::hex_to_ascii(hex);
    }

    /// 1行分のテキスト
    pub fn to_line(&self) -> String {
        if self.is_placeholder() {
            return format!("{}  {}", self.offset_label, NO_DATA);
        }
        format!(
            "{}  {:<width$}{}",
            self.offset_label,
            self.hex(),
            self.ascii_preview,
            width = HEX_COLUMN_WIDTH
        )
    }
}

/// バイト列を16バイトごとの行に分割
pub fn format_rows(bytes: &[u8], case: HexCase) -> Vec<DumpRow> {
    if bytes.is_empty() {
        return vec![DumpRow::placeholder()];
    }
    bytes
        .chunks(BYTES_PER_ROW)
        .enumerate()
        .map(|(i, chunk)| DumpRow::from_chunk(i * BYTES_PER_ROW, chunk, case))
        .collect()
}

/// 等幅表示用のテキストダンプ
pub fn render_text(rows: &[DumpRow]) -> String {
    rows.iter()
        .map(DumpRow::to_line)
        .collect::<Vec<_>>()
        .join("\n")
}
