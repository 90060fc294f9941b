use crate::buffer::DumpRow;
use crate::codec::{self, HexCase};

/// 行編集の一時コピー
///
/// The hex and ASCII fields mirror each other as the user types. Nothing
/// reaches the session until the modal is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditModal {
    /// 編集対象の行
    pub target_row: usize,
    pub current_hex: String,
    /// 開いた時点のHEX
    pub original_hex: String,
    pub current_ascii: String,
    /// 開いた時点のASCII
    pub original_ascii: String,
    /// 再エンコード時のHEXの大文字/小文字
    pub case: HexCase,
}

/// 差分表示の1トークン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    pub index: usize,
    pub original: Option<String>,
    pub current: Option<String>,
}

impl DiffEntry {
    /// バイト値で比較（パースできないトークンは文字列で比較）
    pub fn changed(&self) -> bool {
        match (&self.original, &self.current) {
            (Some(original), Some(current)) => {
                match (codec::parse_token(original), codec::parse_token(current)) {
                    (Some(a), Some(b)) => a != b,
                    _ => original != current,
                }
            }
            (None, None) => false,
            _ => true,
        }
    }
}

impl EditModal {
    pub fn open(target_row: usize, row: &DumpRow, case: HexCase) -> Self {
        let hex = row.hex();
        Self {
            target_row,
            current_hex: hex.clone(),
            original_hex: hex,
            current_ascii: row.ascii_preview.clone(),
            original_ascii: row.ascii_preview.clone(),
            case,
        }
    }

    /// HEX欄の編集（ASCII欄を再計算）
    pub fn set_hex(&mut self, hex: &str) {
        self.current_hex = hex.to_string();
        self.current_ascii = codec::hex_to_ascii(hex);
    }

    /// ASCII欄の編集（現在のHEXを参照して '.' を元のバイトに戻す）
    pub fn set_ascii(&mut self, ascii: &str) {
        let hex = codec::ascii_to_hex(ascii, Some(&self.current_hex));
        self.current_hex = hex
            .split_whitespace()
            .map(|token| match codec::parse_token(token) {
                Some(byte) => codec::format_byte(byte, self.case),
                None => token.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ");
        self.current_ascii = ascii.to_string();
    }

    /// 位置ごとの比較（内容による位置合わせはしない）
    pub fn diff(&self) -> Vec<DiffEntry> {
        let original: Vec<&str> = self.original_hex.split_whitespace().collect();
        let current: Vec<&str> = self.current_hex.split_whitespace().collect();
        let longest = original.len().max(current.len());

        (0..longest)
            .map(|index| DiffEntry {
                index,
                original: original.get(index).map(|t| t.to_string()),
                current: current.get(index).map(|t| t.to_string()),
            })
            .collect()
    }

    /// 変更された位置
    pub fn changed_indices(&self) -> Vec<usize> {
        self.diff()
            .into_iter()
            .filter(DiffEntry::changed)
            .map(|entry| entry.index)
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.diff().iter().any(DiffEntry::changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::format_rows;
    use crate::codec::HexCase;
    use pretty_assertions::assert_eq;

    fn modal_for(bytes: &[u8]) -> EditModal {
        EditModal::open(0, &format_rows(bytes, HexCase::Lower)[0], HexCase::Lower)
    }

    #[test]
    fn open_snapshots_row() {
        let modal = modal_for(b"A\0B");
        assert_eq!(modal.original_hex, "41 00 42");
        assert_eq!(modal.original_ascii, "A.B");
        assert_eq!(modal.current_hex, modal.original_hex);
        assert!(!modal.is_dirty());
        assert!(modal.changed_indices().is_empty());
    }

    #[test]
    fn hex_edit_updates_ascii() {
        let mut modal = modal_for(b"A\0B");
        modal.set_hex("41 43 zz 42");
        assert_eq!(modal.current_ascii, "ACB");
        assert_eq!(modal.original_ascii, "A.B");
    }

    #[test]
    fn ascii_edit_keeps_hidden_bytes() {
        let mut modal = modal_for(b"A\0B");
        modal.set_ascii("Z.B");
        assert_eq!(modal.current_hex, "5a 00 42");
        assert_eq!(modal.changed_indices(), vec![0]);
    }

    #[test]
    fn ascii_edit_uses_current_hex_as_reference() {
        let mut modal = modal_for(b"ABC");
        modal.set_hex("41 ff 43");
        modal.set_ascii("A.C!");
        assert_eq!(modal.current_hex, "41 ff 43 21");
    }

    #[test]
    fn diff_is_positional() {
        let mut modal = modal_for(b"ABC");
        // 先頭に挿入すると以降すべてがずれる
        modal.set_hex("30 41 42 43");
        let diff = modal.diff();
        assert_eq!(diff.len(), 4);
        assert_eq!(modal.changed_indices(), vec![0, 1, 2, 3]);
        assert_eq!(
            diff[3],
            DiffEntry {
                index: 3,
                original: None,
                current: Some("43".to_string()),
            }
        );
    }

    #[test]
    fn upper_case_ascii_edit_flags_only_changed_bytes() {
        let rows = format_rows(b"JK\0", HexCase::Upper);
        let mut modal = EditModal::open(0, &rows[0], HexCase::Upper);
        modal.set_ascii("JK!");
        assert_eq!(modal.current_hex, "4A 4B 21");
        assert_eq!(modal.changed_indices(), vec![2]);

        modal.set_ascii("JK.");
        assert_eq!(modal.current_hex, "4A 4B 21");
        modal.set_hex("4a 4b 00");
        assert!(modal.changed_indices().is_empty());
        assert!(!modal.is_dirty());
    }
}
