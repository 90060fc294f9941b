use crate::encoding;

/// 編集対象のバイト列（ロード時のスナップショット付き）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    /// ロード時のデータ
    original: Vec<u8>,
    /// 編集中のデータ
    data: Vec<u8>,
    /// 入力が上限で切り詰められたか
    truncated: bool,
}

impl ByteBuffer {
    /// 空のバッファを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// バイト列から作成
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            original: data.clone(),
            data,
            truncated: false,
        }
    }

    /// 生テキストから作成（`max_chars` 文字で切り詰め）
    pub fn from_text(text: &str, max_chars: usize) -> Self {
        let (data, truncated) = encoding::encode_capped(text, max_chars);
        Self {
            original: data.clone(),
            data,
            truncated,
        }
    }

    /// データの長さを取得
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// データが空かどうか
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 指定位置のバイトを取得
    pub fn get(&self, pos: usize) -> Option<u8> {
        self.data.get(pos).copied()
    }

    /// 指定範囲のバイト列を取得
    pub fn get_range(&self, start: usize, end: usize) -> Option<&[u8]> {
        if start <= end && end <= self.data.len() {
            Some(&self.data[start..end])
        } else {
            None
        }
    }

    /// 編集結果でデータ全体を置き換える
    pub fn replace(&mut self, data: Vec<u8>) {
        self.data = data;
    }

    /// ロード時のデータに戻す
    pub fn revert(&mut self) {
        self.data = self.original.clone();
    }

    /// 変更されているかどうか
    pub fn is_modified(&self) -> bool {
        self.data != self.original
    }

    /// ロード時と値が異なる位置（長さが変わった分の位置も含む）
    pub fn changed_offsets(&self) -> Vec<usize> {
        let longest = self.data.len().max(self.original.len());
        (0..longest)
            .filter(|&i| self.data.get(i) != self.original.get(i))
            .collect()
    }

    /// 切り詰められたかどうか
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// テキストに戻す
    pub fn to_text(&self) -> String {
        encoding::decode_bytes(&self.data).into_owned()
    }

    /// 生データへの参照を取得
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// ロード時のデータへの参照を取得
    pub fn original(&self) -> &[u8] {
        &self.original
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_text_reports_truncation() {
        let buffer = ByteBuffer::from_text("abcdef", 4);
        assert_eq!(buffer.data(), b"abcd");
        assert!(buffer.is_truncated());

        let buffer = ByteBuffer::from_text("abcd", 4);
        assert!(!buffer.is_truncated());
    }

    #[test]
    fn tracks_modifications_against_snapshot() {
        let mut buffer = ByteBuffer::from_bytes(vec![1, 2, 3]);
        assert!(!buffer.is_modified());

        buffer.replace(vec![1, 9, 3, 4]);
        assert!(buffer.is_modified());
        assert_eq!(buffer.changed_offsets(), vec![1, 3]);
        assert_eq!(buffer.original(), &[1u8, 2, 3]);

        buffer.revert();
        assert!(!buffer.is_modified());
        assert!(buffer.changed_offsets().is_empty());
    }

    #[test]
    fn range_access() {
        let buffer = ByteBuffer::from_bytes(b"hello".to_vec());
        assert_eq!(buffer.get(1), Some(b'e'));
        assert_eq!(buffer.get(5), None);
        assert_eq!(buffer.get_range(1, 3), Some(&b"el"[..]));
        assert_eq!(buffer.get_range(3, 9), None);
    }

    #[test]
    fn text_round_trip() {
        let raw = "GET / HTTP/1.1\r\n\r\n\u{e9}\u{ff}";
        assert_eq!(ByteBuffer::from_text(raw, 1024).to_text(), raw);
    }
}
