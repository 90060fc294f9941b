//! Edit session: the working bytes of one view and the rules that keep the
//! raw text, the byte buffer and the dump rows in sync.

mod commit;
mod modal;

pub use commit::{commit, CommitContext, CommitOutcome, GENERIC_FAILURE};
pub use modal::{DiffEntry, EditModal};

use serde::Deserialize;
use tracing::{debug, trace};

use crate::buffer::{format_rows, render_text, BufferError, ByteBuffer, DumpRow};
use crate::codec::{self, HexCase};
use crate::config::Config;
use crate::http::{self, BOUNDARY};

/// 編集の単位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    /// バッファ全体を1つのHEX文字列として編集
    #[default]
    WholeBuffer,
    /// 行ごとに編集
    PerRow,
}

/// 表示範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// メッセージ全体（ヘッダ + ボディ）
    #[default]
    Message,
    /// ボディのみ
    Body,
}

/// 編集セッション
#[derive(Debug, Clone)]
pub struct EditSession {
    /// 編集中のバイト列
    buffer: ByteBuffer,
    /// バイト列から導出したダンプ行
    rows: Vec<DumpRow>,
    /// バッファ全体編集用のHEX文字列
    hex_text: String,
    /// ボディ表示時のヘッダ部（書き戻しで再結合する）
    head: Option<String>,
    max_chars: usize,
    case: HexCase,
    scope: Scope,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl EditSession {
    pub fn new(config: &Config) -> Self {
        let mut session = Self {
            buffer: ByteBuffer::new(),
            rows: Vec::new(),
            hex_text: String::new(),
            head: None,
            max_chars: config.max_chars,
            case: config.hex_case,
            scope: config.scope,
        };
        session.sync_from_buffer();
        session
    }

    /// 生テキストから読み込む（編集中の内容は破棄）
    pub fn load(&mut self, raw: &str) {
        let content = match self.scope {
            Scope::Message => {
                self.head = None;
                raw
            }
            Scope::Body => match http::split_message(raw) {
                Some((head, body)) => {
                    self.head = Some(head.to_string());
                    body
                }
                None => {
                    self.head = None;
                    raw
                }
            },
        };

        self.buffer = ByteBuffer::from_text(content, self.max_chars);
        debug!(
            bytes = self.buffer.len(),
            truncated = self.buffer.is_truncated(),
            scope = ?self.scope,
            "loaded raw text"
        );
        self.sync_from_buffer();
    }

    /// 表示範囲を切り替える（次の load から有効）
    pub fn set_scope(&mut self, scope: Scope) {
        self.scope = scope;
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// バッファ全体のHEX文字列を編集
    ///
    /// The text is kept as typed; the buffer is whatever the greedy parse of it
    /// yields.
    pub fn set_hex_text(&mut self, text: &str) {
        self.hex_text = text.to_string();
        self.buffer.replace(codec::parse_hex_greedy(text));
        trace!(bytes = self.buffer.len(), "whole-buffer edit");
        self.rows = format_rows(self.buffer.data(), self.case);
    }

    /// 1行分のHEX文字列を編集し、全行からバッファを再構築
    pub fn edit_row(&mut self, index: usize, hex: &str) -> Result<(), BufferError> {
        let count = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(BufferError::RowOutOfRange(index, count))?;
        row.set_hex(hex);

        let all_tokens = self
            .rows
            .iter()
            .flat_map(|row| row.hex_tokens.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        self.buffer.replace(codec::parse_hex_greedy(&all_tokens));
        debug!(row = index, bytes = self.buffer.len(), "row edit reconciled");
        self.sync_from_buffer();
        Ok(())
    }

    /// 行の編集を開始
    pub fn open_modal(&self, index: usize) -> Result<EditModal, BufferError> {
        self.rows
            .get(index)
            .map(|row| EditModal::open(index, row, self.case))
            .ok_or(BufferError::RowOutOfRange(index, self.rows.len()))
    }

    /// 編集内容を行に反映
    pub fn apply_modal(&mut self, modal: EditModal) -> Result<(), BufferError> {
        if modal.target_row >= self.rows.len() {
            return Err(BufferError::StaleEdit(modal.target_row));
        }
        self.edit_row(modal.target_row, &modal.current_hex)
    }

    /// ロード時の内容に戻す
    pub fn revert(&mut self) {
        self.buffer.revert();
        self.sync_from_buffer();
    }

    fn sync_from_buffer(&mut self) {
        self.rows = format_rows(self.buffer.data(), self.case);
        self.hex_text = codec::format_hex(self.buffer.data(), self.case);
    }

    pub fn buffer(&self) -> &ByteBuffer {
        &self.buffer
    }

    pub fn bytes(&self) -> &[u8] {
        self.buffer.data()
    }

    pub fn rows(&self) -> &[DumpRow] {
        &self.rows
    }

    pub fn hex_text(&self) -> &str {
        &self.hex_text
    }

    pub fn is_truncated(&self) -> bool {
        self.buffer.is_truncated()
    }

    pub fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    /// ボディ表示中にヘッダ部を保持しているか
    pub fn has_head(&self) -> bool {
        self.head.is_some()
    }

    /// 等幅テキストダンプ（切り詰め時は注記付き）
    pub fn dump_text(&self) -> String {
        let text = render_text(&self.rows);
        if self.is_truncated() {
            format!(
                "{}\n[truncated to {} characters]",
                text, self.max_chars
            )
        } else {
            text
        }
    }

    /// 書き戻し用の生テキスト（CRLF正規化前）
    pub fn to_raw_text(&self) -> String {
        let content = self.buffer.to_text();
        match &self.head {
            Some(head) => format!("{}{}{}", head, BOUNDARY, content),
            None => content,
        }
    }
}
