use std::path::{Path, PathBuf};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use tracing::debug;

use super::{Action, FileWriteBack, KeyMod, PrefixKey, StatusToast};
use crate::config::Config;
use crate::encoding;
use crate::host::{Severity, ViewBinding};
use crate::http;
use crate::session::{CommitContext, CommitOutcome, EditMode, Scope};
use crate::ui::{Colors, DumpView, ModalField, ModalView};

/// ビューアの状態
pub struct App {
    /// ホストとの接続
    binding: ViewBinding,
    /// 書き戻し先ファイル
    path: Option<PathBuf>,
    /// 編集の単位
    edit_mode: EditMode,
    /// 選択行
    selected: usize,
    /// 表示開始行
    top: usize,
    /// 表示可能な行数
    visible_rows: usize,
    /// プレフィックスキー状態（C-x等）
    prefix_key: PrefixKey,
    /// 行編集で入力中の欄
    field: ModalField,
    /// バッファ全体編集の入力内容
    hex_prompt: Option<String>,
    /// 終了フラグ
    should_quit: bool,
    /// ステータスメッセージ
    status_message: Option<(String, Severity)>,
}

impl App {
    /// 新しいアプリケーションを作成
    pub fn new(config: &Config, context: CommitContext) -> Self {
        Self {
            binding: ViewBinding::new(config, context),
            path: None,
            edit_mode: config.edit_mode,
            selected: 0,
            top: 0,
            visible_rows: 24,
            prefix_key: PrefixKey::None,
            field: ModalField::Hex,
            hex_prompt: None,
            should_quit: false,
            status_message: None,
        }
    }

    /// ファイルを開く（1バイト = 1文字として読む）
    pub fn open(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let bytes = std::fs::read(&path)?;
        self.load_text(&encoding::decode_bytes(&bytes));
        self.path = Some(path);
        Ok(())
    }

    /// 生テキストを読み込む（標準入力用）
    pub fn load_text(&mut self, raw: &str) {
        self.binding.on_raw_text(raw);
        self.selected = 0;
        self.top = 0;
        if self.binding.session().is_truncated() {
            self.set_status("Message truncated for display", Severity::Warning);
        }
    }

    /// 終了すべきかどうか
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// ファイル名を取得
    pub fn filename(&self) -> Option<&str> {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|s| s.to_str())
    }

    /// 変更されているかどうか
    pub fn is_modified(&self) -> bool {
        self.binding.session().is_modified()
    }

    pub fn binding(&self) -> &ViewBinding {
        &self.binding
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn hex_prompt(&self) -> Option<&str> {
        self.hex_prompt.as_deref()
    }

    pub fn status_message(&self) -> Option<&(String, Severity)> {
        self.status_message.as_ref()
    }

    /// 表示可能行数を設定
    pub fn set_visible_rows(&mut self, rows: usize) {
        self.visible_rows = rows.max(1);
        self.ensure_row_visible();
    }

    fn set_status(&mut self, message: &str, severity: Severity) {
        self.status_message = Some((message.to_string(), severity));
    }

    fn row_count(&self) -> usize {
        self.binding.session().rows().len()
    }

    /// 選択行が表示範囲内になるようにスクロール
    fn ensure_row_visible(&mut self) {
        self.selected = self.selected.min(self.row_count().saturating_sub(1));
        if self.selected < self.top {
            self.top = self.selected;
        } else if self.selected >= self.top + self.visible_rows {
            self.top = self.selected + 1 - self.visible_rows;
        }
    }

    fn move_rows(&mut self, delta: isize) {
        self.selected = self.selected.saturating_add_signed(delta);
        self.ensure_row_visible();
    }

    /// 編集開始（行編集 or バッファ全体編集）
    fn start_edit(&mut self) {
        match self.edit_mode {
            EditMode::PerRow => match self.binding.open_modal(self.selected) {
                Ok(_) => self.field = ModalField::Hex,
                Err(e) => self.set_status(&e.to_string(), Severity::Error),
            },
            EditMode::WholeBuffer => {
                self.hex_prompt = Some(self.binding.session().hex_text().to_string());
            }
        }
    }

    /// 表示範囲を切り替え（未保存の編集は破棄）
    fn toggle_scope(&mut self) {
        let scope = match self.binding.session().scope() {
            Scope::Message => Scope::Body,
            Scope::Body => Scope::Message,
        };
        self.binding.set_scope(scope);
        self.selected = 0;
        self.top = 0;
        let label = match scope {
            Scope::Message => "Showing whole message",
            Scope::Body => "Showing body only",
        };
        self.set_status(label, Severity::Info);
    }

    /// 書き戻し（C-x C-s）
    fn save(&mut self) {
        let Some(path) = self.path.clone() else {
            self.set_status("No file path set", Severity::Warning);
            return;
        };

        let mut sink = FileWriteBack::new(path);
        let mut toast = StatusToast::default();
        let outcome = self.binding.commit(&mut sink, &mut toast);
        if let CommitOutcome::Committed(raw) = outcome {
            // 保存した内容を新しい基準として読み直す
            self.binding.on_raw_text(&raw);
            self.ensure_row_visible();
        }
        self.status_message = toast.last;
    }

    /// アクションを実行
    fn execute(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Save => self.save(),
            Action::RowUp => self.move_rows(-1),
            Action::RowDown => self.move_rows(1),
            Action::PageUp => self.move_rows(-(self.visible_rows as isize)),
            Action::PageDown => self.move_rows(self.visible_rows as isize),
            Action::GotoBeginning => self.move_rows(isize::MIN),
            Action::GotoEnd => self.move_rows(isize::MAX),
            Action::StartEdit => self.start_edit(),
            Action::ToggleScope => self.toggle_scope(),
            Action::Revert => {
                self.binding.revert();
                self.ensure_row_visible();
                self.set_status("Reverted", Severity::Info);
            }
            Action::EnterCtrlX => self.prefix_key = PrefixKey::CtrlX,
            Action::Cancel => self.status_message = None,
            Action::None => {}
        }
    }

    /// 行編集中のキー処理
    fn handle_modal_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.binding.cancel_modal();
            }
            KeyCode::Char('g') if ctrl => {
                self.binding.cancel_modal();
            }
            KeyCode::Enter => {
                if let Err(e) = self.binding.apply_modal() {
                    self.set_status(&e.to_string(), Severity::Error);
                }
                self.ensure_row_visible();
            }
            KeyCode::Tab => {
                self.field = match self.field {
                    ModalField::Hex => ModalField::Ascii,
                    ModalField::Ascii => ModalField::Hex,
                };
            }
            KeyCode::Backspace => self.edit_modal_field(|text| {
                text.pop();
            }),
            KeyCode::Char(c) if !ctrl => self.edit_modal_field(|text| text.push(c)),
            _ => {}
        }
    }

    /// 入力中の欄を書き換え、もう一方の欄を同期
    fn edit_modal_field(&mut self, edit: impl FnOnce(&mut String)) {
        let field = self.field;
        let Some(modal) = self.binding.modal_mut() else {
            return;
        };
        match field {
            ModalField::Hex => {
                let mut text = modal.current_hex.clone();
                edit(&mut text);
                modal.set_hex(&text);
            }
            ModalField::Ascii => {
                let mut text = modal.current_ascii.clone();
                edit(&mut text);
                modal.set_ascii(&text);
            }
        }
    }

    /// バッファ全体編集中のキー処理（入力のたびに反映）
    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.hex_prompt = None;
                return;
            }
            KeyCode::Char('g') if ctrl => {
                self.hex_prompt = None;
                return;
            }
            _ => {}
        }

        let Some(prompt) = self.hex_prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Backspace => {
                prompt.pop();
            }
            KeyCode::Char(c) if !ctrl => prompt.push(c),
            _ => return,
        }
        let text = prompt.clone();
        self.binding.set_hex_text(&text);
        self.ensure_row_visible();
    }

    /// キー入力を処理
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.binding.modal().is_some() {
            self.handle_modal_key(key);
            return;
        }
        if self.hex_prompt.is_some() {
            self.handle_prompt_key(key);
            return;
        }

        let mods = KeyMod {
            ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
            shift: key.modifiers.contains(KeyModifiers::SHIFT),
            alt: key.modifiers.contains(KeyModifiers::ALT),
        };
        let action = match self.prefix_key {
            PrefixKey::CtrlX => {
                self.prefix_key = PrefixKey::None;
                Action::from_key_after_ctrl_x(key.code, mods)
            }
            PrefixKey::None => Action::from_key(key.code, mods),
        };
        debug!(?action, "key");
        self.execute(action);
    }

    /// イベントを1つ処理
    pub fn handle_event(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                // ペーストイベント（Bracketed Paste Mode）
                Event::Paste(content) => {
                    for c in content.chars().filter(|c| !c.is_control()) {
                        self.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
                    }
                }
                Event::Key(key) => self.handle_key(key),
                _ => {}
            }
        }
        Ok(())
    }

    /// ステータスバーの文字列
    fn status_line(&self) -> (String, Color) {
        if let Some(prompt) = &self.hex_prompt {
            return (format!("Hex: {}_", prompt), Colors::HEX_NORMAL);
        }
        if let Some((message, severity)) = &self.status_message {
            let color = match severity {
                Severity::Success => Colors::HEX_PRINTABLE,
                Severity::Error | Severity::Warning => Colors::WARNING,
                Severity::Info => Colors::HEX_NORMAL,
            };
            return (format!("[{}] {}", severity.tag(), message), color);
        }

        let session = self.binding.session();
        let filename = self.filename().unwrap_or("[stdin]");
        let modified = if session.is_modified() { " [+]" } else { "" };
        let method = http::parse_http_raw(self.binding.raw())
            .map(|message| message.method)
            .unwrap_or_else(|| "-".to_string());
        let scope = match session.scope() {
            Scope::Message => "MSG",
            Scope::Body => "BODY",
        };
        let edit = match self.edit_mode {
            EditMode::WholeBuffer => "ALL",
            EditMode::PerRow => "ROW",
        };
        let truncated = if session.is_truncated() { " [truncated]" } else { "" };
        (
            format!(
                "{}{} | {} | {} | {} | {} bytes{} | {}",
                filename,
                modified,
                method,
                scope,
                edit,
                session.bytes().len(),
                truncated,
                self.binding.context().surface.name(),
            ),
            Colors::HEADER,
        )
    }

    /// 画面を描画
    pub fn draw(&mut self, frame: &mut Frame) {
        let size = frame.area();
        let modal_height = if self.binding.modal().is_some() { 4 } else { 0 };

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),               // メイン
                Constraint::Length(modal_height), // 行編集
                Constraint::Length(1),            // ステータス
            ])
            .split(size);

        // ヘッダー分を引く
        self.set_visible_rows((layout[0].height as usize).saturating_sub(1));

        let session = self.binding.session();
        let changed = session.buffer().changed_offsets();
        let view = DumpView::new(session.rows())
            .top(self.top)
            .selected(Some(self.selected))
            .changed(&changed);
        frame.render_widget(view, layout[0]);

        if let Some(modal) = self.binding.modal() {
            frame.render_widget(ModalView::new(modal, self.field), layout[1]);
        }

        let (status, color) = self.status_line();
        frame.render_widget(
            Paragraph::new(status).style(Style::default().fg(color)),
            layout[2],
        );
    }
}
