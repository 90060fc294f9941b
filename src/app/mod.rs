mod file_host;
mod state;

pub use file_host::{FileWriteBack, StatusToast};
pub use state::App;

use crossterm::event::KeyCode;

/// プレフィックスキー状態（Emacs 2ストローク用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrefixKey {
    #[default]
    None,
    /// C-x を押した状態
    CtrlX,
}

/// アプリケーションアクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Save,

    // 行移動
    RowUp,
    RowDown,
    PageUp,
    PageDown,
    GotoBeginning, // M-< 先頭行
    GotoEnd,       // M-> 最終行

    // 編集
    StartEdit,   // Enter: 行編集 or 全体編集
    ToggleScope, // Tab: メッセージ全体 <-> ボディ
    Revert,      // C-u: ロード時に戻す

    // プレフィックスキー
    EnterCtrlX, // C-x を押した
    Cancel,     // C-g でキャンセル

    None,
}

/// キー修飾子
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyMod {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Action {
    /// キーコードからアクションに変換（Emacsキーバインド）
    pub fn from_key(key: KeyCode, mods: KeyMod) -> Self {
        let KeyMod { ctrl, alt, .. } = mods;

        match (key, ctrl, alt) {
            // C-x: プレフィックスキーモードへ
            (KeyCode::Char('x'), true, false) => Action::EnterCtrlX,

            // C-g: キャンセル
            (KeyCode::Char('g'), true, false) => Action::Cancel,
            (KeyCode::Esc, _, _) => Action::Cancel,

            // Ctrl+N / Ctrl+P: 行移動
            (KeyCode::Char('n'), true, false) => Action::RowDown,
            (KeyCode::Char('p'), true, false) => Action::RowUp,
            (KeyCode::Down, false, false) => Action::RowDown,
            (KeyCode::Up, false, false) => Action::RowUp,

            // Ctrl+V / Alt+V: ページ移動
            (KeyCode::Char('v'), true, false) => Action::PageDown,
            (KeyCode::Char('v'), false, true) => Action::PageUp,
            (KeyCode::PageDown, _, _) => Action::PageDown,
            (KeyCode::PageUp, _, _) => Action::PageUp,

            // M-< / M->
            (KeyCode::Char('<'), false, true) => Action::GotoBeginning,
            (KeyCode::Char('>'), false, true) => Action::GotoEnd,
            (KeyCode::Home, _, _) => Action::GotoBeginning,
            (KeyCode::End, _, _) => Action::GotoEnd,

            (KeyCode::Enter, false, false) => Action::StartEdit,
            (KeyCode::Tab, false, false) => Action::ToggleScope,
            (KeyCode::Char('u'), true, false) => Action::Revert,

            _ => Action::None,
        }
    }

    /// C-x の後のキーを処理
    pub fn from_key_after_ctrl_x(key: KeyCode, mods: KeyMod) -> Self {
        let KeyMod { ctrl, .. } = mods;

        match (key, ctrl) {
            // C-x C-c: 終了
            (KeyCode::Char('c'), true) => Action::Quit,
            // C-x C-s: 保存
            (KeyCode::Char('s'), true) => Action::Save,
            // その他は無効
            _ => Action::Cancel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTRL: KeyMod = KeyMod {
        ctrl: true,
        shift: false,
        alt: false,
    };
    const ALT: KeyMod = KeyMod {
        ctrl: false,
        shift: false,
        alt: true,
    };

    #[test]
    fn emacs_bindings() {
        assert_eq!(Action::from_key(KeyCode::Char('n'), CTRL), Action::RowDown);
        assert_eq!(Action::from_key(KeyCode::Char('v'), ALT), Action::PageUp);
        assert_eq!(Action::from_key(KeyCode::Char('<'), ALT), Action::GotoBeginning);
        assert_eq!(Action::from_key(KeyCode::Enter, KeyMod::default()), Action::StartEdit);
        assert_eq!(Action::from_key(KeyCode::Char('q'), KeyMod::default()), Action::None);
    }

    #[test]
    fn ctrl_x_sequences() {
        assert_eq!(Action::from_key_after_ctrl_x(KeyCode::Char('s'), CTRL), Action::Save);
        assert_eq!(Action::from_key_after_ctrl_x(KeyCode::Char('c'), CTRL), Action::Quit);
        assert_eq!(
            Action::from_key_after_ctrl_x(KeyCode::Char('k'), KeyMod::default()),
            Action::Cancel
        );
    }
}
