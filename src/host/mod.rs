//! Services the host application provides to a hex view.
//!
//! The host owns tab registration, notifications and the live request
//! editor. The view only talks to them through the traits below, so a
//! standalone front end can stand in for the host.

mod binding;
mod registry;

pub use binding::ViewBinding;
pub use registry::{Predicate, TabPolicy, ViewFactory, ViewRegistry};

use std::ops::Range;

use thiserror::Error;

/// ビューを表示する画面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    History,
    /// 編集可能なリプレイ画面
    Replay,
    Search,
    Sitemap,
}

impl Surface {
    pub fn name(self) -> &'static str {
        match self {
            Surface::History => "history",
            Surface::Replay => "replay",
            Surface::Search => "search",
            Surface::Sitemap => "sitemap",
        }
    }
}

/// 表示中のメッセージの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Request,
    Response,
}

/// 通知の重要度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn tag(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// ホスト呼び出しのエラー
#[derive(Debug, Error)]
pub enum HostError {
    #[error("write-back is not available")]
    Unavailable,
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// 表示中のリクエスト/レスポンス
pub trait RequestSource {
    /// 生テキスト（まだ取得できなければ None）
    fn raw(&self) -> Option<&str>;
    fn host(&self) -> &str;
    fn path(&self) -> &str;
    fn id(&self) -> &str;
}

/// トースト通知
pub trait Notifier {
    fn notify(&mut self, message: &str, severity: Severity);
}

/// 編集結果の書き戻し先
pub trait WriteBack {
    fn write_back(&mut self, raw: &str) -> Result<(), HostError>;
}

/// ホストのテキストエディタ
pub trait EditorSurface {
    /// 全文を取得
    fn text(&self) -> String;
    /// 指定範囲（バイト位置）を置き換え
    fn replace_range(&mut self, range: Range<usize>, text: &str) -> Result<(), HostError>;
}

/// エディタ全文の置き換えで書き戻す
pub struct EditorWriteBack<'a, E: EditorSurface>(pub &'a mut E);

impl<E: EditorSurface> WriteBack for EditorWriteBack<'_, E> {
    fn write_back(&mut self, raw: &str) -> Result<(), HostError> {
        let len = self.0.text().len();
        self.0.replace_range(0..len, raw)
    }
}

/// メモリ上のリクエスト
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMessage {
    pub id: String,
    pub host: String,
    pub path: String,
    pub raw: Option<String>,
}

impl RequestSource for RawMessage {
    fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn id(&self) -> &str {
        &self.id
    }
}
