use tracing::{debug, trace};

use super::{Notifier, RequestSource, Surface, Target, WriteBack};
use crate::buffer::BufferError;
use crate::config::Config;
use crate::session::{self, CommitContext, CommitOutcome, EditModal, EditSession, Scope};

/// 同期後のバイト列を受け取るコールバック
type Subscriber = Box<dyn FnMut(&[u8])>;

/// ホストとセッションをつなぐビュー
///
/// Every input (new raw text, hex edits, applied modals) is reconciled before
/// the call returns, and subscribers see the resulting bytes right away.
pub struct ViewBinding {
    session: EditSession,
    context: CommitContext,
    /// 最後に受け取った生テキスト
    raw: String,
    /// 開いている行編集
    modal: Option<EditModal>,
    subscribers: Vec<Subscriber>,
}

impl ViewBinding {
    pub fn new(config: &Config, context: CommitContext) -> Self {
        Self {
            session: EditSession::new(config),
            context,
            raw: String::new(),
            modal: None,
            subscribers: Vec::new(),
        }
    }

    /// 表示対象の生テキストで初期化
    pub fn for_source(
        config: &Config,
        surface: Surface,
        target: Target,
        source: &dyn RequestSource,
    ) -> Self {
        let mut binding = Self::new(config, CommitContext { surface, target });
        if let Some(raw) = source.raw() {
            debug!(id = source.id(), host = source.host(), path = source.path(), "binding view");
            binding.on_raw_text(raw);
        }
        binding
    }

    /// バイト列の変更を購読
    pub fn subscribe(&mut self, subscriber: impl FnMut(&[u8]) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// 上流の生テキストが変わった（未反映の編集は破棄、行編集は残す）
    pub fn on_raw_text(&mut self, raw: &str) {
        self.raw = raw.to_string();
        self.session.load(raw);
        self.publish();
    }

    /// 表示範囲を切り替えて再読み込み
    pub fn set_scope(&mut self, scope: Scope) {
        self.session.set_scope(scope);
        self.session.load(&self.raw);
        self.publish();
    }

    /// バッファ全体のHEX文字列を編集
    pub fn set_hex_text(&mut self, text: &str) {
        self.session.set_hex_text(text);
        self.publish();
    }

    /// 1行分を編集
    pub fn edit_row(&mut self, index: usize, hex: &str) -> Result<(), BufferError> {
        self.session.edit_row(index, hex)?;
        self.publish();
        Ok(())
    }

    /// 行編集を開く（開いていたものは破棄）
    pub fn open_modal(&mut self, index: usize) -> Result<&mut EditModal, BufferError> {
        let modal = self.session.open_modal(index)?;
        Ok(self.modal.insert(modal))
    }

    pub fn modal(&self) -> Option<&EditModal> {
        self.modal.as_ref()
    }

    pub fn modal_mut(&mut self) -> Option<&mut EditModal> {
        self.modal.as_mut()
    }

    /// 行編集を反映して閉じる
    pub fn apply_modal(&mut self) -> Result<(), BufferError> {
        let modal = self.modal.take().ok_or(BufferError::NoOpenEdit)?;
        self.session.apply_modal(modal)?;
        self.publish();
        Ok(())
    }

    /// 行編集を破棄（開いていなければ false）
    pub fn cancel_modal(&mut self) -> bool {
        self.modal.take().is_some()
    }

    /// 変更を破棄
    pub fn revert(&mut self) {
        self.session.revert();
        self.publish();
    }

    /// ホストへ書き戻す
    pub fn commit(&self, sink: &mut dyn WriteBack, notifier: &mut dyn Notifier) -> CommitOutcome {
        session::commit(&self.session, self.context, sink, notifier)
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn context(&self) -> CommitContext {
        self.context
    }

    /// 最後に受け取った生テキスト
    pub fn raw(&self) -> &str {
        &self.raw
    }

    fn publish(&mut self) {
        let bytes = self.session.bytes();
        trace!(bytes = bytes.len(), subscribers = self.subscribers.len(), "publish");
        for subscriber in self.subscribers.iter_mut() {
            subscriber(bytes);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::host::{HostError, Severity};
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    const RAW: &str = "POST /a HTTP/1.1\r\nHost: h\r\n\r\nA\u{0}B";

    struct Captured(Option<String>);

    impl WriteBack for Captured {
        fn write_back(&mut self, raw: &str) -> Result<(), HostError> {
            self.0 = Some(raw.to_string());
            Ok(())
        }
    }

    struct Quiet;

    impl Notifier for Quiet {
        fn notify(&mut self, _message: &str, _severity: Severity) {}
    }

    fn binding(scope: Scope) -> ViewBinding {
        let config = Config {
            scope,
            ..Config::default()
        };
        let mut binding = ViewBinding::new(
            &config,
            CommitContext {
                surface: Surface::Replay,
                target: Target::Request,
            },
        );
        binding.on_raw_text(RAW);
        binding
    }

    #[test]
    fn subscribers_see_every_sync() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut binding = binding(Scope::Body);
        let sink = Rc::clone(&seen);
        binding.subscribe(move |bytes| sink.borrow_mut().push(bytes.to_vec()));

        binding.set_hex_text("41 42");
        binding.edit_row(0, "43").unwrap();
        binding.on_raw_text("GET / HTTP/1.1\r\n\r\nZ");

        assert_eq!(
            *seen.borrow(),
            vec![b"AB".to_vec(), b"C".to_vec(), b"Z".to_vec()]
        );
    }

    #[test]
    fn modal_survives_upstream_refresh() {
        let mut binding = binding(Scope::Body);
        binding.open_modal(0).unwrap().set_ascii("x.y");
        binding.on_raw_text("GET / HTTP/1.1\r\n\r\nnew text");

        assert_eq!(binding.modal().unwrap().current_hex, "78 00 79");
        binding.apply_modal().unwrap();
        assert_eq!(binding.session().bytes(), b"x\0y");
        assert!(binding.modal().is_none());
    }

    #[test]
    fn apply_without_modal() {
        let mut binding = binding(Scope::Body);
        assert_matches!(binding.apply_modal(), Err(BufferError::NoOpenEdit));
        assert!(!binding.cancel_modal());
    }

    #[test]
    fn cancel_discards_stage() {
        let mut binding = binding(Scope::Body);
        binding.open_modal(0).unwrap().set_hex("ff ff ff");
        assert!(binding.cancel_modal());
        assert_eq!(binding.session().bytes(), b"A\0B");
    }

    #[test]
    fn scope_toggle_reloads_last_raw_text() {
        let mut binding = binding(Scope::Body);
        binding.set_hex_text("00");
        binding.set_scope(Scope::Message);
        assert_eq!(binding.session().to_raw_text(), RAW);
        assert!(!binding.session().is_modified());
    }

    #[test]
    fn commit_through_binding() {
        let mut binding = binding(Scope::Body);
        binding.open_modal(0).unwrap().set_hex("41 0a 42");
        binding.apply_modal().unwrap();

        let mut sink = Captured(None);
        let outcome = binding.commit(&mut sink, &mut Quiet);
        assert_matches!(outcome, CommitOutcome::Committed(_));
        assert_eq!(
            sink.0.as_deref(),
            Some("POST /a HTTP/1.1\r\nHost: h\r\n\r\nA\r\nB")
        );
    }

    #[test]
    fn revert_publishes_original() {
        let mut binding = binding(Scope::Body);
        binding.set_hex_text("");
        binding.revert();
        assert_eq!(binding.session().bytes(), b"A\0B");
    }
}
