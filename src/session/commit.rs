use tracing::{info, instrument, warn};

use super::EditSession;
use crate::host::{Notifier, Severity, Surface, Target, WriteBack};
use crate::http;

/// 書き戻しに失敗したときの既定メッセージ
pub const GENERIC_FAILURE: &str = "Failed to update request";

/// ビューの表示先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitContext {
    pub surface: Surface,
    pub target: Target,
}

impl CommitContext {
    /// リプレイ画面のリクエストのみ書き戻せる
    pub fn can_commit(&self) -> bool {
        self.surface == Surface::Replay && self.target == Target::Request
    }
}

/// 書き戻しの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// 書き戻した生テキスト
    Committed(String),
    NotPermitted,
    /// 切り詰められたバッファは書き戻さない
    Truncated,
    Failed(String),
}

/// 編集結果をホストに書き戻す
///
/// Never fails: every problem ends up as a notification and an outcome.
#[instrument(skip_all, fields(surface = ctx.surface.name(), target = ?ctx.target))]
pub fn commit(
    session: &EditSession,
    ctx: CommitContext,
    sink: &mut dyn WriteBack,
    notifier: &mut dyn Notifier,
) -> CommitOutcome {
    if !ctx.can_commit() {
        warn!("commit refused outside replay request");
        notifier.notify("Only replay requests can be saved", Severity::Warning);
        return CommitOutcome::NotPermitted;
    }
    if session.is_truncated() {
        warn!("commit refused for truncated buffer");
        notifier.notify(
            "Message was truncated for display and cannot be saved",
            Severity::Warning,
        );
        return CommitOutcome::Truncated;
    }

    let raw = http::ensure_crlf(&session.to_raw_text());
    match sink.write_back(&raw) {
        Ok(()) => {
            info!(chars = raw.len(), "request updated");
            notifier.notify("Request updated", Severity::Success);
            CommitOutcome::Committed(raw)
        }
        Err(e) => {
            let detail = e.to_string();
            let message = if detail.is_empty() {
                GENERIC_FAILURE.to_string()
            } else {
                format!("{}: {}", GENERIC_FAILURE, detail)
            };
            warn!(error = %detail, "write-back failed");
            notifier.notify(&message, Severity::Error);
            CommitOutcome::Failed(message)
        }
    }
}
