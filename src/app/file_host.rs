use std::path::{Path, PathBuf};

use crate::encoding;
use crate::host::{HostError, Notifier, Severity, WriteBack};

/// ファイルへの書き戻し（1文字 = 1バイト）
pub struct FileWriteBack {
    path: PathBuf,
}

impl FileWriteBack {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WriteBack for FileWriteBack {
    fn write_back(&mut self, raw: &str) -> Result<(), HostError> {
        std::fs::write(&self.path, encoding::encode_text(raw))?;
        Ok(())
    }
}

/// ステータスバー用に最後の通知を保持
#[derive(Debug, Default)]
pub struct StatusToast {
    pub last: Option<(String, Severity)>,
}

impl Notifier for StatusToast {
    fn notify(&mut self, message: &str, severity: Severity) {
        self.last = Some((message.to_string(), severity));
    }
}
