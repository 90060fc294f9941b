//! View settings, loaded from TOML.
//!
//! ```toml
//! max_chars = 10240
//! hex_case = "upper"
//! tab_policy = "has_body"
//! scope = "body"
//! edit_mode = "per_row"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::codec::HexCase;
use crate::encoding::MAX_CHARS;
use crate::host::TabPolicy;
use crate::session::{EditMode, Scope};

/// 設定ファイルのエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// ビューの設定（省略したキーは既定値）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// バイト変換前に切り詰める文字数
    pub max_chars: usize,
    /// HEXトークンの大文字/小文字
    pub hex_case: HexCase,
    /// タブを表示する条件
    pub tab_policy: TabPolicy,
    /// メッセージ全体かボディのみか
    pub scope: Scope,
    /// 編集の単位
    pub edit_mode: EditMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_chars: MAX_CHARS,
            hex_case: HexCase::Lower,
            tab_policy: TabPolicy::HasBody,
            scope: Scope::Message,
            edit_mode: EditMode::WholeBuffer,
        }
    }
}

impl Config {
    /// TOML文字列から読み込み
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// ファイルから読み込み
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}
