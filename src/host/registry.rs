use serde::Deserialize;
use tracing::debug;

use super::{RequestSource, Surface, Target, ViewBinding};
use crate::config::Config;
use crate::http;

/// タブを表示するかどうかの判定
pub type Predicate = Box<dyn Fn(&dyn RequestSource) -> bool>;

/// ビューの生成
pub type ViewFactory = Box<dyn Fn(&dyn RequestSource, Surface) -> ViewBinding>;

/// 既定の判定ルール
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabPolicy {
    /// ボディがある場合のみ
    #[default]
    HasBody,
    Always,
    /// 生テキストが空でない場合
    HasRawData,
}

impl TabPolicy {
    pub fn accepts(self, source: &dyn RequestSource) -> bool {
        match self {
            TabPolicy::Always => true,
            TabPolicy::HasRawData => source.raw().is_some_and(|raw| !raw.is_empty()),
            TabPolicy::HasBody => source
                .raw()
                .and_then(http::parse_http_raw)
                .is_some_and(|message| message.has_body()),
        }
    }

    pub fn predicate(self) -> Predicate {
        Box::new(move |source: &dyn RequestSource| self.accepts(source))
    }
}

struct Registration {
    surface: Surface,
    label: String,
    predicate: Predicate,
    component: ViewFactory,
}

/// 画面ごとのタブ登録
#[derive(Default)]
pub struct ViewRegistry {
    views: Vec<Registration>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 画面にタブを登録
    pub fn register_view(
        &mut self,
        surface: Surface,
        label: impl Into<String>,
        predicate: Predicate,
        component: ViewFactory,
    ) {
        let label = label.into();
        debug!(surface = surface.name(), label = %label, "view registered");
        self.views.push(Registration {
            surface,
            label,
            predicate,
            component,
        });
    }

    /// 表示対象に対して提示するタブのラベル
    pub fn views_for(&self, surface: Surface, source: &dyn RequestSource) -> Vec<&str> {
        self.views
            .iter()
            .filter(|view| view.surface == surface && (view.predicate)(source))
            .map(|view| view.label.as_str())
            .collect()
    }

    /// タブを開く（判定で除外される場合は None）
    pub fn open(
        &self,
        surface: Surface,
        label: &str,
        source: &dyn RequestSource,
    ) -> Option<ViewBinding> {
        self.views
            .iter()
            .find(|view| view.surface == surface && view.label == label)
            .filter(|view| (view.predicate)(source))
            .map(|view| (view.component)(source, surface))
    }

    /// すべての画面にリクエスト/レスポンスのHEXタブを登録
    pub fn register_hex_views(&mut self, config: &Config) {
        for surface in [
            Surface::History,
            Surface::Replay,
            Surface::Search,
            Surface::Sitemap,
        ] {
            for (label, target) in [
                ("Request Hex", Target::Request),
                ("Response Hex", Target::Response),
            ] {
                let config = config.clone();
                self.register_view(
                    surface,
                    label,
                    config.tab_policy.predicate(),
                    Box::new(move |source: &dyn RequestSource, surface: Surface| {
                        ViewBinding::for_source(&config, surface, target, source)
                    }),
                );
            }
        }
    }
}
