mod hex_view;
mod modal_view;

pub use hex_view::DumpView;
pub use modal_view::{ModalField, ModalView};

use ratatui::style::Color;

/// 表示色
pub struct Colors;

impl Colors {
    pub const HEADER: Color = Color::Cyan;
    pub const ADDR: Color = Color::DarkGray;
    pub const HEX_ZERO: Color = Color::DarkGray;
    pub const HEX_HIGH: Color = Color::Red;
    pub const HEX_PRINTABLE: Color = Color::Green;
    pub const HEX_NORMAL: Color = Color::White;
    pub const ASCII_NORMAL: Color = Color::Gray;
    pub const CHANGED: Color = Color::Yellow;
    pub const SELECTION_BG: Color = Color::Rgb(40, 40, 80);
    pub const CURSOR: Color = Color::Black;
    pub const CURSOR_BG: Color = Color::LightCyan;
    pub const WARNING: Color = Color::LightRed;
}
