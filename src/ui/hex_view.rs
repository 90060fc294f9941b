use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use super::Colors;
use crate::buffer::{dump::NO_DATA, DumpRow, BYTES_PER_ROW};
use crate::codec;

/// ダンプ行の表示ウィジェット
pub struct DumpView<'a> {
    /// 表示する行
    rows: &'a [DumpRow],
    /// 表示開始行
    top: usize,
    /// 選択行
    selected: Option<usize>,
    /// ロード時から変わったバイト位置
    changed: &'a [usize],
}

impl<'a> DumpView<'a> {
    pub fn new(rows: &'a [DumpRow]) -> Self {
        Self {
            rows,
            top: 0,
            selected: None,
            changed: &[],
        }
    }

    pub fn top(mut self, top: usize) -> Self {
        self.top = top;
        self
    }

    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    pub fn changed(mut self, changed: &'a [usize]) -> Self {
        self.changed = changed;
        self
    }

    /// バイト値に応じた色を取得
    fn token_color(token: &str) -> Color {
        match codec::parse_token(token) {
            Some(0x00) => Colors::HEX_ZERO,
            Some(0xFF) => Colors::HEX_HIGH,
            Some(b) if codec::is_printable(b) => Colors::HEX_PRINTABLE,
            _ => Colors::HEX_NORMAL,
        }
    }

    /// 1行分のデータを描画
    fn render_row(&self, index: usize, area: Rect, buf: &mut Buffer) {
        let Some(row) = self.rows.get(index) else {
            return;
        };
        let is_selected = self.selected == Some(index);
        let base = if is_selected {
            Style::default().bg(Colors::SELECTION_BG)
        } else {
            Style::default()
        };

        let mut x = area.x;
        let y = area.y;

        // アドレス表示
        buf.set_string(x, y, &row.offset_label, base.fg(Colors::ADDR));
        x += row.offset_label.len() as u16 + 2;

        if row.is_placeholder() {
            buf.set_string(x, y, NO_DATA, base.fg(Colors::ASCII_NORMAL));
            return;
        }

        let row_start = index * BYTES_PER_ROW;

        // HEX表示
        for (i, token) in row.hex_tokens.iter().enumerate() {
            let mut style = base.fg(Self::token_color(token));
            if self.changed.contains(&(row_start + i)) {
                style = style.fg(Colors::CHANGED).add_modifier(Modifier::BOLD);
            }
            buf.set_string(x, y, token, style);
            x += 3; // "XX "
        }
        x += 3 * (BYTES_PER_ROW - row.hex_tokens.len().min(BYTES_PER_ROW)) as u16;

        // ASCII表示
        for (i, c) in row.ascii_preview.chars().enumerate() {
            let style = if self.changed.contains(&(row_start + i)) {
                base.fg(Colors::CHANGED)
            } else {
                base.fg(Colors::ASCII_NORMAL)
            };
            buf.set_string(x, y, c.to_string(), style);
            x += 1;
        }
    }
}

impl Widget for DumpView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        // ヘッダー行を描画
        let header = format!(
            "{:8}  {}  {}",
            "Offset",
            (0..BYTES_PER_ROW)
                .map(|i| format!("{:02x}", i))
                .collect::<Vec<_>>()
                .join(" "),
            "ASCII"
        );
        buf.set_string(
            area.x,
            area.y,
            &header,
            Style::default()
                .fg(Colors::HEADER)
                .add_modifier(Modifier::BOLD),
        );

        // データ行を描画
        let visible_rows = (area.height as usize).saturating_sub(1); // ヘッダー分を引く
        for row in 0..visible_rows {
            let row_area = Rect {
                x: area.x,
                y: area.y + 1 + row as u16,
                width: area.width,
                height: 1,
            };
            self.render_row(self.top + row, row_area, buf);
        }
    }
}
