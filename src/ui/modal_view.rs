use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use super::Colors;
use crate::buffer::BYTES_PER_ROW;
use crate::session::EditModal;

/// 入力中の欄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalField {
    #[default]
    Hex,
    Ascii,
}

/// 行編集の表示ウィジェット（4行）
pub struct ModalView<'a> {
    modal: &'a EditModal,
    field: ModalField,
}

impl<'a> ModalView<'a> {
    pub fn new(modal: &'a EditModal, field: ModalField) -> Self {
        Self { modal, field }
    }

    fn render_field(
        &self,
        label: &str,
        value: &str,
        active: bool,
        y: u16,
        area: Rect,
        buf: &mut Buffer,
    ) {
        let label_style = if active {
            Style::default().fg(Colors::HEADER).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Colors::ADDR)
        };
        buf.set_string(area.x, y, label, label_style);
        let x = area.x + label.len() as u16;
        buf.set_string(x, y, value, Style::default().fg(Colors::HEX_NORMAL));
        if active {
            let cursor_x = x + value.chars().count() as u16;
            if cursor_x < area.right() {
                let cursor = Style::default().bg(Colors::CURSOR_BG).fg(Colors::CURSOR);
                buf.set_string(cursor_x, y, "_", cursor);
            }
        }
    }
}

impl Widget for ModalView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 4 {
            return;
        }

        let title = format!(
            "Edit row {:08x}  [Tab] switch  [Enter] apply  [C-g] cancel",
            self.modal.target_row * BYTES_PER_ROW
        );
        buf.set_string(
            area.x,
            area.y,
            &title,
            Style::default().fg(Colors::HEADER).add_modifier(Modifier::BOLD),
        );

        self.render_field(
            "HEX   : ",
            &self.modal.current_hex,
            self.field == ModalField::Hex,
            area.y + 1,
            area,
            buf,
        );
        self.render_field(
            "ASCII : ",
            &self.modal.current_ascii,
            self.field == ModalField::Ascii,
            area.y + 2,
            area,
            buf,
        );

        // 差分表示（位置ごと）
        let y = area.y + 3;
        buf.set_string(area.x, y, "DIFF  : ", Style::default().fg(Colors::ADDR));
        let mut x = area.x + 8;
        for entry in self.modal.diff() {
            if x + 2 > area.right() {
                break;
            }
            let text = entry.current.as_deref().unwrap_or("--");
            let style = if entry.changed() {
                Style::default().fg(Colors::CHANGED).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Colors::ASCII_NORMAL)
            };
            buf.set_string(x, y, text, style);
            x += text.chars().count() as u16 + 1;
        }
    }
}
