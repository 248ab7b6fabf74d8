use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use super::{ToastKind, Toasts};
use crate::common::truncate_with_ellipsis;

const MAX_WIDTH: u16 = 40;

/// Renders the toast stack in the top-right corner, newest at the top.
pub fn render_toasts(frame: &mut Frame, toasts: &Toasts, area: Rect) {
    let mut y = area.y + 1;
    for toast in toasts.iter().collect::<Vec<_>>().into_iter().rev() {
        if y + 3 > area.y + area.height {
            break;
        }
        let (icon, color) = match toast.kind {
            ToastKind::Success => ("✔", Color::Green),
            ToastKind::Error => ("✖", Color::Red),
        };
        let text_width = (toast.message.width() as u16 + 4).min(MAX_WIDTH);
        let width = (text_width + 2).min(area.width);
        let x = area.x + area.width.saturating_sub(width + 1);
        let toast_area = Rect::new(x, y, width, 3);

        let message = truncate_with_ellipsis(&toast.message, width.saturating_sub(5) as usize);
        let line = Line::from(vec![
            Span::styled(format!("{icon} "), Style::default().fg(color)),
            Span::styled(message, Style::default().add_modifier(Modifier::BOLD)),
        ]);

        frame.render_widget(Clear, toast_area);
        frame.render_widget(
            Paragraph::new(line).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
            toast_area,
        );
        y += 3;
    }
}
