//! Task editor modal

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::board::hex_color;
use crate::tui::editor::{EditorField, TaskEditor};
use crate::tui::ui::centered_rect;

/// Draw the editor over the board
pub fn draw(frame: &mut Frame, editor: &TaskEditor, area: Rect) {
    let popup_area = centered_rect(60, 14, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Edit Task ")
        .title_bottom(" Tab:field  ←/→:choose  Enter:save  Ctrl-d:delete  Esc:close ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner_area = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines = vec![Line::raw("")];
    for field in EditorField::ALL {
        lines.push(field_line(editor, field));
        lines.push(Line::raw(""));
    }

    let form = Paragraph::new(lines).style(Style::default().fg(Color::White).bg(Color::Black));
    frame.render_widget(form, inner_area);
}

fn field_line(editor: &TaskEditor, field: EditorField) -> Line<'_> {
    let focused = editor.field == field;
    let label_style = if focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut spans = vec![Span::styled(format!("  {:<8} ", field.label()), label_style)];
    let value = editor.choice_label(field).to_string();

    if field.is_text() {
        let cursor = if focused { "▏" } else { "" };
        spans.push(Span::raw(format!("{}{}", value, cursor)));
    } else {
        let arrows = if focused { ("◀ ", " ▶") } else { ("  ", "  ") };
        spans.push(Span::styled(arrows.0, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(value));
        spans.push(Span::styled(arrows.1, Style::default().fg(Color::Yellow)));
        if field == EditorField::Color {
            if let Some(swatch) = editor.color().and_then(hex_color) {
                spans.push(Span::styled("  ███", Style::default().fg(swatch)));
            }
        }
    }
    Line::from(spans)
}
