//! Board view - one bordered column per status or context

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::board::ColumnView;
use crate::model::{Task, ViewKind};
use crate::tui::app::App;
use crate::tui::state::{hex_to_rgb, truncate};

/// Terminal colour for a `#rrggbb` string
pub fn hex_color(hex: &str) -> Option<Color> {
    hex_to_rgb(hex).map(|(r, g, b)| Color::Rgb(r, g, b))
}

/// Draw every column of the active view
pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let board = app.board();
    if board.is_empty() {
        let empty = Paragraph::new("No columns. Press A in the context view to add a list.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let constraints = vec![Constraint::Ratio(1, board.len() as u32); board.len()];
    let areas = if app.vertical {
        Layout::vertical(constraints).split(area)
    } else {
        Layout::horizontal(constraints).split(area)
    };

    for (idx, (column, column_area)) in board.iter().zip(areas.iter()).enumerate() {
        draw_column(frame, app, column, idx == app.focus_col, *column_area);
    }
}

fn draw_column(frame: &mut Frame, app: &App, column: &ColumnView<'_>, focused: bool, area: Rect) {
    let accent = column.column.color.and_then(hex_color).unwrap_or(Color::Blue);
    let border_style = if focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(accent)
    };

    let block = Block::default()
        .title(Line::from(vec![
            Span::styled(" ● ", Style::default().fg(accent)),
            Span::styled(column.column.title.to_string(), Style::default().bold()),
            Span::styled(format!(" ({}) ", column.tasks.len()), Style::default().fg(Color::DarkGray)),
        ]))
        .borders(Borders::ALL)
        .border_style(border_style);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    if column.tasks.is_empty() {
        let hint = if focused { "Empty. a: add task" } else { "Empty" };
        let empty = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner_area);
        return;
    }

    let width = inner_area.width.saturating_sub(3) as usize;
    let dragging = app.drag.as_ref().map(|d| d.active_id());

    let items: Vec<ListItem> = column
        .tasks
        .iter()
        .enumerate()
        .map(|(row, task)| {
            let selected = focused && row == app.focus_row;
            let lifted = dragging == Some(task.id.as_str());
            card(app, task, width, selected, lifted)
        })
        .collect();

    let mut list_state = ListState::default();
    if focused {
        list_state.select(Some(app.focus_row));
    }
    frame.render_stateful_widget(List::new(items), inner_area, &mut list_state);
}

fn card<'a>(app: &App, task: &'a Task, width: usize, selected: bool, lifted: bool) -> ListItem<'a> {
    let swatch = task
        .color
        .as_deref()
        .and_then(hex_color)
        .unwrap_or(Color::White);

    let title_style = if lifted {
        Style::default().fg(Color::Black).bg(Color::Yellow).bold()
    } else if selected {
        Style::default().fg(Color::White).bg(Color::DarkGray).bold()
    } else {
        Style::default().fg(Color::White)
    };
    let marker = if lifted { "⇅" } else { "▌" };

    let title = Line::from(vec![
        Span::styled(format!("{} ", marker), Style::default().fg(swatch)),
        Span::styled(truncate(&task.title, width), title_style),
    ]);

    // Badge names the other grouping so both show at once
    let badge = match app.view {
        ViewKind::Status => app
            .contexts
            .iter()
            .find(|c| c.id == task.context)
            .map(|c| (c.title.as_str(), hex_color(&c.color))),
        ViewKind::Context => app
            .statuses
            .iter()
            .find(|s| s.id == task.status)
            .map(|s| (s.title.as_str(), None)),
    };

    let mut meta = vec![Span::raw("  ")];
    if let Some((label, color)) = badge {
        meta.push(Span::styled(
            format!("[{}]", label),
            Style::default().fg(color.unwrap_or(Color::Cyan)),
        ));
    }
    for tag in &task.tags {
        meta.push(Span::styled(format!(" #{}", tag), Style::default().fg(Color::DarkGray)));
    }

    ListItem::new(vec![title, Line::from(meta), Line::raw("")])
}
