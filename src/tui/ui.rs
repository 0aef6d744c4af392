//! UI rendering for the TUI

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::app::{App, RenamePrompt};
use super::msg::InputMode;
use super::views::{board, editor};

/// Main draw function - orchestrates all rendering
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Main layout: header, content, footer
    let main_layout = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Min(6),    // Board
        Constraint::Length(1), // Footer/status
    ])
    .split(area);

    draw_header(frame, app, main_layout[0]);
    board::draw(frame, app, main_layout[1]);
    draw_footer(frame, app, main_layout[2]);

    // Draw overlays
    if let Some(prompt) = &app.rename {
        draw_rename_prompt(frame, prompt, area);
    }

    if let Some(task_editor) = &app.editor {
        editor::draw(frame, task_editor, area);
    }

    if app.show_help {
        draw_help_overlay(frame, area);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let view_name = match app.view {
        crate::model::ViewKind::Status => "By status",
        crate::model::ViewKind::Context => "By context",
    };

    let sync_indicator = if app.is_saving() {
        " [Saving…]"
    } else if app.refresh_shown_at.is_some() {
        " [Updated]"
    } else {
        ""
    };

    let header_text = format!(
        " {} │ {} │ [{} tasks]{}",
        app.board_name(),
        view_name,
        app.tasks.displayed().len(),
        sync_indicator
    );

    let header =
        Paragraph::new(header_text).style(Style::default().bg(Color::Blue).fg(Color::White).bold());

    frame.render_widget(header, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let keybinds = match app.input_mode() {
        InputMode::Dragging => "h/j/k/l:move card  Space/Enter:drop  Esc:cancel",
        InputMode::Editor => "Tab:field  ←/→:choose  Enter:save  Ctrl-d:delete  Esc:close",
        InputMode::Prompt => "Enter:save  Esc:cancel",
        InputMode::Help => "?/Esc:close help",
        InputMode::Normal => {
            "h/l:column  j/k:card  Space:move  a:add  e:edit  d:delete  s:status  Tab:view  ?:help  q:quit"
        }
    };

    // Show status message if present, otherwise show keybinds
    let footer_text = if let Some((ref msg, _)) = app.status_message {
        msg.clone()
    } else {
        keybinds.to_string()
    };

    let footer = Paragraph::new(format!(" {}", footer_text))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(footer, area);
}

fn draw_rename_prompt(frame: &mut Frame, prompt: &RenamePrompt, area: Rect) {
    let popup_area = centered_rect(50, 3, area);
    frame.render_widget(Clear, popup_area);

    let input = Paragraph::new(format!("{}▏", prompt.input))
        .block(
            Block::default()
                .title(format!(" Rename {} ", prompt.kind))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(input, popup_area);
}

fn draw_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 30, area);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let help_text = r#"
  Board
  ─────────────────────────────────
  h/l, ←/→     Focus column
  j/k, ↑/↓     Focus card
  Tab, 1, 2    Status / context view
  v            Side by side / stacked
  a            Add task to column
  A            Add list (context view)
  Enter, e     Edit task
  d            Delete task
  s            Next status
  r            Rename column
  R            Refresh
  q            Quit

  Moving cards
  ─────────────────────────────────
  Space        Pick up focused card
  h/j/k/l      Move it
  Space/Enter  Drop
  Esc          Put it back

  Press ? or Esc to close
"#;

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(help, popup_area);
}

/// A `width` x `height` rect centred in `area`, shrunk to fit
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
