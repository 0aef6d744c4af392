//! Event handling for the TUI
//!
//! Keys become messages (msg.rs); messages become App calls here.

use crossterm::event::{KeyEvent, KeyEventKind};

use super::app::App;
use super::msg::{is_drag, is_quit, key_to_msg, Msg};

/// Handle a key event, returns true if app should quit
pub fn handle_event(app: &mut App, key: KeyEvent) -> bool {
    // Windows reports releases too
    if key.kind == KeyEventKind::Release {
        return false;
    }
    let msg = key_to_msg(key.code, key.modifiers, app.input_mode());
    update(app, msg)
}

/// Apply one message. Returns true if the app should quit.
pub fn update(app: &mut App, msg: Msg) -> bool {
    if is_quit(&msg) {
        if app.drag.is_some() {
            app.cancel_drag();
        }
        return true;
    }
    if is_drag(&msg) {
        tracing::trace!(?msg, "drag input");
    }

    match msg {
        // Navigation
        Msg::FocusLeft => app.focus_left(),
        Msg::FocusRight => app.focus_right(),
        Msg::FocusUp => app.focus_up(),
        Msg::FocusDown => app.focus_down(),

        // Views
        Msg::NextView => app.switch_view(app.view.toggle()),
        Msg::SwitchToView(view) => app.switch_view(view),
        Msg::ToggleLayout => app.toggle_layout(),

        // Board actions
        Msg::AddTask => app.add_task(),
        Msg::AddContext => app.add_context(),
        Msg::OpenEditor => app.open_editor(),
        Msg::DeleteTask => app.delete_focused(),
        Msg::CycleStatus => app.cycle_status(),
        Msg::RenameColumn => app.start_rename(),
        Msg::Refresh => {
            if let Err(e) = app.refresh() {
                app.set_status(format!("Refresh failed: {:#}", e));
            } else {
                app.show_refresh_indicator();
            }
        }

        // Drag
        Msg::PickUp => app.pick_up(),
        Msg::DragLeft => app.drag_step(-1, 0),
        Msg::DragRight => app.drag_step(1, 0),
        Msg::DragUp => app.drag_step(0, -1),
        Msg::DragDown => app.drag_step(0, 1),
        Msg::Drop => app.drop_card(),
        Msg::CancelDrag => app.cancel_drag(),

        // Editor and prompt
        Msg::Input(c) => {
            if let Some(editor) = app.editor.as_mut() {
                editor.input(c);
            } else if let Some(prompt) = app.rename.as_mut() {
                prompt.input.push(c);
            }
        }
        Msg::Backspace => {
            if let Some(editor) = app.editor.as_mut() {
                editor.backspace();
            } else if let Some(prompt) = app.rename.as_mut() {
                prompt.input.pop();
            }
        }
        Msg::NextField => {
            if let Some(editor) = app.editor.as_mut() {
                editor.next_field();
            }
        }
        Msg::PrevField => {
            if let Some(editor) = app.editor.as_mut() {
                editor.prev_field();
            }
        }
        Msg::ChoicePrev => {
            if let Some(editor) = app.editor.as_mut() {
                editor.cycle(false);
            }
        }
        Msg::ChoiceNext => {
            if let Some(editor) = app.editor.as_mut() {
                editor.cycle(true);
            }
        }
        Msg::Confirm => {
            if app.editor.is_some() {
                app.save_editor();
            } else {
                app.confirm_rename();
            }
        }
        Msg::EditorDelete => app.delete_from_editor(),
        Msg::CloseModal => app.close_modal(),

        Msg::ToggleHelp => app.show_help = !app.show_help,

        Msg::Quit | Msg::Noop => {}
    }
    false
}
