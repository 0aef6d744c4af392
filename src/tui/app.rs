//! Application state for the TUI

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context as _;

use super::editor::TaskEditor;
use super::msg::InputMode;
use super::state;
use crate::board::{
    column_ids, columns, locate, plan_move, project, resolve_target, tasks_in, ColumnView,
    DragEnd, DragSession, DropTarget, Optimistic,
};
use crate::config::{BoardConfig, Config};
use crate::db::{BoardSnapshot, Database};
use crate::gateway::{Gateway, Mutation};
use crate::model::{
    Column, ColumnKind, Context, Status, Task, ViewKind, NEW_CONTEXT_TITLE, NEW_TASK_TITLE,
};

/// Column rename in progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePrompt {
    pub column_id: String,
    pub kind: ColumnKind,
    pub input: String,
}

/// Main application state
pub struct App {
    gateway: Gateway<Database>,
    db_path: PathBuf,
    config: BoardConfig,

    // Board data
    pub tasks: Optimistic<Vec<Task>>,
    pub statuses: Vec<Status>,
    pub contexts: Vec<Context>,

    // View state
    pub view: ViewKind,
    pub vertical: bool,
    pub focus_col: usize,
    pub focus_row: usize,

    // Interaction
    pub drag: Option<DragSession>,
    pub editor: Option<TaskEditor>,
    pub rename: Option<RenamePrompt>,
    pub show_help: bool,

    // Refresh indicator
    pub refresh_shown_at: Option<Instant>,
    /// A refresh arrived mid-drag and waits for the drop
    refresh_deferred: bool,

    // Status message
    pub status_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(db: Database, config: &Config) -> anyhow::Result<Self> {
        let db_path = db.path().to_path_buf();
        let gateway = Gateway::spawn(db).context("could not start the storage worker")?;
        let board = gateway.fetch().context("could not load the board")?;

        let mut app = Self {
            gateway,
            db_path,
            config: config.board.clone(),
            tasks: Optimistic::default(),
            statuses: Vec::new(),
            contexts: Vec::new(),
            view: config.board.default_view,
            vertical: config.board.vertical,
            focus_col: 0,
            focus_row: 0,
            drag: None,
            editor: None,
            rename: None,
            show_help: false,
            refresh_shown_at: None,
            refresh_deferred: false,
            status_message: None,
        };
        app.apply_snapshot(board);
        Ok(app)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn board_name(&self) -> &str {
        &self.config.name
    }

    /// Which key map applies right now
    pub fn input_mode(&self) -> InputMode {
        if self.show_help {
            InputMode::Help
        } else if self.editor.is_some() {
            InputMode::Editor
        } else if self.rename.is_some() {
            InputMode::Prompt
        } else if self.drag.is_some() {
            InputMode::Dragging
        } else {
            InputMode::Normal
        }
    }

    // =========================================================================
    // Projection
    // =========================================================================

    /// Columns of the active view with their cards
    pub fn board(&self) -> Vec<ColumnView<'_>> {
        let cols = columns(self.view, &self.statuses, &self.contexts);
        project(self.tasks.displayed(), self.view, &cols)
    }

    pub fn focused_column(&self) -> Option<Column<'_>> {
        columns(self.view, &self.statuses, &self.contexts)
            .get(self.focus_col)
            .copied()
    }

    pub fn focused_task(&self) -> Option<&Task> {
        let column = self.focused_column()?;
        tasks_in(self.tasks.displayed(), self.view, column.id)
            .get(self.focus_row)
            .copied()
    }

    fn column_count(&self) -> usize {
        match self.view {
            ViewKind::Status => self.statuses.len(),
            ViewKind::Context => self.contexts.len(),
        }
    }

    fn focused_column_len(&self) -> usize {
        self.focused_column()
            .map(|c| tasks_in(self.tasks.displayed(), self.view, c.id).len())
            .unwrap_or(0)
    }

    fn clamp_focus(&mut self) {
        self.focus_col = state::clamp_selection(self.focus_col, self.column_count());
        self.focus_row = state::clamp_selection(self.focus_row, self.focused_column_len());
    }

    /// Move focus onto a card wherever it now sits
    fn focus_task(&mut self, task_id: &str) {
        if let Some((col, row)) = locate(&self.board(), task_id) {
            self.focus_col = col;
            self.focus_row = row;
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn focus_left(&mut self) {
        self.focus_col = state::move_selection_up(self.focus_col);
        self.clamp_focus();
    }

    pub fn focus_right(&mut self) {
        self.focus_col = state::move_selection_down(self.focus_col, self.column_count());
        self.clamp_focus();
    }

    pub fn focus_up(&mut self) {
        self.focus_row = state::move_selection_up(self.focus_row);
    }

    pub fn focus_down(&mut self) {
        self.focus_row = state::move_selection_down(self.focus_row, self.focused_column_len());
    }

    pub fn switch_view(&mut self, view: ViewKind) {
        if self.view == view {
            return;
        }
        let keep = self.focused_task().map(|t| t.id.clone());
        self.view = view;
        self.focus_col = 0;
        self.focus_row = 0;
        if let Some(id) = keep {
            self.focus_task(&id);
        }
        self.clamp_focus();
    }

    pub fn toggle_layout(&mut self) {
        self.vertical = !self.vertical;
    }

    // =========================================================================
    // Store sync
    // =========================================================================

    /// Re-fetch the board and make it the confirmed state
    pub fn refresh(&mut self) -> anyhow::Result<()> {
        if self.drag.is_some() {
            self.refresh_deferred = true;
            return Ok(());
        }
        let board = self.gateway.fetch().context("could not reload the board")?;
        self.apply_snapshot(board);
        Ok(())
    }

    fn apply_snapshot(&mut self, board: BoardSnapshot) {
        let BoardSnapshot {
            statuses,
            contexts,
            tasks,
        } = board;
        self.statuses = statuses;
        self.contexts = contexts;
        self.tasks.confirm(tasks);
        self.refresh_deferred = false;
        self.clamp_focus();
    }

    /// Drain finished mutations; re-fetch once if any completed
    pub fn poll_gateway(&mut self) {
        let mut invalidated = false;
        while let Some(event) = self.gateway.try_invalidation() {
            invalidated = true;
            if let Some(error) = event.error {
                self.set_status(format!("Could not save ({}): {}", event.mutation, error));
            }
        }
        if invalidated {
            self.refresh_or_report();
        }
    }

    /// The database file changed on disk
    pub fn on_file_changed(&mut self) {
        self.refresh_or_report();
        self.show_refresh_indicator();
    }

    fn refresh_or_report(&mut self) {
        if let Err(e) = self.refresh() {
            tracing::error!("refresh failed: {:#}", e);
            self.set_status(format!("Refresh failed: {:#}", e));
        }
    }

    /// True while shown state has not been echoed back by the store
    pub fn is_saving(&self) -> bool {
        self.tasks.is_speculative()
    }

    pub fn show_refresh_indicator(&mut self) {
        self.refresh_shown_at = Some(Instant::now());
    }

    /// Periodic tick for indicator timeouts
    pub fn tick(&mut self) {
        if let Some(shown_at) = self.refresh_shown_at {
            if shown_at.elapsed().as_secs() >= 2 {
                self.refresh_shown_at = None;
            }
        }
        if let Some((_, shown_at)) = &self.status_message {
            if shown_at.elapsed().as_secs() >= 3 {
                self.status_message = None;
            }
        }
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    // =========================================================================
    // Drag gesture
    // =========================================================================

    /// Pick up a card. Ignored while another drag is in flight.
    pub fn on_drag_start(&mut self, task_id: &str) -> bool {
        if self.drag.is_some() {
            return false;
        }
        match DragSession::start(self.tasks.displayed(), task_id) {
            Some(session) => {
                tracing::debug!(task = task_id, "drag start");
                self.drag = Some(session);
                true
            }
            None => false,
        }
    }

    /// Hover the dragged card over a card or column id
    pub fn on_drag_over(&mut self, over_id: Option<&str>) {
        let Some(session) = self.drag.as_mut() else {
            return;
        };
        let view = self.view;
        let ids = column_ids(view, &self.statuses, &self.contexts);
        let target = resolve_target(self.tasks.displayed(), &ids, over_id);
        let moved = self.tasks.try_apply(|current| session.over(current, &target, view));

        if moved {
            let active = session.active_id().to_string();
            self.focus_task(&active);
        }
    }

    /// Release the dragged card. `None` means it was dropped outside the
    /// board and the move is abandoned.
    pub fn on_drag_end(&mut self, over_id: Option<&str>) {
        let Some(session) = self.drag.take() else {
            return;
        };
        let view = self.view;
        let active = session.active_id().to_string();
        let origin = session.origin().to_vec();
        let ids = column_ids(view, &self.statuses, &self.contexts);
        let target = resolve_target(self.tasks.displayed(), &ids, over_id);

        let end = session.end(self.tasks.displayed(), &target, view);
        match end {
            DragEnd::Commit(finalized) => {
                let plan = plan_move(&origin, &finalized);
                tracing::debug!(
                    task = active.as_str(),
                    changed = plan.updates.len(),
                    "drag committed"
                );
                self.tasks.apply(move |_| finalized);
                self.gateway.submit(Mutation::Move(plan));
                // The move's own invalidation re-fetches
                self.refresh_deferred = false;
            }
            DragEnd::Cancel(restored) => {
                tracing::debug!(task = active.as_str(), "drag cancelled");
                self.tasks.restore(restored);
                if self.refresh_deferred {
                    self.refresh_or_report();
                }
            }
        }
        self.focus_task(&active);
        self.clamp_focus();
    }

    /// Keyboard pick-up of the focused card
    pub fn pick_up(&mut self) {
        let Some(task) = self.focused_task() else {
            return;
        };
        let (id, title) = (task.id.clone(), task.title.clone());
        if self.on_drag_start(&id) {
            self.set_status(format!("Moving '{}': hjkl to move, Space to drop, Esc to cancel", title));
        }
    }

    /// Keyboard hover: one row up/down, or one column left/right
    pub fn drag_step(&mut self, dcol: isize, drow: isize) {
        let Some(active) = self.drag.as_ref().map(|s| s.active_id().to_string()) else {
            return;
        };
        let over = {
            let board = self.board();
            let Some((col, row)) = locate(&board, &active) else {
                return;
            };
            if drow != 0 {
                let target_row = row as isize + drow;
                if target_row < 0 {
                    return;
                }
                match board[col].tasks.get(target_row as usize) {
                    Some(task) => task.id.clone(),
                    None => return,
                }
            } else {
                let target_col = col as isize + dcol;
                if target_col < 0 || target_col as usize >= board.len() {
                    return;
                }
                let column = &board[target_col as usize];
                match column.tasks.get(row).or_else(|| column.tasks.last()) {
                    Some(task) => task.id.clone(),
                    None => column.column.id.to_string(),
                }
            }
        };
        self.on_drag_over(Some(&over));
    }

    /// Keyboard drop onto whatever was last hovered
    pub fn drop_card(&mut self) {
        let Some(session) = self.drag.as_ref() else {
            return;
        };
        let over = match session.last_target() {
            Some(DropTarget::Task(id)) | Some(DropTarget::Container(id)) => id.clone(),
            _ => session.active_id().to_string(),
        };
        self.on_drag_end(Some(&over));
    }

    pub fn cancel_drag(&mut self) {
        self.on_drag_end(None);
        self.set_status("Move cancelled".to_string());
    }

    // =========================================================================
    // Board actions
    // =========================================================================

    /// Add a card to the focused column and open it in the editor
    pub fn add_task(&mut self) {
        let Some(column) = self.focused_column() else {
            self.set_status("No column to add to".to_string());
            return;
        };
        let mut task = match self.view {
            ViewKind::Status => Task::new(NEW_TASK_TITLE, column.id, &self.config.default_context),
            ViewKind::Context => Task::new(NEW_TASK_TITLE, &self.config.default_status, column.id),
        };
        task.order = self
            .tasks
            .displayed()
            .iter()
            .map(|t| t.order)
            .max()
            .unwrap_or(0)
            + 1;

        let id = task.id.clone();
        let created = task.clone();
        self.tasks.apply(move |current| {
            let mut next = current.clone();
            next.push(created);
            next
        });
        self.gateway.submit(Mutation::CreateTask(task));
        self.focus_task(&id);
        self.open_editor();
    }

    /// Add a list. Only meaningful in the context view.
    pub fn add_context(&mut self) {
        if self.view != ViewKind::Context {
            self.set_status("Switch to the context view (2) to add a list".to_string());
            return;
        }
        let context = Context::new(NEW_CONTEXT_TITLE);
        self.contexts.push(context.clone());
        self.gateway.submit(Mutation::CreateContext(context));
        self.focus_col = self.contexts.len() - 1;
        self.focus_row = 0;
        self.start_rename();
    }

    pub fn open_editor(&mut self) {
        if let Some(task) = self.focused_task() {
            self.editor = Some(TaskEditor::open(task, &self.statuses, &self.contexts));
        }
    }

    pub fn close_modal(&mut self) {
        self.editor = None;
        self.rename = None;
        self.show_help = false;
    }

    /// Write the editor's changes, if any
    pub fn save_editor(&mut self) {
        let Some(editor) = self.editor.take() else {
            return;
        };
        let current = self
            .tasks
            .displayed()
            .iter()
            .find(|t| t.id == editor.task_id)
            .cloned();
        let Some(current) = current else {
            self.set_status("Task no longer exists".to_string());
            return;
        };
        let updated = editor.apply_to(&current);
        if !updated.fields_differ(&current) {
            return;
        }
        self.replace_task(updated);
    }

    /// Delete the task open in the editor
    pub fn delete_from_editor(&mut self) {
        if let Some(editor) = self.editor.take() {
            self.delete_task(&editor.task_id);
        }
    }

    pub fn delete_focused(&mut self) {
        if let Some(id) = self.focused_task().map(|t| t.id.clone()) {
            self.delete_task(&id);
        }
    }

    fn delete_task(&mut self, task_id: &str) {
        let id = task_id.to_string();
        let removed = self.tasks.try_apply(|current| {
            let next: Vec<Task> = current.iter().filter(|t| t.id != id).cloned().collect();
            (next.len() != current.len()).then_some(next)
        });
        if removed {
            self.gateway.submit(Mutation::DeleteTask(id));
            self.set_status("Task deleted".to_string());
        }
        self.clamp_focus();
    }

    /// Advance the focused card to the next status
    pub fn cycle_status(&mut self) {
        let Some(task) = self.focused_task() else {
            return;
        };
        let Some(idx) = self.statuses.iter().position(|s| s.id == task.status) else {
            return;
        };
        let next = state::cycle_index(idx, self.statuses.len(), true);
        let mut updated = task.clone();
        updated.status = self.statuses[next].id.clone();
        self.replace_task(updated);
    }

    /// Show `updated` in place of its old version and persist it
    fn replace_task(&mut self, updated: Task) {
        let id = updated.id.clone();
        let shown = updated.clone();
        self.tasks.apply(move |current| {
            current
                .iter()
                .map(|t| if t.id == shown.id { shown.clone() } else { t.clone() })
                .collect()
        });
        self.gateway.submit(Mutation::UpdateTask(updated));
        self.focus_task(&id);
    }

    pub fn start_rename(&mut self) {
        let kind = self.view.column_kind();
        if let Some(column) = self.focused_column() {
            self.rename = Some(RenamePrompt {
                column_id: column.id.to_string(),
                kind,
                input: column.title.to_string(),
            });
        }
    }

    /// Retitle the column locally, then persist
    pub fn confirm_rename(&mut self) {
        let Some(prompt) = self.rename.take() else {
            return;
        };
        let title = prompt.input.trim().to_string();
        if title.is_empty() {
            self.set_status("Column title cannot be empty".to_string());
            return;
        }
        match prompt.kind {
            ColumnKind::Status => {
                if let Some(s) = self.statuses.iter_mut().find(|s| s.id == prompt.column_id) {
                    s.title = title.clone();
                }
            }
            ColumnKind::Context => {
                if let Some(c) = self.contexts.iter_mut().find(|c| c.id == prompt.column_id) {
                    c.title = title.clone();
                }
            }
        }
        self.gateway.submit(Mutation::UpdateColumnTitle {
            id: prompt.column_id,
            title,
            kind: prompt.kind,
        });
    }
}
