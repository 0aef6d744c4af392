//! Task editor form state
//!
//! Holds the in-progress edits for one card. Choice fields keep an index
//! into the option lists captured when the editor opened.

use crate::model::{parse_tags, Context, Status, Task, CARD_COLORS};

/// Editor fields in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Title,
    Status,
    Context,
    Color,
    Tags,
}

impl EditorField {
    pub const ALL: [EditorField; 5] = [
        EditorField::Title,
        EditorField::Status,
        EditorField::Context,
        EditorField::Color,
        EditorField::Tags,
    ];

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            EditorField::Title => "Title",
            EditorField::Status => "Status",
            EditorField::Context => "Context",
            EditorField::Color => "Color",
            EditorField::Tags => "Tags",
        }
    }

    /// Free text rather than a choice list
    pub fn is_text(self) -> bool {
        matches!(self, EditorField::Title | EditorField::Tags)
    }
}

/// A (value, label) pair offered by a choice field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct TaskEditor {
    pub task_id: String,
    pub field: EditorField,
    pub title: String,
    pub tags: String,
    pub statuses: Vec<Choice>,
    pub contexts: Vec<Choice>,
    pub colors: Vec<Choice>,
    pub status_idx: usize,
    pub context_idx: usize,
    pub color_idx: usize,
}

impl TaskEditor {
    pub fn open(task: &Task, statuses: &[Status], contexts: &[Context]) -> Self {
        let statuses: Vec<Choice> = statuses
            .iter()
            .map(|s| Choice {
                value: s.id.clone(),
                label: s.title.clone(),
            })
            .collect();
        let contexts: Vec<Choice> = contexts
            .iter()
            .map(|c| Choice {
                value: c.id.clone(),
                label: c.title.clone(),
            })
            .collect();
        let mut colors: Vec<Choice> = CARD_COLORS
            .iter()
            .map(|(hex, name)| Choice {
                value: hex.to_string(),
                label: name.to_string(),
            })
            .collect();

        // Keep an off-palette colour selectable instead of silently resetting it
        if let Some(color) = &task.color {
            if !colors.iter().any(|c| c.value.eq_ignore_ascii_case(color)) {
                colors.push(Choice {
                    value: color.clone(),
                    label: color.clone(),
                });
            }
        }

        let status_idx = statuses.iter().position(|c| c.value == task.status).unwrap_or(0);
        let context_idx = contexts.iter().position(|c| c.value == task.context).unwrap_or(0);
        let color_idx = task
            .color
            .as_deref()
            .and_then(|color| colors.iter().position(|c| c.value.eq_ignore_ascii_case(color)))
            .unwrap_or(0);

        Self {
            task_id: task.id.clone(),
            field: EditorField::Title,
            title: task.title.clone(),
            tags: task.tags.join(", "),
            statuses,
            contexts,
            colors,
            status_idx,
            context_idx,
            color_idx,
        }
    }

    pub fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn prev_field(&mut self) {
        self.field = self.field.prev();
    }

    pub fn input(&mut self, c: char) {
        match self.field {
            EditorField::Title => self.title.push(c),
            EditorField::Tags => self.tags.push(c),
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.field {
            EditorField::Title => {
                self.title.pop();
            }
            EditorField::Tags => {
                self.tags.pop();
            }
            _ => {}
        }
    }

    /// Step the focused choice field; text fields ignore this
    pub fn cycle(&mut self, forward: bool) {
        let (idx, len) = match self.field {
            EditorField::Status => (&mut self.status_idx, self.statuses.len()),
            EditorField::Context => (&mut self.context_idx, self.contexts.len()),
            EditorField::Color => (&mut self.color_idx, self.colors.len()),
            EditorField::Title | EditorField::Tags => return,
        };
        *idx = super::state::cycle_index(*idx, len, forward);
    }

    /// Current label of a choice field, for rendering
    pub fn choice_label(&self, field: EditorField) -> &str {
        let (choices, idx) = match field {
            EditorField::Status => (&self.statuses, self.status_idx),
            EditorField::Context => (&self.contexts, self.context_idx),
            EditorField::Color => (&self.colors, self.color_idx),
            EditorField::Title => return &self.title,
            EditorField::Tags => return &self.tags,
        };
        choices.get(idx).map(|c| c.label.as_str()).unwrap_or("")
    }

    /// Selected colour value
    pub fn color(&self) -> Option<&str> {
        self.colors.get(self.color_idx).map(|c| c.value.as_str())
    }

    /// `task` with the edits applied. A blank title keeps the old one.
    pub fn apply_to(&self, task: &Task) -> Task {
        let mut updated = task.clone();
        let title = self.title.trim();
        if !title.is_empty() {
            updated.title = title.to_string();
        }
        if let Some(status) = self.statuses.get(self.status_idx) {
            updated.status = status.value.clone();
        }
        if let Some(context) = self.contexts.get(self.context_idx) {
            updated.context = context.value.clone();
        }
        updated.color = self.color().map(str::to_string);
        updated.tags = parse_tags(&self.tags);
        updated
    }
}
