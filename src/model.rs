//! Board domain types
//!
//! A task carries both a status and a context. The two views of the board are
//! filters over one ordered task list, not separate lists.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Default card colour for new tasks
pub const DEFAULT_CARD_COLOR: &str = "#ffffff";

/// Card background palette offered by the task editor
pub const CARD_COLORS: &[(&str, &str)] = &[
    ("#ffffff", "Default"),
    ("#fff0f0", "Red"),
    ("#fffacd", "Yellow"),
    ("#e0ffff", "Cyan"),
    ("#f0fff0", "Green"),
    ("#e6e6fa", "Purple"),
];

/// Title given to tasks created from a column's "add" action
pub const NEW_TASK_TITLE: &str = "New Task";

/// Title given to contexts created from the "add list" action
pub const NEW_CONTEXT_TITLE: &str = "New List";

/// A card on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    /// References `Status::id`
    pub status: String,
    /// References `Context::id`
    pub context: String,
    pub tags: Vec<String>,
    pub color: Option<String>,
    /// Position in the single board-wide ordering
    pub order: i32,
}

impl Task {
    /// Build a fresh task with a newly minted id
    pub fn new(title: &str, status: &str, context: &str) -> Self {
        Self {
            id: mint_id("t"),
            title: title.to_string(),
            status: status.to_string(),
            context: context.to_string(),
            tags: Vec::new(),
            color: Some(DEFAULT_CARD_COLOR.to_string()),
            order: 0,
        }
    }

    /// The column this task sits in under the given view
    pub fn container(&self, view: ViewKind) -> &str {
        match view {
            ViewKind::Status => &self.status,
            ViewKind::Context => &self.context,
        }
    }

    /// Reassign the grouping field of the given view
    pub fn set_container(&mut self, view: ViewKind, container: &str) {
        match view {
            ViewKind::Status => self.status = container.to_string(),
            ViewKind::Context => self.context = container.to_string(),
        }
    }

    /// True when any user-editable field differs from `other`.
    /// `order` is excluded: it is rewritten by reorder batches.
    pub fn fields_differ(&self, other: &Task) -> bool {
        self.title != other.title
            || self.status != other.status
            || self.context != other.context
            || self.tags != other.tags
            || self.color != other.color
    }
}

/// A fixed workflow lane (todo/doing/done)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: String,
    pub title: String,
}

/// A user-defined list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub id: String,
    pub title: String,
    pub color: String,
}

impl Context {
    /// New context with a minted id and a random colour
    pub fn new(title: &str) -> Self {
        Self {
            id: mint_id("c"),
            title: title.to_string(),
            color: random_color(),
        }
    }
}

/// Which grouping the board is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    #[default]
    Status,
    Context,
}

impl ViewKind {
    pub fn toggle(self) -> Self {
        match self {
            ViewKind::Status => ViewKind::Context,
            ViewKind::Context => ViewKind::Status,
        }
    }

    /// The column kind this view is grouped by
    pub fn column_kind(self) -> ColumnKind {
        match self {
            ViewKind::Status => ColumnKind::Status,
            ViewKind::Context => ColumnKind::Context,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewKind::Status => "status",
            ViewKind::Context => "context",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "status" => Ok(ViewKind::Status),
            "context" => Ok(ViewKind::Context),
            other => Err(format!("unknown view '{}' (expected status or context)", other)),
        }
    }
}

/// Table a column title lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Status,
    Context,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Status => f.write_str("status"),
            ColumnKind::Context => f.write_str("context"),
        }
    }
}

impl FromStr for ColumnKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<ViewKind>().map(ViewKind::column_kind)
    }
}

/// A status or context seen as a board column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub color: Option<&'a str>,
}

impl<'a> From<&'a Status> for Column<'a> {
    fn from(s: &'a Status) -> Self {
        Column {
            id: &s.id,
            title: &s.title,
            color: None,
        }
    }
}

impl<'a> From<&'a Context> for Column<'a> {
    fn from(c: &'a Context) -> Self {
        Column {
            id: &c.id,
            title: &c.title,
            color: Some(&c.color),
        }
    }
}

/// Split a comma separated tag string, dropping blanks
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Mint a client-side id such as `t-5f0c...`
pub fn mint_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// Random `#rrggbb` colour taken from uuid entropy
pub fn random_color() -> String {
    let bytes = Uuid::new_v4().into_bytes();
    format!("#{:02x}{:02x}{:02x}", bytes[0], bytes[1], bytes[2])
}

/// Palette name for a card colour, if it is one of ours
pub fn color_name(hex: &str) -> Option<&'static str> {
    CARD_COLORS
        .iter()
        .find(|(h, _)| h.eq_ignore_ascii_case(hex))
        .map(|(_, name)| *name)
}
