//! The persistence contract the board core relies on
//!
//! `Database` is the production implementation. The gateway only talks to
//! this trait, so anything that can answer these calls can back a board.

use crate::db::{BoardSnapshot, Database, Result};
use crate::model::{ColumnKind, Context, Task};

/// CRUD plus batch reorder over statuses, contexts and tasks
pub trait BoardStore: Send + Sync + 'static {
    /// Statuses, contexts and tasks sorted by `order`
    fn fetch_all(&self) -> Result<BoardSnapshot>;
    /// Persist a new task at `max(order) + 1`
    fn create_task(&self, task: &Task) -> Result<Task>;
    /// Overwrite all fields but `id` and `order`
    fn update_task(&self, task: &Task) -> Result<Task>;
    fn delete_task(&self, id: &str) -> Result<()>;
    fn create_context(&self, context: &Context) -> Result<Context>;
    fn update_column_title(&self, id: &str, title: &str, kind: ColumnKind) -> Result<()>;
    /// Atomically write `order = position` for every task in the slice
    fn reorder_batch(&self, ordered: &[Task]) -> Result<()>;
}

impl BoardStore for Database {
    fn fetch_all(&self) -> Result<BoardSnapshot> {
        Database::fetch_all(self)
    }

    fn create_task(&self, task: &Task) -> Result<Task> {
        Database::create_task(self, task)
    }

    fn update_task(&self, task: &Task) -> Result<Task> {
        Database::update_task(self, task)
    }

    fn delete_task(&self, id: &str) -> Result<()> {
        Database::delete_task(self, id)
    }

    fn create_context(&self, context: &Context) -> Result<Context> {
        Database::create_context(self, context)
    }

    fn update_column_title(&self, id: &str, title: &str, kind: ColumnKind) -> Result<()> {
        Database::update_column_title(self, id, title, kind)
    }

    fn reorder_batch(&self, ordered: &[Task]) -> Result<()> {
        Database::reorder_batch(self, ordered)
    }
}
