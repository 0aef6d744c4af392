//! Lanes - a single-user kanban board
//!
//! Tasks live in one globally ordered list. The board shows that list
//! grouped by status or by context; both views are filters, so moving a
//! card between columns only reassigns one field and splices the list.
//!
//! # Overview
//!
//! Edits are shown immediately (optimistic state) and written in the
//! background through a single worker. When a write lands the board is
//! re-fetched and the store's answer replaces whatever was shown.
//!
//! # Quick Start
//!
//! ```no_run
//! use lanes::{Database, Task};
//!
//! let db = Database::open_at(".lanes/lanes.db").unwrap();
//!
//! // Add a card to the "todo" lane, "Urgent" list
//! let task = db.create_task(&Task::new("Ship it", "todo", "c1")).unwrap();
//!
//! let board = db.fetch_all().unwrap();
//! println!("{} tasks, newest order {}", board.tasks.len(), task.order);
//! ```

pub mod board;
pub mod config;
pub mod db;
pub mod gateway;
pub mod init;
pub mod logging;
pub mod model;
pub mod schema;
pub mod store;
pub mod tui;

pub use board::{DragEnd, DragSession, DropTarget, MovePlan, Optimistic};
pub use config::Config;
pub use db::{BoardSnapshot, Database, StoreError};
pub use gateway::{Gateway, Invalidation, Mutation};
pub use model::{Column, ColumnKind, Context, Status, Task, ViewKind};
pub use store::BoardStore;
