//! Board core: reordering, optimistic state, grouping and drag handling
//!
//! Pure functions and plain data only. The TUI and CLI drive these; the
//! gateway persists their results.

pub mod drag;
pub mod optimistic;
pub mod projection;
pub mod reorder;

pub use drag::{DragEnd, DragSession};
pub use optimistic::Optimistic;
pub use projection::{columns, column_ids, locate, project, tasks_in, ColumnView};
pub use reorder::{
    array_move, changed_tasks, finalize_move, move_within_or_across, plan_move, resolve_target,
    DropTarget, MovePlan,
};
