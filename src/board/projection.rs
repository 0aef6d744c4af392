//! Column projection
//!
//! Groups the flat task list into the columns of the active view. Recomputed
//! on every render; owns nothing.

use crate::model::{Column, Context, Status, Task, ViewKind};

/// One column of the board with its cards in board order
#[derive(Debug, Clone)]
pub struct ColumnView<'a> {
    pub column: Column<'a>,
    pub tasks: Vec<&'a Task>,
}

/// Columns shown by a view: statuses or contexts
pub fn columns<'a>(view: ViewKind, statuses: &'a [Status], contexts: &'a [Context]) -> Vec<Column<'a>> {
    match view {
        ViewKind::Status => statuses.iter().map(Column::from).collect(),
        ViewKind::Context => contexts.iter().map(Column::from).collect(),
    }
}

/// Ids of the columns shown by a view
pub fn column_ids<'a>(view: ViewKind, statuses: &'a [Status], contexts: &'a [Context]) -> Vec<&'a str> {
    columns(view, statuses, contexts).into_iter().map(|c| c.id).collect()
}

/// Cards belonging to one column, in board order
pub fn tasks_in<'a>(tasks: &'a [Task], view: ViewKind, column_id: &str) -> Vec<&'a Task> {
    tasks.iter().filter(|t| t.container(view) == column_id).collect()
}

/// Partition `tasks` into `columns`. Tasks pointing at a column that is not
/// listed are left out.
pub fn project<'a>(tasks: &'a [Task], view: ViewKind, columns: &[Column<'a>]) -> Vec<ColumnView<'a>> {
    columns
        .iter()
        .map(|column| ColumnView {
            column: *column,
            tasks: tasks_in(tasks, view, column.id),
        })
        .collect()
}

/// Locate a task on the projected board as (column index, row index)
pub fn locate(board: &[ColumnView<'_>], task_id: &str) -> Option<(usize, usize)> {
    board.iter().enumerate().find_map(|(col, view)| {
        view.tasks
            .iter()
            .position(|t| t.id == task_id)
            .map(|row| (col, row))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(id: &str, status: &str, context: &str) -> Task {
        Task {
            id: id.to_string(),
            title: id.to_string(),
            status: status.to_string(),
            context: context.to_string(),
            tags: Vec::new(),
            color: None,
            order: 0,
        }
    }

    fn statuses() -> Vec<Status> {
        ["todo", "doing", "done"]
            .iter()
            .map(|id| Status {
                id: id.to_string(),
                title: id.to_uppercase(),
            })
            .collect()
    }

    fn contexts() -> Vec<Context> {
        vec![
            Context {
                id: "c1".to_string(),
                title: "Urgent".to_string(),
                color: "#ff5252".to_string(),
            },
            Context {
                id: "c2".to_string(),
                title: "Deep Work".to_string(),
                color: "#448aff".to_string(),
            },
        ]
    }

    #[test]
    fn test_project_status_view_keeps_order() {
        let tasks = vec![
            make_task("a", "todo", "c1"),
            make_task("b", "done", "c2"),
            make_task("c", "todo", "c2"),
        ];
        let (statuses, contexts) = (statuses(), contexts());
        let cols = columns(ViewKind::Status, &statuses, &contexts);
        let board = project(&tasks, ViewKind::Status, &cols);

        assert_eq!(board.len(), 3);
        let todo: Vec<_> = board[0].tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(todo, vec!["a", "c"]);
        assert!(board[1].tasks.is_empty());
        assert_eq!(board[2].tasks.len(), 1);
    }

    #[test]
    fn test_project_context_view() {
        let tasks = vec![
            make_task("a", "todo", "c1"),
            make_task("b", "done", "c2"),
            make_task("c", "todo", "c9"),
        ];
        let (statuses, contexts) = (statuses(), contexts());
        let cols = columns(ViewKind::Context, &statuses, &contexts);
        let board = project(&tasks, ViewKind::Context, &cols);

        assert_eq!(board.len(), 2);
        assert_eq!(board[0].column.color, Some("#ff5252"));
        // c9 is not a listed column
        let shown: usize = board.iter().map(|c| c.tasks.len()).sum();
        assert_eq!(shown, 2);
    }

    #[test]
    fn test_locate_and_column_ids() {
        let tasks = vec![make_task("a", "todo", "c1"), make_task("b", "done", "c1")];
        let (statuses, contexts) = (statuses(), contexts());
        let cols = columns(ViewKind::Status, &statuses, &contexts);
        let board = project(&tasks, ViewKind::Status, &cols);

        assert_eq!(locate(&board, "b"), Some((2, 0)));
        assert_eq!(locate(&board, "zzz"), None);
        assert_eq!(
            column_ids(ViewKind::Context, &statuses, &contexts),
            vec!["c1", "c2"]
        );
    }
}
