//! Reorder/move engine
//!
//! Tasks form one flat, globally ordered list. A column is only a filter over
//! that list, so moving a card into another column is a field assignment plus
//! a single splice. Everything here is pure.

use crate::model::{Task, ViewKind};

// =============================================================================
// Drop targets
// =============================================================================

/// What a drag gesture is currently over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Another card
    Task(String),
    /// A column, typically an empty one
    Container(String),
    /// Outside any droppable region
    Unresolved,
}

impl DropTarget {
    pub fn is_actionable(&self) -> bool {
        !matches!(self, DropTarget::Unresolved)
    }
}

/// Classify a raw drop id. Task ids win over column ids.
pub fn resolve_target(tasks: &[Task], column_ids: &[&str], over_id: Option<&str>) -> DropTarget {
    let Some(over_id) = over_id else {
        return DropTarget::Unresolved;
    };
    if tasks.iter().any(|t| t.id == over_id) {
        DropTarget::Task(over_id.to_string())
    } else if column_ids.contains(&over_id) {
        DropTarget::Container(over_id.to_string())
    } else {
        DropTarget::Unresolved
    }
}

// =============================================================================
// Moves
// =============================================================================

/// Remove the element at `from` and reinsert it at `to`, keeping every other
/// element in its relative order. `to` past the end appends.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() {
        return;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}

/// Move `active_id` onto `target` under the given view.
///
/// Returns `None` when nothing would change: unknown task, unresolved target,
/// dropping a card on itself, or dropping on its own column.
pub fn move_within_or_across(
    tasks: &[Task],
    active_id: &str,
    target: &DropTarget,
    view: ViewKind,
) -> Option<Vec<Task>> {
    let from = tasks.iter().position(|t| t.id == active_id)?;
    let current = tasks[from].container(view);

    let (container, to) = match target {
        DropTarget::Task(over_id) => {
            if over_id == active_id {
                return None;
            }
            let over_index = tasks.iter().position(|t| t.id == *over_id)?;
            (tasks[over_index].container(view), over_index)
        }
        DropTarget::Container(column_id) => {
            if column_id == current {
                return None;
            }
            (column_id.as_str(), tasks.len())
        }
        DropTarget::Unresolved => return None,
    };

    let crosses = container != current;
    if !crosses && from == to {
        return None;
    }

    let mut moved = tasks.to_vec();
    if crosses {
        moved[from].set_container(view, container);
    }
    array_move(&mut moved, from, to);
    Some(moved)
}

// =============================================================================
// Finalize
// =============================================================================

/// Rewrite `order` as a dense 0..N-1 sequence following list position
pub fn finalize_move(tasks: &[Task]) -> Vec<Task> {
    tasks
        .iter()
        .enumerate()
        .map(|(index, task)| Task {
            order: index as i32,
            ..task.clone()
        })
        .collect()
}

/// Tasks in `working` whose editable fields differ from `base` (or that
/// `base` has never seen)
pub fn changed_tasks(base: &[Task], working: &[Task]) -> Vec<Task> {
    working
        .iter()
        .filter(|task| match base.iter().find(|b| b.id == task.id) {
            Some(before) => before.fields_differ(task),
            None => true,
        })
        .cloned()
        .collect()
}

/// What a finished drag needs written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    /// Tasks to upsert before reordering
    pub updates: Vec<Task>,
    /// Whole board in its new order, `order` already dense
    pub ordered: Vec<Task>,
}

/// Diff the finalized list against the confirmed base
pub fn plan_move(base: &[Task], working: &[Task]) -> MovePlan {
    let ordered = finalize_move(working);
    let updates = changed_tasks(base, &ordered);
    MovePlan { updates, ordered }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn make_task(id: &str, order: i32, status: &str, context: &str) -> Task {
        Task {
            id: id.to_string(),
            title: id.to_uppercase(),
            status: status.to_string(),
            context: context.to_string(),
            tags: Vec::new(),
            color: None,
            order,
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    fn abc() -> Vec<Task> {
        vec![
            make_task("a", 0, "todo", "c1"),
            make_task("b", 1, "todo", "c1"),
            make_task("c", 2, "done", "c2"),
        ]
    }

    // --- Target resolution ---

    #[test]
    fn test_resolve_target_prefers_tasks() {
        let tasks = abc();
        let columns = ["todo", "done", "a"];

        assert_eq!(
            resolve_target(&tasks, &columns, Some("a")),
            DropTarget::Task("a".to_string())
        );
        assert_eq!(
            resolve_target(&tasks, &columns, Some("done")),
            DropTarget::Container("done".to_string())
        );
        assert_eq!(resolve_target(&tasks, &columns, Some("zzz")), DropTarget::Unresolved);
        assert_eq!(resolve_target(&tasks, &columns, None), DropTarget::Unresolved);
    }

    // --- Moves ---

    #[test]
    fn test_array_move() {
        let mut v = vec![1, 2, 3, 4];
        array_move(&mut v, 0, 2);
        assert_eq!(v, vec![2, 3, 1, 4]);

        array_move(&mut v, 3, 0);
        assert_eq!(v, vec![4, 2, 3, 1]);

        array_move(&mut v, 1, 99);
        assert_eq!(v, vec![4, 3, 1, 2]);

        array_move(&mut v, 10, 0);
        assert_eq!(v, vec![4, 3, 1, 2]);
    }

    #[test]
    fn test_drop_on_task_in_other_column() {
        let moved = move_within_or_across(
            &abc(),
            "a",
            &DropTarget::Task("c".to_string()),
            ViewKind::Status,
        )
        .unwrap();

        assert_eq!(ids(&moved), vec!["b", "c", "a"]);
        assert_eq!(moved[2].status, "done");
        // context untouched, other tasks untouched
        assert_eq!(moved[2].context, "c1");
        assert_eq!(moved[0].status, "todo");
        assert_eq!(moved[1].status, "done");
    }

    #[test]
    fn test_drop_within_column() {
        let moved = move_within_or_across(
            &abc(),
            "b",
            &DropTarget::Task("a".to_string()),
            ViewKind::Status,
        )
        .unwrap();
        assert_eq!(ids(&moved), vec!["b", "a", "c"]);
        assert_eq!(moved[0].status, "todo");
    }

    #[test]
    fn test_drop_on_empty_column_appends() {
        let moved = move_within_or_across(
            &abc(),
            "a",
            &DropTarget::Container("doing".to_string()),
            ViewKind::Status,
        )
        .unwrap();
        assert_eq!(ids(&moved), vec!["b", "c", "a"]);
        assert_eq!(moved[2].status, "doing");
    }

    #[test]
    fn test_context_view_rewrites_context_only() {
        let moved = move_within_or_across(
            &abc(),
            "b",
            &DropTarget::Container("c3".to_string()),
            ViewKind::Context,
        )
        .unwrap();
        let b = moved.iter().find(|t| t.id == "b").unwrap();
        assert_eq!(b.context, "c3");
        assert_eq!(b.status, "todo");
    }

    #[test]
    fn test_noop_moves() {
        let tasks = abc();
        let same = DropTarget::Task("a".to_string());
        assert!(move_within_or_across(&tasks, "a", &same, ViewKind::Status).is_none());

        let own_column = DropTarget::Container("todo".to_string());
        assert!(move_within_or_across(&tasks, "a", &own_column, ViewKind::Status).is_none());

        assert!(move_within_or_across(&tasks, "a", &DropTarget::Unresolved, ViewKind::Status).is_none());
        assert!(move_within_or_across(&tasks, "zzz", &same, ViewKind::Status).is_none());

        let gone = DropTarget::Task("zzz".to_string());
        assert!(move_within_or_across(&tasks, "a", &gone, ViewKind::Status).is_none());
    }

    // --- Finalize ---

    #[test]
    fn test_finalize_move_dense_orders() {
        let mut tasks = abc();
        tasks[0].order = 17;
        tasks[1].order = -3;
        tasks[2].order = 17;

        let finalized = finalize_move(&tasks);
        let orders: Vec<_> = finalized.iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(ids(&finalized), ids(&tasks));
    }

    #[test]
    fn test_drag_a_onto_c_scenario() {
        let base = abc();
        let moved = move_within_or_across(
            &base,
            "a",
            &DropTarget::Task("c".to_string()),
            ViewKind::Status,
        )
        .unwrap();
        let plan = plan_move(&base, &moved);

        let summary: Vec<_> = plan
            .ordered
            .iter()
            .map(|t| (t.id.as_str(), t.order, t.status.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![("b", 0, "todo"), ("c", 1, "done"), ("a", 2, "done")]
        );
        assert_eq!(ids(&plan.updates), vec!["a"]);
    }

    #[test]
    fn test_changed_tasks_includes_unknown() {
        let base = abc();
        let mut working = abc();
        working.push(make_task("d", 3, "todo", "c1"));
        assert_eq!(ids(&changed_tasks(&base, &working)), vec!["d"]);
    }

    // --- Properties ---

    fn arb_board() -> impl Strategy<Value = Vec<Task>> {
        prop::collection::vec((0..3usize, 0..3usize), 1..24).prop_map(|cells| {
            cells
                .into_iter()
                .enumerate()
                .map(|(i, (s, c))| {
                    make_task(
                        &format!("t{}", i),
                        i as i32,
                        ["todo", "doing", "done"][s],
                        ["c1", "c2", "c3"][c],
                    )
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_move_relocates_exactly_one(
            tasks in arb_board(),
            from_seed in any::<prop::sample::Index>(),
            to_seed in any::<prop::sample::Index>(),
        ) {
            let from = from_seed.index(tasks.len());
            let to = to_seed.index(tasks.len());
            prop_assume!(from != to);

            let active = tasks[from].id.clone();
            let over = tasks[to].id.clone();
            let moved = move_within_or_across(
                &tasks,
                &active,
                &DropTarget::Task(over.clone()),
                ViewKind::Status,
            ).unwrap();

            // permutation of the input
            let mut before: Vec<_> = ids(&tasks);
            let mut after: Vec<_> = ids(&moved);
            before.sort();
            after.sort();
            prop_assert_eq!(before, after);

            // active lands at the over index, others keep relative order
            prop_assert_eq!(&moved[to].id, &active);
            let others_before: Vec<_> = tasks.iter().filter(|t| t.id != active).map(|t| &t.id).collect();
            let others_after: Vec<_> = moved.iter().filter(|t| t.id != active).map(|t| &t.id).collect();
            prop_assert_eq!(others_before, others_after);

            // only the active task's grouping field may change
            for task in moved.iter().filter(|t| t.id != active) {
                let original = tasks.iter().find(|t| t.id == task.id).unwrap();
                prop_assert_eq!(original, task);
            }
            prop_assert_eq!(&moved[to].status, &tasks[to].status);
        }

        #[test]
        fn prop_finalize_is_dense(tasks in arb_board()) {
            let finalized = finalize_move(&tasks);
            for (index, task) in finalized.iter().enumerate() {
                prop_assert_eq!(task.order, index as i32);
            }
        }
    }
}
