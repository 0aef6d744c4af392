//! Drag gesture state machine
//!
//! `Idle -> Dragging -> Idle`. Hovering applies moves speculatively; the drop
//! commits whatever the working list has become, even when the last hover
//! changed nothing, so a container-only change is never skipped.

use super::reorder::{finalize_move, move_within_or_across, DropTarget};
use crate::model::{Task, ViewKind};

/// Result of releasing a dragged card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEnd {
    /// Persist this list (orders already dense)
    Commit(Vec<Task>),
    /// Released on nothing: restore this pre-drag list, persist nothing
    Cancel(Vec<Task>),
}

/// An in-flight drag of one card
#[derive(Debug, Clone)]
pub struct DragSession {
    active_id: String,
    origin: Vec<Task>,
    last_target: Option<DropTarget>,
}

impl DragSession {
    /// Pick up `active_id`. `None` if no such task is shown.
    pub fn start(tasks: &[Task], active_id: &str) -> Option<Self> {
        if !tasks.iter().any(|t| t.id == active_id) {
            return None;
        }
        Some(Self {
            active_id: active_id.to_string(),
            origin: tasks.to_vec(),
            last_target: None,
        })
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    /// The card as it looked when picked up
    pub fn active_task(&self) -> Option<&Task> {
        self.origin.iter().find(|t| t.id == self.active_id)
    }

    /// Board as it was when the drag started
    pub fn origin(&self) -> &[Task] {
        &self.origin
    }

    pub fn last_target(&self) -> Option<&DropTarget> {
        self.last_target.as_ref()
    }

    /// Hover over `target`. Returns the new working list, or `None` when the
    /// hover is a no-op. Repeating the current hover target is a no-op.
    pub fn over(&mut self, tasks: &[Task], target: &DropTarget, view: ViewKind) -> Option<Vec<Task>> {
        if !target.is_actionable() || self.last_target.as_ref() == Some(target) {
            return None;
        }
        self.last_target = Some(target.clone());
        move_within_or_across(tasks, &self.active_id, target, view)
    }

    /// Release over `target`. The current working list is ground truth; the
    /// target is only applied if it was not already hovered.
    pub fn end(self, tasks: &[Task], target: &DropTarget, view: ViewKind) -> DragEnd {
        if !target.is_actionable() {
            return DragEnd::Cancel(self.origin);
        }

        let already_hovered = self.last_target.as_ref() == Some(target);
        let working = if already_hovered {
            None
        } else {
            move_within_or_across(tasks, &self.active_id, target, view)
        };

        match working {
            Some(moved) => DragEnd::Commit(finalize_move(&moved)),
            None => DragEnd::Commit(finalize_move(tasks)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(id: &str, order: i32, status: &str) -> Task {
        Task {
            id: id.to_string(),
            title: id.to_string(),
            status: status.to_string(),
            context: "c1".to_string(),
            tags: Vec::new(),
            color: None,
            order,
        }
    }

    fn abc() -> Vec<Task> {
        vec![
            make_task("a", 0, "todo"),
            make_task("b", 1, "todo"),
            make_task("c", 2, "done"),
        ]
    }

    fn summary(tasks: &[Task]) -> Vec<(&str, i32, &str)> {
        tasks
            .iter()
            .map(|t| (t.id.as_str(), t.order, t.status.as_str()))
            .collect()
    }

    #[test]
    fn test_start_unknown_task() {
        assert!(DragSession::start(&abc(), "zzz").is_none());
    }

    #[test]
    fn test_hover_then_drop_commits_working_list() {
        let tasks = abc();
        let target = DropTarget::Task("c".to_string());
        let mut drag = DragSession::start(&tasks, "a").unwrap();

        let working = drag.over(&tasks, &target, ViewKind::Status).unwrap();
        let DragEnd::Commit(done) = drag.end(&working, &target, ViewKind::Status) else {
            panic!("expected commit");
        };

        assert_eq!(
            summary(&done),
            vec![("b", 0, "todo"), ("c", 1, "done"), ("a", 2, "done")]
        );
    }

    #[test]
    fn test_repeated_hover_is_idempotent() {
        let tasks = abc();
        let target = DropTarget::Task("c".to_string());
        let mut drag = DragSession::start(&tasks, "a").unwrap();

        let working = drag.over(&tasks, &target, ViewKind::Status).unwrap();
        assert!(drag.over(&working, &target, ViewKind::Status).is_none());

        // A different target still moves the card
        let back = DropTarget::Task("b".to_string());
        let moved = drag.over(&working, &back, ViewKind::Status).unwrap();
        assert_eq!(moved[0].id, "a");
        assert_eq!(moved[0].status, "todo");
    }

    #[test]
    fn test_drop_without_hover_applies_target() {
        let tasks = abc();
        let drag = DragSession::start(&tasks, "a").unwrap();
        let DragEnd::Commit(done) = drag.end(&tasks, &DropTarget::Task("c".to_string()), ViewKind::Status) else {
            panic!("expected commit");
        };
        assert_eq!(done[2].id, "a");
        assert_eq!(done[2].status, "done");
    }

    #[test]
    fn test_drop_in_place_still_commits() {
        let mut tasks = abc();
        tasks[0].order = 10;
        let target = DropTarget::Task("a".to_string());
        let mut drag = DragSession::start(&tasks, "a").unwrap();

        assert!(drag.over(&tasks, &target, ViewKind::Status).is_none());
        let end = drag.end(&tasks, &target, ViewKind::Status);
        assert_eq!(
            end,
            DragEnd::Commit(vec![
                make_task("a", 0, "todo"),
                make_task("b", 1, "todo"),
                make_task("c", 2, "done"),
            ])
        );
    }

    #[test]
    fn test_release_outside_cancels() {
        let tasks = abc();
        let mut drag = DragSession::start(&tasks, "a").unwrap();
        let working = drag
            .over(&tasks, &DropTarget::Container("done".to_string()), ViewKind::Status)
            .unwrap();
        assert_ne!(working, tasks);

        assert_eq!(
            drag.end(&working, &DropTarget::Unresolved, ViewKind::Status),
            DragEnd::Cancel(tasks)
        );
    }

    #[test]
    fn test_unresolved_hover_is_ignored() {
        let tasks = abc();
        let mut drag = DragSession::start(&tasks, "b").unwrap();
        assert!(drag.over(&tasks, &DropTarget::Unresolved, ViewKind::Status).is_none());
        assert!(drag.last_target().is_none());
        assert_eq!(drag.active_task().map(|t| t.order), Some(1));
    }
}
