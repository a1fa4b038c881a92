//! Kanban column grouping.

use crate::model::{EntityId, Task};
use crate::status::TaskStatus;

/// One board column and the tasks in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Status this column represents.
    pub status: TaskStatus,
    /// Tasks in input order.
    pub tasks: Vec<Task>,
}

/// Split `tasks` into the fixed columns, keeping relative order per column.
#[must_use]
pub fn columns(tasks: &[Task]) -> Vec<Column> {
    TaskStatus::ALL
        .into_iter()
        .map(|status| Column {
            status,
            tasks: tasks.iter().filter(|task| task.status == status).cloned().collect(),
        })
        .collect()
}

/// Whether dropping `task_id` on `target` would change anything.
#[must_use]
pub fn is_move(tasks: &[Task], task_id: EntityId, target: TaskStatus) -> bool {
    tasks
        .iter()
        .find(|task| task.id == task_id)
        .is_some_and(|task| task.status != target)
}
