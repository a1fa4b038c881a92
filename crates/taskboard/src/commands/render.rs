//! Plain-text rendering for command output.

use std::fmt::Write as _;

use taskboard_core::board::Column;
use taskboard_core::{Label, Project, ProjectMember, Task, Toast, ToastVariant};

const PLACEHOLDER: &str = "-";

pub fn project_table(projects: &[Project]) -> String {
    let mut out = String::from("ID | Name | Status | Created By | Created | Tasks | Members\n");
    out.push_str("-- | ---- | ------ | ---------- | ------- | ----- | -------\n");
    for project in projects {
        let _ = writeln!(
            out,
            "{} | {} | {} | {} | {} | {} | {}",
            project.id,
            project.name,
            project.status.label(),
            project.created_by,
            date_part(&project.created_at),
            project.task_count,
            project.member_count
        );
    }
    out
}

pub fn task_table(tasks: &[Task]) -> String {
    let mut out = String::from("ID | Title | Status | Priority | Assignee | Due | Labels\n");
    out.push_str("-- | ----- | ------ | -------- | -------- | --- | ------\n");
    for task in tasks {
        let _ = writeln!(
            out,
            "{} | {} | {} | {} | {} | {} | {}",
            task.id,
            task.title,
            task.status.label(),
            task.priority,
            task.assigned_to.as_deref().unwrap_or(PLACEHOLDER),
            task.due_date.as_deref().map_or(PLACEHOLDER, date_part),
            label_names(&task.labels)
        );
    }
    out
}

pub fn board(columns: &[Column]) -> String {
    let mut out = String::new();
    for column in columns {
        let _ = writeln!(out, "## {} ({})", column.status.label(), column.tasks.len());
        for task in &column.tasks {
            let assignee = task
                .assigned_to
                .as_deref()
                .map(|user| format!(" @{user}"))
                .unwrap_or_default();
            let _ = writeln!(out, "- #{} {} [{}]{assignee}", task.id, task.title, task.priority);
        }
        out.push('\n');
    }
    out
}

pub fn label_table(labels: &[Label]) -> String {
    let mut out = String::from("ID | Name | Color\n-- | ---- | -----\n");
    for label in labels {
        let _ = writeln!(out, "{} | {} | {}", label.id, label.name, label.color);
    }
    out
}

pub fn member_table(members: &[ProjectMember]) -> String {
    let mut out = String::from("Username | Email | Role | Joined\n-------- | ----- | ---- | ------\n");
    for member in members {
        let _ = writeln!(
            out,
            "{} | {} | {} | {}",
            member.username,
            member.email,
            member.role.label(),
            date_part(&member.joined_at)
        );
    }
    out
}

pub fn toast_line(toast: &Toast) -> String {
    let marker = match toast.variant {
        ToastVariant::Default => "ok",
        ToastVariant::Destructive => "error",
    };
    match (toast.title.as_deref(), toast.description.as_deref()) {
        (Some(title), Some(description)) => format!("[{marker}] {title}: {description}"),
        (Some(text), None) | (None, Some(text)) => format!("[{marker}] {text}"),
        (None, None) => format!("[{marker}]"),
    }
}

fn label_names(labels: &[Label]) -> String {
    if labels.is_empty() {
        return PLACEHOLDER.to_owned();
    }
    labels
        .iter()
        .map(|label| label.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn date_part(raw: &str) -> &str {
    raw.get(..10).unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_core::{ProjectRole, ProjectStatus, TaskPriority, TaskStatus};

    fn task(id: i64, assigned_to: Option<&str>) -> Task {
        Task {
            id,
            title: format!("Task {id}"),
            description: String::new(),
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            assigned_to: assigned_to.map(str::to_owned),
            project_name: "Core".into(),
            created_by: "jane".into(),
            created_at: "2024-01-01T00:00:00".into(),
            due_date: Some("2024-03-05T00:00:00".into()),
            labels: vec![Label {
                id: 1,
                name: "frontend".into(),
                color: "#3b82f6".into(),
            }],
        }
    }

    #[test]
    fn project_rows_show_date_only() {
        let out = project_table(&[Project {
            id: 4,
            name: "Alpha".into(),
            description: String::new(),
            status: ProjectStatus::OnHold,
            created_by: "john".into(),
            created_at: "2024-02-01T10:30:00".into(),
            task_count: 2,
            member_count: 3,
            members: Vec::new(),
        }]);
        assert!(out.contains("4 | Alpha | On Hold | john | 2024-02-01 | 2 | 3"));
    }

    #[test]
    fn task_rows_use_placeholders() {
        let mut unassigned = task(2, None);
        unassigned.due_date = None;
        unassigned.labels.clear();
        let out = task_table(&[task(1, Some("john")), unassigned]);
        assert!(out.contains("1 | Task 1 | In Progress | HIGH | john | 2024-03-05 | frontend"));
        assert!(out.contains("2 | Task 2 | In Progress | HIGH | - | - | -"));
    }

    #[test]
    fn board_lists_each_column() {
        let columns = taskboard_core::board::columns(&[task(1, Some("john"))]);
        let out = board(&columns);
        assert!(out.contains("## To Do (0)"));
        assert!(out.contains("## In Progress (1)\n- #1 Task 1 [HIGH] @john"));
    }

    #[test]
    fn members_and_toasts() {
        let out = member_table(&[ProjectMember {
            username: "jane".into(),
            email: "jane@example.com".into(),
            role: ProjectRole::ProjectManager,
            joined_at: "2024-01-02T00:00:00".into(),
        }]);
        assert!(out.contains("jane | jane@example.com | Project Manager | 2024-01-02"));

        let toast = Toast {
            id: "1".into(),
            title: Some("Error".into()),
            description: Some("Failed to remove member".into()),
            variant: ToastVariant::Destructive,
            open: true,
        };
        assert_eq!(toast_line(&toast), "[error] Error: Failed to remove member");
    }
}
