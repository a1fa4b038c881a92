//! Request and response payloads exchanged with the board REST API.

use serde::{Deserialize, Serialize};

use crate::status::{ProjectRole, ProjectStatus, TaskPriority, TaskStatus};

/// Numeric identifier assigned by the backend.
pub type EntityId = i64;

/// Login credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    /// Either the username or the e-mail address.
    pub username_or_email: String,
    /// Plain-text password.
    pub password: String,
}

/// Account creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Desired username.
    pub username: String,
    /// Contact e-mail, also usable to log in.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// Token pair returned by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Bearer token for API calls.
    pub token: String,
    /// Token used against `/auth/refresh`.
    pub refresh_token: String,
}

/// Body of `/auth/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// Refresh token previously issued by login.
    pub refresh_token: String,
}

/// Create/update payload for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRequest {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Lifecycle status.
    pub status: ProjectStatus,
}

/// Project as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Server identity.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Lifecycle status.
    pub status: ProjectStatus,
    /// Username of the creator.
    pub created_by: String,
    /// Creation timestamp as emitted by the server.
    pub created_at: String,
    /// Number of tasks in the project.
    #[serde(default)]
    pub task_count: u32,
    /// Number of members.
    #[serde(default)]
    pub member_count: u32,
    /// Member usernames.
    #[serde(default)]
    pub members: Vec<String>,
}

impl Project {
    /// Request that would recreate this project's editable fields.
    #[must_use]
    pub fn to_request(&self) -> ProjectRequest {
        ProjectRequest {
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
        }
    }
}

/// Create/update payload for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Board column.
    pub status: TaskStatus,
    /// Urgency.
    pub priority: TaskPriority,
    /// Assignee user id, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<EntityId>,
    /// Owning project.
    pub project_id: EntityId,
    /// Due timestamp, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Attached label ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_ids: Option<Vec<EntityId>>,
}

impl TaskRequest {
    /// Rebuild an update request from an existing task.
    ///
    /// The response only carries the assignee's username, so the assignee id
    /// is left unset.
    #[must_use]
    pub fn from_task(task: &Task, project_id: EntityId) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            assigned_to_id: None,
            project_id,
            due_date: task.due_date.clone(),
            label_ids: Some(task.labels.iter().map(|label| label.id).collect()),
        }
    }
}

/// Task as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server identity.
    pub id: EntityId,
    /// Short title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Board column.
    pub status: TaskStatus,
    /// Urgency.
    pub priority: TaskPriority,
    /// Assignee username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// Name of the owning project.
    #[serde(default)]
    pub project_name: String,
    /// Username of the creator.
    pub created_by: String,
    /// Creation timestamp as emitted by the server.
    pub created_at: String,
    /// Due timestamp, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Attached labels in server order.
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Task {
    /// Whether the task has a (non-blank) assignee.
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        self.assigned_to.as_deref().is_some_and(|name| !name.is_empty())
    }

    /// Whether every attached label belongs to `project_labels`.
    #[must_use]
    pub fn labels_within(&self, project_labels: &[Label]) -> bool {
        self.labels
            .iter()
            .all(|label| project_labels.iter().any(|known| known.id == label.id))
    }
}

/// Create/update payload for a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRequest {
    /// Display name.
    pub name: String,
    /// CSS color value.
    pub color: String,
}

/// Label as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    /// Server identity.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// CSS color value.
    pub color: String,
}

/// Body of the add-member call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMemberRequest {
    /// Existing username to add.
    pub username: String,
    /// Role granted on join.
    pub role: ProjectRole,
}

impl ProjectMemberRequest {
    /// Request with the default role.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role: ProjectRole::default(),
        }
    }
}

/// Member entry as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
    /// Identity within the project.
    pub username: String,
    /// Contact address.
    #[serde(default)]
    pub email: String,
    /// Role in the project.
    pub role: ProjectRole,
    /// Join timestamp as emitted by the server.
    #[serde(default)]
    pub joined_at: String,
}
