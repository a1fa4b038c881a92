//! Domain types and pure view logic for the task board client.

/// Kanban column grouping.
pub mod board;
/// Membership rules.
pub mod member;
/// REST payloads.
pub mod model;
/// Project filtering and sorting.
pub mod project_filter;
/// Status, priority and role enumerations.
pub mod status;
/// Task filtering.
pub mod task_filter;
/// Free-text search.
pub mod text_matcher;
/// Timestamp parsing and calendar arithmetic.
pub mod timestamp;
/// Notification queue reducer.
pub mod toast;

pub use model::{
    AuthRequest, AuthResponse, EntityId, Label, LabelRequest, Project, ProjectMember, ProjectMemberRequest,
    ProjectRequest, RefreshRequest, RegisterRequest, Task, TaskRequest,
};
pub use project_filter::{DateRange, ProjectFilter, ProjectSort, ProjectSortKey, SortOrder};
pub use status::{ParseEnumError, ProjectRole, ProjectStatus, TaskPriority, TaskStatus};
pub use task_filter::{AssigneeFilter, DueDateFilter, TaskFilter, TaskFilterOptions};
pub use toast::{TOAST_LIMIT, Toast, ToastAction, ToastState, ToastUpdate, ToastVariant};
