use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a user-facing token does not name a known enum value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {token}")]
pub struct ParseEnumError {
    /// Which enumeration was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub token: String,
}

fn normalize(token: &str) -> String {
    token.trim().to_ascii_uppercase().replace(['-', ' '], "_")
}

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    /// Work is ongoing.
    Active,
    /// Project finished.
    Completed,
    /// Temporarily paused.
    OnHold,
    /// Abandoned.
    Cancelled,
}

impl ProjectStatus {
    /// Every status in display order.
    pub const ALL: [Self; 4] = [Self::Active, Self::Completed, Self::OnHold, Self::Cancelled];

    /// Wire spelling used by the REST API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::OnHold => "ON_HOLD",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::OnHold => "On Hold",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "ACTIVE" => Ok(Self::Active),
            "COMPLETED" => Ok(Self::Completed),
            "ON_HOLD" | "ONHOLD" => Ok(Self::OnHold),
            "CANCELLED" | "CANCELED" => Ok(Self::Cancelled),
            _ => Err(ParseEnumError {
                kind: "project status",
                token: s.to_owned(),
            }),
        }
    }
}

/// Kanban column a task lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started.
    Todo,
    /// Being worked on.
    InProgress,
    /// Waiting for review.
    Review,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// Board column order.
    pub const ALL: [Self; 4] = [Self::Todo, Self::InProgress, Self::Review, Self::Done];

    /// Wire spelling used by the REST API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Review => "REVIEW",
            Self::Done => "DONE",
        }
    }

    /// Column title.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Review => "Review",
            Self::Done => "Done",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "TODO" | "TO_DO" => Ok(Self::Todo),
            "IN_PROGRESS" | "INPROGRESS" => Ok(Self::InProgress),
            "REVIEW" => Ok(Self::Review),
            "DONE" => Ok(Self::Done),
            _ => Err(ParseEnumError {
                kind: "task status",
                token: s.to_owned(),
            }),
        }
    }
}

/// Task urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    /// Whenever.
    Low,
    /// Normal.
    Medium,
    /// Soon.
    High,
    /// Drop everything.
    Urgent,
}

impl TaskPriority {
    /// Every priority from lowest to highest.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    /// Wire spelling used by the REST API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            "URGENT" => Ok(Self::Urgent),
            _ => Err(ParseEnumError {
                kind: "task priority",
                token: s.to_owned(),
            }),
        }
    }
}

/// Role of a user inside a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectRole {
    /// Full control; exactly one per project.
    Owner,
    /// Manages the project and its members.
    Admin,
    /// Manages tasks and timeline.
    ProjectManager,
    /// Creates and edits tasks.
    #[default]
    TeamMember,
    /// Read-only access.
    Viewer,
}

impl ProjectRole {
    /// The closed set of roles.
    pub const ALL: [Self; 5] = [
        Self::Owner,
        Self::Admin,
        Self::ProjectManager,
        Self::TeamMember,
        Self::Viewer,
    ];

    /// Roles that may be granted through the add-member and change-role paths.
    #[must_use]
    pub const fn assignable() -> [Self; 4] {
        [Self::Admin, Self::ProjectManager, Self::TeamMember, Self::Viewer]
    }

    /// Wire spelling used by the REST API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Admin => "ADMIN",
            Self::ProjectManager => "PROJECT_MANAGER",
            Self::TeamMember => "TEAM_MEMBER",
            Self::Viewer => "VIEWER",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Owner => "Owner",
            Self::Admin => "Admin",
            Self::ProjectManager => "Project Manager",
            Self::TeamMember => "Team Member",
            Self::Viewer => "Viewer",
        }
    }

    /// One-line summary of what the role allows.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Owner => "Full control",
            Self::Admin => "Manage project & members",
            Self::ProjectManager => "Manage tasks & timeline",
            Self::TeamMember => "Create & edit tasks",
            Self::Viewer => "View only access",
        }
    }
}

impl FromStr for ProjectRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "OWNER" => Ok(Self::Owner),
            "ADMIN" => Ok(Self::Admin),
            "PROJECT_MANAGER" | "PM" => Ok(Self::ProjectManager),
            "TEAM_MEMBER" | "MEMBER" => Ok(Self::TeamMember),
            "VIEWER" => Ok(Self::Viewer),
            _ => Err(ParseEnumError {
                kind: "project role",
                token: s.to_owned(),
            }),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(ProjectStatus, TaskStatus, TaskPriority, ProjectRole);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_loose_tokens() {
        assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!(" on hold ".parse::<ProjectStatus>(), Ok(ProjectStatus::OnHold));
        assert_eq!("urgent".parse::<TaskPriority>(), Ok(TaskPriority::Urgent));
        assert_eq!("project_manager".parse::<ProjectRole>(), Ok(ProjectRole::ProjectManager));
    }

    #[test]
    fn rejects_unknown_tokens() {
        let err = "blocked"
            .parse::<TaskStatus>()
            .err()
            .unwrap_or_else(|| panic!("blocked is not a task status"));
        assert_eq!(err.kind, "task status");
        assert_eq!(err.to_string(), "unknown task status: blocked");
    }

    #[test]
    fn serializes_wire_spelling() {
        let json = serde_json::to_string(&ProjectRole::TeamMember)
            .unwrap_or_else(|err| panic!("serialize role: {err}"));
        assert_eq!(json, "\"TEAM_MEMBER\"");
        let status: ProjectStatus = serde_json::from_str("\"ON_HOLD\"")
            .unwrap_or_else(|err| panic!("deserialize status: {err}"));
        assert_eq!(status, ProjectStatus::OnHold);
    }

    #[test]
    fn owner_is_never_assignable() {
        assert!(!ProjectRole::assignable().contains(&ProjectRole::Owner));
        assert_eq!(ProjectRole::default(), ProjectRole::TeamMember);
    }
}
