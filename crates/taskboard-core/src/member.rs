//! Membership rules shared by the member dialog and the CLI.

use thiserror::Error;

use crate::model::{ProjectMember, ProjectMemberRequest};
use crate::status::ProjectRole;

/// A membership change the client refuses to send.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemberRuleError {
    /// Username was empty after trimming.
    #[error("username must not be blank")]
    BlankUsername,
    /// OWNER can only be set at project creation.
    #[error("the OWNER role cannot be granted")]
    OwnerNotAssignable,
    /// The owner's membership is immutable.
    #[error("{0} owns the project and cannot be changed or removed")]
    OwnerImmutable(String),
}

/// Validate an add-member request and return it with a trimmed username.
///
/// # Errors
/// Rejects blank usernames and the OWNER role.
pub fn prepare_add(request: &ProjectMemberRequest) -> Result<ProjectMemberRequest, MemberRuleError> {
    let username = request.username.trim();
    if username.is_empty() {
        return Err(MemberRuleError::BlankUsername);
    }
    if request.role == ProjectRole::Owner {
        return Err(MemberRuleError::OwnerNotAssignable);
    }
    Ok(ProjectMemberRequest {
        username: username.to_owned(),
        role: request.role,
    })
}

/// Validate a role change for `username` against the current member list.
///
/// # Errors
/// Rejects promoting anyone to OWNER and changing the owner's role.
pub fn check_role_change(
    members: &[ProjectMember],
    username: &str,
    role: ProjectRole,
) -> Result<(), MemberRuleError> {
    if role == ProjectRole::Owner {
        return Err(MemberRuleError::OwnerNotAssignable);
    }
    ensure_not_owner(members, username)
}

/// Validate removing `username` against the current member list.
///
/// # Errors
/// Rejects removing the owner.
pub fn check_removal(members: &[ProjectMember], username: &str) -> Result<(), MemberRuleError> {
    ensure_not_owner(members, username)
}

fn ensure_not_owner(members: &[ProjectMember], username: &str) -> Result<(), MemberRuleError> {
    if members
        .iter()
        .any(|member| member.username == username && member.role == ProjectRole::Owner)
    {
        return Err(MemberRuleError::OwnerImmutable(username.to_owned()));
    }
    Ok(())
}

/// Whether the list contains exactly one owner.
#[must_use]
pub fn has_single_owner(members: &[ProjectMember]) -> bool {
    members
        .iter()
        .filter(|member| member.role == ProjectRole::Owner)
        .count()
        == 1
}

/// Role lookup within a member list.
#[must_use]
pub fn role_of(members: &[ProjectMember], username: &str) -> Option<ProjectRole> {
    members
        .iter()
        .find(|member| member.username == username)
        .map(|member| member.role)
}

impl ProjectRole {
    /// May add, re-role and remove members.
    #[must_use]
    pub const fn can_manage_members(self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }

    /// May edit project details and any task.
    #[must_use]
    pub const fn can_edit_project(self) -> bool {
        matches!(self, Self::Owner | Self::Admin | Self::ProjectManager)
    }

    /// May delete tasks created by others.
    #[must_use]
    pub const fn can_delete_tasks(self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(username: &str, role: ProjectRole) -> ProjectMember {
        ProjectMember {
            username: username.into(),
            email: format!("{username}@example.invalid"),
            role,
            joined_at: "2024-01-01T00:00:00".into(),
        }
    }

    #[test]
    fn add_trims_and_rejects_owner() {
        let request = ProjectMemberRequest {
            username: "  alice ".into(),
            role: ProjectRole::Viewer,
        };
        let prepared = prepare_add(&request).unwrap_or_else(|err| panic!("valid request: {err}"));
        assert_eq!(prepared.username, "alice");

        let blank = ProjectMemberRequest::new("   ");
        assert_eq!(prepare_add(&blank), Err(MemberRuleError::BlankUsername));

        let owner = ProjectMemberRequest {
            username: "bob".into(),
            role: ProjectRole::Owner,
        };
        assert_eq!(prepare_add(&owner), Err(MemberRuleError::OwnerNotAssignable));
    }

    #[test]
    fn owner_cannot_be_changed_or_removed() {
        let members = vec![member("john", ProjectRole::Owner), member("jane", ProjectRole::Viewer)];
        assert!(has_single_owner(&members));
        assert_eq!(
            check_removal(&members, "john"),
            Err(MemberRuleError::OwnerImmutable("john".into()))
        );
        assert!(check_removal(&members, "jane").is_ok());
        assert!(check_role_change(&members, "jane", ProjectRole::Admin).is_ok());
        assert_eq!(
            check_role_change(&members, "jane", ProjectRole::Owner),
            Err(MemberRuleError::OwnerNotAssignable)
        );
        assert!(check_role_change(&members, "john", ProjectRole::Admin).is_err());
        assert_eq!(role_of(&members, "jane"), Some(ProjectRole::Viewer));
    }

    #[test]
    fn permissions_follow_role() {
        assert!(ProjectRole::Admin.can_manage_members());
        assert!(!ProjectRole::ProjectManager.can_manage_members());
        assert!(ProjectRole::ProjectManager.can_edit_project());
        assert!(!ProjectRole::TeamMember.can_edit_project());
        assert!(!ProjectRole::Viewer.can_delete_tasks());
    }
}
