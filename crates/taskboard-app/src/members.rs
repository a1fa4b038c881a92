//! Project member management with toast feedback.

use taskboard_client::{ApiClient, ApiError};
use taskboard_core::member::{MemberRuleError, check_removal, check_role_change, prepare_add};
use taskboard_core::{EntityId, ProjectMember, ProjectMemberRequest, ProjectRole};
use thiserror::Error;
use tracing::warn;

use crate::toaster::{ToastInput, Toaster};

/// Errors raised by [`MemberService`].
#[derive(Debug, Error)]
pub enum MemberError {
    /// The change was refused locally and never sent.
    #[error(transparent)]
    Rule(#[from] MemberRuleError),
    /// The server call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Member list of one project.
///
/// Every server call reports its outcome as a toast. Failures are returned
/// as well so callers can decide how to continue.
#[derive(Debug)]
pub struct MemberService {
    client: ApiClient,
    toaster: Toaster,
    project_id: EntityId,
    members: Vec<ProjectMember>,
}

impl MemberService {
    /// Service for `project_id`, reporting through `toaster`.
    #[must_use]
    pub const fn new(client: ApiClient, toaster: Toaster, project_id: EntityId) -> Self {
        Self {
            client,
            toaster,
            project_id,
            members: Vec::new(),
        }
    }

    /// Members as of the last successful load.
    #[must_use]
    pub fn members(&self) -> &[ProjectMember] {
        &self.members
    }

    /// Refresh the member list.
    ///
    /// # Errors
    /// Returns the API error after showing a toast.
    pub async fn load(&mut self) -> Result<(), MemberError> {
        match self.client.project_members(self.project_id).await {
            Ok(members) => {
                self.members = members;
                Ok(())
            }
            Err(err) => Err(self.fail("Failed to load project members", err)),
        }
    }

    /// Add a member, then reload the list.
    ///
    /// # Errors
    /// Returns a rule error for blank usernames or the OWNER role, without
    /// sending anything; otherwise the API error after showing a toast.
    pub async fn add(&mut self, request: &ProjectMemberRequest) -> Result<(), MemberError> {
        let request = prepare_add(request)?;
        let result = async {
            self.client.add_project_member(self.project_id, &request).await?;
            self.client.project_members(self.project_id).await
        }
        .await;
        match result {
            Ok(members) => {
                self.members = members;
                self.toaster.toast(ToastInput::success(format!(
                    "{} has been added to the project",
                    request.username
                )));
                Ok(())
            }
            Err(err) => Err(self.fail(
                "Failed to add member. Please check if the username exists.",
                err,
            )),
        }
    }

    /// Change a member's role, then reload the list.
    ///
    /// # Errors
    /// Returns a rule error when the owner is involved; otherwise the API
    /// error after showing a toast.
    pub async fn update_role(&mut self, username: &str, role: ProjectRole) -> Result<(), MemberError> {
        check_role_change(&self.members, username, role)?;
        let result = async {
            self.client
                .update_member_role(self.project_id, username, role)
                .await?;
            self.client.project_members(self.project_id).await
        }
        .await;
        match result {
            Ok(members) => {
                self.members = members;
                self.toaster
                    .toast(ToastInput::success(format!("{username}'s role has been updated")));
                Ok(())
            }
            Err(err) => Err(self.fail("Failed to update member role", err)),
        }
    }

    /// Remove a member, then reload the list.
    ///
    /// # Errors
    /// Returns a rule error for the owner; otherwise the API error after
    /// showing a toast.
    pub async fn remove(&mut self, username: &str) -> Result<(), MemberError> {
        check_removal(&self.members, username)?;
        let result = async {
            self.client
                .remove_project_member(self.project_id, username)
                .await?;
            self.client.project_members(self.project_id).await
        }
        .await;
        match result {
            Ok(members) => {
                self.members = members;
                self.toaster.toast(ToastInput::success(format!(
                    "{username} has been removed from the project"
                )));
                Ok(())
            }
            Err(err) => Err(self.fail("Failed to remove member", err)),
        }
    }

    fn fail(&self, message: &str, err: ApiError) -> MemberError {
        warn!("project {} members: {message}: {err}", self.project_id);
        self.toaster.toast(ToastInput::error(message));
        err.into()
    }
}
