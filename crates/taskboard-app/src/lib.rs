//! Application layer logic for taskboard.
//!
//! This crate provides the services, configuration and view helpers that sit
//! between the API client and the command-line interface.

pub mod auth;
pub mod board;
pub mod config;
pub mod filter_util;
pub mod members;
pub mod toaster;
pub mod view;

use time::{OffsetDateTime, UtcOffset};

// Re-exports for convenience
pub use auth::{AuthError, AuthState, AuthStore, HOME_ROUTE, PUBLIC_ROUTES, RegistrationForm, RouteDecision};
pub use board::{BoardError, BoardService};
pub use config::{API_URL_ENV, ClientConfig, ToastConfig};
pub use filter_util::{FilterBuildError, FilterBuildResult, ProjectFilterBuilder, TaskFilterBuilder};
pub use members::{MemberError, MemberService};
pub use toaster::{ToastHandle, ToastInput, Toaster};
pub use view::{DerivedView, ViewFilter};

/// Current time in the local offset, falling back to UTC when it cannot be determined.
#[must_use]
pub fn local_now() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    UtcOffset::local_offset_at(now).map_or(now, |offset| now.to_offset(offset))
}
