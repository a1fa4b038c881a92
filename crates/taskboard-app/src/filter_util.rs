use std::str::FromStr;

use taskboard_core::{
    AssigneeFilter, DateRange, DueDateFilter, ParseEnumError, ProjectFilter, ProjectSort, ProjectSortKey,
    ProjectStatus, SortOrder, TaskFilter, TaskPriority,
};
use thiserror::Error;

/// Error type returned while constructing filters from user-facing inputs.
#[derive(Debug, Error)]
pub enum FilterBuildError {
    #[error("invalid {field}: {source}")]
    InvalidToken {
        field: &'static str,
        #[source]
        source: ParseEnumError,
    },
    #[error("--order requires --sort-by")]
    OrderWithoutKey,
}

/// Result alias for filter construction helpers.
pub type FilterBuildResult<T> = Result<T, FilterBuildError>;

/// Builder that accepts user-facing strings and normalizes them into a [`ProjectFilter`].
#[derive(Debug, Clone, Default)]
pub struct ProjectFilterBuilder {
    filter: ProjectFilter,
    sort_key: Option<ProjectSortKey>,
    order: Option<SortOrder>,
}

impl ProjectFilterBuilder {
    /// Create a builder with no criteria and no sort.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Search text; whitespace-only input clears it.
    #[must_use]
    pub fn with_search(mut self, text: Option<String>) -> Self {
        self.filter.search = normalize_text(text).unwrap_or_default();
        self
    }

    /// Status token such as `ACTIVE` or `on-hold`.
    ///
    /// # Errors
    /// Returns an error if the token is not a project status.
    pub fn with_status(mut self, token: Option<&str>) -> FilterBuildResult<Self> {
        self.filter.status = parse_optional::<ProjectStatus>("status", token)?;
        Ok(self)
    }

    /// Exact creator username.
    #[must_use]
    pub fn with_created_by(mut self, user: Option<String>) -> Self {
        self.filter.created_by = normalize_text(user);
        self
    }

    /// Sort key (`name`, `createdAt`, `taskCount`, `memberCount`, `status`) and order (`asc`, `desc`).
    ///
    /// # Errors
    /// Returns an error if either token is unknown.
    pub fn with_sort(mut self, key: Option<&str>, order: Option<&str>) -> FilterBuildResult<Self> {
        self.sort_key = parse_optional("sort key", key)?;
        self.order = parse_optional("sort order", order)?;
        Ok(self)
    }

    /// Creation window (`today`, `week`, `month`, `quarter`, `year`).
    ///
    /// # Errors
    /// Returns an error if the token is not a known range.
    pub fn with_date_range(mut self, token: Option<&str>) -> FilterBuildResult<Self> {
        self.filter.date_range = parse_optional::<DateRange>("date range", token)?;
        Ok(self)
    }

    /// Build the final [`ProjectFilter`]. An order without a key is rejected.
    ///
    /// # Errors
    /// Returns [`FilterBuildError::OrderWithoutKey`] when only an order was given.
    pub fn build(self) -> FilterBuildResult<ProjectFilter> {
        let mut filter = self.filter;
        filter.sort = match (self.sort_key, self.order) {
            (Some(key), order) => Some(ProjectSort {
                key,
                order: order.unwrap_or_default(),
            }),
            (None, Some(_)) => return Err(FilterBuildError::OrderWithoutKey),
            (None, None) => None,
        };
        Ok(filter)
    }
}

/// Builder that accepts user-facing strings and normalizes them into a [`TaskFilter`].
#[derive(Debug, Clone, Default)]
pub struct TaskFilterBuilder {
    filter: TaskFilter,
}

impl TaskFilterBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Search text; whitespace-only input clears it.
    #[must_use]
    pub fn with_search(mut self, text: Option<String>) -> Self {
        self.filter.search = normalize_text(text).unwrap_or_default();
        self
    }

    /// Assignee username or the `unassigned` sentinel.
    #[must_use]
    pub fn with_assignee(mut self, token: Option<&str>) -> Self {
        self.filter.assigned_to = token.map(str::trim).and_then(AssigneeFilter::from_token);
        self
    }

    /// Priority token such as `HIGH`.
    ///
    /// # Errors
    /// Returns an error if the token is not a priority.
    pub fn with_priority(mut self, token: Option<&str>) -> FilterBuildResult<Self> {
        self.filter.priority = parse_optional::<TaskPriority>("priority", token)?;
        Ok(self)
    }

    /// Require each label name (logical AND).
    #[must_use]
    pub fn with_labels(mut self, labels: &[String]) -> Self {
        self.filter.labels.extend(
            labels
                .iter()
                .map(|label| label.trim())
                .filter(|label| !label.is_empty())
                .map(str::to_owned),
        );
        self
    }

    /// Due-date bucket (`overdue`, `today`, `tomorrow`, `week`, `month`, `no-date`).
    ///
    /// # Errors
    /// Returns an error if the token is not a known bucket.
    pub fn with_due(mut self, token: Option<&str>) -> FilterBuildResult<Self> {
        self.filter.due_date = parse_optional::<DueDateFilter>("due date", token)?;
        Ok(self)
    }

    /// Exact creator username.
    #[must_use]
    pub fn with_created_by(mut self, user: Option<String>) -> Self {
        self.filter.created_by = normalize_text(user);
        self
    }

    /// Restrict to overdue tasks.
    #[must_use]
    pub const fn with_overdue(mut self, overdue: bool) -> Self {
        self.filter.has_overdue = overdue;
        self
    }

    /// Build the final [`TaskFilter`].
    #[must_use]
    pub fn build(self) -> TaskFilter {
        self.filter
    }
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    })
}

fn parse_optional<T>(field: &'static str, token: Option<&str>) -> FilterBuildResult<Option<T>>
where
    T: FromStr<Err = ParseEnumError>,
{
    let Some(raw) = token.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };
    raw.parse()
        .map(Some)
        .map_err(|source| FilterBuildError::InvalidToken { field, source })
}
