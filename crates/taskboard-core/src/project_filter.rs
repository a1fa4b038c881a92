//! Filtering and sorting for the project dashboard.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::model::Project;
use crate::status::{ParseEnumError, ProjectStatus};
use crate::text_matcher::TextMatcher;
use crate::timestamp::{add_days, add_months, add_years, local_date, parse_timestamp, start_of_day};

/// Field the dashboard sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectSortKey {
    /// Case-insensitive name.
    Name,
    /// Creation timestamp.
    CreatedAt,
    /// Number of tasks.
    TaskCount,
    /// Number of members.
    MemberCount,
    /// Status, by wire spelling.
    Status,
}

impl ProjectSortKey {
    /// Token accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::CreatedAt => "createdAt",
            Self::TaskCount => "taskCount",
            Self::MemberCount => "memberCount",
            Self::Status => "status",
        }
    }
}

impl FromStr for ProjectSortKey {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "name" => Ok(Self::Name),
            "createdat" | "created" => Ok(Self::CreatedAt),
            "taskcount" | "tasks" => Ok(Self::TaskCount),
            "membercount" | "members" => Ok(Self::MemberCount),
            "status" => Ok(Self::Status),
            _ => Err(ParseEnumError {
                kind: "sort key",
                token: s.to_owned(),
            }),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

impl SortOrder {
    /// The opposite direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(ParseEnumError {
                kind: "sort order",
                token: s.to_owned(),
            }),
        }
    }
}

/// Sort key plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectSort {
    /// Field to compare.
    pub key: ProjectSortKey,
    /// Direction.
    pub order: SortOrder,
}

/// Creation-date window relative to the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    /// Created on the current calendar day.
    Today,
    /// Created on or after the start of today minus seven days.
    Week,
    /// Created on or after the start of today minus one calendar month.
    Month,
    /// Created on or after the start of today minus three calendar months.
    Quarter,
    /// Created on or after the start of today minus one calendar year.
    Year,
}

impl FromStr for DateRange {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            _ => Err(ParseEnumError {
                kind: "date range",
                token: s.to_owned(),
            }),
        }
    }
}

impl DateRange {
    fn contains(self, created: OffsetDateTime, now: OffsetDateTime) -> bool {
        let today = start_of_day(now);
        match self {
            Self::Today => local_date(created, now.offset()) == today.date(),
            Self::Week => created >= add_days(today, -7),
            Self::Month => created >= add_months(today, -1),
            Self::Quarter => created >= add_months(today, -3),
            Self::Year => created >= add_years(today, -1),
        }
    }
}

/// Filter criteria and sort preference for a project list.
///
/// Every field defaults to "inactive": an all-default filter returns its
/// input unchanged, in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectFilter {
    /// Case-insensitive substring over name, description and creator.
    pub search: String,
    /// Exact status match.
    pub status: Option<ProjectStatus>,
    /// Exact creator username match.
    pub created_by: Option<String>,
    /// Sort to apply after filtering; `None` keeps input order.
    pub sort: Option<ProjectSort>,
    /// Creation-date window.
    pub date_range: Option<DateRange>,
}

impl ProjectFilter {
    /// State the dashboard resets to: newest first, nothing filtered.
    #[must_use]
    pub fn cleared() -> Self {
        Self {
            sort: Some(ProjectSort {
                key: ProjectSortKey::CreatedAt,
                order: SortOrder::Desc,
            }),
            ..Self::default()
        }
    }

    /// Number of narrowing criteria in effect (sorting is not counted).
    #[must_use]
    pub fn active_count(&self) -> usize {
        [
            !self.search.is_empty(),
            self.status.is_some(),
            self.created_by.is_some(),
            self.date_range.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Whether `project` passes every narrowing criterion.
    #[must_use]
    pub fn matches(&self, project: &Project, now: OffsetDateTime) -> bool {
        if let Some(matcher) = TextMatcher::new(&self.search)
            && !matcher.matches(project)
        {
            return false;
        }
        if self.status.is_some_and(|status| project.status != status) {
            return false;
        }
        if self
            .created_by
            .as_deref()
            .is_some_and(|creator| project.created_by != creator)
        {
            return false;
        }
        if let Some(range) = self.date_range {
            let Some(created) = parse_timestamp(&project.created_at, now.offset()) else {
                return false;
            };
            if !range.contains(created, now) {
                return false;
            }
        }
        true
    }

    /// Produce the filtered, sorted view of `projects`. The input is not modified.
    #[must_use]
    pub fn apply(&self, projects: &[Project], now: OffsetDateTime) -> Vec<Project> {
        let mut filtered: Vec<Project> = projects
            .iter()
            .filter(|project| self.matches(project, now))
            .cloned()
            .collect();
        if let Some(sort) = self.sort {
            // `sort_by` is stable, so ties keep their filtered order.
            filtered.sort_by(|a, b| sort.order.apply(compare_by(sort.key, a, b, now)));
        }
        filtered
    }
}

fn compare_by(key: ProjectSortKey, a: &Project, b: &Project, now: OffsetDateTime) -> Ordering {
    match key {
        ProjectSortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        ProjectSortKey::CreatedAt => {
            let parse = |raw: &str| parse_timestamp(raw, now.offset());
            parse(&a.created_at).cmp(&parse(&b.created_at))
        }
        ProjectSortKey::TaskCount => a.task_count.cmp(&b.task_count),
        ProjectSortKey::MemberCount => a.member_count.cmp(&b.member_count),
        ProjectSortKey::Status => a.status.as_str().cmp(b.status.as_str()),
    }
}

/// Distinct creators in ascending order, for the creator picker.
#[must_use]
pub fn distinct_creators(projects: &[Project]) -> Vec<String> {
    projects
        .iter()
        .map(|project| project.created_by.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
