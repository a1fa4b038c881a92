//! Filtering for kanban task lists.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::model::Task;
use crate::status::{ParseEnumError, TaskPriority};
use crate::text_matcher::TextMatcher;
use crate::timestamp::{add_days, add_months, local_date, parse_timestamp, start_of_day};

/// Token that selects tasks without an assignee.
pub const UNASSIGNED: &str = "unassigned";

/// Assignee criterion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssigneeFilter {
    /// Only tasks nobody is assigned to.
    Unassigned,
    /// Only tasks assigned to this exact username.
    User(String),
}

impl AssigneeFilter {
    /// Interpret a picker value, mapping the `unassigned` sentinel.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "" => None,
            UNASSIGNED => Some(Self::Unassigned),
            user => Some(Self::User(user.to_owned())),
        }
    }

    fn matches(&self, task: &Task) -> bool {
        match self {
            Self::Unassigned => !task.is_assigned(),
            Self::User(user) => task.assigned_to.as_deref() == Some(user.as_str()),
        }
    }
}

/// Due-date window relative to the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DueDateFilter {
    /// Due instant already passed.
    Overdue,
    /// Due on the current calendar day.
    Today,
    /// Due on the next calendar day.
    Tomorrow,
    /// Due between the start of today and seven days later.
    Week,
    /// Due between the start of today and one calendar month later.
    Month,
    /// No due date set.
    NoDate,
}

impl DueDateFilter {
    /// Token accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
            Self::Week => "week",
            Self::Month => "month",
            Self::NoDate => "no-date",
        }
    }

    fn matches(self, due: Option<&str>, now: OffsetDateTime) -> bool {
        let Some(raw) = due.filter(|raw| !raw.is_empty()) else {
            return self == Self::NoDate;
        };
        let Some(due) = parse_timestamp(raw, now.offset()) else {
            return false;
        };
        let today = start_of_day(now);
        let due_day = local_date(due, now.offset());
        match self {
            Self::Overdue => due < now,
            Self::Today => due_day == today.date(),
            Self::Tomorrow => due_day == add_days(today, 1).date(),
            Self::Week => due >= today && due <= add_days(today, 7),
            Self::Month => due >= today && due <= add_months(today, 1),
            Self::NoDate => false,
        }
    }
}

impl FromStr for DueDateFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "overdue" => Ok(Self::Overdue),
            "today" => Ok(Self::Today),
            "tomorrow" => Ok(Self::Tomorrow),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "no-date" | "none" => Ok(Self::NoDate),
            _ => Err(ParseEnumError {
                kind: "due date filter",
                token: s.to_owned(),
            }),
        }
    }
}

/// Filter criteria for a task list. Tasks are never reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    /// Case-insensitive substring over title, description, assignee and creator.
    pub search: String,
    /// Assignee criterion.
    pub assigned_to: Option<AssigneeFilter>,
    /// Exact priority match.
    pub priority: Option<TaskPriority>,
    /// Label names; a task passes when it carries any of them.
    pub labels: BTreeSet<String>,
    /// Due-date window.
    pub due_date: Option<DueDateFilter>,
    /// Exact creator username match.
    pub created_by: Option<String>,
    /// Only tasks whose due instant has passed.
    pub has_overdue: bool,
}

impl TaskFilter {
    /// Number of criteria in effect; each selected label counts once.
    #[must_use]
    pub fn active_count(&self) -> usize {
        let flags = [
            !self.search.is_empty(),
            self.assigned_to.is_some(),
            self.priority.is_some(),
            self.due_date.is_some(),
            self.created_by.is_some(),
            self.has_overdue,
        ];
        flags.into_iter().filter(|active| *active).count() + self.labels.len()
    }

    /// Add the label if absent, remove it otherwise.
    pub fn toggle_label(&mut self, name: &str) {
        if !self.labels.remove(name) {
            self.labels.insert(name.to_owned());
        }
    }

    /// Whether `task` passes every criterion.
    #[must_use]
    pub fn matches(&self, task: &Task, now: OffsetDateTime) -> bool {
        if let Some(matcher) = TextMatcher::new(&self.search)
            && !matcher.matches(task)
        {
            return false;
        }
        if self
            .assigned_to
            .as_ref()
            .is_some_and(|assignee| !assignee.matches(task))
        {
            return false;
        }
        if self.priority.is_some_and(|priority| task.priority != priority) {
            return false;
        }
        if !self.labels.is_empty() && !task.labels.iter().any(|label| self.labels.contains(&label.name)) {
            return false;
        }
        if self
            .created_by
            .as_deref()
            .is_some_and(|creator| task.created_by != creator)
        {
            return false;
        }
        if self
            .due_date
            .is_some_and(|window| !window.matches(task.due_date.as_deref(), now))
        {
            return false;
        }
        if self.has_overdue && !DueDateFilter::Overdue.matches(task.due_date.as_deref(), now) {
            return false;
        }
        true
    }

    /// Produce the filtered view of `tasks` in input order. The input is not modified.
    #[must_use]
    pub fn apply(&self, tasks: &[Task], now: OffsetDateTime) -> Vec<Task> {
        tasks
            .iter()
            .filter(|task| self.matches(task, now))
            .cloned()
            .collect()
    }
}

/// Picker options derived from a task list, each distinct and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilterOptions {
    /// Assignee usernames.
    pub assignees: Vec<String>,
    /// Creator usernames.
    pub creators: Vec<String>,
    /// Label names.
    pub labels: Vec<String>,
}

impl TaskFilterOptions {
    /// Collect the options offered for `tasks`.
    #[must_use]
    pub fn collect(tasks: &[Task]) -> Self {
        let assignees: BTreeSet<String> = tasks.iter().filter_map(|task| task.assigned_to.clone()).collect();
        let creators: BTreeSet<String> = tasks.iter().map(|task| task.created_by.clone()).collect();
        let labels: BTreeSet<String> = tasks
            .iter()
            .flat_map(|task| task.labels.iter().map(|label| label.name.clone()))
            .collect();
        Self {
            assignees: assignees.into_iter().collect(),
            creators: creators.into_iter().collect(),
            labels: labels.into_iter().collect(),
        }
    }
}
