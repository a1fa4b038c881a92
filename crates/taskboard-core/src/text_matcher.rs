use crate::model::{Project, Task};

/// Case-insensitive substring matcher for searchable records.
#[derive(Debug, Clone)]
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Normalize a query string into a matcher. Returns `None` for empty inputs.
    ///
    /// Whitespace inside the query is significant; only a query with no
    /// characters at all disables the search.
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        if query.is_empty() {
            return None;
        }
        Some(Self {
            needle: query.to_lowercase(),
        })
    }

    /// Whether `value` contains the query, ignoring case.
    #[must_use]
    pub fn matches_field(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.needle)
    }

    /// Whether any searchable field of `record` contains the query.
    #[must_use]
    pub fn matches<R: Searchable + ?Sized>(&self, record: &R) -> bool {
        record.search_fields().any(|field| self.matches_field(field))
    }
}

/// Records exposing the text fields that free-text search inspects.
pub trait Searchable {
    /// Iterate over the searchable text fields.
    fn search_fields(&self) -> impl Iterator<Item = &str>;
}

impl Searchable for Project {
    fn search_fields(&self) -> impl Iterator<Item = &str> {
        [
            self.name.as_str(),
            self.description.as_str(),
            self.created_by.as_str(),
        ]
        .into_iter()
    }
}

impl Searchable for Task {
    fn search_fields(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.title.as_str()),
            Some(self.description.as_str()),
            self.assigned_to.as_deref(),
            Some(self.created_by.as_str()),
        ]
        .into_iter()
        .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{ProjectStatus, TaskPriority, TaskStatus};

    fn project() -> Project {
        Project {
            id: 1,
            name: "Lamport Clock Work".into(),
            description: "Refactor filters".into(),
            status: ProjectStatus::Active,
            created_by: "Alice".into(),
            created_at: "2024-01-01".into(),
            task_count: 0,
            member_count: 0,
            members: Vec::new(),
        }
    }

    fn matcher(query: &str) -> TextMatcher {
        TextMatcher::new(query).unwrap_or_else(|| panic!("matcher must exist for queries with content"))
    }

    #[test]
    fn matcher_skips_empty_queries() {
        assert!(TextMatcher::new("").is_none());
        assert!(TextMatcher::new(" ").is_some());
    }

    #[test]
    fn matcher_finds_text_across_project_fields() {
        let project = project();
        assert!(matcher("clock").matches(&project));
        assert!(matcher("REFACTOR").matches(&project));
        assert!(matcher("alice").matches(&project));
        assert!(!matcher("api").matches(&project));
    }

    #[test]
    fn matcher_reads_optional_assignee() {
        let mut task = Task {
            id: 1,
            title: "Improve CLI".into(),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: TaskPriority::Low,
            assigned_to: None,
            project_name: "Core".into(),
            created_by: "jane".into(),
            created_at: "2024-01-01".into(),
            due_date: None,
            labels: Vec::new(),
        };
        assert!(!matcher("bob").matches(&task));
        task.assigned_to = Some("Bob".into());
        assert!(matcher("bob").matches(&task));
        assert!(matcher("cli").matches(&task));
        assert!(!matcher("core").matches(&task));
    }
}
