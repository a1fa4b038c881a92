//! Reducer for the transient notification queue.
//!
//! The queue is newest-first and holds at most [`TOAST_LIMIT`] entries.
//! Scheduling the removal of dismissed toasts is left to the caller; see
//! [`ToastState::dismiss_targets`].

use serde::{Deserialize, Serialize};

/// Maximum number of toasts kept in the queue.
pub const TOAST_LIMIT: usize = 1;

/// Visual style of a toast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    /// Neutral information.
    #[default]
    Default,
    /// Error or destructive outcome.
    Destructive,
}

/// A notification record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    /// Identity generated when the toast is created.
    pub id: String,
    /// Headline.
    pub title: Option<String>,
    /// Body text.
    pub description: Option<String>,
    /// Visual style.
    pub variant: ToastVariant,
    /// Visible until dismissed.
    pub open: bool,
}

/// Fields to merge into an existing toast; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastUpdate {
    /// Target toast.
    pub id: String,
    /// New headline.
    pub title: Option<String>,
    /// New body text.
    pub description: Option<String>,
    /// New style.
    pub variant: Option<ToastVariant>,
    /// New visibility.
    pub open: Option<bool>,
}

impl Toast {
    fn merge(&mut self, update: ToastUpdate) {
        if let Some(title) = update.title {
            self.title = Some(title);
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(variant) = update.variant {
            self.variant = variant;
        }
        if let Some(open) = update.open {
            self.open = open;
        }
    }
}

/// Transitions accepted by [`ToastState::reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastAction {
    /// Prepend and truncate to [`TOAST_LIMIT`].
    Add(Toast),
    /// Merge into the toast with the same id; no-op when absent.
    Update(ToastUpdate),
    /// Close one toast, or every toast when `None`.
    Dismiss(Option<String>),
    /// Drop one toast, or clear the queue when `None`.
    Remove(Option<String>),
}

/// Queue contents, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastState {
    toasts: Vec<Toast>,
}

impl ToastState {
    /// Current toasts, newest first.
    #[must_use]
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Look up a toast by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Toast> {
        self.toasts.iter().find(|toast| toast.id == id)
    }

    /// Ids whose removal must be scheduled when dismissing `id` (or all).
    #[must_use]
    pub fn dismiss_targets(&self, id: Option<&str>) -> Vec<String> {
        match id {
            Some(id) => vec![id.to_owned()],
            None => self.toasts.iter().map(|toast| toast.id.clone()).collect(),
        }
    }

    /// Apply `action` and return the next state.
    #[must_use]
    pub fn reduce(mut self, action: ToastAction) -> Self {
        match action {
            ToastAction::Add(toast) => {
                self.toasts.insert(0, toast);
                self.toasts.truncate(TOAST_LIMIT);
            }
            ToastAction::Update(update) => {
                if let Some(toast) = self.toasts.iter_mut().find(|toast| toast.id == update.id) {
                    toast.merge(update);
                }
            }
            ToastAction::Dismiss(id) => {
                for toast in &mut self.toasts {
                    if id.as_deref().is_none_or(|id| toast.id == id) {
                        toast.open = false;
                    }
                }
            }
            ToastAction::Remove(None) => self.toasts.clear(),
            ToastAction::Remove(Some(id)) => self.toasts.retain(|toast| toast.id != id),
        }
        self
    }
}
