//! Toast queue with deferred removal.
//!
//! [`Toaster`] owns a [`ToastState`] and feeds every change through the core
//! reducer. Dismissing a toast closes it immediately and schedules its removal
//! on the ambient tokio runtime after the configured delay.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use taskboard_core::{Toast, ToastAction, ToastState, ToastUpdate, ToastVariant};
use tracing::debug;

use crate::config::DEFAULT_TOAST_REMOVE_DELAY_MS;

/// Content of a new toast, or fields to change on an existing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastInput {
    /// Headline.
    pub title: Option<String>,
    /// Body text.
    pub description: Option<String>,
    /// Visual style.
    pub variant: ToastVariant,
}

impl ToastInput {
    /// Neutral toast.
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            title: Some("Success".to_owned()),
            description: Some(description.into()),
            variant: ToastVariant::Default,
        }
    }

    /// Destructive toast.
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: Some("Error".to_owned()),
            description: Some(description.into()),
            variant: ToastVariant::Destructive,
        }
    }
}

/// Shared toast queue. Clones observe the same state.
#[derive(Debug, Clone)]
pub struct Toaster {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    state: Mutex<ToastState>,
    next_id: AtomicU64,
    scheduled: Mutex<HashSet<String>>,
    remove_delay: Duration,
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_TOAST_REMOVE_DELAY_MS))
    }
}

impl Toaster {
    /// Queue whose dismissed toasts are removed after `remove_delay`.
    #[must_use]
    pub fn new(remove_delay: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(ToastState::default()),
                next_id: AtomicU64::new(0),
                scheduled: Mutex::new(HashSet::new()),
                remove_delay,
            }),
        }
    }

    /// Show a toast and return a handle to it.
    pub fn toast(&self, input: ToastInput) -> ToastHandle {
        let id = self.next_id();
        self.dispatch(ToastAction::Add(Toast {
            id: id.clone(),
            title: input.title,
            description: input.description,
            variant: input.variant,
            open: true,
        }));
        ToastHandle {
            id,
            toaster: self.clone(),
        }
    }

    /// Close one toast, or every toast when `id` is `None`, and schedule removal.
    pub fn dismiss(&self, id: Option<&str>) {
        let targets = self.state().dismiss_targets(id);
        for target in targets {
            self.schedule_removal(target);
        }
        self.dispatch(ToastAction::Dismiss(id.map(str::to_owned)));
    }

    /// Snapshot of the current queue.
    #[must_use]
    pub fn state(&self) -> ToastState {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Toasts currently in the queue, newest first.
    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.state().toasts().to_vec()
    }

    /// Whether a removal timer is pending for `id`.
    #[must_use]
    pub fn is_removal_scheduled(&self, id: &str) -> bool {
        self.scheduled().contains(id)
    }

    fn dispatch(&self, action: ToastAction) {
        let mut state = self.inner.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = std::mem::take(&mut *state).reduce(action);
    }

    fn next_id(&self) -> String {
        let id = self
            .inner
            .next_id
            .fetch_add(1, Ordering::Relaxed)
            .wrapping_add(1);
        id.to_string()
    }

    fn scheduled(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.inner
            .scheduled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn schedule_removal(&self, id: String) {
        if !self.scheduled().insert(id.clone()) {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("no runtime for toast {id}; removing now");
            self.remove(&id);
            return;
        };

        debug!("toast {id} removal in {:?}", self.inner.remove_delay);
        let toaster = self.clone();
        let delay = self.inner.remove_delay;
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            toaster.remove(&id);
        });
    }

    fn remove(&self, id: &str) {
        self.scheduled().remove(id);
        self.dispatch(ToastAction::Remove(Some(id.to_owned())));
    }
}

/// Handle to a toast created by [`Toaster::toast`].
#[derive(Debug, Clone)]
pub struct ToastHandle {
    id: String,
    toaster: Toaster,
}

impl ToastHandle {
    /// Identity of the toast.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Close this toast.
    pub fn dismiss(&self) {
        self.toaster.dismiss(Some(&self.id));
    }

    /// Replace the toast's content; the id stays the same.
    pub fn update(&self, input: ToastInput) {
        self.toaster.dispatch(ToastAction::Update(ToastUpdate {
            id: self.id.clone(),
            title: input.title,
            description: input.description,
            variant: Some(input.variant),
            open: None,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(1_000);

    #[tokio::test(start_paused = true)]
    async fn toast_gets_sequential_ids_and_replaces_previous() {
        let toaster = Toaster::new(DELAY);
        let first = toaster.toast(ToastInput::success("one"));
        let second = toaster.toast(ToastInput::success("two"));
        assert_eq!(first.id(), "1");
        assert_eq!(second.id(), "2");

        let toasts = toaster.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].id, "2");
        assert!(toasts[0].open);
    }

    #[tokio::test(start_paused = true)]
    async fn dismissed_toast_is_removed_after_delay() {
        let toaster = Toaster::new(DELAY);
        let handle = toaster.toast(ToastInput::error("boom"));
        handle.dismiss();

        let state = toaster.state();
        let Some(toast) = state.get(handle.id()) else {
            panic!("toast should stay until the timer fires");
        };
        assert!(!toast.open);
        assert!(toaster.is_removal_scheduled(handle.id()));

        tokio::time::sleep(DELAY / 2).await;
        assert_eq!(toaster.toasts().len(), 1);

        tokio::time::sleep(DELAY).await;
        tokio::task::yield_now().await;
        assert!(toaster.toasts().is_empty());
        assert!(!toaster.is_removal_scheduled(handle.id()));
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_dismiss_schedules_once() {
        let toaster = Toaster::new(DELAY);
        let handle = toaster.toast(ToastInput::success("saved"));
        handle.dismiss();
        tokio::time::sleep(DELAY / 2).await;
        handle.dismiss();

        // The first timer still fires on schedule.
        tokio::time::sleep(DELAY / 2 + Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        assert!(toaster.toasts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn update_keeps_id() {
        let toaster = Toaster::new(DELAY);
        let handle = toaster.toast(ToastInput::success("draft"));
        handle.update(ToastInput::error("failed"));

        let toasts = toaster.toasts();
        assert_eq!(toasts[0].id, handle.id());
        assert_eq!(toasts[0].description.as_deref(), Some("failed"));
        assert_eq!(toasts[0].variant, ToastVariant::Destructive);
        assert!(toasts[0].open);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_all_closes_every_toast() {
        let toaster = Toaster::new(DELAY);
        let handle = toaster.toast(ToastInput::success("a"));
        toaster.dismiss(None);
        assert!(toaster.toasts().iter().all(|toast| !toast.open));
        assert!(toaster.is_removal_scheduled(handle.id()));
    }

    #[test]
    fn without_runtime_dismiss_removes_immediately() {
        let toaster = Toaster::new(DELAY);
        let handle = toaster.toast(ToastInput::success("cli"));
        handle.dismiss();
        assert!(toaster.toasts().is_empty());
        assert!(!toaster.is_removal_scheduled(handle.id()));
    }
}
