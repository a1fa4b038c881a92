//! Route changes requested by the client, such as the forced login redirect.

use std::sync::Mutex;

/// Route shown after the session expires.
pub const LOGIN_ROUTE: &str = "/login";

/// Receiver of navigation requests.
pub trait Navigator: Send + Sync {
    /// Switch to `route`.
    fn navigate(&self, route: &str);
}

/// Keeps the most recent target; useful for tests and deferred handling.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    target: Mutex<Option<String>>,
}

impl RecordingNavigator {
    /// The last route requested, if any.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.target.lock().ok().and_then(|target| target.clone())
    }

    /// Return and forget the last route.
    pub fn take(&self) -> Option<String> {
        self.target.lock().ok().and_then(|mut target| target.take())
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        if let Ok(mut target) = self.target.lock() {
            *target = Some(route.to_owned());
        }
    }
}
