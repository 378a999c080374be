use std::sync::Mutex;

use crate::domain::{Navigator, Route};

// Terminal stand-in for screen navigation: remembers where the user was sent
// so the CLI can print the matching hint once the command finishes.
#[derive(Default)]
pub struct CliNavigator {
    last: Mutex<Option<Route>>,
}

impl CliNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_redirect(&self) -> Option<Route> {
        match self.last.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl Navigator for CliNavigator {
    fn redirect(&self, route: Route) {
        tracing::debug!(%route, "redirect requested.");
        match self.last.lock() {
            Ok(mut guard) => *guard = Some(route),
            Err(poisoned) => *poisoned.into_inner() = Some(route),
        }
    }
}
