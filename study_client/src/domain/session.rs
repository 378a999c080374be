use std::fmt;

// Client-side session lifecycle; there are no intermediate states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

impl SessionState {
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(_) => SessionState::Authenticated,
            None => SessionState::Anonymous,
        }
    }
}

// Screens the gateway can send the user to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/stats",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
