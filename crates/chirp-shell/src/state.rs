use chirp_core::models::Session;

/// Dispatcher-owned state. The session is an explicit value handed to
/// every operation rather than a process-global, so nested browse flows
/// and future concurrent sessions stay possible.
pub(crate) struct ShellState {
    pub(crate) session: Option<Session>,
}

impl ShellState {
    pub(crate) fn new() -> Self {
        Self { session: None }
    }

    pub(crate) fn logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub(crate) fn user_id(&self) -> Option<i64> {
        self.session.as_ref().map(|s| s.user_id)
    }
}
