/// Lifecycle of an exercise session.
///
/// `Idle -> Loaded -> Running -> Graded`, and back to `Loaded` on navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing loaded yet.
    #[default]
    Idle,
    /// Exercise and editor populated, no grading outstanding.
    Loaded,
    /// Grading request outstanding for the loaded exercise.
    Running,
    /// Results available, editor idle.
    Graded,
}

impl SessionState {
    #[must_use]
    pub fn can_run(self) -> bool {
        matches!(self, SessionState::Loaded | SessionState::Graded)
    }

    #[must_use]
    pub fn can_edit(self) -> bool {
        !matches!(self, SessionState::Running)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Loaded => "loaded",
            SessionState::Running => "running",
            SessionState::Graded => "graded",
        }
    }
}
