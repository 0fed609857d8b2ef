/// Progressive hint disclosure for the loaded exercise.
///
/// Hints are revealed one at a time and never re-hidden by revealing; the
/// whole revealed list can be folded away with `toggle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintPanel {
    hints: Vec<String>,
    revealed: usize,
    visible: bool,
}

impl HintPanel {
    #[must_use]
    pub fn new(hints: Vec<String>) -> Self {
        Self {
            hints,
            revealed: 0,
            visible: true,
        }
    }

    /// Reveal the next hint. No-op once every hint is shown.
    pub fn reveal_next(&mut self) -> Option<&str> {
        let hint = self.hints.get(self.revealed)?;
        self.revealed += 1;
        self.visible = true;
        Some(hint.as_str())
    }

    /// Flip visibility of the revealed hints. Returns the new visibility.
    pub fn toggle(&mut self) -> bool {
        if self.revealed > 0 {
            self.visible = !self.visible;
        }
        self.visible
    }

    #[must_use]
    pub fn revealed(&self) -> &[String] {
        &self.hints[..self.revealed]
    }

    /// Revealed hints, or nothing while folded away.
    #[must_use]
    pub fn shown(&self) -> &[String] {
        if self.visible { self.revealed() } else { &[] }
    }

    /// Whether the "reveal a hint" control should be offered.
    #[must_use]
    pub fn can_reveal(&self) -> bool {
        self.revealed < self.hints.len()
    }

    /// Whether the "hide/show hints" control should be offered.
    #[must_use]
    pub fn can_toggle(&self) -> bool {
        self.revealed > 0
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.hints.len()
    }
}
