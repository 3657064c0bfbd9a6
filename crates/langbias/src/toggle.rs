use std::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReferenceListVisibility {
    pub shown: bool,
}

/// Show/hide flag for the reference list. Hidden until the user asks.
#[derive(Debug, Default)]
pub struct ReferenceListToggle {
    shown: Cell<bool>,
}

impl ReferenceListToggle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility(&self) -> ReferenceListVisibility {
        ReferenceListVisibility {
            shown: self.shown.get(),
        }
    }

    pub fn is_shown(&self) -> bool {
        self.shown.get()
    }

    /// Flip the flag and return the new value.
    pub fn toggle(&self) -> bool {
        let shown = !self.shown.get();
        self.shown.set(shown);
        shown
    }
}
