//! Domain-level user actions independent of key bindings.

/// Actions the operator can take from the keyboard.
///
/// These represent intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `UserAction` is handled by `KeyBindings`.
/// Scanner input never produces these: bound keys are checked before the
/// scan accumulator sees a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAction {
    /// Accept the pending reference code. Default: F2 / Ctrl+y
    ConfirmReference,
    /// Discard the pending reference code. Default: Esc / Ctrl+n
    CancelReference,
    /// Clear the reference, pending code, result and counters. Default: F5 / Ctrl+r
    ResetWorkflow,
    /// Exit the application. Default: F10 / Ctrl+c
    Quit,
}

impl UserAction {
    /// Short label used in the key-help footer.
    pub fn label(self) -> &'static str {
        match self {
            UserAction::ConfirmReference => "confirm",
            UserAction::CancelReference => "cancel",
            UserAction::ResetWorkflow => "reset",
            UserAction::Quit => "quit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_distinct() {
        let labels = [
            UserAction::ConfirmReference.label(),
            UserAction::CancelReference.label(),
            UserAction::ResetWorkflow.label(),
            UserAction::Quit.label(),
        ];
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
