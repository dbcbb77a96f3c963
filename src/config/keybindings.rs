//! Keyboard bindings configuration.
//!
//! Scanner input arrives as ordinary key presses, so operator actions are bound
//! only to keys a scanner never sends: function keys, Esc, and Ctrl chords.
//! Plain characters and Enter are refused as bindings.

use super::loader::ConfigError;
use crate::model::key_action::UserAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to operator actions.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<(KeyCode, KeyModifiers), UserAction>,
}

impl KeyBindings {
    /// Look up the action for a key event. Releases and repeats never match.
    pub fn get(&self, key: KeyEvent) -> Option<UserAction> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        self.bindings.get(&(key.code, key.modifiers)).copied()
    }

    /// Keys bound to `action`, formatted for the help footer, sorted.
    pub fn keys_for(&self, action: UserAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((code, mods), _)| format_key(*code, *mods))
            .collect();
        keys.sort();
        keys
    }

    /// Replace the bindings of each named action with the given key specs.
    ///
    /// Action names: `confirm`, `cancel`, `reset`, `quit`. Key specs look like
    /// `F2`, `Esc`, `Ctrl+y`, `Alt+Backspace`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown action, an
    /// unparseable key, or a key a scanner could send.
    pub fn with_overrides(
        mut self,
        overrides: &HashMap<String, Vec<String>>,
    ) -> Result<Self, ConfigError> {
        // Sorted so error reporting is deterministic
        let mut entries: Vec<(&String, &Vec<String>)> = overrides.iter().collect();
        entries.sort_by_key(|(name, _)| *name);

        for (name, specs) in entries {
            let action = parse_action(name)?;
            self.bindings.retain(|_, a| *a != action);
            for spec in specs {
                let key = parse_key(spec)?;
                self.bindings.insert(key, action);
            }
        }
        Ok(self)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = HashMap::new();

        // Confirm pending reference
        bindings.insert((KeyCode::F(2), KeyModifiers::NONE), UserAction::ConfirmReference);
        bindings.insert(
            (KeyCode::Char('y'), KeyModifiers::CONTROL),
            UserAction::ConfirmReference,
        );

        // Discard pending reference
        bindings.insert((KeyCode::Esc, KeyModifiers::NONE), UserAction::CancelReference);
        bindings.insert(
            (KeyCode::Char('n'), KeyModifiers::CONTROL),
            UserAction::CancelReference,
        );

        // Reset workflow
        bindings.insert((KeyCode::F(5), KeyModifiers::NONE), UserAction::ResetWorkflow);
        bindings.insert(
            (KeyCode::Char('r'), KeyModifiers::CONTROL),
            UserAction::ResetWorkflow,
        );

        // Application controls
        bindings.insert((KeyCode::F(10), KeyModifiers::NONE), UserAction::Quit);
        bindings.insert((KeyCode::Char('c'), KeyModifiers::CONTROL), UserAction::Quit);

        Self { bindings }
    }
}

fn parse_action(name: &str) -> Result<UserAction, ConfigError> {
    match name.to_ascii_lowercase().as_str() {
        "confirm" => Ok(UserAction::ConfirmReference),
        "cancel" => Ok(UserAction::CancelReference),
        "reset" => Ok(UserAction::ResetWorkflow),
        "quit" => Ok(UserAction::Quit),
        _ => Err(ConfigError::InvalidValue {
            field: "keybindings".to_string(),
            reason: format!("unknown action '{name}'"),
        }),
    }
}

/// Parse a key spec such as `Ctrl+y` or `F2`.
fn parse_key(spec: &str) -> Result<(KeyCode, KeyModifiers), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        field: "keybindings".to_string(),
        reason,
    };

    let mut modifiers = KeyModifiers::NONE;
    let mut parts: Vec<&str> = spec.split('+').map(str::trim).collect();
    let key = parts
        .pop()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| invalid(format!("empty key in '{spec}'")))?;

    for part in parts {
        modifiers |= match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "alt" => KeyModifiers::ALT,
            "shift" => KeyModifiers::SHIFT,
            other => return Err(invalid(format!("unknown modifier '{other}' in '{spec}'"))),
        };
    }

    let lower = key.to_ascii_lowercase();
    let code = match lower.as_str() {
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "insert" | "ins" => KeyCode::Insert,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "enter" | "return" => {
            return Err(invalid(format!(
                "'{spec}' is the scan terminator and cannot be bound"
            )))
        }
        _ if lower.len() > 1 && lower.starts_with('f') => {
            let n: u8 = lower[1..]
                .parse()
                .map_err(|_| invalid(format!("unknown key '{key}'")))?;
            if !(1..=24).contains(&n) {
                return Err(invalid(format!("unknown key '{key}'")));
            }
            KeyCode::F(n)
        }
        _ => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c.to_ascii_lowercase()),
                _ => return Err(invalid(format!("unknown key '{key}'"))),
            }
        }
    };

    let chord = modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    if matches!(code, KeyCode::Char(_)) && !chord {
        return Err(invalid(format!(
            "'{spec}' could be sent by a scanner; use Ctrl/Alt or a non-character key"
        )));
    }

    Ok((code, modifiers))
}

/// Human-readable key spec, the inverse of `parse_key`.
fn format_key(code: KeyCode, modifiers: KeyModifiers) -> String {
    let mut out = String::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        out.push_str("Ctrl+");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        out.push_str("Alt+");
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        out.push_str("Shift+");
    }
    match code {
        KeyCode::F(n) => out.push_str(&format!("F{n}")),
        KeyCode::Char(c) => out.push(c),
        KeyCode::Esc => out.push_str("Esc"),
        other => out.push_str(&format!("{other:?}")),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn default_bindings_cover_every_action() {
        let bindings = KeyBindings::default();
        assert_eq!(
            bindings.get(press(KeyCode::F(2), KeyModifiers::NONE)),
            Some(UserAction::ConfirmReference)
        );
        assert_eq!(
            bindings.get(press(KeyCode::Esc, KeyModifiers::NONE)),
            Some(UserAction::CancelReference)
        );
        assert_eq!(
            bindings.get(press(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(UserAction::ResetWorkflow)
        );
        assert_eq!(
            bindings.get(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(UserAction::Quit)
        );
    }

    #[test]
    fn default_bindings_leave_scanner_keys_unbound() {
        let bindings = KeyBindings::default();
        for c in ['a', 'Z', '0', '9', 'q', 'r'] {
            assert_eq!(bindings.get(press(KeyCode::Char(c), KeyModifiers::NONE)), None);
        }
        assert_eq!(bindings.get(press(KeyCode::Enter, KeyModifiers::NONE)), None);
    }

    #[test]
    fn keys_for_lists_sorted_specs() {
        let bindings = KeyBindings::default();
        assert_eq!(
            bindings.keys_for(UserAction::ConfirmReference),
            vec!["Ctrl+y".to_string(), "F2".to_string()]
        );
    }

    #[test]
    fn overrides_replace_action_bindings() {
        let mut overrides = HashMap::new();
        overrides.insert("confirm".to_string(), vec!["F9".to_string()]);

        let bindings = KeyBindings::default().with_overrides(&overrides).unwrap();

        assert_eq!(
            bindings.get(press(KeyCode::F(9), KeyModifiers::NONE)),
            Some(UserAction::ConfirmReference)
        );
        assert_eq!(bindings.get(press(KeyCode::F(2), KeyModifiers::NONE)), None);
        assert_eq!(
            bindings.get(press(KeyCode::Esc, KeyModifiers::NONE)),
            Some(UserAction::CancelReference),
            "Other actions keep their defaults"
        );
    }

    #[test]
    fn overrides_parse_modifier_chords() {
        let mut overrides = HashMap::new();
        overrides.insert("reset".to_string(), vec!["Ctrl+Alt+x".to_string()]);

        let bindings = KeyBindings::default().with_overrides(&overrides).unwrap();

        assert_eq!(
            bindings.get(press(
                KeyCode::Char('x'),
                KeyModifiers::CONTROL | KeyModifiers::ALT
            )),
            Some(UserAction::ResetWorkflow)
        );
    }

    #[test]
    fn plain_character_binding_is_rejected() {
        assert!(matches!(
            parse_key("q"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse_key("Shift+q"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn enter_binding_is_rejected() {
        assert!(parse_key("Enter").is_err());
    }

    #[test]
    fn unknown_action_is_rejected() {
        let mut overrides = HashMap::new();
        overrides.insert("explode".to_string(), vec!["F3".to_string()]);
        assert!(KeyBindings::default().with_overrides(&overrides).is_err());
    }

    #[test]
    fn parse_key_handles_names_case_insensitively() {
        assert_eq!(parse_key("ESC").unwrap(), (KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(parse_key("f12").unwrap(), (KeyCode::F(12), KeyModifiers::NONE));
        assert!(parse_key("F25").is_err());
        assert!(parse_key("Hyper+F1").is_err());
        assert!(parse_key("").is_err());
    }

    #[test]
    fn releases_never_match() {
        use crossterm::event::KeyEventState;
        let bindings = KeyBindings::default();
        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::F(2),
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        assert_eq!(bindings.get(release), None);
    }
}
