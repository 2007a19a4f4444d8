//! Key combinations and press-edge detection.
//!
//! [`ComboDetector`] turns the raw stream of `rdev` key events into one
//! activation per physical press: it fires on the main key's press while
//! exactly the configured modifiers are held, then stays latched until the
//! main key is released, so OS key-repeat cannot re-fire it.

use rdev::{EventType, Key};

use super::parse_key;

// ---------------------------------------------------------------------------
// ModifierState
// ---------------------------------------------------------------------------

/// Which logical modifiers are held (either side counts).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    pub control: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl ModifierState {
    pub fn is_empty(&self) -> bool {
        !self.control && !self.shift && !self.alt && !self.meta
    }
}

/// Index of a physical modifier key in [`ComboDetector::held`].
fn modifier_slot(key: Key) -> Option<usize> {
    match key {
        Key::ControlLeft => Some(0),
        Key::ControlRight => Some(1),
        Key::ShiftLeft => Some(2),
        Key::ShiftRight => Some(3),
        Key::Alt => Some(4),
        Key::AltGr => Some(5),
        Key::MetaLeft => Some(6),
        Key::MetaRight => Some(7),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// KeyCombo
// ---------------------------------------------------------------------------

/// A set of modifiers plus one main key, e.g. `Meta+Shift+Space`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyCombo {
    pub modifiers: ModifierState,
    pub key: Key,
    label: String,
}

impl KeyCombo {
    pub fn new(modifiers: ModifierState, key: Key, label: impl Into<String>) -> Self {
        Self {
            modifiers,
            key,
            label: label.into(),
        }
    }
}

impl std::fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

/// Parse `"Mod+Mod+Key"` into a [`KeyCombo`].
///
/// Modifier names: `Ctrl`/`Control`, `Shift`, `Alt`/`Option`,
/// `Meta`/`Cmd`/`Command`/`Super` (case-insensitive).  The last part is the
/// main key as understood by [`parse_key`].  Returns `None` for unknown
/// parts, a missing main key, or a repeated modifier.
///
/// ```
/// use ai_text_agent::hotkey::parse_combo;
///
/// let combo = parse_combo("Cmd+Shift+Space").unwrap();
/// assert!(combo.modifiers.meta && combo.modifiers.shift);
/// assert_eq!(combo.key, rdev::Key::Space);
/// assert_eq!(combo.to_string(), "Meta+Shift+Space");
/// ```
pub fn parse_combo(spec: &str) -> Option<KeyCombo> {
    let parts: Vec<&str> = spec.split('+').map(str::trim).collect();
    let (main, mods) = parts.split_last()?;
    let key = parse_key(main)?;

    let mut modifiers = ModifierState::default();
    for part in mods {
        let slot = match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => &mut modifiers.control,
            "shift" => &mut modifiers.shift,
            "alt" | "option" => &mut modifiers.alt,
            "meta" | "cmd" | "command" | "super" => &mut modifiers.meta,
            _ => return None,
        };
        if *slot {
            return None;
        }
        *slot = true;
    }

    let mut label = String::new();
    for (held, name) in [
        (modifiers.control, "Ctrl"),
        (modifiers.alt, "Alt"),
        (modifiers.meta, "Meta"),
        (modifiers.shift, "Shift"),
    ] {
        if held {
            label.push_str(name);
            label.push('+');
        }
    }
    label.push_str(main);

    Some(KeyCombo::new(modifiers, key, label))
}

// ---------------------------------------------------------------------------
// ComboDetector
// ---------------------------------------------------------------------------

/// Edge detector for one [`KeyCombo`].
pub struct ComboDetector {
    combo: KeyCombo,
    held: [bool; 8],
    latched: bool,
}

impl ComboDetector {
    pub fn new(combo: KeyCombo) -> Self {
        Self {
            combo,
            held: [false; 8],
            latched: false,
        }
    }

    /// Modifiers currently held, as seen from the event stream.
    pub fn modifiers(&self) -> ModifierState {
        ModifierState {
            control: self.held[0] || self.held[1],
            shift: self.held[2] || self.held[3],
            alt: self.held[4] || self.held[5],
            meta: self.held[6] || self.held[7],
        }
    }

    /// Feed one event.  Returns `true` exactly when the combination has just
    /// been pressed.
    pub fn on_event(&mut self, event: &EventType) -> bool {
        match *event {
            EventType::KeyPress(key) => {
                if let Some(slot) = modifier_slot(key) {
                    self.held[slot] = true;
                    return false;
                }
                if key != self.combo.key || self.latched {
                    return false;
                }
                if self.modifiers() != self.combo.modifiers {
                    return false;
                }
                self.latched = true;
                true
            }
            EventType::KeyRelease(key) => {
                if let Some(slot) = modifier_slot(key) {
                    self.held[slot] = false;
                } else if key == self.combo.key {
                    self.latched = false;
                }
                false
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
