use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use viewscape_common::MoveDirection;

/// Platform-independent key identity. Hosts translate their key codes into this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    Shift,
    Escape,
    Other,
}

impl Key {
    /// Parse a single script character, as used by headless runs.
    ///
    /// Letters are case-insensitive, `' '` is space and `'^'` stands for shift.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(Key::W),
            'a' => Some(Key::A),
            's' => Some(Key::S),
            'd' => Some(Key::D),
            ' ' => Some(Key::Space),
            '^' => Some(Key::Shift),
            _ => None,
        }
    }
}

/// Modifier keys held alongside a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
    };
}

/// Fixed key-to-movement table.
///
/// Space moves up unless shift is held, which turns it into down. Pressing
/// shift on its own also moves down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub forward: Key,
    pub backward: Key,
    pub left: Key,
    pub right: Key,
    pub up: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: Key::W,
            backward: Key::S,
            left: Key::A,
            right: Key::D,
            up: Key::Space,
        }
    }
}

impl KeyBindings {
    pub fn resolve(&self, key: Key, modifiers: Modifiers) -> Option<MoveDirection> {
        if key == self.up {
            return Some(if modifiers.shift {
                MoveDirection::Down
            } else {
                MoveDirection::Up
            });
        }
        match key {
            k if k == self.forward => Some(MoveDirection::Forward),
            k if k == self.backward => Some(MoveDirection::Backward),
            k if k == self.left => Some(MoveDirection::Left),
            k if k == self.right => Some(MoveDirection::Right),
            Key::Shift => Some(MoveDirection::Down),
            _ => None,
        }
    }

    /// Directions for a set of held keys, deduplicated.
    pub fn resolve_held(&self, held: &BTreeSet<Key>, modifiers: Modifiers) -> BTreeSet<MoveDirection> {
        held.iter()
            .filter_map(|key| self.resolve(*key, modifiers))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_map_to_planar_moves() {
        let b = KeyBindings::default();
        assert_eq!(b.resolve(Key::W, Modifiers::NONE), Some(MoveDirection::Forward));
        assert_eq!(b.resolve(Key::S, Modifiers::NONE), Some(MoveDirection::Backward));
        assert_eq!(b.resolve(Key::A, Modifiers::NONE), Some(MoveDirection::Left));
        assert_eq!(b.resolve(Key::D, Modifiers::NONE), Some(MoveDirection::Right));
    }

    #[test]
    fn shift_inverts_space() {
        let b = KeyBindings::default();
        assert_eq!(b.resolve(Key::Space, Modifiers::NONE), Some(MoveDirection::Up));
        assert_eq!(b.resolve(Key::Space, Modifiers::SHIFT), Some(MoveDirection::Down));
        assert_eq!(b.resolve(Key::Shift, Modifiers::SHIFT), Some(MoveDirection::Down));
    }

    #[test]
    fn unbound_keys_ignored() {
        let b = KeyBindings::default();
        assert_eq!(b.resolve(Key::Escape, Modifiers::NONE), None);
        assert_eq!(b.resolve(Key::Other, Modifiers::SHIFT), None);
    }

    #[test]
    fn held_set_deduplicates() {
        let b = KeyBindings::default();
        let held: BTreeSet<Key> = [Key::Space, Key::Shift, Key::W].into_iter().collect();
        let dirs = b.resolve_held(&held, Modifiers::SHIFT);
        assert_eq!(dirs.len(), 2);
        assert!(dirs.contains(&MoveDirection::Down));
        assert!(dirs.contains(&MoveDirection::Forward));
    }

    #[test]
    fn script_characters() {
        assert_eq!(Key::from_char('W'), Some(Key::W));
        assert_eq!(Key::from_char(' '), Some(Key::Space));
        assert_eq!(Key::from_char('^'), Some(Key::Shift));
        assert_eq!(Key::from_char('x'), None);
    }
}
