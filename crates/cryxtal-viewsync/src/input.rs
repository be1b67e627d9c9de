use crate::config::ModifierKey;

/// Keyboard modifiers currently held, as reported by the window layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const fn ctrl() -> Self {
        Self {
            shift: false,
            ctrl: true,
            alt: false,
        }
    }

    pub const fn only(key: ModifierKey) -> Self {
        match key {
            ModifierKey::Shift => Self {
                shift: true,
                ctrl: false,
                alt: false,
            },
            ModifierKey::Ctrl => Self::ctrl(),
            ModifierKey::Alt => Self {
                shift: false,
                ctrl: false,
                alt: true,
            },
        }
    }

    /// The decouple key counts only when it is the sole modifier held.
    pub fn is_only(&self, key: ModifierKey) -> bool {
        *self == Self::only(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decouple_key_must_be_held_alone() {
        assert!(Modifiers::ctrl().is_only(ModifierKey::Ctrl));
        let chord = Modifiers {
            shift: true,
            ctrl: true,
            alt: false,
        };
        assert!(!chord.is_only(ModifierKey::Ctrl));
        assert!(!Modifiers::NONE.is_only(ModifierKey::Ctrl));
    }
}
