pub const DEFAULT_COPY_CHORD: &str = "Mod+C";
pub const DEFAULT_SUBMIT_CHORD: &str = "Mod+Enter";

/// Keys the picker and the form react to. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Tab,
    Char(char),
    Other,
}

/// A single keydown as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
            alt: false,
            meta: false,
        }
    }

    pub fn shift(key: Key) -> Self {
        Self { shift: true, ..Self::plain(key) }
    }

    pub fn ctrl(key: Key) -> Self {
        Self { ctrl: true, ..Self::plain(key) }
    }

    pub fn meta(key: Key) -> Self {
        Self { meta: true, ..Self::plain(key) }
    }

    /// The platform's primary shortcut modifier held with `key`.
    pub fn primary(key: Key) -> Self {
        if cfg!(target_os = "macos") {
            Self::meta(key)
        } else {
            Self::ctrl(key)
        }
    }

    fn has_modifier(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }

    pub fn is_plain(&self, key: Key) -> bool {
        self.key == key && !self.has_modifier() && !self.shift
    }
}

/// A key with required modifiers, parsed from strings like `"Ctrl+Shift+C"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyChord {
    /// Parse a chord. `Mod` is Cmd on macOS and Ctrl elsewhere.
    pub fn parse(s: &str) -> Option<Self> {
        let mut ctrl = false;
        let mut shift = false;
        let mut alt = false;
        let mut meta = false;
        let mut key: Option<Key> = None;

        for part in s.split('+') {
            let upper = part.trim().to_ascii_uppercase();
            match upper.as_str() {
                "CTRL" | "CONTROL" => ctrl = true,
                "SHIFT" => shift = true,
                "ALT" | "OPTION" => alt = true,
                "META" | "CMD" | "COMMAND" | "SUPER" => meta = true,
                "MOD" => {
                    if cfg!(target_os = "macos") {
                        meta = true
                    } else {
                        ctrl = true
                    }
                }
                "" => {}
                _ => {
                    if key.is_some() {
                        return None;
                    }
                    key = Some(parse_key(&upper)?);
                }
            }
        }

        key.map(|key| KeyChord {
            key,
            ctrl,
            shift,
            alt,
            meta,
        })
    }

    /// Parse `s`, falling back to `default` with a warning.
    pub fn parse_or(s: &str, default: &str) -> Self {
        match Self::parse(s) {
            Some(c) => c,
            None => {
                tracing::warn!(
                    "provided shortcut '{}' is invalid; using default {}",
                    s,
                    default
                );
                Self::parse(default).unwrap_or(KeyChord {
                    key: Key::Other,
                    ctrl: false,
                    shift: false,
                    alt: false,
                    meta: false,
                })
            }
        }
    }

    pub fn matches(&self, press: &KeyPress) -> bool {
        let key_eq = match (self.key, press.key) {
            (Key::Char(a), Key::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        };
        key_eq
            && self.ctrl == press.ctrl
            && self.shift == press.shift
            && self.alt == press.alt
            && self.meta == press.meta
    }
}

fn parse_key(upper: &str) -> Option<Key> {
    match upper {
        "ENTER" | "RETURN" => Some(Key::Enter),
        "ESC" | "ESCAPE" => Some(Key::Escape),
        "TAB" => Some(Key::Tab),
        "UP" | "UPARROW" | "ARROWUP" => Some(Key::ArrowUp),
        "DOWN" | "DOWNARROW" | "ARROWDOWN" => Some(Key::ArrowDown),
        _ => {
            let mut chars = upper.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphanumeric() => {
                    Some(Key::Char(c.to_ascii_lowercase()))
                }
                _ => None,
            }
        }
    }
}
