use crate::keys::{KeyChord, DEFAULT_COPY_CHORD, DEFAULT_SUBMIT_CHORD};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_TRIGGER: &str = "/p";
pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Text that opens the prompt picker when typed at the end of a field.
    /// Matched case-insensitively.
    #[serde(default = "default_trigger")]
    pub trigger: String,
    /// Close the picker or the variable form when the user clicks outside it.
    #[serde(default = "default_true", alias = "closeModalOnOutsideClick")]
    pub close_modal_on_outside_click: bool,
    /// Focus the element that was active before the picker opened once it
    /// closes.
    #[serde(default = "default_true")]
    pub restore_focus: bool,
    /// Chord copying the highlighted prompt, e.g. `Mod+C`. `Mod` maps to Cmd
    /// on macOS and Ctrl elsewhere.
    #[serde(default = "default_copy_shortcut")]
    pub copy_shortcut: String,
    /// Chord submitting the variable form.
    #[serde(default = "default_submit_shortcut")]
    pub submit_shortcut: String,
    #[serde(default = "default_prompts_file")]
    pub prompts_file: String,
    #[serde(default = "default_categories_file")]
    pub categories_file: String,
    /// When enabled the logger is initialised at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file receiving log output instead of stderr.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

fn default_trigger() -> String {
    DEFAULT_TRIGGER.into()
}

fn default_true() -> bool {
    true
}

fn default_copy_shortcut() -> String {
    DEFAULT_COPY_CHORD.into()
}

fn default_submit_shortcut() -> String {
    DEFAULT_SUBMIT_CHORD.into()
}

fn default_prompts_file() -> String {
    crate::prompt::PROMPTS_FILE.into()
}

fn default_categories_file() -> String {
    crate::prompt::CATEGORIES_FILE.into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trigger: default_trigger(),
            close_modal_on_outside_click: true,
            restore_focus: true,
            copy_shortcut: default_copy_shortcut(),
            submit_shortcut: default_submit_shortcut(),
            prompts_file: default_prompts_file(),
            categories_file: default_categories_file(),
            debug_logging: false,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Like [`Settings::load`] but never fails; a broken file yields defaults so
    /// outside clicks keep closing overlays.
    pub fn load_or_default(path: &str) -> Self {
        match Self::load(path) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(path, error = %e, "failed to load settings; using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// `<config dir>/prompt_injector/settings.json`, falling back to the
    /// working directory when the platform has no config dir.
    pub fn default_path() -> PathBuf {
        dirs_next::config_dir()
            .map(|d| d.join("prompt_injector"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(SETTINGS_FILE)
    }

    /// The configured trigger, or the default when the configured one is blank.
    pub fn trigger(&self) -> &str {
        if self.trigger.is_empty() {
            tracing::warn!("empty trigger configured; using default {}", DEFAULT_TRIGGER);
            DEFAULT_TRIGGER
        } else {
            &self.trigger
        }
    }

    pub fn copy_chord(&self) -> KeyChord {
        KeyChord::parse_or(&self.copy_shortcut, DEFAULT_COPY_CHORD)
    }

    pub fn submit_chord(&self) -> KeyChord {
        KeyChord::parse_or(&self.submit_shortcut, DEFAULT_SUBMIT_CHORD)
    }
}
