use crate::clipboard::Clipboard;
use crate::common::contains_ci;
use crate::dom::HostElement;
use crate::error::InjectError;
use crate::guard::{ModalGuard, ModalLease};
use crate::keys::{Key, KeyChord, KeyPress};
use crate::page::{Listeners, Page, PageEvent};
use crate::prompt::{Category, PromptTemplate};
use crate::settings::Settings;
use std::cmp::Ordering;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerOptions {
    pub close_on_outside_click: bool,
    pub restore_focus: bool,
    pub copy_chord: KeyChord,
}

impl PickerOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            close_on_outside_click: settings.close_modal_on_outside_click,
            restore_focus: settings.restore_focus,
            copy_chord: settings.copy_chord(),
        }
    }
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Which input source owns the highlight. The last one used wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavMode {
    Keyboard,
    Mouse,
}

/// Pinned prompts first, then most recently modified. Prompts without a
/// usable `lastModified` sort last within their group. Ties keep input order.
pub fn sort_prompts(prompts: &mut [PromptTemplate]) {
    prompts.sort_by(|a, b| {
        b.is_pinned()
            .cmp(&a.is_pinned())
            .then_with(|| match (a.last_modified_at(), b.last_modified_at()) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    });
}

/// Whether `prompt` passes the category filter and the text query.
///
/// `query_lower` must already be lowercased; an empty query matches everything.
pub fn matches_filter(prompt: &PromptTemplate, category: Option<&str>, query_lower: &str) -> bool {
    if let Some(id) = category {
        if prompt.category_id != id {
            return false;
        }
    }
    contains_ci(&prompt.title, query_lower)
        || contains_ci(&prompt.content, query_lower)
        || prompt.tags.iter().any(|t| contains_ci(t, query_lower))
}

pub enum PickerStep {
    Open(PromptPicker),
    Selected(PromptTemplate),
    Cancelled,
}

impl std::fmt::Debug for PickerStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PickerStep::Open(_) => write!(f, "Open"),
            PickerStep::Selected(p) => write!(f, "Selected({})", p.id),
            PickerStep::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Keyboard-driven list over the enabled prompts.
pub struct PromptPicker {
    prompts: Vec<PromptTemplate>,
    categories: Vec<Category>,
    /// 0 is "all", `n` is `categories[n - 1]`.
    filter_index: usize,
    query: String,
    results: Vec<usize>,
    selected: usize,
    nav: NavMode,
    status: Option<String>,
    previous_focus: Option<HostElement>,
    options: PickerOptions,
    listeners: Listeners,
    _lease: ModalLease,
}

impl PromptPicker {
    /// Open the picker. `None` when another picker already holds `guard`.
    pub fn open(
        mut prompts: Vec<PromptTemplate>,
        categories: Vec<Category>,
        previous_focus: Option<HostElement>,
        options: PickerOptions,
        page: Rc<dyn Page>,
        guard: &ModalGuard,
    ) -> Option<Self> {
        let lease = guard.try_acquire()?;
        sort_prompts(&mut prompts);

        let mut listeners = Listeners::new(page);
        listeners.listen(PageEvent::KeyDown);
        listeners.listen(PageEvent::MouseMove);
        if options.close_on_outside_click {
            listeners.listen(PageEvent::MouseDown);
        }

        let mut picker = Self {
            prompts,
            categories,
            filter_index: 0,
            query: String::new(),
            results: Vec::new(),
            selected: 0,
            nav: NavMode::Keyboard,
            status: None,
            previous_focus,
            options,
            listeners,
            _lease: lease,
        };
        picker.refilter();
        tracing::debug!(prompts = picker.prompts.len(), "prompt picker opened");
        Some(picker)
    }

    fn refilter(&mut self) {
        let query = self.query.to_lowercase();
        let category = self.category_filter().map(|c| c.id.as_str());
        let results: Vec<usize> = self
            .prompts
            .iter()
            .enumerate()
            .filter(|(_, p)| matches_filter(p, category, &query))
            .map(|(i, _)| i)
            .collect();
        self.results = results;
        self.selected = 0;
    }

    pub fn results(&self) -> impl Iterator<Item = &PromptTemplate> + '_ {
        self.results.iter().map(move |&i| &self.prompts[i])
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// Highlighted position within the filtered results.
    pub fn selected_index(&self) -> Option<usize> {
        (!self.results.is_empty()).then_some(self.selected)
    }

    pub fn highlighted(&self) -> Option<&PromptTemplate> {
        self.results.get(self.selected).map(|&i| &self.prompts[i])
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refilter();
    }

    /// `None` means "all categories".
    pub fn category_filter(&self) -> Option<&Category> {
        self.filter_index
            .checked_sub(1)
            .and_then(|i| self.categories.get(i))
    }

    pub fn nav_mode(&self) -> NavMode {
        self.nav
    }

    /// Last transient message, e.g. a copy confirmation or clipboard error.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn mouse_moved(&mut self) {
        self.nav = NavMode::Mouse;
    }

    /// Pointer over row `index`. Ignored while the keyboard owns the highlight.
    pub fn hover(&mut self, index: usize) {
        if self.nav == NavMode::Mouse && index < self.results.len() {
            self.selected = index;
        }
    }

    fn cycle_category(&mut self, forward: bool) {
        let slots = self.categories.len() + 1;
        self.filter_index = if forward {
            (self.filter_index + 1) % slots
        } else {
            (self.filter_index + slots - 1) % slots
        };
        self.refilter();
        tracing::debug!(filter = ?self.category_filter().map(|c| &c.name), "category filter changed");
    }

    fn move_selection(&mut self, down: bool) {
        self.nav = NavMode::Keyboard;
        let len = self.results.len();
        if len == 0 {
            return;
        }
        self.selected = if down {
            (self.selected + 1) % len
        } else {
            (self.selected + len - 1) % len
        };
    }

    fn copy_highlighted(&mut self, clipboard: &mut dyn Clipboard) {
        let Some(content) = self.highlighted().map(|p| p.content.clone()) else {
            return;
        };
        match clipboard.set_text(&content) {
            Ok(()) => {
                tracing::debug!("copied prompt to clipboard");
                self.status = Some("Copied to clipboard".into());
            }
            Err(e) => {
                let err = InjectError::ClipboardDenied(e.to_string());
                tracing::warn!(error = %err, "copy failed");
                self.status = Some(err.to_string());
            }
        }
    }

    pub fn handle_key(mut self, key: &KeyPress, clipboard: &mut dyn Clipboard) -> PickerStep {
        if self.options.copy_chord.matches(key) {
            self.copy_highlighted(clipboard);
            return PickerStep::Open(self);
        }
        match key.key {
            Key::ArrowDown => self.move_selection(true),
            Key::ArrowUp => self.move_selection(false),
            Key::Tab => self.cycle_category(!key.shift),
            Key::Enter => {
                if let Some(prompt) = self.highlighted().cloned() {
                    self.close();
                    return PickerStep::Selected(prompt);
                }
            }
            Key::Escape => {
                self.close();
                return PickerStep::Cancelled;
            }
            _ => {}
        }
        PickerStep::Open(self)
    }

    pub fn click_outside(self) -> PickerStep {
        if self.options.close_on_outside_click {
            self.close();
            PickerStep::Cancelled
        } else {
            PickerStep::Open(self)
        }
    }

    /// Tear down listeners, release the guard and restore focus.
    pub fn close(mut self) {
        self.listeners.teardown();
        if self.options.restore_focus {
            if let Some(el) = self.previous_focus.take() {
                el.focus();
            }
        }
        tracing::debug!("prompt picker closed");
    }
}
