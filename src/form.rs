use crate::guard::{ModalGuard, ModalLease};
use crate::keys::{Key, KeyChord, KeyPress};
use crate::page::{Listeners, Page, PageEvent};
use crate::prompt::PromptTemplate;
use crate::settings::Settings;
use crate::template::{empty_bindings, render_template, VariableBindings};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormOptions {
    pub close_on_outside_click: bool,
    pub submit_chord: KeyChord,
}

impl FormOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            close_on_outside_click: settings.close_modal_on_outside_click,
            submit_chord: settings.submit_chord(),
        }
    }
}

impl Default for FormOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

pub enum FormStep {
    Open(VariableForm),
    /// Final text, produced exactly once per form.
    Confirmed(String),
    Cancelled,
}

impl std::fmt::Debug for FormStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormStep::Open(form) => write!(f, "Open({:?})", form.variables()),
            FormStep::Confirmed(text) => write!(f, "Confirmed({text:?})"),
            FormStep::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Transient form asking for one value per template variable.
pub struct VariableForm {
    content: String,
    bindings: VariableBindings,
    focused: usize,
    preview: String,
    options: FormOptions,
    listeners: Listeners,
    _lease: ModalLease,
}

impl VariableForm {
    /// Open a form for `template`.
    ///
    /// Templates without variables confirm immediately with their content and
    /// never show a form. Returns `None` when another form holds `guard`.
    pub fn collect(
        template: &PromptTemplate,
        options: FormOptions,
        page: Rc<dyn Page>,
        guard: &ModalGuard,
    ) -> Option<FormStep> {
        let bindings = empty_bindings(&template.content);
        if bindings.is_empty() {
            tracing::debug!(prompt = %template.id, "no variables; confirming directly");
            return Some(FormStep::Confirmed(template.content.clone()));
        }
        let lease = guard.try_acquire()?;

        let mut listeners = Listeners::new(page);
        listeners.listen(PageEvent::KeyDown);
        if options.close_on_outside_click {
            listeners.listen(PageEvent::MouseDown);
        }

        let mut form = Self {
            content: template.content.clone(),
            bindings,
            focused: 0,
            preview: String::new(),
            options,
            listeners,
            _lease: lease,
        };
        form.refresh_preview();
        tracing::debug!(prompt = %template.id, fields = form.bindings.len(), "variable form opened");
        Some(FormStep::Open(form))
    }

    /// Variable names in field order.
    pub fn variables(&self) -> Vec<&str> {
        self.bindings.keys().map(String::as_str).collect()
    }

    pub fn value(&self, index: usize) -> Option<&str> {
        self.bindings.values().nth(index).map(String::as_str)
    }

    /// Record the content of field `index` after the user edited it.
    pub fn set_value(&mut self, index: usize, value: impl Into<String>) {
        if let Some(slot) = self.bindings.values_mut().nth(index) {
            *slot = value.into();
            self.refresh_preview();
        }
    }

    /// Record a native focus move (Tab is never intercepted).
    pub fn focus_field(&mut self, index: usize) {
        if index < self.bindings.len() {
            self.focused = index;
        }
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    /// The template rendered with the values typed so far. Fields still empty
    /// keep their placeholder.
    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn refresh_preview(&mut self) {
        let filled: VariableBindings = self
            .bindings
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.preview = render_template(&self.content, &filled);
    }

    pub fn handle_key(self, key: &KeyPress) -> FormStep {
        if self.options.submit_chord.matches(key) {
            return FormStep::Confirmed(self.confirm());
        }
        match key.key {
            Key::Escape => {
                self.cancel();
                FormStep::Cancelled
            }
            // Plain Enter types a newline into the field and Tab moves focus
            // natively; neither is handled here.
            _ => FormStep::Open(self),
        }
    }

    pub fn click_outside(self) -> FormStep {
        if self.options.close_on_outside_click {
            self.cancel();
            FormStep::Cancelled
        } else {
            FormStep::Open(self)
        }
    }

    /// Render with every binding, empty values included.
    pub fn confirm(mut self) -> String {
        self.listeners.teardown();
        let text = render_template(&self.content, &self.bindings);
        tracing::debug!("variable form confirmed");
        text
    }

    /// Close without producing text.
    pub fn cancel(mut self) {
        self.listeners.teardown();
        tracing::debug!("variable form cancelled");
    }
}
