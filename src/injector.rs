use crate::clipboard::Clipboard;
use crate::dom::HostElement;
use crate::error::InjectError;
use crate::form::{FormOptions, FormStep, VariableForm};
use crate::guard::ModalGuard;
use crate::insert::InsertionEngine;
use crate::keys::KeyPress;
use crate::page::Page;
use crate::picker::{PickerOptions, PickerStep, PromptPicker};
use crate::prompt::{PromptStore, PromptTemplate};
use crate::settings::Settings;
use crate::surface::{EditableSurface, Surface};
use crate::trigger::{TriggerDetector, TriggerOutcome};
use std::rc::Rc;

/// Command name the host's keyboard shortcut sends.
pub const OPEN_PROMPT_SELECTOR_COMMAND: &str = "open-prompt-selector";

pub const NO_TARGET_MESSAGE: &str = "Please click into a text field first, then open the prompt list.";
pub const NO_PROMPTS_MESSAGE: &str = "No enabled prompts found. Add or enable prompts in the options page.";
pub const PROMPT_GONE_MESSAGE: &str = "This prompt is no longer available.";

/// What an event did to the injector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing happened (no trigger, no overlay, or an overlay was already open).
    Ignored,
    PickerOpened,
    /// The open overlay consumed the event and stays open.
    Updated,
    FormOpened,
    Inserted,
    Cancelled,
    Failed(InjectError),
}

enum Overlay {
    Closed,
    Picker {
        picker: PromptPicker,
        target: EditableSurface,
    },
    Form {
        form: VariableForm,
        target: EditableSurface,
    },
}

/// One page's prompt-injection session.
///
/// Owns the trigger cache, both re-entrancy guards and whichever overlay is
/// currently open. Dropping the injector tears all of them down.
pub struct Injector {
    settings: Settings,
    store: Box<dyn PromptStore>,
    page: Rc<dyn Page>,
    clipboard: Box<dyn Clipboard>,
    detector: TriggerDetector,
    engine: InsertionEngine,
    picker_guard: ModalGuard,
    form_guard: ModalGuard,
    overlay: Overlay,
}

impl Injector {
    pub fn new(
        settings: Settings,
        store: Box<dyn PromptStore>,
        page: Rc<dyn Page>,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        Self::with_guards(
            settings,
            store,
            page,
            clipboard,
            ModalGuard::new(),
            ModalGuard::new(),
        )
    }

    /// Like [`Injector::new`] but sharing the picker and form guards with
    /// other injectors on the same page, so only one of each opens at a time.
    pub fn with_guards(
        settings: Settings,
        store: Box<dyn PromptStore>,
        page: Rc<dyn Page>,
        clipboard: Box<dyn Clipboard>,
        picker_guard: ModalGuard,
        form_guard: ModalGuard,
    ) -> Self {
        let trigger = settings.trigger().to_string();
        Self {
            detector: TriggerDetector::new(trigger.clone()),
            engine: InsertionEngine::new(trigger),
            settings,
            store,
            page,
            clipboard,
            picker_guard,
            form_guard,
            overlay: Overlay::Closed,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn detector(&self) -> &TriggerDetector {
        &self.detector
    }

    pub fn picker(&self) -> Option<&PromptPicker> {
        match &self.overlay {
            Overlay::Picker { picker, .. } => Some(picker),
            _ => None,
        }
    }

    pub fn form(&self) -> Option<&VariableForm> {
        match &self.overlay {
            Overlay::Form { form, .. } => Some(form),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.overlay, Overlay::Closed)
    }

    /// Input event on a page element.
    pub fn on_input(&mut self, element: &HostElement) -> Outcome {
        let Ok(surface) = EditableSurface::from_element(element) else {
            return Outcome::Ignored;
        };
        let open = self.is_open() || self.picker_guard.is_held() || self.form_guard.is_held();
        match self.detector.on_input(surface.node_id(), &surface.text(), open) {
            TriggerOutcome::Fire => self.open_prompt_selector(Some(element.clone())),
            TriggerOutcome::Ignore => Outcome::Ignored,
        }
    }

    /// Host command entry point.
    pub fn handle_command(&mut self, command: &str) -> Outcome {
        match command {
            OPEN_PROMPT_SELECTOR_COMMAND => self.open_prompt_selector(None),
            other => {
                tracing::warn!(command = other, "unknown command");
                Outcome::Ignored
            }
        }
    }

    /// Open the picker for `explicit_target`, or for the focused element.
    ///
    /// A no-op while any overlay is open.
    pub fn open_prompt_selector(&mut self, explicit_target: Option<HostElement>) -> Outcome {
        if self.is_open() || self.picker_guard.is_held() || self.form_guard.is_held() {
            tracing::debug!("overlay already open; ignoring open request");
            return Outcome::Ignored;
        }
        let previous_focus = self.page.active_element();
        let Some(element) = explicit_target.or_else(|| previous_focus.clone()) else {
            self.page.alert(NO_TARGET_MESSAGE);
            return Outcome::Failed(InjectError::not_editable("none"));
        };
        let target = match EditableSurface::from_element(&element) {
            Ok(t) => t,
            Err(e) => {
                tracing::info!(error = %e, "no editable target for prompt picker");
                self.page.alert(NO_TARGET_MESSAGE);
                return Outcome::Failed(e);
            }
        };

        let prompts = self.store.enabled_prompts().unwrap_or_else(|e| {
            tracing::error!(error = %InjectError::StoreRead(e.to_string()), "treating as no prompts");
            Vec::new()
        });
        if prompts.is_empty() {
            self.page.alert(NO_PROMPTS_MESSAGE);
            self.detector.forget(target.node_id());
            return Outcome::Ignored;
        }
        let categories = self.store.categories().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load categories");
            Vec::new()
        });

        let options = PickerOptions::from_settings(&self.settings);
        match PromptPicker::open(
            prompts,
            categories,
            previous_focus,
            options,
            Rc::clone(&self.page),
            &self.picker_guard,
        ) {
            Some(picker) => {
                self.overlay = Overlay::Picker { picker, target };
                Outcome::PickerOpened
            }
            None => Outcome::Ignored,
        }
    }

    pub fn handle_key(&mut self, key: &KeyPress) -> Outcome {
        match std::mem::replace(&mut self.overlay, Overlay::Closed) {
            Overlay::Closed => Outcome::Ignored,
            Overlay::Picker { picker, target } => {
                let step = picker.handle_key(key, self.clipboard.as_mut());
                self.after_picker(step, target)
            }
            Overlay::Form { form, target } => {
                let step = form.handle_key(key);
                self.after_form(step, target)
            }
        }
    }

    pub fn click_outside(&mut self) -> Outcome {
        match std::mem::replace(&mut self.overlay, Overlay::Closed) {
            Overlay::Closed => Outcome::Ignored,
            Overlay::Picker { picker, target } => {
                let step = picker.click_outside();
                self.after_picker(step, target)
            }
            Overlay::Form { form, target } => {
                let step = form.click_outside();
                self.after_form(step, target)
            }
        }
    }

    pub fn set_query(&mut self, query: &str) -> Outcome {
        match &mut self.overlay {
            Overlay::Picker { picker, .. } => {
                picker.set_query(query);
                Outcome::Updated
            }
            _ => Outcome::Ignored,
        }
    }

    pub fn mouse_moved(&mut self) -> Outcome {
        match &mut self.overlay {
            Overlay::Picker { picker, .. } => {
                picker.mouse_moved();
                Outcome::Updated
            }
            _ => Outcome::Ignored,
        }
    }

    pub fn hover(&mut self, index: usize) -> Outcome {
        match &mut self.overlay {
            Overlay::Picker { picker, .. } => {
                picker.hover(index);
                Outcome::Updated
            }
            _ => Outcome::Ignored,
        }
    }

    pub fn set_field_value(&mut self, index: usize, value: &str) -> Outcome {
        match &mut self.overlay {
            Overlay::Form { form, .. } => {
                form.set_value(index, value);
                Outcome::Updated
            }
            _ => Outcome::Ignored,
        }
    }

    pub fn focus_field(&mut self, index: usize) -> Outcome {
        match &mut self.overlay {
            Overlay::Form { form, .. } => {
                form.focus_field(index);
                Outcome::Updated
            }
            _ => Outcome::Ignored,
        }
    }

    /// Close whatever is open without inserting anything.
    pub fn close(&mut self) -> Outcome {
        match std::mem::replace(&mut self.overlay, Overlay::Closed) {
            Overlay::Closed => Outcome::Ignored,
            Overlay::Picker { picker, target } => {
                picker.close();
                self.detector.forget(target.node_id());
                Outcome::Cancelled
            }
            Overlay::Form { form, .. } => {
                form.cancel();
                Outcome::Cancelled
            }
        }
    }

    fn after_picker(&mut self, step: PickerStep, target: EditableSurface) -> Outcome {
        match step {
            PickerStep::Open(picker) => {
                self.overlay = Overlay::Picker { picker, target };
                Outcome::Updated
            }
            PickerStep::Cancelled => {
                self.detector.forget(target.node_id());
                Outcome::Cancelled
            }
            PickerStep::Selected(prompt) => {
                self.detector.forget(target.node_id());
                match self.revalidate(&prompt) {
                    Some(current) => self.start_form(&current, target),
                    None => {
                        self.page.alert(PROMPT_GONE_MESSAGE);
                        Outcome::Cancelled
                    }
                }
            }
        }
    }

    /// Fetch the prompt again; `None` when it was removed or disabled.
    fn revalidate(&self, prompt: &PromptTemplate) -> Option<PromptTemplate> {
        match self.store.enabled_prompts() {
            Ok(list) => list.into_iter().find(|p| p.id == prompt.id && p.enabled),
            Err(e) => {
                tracing::warn!(error = %e, "could not re-validate prompt");
                None
            }
        }
    }

    fn start_form(&mut self, prompt: &PromptTemplate, target: EditableSurface) -> Outcome {
        let options = FormOptions::from_settings(&self.settings);
        match VariableForm::collect(prompt, options, Rc::clone(&self.page), &self.form_guard) {
            Some(FormStep::Open(form)) => {
                self.overlay = Overlay::Form { form, target };
                Outcome::FormOpened
            }
            Some(step) => self.after_form(step, target),
            None => Outcome::Ignored,
        }
    }

    fn after_form(&mut self, step: FormStep, target: EditableSurface) -> Outcome {
        match step {
            FormStep::Open(form) => {
                self.overlay = Overlay::Form { form, target };
                Outcome::Updated
            }
            FormStep::Cancelled => Outcome::Cancelled,
            FormStep::Confirmed(text) => self.insert(&target, &text),
        }
    }

    fn insert(&mut self, target: &EditableSurface, text: &str) -> Outcome {
        match self.engine.insert(target, text) {
            Ok(()) => Outcome::Inserted,
            Err(e) => {
                tracing::error!(error = %e, "prompt insertion failed");
                Outcome::Failed(e)
            }
        }
    }
}
