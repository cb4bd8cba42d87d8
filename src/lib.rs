//! Store, pick and inject `{{variable}}` prompt templates into text fields.
//!
//! The flow: a [`trigger::TriggerDetector`] notices the trigger text, the
//! [`picker::PromptPicker`] lists enabled prompts, the
//! [`form::VariableForm`] collects variable values and the
//! [`insert::InsertionEngine`] writes the result through an
//! [`surface::EditableSurface`]. [`injector::Injector`] ties them together
//! for one page.

pub mod clipboard;
pub mod common;
pub mod dom;
pub mod error;
pub mod form;
pub mod guard;
pub mod injector;
pub mod insert;
pub mod keys;
pub mod logging;
pub mod memory;
pub mod page;
pub mod picker;
pub mod prompt;
pub mod settings;
pub mod surface;
pub mod template;
pub mod trigger;

pub use error::{InjectError, InjectResult};
pub use injector::{Injector, Outcome};
pub use template::{extract_variables, render_template, VariableBindings};
