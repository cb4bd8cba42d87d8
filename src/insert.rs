//! Writing the final prompt text into a surface.

use crate::common::{rfind_ci, splice_chars};
use crate::dom::{DispatchOutcome, InputNotification};
use crate::error::{InjectError, InjectResult};
use crate::surface::{EditableSurface, PlainField, RichRegion, Surface};

/// Writes the final prompt text into a surface, consuming the trigger.
#[derive(Debug, Clone)]
pub struct InsertionEngine {
    trigger: String,
}

impl InsertionEngine {
    pub fn new(trigger: impl Into<String>) -> Self {
        Self { trigger: trigger.into() }
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    pub fn insert(&self, surface: &EditableSurface, text: &str) -> InjectResult<()> {
        match surface {
            EditableSurface::RichRegion(region) => self.insert_rich(region, text),
            EditableSurface::PlainField(field) => {
                self.insert_plain(field, text);
                Ok(())
            }
        }
    }

    fn insert_rich(&self, region: &RichRegion, text: &str) -> InjectResult<()> {
        let current = region.text();
        let trigger_len = self.trigger.chars().count();
        let next = match rfind_ci(&current, &self.trigger) {
            Some(at) => splice_chars(&current, at, trigger_len, text),
            None => match region.cursor() {
                Some(at) => splice_chars(&current, at, 0, text),
                None => format!("{current}{text}"),
            },
        };

        match region.notify(&InputNotification::before_input(next.clone())) {
            Ok(DispatchOutcome::Canceled) => {
                tracing::debug!(node = ?region.node_id(), "beforeinput canceled by page");
                return Err(InjectError::WriteRejected);
            }
            Ok(DispatchOutcome::Delivered) => {}
            Err(e) => {
                tracing::warn!(node = ?region.node_id(), error = %e, "beforeinput dispatch failed");
            }
        }

        region.set_text(&next);
        let end = next.chars().count();
        region.set_selection_range(end, end);
        region.focus();
        tracing::debug!(node = ?region.node_id(), "inserted prompt into rich region");
        Ok(())
    }

    /// Assumes the trigger sits right before the cursor. If the field changed
    /// between detection and confirmation the wrong chars are removed.
    fn insert_plain(&self, field: &PlainField, text: &str) {
        let current = field.text();
        let cursor = field.selection_start().min(current.chars().count());
        let removed = self.trigger.chars().count().min(cursor);
        let at = cursor - removed;

        let next = splice_chars(&current, at, removed, text);
        field.set_text(&next);
        let caret = at + text.chars().count();
        field.set_selection_range(caret, caret);

        if let Err(e) = field.notify(&InputNotification::input()) {
            tracing::warn!(node = ?field.node_id(), error = %e, "input notification rejected");
        }
        field.focus();
        tracing::debug!(node = ?field.node_id(), caret, "inserted prompt into field");
    }
}
