use crate::dom::{
    DispatchOutcome, HostElement, InputNotification, NativeField, NodeId, RichNode,
};
use crate::error::{InjectError, InjectResult};
use std::rc::Rc;

/// `<input>` types that hold free text.
const TEXT_INPUT_TYPES: &[&str] = &["text", "search", "email", "url", "tel", "password"];

/// The read/write/cursor contract shared by both surface kinds.
pub trait Surface {
    fn node_id(&self) -> NodeId;
    fn text(&self) -> String;
    fn set_text(&self, text: &str);
    fn selection_start(&self) -> usize;
    fn set_selection_range(&self, start: usize, end: usize);
    fn focus(&self);
    fn notify(&self, notification: &InputNotification) -> anyhow::Result<DispatchOutcome>;
}

/// Where inserted text goes.
#[derive(Clone)]
pub enum EditableSurface {
    PlainField(PlainField),
    RichRegion(RichRegion),
}

impl EditableSurface {
    /// Classify a host element. This is the only place element kinds are
    /// inspected.
    pub fn from_element(element: &HostElement) -> InjectResult<Self> {
        match element {
            HostElement::Field(f) => {
                let tag = f.tag_name();
                let text_like = match tag.as_str() {
                    "textarea" => true,
                    "input" => f
                        .input_type()
                        .map(|t| TEXT_INPUT_TYPES.contains(&t.to_ascii_lowercase().as_str()))
                        .unwrap_or(true),
                    _ => false,
                };
                if text_like {
                    Ok(EditableSurface::PlainField(PlainField { el: Rc::clone(f) }))
                } else {
                    Err(InjectError::not_editable(tag))
                }
            }
            HostElement::Rich(r) if r.is_content_editable() => {
                Ok(EditableSurface::RichRegion(RichRegion { el: Rc::clone(r) }))
            }
            HostElement::Rich(r) => Err(InjectError::not_editable(r.tag_name())),
        }
    }

    pub fn is_rich(&self) -> bool {
        matches!(self, EditableSurface::RichRegion(_))
    }

    fn inner(&self) -> &dyn Surface {
        match self {
            EditableSurface::PlainField(f) => f,
            EditableSurface::RichRegion(r) => r,
        }
    }
}

impl Surface for EditableSurface {
    fn node_id(&self) -> NodeId {
        self.inner().node_id()
    }

    fn text(&self) -> String {
        self.inner().text()
    }

    fn set_text(&self, text: &str) {
        self.inner().set_text(text)
    }

    fn selection_start(&self) -> usize {
        self.inner().selection_start()
    }

    fn set_selection_range(&self, start: usize, end: usize) {
        self.inner().set_selection_range(start, end)
    }

    fn focus(&self) {
        self.inner().focus()
    }

    fn notify(&self, notification: &InputNotification) -> anyhow::Result<DispatchOutcome> {
        self.inner().notify(notification)
    }
}

/// A native text field.
#[derive(Clone)]
pub struct PlainField {
    el: Rc<dyn NativeField>,
}

impl PlainField {
    /// Cursor as reported by the field, `None` when it has no selection.
    pub fn cursor(&self) -> Option<usize> {
        self.el.selection_start()
    }
}

impl Surface for PlainField {
    fn node_id(&self) -> NodeId {
        self.el.node_id()
    }

    fn text(&self) -> String {
        self.el.value()
    }

    fn set_text(&self, text: &str) {
        self.el.set_value(text);
    }

    fn selection_start(&self) -> usize {
        self.el
            .selection_start()
            .unwrap_or_else(|| self.el.value().chars().count())
    }

    fn set_selection_range(&self, start: usize, end: usize) {
        if let Err(e) = self.el.set_selection_range(start, end) {
            tracing::warn!(node = ?self.el.node_id(), error = %e, "failed to set selection");
        }
    }

    fn focus(&self) {
        self.el.focus();
    }

    fn notify(&self, notification: &InputNotification) -> anyhow::Result<DispatchOutcome> {
        self.el.dispatch(notification)
    }
}

/// A contenteditable region. Text is flattened and the cursor comes from the
/// live selection.
#[derive(Clone)]
pub struct RichRegion {
    el: Rc<dyn RichNode>,
}

impl RichRegion {
    /// Offset of the live selection when it lies inside this region.
    pub fn cursor(&self) -> Option<usize> {
        self.el.selection_offset()
    }
}

impl Surface for RichRegion {
    fn node_id(&self) -> NodeId {
        self.el.node_id()
    }

    fn text(&self) -> String {
        self.el.text_content()
    }

    fn set_text(&self, text: &str) {
        self.el.set_text_content(text);
        if let Err(e) = self.el.dispatch(&InputNotification::input()) {
            tracing::warn!(node = ?self.el.node_id(), error = %e, "input notification failed");
        }
    }

    fn selection_start(&self) -> usize {
        self.el.selection_offset().unwrap_or(0)
    }

    fn set_selection_range(&self, start: usize, end: usize) {
        if !self.el.has_text_node() {
            if let Err(e) = self.el.create_text_node() {
                tracing::warn!(node = ?self.el.node_id(), error = %e, "failed to create text node");
                return;
            }
        }
        let len = self.el.text_content().chars().count();
        let start = start.min(len);
        let end = end.min(len).max(start);
        if let Err(e) = self.el.set_selection(start, end) {
            tracing::warn!(node = ?self.el.node_id(), error = %e, "failed to set selection");
        }
    }

    fn focus(&self) {
        self.el.focus();
    }

    fn notify(&self, notification: &InputNotification) -> anyhow::Result<DispatchOutcome> {
        self.el.dispatch(notification)
    }
}
