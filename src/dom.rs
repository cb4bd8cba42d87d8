//! Host-side element traits.
//!
//! A host binding (browser content script, accessibility bridge, or the
//! in-memory host in [`crate::memory`]) implements these over its own node
//! handles. Methods take `&self`; hosts are single-threaded and use interior
//! mutability the way DOM handles do.

use std::rc::Rc;

/// Identity of a host node, stable for as long as the node lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Sent before a write; listeners may cancel it.
    BeforeInput,
    /// Sent after a write; never cancelable.
    Input,
}

/// A synthetic input event dispatched on a target element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputNotification {
    pub kind: NotificationKind,
    /// For `BeforeInput`, the full text the element will hold after the write.
    pub data: Option<String>,
}

impl InputNotification {
    pub fn before_input(prospective: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::BeforeInput,
            data: Some(prospective.into()),
        }
    }

    pub fn input() -> Self {
        Self {
            kind: NotificationKind::Input,
            data: None,
        }
    }

    pub fn cancelable(&self) -> bool {
        self.kind == NotificationKind::BeforeInput
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered,
    /// A listener called `preventDefault` on a cancelable notification.
    Canceled,
}

/// Capabilities shared by every host element.
pub trait Node {
    fn node_id(&self) -> NodeId;
    /// Lowercase tag name, e.g. `input`, `textarea`, `div`.
    fn tag_name(&self) -> String;
    fn focus(&self);
    /// Dispatch a synthetic notification. `Err` means the platform refused to
    /// dispatch at all.
    fn dispatch(&self, notification: &InputNotification) -> anyhow::Result<DispatchOutcome>;
}

/// `<input>` and `<textarea>`: a linear buffer with a char cursor.
pub trait NativeField: Node {
    /// The `type` attribute for inputs, `None` for textareas or when unset.
    fn input_type(&self) -> Option<String>;
    fn value(&self) -> String;
    /// Assigns the value without raising any event.
    fn set_value(&self, value: &str);
    fn selection_start(&self) -> Option<usize>;
    fn set_selection_range(&self, start: usize, end: usize) -> anyhow::Result<()>;
}

/// Any other element; only editable when it reports `contenteditable`.
pub trait RichNode: Node {
    fn is_content_editable(&self) -> bool;
    /// Flattened text content.
    fn text_content(&self) -> String;
    /// Replaces all children with a single text node. Raises no event.
    fn set_text_content(&self, text: &str);
    fn has_text_node(&self) -> bool;
    fn create_text_node(&self) -> anyhow::Result<()>;
    /// Char offset of the live selection's start when its range lies inside
    /// this element.
    fn selection_offset(&self) -> Option<usize>;
    fn set_selection(&self, start: usize, end: usize) -> anyhow::Result<()>;
}

/// An element handed over by the host, split by the host's own node kind.
#[derive(Clone)]
pub enum HostElement {
    Field(Rc<dyn NativeField>),
    Rich(Rc<dyn RichNode>),
}

impl HostElement {
    pub fn node_id(&self) -> NodeId {
        match self {
            HostElement::Field(f) => f.node_id(),
            HostElement::Rich(r) => r.node_id(),
        }
    }

    pub fn tag_name(&self) -> String {
        match self {
            HostElement::Field(f) => f.tag_name(),
            HostElement::Rich(r) => r.tag_name(),
        }
    }

    pub fn focus(&self) {
        match self {
            HostElement::Field(f) => f.focus(),
            HostElement::Rich(r) => r.focus(),
        }
    }
}

impl std::fmt::Debug for HostElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            HostElement::Field(_) => "Field",
            HostElement::Rich(_) => "Rich",
        };
        f.debug_struct("HostElement")
            .field("kind", &kind)
            .field("node", &self.node_id())
            .field("tag", &self.tag_name())
            .finish()
    }
}
