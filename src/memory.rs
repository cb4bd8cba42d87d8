//! Headless host: in-memory fields, regions, page and clipboard.
//!
//! Used by the tests and benches, and by hosts that want to drive the
//! injector without a real page.

use crate::clipboard::Clipboard;
use crate::dom::{
    DispatchOutcome, HostElement, InputNotification, NativeField, Node, NodeId, RichNode,
};
use crate::page::{ListenerId, Page, PageEvent};
use anyhow::anyhow;
use slab::Slab;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type FocusSlot = Rc<Cell<Option<NodeId>>>;

/// Shared behaviour of in-memory elements: focus and event recording.
struct NodeState {
    id: NodeId,
    tag: String,
    focus: FocusSlot,
    focus_count: Cell<usize>,
    events: RefCell<Vec<InputNotification>>,
    cancel_before_input: Cell<bool>,
    reject_dispatch: Cell<bool>,
}

impl NodeState {
    fn new(id: NodeId, tag: &str, focus: FocusSlot) -> Self {
        Self {
            id,
            tag: tag.to_ascii_lowercase(),
            focus,
            focus_count: Cell::new(0),
            events: RefCell::new(Vec::new()),
            cancel_before_input: Cell::new(false),
            reject_dispatch: Cell::new(false),
        }
    }

    fn focus(&self) {
        self.focus.set(Some(self.id));
        self.focus_count.set(self.focus_count.get() + 1);
    }

    fn dispatch(&self, notification: &InputNotification) -> anyhow::Result<DispatchOutcome> {
        if self.reject_dispatch.get() {
            return Err(anyhow!("dispatch blocked on node {}", self.id.0));
        }
        self.events.borrow_mut().push(notification.clone());
        if notification.cancelable() && self.cancel_before_input.get() {
            Ok(DispatchOutcome::Canceled)
        } else {
            Ok(DispatchOutcome::Delivered)
        }
    }
}

macro_rules! node_accessors {
    ($ty:ty) => {
        impl $ty {
            pub fn id(&self) -> NodeId {
                self.node.id
            }

            /// Notifications dispatched on this element, oldest first.
            pub fn events(&self) -> Vec<InputNotification> {
                self.node.events.borrow().clone()
            }

            pub fn focus_count(&self) -> usize {
                self.node.focus_count.get()
            }

            /// Make page listeners cancel every `beforeinput`.
            pub fn cancel_before_input(&self, cancel: bool) {
                self.node.cancel_before_input.set(cancel);
            }

            /// Make every dispatch fail at the platform level.
            pub fn reject_dispatch(&self, reject: bool) {
                self.node.reject_dispatch.set(reject);
            }
        }

        impl Node for $ty {
            fn node_id(&self) -> NodeId {
                self.node.id
            }

            fn tag_name(&self) -> String {
                self.node.tag.clone()
            }

            fn focus(&self) {
                self.node.focus();
            }

            fn dispatch(&self, notification: &InputNotification) -> anyhow::Result<DispatchOutcome> {
                self.node.dispatch(notification)
            }
        }
    };
}

/// An `<input>` or `<textarea>`.
pub struct MemoryField {
    node: NodeState,
    input_type: Option<String>,
    value: RefCell<String>,
    cursor: Cell<Option<usize>>,
}

node_accessors!(MemoryField);

impl MemoryField {
    /// Place the cursor; `None` clears the selection.
    pub fn set_cursor(&self, cursor: Option<usize>) {
        self.cursor.set(cursor);
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor.get()
    }

    /// Simulate typing: replace the value and move the cursor to the end.
    pub fn type_value(&self, value: &str) {
        *self.value.borrow_mut() = value.to_string();
        self.cursor.set(Some(value.chars().count()));
    }

    pub fn element(self: &Rc<Self>) -> HostElement {
        HostElement::Field(self.clone())
    }
}

impl NativeField for MemoryField {
    fn input_type(&self) -> Option<String> {
        self.input_type.clone()
    }

    fn value(&self) -> String {
        self.value.borrow().clone()
    }

    fn set_value(&self, value: &str) {
        *self.value.borrow_mut() = value.to_string();
    }

    fn selection_start(&self) -> Option<usize> {
        self.cursor.get()
    }

    fn set_selection_range(&self, start: usize, _end: usize) -> anyhow::Result<()> {
        let len = self.value.borrow().chars().count();
        if start > len {
            return Err(anyhow!("selection {start} out of range for length {len}"));
        }
        self.cursor.set(Some(start));
        Ok(())
    }
}

/// Any other element, optionally `contenteditable`.
pub struct MemoryRegion {
    node: NodeState,
    editable: bool,
    text: RefCell<String>,
    has_text_node: Cell<bool>,
    selection: Cell<Option<(usize, usize)>>,
}

node_accessors!(MemoryRegion);

impl MemoryRegion {
    /// Put the live selection inside this region, or move it elsewhere (`None`).
    pub fn select(&self, range: Option<(usize, usize)>) {
        self.selection.set(range);
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection.get()
    }

    pub fn type_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
        self.has_text_node.set(!text.is_empty());
        let end = text.chars().count();
        self.selection.set(Some((end, end)));
    }

    pub fn element(self: &Rc<Self>) -> HostElement {
        HostElement::Rich(self.clone())
    }
}

impl RichNode for MemoryRegion {
    fn is_content_editable(&self) -> bool {
        self.editable
    }

    fn text_content(&self) -> String {
        self.text.borrow().clone()
    }

    fn set_text_content(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
        self.has_text_node.set(true);
    }

    fn has_text_node(&self) -> bool {
        self.has_text_node.get()
    }

    fn create_text_node(&self) -> anyhow::Result<()> {
        self.has_text_node.set(true);
        Ok(())
    }

    fn selection_offset(&self) -> Option<usize> {
        self.selection.get().map(|(start, _)| start)
    }

    fn set_selection(&self, start: usize, end: usize) -> anyhow::Result<()> {
        if !self.has_text_node.get() {
            return Err(anyhow!("no text node to select in"));
        }
        self.selection.set(Some((start, end)));
        Ok(())
    }
}

/// A page holding in-memory elements.
#[derive(Default)]
pub struct MemoryPage {
    focus: FocusSlot,
    next_id: Cell<u64>,
    elements: RefCell<Vec<HostElement>>,
    listeners: RefCell<Slab<PageEvent>>,
    alerts: RefCell<Vec<String>>,
}

impl MemoryPage {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    fn next_node(&self) -> NodeId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        NodeId(id)
    }

    /// Add an `<input>` (`tag = "input"`) or `<textarea>` holding `value`, with
    /// the cursor at the end.
    pub fn add_field(&self, tag: &str, input_type: Option<&str>, value: &str) -> Rc<MemoryField> {
        let field = Rc::new(MemoryField {
            node: NodeState::new(self.next_node(), tag, Rc::clone(&self.focus)),
            input_type: input_type.map(str::to_string),
            value: RefCell::new(value.to_string()),
            cursor: Cell::new(Some(value.chars().count())),
        });
        self.elements.borrow_mut().push(field.element());
        field
    }

    pub fn add_region(&self, tag: &str, editable: bool, text: &str) -> Rc<MemoryRegion> {
        let region = Rc::new(MemoryRegion {
            node: NodeState::new(self.next_node(), tag, Rc::clone(&self.focus)),
            editable,
            text: RefCell::new(text.to_string()),
            has_text_node: Cell::new(!text.is_empty()),
            selection: Cell::new(None),
        });
        self.elements.borrow_mut().push(region.element());
        region
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focus.get()
    }

    pub fn blur(&self) {
        self.focus.set(None);
    }

    /// Listeners currently registered by overlays.
    pub fn live_listeners(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl Page for MemoryPage {
    fn active_element(&self) -> Option<HostElement> {
        let id = self.focus.get()?;
        self.elements
            .borrow()
            .iter()
            .find(|e| e.node_id() == id)
            .cloned()
    }

    fn alert(&self, message: &str) {
        tracing::info!(alert = message, "page alert");
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn add_listener(&self, event: PageEvent) -> ListenerId {
        ListenerId(self.listeners.borrow_mut().insert(event))
    }

    fn remove_listener(&self, id: ListenerId) {
        let mut listeners = self.listeners.borrow_mut();
        if listeners.contains(id.0) {
            listeners.remove(id.0);
        }
    }
}

/// Clipboard recording the last copied text. Clones share contents.
#[derive(Clone, Default)]
pub struct MemoryClipboard {
    contents: Rc<RefCell<Option<String>>>,
    deny: Rc<Cell<bool>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    /// Make every write fail, as when clipboard permission is refused.
    pub fn deny(&self, deny: bool) {
        self.deny.set(deny);
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()> {
        if self.deny.get() {
            return Err(anyhow!("clipboard permission denied"));
        }
        *self.contents.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}
