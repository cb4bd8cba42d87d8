use crate::dom::HostElement;
use std::rc::Rc;

/// Page-level events an overlay listens to while it is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageEvent {
    KeyDown,
    MouseDown,
    MouseMove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub usize);

/// The page the injector runs in.
pub trait Page {
    fn active_element(&self) -> Option<HostElement>;
    /// Blocking user-visible message.
    fn alert(&self, message: &str);
    fn add_listener(&self, event: PageEvent) -> ListenerId;
    fn remove_listener(&self, id: ListenerId);
}

/// Listener registrations owned by one overlay.
///
/// Dropping the set removes every registration, so nothing keeps firing after
/// its overlay is gone.
pub struct Listeners {
    page: Rc<dyn Page>,
    ids: Vec<ListenerId>,
}

impl Listeners {
    pub fn new(page: Rc<dyn Page>) -> Self {
        Self { page, ids: Vec::new() }
    }

    pub fn listen(&mut self, event: PageEvent) {
        let id = self.page.add_listener(event);
        self.ids.push(id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn teardown(&mut self) {
        for id in self.ids.drain(..) {
            self.page.remove_listener(id);
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.teardown();
    }
}
