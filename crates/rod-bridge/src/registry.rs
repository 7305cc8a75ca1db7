//! Live resources by id, and routing of decoded events to them.

use std::cell::RefCell;
use std::collections::HashMap;

use rod_common::ResourceId;
use tracing::trace;

use crate::events::BridgeEvent;
use crate::resources::{Tray, Window};

/// Windows (including webviews) and trays that have not finished
/// destroying. Both share the facade's id space, so an id appears in at
/// most one map.
#[derive(Default)]
pub(crate) struct Registry {
    windows: HashMap<ResourceId, Window>,
    trays: HashMap<ResourceId, Tray>,
}

impl Registry {
    pub(crate) fn insert_window(&mut self, window: Window) {
        self.windows.insert(window.id(), window);
    }

    pub(crate) fn insert_tray(&mut self, tray: Tray) {
        self.trays.insert(tray.id(), tray);
    }

    pub(crate) fn remove_window(&mut self, id: ResourceId) -> Option<Window> {
        self.windows.remove(&id)
    }

    pub(crate) fn remove_tray(&mut self, id: ResourceId) -> Option<Tray> {
        self.trays.remove(&id)
    }

    pub(crate) fn window(&self, id: ResourceId) -> Option<Window> {
        self.windows.get(&id).cloned()
    }

    pub(crate) fn tray(&self, id: ResourceId) -> Option<Tray> {
        self.trays.get(&id).cloned()
    }

    /// Live windows in creation order.
    pub(crate) fn windows(&self) -> Vec<Window> {
        let mut windows: Vec<_> = self.windows.values().cloned().collect();
        windows.sort_by_key(Window::id);
        windows
    }

    /// Live trays in creation order.
    pub(crate) fn trays(&self) -> Vec<Tray> {
        let mut trays: Vec<_> = self.trays.values().cloned().collect();
        trays.sort_by_key(Tray::id);
        trays
    }

    pub(crate) fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub(crate) fn tray_count(&self) -> usize {
        self.trays.len()
    }
}

/// Deliver `event` to the resource it names, if that resource is live.
///
/// The target is cloned out before it runs, so listeners are free to create
/// or destroy resources.
pub(crate) fn dispatch(registry: &RefCell<Registry>, event: &BridgeEvent) {
    match *event {
        BridgeEvent::TrayClicked { id } => {
            let tray = registry.borrow().tray(id);
            match tray {
                Some(tray) => tray.handle_click(),
                None => trace!(id = %id, "tray event for unknown id dropped"),
            }
        }
        _ => {
            let id = event.id();
            let window = registry.borrow().window(id);
            match window {
                Some(window) => window.handle_event(event),
                None => trace!(id = %id, kind = %event.kind(), "window event for unknown id dropped"),
            }
        }
    }
}
