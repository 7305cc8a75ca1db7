//! The fixed call surface of the native engine.
//!
//! Everything the bridge does to a native resource goes through
//! [`NativeAbi`]. The engine hands back opaque [`RawHandle`]s; a create call
//! that fails returns `None` instead of a handle. Implementations:
//! - [`ffi::FfiEngine`] calls a table of C function pointers
//! - [`headless::HeadlessEngine`] is an in-process engine with no OS windows,
//!   used by tests and the playground

use std::ffi::{c_void, CStr};
use std::num::NonZeroUsize;

use rod_common::ResourceId;

pub mod ffi;
pub mod headless;

/// Opaque, non-null value identifying one native resource instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawHandle(NonZeroUsize);

impl RawHandle {
    pub fn from_ptr(ptr: *mut c_void) -> Option<Self> {
        NonZeroUsize::new(ptr as usize).map(Self)
    }

    pub fn from_raw(value: usize) -> Option<Self> {
        NonZeroUsize::new(value).map(Self)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0.get() as *mut c_void
    }

    pub fn as_raw(self) -> usize {
        self.0.get()
    }
}

/// The slot a wrapper keeps its native handle in.
///
/// Once released, a slot stays `Empty`; wrappers swap it out with
/// `Cell::replace` before calling the native destroy function, so a handle
/// can never be freed twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleSlot {
    Live(RawHandle),
    #[default]
    Empty,
}

impl HandleSlot {
    pub fn live(self) -> Option<RawHandle> {
        match self {
            Self::Live(handle) => Some(handle),
            Self::Empty => None,
        }
    }

    pub fn is_live(self) -> bool {
        matches!(self, Self::Live(_))
    }
}

impl From<Option<RawHandle>> for HandleSlot {
    fn from(handle: Option<RawHandle>) -> Self {
        handle.map_or(Self::Empty, Self::Live)
    }
}

/// Boolean window state readable through `window_get_*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowFlag {
    AlwaysOnTop,
    Closable,
    Decorated,
    Focused,
    Maximizable,
    Maximized,
    Minimizable,
    Minimized,
    Resizable,
    Visible,
}

impl WindowFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AlwaysOnTop => "always_on_top",
            Self::Closable => "closable",
            Self::Decorated => "decorated",
            Self::Focused => "focused",
            Self::Maximizable => "maximizable",
            Self::Maximized => "maximized",
            Self::Minimizable => "minimizable",
            Self::Minimized => "minimized",
            Self::Resizable => "resizable",
            Self::Visible => "visible",
        }
    }
}

/// Boolean window state writable through `window_set_*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowToggle {
    AlwaysOnBottom,
    AlwaysOnTop,
    Closable,
    ContentProtection,
    Decorations,
    Focusable,
    Fullscreen,
    IgnoreCursorEvents,
    Maximizable,
    Maximized,
    Minimizable,
    Minimized,
    Resizable,
    Visible,
    VisibleOnAllWorkspaces,
}

impl WindowToggle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AlwaysOnBottom => "always_on_bottom",
            Self::AlwaysOnTop => "always_on_top",
            Self::Closable => "closable",
            Self::ContentProtection => "content_protection",
            Self::Decorations => "decorations",
            Self::Focusable => "focusable",
            Self::Fullscreen => "fullscreen",
            Self::IgnoreCursorEvents => "ignore_cursor_events",
            Self::Maximizable => "maximizable",
            Self::Maximized => "maximized",
            Self::Minimizable => "minimizable",
            Self::Minimized => "minimized",
            Self::Resizable => "resizable",
            Self::Visible => "visible",
            Self::VisibleOnAllWorkspaces => "visible_on_all_workspaces",
        }
    }
}

/// Window values the engine returns as strings (plain text or JSON).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowQuery {
    Title,
    Size,
    Position,
}

impl WindowQuery {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Size => "size",
            Self::Position => "position",
        }
    }
}

/// Window values the engine accepts as strings (plain text or JSON).
///
/// `MinimumSize` and `MaximumSize` take an empty string to clear the bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowField {
    Title,
    Size,
    MinimumSize,
    MaximumSize,
    Position,
    ProgressBar,
}

impl WindowField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Size => "size",
            Self::MinimumSize => "minimum_size",
            Self::MaximumSize => "maximum_size",
            Self::Position => "position",
            Self::ProgressBar => "progress_bar",
        }
    }
}

/// One native event frame: event kind and JSON payload, as raw bytes.
pub type EventSink<'a> = &'a mut dyn FnMut(&[u8], &[u8]);

/// Entry points into the native engine.
///
/// Calls are synchronous and bounded. Callers guarantee every handle passed
/// in is live: it came from the matching create call and has not been passed
/// to the matching destroy call.
pub trait NativeAbi {
    fn event_loop_create(&self) -> Option<RawHandle>;
    fn event_loop_destroy(&self, event_loop: RawHandle);
    /// Pump pending native events. `sink` is invoked zero or more times
    /// before this returns, and never afterwards.
    fn event_loop_poll(&self, event_loop: RawHandle, sink: EventSink<'_>);

    fn window_create(
        &self,
        event_loop: RawHandle,
        id: ResourceId,
        options: &CStr,
    ) -> Option<RawHandle>;
    fn window_destroy(&self, window: RawHandle);
    fn window_get_flag(&self, window: RawHandle, flag: WindowFlag) -> bool;
    fn window_get_text(&self, window: RawHandle, query: WindowQuery) -> Vec<u8>;
    fn window_set_flag(&self, window: RawHandle, toggle: WindowToggle, value: bool);
    fn window_set_text(&self, window: RawHandle, field: WindowField, value: &CStr);
    fn window_focus(&self, window: RawHandle);
    fn window_start_drag(&self, window: RawHandle);

    fn webcontext_create(&self, path: &CStr) -> Option<RawHandle>;
    fn webcontext_destroy(&self, context: RawHandle);

    fn webview_create(
        &self,
        window: RawHandle,
        context: Option<RawHandle>,
        options: &CStr,
    ) -> Option<RawHandle>;
    fn webview_destroy(&self, webview: RawHandle);
    fn webview_get_url(&self, webview: RawHandle) -> Vec<u8>;
    fn webview_is_devtools_open(&self, webview: RawHandle) -> bool;
    fn webview_set_url(&self, webview: RawHandle, url: &CStr);
    fn webview_set_html(&self, webview: RawHandle, html: &CStr);
    fn webview_reload(&self, webview: RawHandle);
    fn webview_zoom(&self, webview: RawHandle, scale_factor: f64);
    fn webview_open_devtools(&self, webview: RawHandle);
    fn webview_close_devtools(&self, webview: RawHandle);
    fn webview_clear_all_browsing_data(&self, webview: RawHandle);

    fn tray_create(&self, id: ResourceId, options: &CStr) -> Option<RawHandle>;
    fn tray_destroy(&self, tray: RawHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_pointer_is_not_a_handle() {
        assert_eq!(RawHandle::from_ptr(std::ptr::null_mut()), None);
        assert_eq!(RawHandle::from_raw(0), None);
    }

    #[test]
    fn handle_round_trips_through_pointer() {
        let handle = RawHandle::from_raw(0x1000).unwrap();
        assert_eq!(RawHandle::from_ptr(handle.as_ptr()), Some(handle));
        assert_eq!(handle.as_raw(), 0x1000);
    }

    #[test]
    fn slot_from_option() {
        let handle = RawHandle::from_raw(8).unwrap();
        assert_eq!(HandleSlot::from(Some(handle)), HandleSlot::Live(handle));
        assert_eq!(HandleSlot::from(None), HandleSlot::Empty);
        assert_eq!(HandleSlot::default(), HandleSlot::Empty);
    }

    #[test]
    fn replacing_a_slot_leaves_it_empty() {
        let handle = RawHandle::from_raw(8).unwrap();
        let slot = std::cell::Cell::new(HandleSlot::Live(handle));
        assert_eq!(slot.replace(HandleSlot::Empty).live(), Some(handle));
        assert_eq!(slot.replace(HandleSlot::Empty).live(), None);
        assert!(!slot.get().is_live());
    }
}
