//! [`NativeAbi`] over the engine's exported C functions.
//!
//! The engine exposes plain `extern "C"` symbols (`rod_event_loop_create`,
//! `rod_window_set_title`, ...). Resolving them, whether by static linking
//! or a dynamic loader, is left to the embedder, who hands the resolved
//! pointers over as a [`RodSymbols`] table.
//!
//! The poll callback carries no user data, so events are collected through
//! a thread-local queue that exists only for the duration of one
//! `rod_event_loop_poll` call. Invocations outside that window are dropped.

use std::cell::RefCell;
use std::ffi::{c_char, c_void, CStr};

use rod_common::ResourceId;
use tracing::warn;

use super::{EventSink, NativeAbi, RawHandle, WindowField, WindowFlag, WindowQuery, WindowToggle};

type Handle = *mut c_void;

/// Signature of the callback passed to `rod_event_loop_poll`.
pub type PollCallback = extern "C" fn(event: *const c_char, data: *const c_char);

/// Resolved engine entry points.
#[derive(Clone, Copy)]
pub struct RodSymbols {
    // event loop
    pub event_loop_create: unsafe extern "C" fn() -> Handle,
    pub event_loop_destroy: unsafe extern "C" fn(Handle),
    pub event_loop_poll: unsafe extern "C" fn(Handle, PollCallback),

    // window
    pub window_create: unsafe extern "C" fn(Handle, u16, *const c_char) -> Handle,
    pub window_destroy: unsafe extern "C" fn(Handle),

    // window getters
    pub window_get_title: unsafe extern "C" fn(Handle) -> *const c_char,
    pub window_get_size: unsafe extern "C" fn(Handle) -> *const c_char,
    pub window_get_position: unsafe extern "C" fn(Handle) -> *const c_char,
    pub window_get_always_on_top: unsafe extern "C" fn(Handle) -> bool,
    pub window_get_closable: unsafe extern "C" fn(Handle) -> bool,
    pub window_get_decorated: unsafe extern "C" fn(Handle) -> bool,
    pub window_get_focused: unsafe extern "C" fn(Handle) -> bool,
    pub window_get_maximizable: unsafe extern "C" fn(Handle) -> bool,
    pub window_get_maximized: unsafe extern "C" fn(Handle) -> bool,
    pub window_get_minimizable: unsafe extern "C" fn(Handle) -> bool,
    pub window_get_minimized: unsafe extern "C" fn(Handle) -> bool,
    pub window_get_resizable: unsafe extern "C" fn(Handle) -> bool,
    pub window_get_visible: unsafe extern "C" fn(Handle) -> bool,

    // window setters
    pub window_set_always_on_bottom: unsafe extern "C" fn(Handle, bool),
    pub window_set_always_on_top: unsafe extern "C" fn(Handle, bool),
    pub window_set_closable: unsafe extern "C" fn(Handle, bool),
    pub window_set_content_protection: unsafe extern "C" fn(Handle, bool),
    pub window_set_decorations: unsafe extern "C" fn(Handle, bool),
    pub window_set_focus: unsafe extern "C" fn(Handle),
    pub window_set_focusable: unsafe extern "C" fn(Handle, bool),
    pub window_set_fullscreen: unsafe extern "C" fn(Handle, bool),
    pub window_set_ignore_cursor_events: unsafe extern "C" fn(Handle, bool),
    pub window_set_size: unsafe extern "C" fn(Handle, *const c_char),
    pub window_set_maximum_size: unsafe extern "C" fn(Handle, *const c_char),
    pub window_set_maximizable: unsafe extern "C" fn(Handle, bool),
    pub window_set_maximized: unsafe extern "C" fn(Handle, bool),
    pub window_set_minimum_size: unsafe extern "C" fn(Handle, *const c_char),
    pub window_set_minimizable: unsafe extern "C" fn(Handle, bool),
    pub window_set_minimized: unsafe extern "C" fn(Handle, bool),
    pub window_set_position: unsafe extern "C" fn(Handle, *const c_char),
    pub window_set_progress_bar: unsafe extern "C" fn(Handle, *const c_char),
    pub window_set_resizable: unsafe extern "C" fn(Handle, bool),
    pub window_set_title: unsafe extern "C" fn(Handle, *const c_char),
    pub window_set_visible: unsafe extern "C" fn(Handle, bool),
    pub window_set_visible_on_all_workspaces: unsafe extern "C" fn(Handle, bool),

    // window actions
    pub window_start_drag: unsafe extern "C" fn(Handle),

    // webcontext
    pub webcontext_create: unsafe extern "C" fn(*const c_char) -> Handle,
    pub webcontext_destroy: unsafe extern "C" fn(Handle),

    // webview
    pub webview_create: unsafe extern "C" fn(Handle, Handle, *const c_char) -> Handle,
    pub webview_destroy: unsafe extern "C" fn(Handle),
    pub webview_get_url: unsafe extern "C" fn(Handle) -> *const c_char,
    pub webview_is_devtools_open: unsafe extern "C" fn(Handle) -> bool,
    pub webview_set_url: unsafe extern "C" fn(Handle, *const c_char),
    pub webview_set_html: unsafe extern "C" fn(Handle, *const c_char),
    pub webview_zoom: unsafe extern "C" fn(Handle, f64),
    pub webview_open_devtools: unsafe extern "C" fn(Handle),
    pub webview_close_devtools: unsafe extern "C" fn(Handle),
    pub webview_reload: unsafe extern "C" fn(Handle),
    pub webview_clear_all_browsing_data: unsafe extern "C" fn(Handle),

    // tray
    pub tray_create: unsafe extern "C" fn(u16, *const c_char) -> Handle,
    pub tray_destroy: unsafe extern "C" fn(Handle),
}

/// A poll frame copied out of the engine's buffers.
type Frame = (Vec<u8>, Vec<u8>);

thread_local! {
    /// `Some` only while `rod_event_loop_poll` is running on this thread.
    static POLL_FRAMES: RefCell<Option<Vec<Frame>>> = const { RefCell::new(None) };
}

/// Copy a nul-terminated engine string. Null reads as empty.
///
/// # Safety
/// `ptr` must be null or point to a nul-terminated buffer that stays valid
/// for the duration of the call.
unsafe fn copy_c_bytes(ptr: *const c_char) -> Vec<u8> {
    if ptr.is_null() {
        return Vec::new();
    }
    CStr::from_ptr(ptr).to_bytes().to_vec()
}

extern "C" fn poll_trampoline(event: *const c_char, data: *const c_char) {
    // SAFETY: the engine passes buffers that live until the callback returns.
    let frame = unsafe { (copy_c_bytes(event), copy_c_bytes(data)) };
    POLL_FRAMES.with(|frames| match frames.try_borrow_mut() {
        Ok(mut frames) => match frames.as_mut() {
            Some(queue) => queue.push(frame),
            None => warn!("native event delivered outside of a poll call, dropped"),
        },
        Err(_) => warn!("native event delivered re-entrantly, dropped"),
    });
}

/// Engine backed by resolved C function pointers.
pub struct FfiEngine {
    symbols: RodSymbols,
}

impl FfiEngine {
    /// Wrap a symbol table.
    ///
    /// # Safety
    /// Every pointer in `symbols` must be the matching engine export, and the
    /// engine must stay loaded for as long as this value (and every handle it
    /// produced) is alive.
    pub unsafe fn new(symbols: RodSymbols) -> Self {
        Self { symbols }
    }

    fn owned_text(&self, ptr: *const c_char) -> Vec<u8> {
        // SAFETY: getter results are nul-terminated engine strings.
        unsafe { copy_c_bytes(ptr) }
    }
}

// SAFETY (all blocks below): the symbol table is valid per `FfiEngine::new`,
// and `NativeAbi` callers only pass handles that are still live.
impl NativeAbi for FfiEngine {
    fn event_loop_create(&self) -> Option<RawHandle> {
        RawHandle::from_ptr(unsafe { (self.symbols.event_loop_create)() })
    }

    fn event_loop_destroy(&self, event_loop: RawHandle) {
        unsafe { (self.symbols.event_loop_destroy)(event_loop.as_ptr()) }
    }

    fn event_loop_poll(&self, event_loop: RawHandle, sink: EventSink<'_>) {
        let nested = POLL_FRAMES.with(|frames| {
            let mut frames = frames.borrow_mut();
            if frames.is_some() {
                return true;
            }
            *frames = Some(Vec::new());
            false
        });
        if nested {
            warn!("event loop poll re-entered, skipped");
            return;
        }

        unsafe { (self.symbols.event_loop_poll)(event_loop.as_ptr(), poll_trampoline) };

        let frames = POLL_FRAMES
            .with(|frames| frames.borrow_mut().take())
            .unwrap_or_default();
        for (kind, payload) in frames {
            sink(&kind, &payload);
        }
    }

    fn window_create(
        &self,
        event_loop: RawHandle,
        id: ResourceId,
        options: &CStr,
    ) -> Option<RawHandle> {
        RawHandle::from_ptr(unsafe {
            (self.symbols.window_create)(event_loop.as_ptr(), id.get(), options.as_ptr())
        })
    }

    fn window_destroy(&self, window: RawHandle) {
        unsafe { (self.symbols.window_destroy)(window.as_ptr()) }
    }

    fn window_get_flag(&self, window: RawHandle, flag: WindowFlag) -> bool {
        let s = &self.symbols;
        let getter = match flag {
            WindowFlag::AlwaysOnTop => s.window_get_always_on_top,
            WindowFlag::Closable => s.window_get_closable,
            WindowFlag::Decorated => s.window_get_decorated,
            WindowFlag::Focused => s.window_get_focused,
            WindowFlag::Maximizable => s.window_get_maximizable,
            WindowFlag::Maximized => s.window_get_maximized,
            WindowFlag::Minimizable => s.window_get_minimizable,
            WindowFlag::Minimized => s.window_get_minimized,
            WindowFlag::Resizable => s.window_get_resizable,
            WindowFlag::Visible => s.window_get_visible,
        };
        unsafe { getter(window.as_ptr()) }
    }

    fn window_get_text(&self, window: RawHandle, query: WindowQuery) -> Vec<u8> {
        let getter = match query {
            WindowQuery::Title => self.symbols.window_get_title,
            WindowQuery::Size => self.symbols.window_get_size,
            WindowQuery::Position => self.symbols.window_get_position,
        };
        self.owned_text(unsafe { getter(window.as_ptr()) })
    }

    fn window_set_flag(&self, window: RawHandle, toggle: WindowToggle, value: bool) {
        let s = &self.symbols;
        let setter = match toggle {
            WindowToggle::AlwaysOnBottom => s.window_set_always_on_bottom,
            WindowToggle::AlwaysOnTop => s.window_set_always_on_top,
            WindowToggle::Closable => s.window_set_closable,
            WindowToggle::ContentProtection => s.window_set_content_protection,
            WindowToggle::Decorations => s.window_set_decorations,
            WindowToggle::Focusable => s.window_set_focusable,
            WindowToggle::Fullscreen => s.window_set_fullscreen,
            WindowToggle::IgnoreCursorEvents => s.window_set_ignore_cursor_events,
            WindowToggle::Maximizable => s.window_set_maximizable,
            WindowToggle::Maximized => s.window_set_maximized,
            WindowToggle::Minimizable => s.window_set_minimizable,
            WindowToggle::Minimized => s.window_set_minimized,
            WindowToggle::Resizable => s.window_set_resizable,
            WindowToggle::Visible => s.window_set_visible,
            WindowToggle::VisibleOnAllWorkspaces => s.window_set_visible_on_all_workspaces,
        };
        unsafe { setter(window.as_ptr(), value) }
    }

    fn window_set_text(&self, window: RawHandle, field: WindowField, value: &CStr) {
        let s = &self.symbols;
        let setter = match field {
            WindowField::Title => s.window_set_title,
            WindowField::Size => s.window_set_size,
            WindowField::MinimumSize => s.window_set_minimum_size,
            WindowField::MaximumSize => s.window_set_maximum_size,
            WindowField::Position => s.window_set_position,
            WindowField::ProgressBar => s.window_set_progress_bar,
        };
        unsafe { setter(window.as_ptr(), value.as_ptr()) }
    }

    fn window_focus(&self, window: RawHandle) {
        unsafe { (self.symbols.window_set_focus)(window.as_ptr()) }
    }

    fn window_start_drag(&self, window: RawHandle) {
        unsafe { (self.symbols.window_start_drag)(window.as_ptr()) }
    }

    fn webcontext_create(&self, path: &CStr) -> Option<RawHandle> {
        RawHandle::from_ptr(unsafe { (self.symbols.webcontext_create)(path.as_ptr()) })
    }

    fn webcontext_destroy(&self, context: RawHandle) {
        unsafe { (self.symbols.webcontext_destroy)(context.as_ptr()) }
    }

    fn webview_create(
        &self,
        window: RawHandle,
        context: Option<RawHandle>,
        options: &CStr,
    ) -> Option<RawHandle> {
        let context = context.map_or(std::ptr::null_mut(), RawHandle::as_ptr);
        RawHandle::from_ptr(unsafe {
            (self.symbols.webview_create)(window.as_ptr(), context, options.as_ptr())
        })
    }

    fn webview_destroy(&self, webview: RawHandle) {
        unsafe { (self.symbols.webview_destroy)(webview.as_ptr()) }
    }

    fn webview_get_url(&self, webview: RawHandle) -> Vec<u8> {
        self.owned_text(unsafe { (self.symbols.webview_get_url)(webview.as_ptr()) })
    }

    fn webview_is_devtools_open(&self, webview: RawHandle) -> bool {
        unsafe { (self.symbols.webview_is_devtools_open)(webview.as_ptr()) }
    }

    fn webview_set_url(&self, webview: RawHandle, url: &CStr) {
        unsafe { (self.symbols.webview_set_url)(webview.as_ptr(), url.as_ptr()) }
    }

    fn webview_set_html(&self, webview: RawHandle, html: &CStr) {
        unsafe { (self.symbols.webview_set_html)(webview.as_ptr(), html.as_ptr()) }
    }

    fn webview_reload(&self, webview: RawHandle) {
        unsafe { (self.symbols.webview_reload)(webview.as_ptr()) }
    }

    fn webview_zoom(&self, webview: RawHandle, scale_factor: f64) {
        unsafe { (self.symbols.webview_zoom)(webview.as_ptr(), scale_factor) }
    }

    fn webview_open_devtools(&self, webview: RawHandle) {
        unsafe { (self.symbols.webview_open_devtools)(webview.as_ptr()) }
    }

    fn webview_close_devtools(&self, webview: RawHandle) {
        unsafe { (self.symbols.webview_close_devtools)(webview.as_ptr()) }
    }

    fn webview_clear_all_browsing_data(&self, webview: RawHandle) {
        unsafe { (self.symbols.webview_clear_all_browsing_data)(webview.as_ptr()) }
    }

    fn tray_create(&self, id: ResourceId, options: &CStr) -> Option<RawHandle> {
        RawHandle::from_ptr(unsafe { (self.symbols.tray_create)(id.get(), options.as_ptr()) })
    }

    fn tray_destroy(&self, tray: RawHandle) {
        unsafe { (self.symbols.tray_destroy)(tray.as_ptr()) }
    }
}
