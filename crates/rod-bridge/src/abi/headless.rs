//! In-process engine with no OS resources.
//!
//! Keeps window/webview/tray state in memory, lets callers inject native
//! events, records every call in order, and flags any call that uses a
//! handle after it was destroyed. Used as the engine for tests and for the
//! playground binary.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::ffi::CStr;

use rod_common::{Position, ResourceId, ResourceKind, Size};
use serde_json::{json, Value};
use tracing::trace;

use super::{EventSink, NativeAbi, RawHandle, WindowField, WindowFlag, WindowQuery, WindowToggle};

const DEFAULT_SIZE: Size = Size {
    width: 800,
    height: 600,
};

/// One recorded engine call.
#[derive(Debug, Clone, PartialEq)]
pub enum AbiCall {
    EventLoopCreate,
    EventLoopDestroy(RawHandle),
    EventLoopPoll(RawHandle),
    WindowCreate { id: ResourceId, options: String },
    WindowDestroy(RawHandle),
    WindowGet { window: RawHandle, name: &'static str },
    WindowSet { window: RawHandle, name: &'static str, value: String },
    WebContextCreate { path: String },
    WebContextDestroy(RawHandle),
    WebViewCreate {
        window: RawHandle,
        context: Option<RawHandle>,
        options: String,
    },
    WebViewDestroy(RawHandle),
    WebViewCall { webview: RawHandle, name: &'static str, value: String },
    TrayCreate { id: ResourceId, options: String },
    TrayDestroy(RawHandle),
}

/// Observable state of one headless window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSnapshot {
    pub id: ResourceId,
    pub title: String,
    pub size: Size,
    pub position: Position,
    pub minimum_size: Option<Size>,
    pub maximum_size: Option<Size>,
    pub progress_bar: Option<String>,
    pub flags: HashMap<&'static str, bool>,
}

/// Observable state of one headless webview.
#[derive(Debug, Clone, PartialEq)]
pub struct WebViewSnapshot {
    pub window: RawHandle,
    pub context: Option<RawHandle>,
    pub url: String,
    pub html: Option<String>,
    pub devtools_open: bool,
    pub zoom: f64,
    pub reloads: u32,
    pub cleared_browsing_data: bool,
}

#[derive(Debug, Clone)]
struct TraySnapshot {
    id: ResourceId,
}

#[derive(Default)]
struct State {
    next_handle: usize,
    event_loops: HashSet<RawHandle>,
    windows: HashMap<RawHandle, WindowSnapshot>,
    webviews: HashMap<RawHandle, WebViewSnapshot>,
    contexts: HashMap<RawHandle, String>,
    trays: HashMap<RawHandle, TraySnapshot>,
    released: HashSet<RawHandle>,
    pending: VecDeque<(Vec<u8>, Vec<u8>)>,
    calls: Vec<AbiCall>,
    violations: Vec<String>,
    failures: HashSet<ResourceKind>,
}

impl State {
    fn allocate(&mut self) -> RawHandle {
        self.next_handle += 1;
        // Spread handles out so they never look like small ids.
        RawHandle::from_raw(self.next_handle * 0x10)
            .unwrap_or_else(|| unreachable!("handle counter starts above zero"))
    }

    fn take_failure(&mut self, kind: ResourceKind) -> bool {
        self.failures.remove(&kind)
    }

    fn check(&mut self, live: bool, handle: RawHandle, call: &str) -> bool {
        if live {
            return true;
        }
        let violation = if self.released.contains(&handle) {
            format!("{call} on released handle {:#x}", handle.as_raw())
        } else {
            format!("{call} on unknown handle {:#x}", handle.as_raw())
        };
        self.violations.push(violation);
        false
    }

    fn window_mut(&mut self, handle: RawHandle, call: &str) -> Option<&mut WindowSnapshot> {
        let live = self.windows.contains_key(&handle);
        if !self.check(live, handle, call) {
            return None;
        }
        self.windows.get_mut(&handle)
    }

    fn webview_mut(&mut self, handle: RawHandle, call: &str) -> Option<&mut WebViewSnapshot> {
        let live = self.webviews.contains_key(&handle);
        if !self.check(live, handle, call) {
            return None;
        }
        self.webviews.get_mut(&handle)
    }

    fn window_by_id(&mut self, id: ResourceId) -> Option<&mut WindowSnapshot> {
        self.windows.values_mut().find(|w| w.id == id)
    }

    fn queue(&mut self, kind: &str, payload: Value) {
        self.pending
            .push_back((kind.as_bytes().to_vec(), payload.to_string().into_bytes()));
    }
}

/// Headless engine. See the module docs.
#[derive(Default)]
pub struct HeadlessEngine {
    state: RefCell<State>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next create call for `kind` return an empty handle.
    pub fn fail_next_create(&self, kind: ResourceKind) {
        self.state.borrow_mut().failures.insert(kind);
    }

    /// Queue a raw frame exactly as given, for malformed-input tests.
    pub fn push_raw_event(&self, kind: &[u8], payload: &[u8]) {
        self.state
            .borrow_mut()
            .pending
            .push_back((kind.to_vec(), payload.to_vec()));
    }

    pub fn emit_close_requested(&self, id: ResourceId) {
        self.state
            .borrow_mut()
            .queue("window_close_requested", json!({ "id": id }));
    }

    pub fn emit_focused(&self, id: ResourceId, focused: bool) {
        let mut state = self.state.borrow_mut();
        if let Some(window) = state.window_by_id(id) {
            window.flags.insert(WindowFlag::Focused.as_str(), focused);
        }
        state.queue("window_focused", json!({ "id": id, "focused": focused }));
    }

    pub fn emit_moved(&self, id: ResourceId, position: Position) {
        let mut state = self.state.borrow_mut();
        if let Some(window) = state.window_by_id(id) {
            window.position = position;
        }
        state.queue(
            "window_moved",
            json!({ "id": id, "x": position.x, "y": position.y }),
        );
    }

    pub fn emit_resized(&self, id: ResourceId, size: Size) {
        let mut state = self.state.borrow_mut();
        if let Some(window) = state.window_by_id(id) {
            window.size = size;
        }
        state.queue(
            "window_resized",
            json!({ "id": id, "width": size.width, "height": size.height }),
        );
    }

    pub fn emit_tray_clicked(&self, id: ResourceId) {
        self.state
            .borrow_mut()
            .queue("tray_clicked", json!({ "id": id }));
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<AbiCall> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Calls that used a released or unknown handle.
    pub fn violations(&self) -> Vec<String> {
        self.state.borrow().violations.clone()
    }

    pub fn pending_events(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Number of native resources currently alive, of every kind.
    pub fn live_handles(&self) -> usize {
        let state = self.state.borrow();
        state.event_loops.len()
            + state.windows.len()
            + state.webviews.len()
            + state.contexts.len()
            + state.trays.len()
    }

    pub fn window(&self, id: ResourceId) -> Option<WindowSnapshot> {
        self.state
            .borrow()
            .windows
            .values()
            .find(|w| w.id == id)
            .cloned()
    }

    pub fn webview_for(&self, id: ResourceId) -> Option<WebViewSnapshot> {
        let state = self.state.borrow();
        let (handle, _) = state.windows.iter().find(|(_, w)| w.id == id)?;
        state
            .webviews
            .values()
            .find(|wv| wv.window == *handle)
            .cloned()
    }

    pub fn has_tray(&self, id: ResourceId) -> bool {
        self.state.borrow().trays.values().any(|t| t.id == id)
    }

    fn record(&self, call: AbiCall) {
        trace!(?call, "headless call");
        self.state.borrow_mut().calls.push(call);
    }
}

fn text(value: &CStr) -> String {
    value.to_string_lossy().into_owned()
}

fn parse_options(options: &CStr) -> Value {
    serde_json::from_slice(options.to_bytes()).unwrap_or(Value::Null)
}

fn parse_size(value: &Value) -> Option<Size> {
    serde_json::from_value(value.clone()).ok()
}

impl NativeAbi for HeadlessEngine {
    fn event_loop_create(&self) -> Option<RawHandle> {
        self.record(AbiCall::EventLoopCreate);
        let mut state = self.state.borrow_mut();
        if state.take_failure(ResourceKind::EventLoop) {
            return None;
        }
        let handle = state.allocate();
        state.event_loops.insert(handle);
        Some(handle)
    }

    fn event_loop_destroy(&self, event_loop: RawHandle) {
        self.record(AbiCall::EventLoopDestroy(event_loop));
        let mut state = self.state.borrow_mut();
        let live = state.event_loops.remove(&event_loop);
        if state.check(live, event_loop, "event_loop_destroy") {
            state.released.insert(event_loop);
        }
    }

    fn event_loop_poll(&self, event_loop: RawHandle, sink: EventSink<'_>) {
        self.record(AbiCall::EventLoopPoll(event_loop));
        let frames: Vec<_> = {
            let mut state = self.state.borrow_mut();
            let live = state.event_loops.contains(&event_loop);
            if !state.check(live, event_loop, "event_loop_poll") {
                return;
            }
            state.pending.drain(..).collect()
        };
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
        self.record(AbiCall::WindowCreate {
            id,
            options: text(options),
        });
        let mut state = self.state.borrow_mut();
        let live = state.event_loops.contains(&event_loop);
        if !state.check(live, event_loop, "window_create") || state.take_failure(ResourceKind::Window)
        {
            return None;
        }

        let options = parse_options(options);
        let mut flags = HashMap::new();
        for toggle in [
            WindowToggle::AlwaysOnBottom,
            WindowToggle::AlwaysOnTop,
            WindowToggle::Closable,
            WindowToggle::ContentProtection,
            WindowToggle::Decorations,
            WindowToggle::Focusable,
            WindowToggle::Maximizable,
            WindowToggle::Maximized,
            WindowToggle::Minimizable,
            WindowToggle::Resizable,
            WindowToggle::Visible,
            WindowToggle::VisibleOnAllWorkspaces,
        ] {
            if let Some(value) = options[toggle.as_str()].as_bool() {
                flags.insert(toggle.as_str(), value);
            }
        }
        if let Some(focused) = options["focused"].as_bool() {
            flags.insert(WindowFlag::Focused.as_str(), focused);
        }

        let window = WindowSnapshot {
            id,
            title: options["title"].as_str().unwrap_or_default().to_string(),
            size: parse_size(&options["size"]).unwrap_or(DEFAULT_SIZE),
            position: serde_json::from_value(options["position"].clone())
                .unwrap_or(Position::new(0, 0)),
            minimum_size: parse_size(&options["minimum_size"]),
            maximum_size: parse_size(&options["maximum_size"]),
            progress_bar: None,
            flags,
        };
        let handle = state.allocate();
        state.windows.insert(handle, window);
        Some(handle)
    }

    fn window_destroy(&self, window: RawHandle) {
        self.record(AbiCall::WindowDestroy(window));
        let mut state = self.state.borrow_mut();
        if state.webviews.values().any(|wv| wv.window == window) {
            state.violations.push(format!(
                "window_destroy on {:#x} while its webview is still alive",
                window.as_raw()
            ));
        }
        let live = state.windows.remove(&window).is_some();
        if state.check(live, window, "window_destroy") {
            state.released.insert(window);
        }
    }

    fn window_get_flag(&self, window: RawHandle, flag: WindowFlag) -> bool {
        self.record(AbiCall::WindowGet {
            window,
            name: flag.as_str(),
        });
        let mut state = self.state.borrow_mut();
        let Some(snapshot) = state.window_mut(window, "window_get_flag") else {
            return false;
        };
        let key = match flag {
            WindowFlag::Decorated => WindowToggle::Decorations.as_str(),
            other => other.as_str(),
        };
        // Engine defaults: decorated, closable, resizable and visible windows.
        let default = matches!(
            flag,
            WindowFlag::Decorated
                | WindowFlag::Closable
                | WindowFlag::Resizable
                | WindowFlag::Visible
                | WindowFlag::Maximizable
                | WindowFlag::Minimizable
        );
        snapshot.flags.get(key).copied().unwrap_or(default)
    }

    fn window_get_text(&self, window: RawHandle, query: WindowQuery) -> Vec<u8> {
        self.record(AbiCall::WindowGet {
            window,
            name: query.as_str(),
        });
        let mut state = self.state.borrow_mut();
        let Some(snapshot) = state.window_mut(window, "window_get_text") else {
            return Vec::new();
        };
        let value = match query {
            WindowQuery::Title => snapshot.title.clone(),
            // Struct order, not `json!`'s sorted keys, to match the engine.
            WindowQuery::Size => serde_json::to_string(&snapshot.size).unwrap_or_default(),
            WindowQuery::Position => {
                serde_json::to_string(&snapshot.position).unwrap_or_default()
            }
        };
        value.into_bytes()
    }

    fn window_set_flag(&self, window: RawHandle, toggle: WindowToggle, value: bool) {
        self.record(AbiCall::WindowSet {
            window,
            name: toggle.as_str(),
            value: value.to_string(),
        });
        let mut state = self.state.borrow_mut();
        if let Some(snapshot) = state.window_mut(window, "window_set_flag") {
            snapshot.flags.insert(toggle.as_str(), value);
        }
    }

    fn window_set_text(&self, window: RawHandle, field: WindowField, value: &CStr) {
        let value = text(value);
        self.record(AbiCall::WindowSet {
            window,
            name: field.as_str(),
            value: value.clone(),
        });
        let mut state = self.state.borrow_mut();
        let Some(snapshot) = state.window_mut(window, "window_set_text") else {
            return;
        };
        let parsed: Value = serde_json::from_str(&value).unwrap_or(Value::Null);
        match field {
            WindowField::Title => snapshot.title = value,
            WindowField::Size => {
                if let Some(size) = parse_size(&parsed) {
                    snapshot.size = size;
                }
            }
            WindowField::MinimumSize => snapshot.minimum_size = parse_size(&parsed),
            WindowField::MaximumSize => snapshot.maximum_size = parse_size(&parsed),
            WindowField::Position => {
                if let Ok(position) = serde_json::from_value(parsed) {
                    snapshot.position = position;
                }
            }
            WindowField::ProgressBar => snapshot.progress_bar = Some(value),
        }
    }

    fn window_focus(&self, window: RawHandle) {
        self.record(AbiCall::WindowSet {
            window,
            name: "focus",
            value: String::new(),
        });
        let mut state = self.state.borrow_mut();
        if let Some(snapshot) = state.window_mut(window, "window_focus") {
            snapshot.flags.insert(WindowFlag::Focused.as_str(), true);
        }
    }

    fn window_start_drag(&self, window: RawHandle) {
        self.record(AbiCall::WindowSet {
            window,
            name: "start_drag",
            value: String::new(),
        });
        self.state.borrow_mut().window_mut(window, "window_start_drag");
    }

    fn webcontext_create(&self, path: &CStr) -> Option<RawHandle> {
        let path = text(path);
        self.record(AbiCall::WebContextCreate { path: path.clone() });
        let mut state = self.state.borrow_mut();
        if state.take_failure(ResourceKind::WebContext) {
            return None;
        }
        let handle = state.allocate();
        state.contexts.insert(handle, path);
        Some(handle)
    }

    fn webcontext_destroy(&self, context: RawHandle) {
        self.record(AbiCall::WebContextDestroy(context));
        let mut state = self.state.borrow_mut();
        if state.webviews.values().any(|wv| wv.context == Some(context)) {
            state.violations.push(format!(
                "webcontext_destroy on {:#x} while a webview still uses it",
                context.as_raw()
            ));
        }
        let live = state.contexts.remove(&context).is_some();
        if state.check(live, context, "webcontext_destroy") {
            state.released.insert(context);
        }
    }

    fn webview_create(
        &self,
        window: RawHandle,
        context: Option<RawHandle>,
        options: &CStr,
    ) -> Option<RawHandle> {
        self.record(AbiCall::WebViewCreate {
            window,
            context,
            options: text(options),
        });
        let mut state = self.state.borrow_mut();
        state.window_mut(window, "webview_create")?;
        if let Some(context) = context {
            let live = state.contexts.contains_key(&context);
            if !state.check(live, context, "webview_create") {
                return None;
            }
        }
        if state.take_failure(ResourceKind::WebView) {
            return None;
        }

        let options = parse_options(options);
        let url = options["url"].as_str().unwrap_or("about:blank").to_string();
        let webview = WebViewSnapshot {
            window,
            context,
            url,
            html: options["html"].as_str().map(str::to_string),
            devtools_open: false,
            zoom: 1.0,
            reloads: 0,
            cleared_browsing_data: false,
        };
        let handle = state.allocate();
        state.webviews.insert(handle, webview);
        Some(handle)
    }

    fn webview_destroy(&self, webview: RawHandle) {
        self.record(AbiCall::WebViewDestroy(webview));
        let mut state = self.state.borrow_mut();
        let live = state.webviews.remove(&webview).is_some();
        if state.check(live, webview, "webview_destroy") {
            state.released.insert(webview);
        }
    }

    fn webview_get_url(&self, webview: RawHandle) -> Vec<u8> {
        self.record(AbiCall::WebViewCall {
            webview,
            name: "get_url",
            value: String::new(),
        });
        let mut state = self.state.borrow_mut();
        state
            .webview_mut(webview, "webview_get_url")
            .map(|wv| wv.url.clone().into_bytes())
            .unwrap_or_default()
    }

    fn webview_is_devtools_open(&self, webview: RawHandle) -> bool {
        self.record(AbiCall::WebViewCall {
            webview,
            name: "is_devtools_open",
            value: String::new(),
        });
        let mut state = self.state.borrow_mut();
        state
            .webview_mut(webview, "webview_is_devtools_open")
            .is_some_and(|wv| wv.devtools_open)
    }

    fn webview_set_url(&self, webview: RawHandle, url: &CStr) {
        let url = text(url);
        self.record(AbiCall::WebViewCall {
            webview,
            name: "set_url",
            value: url.clone(),
        });
        let mut state = self.state.borrow_mut();
        if let Some(wv) = state.webview_mut(webview, "webview_set_url") {
            wv.url = url;
            wv.html = None;
        }
    }

    fn webview_set_html(&self, webview: RawHandle, html: &CStr) {
        let html = text(html);
        self.record(AbiCall::WebViewCall {
            webview,
            name: "set_html",
            value: html.clone(),
        });
        let mut state = self.state.borrow_mut();
        if let Some(wv) = state.webview_mut(webview, "webview_set_html") {
            wv.url = "about:blank".into();
            wv.html = Some(html);
        }
    }

    fn webview_reload(&self, webview: RawHandle) {
        self.record(AbiCall::WebViewCall {
            webview,
            name: "reload",
            value: String::new(),
        });
        let mut state = self.state.borrow_mut();
        if let Some(wv) = state.webview_mut(webview, "webview_reload") {
            wv.reloads += 1;
        }
    }

    fn webview_zoom(&self, webview: RawHandle, scale_factor: f64) {
        self.record(AbiCall::WebViewCall {
            webview,
            name: "zoom",
            value: scale_factor.to_string(),
        });
        let mut state = self.state.borrow_mut();
        if let Some(wv) = state.webview_mut(webview, "webview_zoom") {
            wv.zoom = scale_factor;
        }
    }

    fn webview_open_devtools(&self, webview: RawHandle) {
        self.record(AbiCall::WebViewCall {
            webview,
            name: "open_devtools",
            value: String::new(),
        });
        let mut state = self.state.borrow_mut();
        if let Some(wv) = state.webview_mut(webview, "webview_open_devtools") {
            wv.devtools_open = true;
        }
    }

    fn webview_close_devtools(&self, webview: RawHandle) {
        self.record(AbiCall::WebViewCall {
            webview,
            name: "close_devtools",
            value: String::new(),
        });
        let mut state = self.state.borrow_mut();
        if let Some(wv) = state.webview_mut(webview, "webview_close_devtools") {
            wv.devtools_open = false;
        }
    }

    fn webview_clear_all_browsing_data(&self, webview: RawHandle) {
        self.record(AbiCall::WebViewCall {
            webview,
            name: "clear_all_browsing_data",
            value: String::new(),
        });
        let mut state = self.state.borrow_mut();
        if let Some(wv) = state.webview_mut(webview, "webview_clear_all_browsing_data") {
            wv.cleared_browsing_data = true;
        }
    }

    fn tray_create(&self, id: ResourceId, options: &CStr) -> Option<RawHandle> {
        self.record(AbiCall::TrayCreate {
            id,
            options: text(options),
        });
        let mut state = self.state.borrow_mut();
        if state.take_failure(ResourceKind::Tray) {
            return None;
        }
        let handle = state.allocate();
        state.trays.insert(handle, TraySnapshot { id });
        Some(handle)
    }

    fn tray_destroy(&self, tray: RawHandle) {
        self.record(AbiCall::TrayDestroy(tray));
        let mut state = self.state.borrow_mut();
        let live = state.trays.remove(&tray).is_some();
        if state.check(live, tray, "tray_destroy") {
            state.released.insert(tray);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_window(id: u16, options: &CStr) -> (HeadlessEngine, RawHandle) {
        let engine = HeadlessEngine::new();
        let event_loop = engine.event_loop_create().unwrap();
        let window = engine
            .window_create(event_loop, ResourceId(id), options)
            .unwrap();
        (engine, window)
    }

    #[test]
    fn window_options_seed_state() {
        let (engine, _) = engine_with_window(
            1,
            c"{\"title\":\"T\",\"size\":{\"width\":400,\"height\":300},\"always_on_top\":true}",
        );
        let window = engine.window(ResourceId(1)).unwrap();
        assert_eq!(window.title, "T");
        assert_eq!(window.size, Size::new(400, 300));
        assert_eq!(window.flags.get("always_on_top"), Some(&true));
    }

    #[test]
    fn poll_drains_queue_in_order() {
        let engine = HeadlessEngine::new();
        let event_loop = engine.event_loop_create().unwrap();
        engine.emit_tray_clicked(ResourceId(3));
        engine.emit_close_requested(ResourceId(1));

        let mut seen = Vec::new();
        engine.event_loop_poll(event_loop, &mut |kind, payload| {
            seen.push((
                String::from_utf8(kind.to_vec()).unwrap(),
                String::from_utf8(payload.to_vec()).unwrap(),
            ));
        });

        assert_eq!(
            seen,
            vec![
                ("tray_clicked".to_string(), r#"{"id":3}"#.to_string()),
                ("window_close_requested".to_string(), r#"{"id":1}"#.to_string()),
            ]
        );
        assert_eq!(engine.pending_events(), 0);
    }

    #[test]
    fn use_after_release_is_flagged() {
        let (engine, window) = engine_with_window(1, c"{}");
        engine.window_destroy(window);
        engine.window_set_flag(window, WindowToggle::Visible, false);
        engine.window_destroy(window);

        let violations = engine.violations();
        assert_eq!(violations.len(), 2);
        assert!(violations[0].contains("window_set_flag on released handle"));
        assert!(violations[1].contains("window_destroy on released handle"));
    }

    #[test]
    fn destroying_window_before_webview_is_flagged() {
        let (engine, window) = engine_with_window(1, c"{}");
        let webview = engine.webview_create(window, None, c"{}").unwrap();
        engine.window_destroy(window);
        engine.webview_destroy(webview);
        assert!(engine.violations()[0].contains("while its webview is still alive"));
    }

    #[test]
    fn injected_failure_applies_once() {
        let engine = HeadlessEngine::new();
        engine.fail_next_create(ResourceKind::Tray);
        assert!(engine.tray_create(ResourceId(1), c"{}").is_none());
        assert!(engine.tray_create(ResourceId(2), c"{}").is_some());
        assert!(engine.has_tray(ResourceId(2)));
    }

    #[test]
    fn resize_event_updates_engine_state() {
        let (engine, window) = engine_with_window(4, c"{}");
        engine.emit_resized(ResourceId(4), Size::new(500, 350));
        let raw = engine.window_get_text(window, WindowQuery::Size);
        assert_eq!(raw, br#"{"width":500,"height":350}"#);
    }

    #[test]
    fn geometry_text_keeps_field_order() {
        let (engine, window) = engine_with_window(2, c"{}");
        engine.emit_moved(ResourceId(2), Position::new(-1920, 40));
        let raw = engine.window_get_text(window, WindowQuery::Position);
        assert_eq!(raw, br#"{"x":-1920,"y":40}"#);
        let raw = engine.window_get_text(window, WindowQuery::Size);
        assert_eq!(raw, br#"{"width":800,"height":600}"#);
    }
}
