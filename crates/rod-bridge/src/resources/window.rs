use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use rod_common::{
    BridgeError, Position, ProgressBar, ProgressState, ResourceId, ResourceKind, Result, Size,
};
use tracing::{debug, warn};

use super::{Lifecycle, Resource, WebContext};
use crate::abi::{HandleSlot, NativeAbi, RawHandle, WindowField, WindowFlag, WindowQuery, WindowToggle};
use crate::events::BridgeEvent;
use crate::listeners::{ListenerId, ListenerIds, Listeners};
use crate::options::{self, WindowOptions};
use crate::registry::Registry;
use crate::strings;

/// A native window.
///
/// Cloning yields another reference to the same window. Getters and setters
/// call straight through to the engine and fail with
/// [`BridgeError::Destroyed`] once the window has been destroyed.
#[derive(Clone)]
pub struct Window {
    pub(super) core: Rc<WindowCore>,
}

pub(super) struct WindowCore {
    id: ResourceId,
    kind: ResourceKind,
    pub(super) abi: Rc<dyn NativeAbi>,
    window: Cell<HandleSlot>,
    pub(super) surface: Cell<HandleSlot>,
    pub(super) context: RefCell<Option<WebContext>>,
    lifecycle: Cell<Lifecycle>,
    last_size: Cell<Option<Size>>,
    last_position: Cell<Option<Position>>,
    last_focus: Cell<Option<bool>>,
    listener_ids: ListenerIds,
    close_requested: Listeners<()>,
    focused: Listeners<bool>,
    moved: Listeners<Position>,
    resized: Listeners<Size>,
    destroyed: Listeners<()>,
    registry: RefCell<Weak<RefCell<Registry>>>,
}

impl WindowCore {
    pub(super) fn window_handle(&self) -> Option<RawHandle> {
        self.window.get().live()
    }

    /// Free the surface, then the window, then let go of the web context.
    pub(super) fn release_handles(&self) {
        if let HandleSlot::Live(surface) = self.surface.replace(HandleSlot::Empty) {
            self.abi.webview_destroy(surface);
        }
        if let HandleSlot::Live(window) = self.window.replace(HandleSlot::Empty) {
            self.abi.window_destroy(window);
        }
        if let Some(context) = self.context.borrow_mut().take() {
            context.detach();
        }
    }

    fn clear_listeners(&self) {
        self.close_requested.clear();
        self.focused.clear();
        self.moved.clear();
        self.resized.clear();
        self.destroyed.clear();
    }

    fn unregister(&self) {
        let Some(registry) = self.registry.borrow().upgrade() else {
            return;
        };
        let Ok(mut entries) = registry.try_borrow_mut() else {
            warn!(id = %self.id, "registry busy; window left registered");
            return;
        };
        entries.remove_window(self.id);
    }
}

impl Drop for WindowCore {
    fn drop(&mut self) {
        self.release_handles();
    }
}

impl Window {
    /// Create the native window. `kind` is what errors and logs call it.
    pub(crate) fn open(
        abi: Rc<dyn NativeAbi>,
        event_loop: RawHandle,
        id: ResourceId,
        kind: ResourceKind,
        options: &WindowOptions,
    ) -> Result<Self> {
        let wire = strings::encode(&options::encode_window_options(options)?)?;
        let Some(handle) = abi.window_create(event_loop, id, &wire) else {
            warn!(id = %id, "native engine failed to create a window");
            return Err(BridgeError::ResourceCreation {
                kind: ResourceKind::Window,
            });
        };
        debug!(id = %id, %kind, handle = handle.as_raw(), "window created");

        Ok(Self {
            core: Rc::new(WindowCore {
                id,
                kind,
                abi,
                window: Cell::new(HandleSlot::Live(handle)),
                surface: Cell::new(HandleSlot::Empty),
                context: RefCell::new(None),
                lifecycle: Cell::new(Lifecycle::Created),
                last_size: Cell::new(None),
                last_position: Cell::new(None),
                last_focus: Cell::new(None),
                listener_ids: ListenerIds::default(),
                close_requested: Listeners::default(),
                focused: Listeners::default(),
                moved: Listeners::default(),
                resized: Listeners::default(),
                destroyed: Listeners::default(),
                registry: RefCell::new(Weak::new()),
            }),
        })
    }

    /// Link to the facade's registry and start accepting events.
    pub(crate) fn activate(&self, registry: Weak<RefCell<Registry>>) {
        *self.core.registry.borrow_mut() = registry;
        self.core.lifecycle.set(Lifecycle::Active);
    }

    pub(crate) fn handle_event(&self, event: &BridgeEvent) {
        let core = &self.core;
        if core.lifecycle.get() != Lifecycle::Active {
            return;
        }
        match *event {
            BridgeEvent::WindowCloseRequested { .. } => core.close_requested.emit(&()),
            BridgeEvent::WindowFocused { focused, .. } => {
                core.last_focus.set(Some(focused));
                core.focused.emit(&focused);
            }
            BridgeEvent::WindowMoved { position, .. } => {
                core.last_position.set(Some(position));
                core.moved.emit(&position);
            }
            BridgeEvent::WindowResized { size, .. } => {
                core.last_size.set(Some(size));
                core.resized.emit(&size);
            }
            BridgeEvent::TrayClicked { .. } => {}
        }
    }

    pub(super) fn destroyed_error(&self) -> BridgeError {
        BridgeError::Destroyed {
            kind: self.core.kind,
            id: self.core.id,
        }
    }

    fn handle(&self) -> Result<RawHandle> {
        self.core
            .window_handle()
            .ok_or_else(|| self.destroyed_error())
    }

    fn flag(&self, flag: WindowFlag) -> Result<bool> {
        let handle = self.handle()?;
        Ok(self.core.abi.window_get_flag(handle, flag))
    }

    fn text(&self, query: WindowQuery) -> Result<Vec<u8>> {
        let handle = self.handle()?;
        Ok(self.core.abi.window_get_text(handle, query))
    }

    fn set_flag(&self, toggle: WindowToggle, value: bool) -> Result<()> {
        let handle = self.handle()?;
        self.core.abi.window_set_flag(handle, toggle, value);
        Ok(())
    }

    fn set_text(&self, field: WindowField, value: &str) -> Result<()> {
        let handle = self.handle()?;
        let value = strings::encode(value)?;
        self.core.abi.window_set_text(handle, field, &value);
        Ok(())
    }

    // Getters

    pub fn title(&self) -> Result<String> {
        strings::decode(&self.text(WindowQuery::Title)?)
    }

    pub fn size(&self) -> Result<Size> {
        strings::decode_json(&self.text(WindowQuery::Size)?)
    }

    pub fn position(&self) -> Result<Position> {
        strings::decode_json(&self.text(WindowQuery::Position)?)
    }

    pub fn is_always_on_top(&self) -> Result<bool> {
        self.flag(WindowFlag::AlwaysOnTop)
    }

    pub fn is_closable(&self) -> Result<bool> {
        self.flag(WindowFlag::Closable)
    }

    pub fn is_decorated(&self) -> Result<bool> {
        self.flag(WindowFlag::Decorated)
    }

    pub fn is_focused(&self) -> Result<bool> {
        self.flag(WindowFlag::Focused)
    }

    pub fn is_maximizable(&self) -> Result<bool> {
        self.flag(WindowFlag::Maximizable)
    }

    pub fn is_maximized(&self) -> Result<bool> {
        self.flag(WindowFlag::Maximized)
    }

    pub fn is_minimizable(&self) -> Result<bool> {
        self.flag(WindowFlag::Minimizable)
    }

    pub fn is_minimized(&self) -> Result<bool> {
        self.flag(WindowFlag::Minimized)
    }

    pub fn is_resizable(&self) -> Result<bool> {
        self.flag(WindowFlag::Resizable)
    }

    pub fn is_visible(&self) -> Result<bool> {
        self.flag(WindowFlag::Visible)
    }

    /// Size from the most recent resize event, if any arrived.
    pub fn last_known_size(&self) -> Option<Size> {
        self.core.last_size.get()
    }

    pub fn last_known_position(&self) -> Option<Position> {
        self.core.last_position.get()
    }

    pub fn last_known_focus(&self) -> Option<bool> {
        self.core.last_focus.get()
    }

    // Setters

    pub fn set_always_on_bottom(&self, value: bool) -> Result<()> {
        self.set_flag(WindowToggle::AlwaysOnBottom, value)
    }

    pub fn set_always_on_top(&self, value: bool) -> Result<()> {
        self.set_flag(WindowToggle::AlwaysOnTop, value)
    }

    pub fn set_closable(&self, value: bool) -> Result<()> {
        self.set_flag(WindowToggle::Closable, value)
    }

    pub fn set_content_protection(&self, value: bool) -> Result<()> {
        self.set_flag(WindowToggle::ContentProtection, value)
    }

    pub fn set_decorations(&self, value: bool) -> Result<()> {
        self.set_flag(WindowToggle::Decorations, value)
    }

    pub fn set_focusable(&self, value: bool) -> Result<()> {
        self.set_flag(WindowToggle::Focusable, value)
    }

    pub fn set_fullscreen(&self, value: bool) -> Result<()> {
        self.set_flag(WindowToggle::Fullscreen, value)
    }

    pub fn set_ignore_cursor_events(&self, value: bool) -> Result<()> {
        self.set_flag(WindowToggle::IgnoreCursorEvents, value)
    }

    pub fn set_maximizable(&self, value: bool) -> Result<()> {
        self.set_flag(WindowToggle::Maximizable, value)
    }

    pub fn set_maximized(&self, value: bool) -> Result<()> {
        self.set_flag(WindowToggle::Maximized, value)
    }

    pub fn set_minimizable(&self, value: bool) -> Result<()> {
        self.set_flag(WindowToggle::Minimizable, value)
    }

    pub fn set_minimized(&self, value: bool) -> Result<()> {
        self.set_flag(WindowToggle::Minimized, value)
    }

    pub fn set_resizable(&self, value: bool) -> Result<()> {
        self.set_flag(WindowToggle::Resizable, value)
    }

    pub fn set_visible(&self, value: bool) -> Result<()> {
        self.set_flag(WindowToggle::Visible, value)
    }

    pub fn set_visible_on_all_workspaces(&self, value: bool) -> Result<()> {
        self.set_flag(WindowToggle::VisibleOnAllWorkspaces, value)
    }

    pub fn set_title(&self, title: &str) -> Result<()> {
        self.set_text(WindowField::Title, title)
    }

    pub fn set_size(&self, size: Size) -> Result<()> {
        self.set_text(WindowField::Size, &options::encode_size(size)?)
    }

    /// `None` removes the bound.
    pub fn set_minimum_size(&self, size: Option<Size>) -> Result<()> {
        self.set_text(WindowField::MinimumSize, &options::encode_size_bound(size)?)
    }

    /// `None` removes the bound.
    pub fn set_maximum_size(&self, size: Option<Size>) -> Result<()> {
        self.set_text(WindowField::MaximumSize, &options::encode_size_bound(size)?)
    }

    pub fn set_position(&self, position: Position) -> Result<()> {
        self.set_text(WindowField::Position, &options::encode_position(position)?)
    }

    pub fn set_progress_bar(&self, state: ProgressState, progress: f64) -> Result<()> {
        let payload = options::encode_progress_bar(ProgressBar { state, progress })?;
        self.set_text(WindowField::ProgressBar, &payload)
    }

    pub fn focus(&self) -> Result<()> {
        let handle = self.handle()?;
        self.core.abi.window_focus(handle);
        Ok(())
    }

    pub fn start_drag(&self) -> Result<()> {
        let handle = self.handle()?;
        self.core.abi.window_start_drag(handle);
        Ok(())
    }

    // Listeners

    pub fn on_close_requested(&self, callback: impl Fn() + 'static) -> ListenerId {
        let id = self.core.listener_ids.next();
        self.core.close_requested.add(id, move |_: &()| callback());
        id
    }

    pub fn on_focused(&self, callback: impl Fn(bool) + 'static) -> ListenerId {
        let id = self.core.listener_ids.next();
        self.core.focused.add(id, move |focused: &bool| callback(*focused));
        id
    }

    pub fn on_moved(&self, callback: impl Fn(Position) + 'static) -> ListenerId {
        let id = self.core.listener_ids.next();
        self.core.moved.add(id, move |position: &Position| callback(*position));
        id
    }

    pub fn on_resized(&self, callback: impl Fn(Size) + 'static) -> ListenerId {
        let id = self.core.listener_ids.next();
        self.core.resized.add(id, move |size: &Size| callback(*size));
        id
    }

    /// Runs at the start of [`destroy`](Resource::destroy), while the
    /// native handles are still live.
    pub fn on_destroyed(&self, callback: impl Fn() + 'static) -> ListenerId {
        let id = self.core.listener_ids.next();
        self.core.destroyed.add(id, move |_: &()| callback());
        id
    }

    /// Remove a listener added by any `on_*` method.
    pub fn off(&self, id: ListenerId) -> bool {
        let core = &self.core;
        core.close_requested.remove(id)
            || core.focused.remove(id)
            || core.moved.remove(id)
            || core.resized.remove(id)
            || core.destroyed.remove(id)
    }

    pub fn id(&self) -> ResourceId {
        self.core.id
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.core.lifecycle.get()
    }

    pub fn is_destroyed(&self) -> bool {
        self.lifecycle() == Lifecycle::Destroyed
    }

    /// Free the native window (and webview surface, if any). Idempotent.
    pub fn destroy(&self) {
        let core = &self.core;
        if matches!(
            core.lifecycle.get(),
            Lifecycle::Destroying | Lifecycle::Destroyed
        ) {
            return;
        }
        core.lifecycle.set(Lifecycle::Destroying);
        core.destroyed.emit(&());

        core.release_handles();
        core.lifecycle.set(Lifecycle::Destroyed);
        core.clear_listeners();
        core.unregister();
        debug!(id = %core.id, kind = %core.kind, "window destroyed");
    }
}

impl Resource for Window {
    fn id(&self) -> ResourceId {
        self.core.id
    }

    fn kind(&self) -> ResourceKind {
        self.core.kind
    }

    fn lifecycle(&self) -> Lifecycle {
        self.core.lifecycle.get()
    }

    fn destroy(&self) {
        Window::destroy(self)
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.core.id)
            .field("kind", &self.core.kind)
            .field("lifecycle", &self.core.lifecycle.get())
            .finish()
    }
}
