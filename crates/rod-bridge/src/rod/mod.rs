//! The public entry point.
//!
//! [`Rod`] owns the event loop, hands out resource ids, and keeps the
//! registry that routes native events to windows and trays. Every window,
//! webview and tray gets its id before any native call is made for it, and
//! ids are never reused for the lifetime of the facade.
//!
//! Web contexts are numbered from a separate counter. The engine never sees
//! their ids; they only label errors.

use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;

use rod_common::{BridgeError, IdAllocator, ResourceId, ResourceKind, Result};
use rod_config::EventLoopConfig;
use tracing::{debug, info};

use crate::abi::NativeAbi;
use crate::event_loop::EventLoop;
use crate::options::{TrayOptions, WebViewOptions, WindowOptions};
use crate::registry::{self, Registry};
use crate::resources::{Tray, WebContext, WebView, Window};

pub struct Rod {
    abi: Rc<dyn NativeAbi>,
    event_loop: EventLoop,
    registry: Rc<RefCell<Registry>>,
    ids: IdAllocator,
    context_ids: IdAllocator,
    contexts: RefCell<Vec<WebContext>>,
    destroyed: Cell<bool>,
}

impl Rod {
    pub fn new(abi: Rc<dyn NativeAbi>) -> Result<Self> {
        Self::with_config(abi, &EventLoopConfig::default())
    }

    /// Create the native event loop and hook the registry up to it.
    ///
    /// Fails with [`BridgeError::Initialization`] if the engine cannot
    /// create an event loop; nothing else can be done with it then.
    pub fn with_config(abi: Rc<dyn NativeAbi>, config: &EventLoopConfig) -> Result<Self> {
        let event_loop = EventLoop::create(Rc::clone(&abi), config)?;
        let registry = Rc::new(RefCell::new(Registry::default()));

        let routes = Rc::downgrade(&registry);
        event_loop.subscribe(move |event| {
            if let Some(registry) = routes.upgrade() {
                registry::dispatch(&registry, event);
            }
        });

        info!("rod bridge initialized");
        Ok(Self {
            abi,
            event_loop,
            registry,
            ids: IdAllocator::new(),
            context_ids: IdAllocator::new(),
            contexts: RefCell::new(Vec::new()),
            destroyed: Cell::new(false),
        })
    }

    fn next_id(&self, ids: &IdAllocator) -> Result<ResourceId> {
        if self.destroyed.get() {
            return Err(BridgeError::EventLoopNotRunning);
        }
        ids.allocate().ok_or(BridgeError::IdsExhausted)
    }

    fn register_window(&self, window: &Window) {
        self.registry.borrow_mut().insert_window(window.clone());
        window.activate(Rc::downgrade(&self.registry));
    }

    pub fn create_window(&self, options: &WindowOptions) -> Result<Window> {
        let event_loop = self.event_loop.raw_handle()?;
        let id = self.next_id(&self.ids)?;
        let window = Window::open(
            Rc::clone(&self.abi),
            event_loop,
            id,
            ResourceKind::Window,
            options,
        )?;
        self.register_window(&window);
        Ok(window)
    }

    pub fn create_webview(&self, options: &WebViewOptions) -> Result<WebView> {
        self.build_webview(options, None)
    }

    /// Like [`create_webview`](Self::create_webview), storing browsing data
    /// in `context`. The context stays alive until this webview is gone.
    pub fn create_webview_in_context(
        &self,
        options: &WebViewOptions,
        context: &WebContext,
    ) -> Result<WebView> {
        self.build_webview(options, Some(context))
    }

    fn build_webview(
        &self,
        options: &WebViewOptions,
        context: Option<&WebContext>,
    ) -> Result<WebView> {
        let event_loop = self.event_loop.raw_handle()?;
        let id = self.next_id(&self.ids)?;
        let webview = WebView::create(Rc::clone(&self.abi), event_loop, id, options, context)?;
        self.register_window(webview.window());
        Ok(webview)
    }

    pub fn create_tray(&self, options: &TrayOptions) -> Result<Tray> {
        self.event_loop.raw_handle()?;
        let id = self.next_id(&self.ids)?;
        let tray = Tray::create(Rc::clone(&self.abi), id, options)?;
        self.registry.borrow_mut().insert_tray(tray.clone());
        tray.activate(Rc::downgrade(&self.registry));
        Ok(tray)
    }

    /// Open a browsing-data directory. Relative paths are resolved against
    /// the current directory.
    pub fn create_web_context(&self, path: impl AsRef<Path>) -> Result<WebContext> {
        self.event_loop.raw_handle()?;
        let id = self.next_id(&self.context_ids)?;
        let context = WebContext::create(Rc::clone(&self.abi), id, path.as_ref())?;
        self.contexts.borrow_mut().push(context.clone());
        Ok(context)
    }

    pub fn event_loop(&self) -> &EventLoop {
        &self.event_loop
    }

    /// Run one poll tick by hand. See [`EventLoop::poll`].
    pub fn poll(&self) -> usize {
        self.event_loop.poll()
    }

    /// Start the poll timer. Must be called inside a
    /// [`tokio::task::LocalSet`].
    pub fn start(&self) -> Result<()> {
        self.event_loop.start()
    }

    pub fn window(&self, id: ResourceId) -> Option<Window> {
        self.registry.borrow().window(id)
    }

    pub fn webview(&self, id: ResourceId) -> Option<WebView> {
        self.window(id).and_then(WebView::from_window)
    }

    pub fn tray(&self, id: ResourceId) -> Option<Tray> {
        self.registry.borrow().tray(id)
    }

    pub fn window_count(&self) -> usize {
        self.registry.borrow().window_count()
    }

    pub fn tray_count(&self) -> usize {
        self.registry.borrow().tray_count()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    /// Destroy every window and webview, then trays, then web contexts,
    /// then the event loop. Idempotent; also runs on drop.
    pub fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }

        let windows = self.registry.borrow().windows();
        let trays = self.registry.borrow().trays();
        debug!(
            windows = windows.len(),
            trays = trays.len(),
            "destroying all resources"
        );
        for window in windows {
            window.destroy();
        }
        for tray in trays {
            tray.destroy();
        }
        let contexts = std::mem::take(&mut *self.contexts.borrow_mut());
        for context in contexts {
            context.destroy();
        }

        self.event_loop.destroy();
        info!("rod bridge destroyed");
    }
}

impl Drop for Rod {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests;
