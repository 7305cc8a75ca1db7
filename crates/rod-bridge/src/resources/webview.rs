use std::rc::Rc;

use rod_common::{BridgeError, ResourceId, ResourceKind, Result};
use tracing::{debug, warn};

use super::{Lifecycle, Resource, WebContext, Window};
use crate::abi::{HandleSlot, NativeAbi, RawHandle};
use crate::options::{self, WebViewOptions};
use crate::strings;

/// A window with an embedded web surface.
///
/// Window operations go through [`window`](Self::window). The surface handle
/// is created after the window (it needs the window handle) and freed
/// before it.
#[derive(Clone, Debug)]
pub struct WebView {
    window: Window,
}

impl WebView {
    pub(crate) fn create(
        abi: Rc<dyn NativeAbi>,
        event_loop: RawHandle,
        id: ResourceId,
        options: &WebViewOptions,
        context: Option<&WebContext>,
    ) -> Result<Self> {
        let context_handle = context.map(WebContext::raw_handle).transpose()?;
        let surface_wire = strings::encode(&options::encode_webview_options(options)?)?;

        let window = Window::open(
            Rc::clone(&abi),
            event_loop,
            id,
            ResourceKind::WebView,
            &options.window,
        )?;
        let window_handle = window
            .core
            .window_handle()
            .ok_or_else(|| window.destroyed_error())?;

        let Some(surface) = abi.webview_create(window_handle, context_handle, &surface_wire)
        else {
            warn!(id = %id, "native engine failed to create a webview surface");
            window.core.release_handles();
            return Err(BridgeError::ResourceCreation {
                kind: ResourceKind::WebView,
            });
        };
        window.core.surface.set(HandleSlot::Live(surface));
        if let Some(context) = context {
            context.attach();
            *window.core.context.borrow_mut() = Some(context.clone());
        }
        debug!(id = %id, surface = surface.as_raw(), "webview created");

        Ok(Self { window })
    }

    /// View an existing window as a webview, if it has a live surface.
    pub(crate) fn from_window(window: Window) -> Option<Self> {
        window
            .core
            .surface
            .get()
            .is_live()
            .then_some(Self { window })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn id(&self) -> ResourceId {
        self.window.id()
    }

    fn surface(&self) -> Result<RawHandle> {
        self.window
            .core
            .surface
            .get()
            .live()
            .ok_or_else(|| self.window.destroyed_error())
    }

    pub fn url(&self) -> Result<String> {
        let surface = self.surface()?;
        strings::decode(&self.window.core.abi.webview_get_url(surface))
    }

    pub fn is_devtools_open(&self) -> Result<bool> {
        let surface = self.surface()?;
        Ok(self.window.core.abi.webview_is_devtools_open(surface))
    }

    pub fn set_url(&self, url: &str) -> Result<()> {
        let surface = self.surface()?;
        let url = strings::encode(url)?;
        self.window.core.abi.webview_set_url(surface, &url);
        Ok(())
    }

    pub fn set_html(&self, html: &str) -> Result<()> {
        let surface = self.surface()?;
        let html = strings::encode(html)?;
        self.window.core.abi.webview_set_html(surface, &html);
        Ok(())
    }

    pub fn reload(&self) -> Result<()> {
        let surface = self.surface()?;
        self.window.core.abi.webview_reload(surface);
        Ok(())
    }

    pub fn zoom(&self, scale_factor: f64) -> Result<()> {
        let surface = self.surface()?;
        self.window.core.abi.webview_zoom(surface, scale_factor);
        Ok(())
    }

    pub fn open_devtools(&self) -> Result<()> {
        let surface = self.surface()?;
        self.window.core.abi.webview_open_devtools(surface);
        Ok(())
    }

    pub fn close_devtools(&self) -> Result<()> {
        let surface = self.surface()?;
        self.window.core.abi.webview_close_devtools(surface);
        Ok(())
    }

    /// Open devtools if closed, close them if open. Returns the new state.
    pub fn toggle_devtools(&self) -> Result<bool> {
        if self.is_devtools_open()? {
            self.close_devtools()?;
            Ok(false)
        } else {
            self.open_devtools()?;
            Ok(true)
        }
    }

    pub fn clear_all_browsing_data(&self) -> Result<()> {
        let surface = self.surface()?;
        self.window.core.abi.webview_clear_all_browsing_data(surface);
        Ok(())
    }

    /// Free the surface, then the window. Idempotent.
    pub fn destroy(&self) {
        self.window.destroy();
    }
}

impl Resource for WebView {
    fn id(&self) -> ResourceId {
        self.window.id()
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::WebView
    }

    fn lifecycle(&self) -> Lifecycle {
        self.window.lifecycle()
    }

    fn destroy(&self) {
        self.window.destroy();
    }
}
