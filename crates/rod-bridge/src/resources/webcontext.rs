use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use rod_common::{BridgeError, ResourceId, ResourceKind, Result};
use tracing::{debug, warn};

use super::{Lifecycle, Resource};
use crate::abi::{HandleSlot, NativeAbi, RawHandle};
use crate::strings;

/// A persistent browsing-data directory that webviews can share.
///
/// The native context must outlive every webview created in it. Calling
/// [`destroy`](Self::destroy) while webviews are still attached only marks
/// the context; the handle is freed when the last of them goes away.
#[derive(Clone)]
pub struct WebContext {
    inner: Rc<WebContextInner>,
}

struct WebContextInner {
    id: ResourceId,
    abi: Rc<dyn NativeAbi>,
    path: PathBuf,
    handle: Cell<HandleSlot>,
    attached: Cell<usize>,
    destroy_requested: Cell<bool>,
}

impl WebContextInner {
    fn release(&self) {
        if let HandleSlot::Live(handle) = self.handle.replace(HandleSlot::Empty) {
            self.abi.webcontext_destroy(handle);
            debug!(id = %self.id, path = %self.path.display(), "web context destroyed");
        }
    }
}

impl Drop for WebContextInner {
    fn drop(&mut self) {
        self.release();
    }
}

impl WebContext {
    pub(crate) fn create(abi: Rc<dyn NativeAbi>, id: ResourceId, path: &Path) -> Result<Self> {
        let path = std::path::absolute(path)
            .map_err(|e| BridgeError::Encode(format!("{}: {e}", path.display())))?;
        let text = path.to_str().ok_or(BridgeError::InvalidString)?;
        let wire = strings::encode(text)?;

        let Some(handle) = abi.webcontext_create(&wire) else {
            warn!(id = %id, path = %path.display(), "native engine failed to create a web context");
            return Err(BridgeError::ResourceCreation {
                kind: ResourceKind::WebContext,
            });
        };
        debug!(id = %id, path = %path.display(), "web context created");

        Ok(Self {
            inner: Rc::new(WebContextInner {
                id,
                abi,
                path,
                handle: Cell::new(HandleSlot::Live(handle)),
                attached: Cell::new(0),
                destroy_requested: Cell::new(false),
            }),
        })
    }

    /// Absolute directory the engine stores browsing data in.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    pub fn id(&self) -> ResourceId {
        self.inner.id
    }

    /// Number of live webviews using this context.
    pub fn attached(&self) -> usize {
        self.inner.attached.get()
    }

    pub(crate) fn raw_handle(&self) -> Result<RawHandle> {
        if self.inner.destroy_requested.get() {
            return Err(self.destroyed_error());
        }
        self.inner
            .handle
            .get()
            .live()
            .ok_or_else(|| self.destroyed_error())
    }

    pub(crate) fn attach(&self) {
        self.inner.attached.set(self.inner.attached.get() + 1);
    }

    pub(crate) fn detach(&self) {
        let remaining = self.inner.attached.get().saturating_sub(1);
        self.inner.attached.set(remaining);
        if remaining == 0 && self.inner.destroy_requested.get() {
            self.inner.release();
        }
    }

    /// Free the context, or defer until no webview uses it. Idempotent.
    pub fn destroy(&self) {
        if self.inner.destroy_requested.replace(true) {
            return;
        }
        if self.inner.attached.get() == 0 {
            self.inner.release();
        } else {
            debug!(
                id = %self.inner.id,
                attached = self.inner.attached.get(),
                "web context destroy deferred until its webviews are gone"
            );
        }
    }

    fn destroyed_error(&self) -> BridgeError {
        BridgeError::Destroyed {
            kind: ResourceKind::WebContext,
            id: self.inner.id,
        }
    }
}

impl Resource for WebContext {
    fn id(&self) -> ResourceId {
        self.inner.id
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::WebContext
    }

    fn lifecycle(&self) -> Lifecycle {
        match (
            self.inner.destroy_requested.get(),
            self.inner.handle.get().is_live(),
        ) {
            (false, _) => Lifecycle::Active,
            (true, true) => Lifecycle::Destroying,
            (true, false) => Lifecycle::Destroyed,
        }
    }

    fn destroy(&self) {
        WebContext::destroy(self)
    }
}

impl std::fmt::Debug for WebContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebContext")
            .field("id", &self.inner.id)
            .field("path", &self.inner.path)
            .field("attached", &self.inner.attached.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::headless::{AbiCall, HeadlessEngine};

    #[test]
    fn relative_path_is_made_absolute() {
        let engine = Rc::new(HeadlessEngine::new());
        let context = WebContext::create(engine.clone(), ResourceId(1), Path::new("profile")).unwrap();

        assert!(context.path().is_absolute());
        assert!(context.path().ends_with("profile"));
        let expected = context.path().to_str().unwrap().to_string();
        assert_eq!(
            engine.calls(),
            vec![AbiCall::WebContextCreate { path: expected }]
        );
    }

    #[test]
    fn destroy_without_webviews_is_immediate_and_idempotent() {
        let engine = Rc::new(HeadlessEngine::new());
        let context = WebContext::create(engine.clone(), ResourceId(1), Path::new("/tmp/rod")).unwrap();

        context.destroy();
        context.destroy();

        assert_eq!(context.lifecycle(), Lifecycle::Destroyed);
        assert_eq!(engine.live_handles(), 0);
        assert!(engine.violations().is_empty());
        assert!(matches!(
            context.raw_handle(),
            Err(BridgeError::Destroyed { kind: ResourceKind::WebContext, .. })
        ));
    }

    #[test]
    fn destroy_waits_for_attached_webviews() {
        let engine = Rc::new(HeadlessEngine::new());
        let context = WebContext::create(engine.clone(), ResourceId(1), Path::new("/tmp/rod")).unwrap();
        context.attach();

        context.destroy();
        assert_eq!(context.lifecycle(), Lifecycle::Destroying);
        assert_eq!(engine.live_handles(), 1);
        assert!(context.raw_handle().is_err());

        context.detach();
        assert_eq!(context.lifecycle(), Lifecycle::Destroyed);
        assert_eq!(engine.live_handles(), 0);
    }

    #[test]
    fn create_failure_names_webcontext() {
        let engine = Rc::new(HeadlessEngine::new());
        engine.fail_next_create(ResourceKind::WebContext);
        let result = WebContext::create(engine, ResourceId(1), Path::new("/tmp/rod"));
        assert_eq!(
            result.err(),
            Some(BridgeError::ResourceCreation {
                kind: ResourceKind::WebContext
            })
        );
    }
}
