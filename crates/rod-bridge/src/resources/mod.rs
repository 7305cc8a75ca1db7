//! Wrappers that own native resource handles.
//!
//! Every wrapper moves through the same states:
//!
//! ```text
//! Created ──register──▶ Active ──destroy()──▶ Destroying ──▶ Destroyed
//! ```
//!
//! Events are only delivered while `Active`. `Destroying` covers the window
//! in which destroy listeners run: handles are still live, so listeners can
//! read final state, but a nested `destroy()` is a no-op.

mod tray;
mod webcontext;
mod webview;
mod window;

pub use tray::Tray;
pub use webcontext::WebContext;
pub use webview::WebView;
pub use window::Window;

use rod_common::{ResourceId, ResourceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Active,
    Destroying,
    Destroyed,
}

/// Behaviour shared by every wrapped native resource.
pub trait Resource {
    fn id(&self) -> ResourceId;

    fn kind(&self) -> ResourceKind;

    fn lifecycle(&self) -> Lifecycle;

    /// Free the native handle(s). Repeated calls are no-ops.
    fn destroy(&self);

    fn is_destroyed(&self) -> bool {
        self.lifecycle() == Lifecycle::Destroyed
    }
}
