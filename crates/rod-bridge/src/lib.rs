//! Host-side bridge to the native window engine.
//!
//! The native engine owns windows, embedded webviews and tray icons and is
//! reachable only through opaque handles (see [`abi::NativeAbi`]). This crate
//! provides:
//! - Typed wrappers ([`Window`], [`WebView`], [`Tray`], [`WebContext`]) that
//!   own those handles and never use them after release
//! - Translation of host options into the engine's JSON wire format
//! - A polling [`EventLoop`] that turns native callbacks into typed events
//! - The [`Rod`] facade that allocates ids and routes events by id

pub mod abi;
pub mod event_loop;
pub mod events;
pub mod listeners;
pub mod options;
mod registry;
pub mod resources;
pub mod rod;
pub mod strings;

pub use abi::headless::HeadlessEngine;
pub use abi::{HandleSlot, NativeAbi, RawHandle};
pub use event_loop::EventLoop;
pub use events::{BridgeEvent, EventEnvelope, EventKind};
pub use listeners::ListenerId;
pub use options::{SizeBound, TrayOptions, WebViewOptions, WindowOptions};
pub use resources::{Lifecycle, Resource, Tray, WebContext, WebView, Window};
pub use rod::Rod;

pub use rod_common::{
    BridgeError, Position, ProgressBar, ProgressState, ResourceId, ResourceKind, Result, Size,
};
