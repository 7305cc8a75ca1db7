//! The native event loop and its poll timer.
//!
//! Each tick calls the engine's poll entry point. Frames the engine reports
//! during that call are decoded and queued; once the native call returns,
//! the queued events go to every subscriber. Subscribers therefore never
//! run inside the engine's callback frame.
//!
//! The recurring timer is a local tokio task, so [`EventLoop::start`] must
//! be called from inside a [`tokio::task::LocalSet`]. Hosts that drive
//! their own loop can call [`EventLoop::poll`] directly instead.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use rod_common::{BridgeError, Result};
use rod_config::EventLoopConfig;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace, warn};

use crate::abi::{HandleSlot, NativeAbi, RawHandle};
use crate::events::BridgeEvent;
use crate::listeners::{ListenerId, ListenerIds, Listeners};

/// Owner of one native event loop handle.
///
/// Cloning is cheap and yields another reference to the same loop.
#[derive(Clone)]
pub struct EventLoop {
    inner: Rc<EventLoopInner>,
}

struct EventLoopInner {
    abi: Rc<dyn NativeAbi>,
    handle: Cell<HandleSlot>,
    interval: Duration,
    timer: RefCell<Option<JoinHandle<()>>>,
    polling: Cell<bool>,
    subscriber_ids: ListenerIds,
    subscribers: Listeners<BridgeEvent>,
}

/// Clears the poll flag when a tick ends, even if a subscriber panics.
struct PollGuard<'a>(&'a Cell<bool>);

impl Drop for PollGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl EventLoop {
    /// Create the native loop. Fails with [`BridgeError::Initialization`]
    /// if the engine returns no handle.
    pub fn create(abi: Rc<dyn NativeAbi>, config: &EventLoopConfig) -> Result<Self> {
        let Some(handle) = abi.event_loop_create() else {
            warn!("native engine failed to create an event loop");
            return Err(BridgeError::Initialization);
        };
        debug!(
            handle = handle.as_raw(),
            interval_ms = config.poll_interval().as_millis() as u64,
            "event loop created"
        );
        Ok(Self {
            inner: Rc::new(EventLoopInner {
                abi,
                handle: Cell::new(HandleSlot::Live(handle)),
                interval: config.poll_interval(),
                timer: RefCell::new(None),
                polling: Cell::new(false),
                subscriber_ids: ListenerIds::default(),
                subscribers: Listeners::default(),
            }),
        })
    }

    /// The live native handle, for create calls that take the loop.
    pub fn raw_handle(&self) -> Result<RawHandle> {
        self.inner
            .handle
            .get()
            .live()
            .ok_or(BridgeError::EventLoopNotRunning)
    }

    pub fn is_alive(&self) -> bool {
        self.inner.handle.get().is_live()
    }

    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    /// Receive every decoded event, for all resources.
    pub fn subscribe(&self, callback: impl Fn(&BridgeEvent) + 'static) -> ListenerId {
        let id = self.inner.subscriber_ids.next();
        self.inner.subscribers.add(id, callback);
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.subscribers.remove(id)
    }

    /// Run one tick by hand. Returns the number of events delivered.
    ///
    /// Does nothing after [`destroy`](Self::destroy), or when called from a
    /// subscriber of a tick that is still running.
    pub fn poll(&self) -> usize {
        self.inner.poll()
    }

    /// Start the recurring poll timer. No-op if it is already running.
    ///
    /// # Panics
    ///
    /// Panics if called outside a [`tokio::task::LocalSet`].
    pub fn start(&self) -> Result<()> {
        if !self.is_alive() {
            return Err(BridgeError::EventLoopNotRunning);
        }
        if self.is_running() {
            return Ok(());
        }

        let weak: Weak<EventLoopInner> = Rc::downgrade(&self.inner);
        let period = self.inner.interval;
        let task = tokio::task::spawn_local(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                if !inner.handle.get().is_live() {
                    break;
                }
                inner.poll();
            }
            trace!("poll timer exited");
        });
        *self.inner.timer.borrow_mut() = Some(task);
        debug!(interval_ms = period.as_millis() as u64, "poll timer started");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.inner
            .timer
            .borrow()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Cancel the poll timer, leaving the native loop alive.
    pub fn stop(&self) {
        self.inner.stop_timer();
    }

    /// Cancel the timer, then free the native loop. Idempotent.
    pub fn destroy(&self) {
        self.inner.shutdown();
    }
}

impl EventLoopInner {
    fn poll(&self) -> usize {
        if self.polling.get() {
            warn!("event loop poll re-entered from a subscriber; skipping");
            return 0;
        }
        let Some(handle) = self.handle.get().live() else {
            return 0;
        };
        self.polling.set(true);
        let _guard = PollGuard(&self.polling);

        let mut queued = Vec::new();
        self.abi.event_loop_poll(handle, &mut |kind, payload| {
            if let Some(event) = BridgeEvent::decode(kind, payload) {
                queued.push(event);
            }
        });

        for event in &queued {
            trace!(kind = %event.kind(), id = %event.id(), "dispatching event");
            self.subscribers.emit(event);
        }
        queued.len()
    }

    fn stop_timer(&self) {
        if let Some(task) = self.timer.borrow_mut().take() {
            task.abort();
            debug!("poll timer stopped");
        }
    }

    fn shutdown(&self) {
        // The timer goes first so no tick can reach a freed loop.
        self.stop_timer();
        if let HandleSlot::Live(handle) = self.handle.replace(HandleSlot::Empty) {
            self.abi.event_loop_destroy(handle);
            debug!(handle = handle.as_raw(), "event loop destroyed");
        }
        self.subscribers.clear();
    }
}

impl Drop for EventLoopInner {
    fn drop(&mut self) {
        self.shutdown();
    }
}
