use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use rod_common::{BridgeError, ResourceId, ResourceKind, Result};
use tracing::{debug, warn};

use super::{Lifecycle, Resource};
use crate::abi::{HandleSlot, NativeAbi};
use crate::listeners::{ListenerId, ListenerIds, Listeners};
use crate::options::{self, TrayOptions};
use crate::registry::Registry;
use crate::strings;

/// A tray icon.
#[derive(Clone)]
pub struct Tray {
    core: Rc<TrayCore>,
}

struct TrayCore {
    id: ResourceId,
    abi: Rc<dyn NativeAbi>,
    handle: Cell<HandleSlot>,
    lifecycle: Cell<Lifecycle>,
    listener_ids: ListenerIds,
    clicked: Listeners<()>,
    destroyed: Listeners<()>,
    registry: RefCell<Weak<RefCell<Registry>>>,
}

impl TrayCore {
    fn release(&self) {
        if let HandleSlot::Live(handle) = self.handle.replace(HandleSlot::Empty) {
            self.abi.tray_destroy(handle);
        }
    }
}

impl Drop for TrayCore {
    fn drop(&mut self) {
        self.release();
    }
}

impl Tray {
    pub(crate) fn create(
        abi: Rc<dyn NativeAbi>,
        id: ResourceId,
        options: &TrayOptions,
    ) -> Result<Self> {
        let wire = strings::encode(&options::encode_tray_options(options)?)?;
        let Some(handle) = abi.tray_create(id, &wire) else {
            warn!(id = %id, "native engine failed to create a tray");
            return Err(BridgeError::ResourceCreation {
                kind: ResourceKind::Tray,
            });
        };
        debug!(id = %id, handle = handle.as_raw(), "tray created");

        Ok(Self {
            core: Rc::new(TrayCore {
                id,
                abi,
                handle: Cell::new(HandleSlot::Live(handle)),
                lifecycle: Cell::new(Lifecycle::Created),
                listener_ids: ListenerIds::default(),
                clicked: Listeners::default(),
                destroyed: Listeners::default(),
                registry: RefCell::new(Weak::new()),
            }),
        })
    }

    pub(crate) fn activate(&self, registry: Weak<RefCell<Registry>>) {
        *self.core.registry.borrow_mut() = registry;
        self.core.lifecycle.set(Lifecycle::Active);
    }

    pub(crate) fn handle_click(&self) {
        if self.core.lifecycle.get() == Lifecycle::Active {
            self.core.clicked.emit(&());
        }
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

    pub fn on_click(&self, callback: impl Fn() + 'static) -> ListenerId {
        let id = self.core.listener_ids.next();
        self.core.clicked.add(id, move |_: &()| callback());
        id
    }

    /// Runs at the start of [`destroy`](Self::destroy), before the icon is
    /// removed.
    pub fn on_destroyed(&self, callback: impl Fn() + 'static) -> ListenerId {
        let id = self.core.listener_ids.next();
        self.core.destroyed.add(id, move |_: &()| callback());
        id
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.core.clicked.remove(id) || self.core.destroyed.remove(id)
    }

    /// Remove the icon. Idempotent.
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

        core.release();
        core.lifecycle.set(Lifecycle::Destroyed);
        core.clicked.clear();
        core.destroyed.clear();

        if let Some(registry) = core.registry.borrow().upgrade() {
            match registry.try_borrow_mut() {
                Ok(mut registry) => {
                    registry.remove_tray(core.id);
                }
                Err(_) => warn!(id = %core.id, "registry busy; tray left registered"),
            }
        }
        debug!(id = %core.id, "tray destroyed");
    }
}

impl Resource for Tray {
    fn id(&self) -> ResourceId {
        self.core.id
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Tray
    }

    fn lifecycle(&self) -> Lifecycle {
        self.core.lifecycle.get()
    }

    fn destroy(&self) {
        Tray::destroy(self)
    }
}

impl std::fmt::Debug for Tray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tray")
            .field("id", &self.core.id)
            .field("lifecycle", &self.core.lifecycle.get())
            .finish()
    }
}
