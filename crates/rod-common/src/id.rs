use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;

/// Correlation key shared by a host-side resource and the native events
/// that reference it. Carries no ownership.
///
/// The engine's C ABI takes 16-bit ids, so this is 16 bits wide too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub u16);

impl ResourceId {
    pub fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out resource ids for one facade instance.
///
/// Ids start at 1, increase by one per allocation and are never handed out
/// twice, even after the resource that held one is gone.
#[derive(Debug)]
pub struct IdAllocator {
    next: Cell<Option<u16>>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next: Cell::new(Some(1)),
        }
    }

    /// Reserve the next id. Returns `None` once the id space is used up;
    /// `u16::MAX` itself is still handed out.
    pub fn allocate(&self) -> Option<ResourceId> {
        let id = self.next.get()?;
        self.next.set(id.checked_add(1));
        Some(ResourceId(id))
    }

    /// The id the next call to `allocate` would return.
    pub fn peek(&self) -> Option<ResourceId> {
        self.next.get().map(ResourceId)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
