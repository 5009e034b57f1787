use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Optional, replaceable reference to the platform implementation of a
/// capability.
///
/// Readers clone the `Arc` and release the lock before calling into the
/// delegate, so a call in flight keeps the instance it started with even if
/// the slot is rebound meanwhile.
pub struct DelegateSlot<D: ?Sized> {
    current: RwLock<Option<Arc<D>>>,
}

impl<D: ?Sized> DelegateSlot<D> {
    pub fn empty() -> Self {
        DelegateSlot {
            current: RwLock::new(None),
        }
    }

    pub fn new(delegate: Arc<D>) -> Self {
        DelegateSlot {
            current: RwLock::new(Some(delegate)),
        }
    }

    pub fn get(&self) -> Option<Arc<D>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Bind a delegate, returning the one it replaces.
    pub fn set(&self, delegate: Arc<D>) -> Option<Arc<D>> {
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(delegate)
    }

    pub fn clear(&self) -> Option<Arc<D>> {
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn is_bound(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl<D: ?Sized> Default for DelegateSlot<D> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<D: ?Sized> fmt::Debug for DelegateSlot<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateSlot")
            .field("bound", &self.is_bound())
            .finish()
    }
}
