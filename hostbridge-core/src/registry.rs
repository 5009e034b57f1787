use crate::error::{BridgeError, Result};
use crate::group::ApiGroup;
use crate::ids::CorrelationId;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::time::Instant;
use tracing::{debug, warn};

/// How long a registry entry lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Released by its first delivery.
    Callback,
    /// Delivers any number of outcomes until explicitly removed.
    Listener,
}

/// An asynchronous call or listener waiting for native code to report back
#[derive(Debug, Clone)]
pub struct PendingEntry {
    pub id: CorrelationId,
    pub group: ApiGroup,
    /// Callback type name, e.g. `ContactResultCallback`.
    pub handler: &'static str,
    pub kind: EntryKind,
    pub registered_at: Instant,
}

/// Snapshot of the outstanding entries by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub callbacks: usize,
    pub listeners: usize,
}

/// Outstanding correlation ids shared by every router of a host.
#[derive(Debug, Default)]
pub struct CorrelationRegistry {
    entries: DashMap<CorrelationId, PendingEntry>,
}

impl CorrelationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an id. An id that is still outstanding is rejected and the
    /// existing entry is left untouched.
    pub fn register(
        &self,
        id: CorrelationId,
        group: ApiGroup,
        handler: &'static str,
        kind: EntryKind,
    ) -> Result<()> {
        match self.entries.entry(id) {
            Entry::Occupied(existing) => {
                warn!(
                    %id,
                    category = %group,
                    handler,
                    outstanding = existing.get().handler,
                    "rejecting duplicate correlation id"
                );
                Err(BridgeError::DuplicateCorrelationId(id))
            }
            Entry::Vacant(slot) => {
                slot.insert(PendingEntry {
                    id,
                    group,
                    handler,
                    kind,
                    registered_at: Instant::now(),
                });
                debug!(%id, category = %group, handler, ?kind, "registered correlation id");
                Ok(())
            }
        }
    }

    /// Take the right to deliver one outcome for `id`.
    ///
    /// Callbacks are removed by the claim, so at most one caller ever gets
    /// `Some`. Listeners stay registered.
    pub fn claim(&self, id: CorrelationId) -> Option<PendingEntry> {
        let listener = self
            .entries
            .get(&id)
            .filter(|entry| entry.kind == EntryKind::Listener)
            .map(|entry| entry.value().clone());
        if listener.is_some() {
            return listener;
        }

        self.entries
            .remove_if(&id, |_, entry| entry.kind == EntryKind::Callback)
            .map(|(_, entry)| entry)
    }

    /// Drop an entry without delivering anything.
    pub fn release(&self, id: CorrelationId) -> Option<PendingEntry> {
        self.entries.remove(&id).map(|(_, entry)| entry)
    }

    /// Drop the listener `id` if it is a `handler` listener of `group`.
    /// Callbacks and listeners of other capabilities are left alone.
    pub fn release_listener(
        &self,
        id: CorrelationId,
        group: ApiGroup,
        handler: &str,
    ) -> Option<PendingEntry> {
        let released = self
            .entries
            .remove_if(&id, |_, entry| {
                entry.kind == EntryKind::Listener && entry.group == group && entry.handler == handler
            })
            .map(|(_, entry)| entry);
        if released.is_none() && self.entries.contains_key(&id) {
            warn!(%id, category = %group, handler, "remove ignored; id belongs to another call");
        }
        released
    }

    /// Drop every listener of `handler` within `group`; returns how many went.
    pub fn release_listeners(&self, group: ApiGroup, handler: &str) -> usize {
        let mut released = 0;
        self.entries.retain(|_, entry| {
            let matches =
                entry.kind == EntryKind::Listener && entry.group == group && entry.handler == handler;
            if matches {
                released += 1;
            }
            !matches
        });
        debug!(category = %group, handler, released, "released listeners");
        released
    }

    pub fn contains(&self, id: CorrelationId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn get(&self, id: CorrelationId) -> Option<PendingEntry> {
        self.entries.get(&id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats::default();
        for entry in self.entries.iter() {
            match entry.kind {
                EntryKind::Callback => stats.callbacks += 1,
                EntryKind::Listener => stats.listeners += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn id(n: i64) -> CorrelationId {
        CorrelationId::new(n)
    }

    #[test]
    fn test_callback_claimed_once() {
        let registry = CorrelationRegistry::new();
        registry
            .register(id(1), ApiGroup::Pim, "ContactResultCallback", EntryKind::Callback)
            .unwrap();

        let entry = registry.claim(id(1)).unwrap();
        assert_eq!(entry.handler, "ContactResultCallback");
        assert!(registry.claim(id(1)).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_listener_survives_claims() {
        let registry = CorrelationRegistry::new();
        registry
            .register(id(5), ApiGroup::Application, "LifecycleListener", EntryKind::Listener)
            .unwrap();

        assert!(registry.claim(id(5)).is_some());
        assert!(registry.claim(id(5)).is_some());
        assert_eq!(registry.stats(), RegistryStats { callbacks: 0, listeners: 1 });

        assert!(registry.release(id(5)).is_some());
        assert!(registry.claim(id(5)).is_none());
    }

    #[test]
    fn test_duplicate_rejected_first_kept() {
        let registry = CorrelationRegistry::new();
        registry
            .register(id(9), ApiGroup::Data, "DatabaseResultCallback", EntryKind::Callback)
            .unwrap();

        let err = registry
            .register(id(9), ApiGroup::Pim, "ContactResultCallback", EntryKind::Callback)
            .unwrap_err();
        assert!(matches!(err, BridgeError::DuplicateCorrelationId(d) if d == id(9)));
        assert_eq!(registry.get(id(9)).unwrap().handler, "DatabaseResultCallback");

        // Released ids may be reused.
        registry.claim(id(9));
        assert!(registry
            .register(id(9), ApiGroup::Pim, "ContactResultCallback", EntryKind::Callback)
            .is_ok());
    }

    #[test]
    fn test_release_listeners_scoped() {
        let registry = CorrelationRegistry::new();
        for n in 0..3 {
            registry
                .register(id(n), ApiGroup::Application, "LifecycleListener", EntryKind::Listener)
                .unwrap();
        }
        registry
            .register(id(10), ApiGroup::Application, "OtherListener", EntryKind::Listener)
            .unwrap();
        registry
            .register(id(11), ApiGroup::Application, "LifecycleListener", EntryKind::Callback)
            .unwrap();

        assert_eq!(registry.release_listeners(ApiGroup::Application, "LifecycleListener"), 3);
        assert!(registry.contains(id(10)));
        assert!(registry.contains(id(11)));
        assert_eq!(registry.stats(), RegistryStats { callbacks: 1, listeners: 1 });
    }

    #[test]
    fn test_release_listener_checks_kind_and_scope() {
        let registry = CorrelationRegistry::new();
        registry
            .register(id(42), ApiGroup::Pim, "ContactResultCallback", EntryKind::Callback)
            .unwrap();
        registry
            .register(id(43), ApiGroup::Application, "LifecycleListener", EntryKind::Listener)
            .unwrap();

        assert!(registry
            .release_listener(id(42), ApiGroup::Application, "LifecycleListener")
            .is_none());
        assert!(registry.contains(id(42)));

        assert!(registry
            .release_listener(id(43), ApiGroup::Util, "LifecycleListener")
            .is_none());
        assert!(registry
            .release_listener(id(43), ApiGroup::Application, "TickListener")
            .is_none());
        assert!(registry.contains(id(43)));

        let released = registry
            .release_listener(id(43), ApiGroup::Application, "LifecycleListener")
            .unwrap();
        assert_eq!(released.kind, EntryKind::Listener);
        assert!(registry
            .release_listener(id(99), ApiGroup::Application, "LifecycleListener")
            .is_none());
        assert_eq!(registry.stats(), RegistryStats { callbacks: 1, listeners: 0 });
    }

    #[test]
    fn test_concurrent_claims_deliver_once() {
        let registry = Arc::new(CorrelationRegistry::new());
        registry
            .register(id(77), ApiGroup::Security, "SecurityResultCallback", EntryKind::Callback)
            .unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || registry.claim(id(77)).is_some())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
