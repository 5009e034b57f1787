use dashmap::DashMap;
use hostbridge_core::{ApiBridge, ApiGroup};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Routers reachable from the web view, keyed by interface name (`IOS`,
/// `IContact`, ...).
#[derive(Default)]
pub struct BridgeRegistry {
    bridges: DashMap<String, Arc<dyn ApiBridge>>,
}

/// Public description of a registered bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeInfo {
    pub interface: String,
    pub bridge: String,
    pub group: String,
    pub api_version: String,
    pub bound: bool,
    pub methods: Vec<String>,
}

impl BridgeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register under the bridge's interface name, replacing any previous one.
    pub fn insert(&self, bridge: Arc<dyn ApiBridge>) -> Option<Arc<dyn ApiBridge>> {
        let interface = bridge.interface().to_string();
        info!(
            interface = %interface,
            bridge = bridge.name(),
            category = %bridge.group(),
            bound = bridge.has_delegate(),
            "registered bridge"
        );
        self.bridges.insert(interface, bridge)
    }

    pub fn lookup(&self, interface: &str) -> Option<Arc<dyn ApiBridge>> {
        self.bridges.get(interface).map(|entry| Arc::clone(&*entry))
    }

    pub fn remove(&self, interface: &str) -> Option<Arc<dyn ApiBridge>> {
        self.bridges.remove(interface).map(|(_, bridge)| bridge)
    }

    pub fn len(&self) -> usize {
        self.bridges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bridges.is_empty()
    }

    /// Registered bridges sorted by interface name.
    pub fn describe(&self) -> Vec<BridgeInfo> {
        let mut infos: Vec<BridgeInfo> = self
            .bridges
            .iter()
            .map(|entry| {
                let bridge = entry.value();
                BridgeInfo {
                    interface: entry.key().clone(),
                    bridge: bridge.name().to_string(),
                    group: bridge.group().to_string(),
                    api_version: bridge.api_version().to_string(),
                    bound: bridge.has_delegate(),
                    methods: bridge.method_names().into_iter().map(str::to_string).collect(),
                }
            })
            .collect();
        infos.sort_by(|a, b| a.interface.cmp(&b.interface));
        infos
    }

    pub fn in_group(&self, group: ApiGroup) -> Vec<String> {
        let mut names: Vec<String> = self
            .bridges
            .iter()
            .filter(|entry| entry.value().group() == group)
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for BridgeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<String> = self.bridges.iter().map(|e| e.key().clone()).collect();
        names.sort();
        f.debug_struct("BridgeRegistry").field("bridges", &names).finish()
    }
}
