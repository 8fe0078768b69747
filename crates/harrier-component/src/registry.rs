//! The factory registry: a closed, duplicate-checked lookup table.
//!
//! Built once at process start from explicit factory lists and read-only
//! afterwards. The build records every duplicate type name it finds,
//! across all kinds, instead of aborting on the first, so a misassembled
//! distribution reports all collisions in one pass.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{DuplicateFactory, RegistryError};
use crate::factory::Factory;
use crate::id::ComponentKind;

/// Per-kind factory lists handed to the registry build.
#[derive(Default)]
pub struct FactoryLists {
    pub extensions: Vec<Arc<dyn Factory>>,
    pub receivers: Vec<Arc<dyn Factory>>,
    pub processors: Vec<Arc<dyn Factory>>,
    pub exporters: Vec<Arc<dyn Factory>>,
    pub connectors: Vec<Arc<dyn Factory>>,
}

impl FactoryLists {
    fn into_kinds(self) -> [(ComponentKind, Vec<Arc<dyn Factory>>); 5] {
        [
            (ComponentKind::Extension, self.extensions),
            (ComponentKind::Receiver, self.receivers),
            (ComponentKind::Processor, self.processors),
            (ComponentKind::Exporter, self.exporters),
            (ComponentKind::Connector, self.connectors),
        ]
    }
}

/// Immutable mapping from kind and type name to factory.
#[derive(Default)]
pub struct FactoryRegistry {
    kinds: BTreeMap<ComponentKind, BTreeMap<String, Arc<dyn Factory>>>,
}

impl std::fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_struct("FactoryRegistry");
        for (kind, entries) in &self.kinds {
            map.field(&format!("{kind:?}"), &entries.keys().collect::<Vec<_>>());
        }
        map.finish()
    }
}

impl FactoryRegistry {
    /// Build a registry from per-kind factory lists.
    ///
    /// Every duplicate type name within a kind is recorded; the first
    /// registration wins and later ones are dropped. The partially built
    /// registry is returned alongside the duplicates so callers can
    /// inspect what succeeded, but a non-empty duplicate list must be
    /// treated as fatal before materialization.
    pub fn build(lists: FactoryLists) -> (Self, Vec<DuplicateFactory>) {
        let mut registry = Self::default();
        let mut duplicates = Vec::new();

        for (kind, factories) in lists.into_kinds() {
            let entries = registry.kinds.entry(kind).or_default();
            for factory in factories {
                let type_name = factory.type_name().to_string();
                if entries.contains_key(&type_name) {
                    duplicates.push(DuplicateFactory { kind, type_name });
                } else {
                    entries.insert(type_name, factory);
                }
            }
        }

        (registry, duplicates)
    }

    /// Build a registry, failing with one aggregated error on duplicates.
    pub fn build_checked(lists: FactoryLists) -> Result<Self, RegistryError> {
        let (registry, duplicates) = Self::build(lists);
        if duplicates.is_empty() {
            Ok(registry)
        } else {
            Err(RegistryError::Duplicates(duplicates))
        }
    }

    /// Look up the factory for a kind and type name.
    pub fn factory(&self, kind: ComponentKind, type_name: &str) -> Option<&Arc<dyn Factory>> {
        self.kinds.get(&kind)?.get(type_name)
    }

    /// All registered type names for a kind, in sorted order.
    pub fn type_names(&self, kind: ComponentKind) -> Vec<&str> {
        self.kinds
            .get(&kind)
            .map(|entries| entries.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Total number of registered factories across all kinds.
    pub fn len(&self) -> usize {
        self.kinds.values().map(BTreeMap::len).sum()
    }

    /// Whether the registry has no factories at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::testing::StubFactory;

    fn stub(name: &'static str) -> Arc<dyn Factory> {
        Arc::new(StubFactory { name })
    }

    #[test]
    fn test_build_registers_all_kinds() {
        let (registry, duplicates) = FactoryRegistry::build(FactoryLists {
            receivers: vec![stub("otlp")],
            processors: vec![stub("batch")],
            exporters: vec![stub("debug"), stub("otlp")],
            ..Default::default()
        });

        assert!(duplicates.is_empty());
        assert_eq!(registry.len(), 4);
        assert!(registry.factory(ComponentKind::Receiver, "otlp").is_some());
        // Same type name in a different kind is not a collision.
        assert!(registry.factory(ComponentKind::Exporter, "otlp").is_some());
        assert!(registry.factory(ComponentKind::Exporter, "batch").is_none());
    }

    #[test]
    fn test_duplicates_are_aggregated_not_fail_fast() {
        let (registry, duplicates) = FactoryRegistry::build(FactoryLists {
            receivers: vec![stub("otlp"), stub("otlp"), stub("jaeger")],
            exporters: vec![stub("debug"), stub("debug")],
            ..Default::default()
        });

        // Both collisions reported together, across kinds.
        assert_eq!(duplicates.len(), 2);
        assert!(duplicates.contains(&DuplicateFactory {
            kind: ComponentKind::Receiver,
            type_name: "otlp".to_string(),
        }));
        assert!(duplicates.contains(&DuplicateFactory {
            kind: ComponentKind::Exporter,
            type_name: "debug".to_string(),
        }));

        // Valid entries survive in the partial registry.
        assert!(registry.factory(ComponentKind::Receiver, "jaeger").is_some());
        assert!(registry.factory(ComponentKind::Receiver, "otlp").is_some());
        assert!(registry.factory(ComponentKind::Exporter, "debug").is_some());
    }

    #[test]
    fn test_build_checked_fails_on_duplicates() {
        let err = FactoryRegistry::build_checked(FactoryLists {
            processors: vec![stub("batch"), stub("batch")],
            ..Default::default()
        })
        .unwrap_err();

        let RegistryError::Duplicates(duplicates) = err;
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].type_name, "batch");
    }

    #[test]
    fn test_build_checked_ok_without_duplicates() {
        let registry = FactoryRegistry::build_checked(FactoryLists {
            extensions: vec![stub("health_check")],
            ..Default::default()
        })
        .unwrap();
        assert_eq!(registry.type_names(ComponentKind::Extension), vec!["health_check"]);
    }

    #[test]
    fn test_empty_registry() {
        let (registry, duplicates) = FactoryRegistry::build(FactoryLists::default());
        assert!(duplicates.is_empty());
        assert!(registry.is_empty());
    }
}
