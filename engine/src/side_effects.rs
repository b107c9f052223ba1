//! Side-effect accounting
//!
//! Side effects are not reported by engines directly. They are derived by
//! diffing a [`GraphSnapshot`] taken before a query against one taken after.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::engine::GraphSnapshot;

/// Side effects keyed by their TCK symbol (`+nodes`, `-labels`, ...)
pub type SideEffectsMap = BTreeMap<String, i64>;

/// The fixed set of side-effect counters and their TCK symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SideEffectKey {
    NodesCreated,
    NodesDeleted,
    RelationshipsCreated,
    RelationshipsDeleted,
    PropertiesSet,
    LabelsAdded,
    LabelsRemoved,
}

impl SideEffectKey {
    pub const ALL: [SideEffectKey; 7] = [
        SideEffectKey::NodesCreated,
        SideEffectKey::NodesDeleted,
        SideEffectKey::RelationshipsCreated,
        SideEffectKey::RelationshipsDeleted,
        SideEffectKey::PropertiesSet,
        SideEffectKey::LabelsAdded,
        SideEffectKey::LabelsRemoved,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            SideEffectKey::NodesCreated => "+nodes",
            SideEffectKey::NodesDeleted => "-nodes",
            SideEffectKey::RelationshipsCreated => "+relationships",
            SideEffectKey::RelationshipsDeleted => "-relationships",
            SideEffectKey::PropertiesSet => "+properties",
            SideEffectKey::LabelsAdded => "+labels",
            SideEffectKey::LabelsRemoved => "-labels",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.symbol() == symbol)
    }
}

impl fmt::Display for SideEffectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Mutation counts attributed to a single query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideEffects {
    pub nodes_created: usize,
    pub nodes_deleted: usize,
    pub relationships_created: usize,
    pub relationships_deleted: usize,
    pub properties_set: usize,
    pub labels_added: usize,
    pub labels_removed: usize,
}

impl SideEffects {
    /// Derive side effects from counts taken around a query
    ///
    /// Growth counts as created/added/set and shrinkage as deleted/removed;
    /// every counter saturates at zero. Property and label counters are only
    /// derived when both snapshots carry them.
    pub fn between(before: &GraphSnapshot, after: &GraphSnapshot) -> Self {
        let (properties_set, labels_added, labels_removed) =
            match (before.properties, after.properties, before.labels, after.labels) {
                (Some(pb), Some(pa), Some(lb), Some(la)) => {
                    (pa.saturating_sub(pb), la.saturating_sub(lb), lb.saturating_sub(la))
                }
                (Some(pb), Some(pa), _, _) => (pa.saturating_sub(pb), 0, 0),
                (_, _, Some(lb), Some(la)) => (0, la.saturating_sub(lb), lb.saturating_sub(la)),
                _ => (0, 0, 0),
            };

        Self {
            nodes_created: after.nodes.saturating_sub(before.nodes),
            nodes_deleted: before.nodes.saturating_sub(after.nodes),
            relationships_created: after.edges.saturating_sub(before.edges),
            relationships_deleted: before.edges.saturating_sub(after.edges),
            properties_set,
            labels_added,
            labels_removed,
        }
    }

    pub fn get(&self, key: SideEffectKey) -> usize {
        match key {
            SideEffectKey::NodesCreated => self.nodes_created,
            SideEffectKey::NodesDeleted => self.nodes_deleted,
            SideEffectKey::RelationshipsCreated => self.relationships_created,
            SideEffectKey::RelationshipsDeleted => self.relationships_deleted,
            SideEffectKey::PropertiesSet => self.properties_set,
            SideEffectKey::LabelsAdded => self.labels_added,
            SideEffectKey::LabelsRemoved => self.labels_removed,
        }
    }

    /// Project onto the TCK side-effect table form, non-zero counters only
    pub fn to_map(&self) -> SideEffectsMap {
        SideEffectKey::ALL
            .into_iter()
            .filter(|key| self.get(*key) > 0)
            .map(|key| (key.symbol().to_string(), self.get(key) as i64))
            .collect()
    }

    pub fn has_no_effects(&self) -> bool {
        SideEffectKey::ALL.into_iter().all(|key| self.get(key) == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(nodes: usize, edges: usize) -> GraphSnapshot {
        GraphSnapshot {
            nodes,
            edges,
            properties: None,
            labels: None,
        }
    }

    #[test]
    fn test_to_map_only_non_zero() {
        let effects = SideEffects {
            nodes_created: 2,
            labels_added: 1,
            ..Default::default()
        };
        let map = effects.to_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("+nodes"), Some(&2));
        assert_eq!(map.get("+labels"), Some(&1));
        assert!(!map.contains_key("-nodes"));
    }

    #[test]
    fn test_default_has_no_effects() {
        assert!(SideEffects::default().has_no_effects());
        assert!(SideEffects::default().to_map().is_empty());
    }

    #[test]
    fn test_between_growth_and_shrinkage() {
        let effects = SideEffects::between(&snap(3, 1), &snap(5, 0));
        assert_eq!(effects.nodes_created, 2);
        assert_eq!(effects.nodes_deleted, 0);
        assert_eq!(effects.relationships_created, 0);
        assert_eq!(effects.relationships_deleted, 1);
        assert_eq!(effects.properties_set, 0);
    }

    #[test]
    fn test_between_optional_counters() {
        let before = GraphSnapshot {
            nodes: 0,
            edges: 0,
            properties: Some(1),
            labels: Some(2),
        };
        let after = GraphSnapshot {
            nodes: 1,
            edges: 0,
            properties: Some(4),
            labels: Some(1),
        };
        let effects = SideEffects::between(&before, &after);
        assert_eq!(effects.properties_set, 3);
        assert_eq!(effects.labels_added, 0);
        assert_eq!(effects.labels_removed, 1);
    }

    #[test]
    fn test_between_ignores_one_sided_counts() {
        let before = GraphSnapshot {
            properties: None,
            ..snap(0, 0)
        };
        let after = GraphSnapshot {
            properties: Some(10),
            ..snap(0, 0)
        };
        assert!(SideEffects::between(&before, &after).has_no_effects());
    }

    #[test]
    fn test_symbol_round_trip() {
        for key in SideEffectKey::ALL {
            assert_eq!(SideEffectKey::from_symbol(key.symbol()), Some(key));
        }
        assert_eq!(SideEffectKey::from_symbol("properties set"), None);
    }
}
