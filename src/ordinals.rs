//! Stable function ordinal assignment.
//!
//! Every non-reuse function across groups with callable functions gets a
//! zero-based slot in the descriptor's address table. Traversal is registry
//! order, never sorted: ordinal values are a layout contract with compiled
//! consumers and must not change between regenerations for the same
//! registry. A duplicate name aborts generation instead of silently
//! overwriting the earlier slot.

use crate::error::{GenError, Result};
use crate::registry::Registry;
use rustc_hash::FxHashMap;

/// Immutable name → ordinal mapping, built once before any capability
/// predicate is formed.
#[derive(Debug, Clone)]
pub struct OrdinalTable {
    by_name: FxHashMap<String, usize>,
    names: Vec<String>,
}

impl OrdinalTable {
    pub fn build(registry: &Registry) -> Result<Self> {
        let mut by_name = FxHashMap::default();
        let mut names = Vec::new();

        for group in &registry.groups {
            for func in group.callable_functions() {
                let ordinal = names.len();
                if let Some(&first) = by_name.get(&func.name) {
                    return Err(GenError::duplicate_function(&func.name, first));
                }
                by_name.insert(func.name.clone(), ordinal);
                names.push(func.name.clone());
            }
        }

        Ok(Self { by_name, names })
    }

    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, ordinal: usize) -> Option<&str> {
        self.names.get(ordinal).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Functions in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().enumerate().map(|(i, n)| (i, n.as_str()))
    }
}
