//! Read-only view of a class's declared variables.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Causality;

/// A declared formal parameter or local variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeVariable {
    pub name: String,
    pub causality: Causality,
}

/// Ordered set of the owning class's declared variables with their
/// directionality. Supplied by the declaration subsystem; the binder only
/// reads it, never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassScope {
    variables: IndexMap<String, Causality>,
}

impl ClassScope {
    pub fn new() -> Self {
        Self {
            variables: IndexMap::new(),
        }
    }

    /// Declare a variable. Declaration order is preserved; re-declaring a
    /// name keeps its original position and updates the causality.
    pub fn declare(&mut self, name: impl Into<String>, causality: Causality) {
        self.variables.insert(name.into(), causality);
    }

    pub fn get(&self, name: &str) -> Option<Causality> {
        self.variables.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Declared `output` variables, in declaration order.
    pub fn outputs(&self) -> impl Iterator<Item = &str> {
        self.variables
            .iter()
            .filter(|(_, causality)| matches!(causality, Causality::Output))
            .map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = ScopeVariable> + '_ {
        self.variables.iter().map(|(name, causality)| ScopeVariable {
            name: name.clone(),
            causality: *causality,
        })
    }
}

impl FromIterator<(String, Causality)> for ClassScope {
    fn from_iter<T: IntoIterator<Item = (String, Causality)>>(iter: T) -> Self {
        Self {
            variables: iter.into_iter().collect(),
        }
    }
}
