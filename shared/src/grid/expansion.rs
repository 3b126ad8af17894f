//! Which product groups are expanded in grouped mode

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::grouping::GroupKey;

/// Set of expanded group keys
///
/// Keys of groups that disappear after a reload are kept; they never match
/// a rendered group so they have no effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionState(BTreeSet<GroupKey>);

impl ExpansionState {
    pub fn toggle(mut self, key: &GroupKey) -> Self {
        if !self.0.remove(key) {
            self.0.insert(key.clone());
        }
        self
    }

    pub fn is_expanded(&self, key: &GroupKey) -> bool {
        self.0.contains(key)
    }

    pub fn collapse_all(self) -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
