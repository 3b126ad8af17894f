//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Sentinel meaning "no restriction" for a top-level selector
pub const ALL: &str = "ALL";

/// A top-level equality selector (brand or warehouse)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selector {
    #[default]
    All,
    Only(String),
}

impl Selector {
    pub fn only(value: impl Into<String>) -> Self {
        Selector::Only(value.into())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }

    /// The selected value, `None` for ALL
    pub fn value(&self) -> Option<&str> {
        match self {
            Selector::All => None,
            Selector::Only(v) => Some(v),
        }
    }

    /// Exact equality; ALL matches everything
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(v) => v == candidate,
        }
    }
}

impl From<String> for Selector {
    fn from(value: String) -> Self {
        if value.is_empty() || value == ALL {
            Selector::All
        } else {
            Selector::Only(value)
        }
    }
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        Selector::from(value.to_string())
    }
}

impl From<Selector> for String {
    fn from(value: Selector) -> Self {
        match value {
            Selector::All => ALL.to_string(),
            Selector::Only(v) => v,
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.value().unwrap_or(ALL))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_sentinel() {
        assert_eq!(Selector::from("ALL"), Selector::All);
        assert_eq!(Selector::from(""), Selector::All);
        assert_eq!(Selector::from("Nike"), Selector::only("Nike"));
    }

    #[test]
    fn test_selector_serde() {
        let json = serde_json::to_string(&Selector::All).unwrap();
        assert_eq!(json, "\"ALL\"");
        let parsed: Selector = serde_json::from_str("\"W1\"").unwrap();
        assert_eq!(parsed, Selector::only("W1"));
    }

    #[test]
    fn test_selector_matches_exactly() {
        let nike = Selector::only("Nike");
        assert!(nike.matches("Nike"));
        assert!(!nike.matches("nike"));
        assert!(Selector::All.matches("anything"));
    }
}
