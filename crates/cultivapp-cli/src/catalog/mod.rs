//! Maintenance rule catalog browsing
//!
//! [`RuleCatalogBrowser`] keeps the visible rule list, the multi-selection and
//! every rule seen so far. Rules come from a [`RuleSource`], normally the
//! backend API client.

pub mod browser;

pub use browser::{FetchOutcome, FetchTicket, RuleCatalogBrowser, Selection};

use crate::error::Result;
use async_trait::async_trait;
use cultivapp_common::{Rule, RuleType};
use std::collections::BTreeSet;

/// Which part of the catalog to fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RuleFilter {
    #[default]
    All,
    Types(BTreeSet<RuleType>),
}

impl RuleFilter {
    /// Filter on the given types; no types means the whole catalog.
    pub fn from_types(types: impl IntoIterator<Item = RuleType>) -> Self {
        let types: BTreeSet<RuleType> = types.into_iter().collect();
        if types.is_empty() {
            Self::All
        } else {
            Self::Types(types)
        }
    }

    pub fn matches(&self, rule: &Rule) -> bool {
        match self {
            Self::All => true,
            Self::Types(types) => types.contains(&rule.tipo),
        }
    }
}

impl std::fmt::Display for RuleFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Types(types) => {
                let names: Vec<&str> = types.iter().map(|t| t.code()).collect();
                f.write_str(&names.join(","))
            },
        }
    }
}

/// Anything that can answer rule catalog queries
#[async_trait]
pub trait RuleSource: Send + Sync {
    async fn fetch_rules(&self, filter: &RuleFilter) -> Result<Vec<Rule>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use cultivapp_common::RuleId;

    #[test]
    fn test_empty_types_is_all() {
        assert_eq!(RuleFilter::from_types([]), RuleFilter::All);
        assert_eq!(
            RuleFilter::from_types([RuleType::Riego, RuleType::Riego]),
            RuleFilter::Types(BTreeSet::from([RuleType::Riego]))
        );
    }

    #[test]
    fn test_filter_matches() {
        let rule = Rule {
            id: RuleId(1),
            descripcion: "Abonar".to_string(),
            tipo: RuleType::Fertilizacion,
            intervalo_dias: 15,
        };
        assert!(RuleFilter::All.matches(&rule));
        assert!(RuleFilter::from_types([RuleType::Fertilizacion]).matches(&rule));
        assert!(!RuleFilter::from_types([RuleType::Riego]).matches(&rule));
        assert_eq!(
            RuleFilter::from_types([RuleType::Riego, RuleType::Cosecha]).to_string(),
            "RIEGO,COSECHA"
        );
    }
}
