//! Rule catalog browser state
//!
//! Fetches are split into `begin_*` (which issues a [`FetchTicket`]) and
//! [`RuleCatalogBrowser::complete`]. Only the response to the most recently
//! issued ticket is applied; older responses are dropped, whatever order they
//! arrive in.

use crate::catalog::{RuleFilter, RuleSource};
use crate::error::{CliError, Result};
use cultivapp_common::{Rule, RuleId, RuleType};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Handle for one in-flight catalog fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    filter: RuleFilter,
}

impl FetchTicket {
    pub fn filter(&self) -> &RuleFilter {
        &self.filter
    }
}

/// What happened to a completed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the visible list
    Applied { visible: usize },
    /// A newer fetch was issued meanwhile; the response was dropped
    Stale,
}

/// Result of confirming a selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Selected rules, by id
    pub rules: Vec<Rule>,
    /// Selected ids never seen in any loaded catalog page
    pub unresolved: Vec<RuleId>,
}

impl Selection {
    pub fn ids(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.rules.iter().map(|r| r.id)
    }
}

#[derive(Debug, Default)]
pub struct RuleCatalogBrowser {
    display: Vec<Rule>,
    known: BTreeMap<RuleId, Rule>,
    selected: BTreeSet<RuleId>,
    filter: RuleFilter,
    issued: u64,
    last_error: Option<String>,
}

impl RuleCatalogBrowser {
    /// New browser with `selected` pre-marked (the stage's current rules)
    pub fn new(selected: impl IntoIterator<Item = RuleId>) -> Self {
        Self {
            selected: selected.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Start fetching the full catalog
    pub fn begin_load_all(&mut self) -> FetchTicket {
        self.begin(RuleFilter::All)
    }

    /// Start fetching only rules of the given types
    pub fn begin_filter(&mut self, types: impl IntoIterator<Item = RuleType>) -> FetchTicket {
        self.begin(RuleFilter::from_types(types))
    }

    fn begin(&mut self, filter: RuleFilter) -> FetchTicket {
        self.issued += 1;
        debug!(seq = self.issued, filter = %filter, "Issued rule catalog fetch");
        FetchTicket {
            seq: self.issued,
            filter,
        }
    }

    /// Apply the response for `ticket` if it is still the latest.
    ///
    /// A failed latest fetch keeps the previous list, records the message and
    /// returns the error.
    pub fn complete(&mut self, ticket: FetchTicket, response: Result<Vec<Rule>>) -> Result<FetchOutcome> {
        if ticket.seq != self.issued {
            debug!(
                seq = ticket.seq,
                latest = self.issued,
                filter = %ticket.filter,
                "Dropping stale rule catalog response"
            );
            return Ok(FetchOutcome::Stale);
        }

        match response {
            Ok(rules) => {
                for rule in &rules {
                    self.known.insert(rule.id, rule.clone());
                }
                self.display = rules;
                self.filter = ticket.filter;
                self.last_error = None;
                Ok(FetchOutcome::Applied {
                    visible: self.display.len(),
                })
            },
            Err(e) => {
                warn!(error = %e, filter = %ticket.filter, "Rule catalog fetch failed");
                self.last_error = Some(e.to_string());
                Err(e)
            },
        }
    }

    /// Fetch and apply the full catalog
    pub async fn load_all(&mut self, source: &dyn RuleSource) -> Result<FetchOutcome> {
        let ticket = self.begin_load_all();
        let response = source.fetch_rules(ticket.filter()).await;
        self.complete(ticket, response)
    }

    /// Fetch and apply rules of the given types
    pub async fn filter_by_type(
        &mut self,
        source: &dyn RuleSource,
        types: impl IntoIterator<Item = RuleType>,
    ) -> Result<FetchOutcome> {
        let ticket = self.begin_filter(types);
        let response = source.fetch_rules(ticket.filter()).await;
        self.complete(ticket, response)
    }

    /// Flip selection of one rule. Returns `true` when it is selected afterwards.
    pub fn toggle_select(&mut self, id: RuleId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn is_selected(&self, id: RuleId) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected_ids(&self) -> &BTreeSet<RuleId> {
        &self.selected
    }

    /// Rules of the last applied fetch
    pub fn visible(&self) -> &[Rule] {
        &self.display
    }

    /// Filter of the last applied fetch
    pub fn filter(&self) -> &RuleFilter {
        &self.filter
    }

    /// Every rule seen by any applied fetch
    pub fn known_ids(&self) -> BTreeSet<RuleId> {
        self.known.keys().copied().collect()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Resolve the selection against every rule seen so far, not only the
    /// visible page. Ids that cannot be resolved are returned separately.
    pub fn confirm_selection(&self) -> Selection {
        let mut selection = Selection::default();
        for id in &self.selected {
            match self.known.get(id) {
                Some(rule) => selection.rules.push(rule.clone()),
                None => selection.unresolved.push(*id),
            }
        }

        if !selection.unresolved.is_empty() {
            warn!(
                unresolved = ?selection.unresolved,
                "Selected rules are missing from the loaded catalog"
            );
        }
        selection
    }

    /// Like [`confirm_selection`](Self::confirm_selection), but any unresolved
    /// id is an error.
    pub fn confirm_resolved(&self) -> Result<Vec<Rule>> {
        let selection = self.confirm_selection();
        if selection.unresolved.is_empty() {
            Ok(selection.rules)
        } else {
            Err(CliError::UnresolvedRules(selection.unresolved))
        }
    }
}
