//! Stage sequence editing
//!
//! A [`StageSequence`] is the ordered list of stages configured for a species.
//! `order` on each entry is the single source of truth for position; after
//! every structural change the sequence is re-sorted by `order` and renumbered
//! `1..N`. The [`StageSequenceEditor`] owns one sequence, replaces it with a
//! new record on each mutation, and hands the submit-ready requests to its
//! change listener.

use crate::api::types::EtapaRequest;
use cultivapp_common::{RuleId, StageType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

/// Rejected editor operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageEditError {
    #[error("Stage {0} is not part of the sequence. Add it with 'cultivapp stages toggle {0}'.")]
    StageNotSelected(StageType),
}

/// One configured stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    pub stage: StageType,

    /// 1-based position in the sequence
    pub order: u32,

    /// Expected days in this stage; `None` while unset
    #[serde(default)]
    pub duration_days: Option<u32>,

    #[serde(default)]
    pub rule_ids: BTreeSet<RuleId>,
}

impl StageConfig {
    fn new(stage: StageType, order: u32) -> Self {
        Self {
            stage,
            order,
            duration_days: None,
            rule_ids: BTreeSet::new(),
        }
    }
}

/// Ordered stage configuration of one species
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSequence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub especie_id: Option<i64>,

    #[serde(default)]
    pub stages: Vec<StageConfig>,
}

impl StageSequence {
    pub fn new(especie_id: Option<i64>) -> Self {
        Self {
            especie_id,
            stages: Vec::new(),
        }
    }

    /// Sort by `order` and renumber `1..N`. The sort is stable, so entries
    /// sharing an `order` keep their relative position.
    pub fn normalize(&mut self) {
        self.stages.sort_by_key(|s| s.order);
        for (position, stage) in self.stages.iter_mut().enumerate() {
            stage.order = position as u32 + 1;
        }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn position(&self, stage: StageType) -> Option<usize> {
        self.stages.iter().position(|s| s.stage == stage)
    }

    pub fn contains(&self, stage: StageType) -> bool {
        self.position(stage).is_some()
    }

    pub fn get(&self, stage: StageType) -> Option<&StageConfig> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    fn get_mut(&mut self, stage: StageType) -> Result<&mut StageConfig, StageEditError> {
        self.stages
            .iter_mut()
            .find(|s| s.stage == stage)
            .ok_or(StageEditError::StageNotSelected(stage))
    }

    /// Submit-ready records in sequence order.
    ///
    /// `orden` is the 1-based position and an unset duration is sent as 0.
    pub fn build_requests(&self, especie_id: Option<i64>) -> Vec<EtapaRequest> {
        self.stages
            .iter()
            .enumerate()
            .map(|(position, stage)| EtapaRequest {
                nombre: stage.stage,
                especie_id,
                duracion_dias: stage.duration_days.unwrap_or(0),
                orden: position as u32 + 1,
                regla_ids: stage.rule_ids.iter().copied().collect(),
            })
            .collect()
    }
}

type ChangeListener = Box<dyn FnMut(&[EtapaRequest]) + Send>;

/// Editor over a [`StageSequence`] with change notification
pub struct StageSequenceEditor {
    sequence: StageSequence,
    listener: Option<ChangeListener>,
}

impl std::fmt::Debug for StageSequenceEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageSequenceEditor")
            .field("sequence", &self.sequence)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl StageSequenceEditor {
    /// Start editing an existing sequence. It is normalized first.
    pub fn new(mut sequence: StageSequence) -> Self {
        sequence.normalize();
        Self {
            sequence,
            listener: None,
        }
    }

    /// Register the listener called with `build_requests(None)` after every change
    pub fn on_change(mut self, listener: impl FnMut(&[EtapaRequest]) + Send + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn sequence(&self) -> &StageSequence {
        &self.sequence
    }

    pub fn into_sequence(self) -> StageSequence {
        self.sequence
    }

    pub fn build_requests(&self, especie_id: Option<i64>) -> Vec<EtapaRequest> {
        self.sequence.build_requests(especie_id)
    }

    /// Add the stage at the end, or remove it (with its duration and rules).
    ///
    /// Returns `true` when the stage is selected afterwards.
    pub fn toggle_stage(&mut self, stage: StageType) -> bool {
        let mut next = self.sequence.clone();
        let added = match next.position(stage) {
            Some(index) => {
                next.stages.remove(index);
                false
            },
            None => {
                let order = next.len() as u32 + 1;
                next.stages.push(StageConfig::new(stage, order));
                true
            },
        };
        next.normalize();

        debug!(stage = %stage, added, "Toggled stage");
        self.commit(next);
        added
    }

    /// Swap the stage at `index` with its predecessor. No-op at the top.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.sequence.len() {
            return false;
        }
        self.swap_orders(index - 1, index);
        true
    }

    /// Swap the stage at `index` with its successor. No-op at the bottom.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index >= self.sequence.len().saturating_sub(1) {
            return false;
        }
        self.swap_orders(index, index + 1);
        true
    }

    fn swap_orders(&mut self, a: usize, b: usize) {
        let mut next = self.sequence.clone();
        let order_a = next.stages[a].order;
        next.stages[a].order = next.stages[b].order;
        next.stages[b].order = order_a;
        next.normalize();

        debug!(from = a, to = b, "Reordered stages");
        self.commit(next);
    }

    /// Set the expected duration from raw input.
    ///
    /// An empty value unsets the duration. Anything else is read as an integer
    /// (leading digits, like a form field) and clamped to at least 1.
    pub fn set_duration(&mut self, stage: StageType, value: &str) -> Result<Option<u32>, StageEditError> {
        let duration = parse_duration(value);
        let mut next = self.sequence.clone();
        next.get_mut(stage)?.duration_days = duration;

        debug!(stage = %stage, ?duration, "Set stage duration");
        self.commit(next);
        Ok(duration)
    }

    /// Union `rule_ids` into the stage's rules
    pub fn attach_rules(
        &mut self,
        stage: StageType,
        rule_ids: impl IntoIterator<Item = RuleId>,
    ) -> Result<(), StageEditError> {
        let mut next = self.sequence.clone();
        next.get_mut(stage)?.rule_ids.extend(rule_ids);

        debug!(stage = %stage, "Attached rules");
        self.commit(next);
        Ok(())
    }

    /// Remove `rule_ids` from the stage. Ids it does not have are ignored.
    pub fn detach_rules(
        &mut self,
        stage: StageType,
        rule_ids: impl IntoIterator<Item = RuleId>,
    ) -> Result<(), StageEditError> {
        let mut next = self.sequence.clone();
        let config = next.get_mut(stage)?;
        for id in rule_ids {
            config.rule_ids.remove(&id);
        }

        debug!(stage = %stage, "Detached rules");
        self.commit(next);
        Ok(())
    }

    fn commit(&mut self, next: StageSequence) {
        self.sequence = next;
        if let Some(listener) = self.listener.as_mut() {
            let requests = self.sequence.build_requests(None);
            listener(&requests);
        }
    }
}

fn parse_duration(value: &str) -> Option<u32> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let digits: String = digits.chars().take_while(char::is_ascii_digit).collect();
    let parsed = if negative || digits.is_empty() {
        0
    } else {
        digits.parse::<u64>().unwrap_or(u64::MAX)
    };

    Some(parsed.clamp(1, u64::from(u32::MAX)) as u32)
}
