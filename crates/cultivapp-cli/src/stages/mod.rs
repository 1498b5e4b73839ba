//! Stage sequence configuration for a species
//!
//! - [`editor`]: the ordered stage list and its mutations
//! - [`validation`]: checks run before the sequence is submitted
//! - [`plan`]: the YAML plan file that persists an editing session

pub mod editor;
pub mod plan;
pub mod validation;

pub use editor::{StageConfig, StageEditError, StageSequence, StageSequenceEditor};
pub use validation::{validate_rule_ids_known, validate_stage_requests, StageValidationError};

use crate::api::types::EtapaRequest;
use crate::catalog::{RuleCatalogBrowser, RuleSource};
use crate::error::{CliError, Result};
use async_trait::async_trait;
use tracing::info;

/// Destination for a submitted stage batch
#[async_trait]
pub trait StageBatchSink: Send + Sync {
    async fn save_stages(&self, requests: &[EtapaRequest]) -> Result<()>;
}

/// Validate the sequence for `especie_id` and hand it to `sink`.
///
/// After the structural checks, every referenced rule id must exist in the
/// full catalog of `rules`. Nothing is sent when validation fails.
pub async fn submit(
    sequence: &StageSequence,
    especie_id: Option<i64>,
    rules: &dyn RuleSource,
    sink: &dyn StageBatchSink,
) -> Result<Vec<EtapaRequest>> {
    let especie_id = especie_id
        .or(sequence.especie_id)
        .ok_or(CliError::MissingEspecie)?;

    let requests = sequence.build_requests(Some(especie_id));
    validate_stage_requests(&requests)?;

    let mut browser = RuleCatalogBrowser::default();
    browser.load_all(rules).await?;
    validate_rule_ids_known(&requests, &browser.known_ids())?;

    sink.save_stages(&requests).await?;
    info!(especie_id, stages = requests.len(), "Submitted stage sequence");

    Ok(requests)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::catalog::RuleFilter;
    use cultivapp_common::{Rule, RuleId, RuleType, StageType};
    use std::sync::Mutex;

    /// Catalog holding rules `1..=count`
    struct Catalog {
        count: i64,
    }

    #[async_trait]
    impl RuleSource for Catalog {
        async fn fetch_rules(&self, filter: &RuleFilter) -> Result<Vec<Rule>> {
            assert_eq!(filter, &RuleFilter::All);
            Ok((1..=self.count)
                .map(|id| Rule {
                    id: RuleId(id),
                    descripcion: format!("Regla {}", id),
                    tipo: RuleType::Riego,
                    intervalo_dias: 2,
                })
                .collect())
        }
    }

    const CATALOG: Catalog = Catalog { count: 3 };

    #[derive(Default)]
    struct RecordingSink {
        batches: Mutex<Vec<Vec<EtapaRequest>>>,
    }

    #[async_trait]
    impl StageBatchSink for RecordingSink {
        async fn save_stages(&self, requests: &[EtapaRequest]) -> Result<()> {
            self.batches.lock().unwrap().push(requests.to_vec());
            Ok(())
        }
    }

    fn complete_sequence() -> StageSequence {
        let mut editor = StageSequenceEditor::new(StageSequence::new(Some(5)));
        for stage in [StageType::Preparacion, StageType::Siembra, StageType::Cosecha] {
            editor.toggle_stage(stage);
            editor.attach_rules(stage, [RuleId(1)]).unwrap();
        }
        editor.into_sequence()
    }

    #[tokio::test]
    async fn test_submit_uses_plan_especie() {
        let sink = RecordingSink::default();
        let sent = submit(&complete_sequence(), None, &CATALOG, &sink).await.unwrap();

        assert!(sent.iter().all(|r| r.especie_id == Some(5)));
        assert_eq!(sink.batches.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_flag_overrides_plan_especie() {
        let sink = RecordingSink::default();
        let sent = submit(&complete_sequence(), Some(8), &CATALOG, &sink).await.unwrap();
        assert_eq!(sent[0].especie_id, Some(8));
    }

    #[tokio::test]
    async fn test_invalid_sequence_is_not_sent() {
        let sink = RecordingSink::default();
        let mut sequence = complete_sequence();
        sequence.stages[1].rule_ids.clear();

        let err = submit(&sequence, None, &CATALOG, &sink).await.unwrap_err();
        assert!(matches!(
            err,
            CliError::Validation(StageValidationError::StageWithoutRules {
                stage: StageType::Siembra
            })
        ));
        assert!(sink.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_requires_especie() {
        let sink = RecordingSink::default();
        let mut sequence = complete_sequence();
        sequence.especie_id = None;

        let err = submit(&sequence, None, &CATALOG, &sink).await.unwrap_err();
        assert!(matches!(err, CliError::MissingEspecie));
    }

    #[tokio::test]
    async fn test_rule_missing_from_catalog_is_not_sent() {
        let sink = RecordingSink::default();
        let mut sequence = complete_sequence();
        sequence.stages[2].rule_ids.insert(RuleId(9));

        let err = submit(&sequence, None, &CATALOG, &sink).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "La etapa COSECHA usa reglas que no existen: 9"
        );
        assert!(matches!(
            err,
            CliError::Validation(StageValidationError::UnknownRules {
                stage: StageType::Cosecha,
                ..
            })
        ));
        assert!(sink.batches.lock().unwrap().is_empty());
    }
}
