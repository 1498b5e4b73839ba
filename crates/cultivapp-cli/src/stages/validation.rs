//! Pre-submit validation of a stage sequence
//!
//! Runs on the submit-ready requests, the same data the editor publishes to its
//! listener. The first failing check is reported.

use crate::api::types::EtapaRequest;
use cultivapp_common::{RuleId, StageType};
use std::collections::BTreeSet;
use thiserror::Error;

/// Minimum number of stages a species needs
pub const MIN_STAGES: usize = 3;

/// Minimum number of rules per stage
pub const MIN_RULES_PER_STAGE: usize = 1;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageValidationError {
    #[error("Se requieren al menos 3 etapas")]
    TooFewStages { found: usize },

    #[error("Cada etapa debe tener al menos 1 regla")]
    StageWithoutRules { stage: StageType },

    #[error("La etapa {stage} está repetida")]
    DuplicateStage { stage: StageType },

    #[error("El orden de las etapas debe ir de 1 a {expected} sin huecos ni repeticiones")]
    InvalidOrder { expected: usize },

    #[error("La etapa {stage} usa reglas que no existen: {}", join_ids(.ids))]
    UnknownRules { stage: StageType, ids: Vec<RuleId> },
}

/// Check the structural and per-stage requirements for submission
pub fn validate_stage_requests(requests: &[EtapaRequest]) -> Result<(), StageValidationError> {
    if requests.len() < MIN_STAGES {
        return Err(StageValidationError::TooFewStages {
            found: requests.len(),
        });
    }

    let mut seen = BTreeSet::new();
    for request in requests {
        if !seen.insert(request.nombre) {
            return Err(StageValidationError::DuplicateStage {
                stage: request.nombre,
            });
        }
    }

    let orders: BTreeSet<u32> = requests.iter().map(|r| r.orden).collect();
    let expected: BTreeSet<u32> = (1..=requests.len() as u32).collect();
    if orders != expected {
        return Err(StageValidationError::InvalidOrder {
            expected: requests.len(),
        });
    }

    if let Some(request) = requests
        .iter()
        .find(|r| r.regla_ids.len() < MIN_RULES_PER_STAGE)
    {
        return Err(StageValidationError::StageWithoutRules {
            stage: request.nombre,
        });
    }

    Ok(())
}

/// Check that every referenced rule id exists in `known`
pub fn validate_rule_ids_known(
    requests: &[EtapaRequest],
    known: &BTreeSet<RuleId>,
) -> Result<(), StageValidationError> {
    for request in requests {
        let unknown: Vec<RuleId> = request
            .regla_ids
            .iter()
            .filter(|id| !known.contains(id))
            .copied()
            .collect();
        if !unknown.is_empty() {
            return Err(StageValidationError::UnknownRules {
                stage: request.nombre,
                ids: unknown,
            });
        }
    }
    Ok(())
}

fn join_ids(ids: &[RuleId]) -> String {
    ids.iter()
        .map(RuleId::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::stages::editor::{StageSequence, StageSequenceEditor};

    fn request(nombre: StageType, orden: u32, ids: &[i64]) -> EtapaRequest {
        EtapaRequest {
            nombre,
            especie_id: None,
            duracion_dias: 0,
            orden,
            regla_ids: ids.iter().copied().map(RuleId).collect(),
        }
    }

    #[test]
    fn test_species_edit_scenario() {
        let mut editor = StageSequenceEditor::new(StageSequence::default());
        editor.toggle_stage(StageType::Siembra);
        editor.toggle_stage(StageType::Floracion);

        let err = validate_stage_requests(&editor.build_requests(None)).unwrap_err();
        assert_eq!(err.to_string(), "Se requieren al menos 3 etapas");

        editor.toggle_stage(StageType::Cosecha);
        let err = validate_stage_requests(&editor.build_requests(None)).unwrap_err();
        assert_eq!(err.to_string(), "Cada etapa debe tener al menos 1 regla");

        for stage in [StageType::Siembra, StageType::Floracion, StageType::Cosecha] {
            editor.attach_rules(stage, [RuleId(1)]).unwrap();
        }
        assert!(validate_stage_requests(&editor.build_requests(Some(4))).is_ok());
    }

    #[test]
    fn test_too_few_is_reported_first() {
        let err = validate_stage_requests(&[]).unwrap_err();
        assert_eq!(err, StageValidationError::TooFewStages { found: 0 });
    }

    #[test]
    fn test_duplicate_stage_rejected() {
        let requests = vec![
            request(StageType::Siembra, 1, &[1]),
            request(StageType::Floracion, 2, &[1]),
            request(StageType::Siembra, 3, &[1]),
        ];
        assert_eq!(
            validate_stage_requests(&requests),
            Err(StageValidationError::DuplicateStage {
                stage: StageType::Siembra
            })
        );
    }

    #[test]
    fn test_order_must_be_permutation() {
        let requests = vec![
            request(StageType::Siembra, 1, &[1]),
            request(StageType::Floracion, 3, &[1]),
            request(StageType::Cosecha, 4, &[1]),
        ];
        assert_eq!(
            validate_stage_requests(&requests),
            Err(StageValidationError::InvalidOrder { expected: 3 })
        );

        let shuffled = vec![
            request(StageType::Siembra, 2, &[1]),
            request(StageType::Floracion, 3, &[1]),
            request(StageType::Cosecha, 1, &[1]),
        ];
        assert!(validate_stage_requests(&shuffled).is_ok());
    }

    #[test]
    fn test_unknown_rule_ids() {
        let requests = vec![
            request(StageType::Siembra, 1, &[1, 2]),
            request(StageType::Cosecha, 2, &[2, 8, 9]),
        ];
        let known = BTreeSet::from([RuleId(1), RuleId(2)]);

        let err = validate_rule_ids_known(&requests, &known).unwrap_err();
        assert_eq!(
            err,
            StageValidationError::UnknownRules {
                stage: StageType::Cosecha,
                ids: vec![RuleId(8), RuleId(9)]
            }
        );
        assert!(err.to_string().contains("8, 9"));
        assert!(validate_rule_ids_known(&requests[..1], &known).is_ok());
    }
}
