//! Common types used across CultivApp

use crate::error::CultivappError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// Stage Types
// ============================================================================

/// A growth stage from the fixed stage-type catalog.
///
/// Serialized with the backend's enum names (`SIEMBRA`, `DESARROLLO_VEGETATIVO`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageType {
    Preparacion,
    Siembra,
    Germinacion,
    DesarrolloVegetativo,
    Floracion,
    Fructificacion,
    Maduracion,
    Cosecha,
}

impl StageType {
    /// Every stage type, in canonical growth order.
    pub const ALL: [StageType; 8] = [
        StageType::Preparacion,
        StageType::Siembra,
        StageType::Germinacion,
        StageType::DesarrolloVegetativo,
        StageType::Floracion,
        StageType::Fructificacion,
        StageType::Maduracion,
        StageType::Cosecha,
    ];

    /// Backend identifier
    pub fn code(self) -> &'static str {
        match self {
            StageType::Preparacion => "PREPARACION",
            StageType::Siembra => "SIEMBRA",
            StageType::Germinacion => "GERMINACION",
            StageType::DesarrolloVegetativo => "DESARROLLO_VEGETATIVO",
            StageType::Floracion => "FLORACION",
            StageType::Fructificacion => "FRUCTIFICACION",
            StageType::Maduracion => "MADURACION",
            StageType::Cosecha => "COSECHA",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            StageType::Preparacion => "Preparación",
            StageType::Siembra => "Siembra",
            StageType::Germinacion => "Germinación",
            StageType::DesarrolloVegetativo => "Desarrollo Vegetativo",
            StageType::Floracion => "Floración",
            StageType::Fructificacion => "Fructificación",
            StageType::Maduracion => "Maduración",
            StageType::Cosecha => "Cosecha",
        }
    }
}

impl std::fmt::Display for StageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for StageType {
    type Err = CultivappError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        StageType::ALL
            .into_iter()
            .find(|stage| stage.code() == normalized)
            .ok_or_else(|| CultivappError::UnknownStageType(s.to_string()))
    }
}

// ============================================================================
// Rule Types
// ============================================================================

/// Maintenance rule category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleType {
    Mantenimiento,
    Riego,
    Cosecha,
    Fertilizacion,
    Preparacion,
    Siembra,
}

impl RuleType {
    pub const ALL: [RuleType; 6] = [
        RuleType::Mantenimiento,
        RuleType::Riego,
        RuleType::Cosecha,
        RuleType::Fertilizacion,
        RuleType::Preparacion,
        RuleType::Siembra,
    ];

    pub fn code(self) -> &'static str {
        match self {
            RuleType::Mantenimiento => "MANTENIMIENTO",
            RuleType::Riego => "RIEGO",
            RuleType::Cosecha => "COSECHA",
            RuleType::Fertilizacion => "FERTILIZACION",
            RuleType::Preparacion => "PREPARACION",
            RuleType::Siembra => "SIEMBRA",
        }
    }

    /// Health category scored from tasks of this rule type, if any.
    pub fn health_category(self) -> Option<HealthCategory> {
        match self {
            RuleType::Riego => Some(HealthCategory::Riego),
            RuleType::Fertilizacion => Some(HealthCategory::Fertilizacion),
            RuleType::Mantenimiento => Some(HealthCategory::Mantenimiento),
            RuleType::Cosecha | RuleType::Preparacion | RuleType::Siembra => None,
        }
    }
}

impl std::fmt::Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RuleType {
    type Err = CultivappError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        RuleType::ALL
            .into_iter()
            .find(|tipo| tipo.code() == normalized)
            .ok_or_else(|| CultivappError::UnknownRuleType(s.to_string()))
    }
}

/// Rule identifier assigned by the rule catalog service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub i64);

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RuleId {
    type Err = CultivappError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(RuleId)
            .map_err(|_| CultivappError::InvalidRuleId(s.to_string()))
    }
}

impl From<i64> for RuleId {
    fn from(id: i64) -> Self {
        RuleId(id)
    }
}

/// A maintenance rule from the catalog. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: RuleId,
    pub descripcion: String,
    pub tipo: RuleType,
    /// Recurrence interval in days
    pub intervalo_dias: u32,
}

// ============================================================================
// Crop Types
// ============================================================================

/// Lifecycle state of a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CropStatus {
    Activo,
    Cosechado,
    Perdido,
}

impl CropStatus {
    /// Harvested and lost crops are read-only.
    pub fn is_archived(self) -> bool {
        matches!(self, CropStatus::Cosechado | CropStatus::Perdido)
    }
}

impl std::fmt::Display for CropStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CropStatus::Activo => write!(f, "ACTIVO"),
            CropStatus::Cosechado => write!(f, "COSECHADO"),
            CropStatus::Perdido => write!(f, "PERDIDO"),
        }
    }
}

impl FromStr for CropStatus {
    type Err = CultivappError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVO" => Ok(CropStatus::Activo),
            "COSECHADO" => Ok(CropStatus::Cosechado),
            "PERDIDO" => Ok(CropStatus::Perdido),
            _ => Err(CultivappError::UnknownCropStatus(s.to_string())),
        }
    }
}

/// Maintenance category with a backend-computed 0-100 health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthCategory {
    Riego,
    Fertilizacion,
    Mantenimiento,
}

impl HealthCategory {
    pub const ALL: [HealthCategory; 3] = [
        HealthCategory::Riego,
        HealthCategory::Fertilizacion,
        HealthCategory::Mantenimiento,
    ];

    pub fn label(self) -> &'static str {
        match self {
            HealthCategory::Riego => "Riego",
            HealthCategory::Fertilizacion => "Fertilización",
            HealthCategory::Mantenimiento => "Mantenimiento",
        }
    }
}
