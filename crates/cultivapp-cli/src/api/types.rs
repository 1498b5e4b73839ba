//! API request and response types
//!
//! Field names follow the backend's camelCase JSON.

use chrono::{NaiveDate, NaiveDateTime};
use cultivapp_common::progress::{cycle_percent, CropProgressSnapshot};
use cultivapp_common::tasks::{TaskSchedule, TaskStatus};
use cultivapp_common::{CropStatus, RuleId, RuleType, StageType};
use serde::{Deserialize, Serialize};

/// One submit-ready stage record (`POST /api/etapas/batch` element)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtapaRequest {
    pub nombre: StageType,
    pub especie_id: Option<i64>,
    pub duracion_dias: u32,
    pub orden: u32,
    pub regla_ids: Vec<RuleId>,
}

/// Stage as stored by the backend for a species
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtapaSummary {
    pub id: i64,
    pub nombre: StageType,
    pub orden: u32,
    #[serde(default)]
    pub duracion_dias: Option<u32>,
}

/// Body for rule creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRule {
    pub descripcion: String,
    pub tipo: RuleType,
    pub intervalo_dias: u32,
}

/// Species fields embedded in a crop payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EspecieInfo {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub nombre_cientifico: Option<String>,
    #[serde(default)]
    pub ciclo_dias: Option<u32>,
    #[serde(default)]
    pub total_etapas: Option<i64>,
}

/// A scheduled maintenance task of a crop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tarea {
    pub id: i64,
    #[serde(default)]
    pub descripcion_regla: Option<String>,
    #[serde(default)]
    pub fecha_programada: Option<NaiveDateTime>,
    #[serde(default)]
    pub fecha_vencimiento: Option<NaiveDateTime>,
    #[serde(default)]
    pub realizada: bool,
    #[serde(default)]
    pub vencida: bool,
}

impl Tarea {
    pub fn schedule(&self) -> TaskSchedule {
        TaskSchedule {
            fecha_programada: self.fecha_programada,
            fecha_vencimiento: self.fecha_vencimiento,
            realizada: self.realizada,
            vencida: self.vencida,
        }
    }

    pub fn status(&self, now: NaiveDateTime) -> TaskStatus {
        self.schedule().status(now)
    }
}

/// Crop read payload (`GET /api/cultivos/{id}` and list endpoints)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cultivo {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub fecha_siembra: Option<NaiveDate>,
    #[serde(default)]
    pub area_hectareas: Option<f64>,
    #[serde(default)]
    pub estado: Option<CropStatus>,
    /// Index of the current stage within the species' sequence
    #[serde(default)]
    pub etapa_actual: Option<i64>,
    #[serde(default)]
    pub especie: Option<EspecieInfo>,
    #[serde(default)]
    pub salud_riego: Option<f64>,
    #[serde(default)]
    pub salud_fertilizacion: Option<f64>,
    #[serde(default)]
    pub salud_mantenimiento: Option<f64>,
    #[serde(default)]
    pub tareas: Vec<Tarea>,
    #[serde(default)]
    pub notas: Option<String>,
}

impl Cultivo {
    /// Progress snapshot; missing numbers count as zero.
    pub fn progress_snapshot(&self) -> CropProgressSnapshot {
        let total_stages = self
            .especie
            .as_ref()
            .and_then(|e| e.total_etapas)
            .unwrap_or(0);

        CropProgressSnapshot::new(
            self.etapa_actual.unwrap_or(0),
            total_stages,
            self.salud_riego.unwrap_or(0.0),
            self.salud_fertilizacion.unwrap_or(0.0),
            self.salud_mantenimiento.unwrap_or(0.0),
        )
    }

    /// Share of the growth cycle elapsed since sowing
    pub fn cycle_percent(&self, today: NaiveDate) -> u8 {
        cycle_percent(
            self.fecha_siembra,
            self.especie.as_ref().and_then(|e| e.ciclo_dias),
            today,
        )
    }

    pub fn is_archived(&self) -> bool {
        self.estado.is_some_and(CropStatus::is_archived)
    }
}
