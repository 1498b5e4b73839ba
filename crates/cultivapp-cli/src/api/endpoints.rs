//! API endpoint URL builders
//!
//! Helper functions to construct backend URLs. Query strings are added by the
//! client with `reqwest`'s query builder.

fn api(base_url: &str, path: &str) -> String {
    format!("{}/api/{}", base_url.trim_end_matches('/'), path)
}

/// Stage-type catalog
pub fn stage_types_url(base_url: &str) -> String {
    api(base_url, "etapas/tipos")
}

/// Batch stage creation
pub fn stages_batch_url(base_url: &str) -> String {
    api(base_url, "etapas/batch")
}

/// Configured stages of one species
pub fn stages_by_especie_url(base_url: &str, especie_id: i64) -> String {
    api(base_url, &format!("etapas/especie/{}", especie_id))
}

/// Rule catalog (filter with `?tipo=`)
pub fn rules_url(base_url: &str) -> String {
    api(base_url, "reglas")
}

/// Single rule
pub fn rule_url(base_url: &str, id: i64) -> String {
    api(base_url, &format!("reglas/{}", id))
}

/// Rule-type catalog
pub fn rule_types_url(base_url: &str) -> String {
    api(base_url, "reglas/tipos")
}

/// All crops
pub fn crops_url(base_url: &str) -> String {
    api(base_url, "cultivos")
}

/// Crops owned by one user
pub fn crops_by_usuario_url(base_url: &str, usuario_id: i64) -> String {
    api(base_url, &format!("cultivos/usuario/{}", usuario_id))
}

/// Crop detail
pub fn crop_url(base_url: &str, id: i64) -> String {
    api(base_url, &format!("cultivos/{}", id))
}

/// Task execution
pub fn execute_task_url(base_url: &str) -> String {
    api(base_url, "tareas/ejecutar")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_urls() {
        assert_eq!(
            stage_types_url("http://localhost:8080"),
            "http://localhost:8080/api/etapas/tipos"
        );
        assert_eq!(
            stages_batch_url("http://localhost:8080/"),
            "http://localhost:8080/api/etapas/batch"
        );
        assert_eq!(
            stages_by_especie_url("http://localhost:8080", 7),
            "http://localhost:8080/api/etapas/especie/7"
        );
    }

    #[test]
    fn test_rule_urls() {
        assert_eq!(rules_url("http://h"), "http://h/api/reglas");
        assert_eq!(rule_url("http://h", 3), "http://h/api/reglas/3");
        assert_eq!(rule_types_url("http://h"), "http://h/api/reglas/tipos");
    }

    #[test]
    fn test_crop_and_task_urls() {
        assert_eq!(crops_url("http://h"), "http://h/api/cultivos");
        assert_eq!(crop_url("http://h", 12), "http://h/api/cultivos/12");
        assert_eq!(
            crops_by_usuario_url("http://h", 5),
            "http://h/api/cultivos/usuario/5"
        );
        assert_eq!(execute_task_url("http://h"), "http://h/api/tareas/ejecutar");
    }
}
