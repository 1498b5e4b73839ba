//! `cultivapp crops` command implementation
//!
//! Shows crop progress, health scores and task status.

use crate::api::{ApiClient, Cultivo};
use crate::config::Config;
use crate::error::Result;
use crate::progress::{percent_pill, render_bar, task_badge, BAR_WIDTH};
use chrono::{Local, NaiveDateTime};
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};

/// List crops with their progress pill
pub async fn list(config: &Config, usuario: Option<i64>) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    let crops = client.list_crops(usuario).await?;

    if crops.is_empty() {
        println!("No crops found");
        return Ok(());
    }

    let today = Local::now().date_naive();
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["ID", "Nombre", "Especie", "Estado", "Progreso", "Ciclo"]);

    for crop in &crops {
        let snapshot = crop.progress_snapshot();
        table.add_row(vec![
            crop.id.to_string(),
            crop.nombre.clone(),
            crop.especie
                .as_ref()
                .map(|e| e.nombre.clone())
                .unwrap_or_else(|| "-".to_string()),
            crop.estado
                .map(|e| e.to_string())
                .unwrap_or_else(|| "-".to_string()),
            format!(
                "{} ({})",
                percent_pill(f64::from(snapshot.overall_percent)),
                snapshot.overall_band()
            ),
            format!("{}%", crop.cycle_percent(today)),
        ]);
    }

    println!("{}", table);
    let archived = crops.iter().filter(|c| c.is_archived()).count();
    println!("\nTotal: {} crop(s), {} archived", crops.len(), archived);
    Ok(())
}

/// Show one crop in detail
pub async fn show(config: &Config, id: i64) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    let crop = client.get_crop(id).await?;
    print_crop(&crop, Local::now().naive_local());
    Ok(())
}

/// Progress bars, health badges and task list for one crop
pub fn print_crop(crop: &Cultivo, now: NaiveDateTime) {
    for line in render_crop(crop, now) {
        println!("{}", line);
    }
}

/// Lines printed by [`print_crop`]; tasks are listed most urgent first
pub fn render_crop(crop: &Cultivo, now: NaiveDateTime) -> Vec<String> {
    let snapshot = crop.progress_snapshot();
    let mut lines = Vec::new();

    lines.push(String::new());
    lines.push("═".repeat(60).blue().to_string());
    lines.push(format!("  {} (#{})", crop.nombre, crop.id).bold().to_string());
    lines.push("═".repeat(60).blue().to_string());

    if let Some(especie) = &crop.especie {
        match &especie.nombre_cientifico {
            Some(scientific) => {
                lines.push(format!("Especie: {} ({})", especie.nombre, scientific.italic()))
            },
            None => lines.push(format!("Especie: {}", especie.nombre)),
        }
    }
    if let Some(estado) = crop.estado {
        let estado_text = estado.to_string();
        if estado.is_archived() {
            lines.push(format!("Estado:  {}", estado_text.dimmed()));
        } else {
            lines.push(format!("Estado:  {}", estado_text.green()));
        }
    }
    if let Some(sown) = crop.fecha_siembra {
        lines.push(format!("Siembra: {}", sown));
    }
    if let Some(area) = crop.area_hectareas {
        lines.push(format!("Área:    {} ha", area));
    }
    lines.push(String::new());

    lines.push(format!(
        "{:<16} {}  etapa {} de {}",
        "Progreso",
        render_bar(f64::from(snapshot.overall_percent), BAR_WIDTH),
        snapshot.current_stage_index,
        snapshot.total_stages
    ));
    lines.push(format!(
        "{:<16} {}",
        "Ciclo",
        render_bar(f64::from(crop.cycle_percent(now.date())), BAR_WIDTH)
    ));
    for score in snapshot.health_scores() {
        lines.push(format!(
            "{:<16} {}",
            format!("Salud {}", score.category.label()),
            render_bar(score.value, BAR_WIDTH)
        ));
    }

    if let Some(notas) = &crop.notas {
        lines.push(String::new());
        lines.push(format!("Notas: {}", notas));
    }

    lines.push(String::new());
    if crop.tareas.is_empty() {
        lines.push("No tasks scheduled".to_string());
        return lines;
    }

    let mut tareas: Vec<_> = crop.tareas.iter().map(|t| (t, t.status(now))).collect();
    tareas.sort_by_key(|(tarea, status)| (status.priority(), tarea.id));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Tarea", "Regla", "Vence", "Estado"]);
    for (tarea, status) in tareas {
        let due = tarea
            .fecha_vencimiento
            .or(tarea.fecha_programada)
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            tarea.id.to_string(),
            tarea.descripcion_regla.clone().unwrap_or_default(),
            due,
            task_badge(status).to_string(),
        ]);
    }
    lines.push(table.to_string());
    lines
}
