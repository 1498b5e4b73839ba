//! `cultivapp tasks` command implementation

use crate::api::ApiClient;
use crate::commands::crops::print_crop;
use crate::config::Config;
use crate::error::Result;
use chrono::Local;
use colored::Colorize;
use tracing::info;

/// Execute a task, then refetch and show its crop
pub async fn run(config: &Config, tarea_id: i64, cultivo_id: i64) -> Result<()> {
    let client = ApiClient::from_config(config)?;

    client.execute_task(tarea_id).await?;
    info!(tarea_id, cultivo_id, "Executed task");
    println!("{} Task {} executed", "✓".green(), tarea_id);

    // Health scores are recomputed by the backend
    let crop = client.get_crop(cultivo_id).await?;
    print_crop(&crop, Local::now().naive_local());
    Ok(())
}
