use crate::config::GridConfig;
use tauri::State;
use tracing::info;

/// Grid resolved once at startup.
pub struct GridState(pub GridConfig);

#[tauri::command]
pub fn get_grid_config(state: State<'_, GridState>) -> Result<GridConfig, String> {
    info!(
        "Serving grid config: {} days x {} slots",
        state.0.days.len(),
        state.0.time_slots.len()
    );
    Ok(state.0.clone())
}
