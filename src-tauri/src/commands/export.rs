use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::ClassGridShellError;
use crate::export;

fn export_dir() -> Result<PathBuf, ClassGridShellError> {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| ClassGridShellError::Export("No downloads directory available".into()))
}

/// Save a PNG data URL captured by the page. Returns the written path.
#[tauri::command]
pub async fn save_schedule_image(data_url: String, file_name: String) -> Result<String, String> {
    info!("Saving schedule image as {}", file_name);
    let dir = export_dir()?;

    let path = export::save_snapshot(&dir, &data_url, &file_name).map_err(|e| {
        warn!("Schedule export failed: {}", e);
        ClassGridShellError::Export(e.to_string())
    })?;

    info!("Schedule exported to {}", path.display());
    Ok(path.to_string_lossy().into_owned())
}
