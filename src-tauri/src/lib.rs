pub mod config;
mod commands;
mod error;
pub mod export;

pub use config::{GridConfig, StorageScope};

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tauri::Builder::default()
        .invoke_handler(tauri::generate_handler![
            commands::config::get_grid_config,
            commands::export::save_schedule_image,
        ])
        .setup(|app| {
            use tauri::Manager;
            let config_dir = app.path().app_config_dir().ok();
            let grid = config::resolve_grid(config_dir.as_deref());
            app.manage(commands::config::GridState(grid));
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
