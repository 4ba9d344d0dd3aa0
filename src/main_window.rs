use tauri::{AppHandle, Manager};

use crate::config::{AppConfig, MAIN_WINDOW_LABEL};
use crate::error::AppError;

/// Show and focus the main window, creating it if it does not exist
pub fn ensure(app: &AppHandle, config: &AppConfig) -> Result<(), AppError> {
    if let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) {
        window.show()?;
        window.set_focus()?;
        return Ok(());
    }

    log::info!("Creating main window");
    let url = tauri::WebviewUrl::App(config.main_asset.clone().into());
    tauri::WebviewWindowBuilder::new(app, MAIN_WINDOW_LABEL, url)
        .title("Middle Peek")
        .inner_size(config.main_window.width as f64, config.main_window.height as f64)
        .resizable(true)
        .center()
        .build()?;
    Ok(())
}
