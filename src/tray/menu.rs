use tauri::menu::{Menu, MenuItem, PredefinedMenuItem};
use tauri::tray::TrayIconBuilder;
use tauri::{AppHandle, Manager};

use crate::config::AppConfig;

const SHOW_ID: &str = "show";
const QUIT_ID: &str = "quit";

/// Build the system tray icon with its two-entry menu
pub fn setup_tray(app: &AppHandle) -> Result<(), Box<dyn std::error::Error>> {
    let show = MenuItem::with_id(app, SHOW_ID, "Show Main Window", true, None::<&str>)?;
    let sep = PredefinedMenuItem::separator(app)?;
    let quit = MenuItem::with_id(app, QUIT_ID, "Quit Middle Peek", true, None::<&str>)?;

    let menu = Menu::with_items(app, &[&show, &sep, &quit])?;

    let icon = app
        .default_window_icon()
        .cloned()
        .ok_or("no default window icon configured")?;

    let _tray = TrayIconBuilder::new()
        .icon(icon)
        .menu(&menu)
        .show_menu_on_left_click(true)
        .tooltip("Middle Peek")
        .on_menu_event(move |app, event| match event.id().as_ref() {
            SHOW_ID => {
                let config = app.state::<AppConfig>();
                if let Err(e) = crate::main_window::ensure(app, &config) {
                    log::error!("Failed to show main window: {}", e);
                }
            }
            QUIT_ID => {
                log::info!("Quit requested from tray");
                app.exit(0);
            }
            _ => {}
        })
        .build(app)?;

    Ok(())
}
