pub mod capture;
pub mod config;
pub mod dev;
pub mod error;
pub mod events;
pub mod input;
pub mod logging;
pub mod main_window;
pub mod popup;
pub mod state;
pub mod tray;

use std::sync::{Arc, Mutex, PoisonError};

use tauri::{Listener, Manager, RunEvent};

use crate::capture::{ClipboardBridge, SystemCopyShortcut, TauriClipboard};
use crate::config::AppConfig;
use crate::dev::watcher::DevWatcher;
use crate::input::InputMonitor;
use crate::popup::window::TauriPopupFactory;
use crate::state::app_state::ManagedState;

/// Long-lived subscriptions torn down at exit
struct Services {
    input: Mutex<Option<InputMonitor>>,
    _watcher: Mutex<Option<DevWatcher>>,
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let app = tauri::Builder::default()
        .plugin(logging::plugin())
        .plugin(tauri_plugin_clipboard_manager::init())
        .setup(|app| {
            let config = AppConfig::default();
            let handle = app.handle().clone();

            app.manage(config.clone());
            app.manage(ManagedState::new(
                TauriPopupFactory::new(handle.clone(), &config),
                config.popup_offset,
            ));

            let ready_handle = handle.clone();
            app.listen_any(events::POPUP_READY, move |_event| {
                if let Some(state) = ready_handle.try_state::<ManagedState>() {
                    state.popup().mark_ready();
                }
            });

            main_window::ensure(&handle, &config)?;
            tray::menu::setup_tray(&handle)?;

            let bridge = Arc::new(ClipboardBridge::new(
                SystemCopyShortcut,
                TauriClipboard::new(handle.clone()),
                config.clipboard_settle,
            ));
            let dispatch_handle = handle.clone();
            let monitor = InputMonitor::start(handle.clone(), move |event| {
                input::dispatch::handle_event(&dispatch_handle, &bridge, event);
            })
            .inspect_err(|e| log::error!("Cannot start: {}", e))?;

            let watcher = if cfg!(debug_assertions) {
                match dev::watcher::start(handle.clone(), &config) {
                    Ok(watcher) => Some(watcher),
                    Err(e) => {
                        log::warn!("UI reload watcher disabled: {}", e);
                        None
                    }
                }
            } else {
                None
            };

            app.manage(Services {
                input: Mutex::new(Some(monitor)),
                _watcher: Mutex::new(watcher),
            });
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app, event| match event {
        // On macOS the app stays in the tray after its last window closes
        // and restores the main window when re-activated.
        #[cfg(target_os = "macos")]
        RunEvent::Reopen { has_visible_windows, .. } => {
            if !has_visible_windows {
                let config = app.state::<AppConfig>();
                if let Err(e) = main_window::ensure(app, &config) {
                    log::error!("Failed to restore main window: {}", e);
                }
            }
        }
        #[cfg(target_os = "macos")]
        RunEvent::ExitRequested { api, code: None, .. } => {
            api.prevent_exit();
        }
        RunEvent::Exit => {
            if let Some(services) = app.try_state::<Services>() {
                let monitor = services
                    .input
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take();
                if let Some(monitor) = monitor {
                    monitor.stop();
                }
            }
        }
        _ => {}
    });
}
