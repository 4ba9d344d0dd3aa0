use std::path::Path;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tauri::{AppHandle, Manager};

use crate::config::{AppConfig, MAIN_WINDOW_LABEL, POPUP_WINDOW_LABEL};
use crate::error::AppError;
use crate::state::app_state::ManagedState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadTarget {
    Main,
    Popup,
}

impl ReloadTarget {
    /// Which window renders the asset at `path`, if any
    pub fn for_path(path: &Path, config: &AppConfig) -> Option<Self> {
        let asset = |name: &str| config.asset_dir.join(name);
        if path.ends_with(asset(&config.main_asset)) {
            Some(Self::Main)
        } else if path.ends_with(asset(&config.popup_asset)) {
            Some(Self::Popup)
        } else {
            None
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Main => MAIN_WINDOW_LABEL,
            Self::Popup => POPUP_WINDOW_LABEL,
        }
    }
}

/// Keeps the file watcher alive; dropping it stops watching
pub struct DevWatcher {
    _watcher: RecommendedWatcher,
}

pub fn start(app: AppHandle, config: &AppConfig) -> Result<DevWatcher, AppError> {
    let dir = config.watched_dir()?;
    let assets = config.clone();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            if matches!(event.kind, EventKind::Access(_)) {
                return;
            }
            for path in &event.paths {
                if let Some(target) = ReloadTarget::for_path(path, &assets) {
                    reload(&app, target, path);
                }
            }
        }
        Err(e) => log::warn!("Asset watch error: {}", e),
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;

    log::info!("Watching {} for UI changes", dir.display());
    Ok(DevWatcher { _watcher: watcher })
}

fn reload(app: &AppHandle, target: ReloadTarget, path: &Path) {
    let Some(window) = app.get_webview_window(target.label()) else {
        log::debug!("{} changed but {:?} window is not open", path.display(), target);
        return;
    };
    if target == ReloadTarget::Popup {
        if let Some(state) = app.try_state::<ManagedState>() {
            state.handle_popup_reloaded();
        }
    }
    match window.eval("window.location.reload()") {
        Ok(()) => log::info!("Reloaded {:?} window after {} changed", target, path.display()),
        Err(e) => log::warn!("Failed to reload {:?} window: {}", target, e),
    }
}
