use std::path::PathBuf;
use std::time::Duration;

pub const MAIN_WINDOW_LABEL: &str = "main";
pub const POPUP_WINDOW_LABEL: &str = "popup";

/// Size cap for the rotating log file (1 MiB)
pub const LOG_MAX_FILE_BYTES: u128 = 1024 * 1024;
pub const LOG_FILE_NAME: &str = "middle-peek";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

/// Built-in application constants. Nothing here is persisted or user-editable.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub main_window: WindowSize,
    pub popup_window: WindowSize,
    /// Distance between the cursor and the popup's top-left corner, on both axes
    pub popup_offset: i32,
    /// Time given to the focused app to update the clipboard after the copy shortcut
    pub clipboard_settle: Duration,
    pub asset_dir: PathBuf,
    pub main_asset: String,
    pub popup_asset: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            main_window: WindowSize { width: 800, height: 600 },
            popup_window: WindowSize { width: 360, height: 160 },
            popup_offset: 20,
            clipboard_settle: Duration::from_millis(100),
            asset_dir: PathBuf::from("ui"),
            main_asset: "index.html".into(),
            popup_asset: "popup.html".into(),
        }
    }
}

impl AppConfig {
    /// Asset directory resolved against the process working directory
    pub fn watched_dir(&self) -> std::io::Result<PathBuf> {
        if self.asset_dir.is_absolute() {
            return Ok(self.asset_dir.clone());
        }
        Ok(std::env::current_dir()?.join(&self.asset_dir))
    }
}
