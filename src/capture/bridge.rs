use std::time::Duration;

use tauri::AppHandle;
use tauri_plugin_clipboard_manager::ClipboardExt;

use crate::error::AppError;

pub trait CopyShortcut: Send + Sync + 'static {
    fn send(&self) -> Result<(), AppError>;
}

pub trait ClipboardReader: Send + Sync + 'static {
    fn read_text(&self) -> Result<String, AppError>;
}

/// Reads the system clipboard through the clipboard-manager plugin
pub struct TauriClipboard {
    app: AppHandle,
}

impl TauriClipboard {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl ClipboardReader for TauriClipboard {
    fn read_text(&self) -> Result<String, AppError> {
        self.app
            .clipboard()
            .read_text()
            .map_err(|e| AppError::Clipboard(e.to_string()))
    }
}

/// Copy-then-read. The clipboard update races the synthesized keystroke, so
/// a capture can return stale content; it is read exactly once.
pub struct ClipboardBridge<K, C> {
    keys: K,
    clipboard: C,
    settle: Duration,
}

impl<K: CopyShortcut, C: ClipboardReader> ClipboardBridge<K, C> {
    pub fn new(keys: K, clipboard: C, settle: Duration) -> Self {
        Self { keys, clipboard, settle }
    }

    /// Fails only if the shortcut could not be sent. An unreadable clipboard
    /// yields an empty string.
    pub async fn capture(&self) -> Result<String, AppError> {
        self.keys.send()?;
        tokio::time::sleep(self.settle).await;

        match self.clipboard.read_text() {
            Ok(text) => Ok(text),
            Err(e) => {
                log::warn!("{}", e);
                Ok(String::new())
            }
        }
    }
}
