use std::sync::Arc;

use tauri::{AppHandle, Manager};

use crate::capture::{ClipboardBridge, SystemCopyShortcut, TauriClipboard};
use crate::input::events::{PointerAction, PointerEvent};
use crate::popup::Point;
use crate::state::app_state::{CaptureOutcome, ManagedState};

pub type SystemBridge = ClipboardBridge<SystemCopyShortcut, TauriClipboard>;

/// Route one global pointer event. Errors are logged and swallowed so the
/// listener keeps running.
pub fn handle_event(app: &AppHandle, bridge: &Arc<SystemBridge>, event: PointerEvent) {
    match event.action() {
        PointerAction::Capture => {
            let app = app.clone();
            let bridge = bridge.clone();
            tauri::async_runtime::spawn(async move {
                capture_and_present(&app, &bridge, event.at).await;
            });
        }
        PointerAction::DismissCheck => {
            let state = app.state::<ManagedState>();
            if let Err(e) = state.dismiss_at(event.at) {
                log::warn!("Failed to hide popup: {}", e);
            }
        }
    }
}

async fn capture_and_present(app: &AppHandle, bridge: &SystemBridge, cursor: Point) {
    let text = match bridge.capture().await {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Capture aborted: {}", e);
            return;
        }
    };

    let state = app.state::<ManagedState>();
    match state.present_capture(text, cursor).await {
        Ok(CaptureOutcome::Repeated) => log::debug!("Same text as last capture, popup moved"),
        Ok(CaptureOutcome::Skipped) => log::debug!("Popup closed before the capture could be shown"),
        Ok(_) => {}
        Err(e) => log::warn!("Failed to present popup: {}", e),
    }
}
