use std::any::Any;

use device_query::{DeviceEvents, DeviceState, MouseButton};
use tauri::AppHandle;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::input::events::{PointerButton, PointerEvent};
use crate::popup::Point;

/// Global mouse-down subscription. Events are forwarded from the listener
/// thread to a dispatcher task on the async runtime; dropping or stopping the
/// monitor unsubscribes.
pub struct InputMonitor {
    subscription: Option<Box<dyn Any + Send + Sync>>,
    dispatcher: tauri::async_runtime::JoinHandle<()>,
}

impl InputMonitor {
    /// Cursor positions are sampled through `app` so they share the physical
    /// pixel space of the popup window's geometry.
    pub fn start<F>(app: AppHandle, on_event: F) -> Result<Self, AppError>
    where
        F: Fn(PointerEvent) + Send + Sync + 'static,
    {
        let device_state = DeviceState::checked_new().ok_or_else(|| {
            AppError::ListenerUnavailable(
                "cannot observe global mouse events; grant accessibility/input permission and restart"
                    .into(),
            )
        })?;

        let (tx, mut rx) = mpsc::unbounded_channel::<PointerEvent>();
        let guard = device_state.on_mouse_down(move |button: &MouseButton| {
            let Some(button) = PointerButton::from_index(*button) else {
                return;
            };
            let at = match cursor_position(&app) {
                Ok(at) => at,
                Err(e) => {
                    log::warn!("Cursor position unavailable, dropping {:?} click: {}", button, e);
                    return;
                }
            };
            if tx.send(PointerEvent { button, at }).is_err() {
                log::debug!("Pointer dispatcher stopped, dropping event");
            }
        });

        let dispatcher = tauri::async_runtime::spawn(async move {
            while let Some(event) = rx.recv().await {
                on_event(event);
            }
        });

        log::info!("Global mouse listener installed");
        Ok(Self {
            subscription: Some(Box::new(guard)),
            dispatcher,
        })
    }

    pub fn stop(mut self) {
        self.subscription.take();
        self.dispatcher.abort();
        log::info!("Global mouse listener removed");
    }
}

fn cursor_position(app: &AppHandle) -> tauri::Result<Point> {
    let position = app.cursor_position()?;
    Ok(Point::new(position.x.round() as i32, position.y.round() as i32))
}
