use serde::Serialize;
use tauri::webview::PageLoadEvent;
use tauri::{AppHandle, Emitter, Manager, PhysicalPosition, WebviewUrl, WebviewWindow, WebviewWindowBuilder};

use crate::config::{AppConfig, WindowSize, POPUP_WINDOW_LABEL};
use crate::error::AppError;
use crate::events::POPUP_SET_TEXT;
use crate::popup::geometry::{Point, Rect};
use crate::popup::presenter::{PopupFactory, PopupSurface};
use crate::state::app_state::ManagedState;

#[derive(Debug, Clone, Serialize)]
struct PopupText<'a> {
    text: &'a str,
}

/// Builds the frameless, always-on-top popup webview
pub struct TauriPopupFactory {
    app: AppHandle,
    size: WindowSize,
    asset: String,
}

impl TauriPopupFactory {
    pub fn new(app: AppHandle, config: &AppConfig) -> Self {
        Self {
            app,
            size: config.popup_window,
            asset: config.popup_asset.clone(),
        }
    }
}

impl PopupFactory for TauriPopupFactory {
    type Surface = TauriPopup;

    fn create(&self) -> Result<TauriPopup, AppError> {
        let url = WebviewUrl::App(self.asset.clone().into());
        WebviewWindowBuilder::new(&self.app, POPUP_WINDOW_LABEL, url)
            .title("Middle Peek")
            .inner_size(self.size.width as f64, self.size.height as f64)
            .decorations(false)
            .always_on_top(true)
            .skip_taskbar(true)
            .resizable(false)
            .focused(false)
            .visible(false)
            .on_page_load(|window, payload| {
                // A (re)load invalidates readiness until the document reports back.
                if matches!(payload.event(), PageLoadEvent::Started) {
                    if let Some(state) = window.try_state::<ManagedState>() {
                        state.popup().mark_unready();
                    }
                }
            })
            .build()
            .map_err(window_err)?;

        Ok(TauriPopup { app: self.app.clone() })
    }
}

/// Handle to the popup window, resolved by label on every call so a closed
/// window reads as destroyed instead of failing.
pub struct TauriPopup {
    app: AppHandle,
}

impl TauriPopup {
    fn window(&self) -> Option<WebviewWindow> {
        self.app.get_webview_window(POPUP_WINDOW_LABEL)
    }

    fn with_window(
        &self,
        op: &str,
        f: impl FnOnce(&WebviewWindow) -> tauri::Result<()>,
    ) -> Result<(), AppError> {
        match self.window() {
            Some(window) => f(&window).map_err(window_err),
            None => {
                log::debug!("Skipping popup {}: window destroyed", op);
                Ok(())
            }
        }
    }
}

impl PopupSurface for TauriPopup {
    fn is_destroyed(&self) -> bool {
        self.window().is_none()
    }

    fn bounds(&self) -> Result<Rect, AppError> {
        let window = self
            .window()
            .ok_or_else(|| AppError::Window("popup destroyed".into()))?;
        let position = window.outer_position().map_err(window_err)?;
        let size = window.outer_size().map_err(window_err)?;
        Ok(Rect {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        })
    }

    fn is_visible(&self) -> Result<bool, AppError> {
        match self.window() {
            Some(window) => window.is_visible().map_err(window_err),
            None => Ok(false),
        }
    }

    fn set_position(&self, top_left: Point) -> Result<(), AppError> {
        self.with_window("position", |w| {
            w.set_position(PhysicalPosition::new(top_left.x, top_left.y))
        })
    }

    fn set_text(&self, text: &str) -> Result<(), AppError> {
        self.with_window("text", |w| {
            w.emit_to(POPUP_WINDOW_LABEL, POPUP_SET_TEXT, PopupText { text })
        })
    }

    fn show(&self) -> Result<(), AppError> {
        self.with_window("show", |w| w.show())
    }

    fn hide(&self) -> Result<(), AppError> {
        self.with_window("hide", |w| w.hide())
    }
}

fn window_err(e: tauri::Error) -> AppError {
    AppError::Window(e.to_string())
}
