use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::AppError;
use crate::popup::window::TauriPopupFactory;
use crate::popup::presenter::Presented;
use crate::popup::{Point, PopupFactory, PopupPresenter};

/// Application state as managed by Tauri
pub type ManagedState = AppState<TauriPopupFactory>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Nothing selected (or whitespace only); the popup is left alone
    Empty,
    /// Same text as the previous capture; popup moved and revealed, text not re-sent
    Repeated,
    /// New text delivered and shown
    Shown,
    /// The popup went away before anything could be shown
    Skipped,
}

/// Single owner of the mutable application state
pub struct AppState<F: PopupFactory> {
    last_text: Mutex<String>,
    popup: PopupPresenter<F>,
}

impl<F: PopupFactory> AppState<F> {
    pub fn new(factory: F, popup_offset: i32) -> Self {
        Self {
            last_text: Mutex::new(String::new()),
            popup: PopupPresenter::new(factory, popup_offset),
        }
    }

    pub fn popup(&self) -> &PopupPresenter<F> {
        &self.popup
    }

    /// Present the result of a capture taken with the cursor at `cursor`.
    ///
    /// Overlapping calls are not serialized: whichever finishes last decides
    /// the displayed text and position.
    pub async fn present_capture(
        &self,
        text: String,
        cursor: Point,
    ) -> Result<CaptureOutcome, AppError> {
        if text.trim().is_empty() {
            log::debug!("Capture was empty, nothing to show");
            return Ok(CaptureOutcome::Empty);
        }

        let repeated = *self.lock_last() == text;
        if repeated {
            match self.popup.reveal(cursor).await {
                Ok(Presented::Revealed) => return Ok(CaptureOutcome::Repeated),
                Ok(Presented::Skipped) => {
                    self.lock_last().clear();
                    return Ok(CaptureOutcome::Skipped);
                }
                // Fresh or reloaded popup: the text has to be sent again.
                Ok(Presented::NeedsText | Presented::Delivered) => {}
                Err(e) => {
                    self.lock_last().clear();
                    return Err(e);
                }
            }
        }

        log::info!(
            "Showing popup at ({}, {}) with {} chars",
            cursor.x,
            cursor.y,
            text.chars().count()
        );
        match self.popup.show(&text, cursor).await {
            Ok(Presented::Delivered) => {
                *self.lock_last() = text;
                Ok(CaptureOutcome::Shown)
            }
            Ok(_) => {
                self.lock_last().clear();
                Ok(CaptureOutcome::Skipped)
            }
            Err(e) => {
                self.lock_last().clear();
                Err(e)
            }
        }
    }

    /// Hide the popup if `point` falls outside it. Returns whether it hid.
    pub fn dismiss_at(&self, point: Point) -> Result<bool, AppError> {
        if !self.popup.is_visible() || self.popup.contains(point) {
            return Ok(false);
        }
        log::debug!("Click at ({}, {}) outside popup, hiding", point.x, point.y);
        self.popup.hide()
    }

    /// The popup document is being reloaded and has lost its content
    pub fn handle_popup_reloaded(&self) {
        self.popup.mark_unready();
        self.lock_last().clear();
    }

    fn lock_last(&self) -> MutexGuard<'_, String> {
        self.last_text.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::popup::presenter::testing::FakeFactory;
    use std::sync::Arc;
    use std::time::Duration;

    fn unready_state() -> (Arc<AppState<Arc<FakeFactory>>>, Arc<FakeFactory>) {
        let factory = Arc::new(FakeFactory::default());
        (Arc::new(AppState::new(factory.clone(), 20)), factory)
    }

    fn state() -> (AppState<Arc<FakeFactory>>, Arc<FakeFactory>) {
        let factory = Arc::new(FakeFactory::default());
        let state = AppState::new(factory.clone(), 20);
        state.popup().mark_ready();
        (state, factory)
    }

    #[tokio::test]
    async fn middle_click_shows_captured_text_offset_from_cursor() {
        let (state, factory) = state();

        let outcome = state
            .present_capture("hello".into(), Point::new(100, 100))
            .await
            .unwrap();

        assert_eq!(outcome, CaptureOutcome::Shown);
        assert_eq!(factory.created(), 1);
        let popup = factory.latest();
        let popup = popup.lock().unwrap();
        assert!(popup.visible);
        assert_eq!(popup.position, Some(Point::new(120, 120)));
        assert_eq!(popup.text.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn repeated_text_repositions_without_redelivering() {
        let (state, factory) = state();
        state
            .present_capture("hello".into(), Point::new(100, 100))
            .await
            .unwrap();

        let outcome = state
            .present_capture("hello".into(), Point::new(200, 200))
            .await
            .unwrap();

        assert_eq!(outcome, CaptureOutcome::Repeated);
        assert_eq!(factory.created(), 1);
        let popup = factory.latest();
        let popup = popup.lock().unwrap();
        assert!(popup.visible);
        assert_eq!(popup.position, Some(Point::new(220, 220)));
        assert_eq!(popup.texts_delivered, 1);
    }

    #[tokio::test]
    async fn empty_capture_leaves_popup_untouched() {
        let (state, factory) = state();

        let outcome = state
            .present_capture("  \n".into(), Point::new(10, 10))
            .await
            .unwrap();

        assert_eq!(outcome, CaptureOutcome::Empty);
        assert_eq!(factory.created(), 0);
    }

    #[tokio::test]
    async fn new_text_replaces_previous() {
        let (state, factory) = state();
        state.present_capture("first".into(), Point::new(0, 0)).await.unwrap();
        state.present_capture("second".into(), Point::new(0, 0)).await.unwrap();

        let popup = factory.latest();
        let popup = popup.lock().unwrap();
        assert_eq!(popup.text.as_deref(), Some("second"));
        assert_eq!(popup.texts_delivered, 2);
    }

    #[tokio::test]
    async fn click_outside_hides_popup() {
        let (state, factory) = state();
        state.present_capture("hello".into(), Point::new(100, 100)).await.unwrap();

        assert!(state.dismiss_at(Point::new(10, 10)).unwrap());
        assert!(!factory.latest().lock().unwrap().visible);
    }

    #[tokio::test]
    async fn click_inside_keeps_popup_unchanged() {
        let (state, factory) = state();
        state.present_capture("hello".into(), Point::new(100, 100)).await.unwrap();

        assert!(!state.dismiss_at(Point::new(200, 150)).unwrap());
        assert!(!state.dismiss_at(Point::new(120, 120)).unwrap());
        assert!(!state.dismiss_at(Point::new(480, 280)).unwrap());

        let popup = factory.latest();
        let popup = popup.lock().unwrap();
        assert!(popup.visible);
        assert_eq!(popup.position, Some(Point::new(120, 120)));
        assert_eq!(popup.shows, 1);
    }

    #[tokio::test]
    async fn dismiss_without_popup_is_a_no_op() {
        let (state, factory) = state();
        assert!(!state.dismiss_at(Point::new(0, 0)).unwrap());
        assert_eq!(factory.created(), 0);
    }

    #[tokio::test]
    async fn reload_forgets_last_text() {
        let (state, factory) = state();
        state.present_capture("hello".into(), Point::new(0, 0)).await.unwrap();

        state.handle_popup_reloaded();
        assert!(!state.popup().is_ready());
        state.popup().mark_ready();

        let outcome = state
            .present_capture("hello".into(), Point::new(0, 0))
            .await
            .unwrap();
        assert_eq!(outcome, CaptureOutcome::Shown);
        assert_eq!(factory.latest().lock().unwrap().texts_delivered, 2);
    }

    #[tokio::test]
    async fn same_text_after_popup_recreated_is_delivered_again() {
        let (state, factory) = unready_state();
        state.popup().mark_ready();
        state.present_capture("hello".into(), Point::new(100, 100)).await.unwrap();

        factory.latest().lock().unwrap().destroyed = true;

        let task = {
            let state = state.clone();
            tokio::spawn(async move {
                state.present_capture("hello".into(), Point::new(200, 200)).await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        state.popup().mark_ready();

        assert_eq!(task.await.unwrap().unwrap(), CaptureOutcome::Shown);
        assert_eq!(factory.created(), 2);
        let popup = factory.latest();
        let popup = popup.lock().unwrap();
        assert!(popup.visible);
        assert_eq!(popup.text.as_deref(), Some("hello"));
        assert_eq!(popup.position, Some(Point::new(220, 220)));
    }

    #[tokio::test]
    async fn failed_show_does_not_count_as_last_text() {
        let (state, factory) = state();
        state.present_capture("first".into(), Point::new(0, 0)).await.unwrap();
        factory.latest().lock().unwrap().fail_show = true;

        assert!(state.present_capture("second".into(), Point::new(0, 0)).await.is_err());
        factory.latest().lock().unwrap().fail_show = false;

        let outcome = state
            .present_capture("second".into(), Point::new(0, 0))
            .await
            .unwrap();
        assert_eq!(outcome, CaptureOutcome::Shown);
    }

    #[tokio::test]
    async fn destroyed_while_pending_is_skipped_and_forgotten() {
        let (state, factory) = unready_state();
        let task = {
            let state = state.clone();
            tokio::spawn(async move { state.present_capture("hello".into(), Point::new(0, 0)).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        factory.latest().lock().unwrap().destroyed = true;
        state.popup().mark_ready();

        assert_eq!(task.await.unwrap().unwrap(), CaptureOutcome::Skipped);

        state.popup().mark_ready();
        let outcome = state
            .present_capture("hello".into(), Point::new(0, 0))
            .await
            .unwrap();
        assert_eq!(outcome, CaptureOutcome::Shown);
        assert_eq!(factory.created(), 2);
        assert_eq!(factory.latest().lock().unwrap().text.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn overlapping_captures_share_one_pending_popup() {
        let (state, factory) = unready_state();

        let spawn_capture = |text: &'static str, at: Point| {
            let state = state.clone();
            tokio::spawn(async move { state.present_capture(text.into(), at).await })
        };
        let first = spawn_capture("first", Point::new(10, 10));
        let second = spawn_capture("second", Point::new(300, 300));
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(factory.created(), 1);
        assert!(!factory.latest().lock().unwrap().visible);

        state.popup().mark_ready();
        assert_eq!(first.await.unwrap().unwrap(), CaptureOutcome::Shown);
        assert_eq!(second.await.unwrap().unwrap(), CaptureOutcome::Shown);

        assert_eq!(factory.created(), 1);
        let popup = factory.latest();
        let popup = popup.lock().unwrap();
        assert!(popup.visible);
        assert_eq!(popup.texts_delivered, 2);
        let text = popup.text.as_deref().unwrap();
        assert!(text == "first" || text == "second", "unexpected text {}", text);
        let expected_at = if text == "first" { Point::new(30, 30) } else { Point::new(320, 320) };
        assert_eq!(popup.position, Some(expected_at));
    }
}
