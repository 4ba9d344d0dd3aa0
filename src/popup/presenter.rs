use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::error::AppError;
use crate::popup::geometry::{Point, Rect};

/// A single popup window instance. Implementations must report destruction
/// honestly; the presenter checks `is_destroyed` before every mutation.
pub trait PopupSurface: Send + Sync + 'static {
    fn is_destroyed(&self) -> bool;
    fn bounds(&self) -> Result<Rect, AppError>;
    fn is_visible(&self) -> Result<bool, AppError>;
    fn set_position(&self, top_left: Point) -> Result<(), AppError>;
    fn set_text(&self, text: &str) -> Result<(), AppError>;
    fn show(&self) -> Result<(), AppError>;
    fn hide(&self) -> Result<(), AppError>;
}

/// Creates a new popup surface, hidden and not yet ready
pub trait PopupFactory: Send + Sync + 'static {
    type Surface: PopupSurface;

    fn create(&self) -> Result<Self::Surface, AppError>;
}

/// What a presentation request actually applied to the popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presented {
    /// Text delivered, popup positioned and shown
    Delivered,
    /// Existing text kept, popup positioned and shown
    Revealed,
    /// A reveal found a surface that has never received text; nothing shown
    NeedsText,
    /// The popup was destroyed while waiting for readiness; nothing applied
    Skipped,
}

/// Owns the (at most one) popup window.
///
/// States: absent -> created-not-ready -> ready-hidden <-> ready-visible, and
/// back to absent whenever the surface reports itself destroyed. Readiness is
/// a watch channel flipped by the popup document, so a show request issued
/// before the document loaded simply awaits it.
pub struct PopupPresenter<F: PopupFactory> {
    factory: F,
    offset: i32,
    slot: Mutex<Option<Arc<F::Surface>>>,
    creating: Mutex<()>,
    ready: watch::Sender<bool>,
    has_text: AtomicBool,
}

impl<F: PopupFactory> PopupPresenter<F> {
    pub fn new(factory: F, offset: i32) -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            factory,
            offset,
            slot: Mutex::new(None),
            creating: Mutex::new(()),
            ready,
            has_text: AtomicBool::new(false),
        }
    }

    /// Deliver `text`, move next to `cursor` and reveal. Creates the popup if absent.
    pub async fn show(&self, text: &str, cursor: Point) -> Result<Presented, AppError> {
        self.present(Some(text), cursor).await
    }

    /// Move next to `cursor` and reveal without touching the displayed text.
    /// A surface with no text yet is left hidden and reported as `NeedsText`.
    pub async fn reveal(&self, cursor: Point) -> Result<Presented, AppError> {
        self.present(None, cursor).await
    }

    /// Returns whether the popup was actually hidden
    pub fn hide(&self) -> Result<bool, AppError> {
        let Some(surface) = self.live() else {
            return Ok(false);
        };
        if !surface.is_visible()? {
            return Ok(false);
        }
        surface.hide()?;
        Ok(true)
    }

    pub fn is_visible(&self) -> bool {
        let Some(surface) = self.live() else {
            return false;
        };
        match surface.is_visible() {
            Ok(visible) => visible,
            Err(e) => {
                log::debug!("Popup visibility unavailable: {}", e);
                false
            }
        }
    }

    /// Inclusive hit-test against the popup's bounds at call time
    pub fn contains(&self, point: Point) -> bool {
        let Some(surface) = self.live() else {
            return false;
        };
        match surface.bounds() {
            Ok(bounds) => bounds.contains(point),
            Err(e) => {
                log::debug!("Popup bounds unavailable: {}", e);
                false
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        let ready = *self.ready.borrow();
        ready && self.live().is_some()
    }

    /// The popup document finished loading and can receive text
    pub fn mark_ready(&self) {
        log::debug!("Popup ready");
        self.ready.send_replace(true);
    }

    /// The popup document is (re)loading
    pub fn mark_unready(&self) {
        self.ready.send_replace(false);
        self.has_text.store(false, Ordering::SeqCst);
    }

    async fn present(&self, text: Option<&str>, cursor: Point) -> Result<Presented, AppError> {
        self.ensure_created()?;

        let mut ready = self.ready.subscribe();
        if !*ready.borrow() {
            log::debug!("Popup not ready yet, deferring presentation");
        }
        ready
            .wait_for(|r| *r)
            .await
            .map(|_| ())
            .map_err(|_| AppError::Window("popup readiness channel closed".into()))?;

        // Re-resolve: the surface may have been replaced or destroyed while waiting.
        let Some(surface) = self.live() else {
            log::debug!("Popup destroyed before it could be presented");
            return Ok(Presented::Skipped);
        };
        let presented = match text {
            Some(text) => {
                surface.set_text(text)?;
                self.has_text.store(true, Ordering::SeqCst);
                Presented::Delivered
            }
            None if !self.has_text.load(Ordering::SeqCst) => return Ok(Presented::NeedsText),
            None => Presented::Revealed,
        };
        surface.set_position(cursor.offset(self.offset))?;
        surface.show()?;
        Ok(presented)
    }

    fn ensure_created(&self) -> Result<(), AppError> {
        let _creating = self.creating.lock().unwrap_or_else(PoisonError::into_inner);
        if self.live().is_some() {
            return Ok(());
        }
        // Readiness is already false here: it starts false and `live` clears it
        // whenever a destroyed surface is dropped.
        log::debug!("Creating popup window");
        let surface = self.factory.create()?;
        self.has_text.store(false, Ordering::SeqCst);
        *self.lock_slot() = Some(Arc::new(surface));
        Ok(())
    }

    /// Current surface, or `None` if absent. A destroyed surface is dropped here.
    fn live(&self) -> Option<Arc<F::Surface>> {
        let mut slot = self.lock_slot();
        if slot.as_ref().is_some_and(|s| s.is_destroyed()) {
            log::debug!("Popup window was destroyed");
            *slot = None;
            self.ready.send_replace(false);
            self.has_text.store(false, Ordering::SeqCst);
        }
        slot.clone()
    }

    fn lock_slot(&self) -> MutexGuard<'_, Option<Arc<F::Surface>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Debug, Default)]
    pub struct FakeState {
        pub destroyed: bool,
        pub visible: bool,
        pub position: Option<Point>,
        pub text: Option<String>,
        pub texts_delivered: usize,
        pub shows: usize,
        pub fail_show: bool,
        pub fail_queries: bool,
    }

    pub struct FakeSurface {
        pub state: Arc<Mutex<FakeState>>,
        pub width: u32,
        pub height: u32,
    }

    impl PopupSurface for FakeSurface {
        fn is_destroyed(&self) -> bool {
            self.state.lock().unwrap().destroyed
        }

        fn bounds(&self) -> Result<Rect, AppError> {
            let state = self.state.lock().unwrap();
            if state.fail_queries {
                return Err(AppError::Window("bounds unavailable".into()));
            }
            let at = state.position.unwrap_or(Point::new(0, 0));
            Ok(Rect { x: at.x, y: at.y, width: self.width, height: self.height })
        }

        fn is_visible(&self) -> Result<bool, AppError> {
            let state = self.state.lock().unwrap();
            if state.fail_queries {
                return Err(AppError::Window("visibility unavailable".into()));
            }
            Ok(state.visible)
        }

        fn set_position(&self, top_left: Point) -> Result<(), AppError> {
            self.state.lock().unwrap().position = Some(top_left);
            Ok(())
        }

        fn set_text(&self, text: &str) -> Result<(), AppError> {
            let mut state = self.state.lock().unwrap();
            state.text = Some(text.to_string());
            state.texts_delivered += 1;
            Ok(())
        }

        fn show(&self) -> Result<(), AppError> {
            let mut state = self.state.lock().unwrap();
            if state.fail_show {
                return Err(AppError::Window("show failed".into()));
            }
            state.visible = true;
            state.shows += 1;
            Ok(())
        }

        fn hide(&self) -> Result<(), AppError> {
            self.state.lock().unwrap().visible = false;
            Ok(())
        }
    }

    /// Hands out surfaces whose state the test can inspect via `surfaces`
    #[derive(Default)]
    pub struct FakeFactory {
        pub surfaces: Arc<Mutex<Vec<Arc<Mutex<FakeState>>>>>,
    }

    impl FakeFactory {
        pub fn created(&self) -> usize {
            self.surfaces.lock().unwrap().len()
        }

        pub fn latest(&self) -> Arc<Mutex<FakeState>> {
            self.surfaces.lock().unwrap().last().cloned().expect("no popup created")
        }
    }

    impl PopupFactory for Arc<FakeFactory> {
        type Surface = FakeSurface;

        fn create(&self) -> Result<FakeSurface, AppError> {
            let state = Arc::new(Mutex::new(FakeState::default()));
            self.surfaces.lock().unwrap().push(state.clone());
            Ok(FakeSurface { state, width: 360, height: 160 })
        }
    }
}
