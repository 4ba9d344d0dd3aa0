use crate::popup::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

impl PointerButton {
    /// Platform button index as reported by the global listener. X11 numbers
    /// the middle button 2; macOS and Windows number it 3.
    pub fn from_index(index: usize) -> Option<Self> {
        #[cfg(target_os = "linux")]
        const ORDER: [PointerButton; 3] = [PointerButton::Left, PointerButton::Middle, PointerButton::Right];
        #[cfg(not(target_os = "linux"))]
        const ORDER: [PointerButton; 3] = [PointerButton::Left, PointerButton::Right, PointerButton::Middle];

        index.checked_sub(1).and_then(|i| ORDER.get(i)).copied()
    }
}

/// A button press anywhere on screen, with the cursor position at press time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub button: PointerButton,
    pub at: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Capture,
    DismissCheck,
}

impl PointerEvent {
    pub fn action(&self) -> PointerAction {
        match self.button {
            PointerButton::Middle => PointerAction::Capture,
            PointerButton::Left | PointerButton::Right => PointerAction::DismissCheck,
        }
    }
}
