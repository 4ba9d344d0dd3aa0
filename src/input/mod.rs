pub mod dispatch;
pub mod events;
pub mod monitor;

pub use events::{PointerAction, PointerButton, PointerEvent};
pub use monitor::InputMonitor;
