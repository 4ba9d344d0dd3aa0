pub mod bridge;
pub mod keyboard;

pub use bridge::{ClipboardBridge, TauriClipboard};
pub use keyboard::SystemCopyShortcut;
