/// Event name constants for Tauri backend <-> frontend communication
pub const POPUP_READY: &str = "popup:ready";
pub const POPUP_SET_TEXT: &str = "popup:set-text";
