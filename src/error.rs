use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Window error: {0}")]
    Window(String),

    #[error("Keyboard simulation failed: {0}")]
    Keyboard(String),

    #[error("Clipboard read failed: {0}")]
    Clipboard(String),

    #[error("Global input listener unavailable: {0}")]
    ListenerUnavailable(String),

    #[error("File watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Tauri error: {0}")]
    Tauri(#[from] tauri::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
