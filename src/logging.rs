use log::LevelFilter;
use tauri_plugin_log::{RotationStrategy, Target, TargetKind};

use crate::config::{LOG_FILE_NAME, LOG_MAX_FILE_BYTES};

/// Console + rotating file logger. `RUST_LOG` may override the level
/// (a single filter such as `debug`, no per-module directives).
pub fn plugin<R: tauri::Runtime>() -> tauri::plugin::TauriPlugin<R> {
    tauri_plugin_log::Builder::new()
        .clear_targets()
        .target(Target::new(TargetKind::Stdout))
        .target(Target::new(TargetKind::LogDir {
            file_name: Some(LOG_FILE_NAME.into()),
        }))
        .max_file_size(LOG_MAX_FILE_BYTES)
        .rotation_strategy(RotationStrategy::KeepOne)
        .level(level_from_env(std::env::var("RUST_LOG").ok().as_deref()))
        .build()
}

fn level_from_env(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}
