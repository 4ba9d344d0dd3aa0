//! Synthesized "copy selection" shortcut for the focused application.

use crate::capture::bridge::CopyShortcut;
use crate::error::AppError;

/// Sends the platform copy shortcut: Cmd+C on macOS, Ctrl+C elsewhere
pub struct SystemCopyShortcut;

impl CopyShortcut for SystemCopyShortcut {
    fn send(&self) -> Result<(), AppError> {
        platform::send_copy()
    }
}

#[cfg(target_os = "macos")]
mod platform {
    use core_graphics::event::{CGEvent, CGEventFlags, CGEventTapLocation, CGKeyCode};
    use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};

    use crate::error::AppError;

    const KEY_C: CGKeyCode = 0x08;

    fn accessibility_trusted() -> bool {
        #[link(name = "ApplicationServices", kind = "framework")]
        extern "C" {
            fn AXIsProcessTrusted() -> bool;
        }
        unsafe { AXIsProcessTrusted() }
    }

    pub fn send_copy() -> Result<(), AppError> {
        if !accessibility_trusted() {
            return Err(AppError::Keyboard(
                "accessibility permission not granted".into(),
            ));
        }
        let source = CGEventSource::new(CGEventSourceStateID::HIDSystemState)
            .map_err(|_| AppError::Keyboard("failed to create CGEventSource".into()))?;

        for key_down in [true, false] {
            let event = CGEvent::new_keyboard_event(source.clone(), KEY_C, key_down)
                .map_err(|_| AppError::Keyboard("failed to create key event".into()))?;
            event.set_flags(CGEventFlags::CGEventFlagCommand);
            event.post(CGEventTapLocation::HID);
        }
        Ok(())
    }
}

#[cfg(target_os = "windows")]
mod platform {
    use std::mem;

    use windows::Win32::UI::Input::KeyboardAndMouse::{
        SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS,
        KEYEVENTF_KEYUP, VIRTUAL_KEY, VK_C, VK_CONTROL,
    };

    use crate::error::AppError;

    fn key(vk: VIRTUAL_KEY, flags: KEYBD_EVENT_FLAGS) -> INPUT {
        INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: vk,
                    wScan: 0,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        }
    }

    pub fn send_copy() -> Result<(), AppError> {
        let down = KEYBD_EVENT_FLAGS(0);
        let inputs = [
            key(VK_CONTROL, down),
            key(VK_C, down),
            key(VK_C, KEYEVENTF_KEYUP),
            key(VK_CONTROL, KEYEVENTF_KEYUP),
        ];
        let sent = unsafe { SendInput(&inputs, mem::size_of::<INPUT>() as i32) };
        if sent as usize != inputs.len() {
            return Err(AppError::Keyboard(format!(
                "SendInput injected {} of {} events",
                sent,
                inputs.len()
            )));
        }
        Ok(())
    }
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
mod platform {
    use std::process::Command;

    use crate::error::AppError;

    pub fn send_copy() -> Result<(), AppError> {
        let status = Command::new("xdotool")
            .args(["key", "--clearmodifiers", "ctrl+c"])
            .status()
            .map_err(|e| AppError::Keyboard(format!("failed to run xdotool: {}", e)))?;
        if !status.success() {
            return Err(AppError::Keyboard(format!("xdotool exited with {}", status)));
        }
        Ok(())
    }
}
