// ── Keyboard input ────────────────────────────────────────────────────────────
//
// `InputSink` over the Win32 keyboard APIs.  A whole sequence goes through a
// single SendInput call so no real keystroke can land in the middle of it.

#![allow(unsafe_code)]

use windows::Win32::UI::Input::KeyboardAndMouse::{
    GetAsyncKeyState, SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_KEYUP, VIRTUAL_KEY,
};

use super::last_error;
use crate::{
    error::Result,
    input::{InputSink, KeyEvent},
};

/// The interactive desktop's keyboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Input;

fn to_input(event: &KeyEvent) -> INPUT {
    let flags = if event.key_up {
        KEYEVENTF_KEYUP
    } else {
        KEYBD_EVENT_FLAGS(0)
    };
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(event.vk),
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

impl InputSink for Win32Input {
    fn is_key_down(&self, vk: u16) -> bool {
        // SAFETY: GetAsyncKeyState takes a plain key code and has no
        // preconditions.
        let state = unsafe { GetAsyncKeyState(i32::from(vk)) };
        // High bit: key is down now.
        (state as u16) & 0x8000 != 0
    }

    fn send(&self, events: &[KeyEvent]) -> Result<()> {
        let inputs: Vec<INPUT> = events.iter().map(to_input).collect();

        // SAFETY: `inputs` is a fully initialised slice of keyboard INPUTs
        // that outlives the call, and cbsize matches the element type.
        let sent = unsafe { SendInput(&inputs, std::mem::size_of::<INPUT>() as i32) };
        if sent as usize != inputs.len() {
            // Typically UIPI: a higher-integrity window has the foreground.
            return Err(last_error("SendInput"));
        }
        Ok(())
    }
}
