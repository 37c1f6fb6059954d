// ── Win32 platform implementation ─────────────────────────────────────────────
//
// This is the only module in the crate where `unsafe` code is permitted.
// Every `unsafe` block MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

use windows::Win32::Foundation::GetLastError;

use crate::error::RegistrarError;

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub mod input; // SendInput / GetAsyncKeyState
pub mod registry; // winreg-backed ConfigStore
pub mod version; // RtlGetVersion

// ── Error helpers ─────────────────────────────────────────────────────────────

/// Capture the current Win32 last-error code and wrap it in a
/// `RegistrarError`.
///
/// Call immediately after a Win32 function that signals failure; any later
/// API call may overwrite the thread-local error code.
pub(crate) fn last_error(function: &'static str) -> RegistrarError {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    // It is always safe to call and never fails.
    let code = unsafe { GetLastError() };
    RegistrarError::Win32 {
        function,
        code: code.0,
    }
}
