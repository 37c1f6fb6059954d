//! Ease of Access Center integration for a Windows screen reader.
//!
//! [`registrar::Registrar`] registers the application as an assistive
//! technology, toggles its logon auto-start entry, and signals the Ease of
//! Access shell.  The registry and keyboard are reached through the
//! [`store::ConfigStore`] and [`input::InputSink`] traits;
//! [`platform::native_registrar`] binds them to the real OS.

// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32` (Win32 FFI).
// Each unsafe block in that module MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

pub mod autostart;
pub mod config;
pub mod error;
pub mod input;
pub mod platform;
pub mod registrar;
pub mod store;
