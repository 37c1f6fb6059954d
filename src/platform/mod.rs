// ── Platform abstraction layer ────────────────────────────────────────────────
//
// Binds the portable registrar to the host OS.  No `unsafe` lives here; all
// Win32 FFI is confined to the `win32` sub-module and never leaks outward.

#[cfg(windows)]
pub mod win32;

use crate::{config::AppIdentity, error::Result, registrar::Registrar};
#[cfg(windows)]
use crate::{config::RegistrarConfig, input::InputSink, store::ConfigStore};

/// Build a registrar bound to the registry and real keyboard input.
///
/// The OS version is read once here and folded into the registrar's
/// configuration.
#[cfg(windows)]
pub fn native_registrar(
    identity: AppIdentity,
) -> Result<Registrar<impl ConfigStore, impl InputSink>> {
    let os = win32::version::os_version()?;
    tracing::debug!(major = os.major, minor = os.minor, build = os.build, "host OS version");
    Ok(Registrar::new(
        win32::registry::RegistryStore,
        win32::input::Win32Input,
        RegistrarConfig::new(identity, os),
    ))
}

/// Hosts without the Windows registry cannot register anything.
#[cfg(not(windows))]
pub fn native_registrar(
    _identity: AppIdentity,
) -> Result<Registrar<crate::store::memory::MemoryStore, crate::input::RecordingInput>> {
    Err(crate::error::RegistrarError::Unsupported)
}
