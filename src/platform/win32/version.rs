// ── OS version ────────────────────────────────────────────────────────────────
//
// `GetVersionExW` lies to processes without a compatibility manifest, so the
// version comes straight from the kernel.

#![allow(unsafe_code)]

use windows::{
    Wdk::System::SystemServices::RtlGetVersion,
    Win32::System::SystemInformation::OSVERSIONINFOW,
};

use crate::{
    config::OsVersion,
    error::{RegistrarError, Result},
};

/// Return the real version of the running Windows.
pub fn os_version() -> Result<OsVersion> {
    let mut info = OSVERSIONINFOW {
        dwOSVersionInfoSize: std::mem::size_of::<OSVERSIONINFOW>() as u32,
        ..Default::default()
    };

    // SAFETY: `info` is a properly sized, initialised OSVERSIONINFOW that
    // outlives the call; RtlGetVersion only writes within it.
    let status = unsafe { RtlGetVersion(&mut info) };
    if status.is_err() {
        return Err(RegistrarError::Win32 {
            function: "RtlGetVersion",
            code: status.0 as u32,
        });
    }

    Ok(OsVersion {
        major: info.dwMajorVersion,
        minor: info.dwMinorVersion,
        build: info.dwBuildNumber,
    })
}
