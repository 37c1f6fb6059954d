// ── Registrar configuration ───────────────────────────────────────────────────
//
// What the registrar writes (the application identity) and what the host can
// do (the OS capability flag).  The capability is computed once by the caller
// from the OS version and handed in; nothing here reads global state.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{RegistrarError, Result};

// ── Identity ──────────────────────────────────────────────────────────────────

/// Identity strings written into the Ease of Access registration.
///
/// Every field has a default, so an identity file only needs the fields it
/// overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppIdentity {
    /// Key name under `ATs`; also the auto-start list entry and the name of
    /// the notify value.
    pub app_id: String,
    /// `ApplicationName` value.
    pub application_name: String,
    /// `Description` value.
    pub description: String,
    /// Main executable, registered as `ATExe` on capable hosts.
    pub main_exe: String,
    /// Launcher shim registered on hosts that cannot keep the main
    /// executable alive across desktop switches.
    pub proxy_exe: String,
    /// `StartParams` value.
    pub start_params: String,
    /// `Profile` value (HCI model fragment).
    pub profile: String,
    /// `SimpleProfile` value.
    pub simple_profile: String,
}

impl Default for AppIdentity {
    fn default() -> Self {
        Self {
            app_id: "nvda_nvda_v1".to_owned(),
            application_name: "NVDA".to_owned(),
            description: "NonVisual Desktop Access".to_owned(),
            main_exe: "nvda.exe".to_owned(),
            proxy_exe: "nvda_eoaProxy.exe".to_owned(),
            start_params: "--ease-of-access".to_owned(),
            profile: r#"<HCIModel><Accommodation type="severe vision"/></HCIModel>"#.to_owned(),
            simple_profile: "screenreader".to_owned(),
        }
    }
}

impl AppIdentity {
    /// Read an identity override file (JSON).  Missing fields keep their
    /// defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path).map_err(RegistrarError::Io)?;
        Ok(serde_json::from_slice(&data)?)
    }
}

// ── OS capability ─────────────────────────────────────────────────────────────

/// Host OS version as reported by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OsVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
}

/// First version (Windows 8 = 6.2) whose Ease of Access Center honours
/// `TerminateOnDesktopSwitch` and can launch the full application.
const DESKTOP_SWITCH_BASELINE: (u32, u32) = (6, 2);

/// Whether the host can keep the registered application running across
/// desktop switches.  Only major/minor take part in the comparison.
pub fn supports_terminate_on_desktop_switch(version: OsVersion) -> bool {
    (version.major, version.minor) >= DESKTOP_SWITCH_BASELINE
}

// ── RegistrarConfig ───────────────────────────────────────────────────────────

/// Everything a `Registrar` needs besides its store and input sink.
#[derive(Debug, Clone)]
pub struct RegistrarConfig {
    pub identity: AppIdentity,
    pub os: OsVersion,
    /// Result of `supports_terminate_on_desktop_switch` for this host.
    pub can_configure_terminate_on_desktop_switch: bool,
}

impl RegistrarConfig {
    pub fn new(identity: AppIdentity, os: OsVersion) -> Self {
        Self {
            identity,
            os,
            can_configure_terminate_on_desktop_switch: supports_terminate_on_desktop_switch(os),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn v(major: u32, minor: u32) -> OsVersion {
        OsVersion {
            major,
            minor,
            build: 0,
        }
    }

    #[test]
    fn windows_7_lacks_capability() {
        assert!(!supports_terminate_on_desktop_switch(v(6, 1)));
    }

    #[test]
    fn windows_8_and_later_have_capability() {
        assert!(supports_terminate_on_desktop_switch(v(6, 2)));
        assert!(supports_terminate_on_desktop_switch(v(6, 3)));
        assert!(supports_terminate_on_desktop_switch(v(10, 0)));
    }

    #[test]
    fn minor_only_matters_within_same_major() {
        assert!(!supports_terminate_on_desktop_switch(v(5, 9)));
        assert!(supports_terminate_on_desktop_switch(v(7, 0)));
    }

    #[test]
    fn config_new_computes_flag() {
        let cfg = RegistrarConfig::new(AppIdentity::default(), v(6, 1));
        assert!(!cfg.can_configure_terminate_on_desktop_switch);
    }

    /// A partial identity file only overrides what it names.
    #[test]
    fn partial_identity_keeps_defaults() {
        let json = r#"{"app_id":"acme_reader_v2","application_name":"Acme"}"#;
        let id: AppIdentity = serde_json::from_str(json).expect("deserialize");
        assert_eq!(id.app_id, "acme_reader_v2");
        assert_eq!(id.application_name, "Acme");
        assert_eq!(id.main_exe, "nvda.exe");
        assert_eq!(id.simple_profile, "screenreader");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = AppIdentity::load(Path::new("definitely/not/here/identity.json"))
            .expect_err("missing file");
        assert!(matches!(err, RegistrarError::Io(_)));
    }
}
