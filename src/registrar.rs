// ── Ease of Access registrar ──────────────────────────────────────────────────
//
// Registers the application as an assistive technology, manages its logon
// auto-start entry, and signals the Ease of Access shell.
//
// Failure policy:
//   • `register`, `notify`, and `set_auto_start` establish new state and
//     propagate every error to the caller.
//   • `is_registered` and `will_auto_start` are queries and answer `false`
//     on any failure.
//   • `unregister` is best-effort cleanup and never fails.

use std::path::Path;

use tracing::{debug, info};

use crate::{
    autostart,
    config::RegistrarConfig,
    error::Result,
    input::{self, InputSink},
    store::{Access, ConfigStore, Scope, StoreKey, View},
};

// ── Registry layout ───────────────────────────────────────────────────────────

/// Shared Ease of Access key; holds the auto-start `Configuration` value.
pub const ROOT_KEY: &str = r"Software\Microsoft\Windows NT\CurrentVersion\Accessibility";

/// Per-user key the shell reads the notify signal from.
pub const TEMP_KEY: &str = r"Software\Microsoft\Windows NT\CurrentVersion\AccessibilityTemp";

// ── Registrar ─────────────────────────────────────────────────────────────────

/// Ease of Access integration for one application identity.
#[derive(Debug)]
pub struct Registrar<S, I> {
    store: S,
    input: I,
    config: RegistrarConfig,
    app_key_path: String,
}

impl<S: ConfigStore, I: InputSink> Registrar<S, I> {
    pub fn new(store: S, input: I, config: RegistrarConfig) -> Self {
        let app_key_path = format!(r"{ROOT_KEY}\ATs\{}", config.identity.app_id);
        Self {
            store,
            input,
            config,
            app_key_path,
        }
    }

    pub fn config(&self) -> &RegistrarConfig {
        &self.config
    }

    /// Path of the registration record under machine scope.
    pub fn app_key_path(&self) -> &str {
        &self.app_key_path
    }

    // ── Registration ──────────────────────────────────────────────────────────

    /// Create or refresh the registration record for an install in
    /// `install_dir`.
    ///
    /// On hosts that cannot keep the application alive across desktop
    /// switches only the proxy launcher is registered, and no profile is
    /// written, which keeps the entry out of the Ease of Access picker.
    pub fn register(&self, install_dir: &Path) -> Result<()> {
        let id = &self.config.identity;
        let key = self
            .store
            .create_key(Scope::Machine, &self.app_key_path, View::Registry64, Access::All)?;

        key.set_string("ApplicationName", &id.application_name)?;
        key.set_string("Description", &id.description)?;

        if self.config.can_configure_terminate_on_desktop_switch {
            let start_exe = install_dir.join(&id.main_exe);
            key.set_string("Profile", &id.profile)?;
            key.set_string("SimpleProfile", &id.simple_profile)?;
            key.set_string("ATExe", &id.main_exe)?;
            key.set_os_string("StartExe", start_exe.as_os_str())?;
            key.set_string("StartParams", &id.start_params)?;
            key.set_u32("TerminateOnDesktopSwitch", 0)?;
        } else {
            let start_exe = install_dir.join(&id.proxy_exe);
            key.set_string("ATExe", &id.proxy_exe)?;
            key.set_os_string("StartExe", start_exe.as_os_str())?;
        }

        info!(app_id = %id.app_id, install_dir = %install_dir.display(), "registered with Ease of Access");
        Ok(())
    }

    /// Remove the registration record and then the machine-wide auto-start
    /// entry.  The auto-start list is left alone when the record could not
    /// be removed.  Safe to call when nothing is registered.
    pub fn unregister(&self) {
        if let Err(e) = self
            .store
            .delete_key(Scope::Machine, &self.app_key_path, View::Registry64)
        {
            debug!(error = %e, "registration record not removed");
            return;
        }
        info!(app_id = %self.config.identity.app_id, "unregistered from Ease of Access");
        if let Err(e) = self.set_auto_start(Scope::Machine, false) {
            debug!(error = %e, "machine auto-start entry not removed");
        }
    }

    pub fn is_registered(&self) -> bool {
        self.store
            .open_key(Scope::Machine, &self.app_key_path, View::Registry64, Access::Read)
            .is_ok()
    }

    // ── Shell notification ────────────────────────────────────────────────────

    /// Hand `signal` to the Ease of Access shell and wake it with
    /// Windows+U.  Does nothing unless registered.
    pub fn notify(&self, signal: u32) -> Result<()> {
        if !self.is_registered() {
            debug!(signal, "not registered, notify skipped");
            return Ok(());
        }

        {
            let key = self
                .store
                .create_key(Scope::User, TEMP_KEY, View::Default, Access::ReadWrite)?;
            key.set_u32(&self.config.identity.app_id, signal)?;
        }

        let events = input::ease_of_access_sequence(&self.input);
        self.input.send(&events)?;
        info!(signal, events = events.len(), "notified Ease of Access");
        Ok(())
    }

    // ── Auto-start ────────────────────────────────────────────────────────────

    /// Whether the application is in `scope`'s logon auto-start list.
    pub fn will_auto_start(&self, scope: Scope) -> bool {
        let raw = self
            .store
            .open_key(scope, ROOT_KEY, View::Registry64, Access::Read)
            .and_then(|key| key.get_string(autostart::CONFIGURATION_VALUE));
        match raw {
            Ok(raw) => autostart::contains(&raw, &self.config.identity.app_id),
            Err(e) => {
                debug!(scope = scope.as_str(), error = %e, "auto-start list unreadable");
                false
            }
        }
    }

    /// Add or remove the application in `scope`'s auto-start list.  The value
    /// is only written when the list actually changes.
    pub fn set_auto_start(&self, scope: Scope, enable: bool) -> Result<()> {
        let key = self
            .store
            .open_key(scope, ROOT_KEY, View::Registry64, Access::ReadWrite)?;

        let mut entries = match key.get_string(autostart::CONFIGURATION_VALUE) {
            Ok(raw) => autostart::parse(&raw),
            Err(_) => Vec::new(),
        };

        if !autostart::set_membership(&mut entries, &self.config.identity.app_id, enable) {
            debug!(scope = scope.as_str(), enable, "auto-start list unchanged");
            return Ok(());
        }

        key.set_string(autostart::CONFIGURATION_VALUE, &autostart::join(&entries))?;
        info!(scope = scope.as_str(), enable, "auto-start list updated");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
