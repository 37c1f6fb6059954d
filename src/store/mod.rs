// ── Configuration store abstraction ───────────────────────────────────────────
//
// The registrar talks to the OS configuration store (the Windows registry)
// only through these traits.  Keys are RAII handles: dropping one closes it,
// so no handle outlives the operation that opened it.
//
// `platform::win32::registry` is the real implementation; `memory` is the
// in-process double used by tests.

pub mod memory;

use std::ffi::OsStr;

use crate::error::Result;

// ── Addressing ────────────────────────────────────────────────────────────────

/// Root namespace a key lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
    /// `HKEY_LOCAL_MACHINE`
    Machine,
    /// `HKEY_CURRENT_USER`
    User,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Machine => "machine",
            Self::User => "user",
        }
    }
}

/// Which registry view to address.  A 32-bit process writing the Ease of
/// Access keys must go through the 64-bit view or Windows never sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Whatever view matches the process bitness.
    Default,
    /// The native 64-bit view (`KEY_WOW64_64KEY`).
    Registry64,
}

/// Rights requested when opening or creating a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    ReadWrite,
    All,
}

impl Access {
    pub fn can_write(self) -> bool {
        !matches!(self, Self::Read)
    }
}

/// A typed value stored under a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// `REG_SZ`
    String(String),
    /// `REG_DWORD`
    U32(u32),
}

// ── Traits ────────────────────────────────────────────────────────────────────

/// An open key.  Closed on drop.
pub trait StoreKey {
    /// Read a string value.  Fails `NotFound` when the value is absent.
    fn get_string(&self, name: &str) -> Result<String>;
    fn set_string(&self, name: &str, value: &str) -> Result<()>;
    /// Write a `REG_SZ` straight from an OS string, so paths that are not
    /// valid Unicode reach the store unchanged.
    fn set_os_string(&self, name: &str, value: &OsStr) -> Result<()>;
    fn set_u32(&self, name: &str, value: u32) -> Result<()>;
}

/// A hierarchical key/value store split into scopes.
pub trait ConfigStore {
    type Key: StoreKey;

    /// Open `path`, creating it (and any missing parents) first if needed.
    fn create_key(&self, scope: Scope, path: &str, view: View, access: Access)
        -> Result<Self::Key>;

    /// Open an existing key.  Fails `NotFound` when it does not exist.
    fn open_key(&self, scope: Scope, path: &str, view: View, access: Access) -> Result<Self::Key>;

    /// Delete a key that has no subkeys.
    fn delete_key(&self, scope: Scope, path: &str, view: View) -> Result<()>;
}
