// ── Registry-backed configuration store ───────────────────────────────────────
//
// `ConfigStore` over the Windows registry.  `winreg::RegKey` closes its
// handle on drop, which gives the scoped-handle guarantee for free.

use std::ffi::OsStr;

use winreg::{
    enums::{
        HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_ALL_ACCESS, KEY_READ, KEY_WOW64_64KEY,
        KEY_WRITE,
    },
    RegKey,
};

use crate::{
    error::Result,
    store::{Access, ConfigStore, Scope, StoreKey, View},
};

/// The live registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryStore;

fn root(scope: Scope) -> RegKey {
    RegKey::predef(match scope {
        Scope::Machine => HKEY_LOCAL_MACHINE,
        Scope::User => HKEY_CURRENT_USER,
    })
}

fn view_flags(view: View) -> u32 {
    match view {
        View::Default => 0,
        View::Registry64 => KEY_WOW64_64KEY,
    }
}

fn sam(view: View, access: Access) -> u32 {
    let rights = match access {
        Access::Read => KEY_READ,
        Access::ReadWrite => KEY_READ | KEY_WRITE,
        Access::All => KEY_ALL_ACCESS,
    };
    rights | view_flags(view)
}

impl ConfigStore for RegistryStore {
    type Key = RegistryKey;

    fn create_key(&self, scope: Scope, path: &str, view: View, access: Access) -> Result<RegistryKey> {
        let (key, _) = root(scope).create_subkey_with_flags(path, sam(view, access))?;
        Ok(RegistryKey(key))
    }

    fn open_key(&self, scope: Scope, path: &str, view: View, access: Access) -> Result<RegistryKey> {
        let key = root(scope).open_subkey_with_flags(path, sam(view, access))?;
        Ok(RegistryKey(key))
    }

    fn delete_key(&self, scope: Scope, path: &str, view: View) -> Result<()> {
        root(scope).delete_subkey_with_flags(path, view_flags(view))?;
        Ok(())
    }
}

/// An open registry key.
#[derive(Debug)]
pub struct RegistryKey(RegKey);

impl StoreKey for RegistryKey {
    fn get_string(&self, name: &str) -> Result<String> {
        Ok(self.0.get_value::<String, _>(name)?)
    }

    fn set_string(&self, name: &str, value: &str) -> Result<()> {
        self.0.set_value(name, &value.to_owned())?;
        Ok(())
    }

    fn set_os_string(&self, name: &str, value: &OsStr) -> Result<()> {
        self.0.set_value(name, &value.to_os_string())?;
        Ok(())
    }

    fn set_u32(&self, name: &str, value: u32) -> Result<()> {
        self.0.set_value(name, &value)?;
        Ok(())
    }
}
