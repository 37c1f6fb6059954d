// ── In-memory configuration store ─────────────────────────────────────────────
//
// A `ConfigStore` backed by a map, used to exercise the registrar without a
// registry.  It is single-threaded (`Rc<RefCell<..>>`) like the registrar
// itself, counts every value write, and can deny access per scope to model
// an unelevated caller.

use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
    ffi::OsStr,
    io,
    rc::Rc,
};

use super::{Access, ConfigStore, Scope, StoreKey, Value, View};
use crate::error::{RegistrarError, Result};

type KeyId = (Scope, String);

#[derive(Debug, Default)]
struct State {
    keys: BTreeMap<KeyId, BTreeMap<String, Value>>,
    denied: BTreeSet<Scope>,
    read_only: BTreeSet<Scope>,
    writes: usize,
}

/// Shared-state store double.  Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Rc<RefCell<State>>,
}

/// Registry paths are case-insensitive.
fn normalize(path: &str) -> String {
    path.to_ascii_lowercase()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every open, create, or delete in `scope` fails `AccessDenied`.
    pub fn deny(&self, scope: Scope) {
        self.state.borrow_mut().denied.insert(scope);
    }

    /// Opens for read succeed in `scope`; anything needing write access
    /// fails `AccessDenied`.
    pub fn make_read_only(&self, scope: Scope) {
        self.state.borrow_mut().read_only.insert(scope);
    }

    /// Seed a value directly, creating the key.  Not counted as a write.
    pub fn insert(&self, scope: Scope, path: &str, name: &str, value: Value) {
        self.state
            .borrow_mut()
            .keys
            .entry((scope, normalize(path)))
            .or_default()
            .insert(name.to_owned(), value);
    }

    pub fn contains_key(&self, scope: Scope, path: &str) -> bool {
        self.state
            .borrow()
            .keys
            .contains_key(&(scope, normalize(path)))
    }

    pub fn value(&self, scope: Scope, path: &str, name: &str) -> Option<Value> {
        self.state
            .borrow()
            .keys
            .get(&(scope, normalize(path)))
            .and_then(|values| values.get(name).cloned())
    }

    /// Number of `set_*` calls that reached the store.
    pub fn writes(&self) -> usize {
        self.state.borrow().writes
    }

    fn check(&self, scope: Scope, access: Access) -> Result<()> {
        let state = self.state.borrow();
        if state.denied.contains(&scope) {
            return Err(RegistrarError::AccessDenied);
        }
        if access.can_write() && state.read_only.contains(&scope) {
            return Err(RegistrarError::AccessDenied);
        }
        Ok(())
    }

    fn handle(&self, id: KeyId, access: Access) -> MemoryKey {
        MemoryKey {
            state: Rc::clone(&self.state),
            id,
            access,
        }
    }
}

impl ConfigStore for MemoryStore {
    type Key = MemoryKey;

    fn create_key(&self, scope: Scope, path: &str, _view: View, access: Access) -> Result<MemoryKey> {
        self.check(scope, access)?;
        let id = (scope, normalize(path));
        self.state.borrow_mut().keys.entry(id.clone()).or_default();
        Ok(self.handle(id, access))
    }

    fn open_key(&self, scope: Scope, path: &str, _view: View, access: Access) -> Result<MemoryKey> {
        self.check(scope, access)?;
        let id = (scope, normalize(path));
        if !self.state.borrow().keys.contains_key(&id) {
            return Err(RegistrarError::NotFound);
        }
        Ok(self.handle(id, access))
    }

    fn delete_key(&self, scope: Scope, path: &str, _view: View) -> Result<()> {
        self.check(scope, Access::All)?;
        match self.state.borrow_mut().keys.remove(&(scope, normalize(path))) {
            Some(_) => Ok(()),
            None => Err(RegistrarError::NotFound),
        }
    }
}

/// Handle onto a `MemoryStore` key.  Writes through a read-only handle fail
/// the same way the registry does.
#[derive(Debug)]
pub struct MemoryKey {
    state: Rc<RefCell<State>>,
    id: KeyId,
    access: Access,
}

impl MemoryKey {
    fn set(&self, name: &str, value: Value) -> Result<()> {
        if !self.access.can_write() {
            return Err(RegistrarError::AccessDenied);
        }
        let mut state = self.state.borrow_mut();
        // The key may have been deleted while this handle was open.
        let values = state.keys.get_mut(&self.id).ok_or(RegistrarError::NotFound)?;
        values.insert(name.to_owned(), value);
        state.writes += 1;
        Ok(())
    }
}

impl StoreKey for MemoryKey {
    fn get_string(&self, name: &str) -> Result<String> {
        let state = self.state.borrow();
        match state.keys.get(&self.id).and_then(|values| values.get(name)) {
            Some(Value::String(s)) => Ok(s.clone()),
            // Wrong type reads the way winreg reports it.
            Some(Value::U32(_)) => Err(RegistrarError::Store(io::Error::other(
                "value is not a string",
            ))),
            None => Err(RegistrarError::NotFound),
        }
    }

    fn set_string(&self, name: &str, value: &str) -> Result<()> {
        self.set(name, Value::String(value.to_owned()))
    }

    // Values are held as `String`, so only Unicode data is accepted here.
    fn set_os_string(&self, name: &str, value: &OsStr) -> Result<()> {
        let value = value.to_str().ok_or_else(|| {
            RegistrarError::Store(io::Error::new(
                io::ErrorKind::InvalidData,
                "value is not valid Unicode",
            ))
        })?;
        self.set(name, Value::String(value.to_owned()))
    }

    fn set_u32(&self, name: &str, value: u32) -> Result<()> {
        self.set(name, Value::U32(value))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = r"Software\Acme";

    #[test]
    fn open_missing_key_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .open_key(Scope::User, PATH, View::Default, Access::Read)
            .expect_err("missing");
        assert!(err.is_not_found());
    }

    #[test]
    fn create_then_write_then_read() {
        let store = MemoryStore::new();
        let key = store
            .create_key(Scope::User, PATH, View::Default, Access::All)
            .expect("create");
        key.set_string("Name", "Acme").expect("write");
        drop(key);

        let key = store
            .open_key(Scope::User, PATH, View::Default, Access::Read)
            .expect("open");
        assert_eq!(key.get_string("Name").expect("read"), "Acme");
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn os_string_write_keeps_path_text() {
        let store = MemoryStore::new();
        let key = store
            .create_key(Scope::Machine, PATH, View::Registry64, Access::All)
            .expect("create");
        key.set_os_string("StartExe", OsStr::new(r"C:\Program Files\Ünïcode\app.exe"))
            .expect("write");
        assert_eq!(
            store.value(Scope::Machine, PATH, "StartExe"),
            Some(Value::String(r"C:\Program Files\Ünïcode\app.exe".to_owned()))
        );
        assert_eq!(store.writes(), 1);
    }

    /// A write through a handle whose key was deleted fails and is not
    /// counted.
    #[test]
    fn write_to_deleted_key_is_not_counted() {
        let store = MemoryStore::new();
        let key = store
            .create_key(Scope::User, PATH, View::Default, Access::All)
            .expect("create");
        store
            .delete_key(Scope::User, PATH, View::Default)
            .expect("delete");
        let err = key.set_u32("X", 1).expect_err("deleted");
        assert!(err.is_not_found());
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn paths_are_case_insensitive() {
        let store = MemoryStore::new();
        store.insert(Scope::Machine, PATH, "X", Value::U32(1));
        assert!(store.contains_key(Scope::Machine, &PATH.to_uppercase()));
        assert!(!store.contains_key(Scope::User, PATH));
    }

    #[test]
    fn read_only_handle_rejects_writes() {
        let store = MemoryStore::new();
        store.insert(Scope::User, PATH, "X", Value::U32(1));
        let key = store
            .open_key(Scope::User, PATH, View::Default, Access::Read)
            .expect("open");
        let err = key.set_u32("X", 2).expect_err("read-only");
        assert!(matches!(err, RegistrarError::AccessDenied));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn read_only_scope_allows_read_but_not_write_open() {
        let store = MemoryStore::new();
        store.insert(Scope::Machine, PATH, "X", Value::U32(1));
        store.make_read_only(Scope::Machine);
        assert!(store
            .open_key(Scope::Machine, PATH, View::Registry64, Access::Read)
            .is_ok());
        assert!(matches!(
            store.open_key(Scope::Machine, PATH, View::Registry64, Access::ReadWrite),
            Err(RegistrarError::AccessDenied)
        ));
    }

    #[test]
    fn delete_missing_key_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .delete_key(Scope::Machine, PATH, View::Registry64)
            .expect_err("missing");
        assert!(err.is_not_found());
    }

    #[test]
    fn u32_value_is_not_a_string() {
        let store = MemoryStore::new();
        store.insert(Scope::User, PATH, "X", Value::U32(7));
        let key = store
            .open_key(Scope::User, PATH, View::Default, Access::Read)
            .expect("open");
        assert!(matches!(key.get_string("X"), Err(RegistrarError::Store(_))));
    }
}
