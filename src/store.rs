//! The store module
//! Provide a registry of shared keyspaces addressable by name

use crate::error::{Error, Result};
use crate::keyspace::Keyspace;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

/// A named registry of keyspaces.
///
/// The store holds one `Arc` per registered keyspace. Removing a keyspace only
/// drops that reference: anyone else holding the `Arc` keeps a fully working
/// keyspace, even while it is no longer reachable through the store.
///
/// Registry updates are serialized by the store's own lock, which is never held
/// while a keyspace operation runs.
///
/// # Examples
///
/// ```
/// use vecstore::Store;
///
/// let store = Store::new("main");
/// let ks = store.create_keyspace(3, "docs");
///
/// assert_eq!(store.get_keyspace("docs").unwrap().dimension(), 3);
///
/// store.remove_keyspace("docs");
/// assert!(store.get_keyspace("docs").is_err());
/// assert_eq!(ks.dimension(), 3); // still usable by its holder
/// ```
#[derive(Debug)]
pub struct Store {
    name: String,
    keyspaces: RwLock<Vec<Arc<Keyspace>>>,
}

impl Store {
    pub fn new(name: impl Into<String>) -> Store {
        Store { name: name.into(), keyspaces: RwLock::new(Vec::new()) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of registered keyspaces, duplicates included.
    pub fn len(&self) -> usize {
        self.keyspaces.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyspaces.read().is_empty()
    }

    /// Registers a keyspace under its own name.
    ///
    /// Names are not required to be unique. A keyspace whose name is already
    /// taken is registered alongside the existing one, and
    /// [`get_keyspace`](Store::get_keyspace) keeps returning whichever was
    /// registered first.
    pub fn add_keyspace(&self, keyspace: Arc<Keyspace>) {
        let mut keyspaces = self.keyspaces.write();
        if keyspaces.iter().any(|k| k.name() == keyspace.name()) {
            warn!(store = %self.name, keyspace = %keyspace.name(), "duplicate keyspace name registered");
        }
        info!(store = %self.name, keyspace = %keyspace.name(), dimension = keyspace.dimension(), "keyspace registered");
        keyspaces.push(keyspace);
    }

    /// Creates a keyspace, registers it and hands back the shared reference.
    pub fn create_keyspace(&self, dimension: usize, name: impl Into<String>) -> Arc<Keyspace> {
        let keyspace = Arc::new(Keyspace::new(dimension, name));
        self.add_keyspace(Arc::clone(&keyspace));
        keyspace
    }

    /// Unregisters every keyspace called `name` and returns how many were removed.
    ///
    /// Removing a name that is not registered is a no-op.
    pub fn remove_keyspace(&self, name: &str) -> usize {
        let mut keyspaces = self.keyspaces.write();
        let before = keyspaces.len();
        keyspaces.retain(|k| k.name() != name);

        let removed = before - keyspaces.len();
        if removed > 0 {
            info!(store = %self.name, keyspace = %name, removed, "keyspace removed");
        }
        removed
    }

    /// Returns the first keyspace registered under `name`.
    ///
    /// Fails with [`Error::NotFound`] when there is none.
    pub fn get_keyspace(&self, name: &str) -> Result<Arc<Keyspace>> {
        let keyspaces = self.keyspaces.read();
        match keyspaces.iter().find(|k| k.name() == name) {
            Some(keyspace) => Ok(Arc::clone(keyspace)),
            None => {
                warn!(store = %self.name, keyspace = %name, "keyspace lookup failed");
                Err(Error::NotFound(name.to_string()))
            }
        }
    }

    /// Returns a snapshot of the registered keyspaces in registration order.
    pub fn keyspaces(&self) -> Vec<Arc<Keyspace>> {
        self.keyspaces.read().clone()
    }

    /// Returns the names of all registered keyspaces in registration order.
    pub fn keyspace_names(&self) -> Vec<String> {
        self.keyspaces.read().iter().map(|k| k.name().to_string()).collect()
    }
}
