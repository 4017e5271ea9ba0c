//! Shared processor and contract registries.
//!
//! [`Registry`] maps a key to a shared `Arc` handle. Entries live for the
//! lifetime of the registry; [`put`](Registry::put) overwrites silently.
//! [`ProcessorState`] bundles the two namespaces a running processor needs.

use std::fmt::{self, Debug, Display, Formatter};
use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::key::IdentityKey;

/// Concurrent map from a key to a shared object.
///
/// Stored objects are never copied: [`get`](Self::get) hands out another
/// reference to the same allocation.
pub struct Registry<K, T: ?Sized>(DashMap<K, Arc<T>>);

/// Processors keyed by `{abi_name}_{options_signature}`.
pub type ProcessorRegistry<P> = Registry<String, P>;

/// Contract wrappers keyed by [`IdentityKey`].
pub type ContractRegistry<C> = Registry<IdentityKey, C>;

impl<K: Eq + Hash, T: ?Sized> Registry<K, T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self(DashMap::new())
    }

    /// Looks up an entry. A miss is not an error.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<Arc<T>> {
        self.0.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Stores an entry, replacing any previous value under `key`.
    pub fn put(&self, key: K, value: Arc<T>)
    where
        K: Display,
    {
        #[cfg(feature = "telemetry")]
        tracing::trace!(key = %key, replaced = self.0.contains_key(&key), "Registry put");

        self.0.insert(key, value);
    }

    /// Returns the entry under `key`, creating it with `init` if absent.
    ///
    /// The lookup and the insert happen under one entry lock, so concurrent
    /// callers for the same key all receive the same object. `init` must not
    /// touch this registry. If `init` fails nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns whatever `init` returns.
    pub fn get_or_try_insert_with<E, F>(&self, key: K, init: F) -> Result<Arc<T>, E>
    where
        F: FnOnce(&K) -> Result<Arc<T>, E>,
    {
        match self.0.entry(key) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let value = init(entry.key())?;
                Ok(Arc::clone(entry.insert(value).value()))
            }
        }
    }

    /// Returns `true` if an entry exists under `key`.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the registry holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Eq + Hash, T: ?Sized> Default for Registry<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Display, T: ?Sized> Debug for Registry<K, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self.0.iter().map(|entry| entry.key().to_string()).collect();
        f.debug_tuple("Registry").field(&keys).finish()
    }
}

/// Process-wide processor state: registered processors and bound contracts.
///
/// Constructed once at startup and shared by reference with every binding
/// call site. `P` and `C` may be trait objects.
pub struct ProcessorState<P: ?Sized, C: ?Sized> {
    processors: ProcessorRegistry<P>,
    contracts: ContractRegistry<C>,
}

impl<P: ?Sized, C: ?Sized> ProcessorState<P, C> {
    /// Creates empty state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            processors: Registry::new(),
            contracts: Registry::new(),
        }
    }

    /// Returns the processor namespace.
    #[must_use]
    pub const fn processors(&self) -> &ProcessorRegistry<P> {
        &self.processors
    }

    /// Returns the contract namespace.
    #[must_use]
    pub const fn contracts(&self) -> &ContractRegistry<C> {
        &self.contracts
    }
}

impl<P: ?Sized, C: ?Sized> Default for ProcessorState<P, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ?Sized, C: ?Sized> Debug for ProcessorState<P, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorState")
            .field("processors", &self.processors)
            .field("contracts", &self.contracts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_overwrite() {
        let registry: Registry<String, str> = Registry::new();
        assert!(registry.get(&"k".to_owned()).is_none());

        let first: Arc<str> = Arc::from("obj1");
        registry.put("k".to_owned(), Arc::clone(&first));
        let got = registry.get(&"k".to_owned()).unwrap();
        assert!(Arc::ptr_eq(&got, &first));

        registry.put("k".to_owned(), Arc::from("obj2"));
        assert_eq!(&*registry.get(&"k".to_owned()).unwrap(), "obj2");
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&"never".to_owned()).is_none());
    }

    #[test]
    fn test_state_namespaces_are_independent() {
        let state: ProcessorState<u32, u32> = ProcessorState::new();
        state.processors().put("ERC20_sig".to_owned(), Arc::new(1));
        assert!(state.contracts().is_empty());
        assert_eq!(state.processors().get(&"ERC20_sig".to_owned()).as_deref(), Some(&1));
    }

    #[test]
    fn test_get_or_try_insert_keeps_first_value() {
        let registry: Registry<String, str> = Registry::new();
        let first = registry
            .get_or_try_insert_with("k".to_owned(), |_| Ok::<_, ()>(Arc::from("obj1")))
            .unwrap();
        let second = registry
            .get_or_try_insert_with("k".to_owned(), |_| -> Result<Arc<str>, ()> {
                panic!("init must not run for an existing key")
            })
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let err = registry.get_or_try_insert_with("bad".to_owned(), |key| Err(key.clone()));
        assert_eq!(err.unwrap_err(), "bad");
        assert!(!registry.contains(&"bad".to_owned()));
    }

    #[test]
    fn test_debug_lists_keys() {
        let registry: Registry<String, u8> = Registry::new();
        registry.put("only".to_owned(), Arc::new(0));
        assert_eq!(format!("{registry:?}"), "Registry([\"only\"])");
    }
}
