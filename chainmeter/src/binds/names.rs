//! Identity key to display name memoization.

use std::fmt;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::key::IdentityKey;
use super::namer::ContractNamer;

/// Remembers the display name assigned to each contract identity.
///
/// The first request for a key decides its name; later requests return the
/// cached name even if they supply a different explicit one. Unnamed
/// contracts get the next name from their ABI's [`ContractNamer`].
///
/// Lookup and insertion of a key happen under one map-entry lock, so
/// concurrent callers can never assign two names to the same identity.
pub struct NameRegistry {
    names: DashMap<IdentityKey, String>,
    namers: DashMap<String, ContractNamer>,
    sequence_start: u64,
}

impl NameRegistry {
    /// Creates an empty registry whose allocators start at `sequence_start`.
    #[must_use]
    pub fn new(sequence_start: u64) -> Self {
        Self {
            names: DashMap::new(),
            namers: DashMap::new(),
            sequence_start,
        }
    }

    /// Returns the name cached for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &IdentityKey) -> Option<String> {
        self.names.get(key).map(|name| name.value().clone())
    }

    /// Returns the name for `key`, assigning one on first use.
    ///
    /// An empty explicit name counts as absent.
    pub fn resolve(&self, key: IdentityKey, explicit_name: Option<&str>) -> String {
        match self.names.entry(key) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                let name = match explicit_name.filter(|name| !name.is_empty()) {
                    Some(name) => name.to_owned(),
                    None => self.allocate(entry.key().abi_name()),
                };

                #[cfg(feature = "telemetry")]
                tracing::debug!(key = %entry.key(), name = %name, "Assigned contract name");

                entry.insert(name).value().clone()
            }
        }
    }

    fn allocate(&self, abi_name: &str) -> String {
        self.namers
            .entry(abi_name.to_owned())
            .or_insert_with(|| ContractNamer::new(abi_name, self.sequence_start))
            .next_name()
    }

    /// Returns the number of named identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no identity has been named yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for NameRegistry {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Debug for NameRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameRegistry")
            .field("names", &self.names.len())
            .field("namers", &self.namers.len())
            .field("sequence_start", &self.sequence_start)
            .finish()
    }
}
