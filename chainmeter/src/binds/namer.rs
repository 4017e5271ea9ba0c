//! Sequential display names per ABI.

/// Mints deterministic display names for unnamed contracts of one ABI.
///
/// Names take the form `{abi_name}_{n}` where `n` starts at the configured
/// base and grows by one per allocation. Numbers are never reused: the
/// counter is 128 bits wide, so no sequence starting from a `u64` base can
/// run out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractNamer {
    abi_name: String,
    next: u128,
}

impl ContractNamer {
    /// Creates an allocator whose first name carries sequence number `start`.
    pub fn new(abi_name: impl Into<String>, start: u64) -> Self {
        Self {
            abi_name: abi_name.into(),
            next: u128::from(start),
        }
    }

    /// Returns the ABI name this allocator serves.
    #[must_use]
    pub fn abi_name(&self) -> &str {
        &self.abi_name
    }

    /// Returns the sequence number the next call to [`next_name`](Self::next_name) will use.
    #[must_use]
    pub const fn peek(&self) -> u128 {
        self.next
    }

    /// Allocates the next name.
    pub fn next_name(&mut self) -> String {
        let name = format!("{}_{}", self.abi_name, self.next);
        self.next += 1;
        name
    }
}
