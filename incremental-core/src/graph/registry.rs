//! Token Registry
//!
//! A keyed container that hands out a fresh token per insertion. Cells use
//! it to track their attached readers and observers, and result cells use it
//! to hold the subscriptions that keep their upstream alive. Each entry can
//! later be revoked individually by its token.
//!
//! Tokens come from a per-registry counter and are never reused while the
//! registry lives. Removal is O(1) (`swap_remove`), so there is no ordering
//! guarantee among values.

use indexmap::IndexMap;

/// Handle returned by [`Registry::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(u64);

impl Token {
    /// Get the raw token value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A set of values addressed by monotonically increasing tokens.
#[derive(Debug)]
pub struct Registry<T> {
    items: IndexMap<Token, T>,
    next: u64,
}

impl<T> Registry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
            next: 0,
        }
    }

    /// Insert a value and return its token.
    pub fn add(&mut self, value: T) -> Token {
        let token = Token(self.next);
        self.next += 1;
        self.items.insert(token, value);
        token
    }

    /// Remove the value for `token`, if still present.
    ///
    /// The removed value is handed back so callers can drop it after
    /// releasing any borrow on the registry.
    pub fn remove(&mut self, token: Token) -> Option<T> {
        self.items.swap_remove(&token)
    }

    /// Look up a value by token.
    pub fn get(&self, token: Token) -> Option<&T> {
        self.items.get(&token)
    }

    /// Check whether `token` is still registered.
    pub fn contains(&self, token: Token) -> bool {
        self.items.contains_key(&token)
    }

    /// Iterate the current values.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    /// Iterate the live tokens.
    pub fn tokens(&self) -> impl Iterator<Item = Token> + '_ {
        self.items.keys().copied()
    }

    /// Remove every value, returning them.
    ///
    /// Tokens keep counting from where they were; cleared tokens are not
    /// handed out again.
    pub fn drain(&mut self) -> Vec<T> {
        self.items.drain(..).map(|(_, value)| value).collect()
    }

    /// Remove every value.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of values currently registered.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the registry holds no values.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Clone> Registry<T> {
    /// Copy out the current values.
    ///
    /// Firing edges may add or revoke entries of the registry they were read
    /// from, so propagation always works on a snapshot.
    pub fn snapshot(&self) -> Vec<T> {
        self.items.values().cloned().collect()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
