//! Registration lifetimes.
//!
//! How often a registered producer builds its value:
//! - [`Lifetime::Singleton`]: a value fixed at registration time
//! - [`Lifetime::LazySingleton`]: built on first resolve, then cached
//! - [`Lifetime::Instance`]: the factory runs on every resolve
use std::fmt;

/// Defines how a registered producer yields its value.
///
/// # Examples
/// ```
/// use sanduq_container::Lifetime;
///
/// assert!(Lifetime::Singleton.is_shared());
/// assert!(!Lifetime::Instance.is_shared());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// The same captured value on every resolve.
    ///
    /// Registered by `singleton`, `singleton_value` and `tag`.
    Singleton,

    /// Built by a factory on the first resolve, identical afterwards.
    ///
    /// Registered by `singleton_with`.
    LazySingleton,

    /// The factory runs anew on every resolve.
    ///
    /// The container never caches; a factory that wants caching does it
    /// itself.
    Instance,
}

impl Lifetime {
    /// Returns `true` if every resolve observes the same value.
    #[inline]
    pub fn is_shared(&self) -> bool {
        matches!(self, Lifetime::Singleton | Lifetime::LazySingleton)
    }

    /// Returns `true` if the value exists before the first resolve.
    #[inline]
    pub fn is_eager(&self) -> bool {
        matches!(self, Lifetime::Singleton)
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::Singleton => write!(f, "Singleton"),
            Lifetime::LazySingleton => write!(f, "LazySingleton"),
            Lifetime::Instance => write!(f, "Instance"),
        }
    }
}
