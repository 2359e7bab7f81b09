//! Resource registry: the name to producer mapping behind a container.
//!
//! The registry is a plain table. Last write wins, aliases are copies of
//! an existing entry, and nothing here ever invokes a producer.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::lifetime::Lifetime;
use crate::value::Value;

/// Type alias for producers.
///
/// A producer takes no arguments and yields a [`Value`] each time it is
/// called. It must be safe to call any number of times.
///
/// # Why `Arc` and not `Box`?
/// Aliasing copies the producer handle, and resolution clones it out of the
/// lock before calling it.
pub type Producer = Arc<dyn Fn() -> Value + Send + Sync>;

/// Anything that can look up a name.
///
/// This is what tag-driven injection receives. Separated from the container
/// so injection can be tested against a plain map.
pub trait Resolver {
    /// Resolves `name`, or `None` if nothing is registered under it.
    fn resolve(&self, name: &str) -> Option<Value>;
}

/// Registration entry for a single name.
#[derive(Clone)]
pub(crate) struct Registration {
    pub producer: Producer,
    pub lifetime: Lifetime,
    /// Set when this entry was copied from another name by `alias`.
    pub aliased_from: Option<String>,
}

impl Registration {
    /// A producer that always yields `value`.
    pub fn constant(value: Value) -> Self {
        Self::new(Arc::new(move || value.clone()), Lifetime::Singleton)
    }

    /// A producer that runs `factory` once, on first call, and replays it after.
    pub fn lazy(factory: Producer) -> Self {
        let cell: OnceCell<Value> = OnceCell::new();
        Self::new(
            Arc::new(move || cell.get_or_init(&*factory).clone()),
            Lifetime::LazySingleton,
        )
    }

    /// A producer that runs `factory` on every call.
    pub fn instance(factory: Producer) -> Self {
        Self::new(factory, Lifetime::Instance)
    }

    fn new(producer: Producer, lifetime: Lifetime) -> Self {
        Self {
            producer,
            lifetime,
            aliased_from: None,
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("lifetime", &self.lifetime)
            .field("aliased_from", &self.aliased_from)
            .finish()
    }
}

/// Stores all registrations of one container.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    registrations: HashMap<String, Registration>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `registration` to `name`, replacing any previous binding.
    pub fn register(&mut self, name: String, registration: Registration) {
        debug!(
            name = %name,
            lifetime = %registration.lifetime,
            shared = registration.lifetime.is_shared(),
            eager = registration.lifetime.is_eager(),
            "Registered resource"
        );
        if self.registrations.insert(name, registration).is_some() {
            debug!("Previous registration overwritten");
        }
    }

    /// Copies the current entry of `origin` under `alias`.
    ///
    /// Returns `false` and leaves `alias` untouched if `origin` is unbound.
    pub fn alias(&mut self, alias: String, origin: &str) -> bool {
        let Some(mut registration) = self.registrations.get(origin).cloned() else {
            debug!(alias = %alias, origin, "Alias origin not registered, skipping");
            return false;
        };

        debug!(alias = %alias, origin, "Registered alias");
        registration.aliased_from = Some(origin.to_owned());
        self.registrations.insert(alias, registration);
        true
    }

    /// Looks up a registration by name.
    pub fn get(&self, name: &str) -> Option<&Registration> {
        self.registrations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registrations.contains_key(name)
    }

    /// Returns the number of registered names.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns true if no names are registered.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registrations.keys().cloned().collect();
        names.sort();
        names
    }
}
