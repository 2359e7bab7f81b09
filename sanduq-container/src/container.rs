//! # The Container
//!
//! A string-keyed resource container. Consumers ask for a resource by name,
//! the container runs the producer registered under that name and hands the
//! result back as a [`Value`].
//!
//! # Architecture
//! ```text
//! singleton / singleton_with / instance / tag ──register──>  Registry
//!                                     alias ──copy entry──>     │
//!                                                               │
//!          resolve / resolve_group / call / call_spec <──lookup─┘
//! ```
//!
//! # Concurrency
//! The container is `Send + Sync`. Resolution takes a read lock only to
//! clone the producer handle and runs the producer unlocked, so producers
//! may resolve other names. Registering or resetting while other threads
//! resolve is allowed by the type system but has no ordering guarantee:
//! finish registration before concurrent resolution starts.
//!
//! # Examples
//! ```rust
//! use sanduq_container::prelude::*;
//!
//! #[derive(Debug)]
//! struct UserService {
//!     name: String,
//! }
//!
//! let container = Container::new();
//! container.singleton("UserService", UserService { name: "hello".into() });
//! container.alias("UserServ", "UserService");
//!
//! let service = container.resolve("UserServ").expect("registered");
//! assert_eq!(service.downcast_ref::<UserService>().unwrap().name, "hello");
//!
//! let group = container.resolve_group(&["UserService", "Missing"]);
//! assert!(group[0].is_some());
//! assert!(group[1].is_none());
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use sanduq_support::rendering::suggest_similar;
use tracing::{debug, instrument, trace};

use crate::call::{Arg, Args, Callable, Function};
use crate::error::{ContainerError, Result};
use crate::lifetime::Lifetime;
use crate::provider::{Provider, ProviderRegistry};
use crate::registry::{Producer, Registration, Registry, Resolver};
use crate::tag::{self, TagTable, Tagged};
use crate::value::{IntoValue, Value};

const MAX_SUGGESTIONS: usize = 3;

// ═══════════════════════════════════════════
// ContainerBuilder
// ═══════════════════════════════════════════

/// Collects registrations and builds a populated [`Container`].
///
/// # Examples
/// ```rust
/// use sanduq_container::Container;
///
/// let container = Container::builder()
///     .singleton("config.url", String::from("postgres://localhost"))
///     .instance("request.id", || 7u64)
///     .alias("url", "config.url")
///     .build();
///
/// assert_eq!(container.len(), 3);
/// ```
pub struct ContainerBuilder {
    registry: Registry,
}

impl ContainerBuilder {
    fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    /// Register a pre-built value as a singleton.
    pub fn singleton<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.registry
            .register(name.into(), Registration::constant(Value::new(value)));
        self
    }

    /// Register a shared allocation as a singleton, downcasting to `T`.
    pub fn singleton_arc<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: Arc<T>) -> Self {
        self.registry
            .register(name.into(), Registration::constant(Value::from_arc(value)));
        self
    }

    /// Register a singleton built on first resolve.
    pub fn singleton_with<T, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.registry
            .register(name.into(), Registration::lazy(erase(factory)));
        self
    }

    /// Register a factory that runs on every resolve.
    pub fn instance<T, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.registry
            .register(name.into(), Registration::instance(erase(factory)));
        self
    }

    /// Copy the current registration of `origin` under `alias`.
    ///
    /// Order matters: `origin` must already be registered on this builder.
    pub fn alias(mut self, alias: impl Into<String>, origin: &str) -> Self {
        self.registry.alias(alias.into(), origin);
        self
    }

    /// Add a [`Provider`] module.
    pub fn add_provider(mut self, provider: &dyn Provider) -> Self {
        debug!(provider = provider.name(), "Adding provider");
        provider.register(&mut self);
        self
    }

    /// Build the container.
    pub fn build(self) -> Container {
        debug!(registered = self.registry.len(), "Built container");
        Container {
            registry: RwLock::new(self.registry),
        }
    }
}

impl ProviderRegistry for ContainerBuilder {
    fn register_value(&mut self, name: &str, value: Value) {
        self.registry
            .register(name.to_owned(), Registration::constant(value));
    }

    fn register_lazy(&mut self, name: &str, factory: Producer) {
        self.registry
            .register(name.to_owned(), Registration::lazy(factory));
    }

    fn register_instance(&mut self, name: &str, factory: Producer) {
        self.registry
            .register(name.to_owned(), Registration::instance(factory));
    }

    fn register_alias(&mut self, alias: &str, origin: &str) -> bool {
        self.registry.alias(alias.to_owned(), origin)
    }
}

impl fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("registered", &self.registry.len())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// String-keyed resource container.
///
/// Cheap to create: build a fresh one per test instead of sharing
/// [`global()`](crate::global).
pub struct Container {
    registry: RwLock<Registry>,
}

impl Container {
    /// Create an empty container.
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(Registry::new()),
        }
    }

    /// Create a new builder.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    // ── Registration ──

    /// Register `value` as a singleton.
    ///
    /// Every resolve of `name` yields the same allocation. A [`Value`] is
    /// stored as is; an `Arc<T>` is kept as an `Arc<T>`, see
    /// [`singleton_arc`](Container::singleton_arc).
    pub fn singleton<T: Any + Send + Sync>(&self, name: impl Into<String>, value: T) {
        self.singleton_value(name, Value::new(value));
    }

    /// Register a shared allocation as a singleton.
    ///
    /// Resolves to a value that downcasts to `T` and is pointer-equal
    /// with `value`.
    pub fn singleton_arc<T: Any + Send + Sync>(&self, name: impl Into<String>, value: Arc<T>) {
        self.singleton_value(name, Value::from_arc(value));
    }

    /// Register an already erased value as a singleton.
    pub fn singleton_value(&self, name: impl Into<String>, value: Value) {
        self.register(name.into(), Registration::constant(value));
    }

    /// Register a singleton built by `factory` on the first resolve.
    ///
    /// Once the factory has returned, it is never called again. A
    /// panicking factory leaves the singleton unbuilt for the next resolve.
    pub fn singleton_with<T, F>(&self, name: impl Into<String>, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register(name.into(), Registration::lazy(erase(factory)));
    }

    /// Register a factory that runs on every resolve.
    ///
    /// Results are never cached by the container.
    pub fn instance<T, F>(&self, name: impl Into<String>, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register(name.into(), Registration::instance(erase(factory)));
    }

    /// Register a factory that yields erased values, nil included.
    pub fn instance_value<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.register(name.into(), Registration::instance(Arc::new(factory)));
    }

    /// Bind a snapshot of `origin`'s current producer to `alias`.
    ///
    /// Re-registering `origin` later does not affect `alias`. If `origin`
    /// is unbound this does nothing and returns `false`.
    pub fn alias(&self, alias: impl Into<String>, origin: &str) -> bool {
        self.registry.write().alias(alias.into(), origin)
    }

    /// Fill `target`'s directive fields, then register it as a singleton.
    ///
    /// Returns the registered handle; resolving `name` yields the same
    /// allocation. Nothing is registered if a field rejects its value.
    ///
    /// # Errors
    /// [`ContainerError::Injection`] naming the field that failed.
    #[instrument(skip_all, fields(target = type_name::<T>()))]
    pub fn tag<T: Tagged>(&self, name: impl Into<String>, mut target: T) -> Result<Arc<T>> {
        tag::inject_fields(&mut target, self)?;

        let shared = Arc::new(target);
        self.singleton_value(name, Value::from_arc(shared.clone()));
        Ok(shared)
    }

    /// Type-erased [`tag`](Container::tag).
    ///
    /// Targets whose type has no submitted [`TagTable`] are left alone:
    /// nothing is registered and `Ok(None)` is returned. That covers types
    /// not deriving `Tagged` and generic derived types, which have no
    /// single `TypeId` to submit and can only go through `tag`.
    #[instrument(skip_all)]
    pub fn tag_any(
        &self,
        name: impl Into<String>,
        mut target: Box<dyn Any + Send + Sync>,
    ) -> Result<Option<Value>> {
        let Some(table) = TagTable::find((*target).type_id()) else {
            debug!("Tag target has no directive table (not derived, or generic), skipping");
            return Ok(None);
        };

        table.inject(&mut *target, self)?;

        let value = Value::from_erased(Arc::from(target), table.type_name());
        self.singleton_value(name, value.clone());
        Ok(Some(value))
    }

    /// Add a [`Provider`] module.
    pub fn add_provider(&self, provider: &dyn Provider) {
        debug!(provider = provider.name(), "Adding provider");
        provider.register(&mut Registrar(self));
    }

    /// Discard every registration.
    pub fn reset(&self) {
        let previous = std::mem::take(&mut *self.registry.write());
        debug!(discarded = previous.len(), "Container reset");
    }

    // ── Resolution ──

    /// Resolve `name`.
    ///
    /// `None` means nothing is registered under `name`. A producer may
    /// legitimately yield [`Value::nil()`], which comes back as `Some`.
    /// A panicking producer unwinds through this call.
    pub fn resolve(&self, name: &str) -> Option<Value> {
        trace!(name, "Resolving");
        let producer = self.producer(name)?;
        Some(producer())
    }

    /// Resolve every name in order. Misses yield `None` in place.
    pub fn resolve_group<S: AsRef<str>>(&self, names: &[S]) -> Vec<Option<Value>> {
        names.iter().map(|name| self.resolve(name.as_ref())).collect()
    }

    /// Resolve `name`, treating a miss as an error.
    ///
    /// # Errors
    /// [`ContainerError::NotRegistered`] with registered names close to `name`.
    pub fn require(&self, name: &str) -> Result<Value> {
        self.resolve(name).ok_or_else(|| ContainerError::NotRegistered {
            name: name.to_owned(),
            suggestions: suggest_similar(name, &self.names(), MAX_SUGGESTIONS),
        })
    }

    // ── Invocation ──

    /// Call `callable` with one argument per slot.
    ///
    /// `names` and `args` are parallel. An [`Arg::Inject`] slot receives
    /// `resolve(names[i])`, or nil when that misses; an [`Arg::Given`] slot
    /// receives its value. Results follow the callable's return order.
    ///
    /// # Errors
    /// - [`ContainerError::ArgumentCount`] if `names` and `args` differ in length
    /// - [`ContainerError::Arity`] if the callable takes a different count
    /// - whatever a parameter conversion or the callable itself reports
    #[instrument(skip_all, fields(arity = callable.arity()))]
    pub fn call<P, F>(&self, callable: &F, names: &[&str], args: Vec<Arg>) -> Result<Vec<Value>>
    where
        F: Callable<P>,
    {
        let assembled = self.assemble(names, args)?;
        if assembled.len() != callable.arity() {
            return Err(ContainerError::Arity {
                expected: callable.arity(),
                supplied: assembled.len(),
            });
        }
        callable.invoke(assembled)
    }

    /// Call a variadic `callable` with all slots packed into one sequence.
    ///
    /// Slots are filled exactly as in [`call`](Container::call); the
    /// callable's single return value comes back unwrapped.
    #[instrument(skip_all, fields(slots = args.len()))]
    pub fn call_spec<F, R>(&self, callable: F, names: &[&str], args: Vec<Arg>) -> Result<Value>
    where
        F: FnOnce(Vec<Value>) -> R,
        R: IntoValue,
    {
        let assembled = self.assemble(names, args)?;
        Ok(callable(assembled).into_value())
    }

    /// Call whatever `target` holds.
    ///
    /// A [`Function`] is called like [`call`](Container::call); any other
    /// value is not invocable and yields no results.
    pub fn call_value(&self, target: &Value, names: &[&str], args: Vec<Arg>) -> Result<Vec<Value>> {
        match target.downcast_ref::<Function>() {
            Some(function) => self.call(function, names, args),
            None => {
                debug!(found = target.type_name(), "Value is not callable, skipping");
                Ok(Vec::new())
            }
        }
    }

    /// [`call`](Container::call) with arguments from an [`Args`] builder.
    pub fn invoke<P, F>(&self, callable: &F, args: Args) -> Result<Vec<Value>>
    where
        F: Callable<P>,
    {
        let (names, values) = args.into_parts();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        self.call(callable, &names, values)
    }

    /// [`call_spec`](Container::call_spec) with arguments from an [`Args`] builder.
    pub fn invoke_spec<F, R>(&self, callable: F, args: Args) -> Result<Value>
    where
        F: FnOnce(Vec<Value>) -> R,
        R: IntoValue,
    {
        let (names, values) = args.into_parts();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        self.call_spec(callable, &names, values)
    }

    // ── Introspection ──

    pub fn contains(&self, name: &str) -> bool {
        self.registry.read().contains(name)
    }

    /// Lifetime of the registration under `name`.
    pub fn lifetime(&self, name: &str) -> Option<Lifetime> {
        self.registry.read().get(name).map(|r| r.lifetime)
    }

    /// The name `name` was aliased from, if it is an alias.
    pub fn aliased_from(&self, name: &str) -> Option<String> {
        self.registry.read().get(name)?.aliased_from.clone()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.registry.read().names()
    }

    pub fn len(&self) -> usize {
        self.registry.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.read().is_empty()
    }

    // ── Internal ──

    fn register(&self, name: String, registration: Registration) {
        self.registry.write().register(name, registration);
    }

    /// Clones the producer out so the lock is released before it runs.
    fn producer(&self, name: &str) -> Option<Producer> {
        let registry = self.registry.read();
        match registry.get(name) {
            Some(registration) => Some(registration.producer.clone()),
            None => {
                trace!(name, "Not registered");
                None
            }
        }
    }

    fn assemble(&self, names: &[&str], args: Vec<Arg>) -> Result<Vec<Value>> {
        if names.len() != args.len() {
            return Err(ContainerError::ArgumentCount {
                names: names.len(),
                values: args.len(),
            });
        }

        Ok(names
            .iter()
            .zip(args)
            .map(|(name, arg)| match arg {
                Arg::Given(value) => value,
                Arg::Inject => self.resolve(name).unwrap_or_else(|| {
                    debug!(name, "Argument not registered, passing nil");
                    Value::nil()
                }),
            })
            .collect())
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver for Container {
    fn resolve(&self, name: &str) -> Option<Value> {
        Container::resolve(self, name)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("registered", &self.len())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Registrar (provider bridge)
// ═══════════════════════════════════════════

/// Lets providers write into a live container.
struct Registrar<'a>(&'a Container);

impl ProviderRegistry for Registrar<'_> {
    fn register_value(&mut self, name: &str, value: Value) {
        self.0.singleton_value(name, value);
    }

    fn register_lazy(&mut self, name: &str, factory: Producer) {
        self.0.register(name.to_owned(), Registration::lazy(factory));
    }

    fn register_instance(&mut self, name: &str, factory: Producer) {
        self.0.register(name.to_owned(), Registration::instance(factory));
    }

    fn register_alias(&mut self, alias: &str, origin: &str) -> bool {
        self.0.alias(alias, origin)
    }
}

fn erase<T, F>(factory: F) -> Producer
where
    T: Any + Send + Sync,
    F: Fn() -> T + Send + Sync + 'static,
{
    Arc::new(move || Value::new(factory()))
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Container, ContainerBuilder};
    pub use crate::call::{Arg, Args, Function};
    pub use crate::error::{ContainerError, Result};
    pub use crate::global::global;
    pub use crate::lifetime::Lifetime;
    pub use crate::provider::{Provider, ProviderRegistry};
    pub use crate::tag::{Directive, Tagged};
    pub use crate::value::{FromValue, Value};
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
