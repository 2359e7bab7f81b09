//! Provider trait: a module of related registrations.
//!
//! Providers group registrations that belong together, similar to
//! Laravel's ServiceProvider.
//!
//! # Examples
//! ```rust
//! use std::sync::Arc;
//! use sanduq_container::{Container, Provider, ProviderRegistry, Value};
//!
//! struct MailProvider;
//!
//! impl Provider for MailProvider {
//!     fn register(&self, registry: &mut dyn ProviderRegistry) {
//!         registry.register_value("mail.from", Value::new("noreply@example.com"));
//!         registry.register_instance("mail.outbox", Arc::new(|| Value::new(Vec::<String>::new())));
//!         registry.register_alias("outbox", "mail.outbox");
//!     }
//! }
//!
//! let container = Container::new();
//! container.add_provider(&MailProvider);
//! assert!(container.contains("outbox"));
//! ```

use crate::registry::Producer;
use crate::value::Value;

/// A module that registers related resources into a container.
///
/// # Design Philosophy
/// Split registrations by concern instead of one long setup block:
///
/// ```rust,ignore
/// container.add_provider(&DatabaseProvider);
/// container.add_provider(&MailProvider);
/// ```
pub trait Provider: Send + Sync {
    /// Register resources. Called once per `add_provider`.
    fn register(&self, registry: &mut dyn ProviderRegistry);

    /// Human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Interface that providers register through.
///
/// The type-erased subset of the container API, so providers can be
/// tested against a mock.
pub trait ProviderRegistry {
    /// Register a singleton value.
    fn register_value(&mut self, name: &str, value: Value);

    /// Register a producer that runs once, on first resolve.
    fn register_lazy(&mut self, name: &str, factory: Producer);

    /// Register a producer that runs on every resolve.
    fn register_instance(&mut self, name: &str, factory: Producer);

    /// Copy the current registration of `origin` under `alias`.
    ///
    /// Returns `false` if `origin` is not registered.
    fn register_alias(&mut self, alias: &str, origin: &str) -> bool;
}
