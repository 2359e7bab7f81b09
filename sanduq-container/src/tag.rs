//! Tag-driven field injection.
//!
//! A tagged type carries a static table of field directives, each naming
//! the resource that field should receive. Tagging walks the table in
//! declared field order, resolves every dependency and assigns it into the
//! field, then the container registers the filled value as a singleton.
//!
//! The table is normally generated by `#[derive(Tagged)]`:
//!
//! ```rust,ignore
//! #[derive(Tagged)]
//! struct TagDemo {
//!     #[tag(dep = "UserService")]
//!     name: Value,
//!     untouched: u32,
//! }
//! ```
//!
//! Derived types are also submitted to a link-time inventory of
//! [`TagTable`]s, which is how [`Container::tag_any`](crate::Container::tag_any)
//! finds the table for a type-erased target.

use std::any::{Any, TypeId, type_name};
use std::fmt;

use tracing::{debug, trace};

use crate::error::{ContainerError, Result};
use crate::registry::Resolver;
use crate::value::Value;

/// One field directive: `field` receives the resource named `dependency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Directive {
    pub field: &'static str,
    pub dependency: &'static str,
}

/// A struct whose fields can be filled from a container.
pub trait Tagged: Any + Send + Sync {
    /// Field directives in declared field order.
    const DIRECTIVES: &'static [Directive];

    /// Assigns `value` into `field`.
    ///
    /// # Errors
    /// [`ContainerError::ShapeMismatch`] if the field cannot hold `value`,
    /// [`ContainerError::UnknownField`] if `field` is not a directive field.
    fn assign(&mut self, field: &str, value: Value) -> Result<()>;
}

/// Fills every directive field of `target` from `resolver`.
///
/// A dependency that is not registered is injected as nil, so a field
/// that cannot hold nil fails with a shape mismatch.
pub(crate) fn inject_fields<T: Tagged>(target: &mut T, resolver: &dyn Resolver) -> Result<()> {
    for directive in T::DIRECTIVES {
        let value = resolver.resolve(directive.dependency).unwrap_or_else(|| {
            debug!(dependency = directive.dependency, "Dependency not registered, injecting nil");
            Value::nil()
        });

        target
            .assign(directive.field, value)
            .map_err(|source| ContainerError::Injection {
                target: type_name::<T>(),
                field: directive.field,
                dependency: directive.dependency,
                source: Box::new(source),
            })?;

        trace!(field = directive.field, dependency = directive.dependency, "Injected field");
    }
    Ok(())
}

/// Type-erased entry point into [`inject_fields`], one per tagged type.
pub struct TagTable {
    type_id: fn() -> TypeId,
    type_name: fn() -> &'static str,
    inject: fn(&mut (dyn Any + Send + Sync), &dyn Resolver) -> Result<()>,
}

impl TagTable {
    /// The table for `T`. Usable in `inventory::submit!`.
    pub const fn of<T: Tagged>() -> Self {
        Self {
            type_id: TypeId::of::<T>,
            type_name: type_name::<T>,
            inject: inject_erased::<T>,
        }
    }

    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    pub(crate) fn inject(&self, target: &mut (dyn Any + Send + Sync), resolver: &dyn Resolver) -> Result<()> {
        (self.inject)(target, resolver)
    }

    /// Finds the submitted table for the concrete type behind `type_id`.
    pub(crate) fn find(type_id: TypeId) -> Option<&'static TagTable> {
        inventory::iter::<TagTable>
            .into_iter()
            .find(|table| (table.type_id)() == type_id)
    }
}

impl fmt::Debug for TagTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagTable")
            .field("type_name", &self.type_name())
            .finish()
    }
}

inventory::collect!(TagTable);

fn inject_erased<T: Tagged>(target: &mut (dyn Any + Send + Sync), resolver: &dyn Resolver) -> Result<()> {
    match target.downcast_mut::<T>() {
        Some(target) => inject_fields(target, resolver),
        None => Err(ContainerError::ShapeMismatch {
            expected: type_name::<T>(),
            found: "unknown",
        }),
    }
}
