//! Core container implementation for Sanduq.

pub mod call;
pub mod container;
pub mod error;
pub mod global;
pub mod lifetime;
pub mod provider;
pub mod registry;
pub mod tag;
pub mod value;

pub use call::{Arg, Args, Callable, Function};
pub use container::{Container, ContainerBuilder, prelude};
pub use error::{BoxError, ContainerError, Result};
pub use global::global;
pub use lifetime::Lifetime;
pub use provider::{Provider, ProviderRegistry};
pub use registry::{Producer, Resolver};
pub use tag::{Directive, TagTable, Tagged};
pub use value::{FromValue, IntoResults, IntoValue, Value};
