//! # Sanduq: a string-keyed resource container
//!
//! Register resources under names, resolve them by name. Singletons,
//! lazily built singletons and per-resolve instances, snapshot aliases,
//! tag-driven field injection and calling closures with resolved arguments.
//!
//! ```rust
//! use std::sync::Arc;
//! use sanduq::{Arg, Container, Tagged, Value};
//!
//! struct UserService {
//!     name: String,
//! }
//!
//! #[derive(Tagged)]
//! struct TagDemo {
//!     #[tag(dep = "UserService")]
//!     service: Option<Arc<UserService>>,
//! }
//!
//! let container = Container::new();
//! container.singleton("UserService", UserService { name: "hello".into() });
//!
//! let demo = container.tag("TagDemo", TagDemo { service: None })?;
//! assert_eq!(demo.service.as_ref().unwrap().name, "hello");
//!
//! let greet = |svc: Arc<UserService>| format!("hi {}", svc.name);
//! let results = container.call(&greet, &["UserService"], vec![Arg::Inject])?;
//! assert_eq!(results[0].downcast_ref::<String>().unwrap(), "hi hello");
//! # Ok::<(), sanduq::ContainerError>(())
//! ```

pub use sanduq_container::*;
#[cfg(feature = "derive")]
pub use sanduq_derive::*;
pub use sanduq_support::*;

#[doc(hidden)]
pub mod __private {
    pub use inventory;
}
