//! Error types for Sanduq container operations.
//!
//! A missing name is not an error for [`Container::resolve`](crate::Container::resolve),
//! which answers `None`. Errors cover the fatal cases: values of the wrong
//! shape, malformed call sites and callables that fail.

use sanduq_support::rendering::{render_suggestions, shorten_type_name};

/// Boxed error returned by fallible callables.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for all Sanduq operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// A required name has no producer.
    #[error("Resource not registered: `{name}`{}", render_suggestions(.suggestions))]
    NotRegistered {
        name: String,
        /// Registered names close to `name`.
        suggestions: Vec<String>,
    },

    /// A value did not have the shape its consumer asked for.
    #[error(
        "Shape mismatch: expected {}, found {}",
        shorten_type_name(.expected),
        shorten_type_name(.found)
    )]
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A tagged field rejected the value resolved for it.
    #[error(
        "Cannot inject `{dependency}` into {}.{field}: {source}",
        shorten_type_name(.target)
    )]
    Injection {
        target: &'static str,
        field: &'static str,
        dependency: &'static str,
        #[source]
        source: Box<ContainerError>,
    },

    /// A directive named a field the target cannot assign.
    #[error("{} has no injectable field `{field}`", shorten_type_name(.target))]
    UnknownField { target: &'static str, field: String },

    /// Argument names and argument values differ in length.
    #[error("Argument count mismatch: {names} names for {values} values")]
    ArgumentCount { names: usize, values: usize },

    /// The callable's parameter count differs from the supplied arguments.
    #[error("Callable takes {expected} arguments, {supplied} supplied")]
    Arity { expected: usize, supplied: usize },

    /// The callable itself returned an error.
    #[error("Callable failed: {source}")]
    CallFailed {
        #[source]
        source: BoxError,
    },
}

/// Convenient Result type for Sanduq operations.
pub type Result<T> = std::result::Result<T, ContainerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_registered_display() {
        let err = ContainerError::NotRegistered {
            name: "UserServise".into(),
            suggestions: vec!["UserService".into()],
        };

        let msg = err.to_string();
        assert!(msg.contains("not registered"));
        assert!(msg.contains("`UserServise`"));
        assert!(msg.contains("did you mean `UserService`"));
    }

    #[test]
    fn not_registered_without_suggestions() {
        let err = ContainerError::NotRegistered {
            name: "Missing".into(),
            suggestions: vec![],
        };
        assert_eq!(err.to_string(), "Resource not registered: `Missing`");
    }

    #[test]
    fn shape_mismatch_shortens_types() {
        let err = ContainerError::ShapeMismatch {
            expected: "alloc::sync::Arc<my_app::UserService>",
            found: "alloc::string::String",
        };
        assert_eq!(err.to_string(), "Shape mismatch: expected Arc<UserService>, found String");
    }

    #[test]
    fn injection_keeps_source() {
        use std::error::Error as _;

        let err = ContainerError::Injection {
            target: "my_app::TagDemo",
            field: "name",
            dependency: "UserService",
            source: Box::new(ContainerError::ShapeMismatch {
                expected: "u8",
                found: "nil",
            }),
        };

        let msg = err.to_string();
        assert!(msg.starts_with("Cannot inject `UserService` into TagDemo.name"));
        assert!(err.source().is_some());
    }
}
