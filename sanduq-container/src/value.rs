//! Type-erased values handed out by the container.
//!
//! A [`Value`] is what every producer yields and what every resolution
//! returns. It is cheap to clone (one `Arc` bump) and preserves identity:
//! resolving a singleton twice gives two `Value`s pointing at the same
//! allocation.
//!
//! Shape is recovered with a checked downcast. A wrong guess is never
//! silent: [`Value::downcast`] reports a [`ContainerError::ShapeMismatch`].
//!
//! ```
//! use sanduq_container::Value;
//!
//! let value = Value::new(String::from("hello"));
//! assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("hello"));
//! assert!(value.downcast::<u32>().is_err());
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::error::{BoxError, ContainerError, Result};

const NIL: &str = "nil";

/// A shared, type-erased value, or the distinguished nil value.
///
/// Nil is a legitimate resolved value (a producer may yield it), which is
/// distinct from a name that is not registered at all.
#[derive(Clone)]
pub struct Value {
    inner: Option<Arc<dyn Any + Send + Sync>>,
    type_name: &'static str,
}

impl Value {
    /// Wraps `value` in a fresh shared allocation.
    ///
    /// A `Value` passed in is returned as is, nil included. Any other type
    /// is stored as given: an `Arc<T>` downcasts to `Arc<T>`, use
    /// [`from_arc`](Value::from_arc) to share the allocation as a `T`.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        let mut slot = Some(value);
        if let Some(value) = (&mut slot as &mut dyn Any)
            .downcast_mut::<Option<Value>>()
            .and_then(Option::take)
        {
            return value;
        }

        Self {
            inner: slot.map(|value| Arc::new(value) as Arc<dyn Any + Send + Sync>),
            type_name: type_name::<T>(),
        }
    }

    /// Wraps an existing `Arc` without reallocating.
    ///
    /// The value downcasts to `T`, not to `Arc<T>`, and stays pointer-equal
    /// with every other clone of `value`.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: Some(value),
            type_name: type_name::<T>(),
        }
    }

    pub(crate) fn from_erased(value: Arc<dyn Any + Send + Sync>, type_name: &'static str) -> Self {
        Self {
            inner: Some(value),
            type_name,
        }
    }

    /// The nil value.
    pub fn nil() -> Self {
        Self {
            inner: None,
            type_name: NIL,
        }
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        self.inner.is_none()
    }

    /// Name of the type this value was created from, `"nil"` for nil.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the value holds a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// Borrows the value as `T`, or `None` on nil or a different type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.as_deref()?.downcast_ref::<T>()
    }

    /// Returns a shared handle to the value as `T`.
    ///
    /// # Errors
    /// [`ContainerError::ShapeMismatch`] if the value is nil or not a `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Result<Arc<T>> {
        let mismatch = || ContainerError::ShapeMismatch {
            expected: type_name::<T>(),
            found: self.type_name,
        };

        match &self.inner {
            Some(inner) => inner.clone().downcast::<T>().map_err(|_| mismatch()),
            None => Err(mismatch()),
        }
    }

    /// Identity comparison. Two nils are equal.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::nil()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.type_name)
    }
}

// ═══════════════════════════════════════════
// Conversions into consumer slots
// ═══════════════════════════════════════════

/// Conversion of a resolved [`Value`] into a struct field or callable parameter.
///
/// - `Value` accepts anything, nil included.
/// - `Option<Value>` maps nil to `None`.
/// - `Arc<T>` requires a `T`; nil is a shape mismatch.
/// - `Option<Arc<T>>` maps nil to `None` but still rejects other types.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromValue for Option<Value> {
    fn from_value(value: Value) -> Result<Self> {
        Ok((!value.is_nil()).then_some(value))
    }
}

impl<T: Any + Send + Sync> FromValue for Arc<T> {
    fn from_value(value: Value) -> Result<Self> {
        value.downcast()
    }
}

impl<T: Any + Send + Sync> FromValue for Option<Arc<T>> {
    fn from_value(value: Value) -> Result<Self> {
        if value.is_nil() {
            return Ok(None);
        }
        value.downcast().map(Some)
    }
}

// ═══════════════════════════════════════════
// Conversions out of callables
// ═══════════════════════════════════════════

/// Conversion of a single returned item into a [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Conversion of a callable's return into the ordered result sequence.
///
/// `()` yields no results, a single item yields one, a tuple yields one
/// per element in declared order. `Err` becomes [`ContainerError::CallFailed`].
pub trait IntoResults {
    fn into_results(self) -> Result<Vec<Value>>;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl<T: Any + Send + Sync> IntoValue for Arc<T> {
    fn into_value(self) -> Value {
        Value::from_arc(self)
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or_else(Value::nil, IntoValue::into_value)
    }
}

impl IntoResults for () {
    fn into_results(self) -> Result<Vec<Value>> {
        Ok(Vec::new())
    }
}

impl IntoResults for Vec<Value> {
    fn into_results(self) -> Result<Vec<Value>> {
        Ok(self)
    }
}

impl IntoResults for Value {
    fn into_results(self) -> Result<Vec<Value>> {
        Ok(vec![self])
    }
}

impl<T: Any + Send + Sync> IntoResults for Arc<T> {
    fn into_results(self) -> Result<Vec<Value>> {
        Ok(vec![self.into_value()])
    }
}

impl<T: IntoValue> IntoResults for Option<T> {
    fn into_results(self) -> Result<Vec<Value>> {
        Ok(vec![self.into_value()])
    }
}

impl<R, E> IntoResults for std::result::Result<R, E>
where
    R: IntoResults,
    E: Into<BoxError>,
{
    fn into_results(self) -> Result<Vec<Value>> {
        self.map_err(|e| ContainerError::CallFailed { source: e.into() })?
            .into_results()
    }
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::new(self)
                }
            }

            impl IntoResults for $ty {
                fn into_results(self) -> Result<Vec<Value>> {
                    Ok(vec![Value::new(self)])
                }
            }
        )*
    };
}

impl_scalar!(
    String, &'static str, bool, char,
    i8, i16, i32, i64, i128, isize,
    u8, u16, u32, u64, u128, usize,
    f32, f64,
);

macro_rules! impl_tuple_results {
    ($($item:ident),+) => {
        impl<$($item: IntoValue),+> IntoResults for ($($item,)+) {
            #[allow(non_snake_case)]
            fn into_results(self) -> Result<Vec<Value>> {
                let ($($item,)+) = self;
                Ok(vec![$($item.into_value()),+])
            }
        }
    };
}

impl_tuple_results!(A);
impl_tuple_results!(A, B);
impl_tuple_results!(A, B, C);
impl_tuple_results!(A, B, C, D);
impl_tuple_results!(A, B, C, D, E);
