//! Reflective invocation: calling ordinary closures with resolved arguments.
//!
//! Every argument slot is either [`Arg::Inject`] (resolve the slot's name)
//! or [`Arg::Given`] (use this value as is). Injection is opt-in per slot,
//! so a caller can override any parameter.
//!
//! Parameters are typed through [`FromValue`](crate::FromValue) and returns
//! through [`IntoResults`](crate::IntoResults):
//!
//! ```
//! use std::sync::Arc;
//! use sanduq_container::{Arg, Container, Value};
//!
//! let container = Container::new();
//! container.singleton("greeting", String::from("hello"));
//!
//! let shout = |greeting: Arc<String>| greeting.to_uppercase();
//! let results = container.call(&shout, &["greeting"], vec![Arg::Inject]).unwrap();
//! assert_eq!(results[0].downcast_ref::<String>().map(String::as_str), Some("HELLO"));
//!
//! let results = container
//!     .call(&shout, &["greeting"], vec![Arg::given(Value::new(String::from("bye")))])
//!     .unwrap();
//! assert_eq!(results[0].downcast_ref::<String>().map(String::as_str), Some("BYE"));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::value::{FromValue, IntoResults, IntoValue, Value};

/// One argument slot.
#[derive(Debug, Clone, Default)]
pub enum Arg {
    /// Resolve the slot's name; nil if it is not registered.
    #[default]
    Inject,
    /// Use this value verbatim.
    Given(Value),
}

impl Arg {
    pub fn given(value: impl IntoValue) -> Self {
        Arg::Given(value.into_value())
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Given(value)
    }
}

/// Builder for the parallel name and argument sequences.
///
/// ```
/// use sanduq_container::Args;
///
/// let args = Args::new().inject("UserService").with("limit", 10usize);
/// assert_eq!(args.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Args {
    names: Vec<String>,
    values: Vec<Arg>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a slot resolved from `name`.
    pub fn inject(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self.values.push(Arg::Inject);
        self
    }

    /// Adds a slot overridden with `value`. `name` is kept for diagnostics only.
    pub fn with(mut self, name: impl Into<String>, value: impl IntoValue) -> Self {
        self.names.push(name.into());
        self.values.push(Arg::given(value));
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Arg>) {
        (self.names, self.values)
    }
}

/// A callable with a known number of positional parameters.
///
/// Implemented for every `Fn` of up to eight [`FromValue`] parameters
/// whose return is [`IntoResults`]. `Params` is the parameter tuple and
/// only exists to keep those impls apart.
pub trait Callable<Params> {
    /// Number of positional parameters.
    fn arity(&self) -> usize;

    /// Calls with exactly [`arity`](Callable::arity) arguments.
    fn invoke(&self, args: Vec<Value>) -> Result<Vec<Value>>;
}

macro_rules! count {
    () => { 0usize };
    ($head:ident $($tail:ident)*) => { 1usize + count!($($tail)*) };
}

macro_rules! impl_callable {
    ($($param:ident $arg:ident),*) => {
        impl<Func, Ret, $($param,)*> Callable<($($param,)*)> for Func
        where
            Func: Fn($($param),*) -> Ret,
            Ret: IntoResults,
            $($param: FromValue,)*
        {
            fn arity(&self) -> usize {
                count!($($param)*)
            }

            #[allow(unused_mut, unused_variables)]
            fn invoke(&self, args: Vec<Value>) -> Result<Vec<Value>> {
                let mut args = args.into_iter();
                $(
                    let $arg = <$param as FromValue>::from_value(args.next().unwrap_or_default())?;
                )*
                (self)($($arg),*).into_results()
            }
        }
    };
}

impl_callable!();
impl_callable!(A a);
impl_callable!(A a, B b);
impl_callable!(A a, B b, C c);
impl_callable!(A a, B b, C c, D d);
impl_callable!(A a, B b, C c, D d, E e);
impl_callable!(A a, B b, C c, D d, E e, F f);
impl_callable!(A a, B b, C c, D d, E e, F f, G g);
impl_callable!(A a, B b, C c, D d, E e, F f, G g, H h);

/// Marker parameter type of [`Function`]'s [`Callable`] impl.
#[doc(hidden)]
pub struct Erased;

/// A callable with its parameter types erased, storable in a [`Value`].
///
/// Registering a `Function` makes a callable resolvable by name;
/// [`Container::call_value`](crate::Container::call_value) invokes it.
#[derive(Clone)]
pub struct Function {
    arity: usize,
    inner: Arc<dyn Fn(Vec<Value>) -> Result<Vec<Value>> + Send + Sync>,
}

impl Function {
    pub fn new<P, F>(callable: F) -> Self
    where
        P: 'static,
        F: Callable<P> + Send + Sync + 'static,
    {
        Self {
            arity: callable.arity(),
            inner: Arc::new(move |args| callable.invoke(args)),
        }
    }
}

impl Callable<Erased> for Function {
    fn arity(&self) -> usize {
        self.arity
    }

    fn invoke(&self, args: Vec<Value>) -> Result<Vec<Value>> {
        (self.inner)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function").field("arity", &self.arity).finish()
    }
}
