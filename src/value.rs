//! Dispatch arguments.
//!
//! Listeners receive a `&[Value]` slice. Anything with a `From` conversion
//! can be passed through the [`args!`](crate::args) macro.

use serde::{Deserialize, Serialize};

/// One positional argument forwarded to listeners.
///
/// ```
/// use evemit::{args, Value};
///
/// let args = args!["Ada", vec![1, 2]];
/// assert_eq!(args[0].as_string(), Some("Ada"));
/// assert_eq!(args[1].as_list().map(<[Value]>::len), Some(2));
/// ```
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    /// Arbitrary JSON payload, for structured event data.
    Structured(serde_json::Value),
}

impl Value {
    /// The string payload, if this is a `String`.
    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        if let Self::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// The items, if this is a `List`.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        if let Self::List(items) = self {
            Some(items)
        } else {
            None
        }
    }
}

macro_rules! impl_from {
    ($($src:ty => $variant:ident($conv:expr)),+ $(,)?) => {
        $(
            impl From<$src> for Value {
                fn from(v: $src) -> Self {
                    Self::$variant($conv(v))
                }
            }
        )+
    };
}

impl_from! {
    bool => Bool(std::convert::identity),
    i32 => Int(i64::from),
    u32 => Int(i64::from),
    i64 => Int(std::convert::identity),
    f32 => Float(f64::from),
    f64 => Float(std::convert::identity),
    String => String(std::convert::identity),
    &str => String(str::to_owned),
    serde_json::Value => Structured(std::convert::identity),
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}
