//! # evemit - Minimal synchronous event emitter
//!
//! evemit keeps a registry of named events and the listeners attached to
//! them. Dispatching an event calls every listener in registration order on
//! the caller's thread, forwarding any number of arguments.
//!
//! ## Core Concepts
//!
//! - **EventRegistry**: owns the event name to listener mapping
//! - **Listener**: a shared callable with a stable identity, used for removal
//! - **Context**: an optional receiver bound to a listener at registration
//! - **One-shot listener**: removed right before its first invocation
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use evemit::{args, EventRegistry, Listener};
//!
//! struct Greeter {
//!     greeting: &'static str,
//! }
//!
//! let registry = EventRegistry::new();
//! let hello = Listener::new(|inv| {
//!     let greeter = inv.context::<Greeter>().ok_or("greeter not bound")?;
//!     let name = inv.arg(0).and_then(|v| v.as_string()).unwrap_or("stranger");
//!     println!("{}, {name}!", greeter.greeting);
//!     Ok(())
//! });
//!
//! registry
//!     .register_with_context("hello", hello.clone(), Arc::new(Greeter { greeting: "Hi" }))
//!     .register_once("hello", hello.clone());
//!
//! assert!(registry.dispatch("hello", &args!["Ada"]).is_err()); // one-shot entry has no context
//! assert_eq!(registry.listeners("hello").len(), 1);
//! assert!(registry.dispatch("hello", &args!["Ada"])?);
//! # Ok::<(), evemit::EventError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod listener;
pub mod registry;
pub mod value;

pub use error::{EventError, EventResult, ListenerError};
pub use listener::{Context, Invocation, Listener, ListenerId};
pub use registry::{EventRegistry, ListenerEntry, RegistryConfig};
pub use value::Value;

/// Build a `Vec<Value>` of dispatch arguments.
///
/// ```
/// use evemit::{args, Value};
///
/// let args = args![1, "a", true, None::<i32>];
/// assert_eq!(args, vec![Value::Int(1), Value::from("a"), Value::Bool(true), Value::Null]);
/// assert!(args![].is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($arg)),+]
    };
}
