//! # Harmony VM
//!
//! Object model and Harmony-era proxy meta-object protocol for a
//! JavaScript runtime.
//!
//! ## Design Principles
//!
//! - **Handler-driven proxies**: object and function proxies route every
//!   fundamental operation through a [`proxy::TrapProvider`]
//! - **Derived traps**: `get`/`set`/`has`/`hasOwn`/`keys`/`enumerate`
//!   fall back to compositions of the fundamental traps
//! - **One-way fixing**: freeze/seal/preventExtensions swap a live proxy
//!   for a plain property table under a single write lock
//! - **Thread-safe**: values are `Send + Sync`

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod context;
pub mod derived_traps;
pub mod descriptor;
pub mod error;
pub mod globals;
pub mod intrinsics_impl;
pub mod object;
pub mod proxy;
pub mod proxy_operations;
pub mod runtime;
pub mod string;
pub mod value;

pub use context::{Strictness, VmContext};
pub use descriptor::PartialDescriptor;
pub use error::{VmError, VmResult};
pub use object::{
    IntegrityLevel, JsObject, PropertyAttributes, PropertyDescriptor, PropertyKey, ProxyState,
};
pub use proxy::{JsProxy, ObjectHandler, Trap, TrapKind, TrapOutcome, TrapProvider, TrapTable};
pub use runtime::{RuntimeConfig, VmRuntime};
pub use string::JsString;
pub use value::{NativeFn, Value};
