//! Intrinsics implementation modules
//!
//! ## Current modules:
//! - `object` - Object constructor statics and Object.prototype methods
//! - `function` - Function.prototype methods (call, apply)
//! - `proxy` - Proxy.create and Proxy.createFunction

pub mod function;
pub mod object;
pub mod proxy;

use std::sync::Arc;

use crate::context::VmContext;
use crate::error::{VmError, VmResult};
use crate::object::{JsObject, PropertyDescriptor, PropertyKey};
use crate::value::Value;

/// Get argument at index, or undefined if missing
#[inline]
pub(crate) fn get_arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

/// Install a native method as a non-enumerable builtin slot
pub(crate) fn define_method<F>(
    ctx: &VmContext,
    target: &Arc<JsObject>,
    name: &str,
    length: u32,
    f: F,
) where
    F: Fn(&Value, &[Value], &mut VmContext) -> VmResult<Value> + Send + Sync + 'static,
{
    target.define_property(
        PropertyKey::string(name),
        PropertyDescriptor::builtin_method(ctx.native_function(name, length, f)),
    );
}

/// The object argument of an `Object.*` builtin
pub(crate) fn require_object(value: &Value, operation: &str) -> VmResult<Arc<JsObject>> {
    value.as_object().cloned().ok_or_else(|| {
        VmError::type_error(format!(
            "{operation} called on non-object {}",
            value.to_display_string()
        ))
    })
}
