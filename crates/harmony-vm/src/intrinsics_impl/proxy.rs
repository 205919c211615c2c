//! Proxy constructor
//!
//! ## Static methods:
//! - `Proxy.create(handler, proto)`
//! - `Proxy.createFunction(handler, callTrap, constructTrap)`

use std::sync::Arc;

use crate::context::VmContext;
use crate::intrinsics_impl::{define_method, get_arg};
use crate::object::JsObject;

/// Initialize the Proxy namespace object and its static methods
pub fn init_proxy_constructor(ctx: &VmContext, proxy_ctor: &Arc<JsObject>) {
    // Non-object handlers are rejected; non-object protos become null
    define_method(ctx, proxy_ctor, "create", 2, |_this, args, ctx| {
        ctx.create_object_proxy(get_arg(args, 0), get_arg(args, 1))
    });

    define_method(ctx, proxy_ctor, "createFunction", 3, |_this, args, ctx| {
        ctx.create_function_proxy(get_arg(args, 0), get_arg(args, 1), get_arg(args, 2))
    });
}
