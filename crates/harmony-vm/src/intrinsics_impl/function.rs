//! Function.prototype methods (ES5 15.3.4)
//!
//! `call` and `apply` dispatch through [`VmContext::call`], so they work
//! the same for native functions and function proxies.

use std::sync::Arc;

use crate::context::VmContext;
use crate::error::{VmError, VmResult};
use crate::intrinsics_impl::{define_method, get_arg};
use crate::object::{JsObject, PropertyAttributes, PropertyDescriptor, PropertyKey};
use crate::string::well_known;
use crate::value::Value;

/// Initialize Function.prototype: `length`, `name`, `call`, `apply`
pub fn init_function_prototype(ctx: &VmContext, fn_proto: &Arc<JsObject>) {
    // Fixed function proxies inherit this `length`
    fn_proto.define_property(
        PropertyKey::from_js_string(well_known::LENGTH.clone()),
        PropertyDescriptor::data_with_attrs(Value::number(0.0), PropertyAttributes::frozen()),
    );
    fn_proto.define_property(
        PropertyKey::from_js_string(well_known::NAME.clone()),
        PropertyDescriptor::data_with_attrs(Value::from(""), PropertyAttributes::frozen()),
    );

    define_method(ctx, fn_proto, "call", 1, |this_val, args, ctx| {
        if !this_val.is_callable() {
            return Err(VmError::type_error(
                "Function.prototype.call called on non-callable",
            ));
        }
        let this_arg = get_arg(args, 0);
        let rest = args.get(1..).unwrap_or_default();
        ctx.call(this_val, &this_arg, rest)
    });

    define_method(ctx, fn_proto, "apply", 2, |this_val, args, ctx| {
        if !this_val.is_callable() {
            return Err(VmError::type_error(
                "Function.prototype.apply called on non-callable",
            ));
        }
        let this_arg = get_arg(args, 0);
        let list = match get_arg(args, 1) {
            Value::Undefined | Value::Null => Vec::new(),
            array_like => ctx.create_list_from_array_like(&array_like)?,
        };
        ctx.call(this_val, &this_arg, &list)
    });
}

/// The `Function` constructor: dynamic function creation needs a
/// compiler, which this runtime does not carry
pub fn function_constructor_fn(
    _this: &Value,
    _args: &[Value],
    _ctx: &mut VmContext,
) -> VmResult<Value> {
    Err(VmError::type_error(
        "Function constructor is not supported without a compiler",
    ))
}
