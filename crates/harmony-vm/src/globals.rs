//! Global object setup
//!
//! Provides the globals this runtime carries:
//! - `globalThis`, `undefined`, `NaN`, `Infinity`
//! - `Object` (constructor, statics, prototype methods)
//! - `Function` (prototype methods)
//! - `Proxy` (`create`, `createFunction`)

use std::sync::Arc;

use crate::context::VmContext;
use crate::intrinsics_impl::{function, object, proxy};
use crate::object::{JsObject, PropertyAttributes, PropertyDescriptor, PropertyKey};
use crate::string::well_known;
use crate::value::Value;

/// Set up all standard global properties on the context's global object
pub fn setup_global_object(ctx: &mut VmContext) {
    let global = ctx.global().clone();
    let object_proto = ctx.intrinsics().object_prototype.clone();
    let fn_proto = ctx.intrinsics().function_prototype.clone();

    ctx.set_global("globalThis", Value::object(global.clone()));
    for (name, value) in [
        ("undefined", Value::undefined()),
        ("NaN", Value::number(f64::NAN)),
        ("Infinity", Value::number(f64::INFINITY)),
    ] {
        global.define_property(
            PropertyKey::string(name),
            PropertyDescriptor::data_with_attrs(value, PropertyAttributes::frozen()),
        );
    }

    object::init_object_prototype(ctx, &object_proto);
    function::init_function_prototype(ctx, &fn_proto);

    let object_ctor = ctx.native_function("Object", 1, object::object_constructor_fn);
    if let Some(ctor) = object_ctor.as_object() {
        object::init_object_constructor(ctx, ctor, &object_proto);
    }
    ctx.set_global("Object", object_ctor);

    let function_ctor = ctx.native_function("Function", 1, function::function_constructor_fn);
    if let Some(ctor) = function_ctor.as_object() {
        link_constructor(ctor, &fn_proto);
    }
    ctx.set_global("Function", function_ctor);

    let proxy_ctor = Arc::new(JsObject::new(Some(object_proto)));
    proxy::init_proxy_constructor(ctx, &proxy_ctor);
    ctx.set_global("Proxy", Value::object(proxy_ctor));

    tracing::debug!("global object initialized");
}

fn link_constructor(ctor: &Arc<JsObject>, proto: &Arc<JsObject>) {
    ctor.define_property(
        PropertyKey::from_js_string(well_known::PROTOTYPE.clone()),
        PropertyDescriptor::data_with_attrs(
            Value::object(proto.clone()),
            PropertyAttributes::frozen(),
        ),
    );
    proto.define_property(
        PropertyKey::from_js_string(well_known::CONSTRUCTOR.clone()),
        PropertyDescriptor::builtin_method(Value::object(ctor.clone())),
    );
}

#[cfg(test)]
mod tests {
    use crate::runtime::VmRuntime;
    use crate::value::Value;

    #[test]
    fn test_globals_present() {
        let runtime = VmRuntime::new();
        let ctx = runtime.create_context();
        for name in ["globalThis", "Object", "Function", "Proxy", "NaN", "Infinity"] {
            assert!(ctx.get_global(name).is_some(), "missing global {name}");
        }
        assert_eq!(ctx.get_global("Object").unwrap().type_of(), "function");
        assert_eq!(ctx.get_global("Proxy").unwrap().type_of(), "object");
        assert_eq!(ctx.get_global("undefined"), Some(Value::undefined()));
    }
}
