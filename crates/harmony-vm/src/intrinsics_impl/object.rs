//! Object constructor and prototype (ES5 15.2)
//!
//! Every builtin here goes through the generic object protocol on
//! [`VmContext`], so proxies are handled by the facade, not here.

use std::sync::Arc;

use crate::context::VmContext;
use crate::descriptor::{PartialDescriptor, from_property_descriptor};
use crate::error::{VmError, VmResult};
use crate::intrinsics_impl::{define_method, get_arg, require_object};
use crate::object::{JsObject, PropertyAttributes, PropertyDescriptor, PropertyKey};
use crate::string::{JsString, well_known};
use crate::value::Value;

/// `Object.prototype.*`
pub fn init_object_prototype(ctx: &VmContext, object_proto: &Arc<JsObject>) {
    define_method(ctx, object_proto, "toString", 0, |this_val, _args, _ctx| {
        let tag = match this_val {
            Value::Undefined => "Undefined",
            Value::Null => "Null",
            Value::Boolean(_) => "Boolean",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::Object(obj) => obj.class_name(),
        };
        Ok(Value::string(JsString::intern(&format!("[object {tag}]"))))
    });

    define_method(ctx, object_proto, "toLocaleString", 0, |this_val, _args, ctx| {
        let to_string = ctx.get(
            this_val,
            &PropertyKey::from_js_string(well_known::TO_STRING.clone()),
        )?;
        ctx.call(&to_string, this_val, &[])
    });

    define_method(ctx, object_proto, "valueOf", 0, |this_val, _args, _ctx| {
        if this_val.is_nullish() {
            return Err(VmError::type_error(
                "Object.prototype.valueOf called on null or undefined",
            ));
        }
        Ok(this_val.clone())
    });

    define_method(ctx, object_proto, "hasOwnProperty", 1, |this_val, args, ctx| {
        let key = PropertyKey::from_value(&get_arg(args, 0));
        match this_val {
            Value::Object(obj) => Ok(Value::boolean(ctx.has_own_property(obj, &key)?)),
            Value::Undefined | Value::Null => Err(VmError::type_error(
                "Object.prototype.hasOwnProperty called on null or undefined",
            )),
            _ => Ok(Value::boolean(false)),
        }
    });

    define_method(ctx, object_proto, "propertyIsEnumerable", 1, |this_val, args, ctx| {
        let key = PropertyKey::from_value(&get_arg(args, 0));
        match this_val {
            Value::Object(obj) => {
                let desc = ctx.get_own_property(obj, &key)?;
                Ok(Value::boolean(desc.is_some_and(|d| d.is_enumerable())))
            }
            Value::Undefined | Value::Null => Err(VmError::type_error(
                "Object.prototype.propertyIsEnumerable called on null or undefined",
            )),
            _ => Ok(Value::boolean(false)),
        }
    });

    define_method(ctx, object_proto, "isPrototypeOf", 1, |this_val, args, ctx| {
        let Some(obj) = get_arg(args, 0).as_object().cloned() else {
            return Ok(Value::boolean(false));
        };
        let proto = require_object(this_val, "Object.prototype.isPrototypeOf")?;
        Ok(Value::boolean(ctx.is_prototype_of(&proto, &obj)))
    });
}

/// Collect `properties` as (key, descriptor) pairs before defining any,
/// so a throwing descriptor leaves the target untouched
fn read_property_descriptors(
    ctx: &mut VmContext,
    properties: &Value,
) -> VmResult<Vec<(PropertyKey, PartialDescriptor)>> {
    let props = match properties {
        Value::Object(obj) => obj.clone(),
        Value::Undefined | Value::Null => {
            return Err(VmError::type_error(
                "Cannot convert undefined or null to object",
            ));
        }
        _ => return Ok(Vec::new()),
    };
    let mut descriptors = Vec::new();
    for key in ctx.own_keys(&props)? {
        let value = ctx.get(properties, &key)?;
        let desc = PartialDescriptor::from_value(ctx, &value)?;
        descriptors.push((key, desc));
    }
    Ok(descriptors)
}

fn define_properties(ctx: &mut VmContext, obj: &Arc<JsObject>, properties: &Value) -> VmResult<()> {
    for (key, desc) in read_property_descriptors(ctx, properties)? {
        ctx.define_own_property(obj, &key, &desc)?;
    }
    Ok(())
}

fn names_to_array(ctx: &VmContext, names: Vec<PropertyKey>) -> Value {
    ctx.create_array(names.iter().map(PropertyKey::to_value).collect())
}

/// `Object.*` statics and the `Object` <-> `Object.prototype` links
pub fn init_object_constructor(
    ctx: &VmContext,
    object_ctor: &Arc<JsObject>,
    object_proto: &Arc<JsObject>,
) {
    object_ctor.define_property(
        PropertyKey::from_js_string(well_known::PROTOTYPE.clone()),
        PropertyDescriptor::data_with_attrs(
            Value::object(object_proto.clone()),
            PropertyAttributes::frozen(),
        ),
    );
    object_proto.define_property(
        PropertyKey::from_js_string(well_known::CONSTRUCTOR.clone()),
        PropertyDescriptor::builtin_method(Value::object(object_ctor.clone())),
    );

    define_method(ctx, object_ctor, "getPrototypeOf", 1, |_this, args, ctx| {
        let obj = require_object(&get_arg(args, 0), "Object.getPrototypeOf")?;
        Ok(ctx
            .get_prototype_of(&obj)
            .map(Value::object)
            .unwrap_or_else(Value::null))
    });

    define_method(ctx, object_ctor, "getOwnPropertyDescriptor", 2, |_this, args, ctx| {
        let obj = require_object(&get_arg(args, 0), "Object.getOwnPropertyDescriptor")?;
        let key = PropertyKey::from_value(&get_arg(args, 1));
        let desc = ctx.get_own_property(&obj, &key)?;
        Ok(from_property_descriptor(ctx, desc.as_ref()))
    });

    define_method(ctx, object_ctor, "getOwnPropertyNames", 1, |_this, args, ctx| {
        let obj = require_object(&get_arg(args, 0), "Object.getOwnPropertyNames")?;
        let names = ctx.own_property_names(&obj)?;
        Ok(names_to_array(ctx, names))
    });

    define_method(ctx, object_ctor, "keys", 1, |_this, args, ctx| {
        let obj = require_object(&get_arg(args, 0), "Object.keys")?;
        let names = ctx.own_keys(&obj)?;
        Ok(names_to_array(ctx, names))
    });

    define_method(ctx, object_ctor, "create", 2, |_this, args, ctx| {
        let proto = match get_arg(args, 0) {
            Value::Object(proto) => Some(proto),
            Value::Null => None,
            other => {
                return Err(VmError::type_error(format!(
                    "Object prototype may only be an Object or null: {}",
                    other.to_display_string()
                )));
            }
        };
        let obj = ctx.new_object_with_proto(proto);
        let properties = get_arg(args, 1);
        if !properties.is_undefined() {
            define_properties(ctx, &obj, &properties)?;
        }
        Ok(Value::object(obj))
    });

    define_method(ctx, object_ctor, "defineProperty", 3, |_this, args, ctx| {
        let target = get_arg(args, 0);
        let obj = require_object(&target, "Object.defineProperty")?;
        let key = PropertyKey::from_value(&get_arg(args, 1));
        ctx.define_own_property_from(&obj, &key, &get_arg(args, 2))?;
        Ok(target)
    });

    define_method(ctx, object_ctor, "defineProperties", 2, |_this, args, ctx| {
        let target = get_arg(args, 0);
        let obj = require_object(&target, "Object.defineProperties")?;
        define_properties(ctx, &obj, &get_arg(args, 1))?;
        Ok(target)
    });

    define_method(ctx, object_ctor, "seal", 1, |_this, args, ctx| {
        let target = get_arg(args, 0);
        ctx.seal(&require_object(&target, "Object.seal")?)?;
        Ok(target)
    });

    define_method(ctx, object_ctor, "freeze", 1, |_this, args, ctx| {
        let target = get_arg(args, 0);
        ctx.freeze(&require_object(&target, "Object.freeze")?)?;
        Ok(target)
    });

    define_method(ctx, object_ctor, "preventExtensions", 1, |_this, args, ctx| {
        let target = get_arg(args, 0);
        ctx.prevent_extensions(&require_object(&target, "Object.preventExtensions")?)?;
        Ok(target)
    });

    define_method(ctx, object_ctor, "isSealed", 1, |_this, args, ctx| {
        let obj = require_object(&get_arg(args, 0), "Object.isSealed")?;
        Ok(Value::boolean(ctx.is_sealed(&obj)))
    });

    define_method(ctx, object_ctor, "isFrozen", 1, |_this, args, ctx| {
        let obj = require_object(&get_arg(args, 0), "Object.isFrozen")?;
        Ok(Value::boolean(ctx.is_frozen(&obj)))
    });

    define_method(ctx, object_ctor, "isExtensible", 1, |_this, args, ctx| {
        let obj = require_object(&get_arg(args, 0), "Object.isExtensible")?;
        Ok(Value::boolean(ctx.is_extensible(&obj)))
    });
}

/// The `Object` function: wraps nothing, returns objects as-is and a
/// fresh object for null/undefined
pub fn object_constructor_fn(
    _this: &Value,
    args: &[Value],
    ctx: &mut VmContext,
) -> VmResult<Value> {
    match get_arg(args, 0) {
        Value::Undefined | Value::Null => Ok(Value::object(ctx.new_object())),
        value @ Value::Object(_) => Ok(value),
        other => Err(VmError::type_error(format!(
            "Primitive wrapper objects are not supported: Object({})",
            other.to_display_string()
        ))),
    }
}
