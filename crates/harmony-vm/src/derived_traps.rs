//! Derived traps
//!
//! Default `get`, `set`, `has`, `hasOwn`, `keys` and `enumerate` for
//! handlers that leave them out, composed from the fundamental traps.
//! Each composed trap is a method call on the handler, so a missing
//! fundamental trap surfaces as [`VmError::TrapMissing`] naming the
//! derived operation, and any exception it throws aborts the operation.

use std::sync::Arc;

use crate::context::VmContext;
use crate::descriptor::PartialDescriptor;
use crate::error::{VmError, VmResult};
use crate::object::{JsObject, PropertyKey};
use crate::proxy::{JsProxy, Trap};
use crate::string::{JsString, well_known};
use crate::value::Value;

fn field(name: &Arc<JsString>) -> PropertyKey {
    PropertyKey::from_js_string(name.clone())
}

/// `'field' in desc`
fn has_field(ctx: &mut VmContext, desc: &Value, name: &Arc<JsString>) -> VmResult<bool> {
    match desc.as_object() {
        Some(obj) => ctx.has_property(obj, &field(name)),
        None => Err(VmError::type_error(format!(
            "Cannot use 'in' operator to search for '{}' in {}",
            name.as_str(),
            desc.to_display_string()
        ))),
    }
}

/// Derived `get(receiver, name)`
///
/// A present `value` field wins regardless of its truthiness. Otherwise
/// the getter runs with `this` bound to `receiver`.
pub fn derived_get(
    ctx: &mut VmContext,
    proxy: &Arc<JsProxy>,
    key: &PropertyKey,
    receiver: &Value,
) -> VmResult<Value> {
    tracing::debug!(%key, "derived get via getPropertyDescriptor");
    let desc = proxy.invoke_required(ctx, Trap::GetPropertyDescriptor, "get", &[key.to_value()])?;
    if desc.is_undefined() {
        return Ok(desc);
    }
    if has_field(ctx, &desc, &well_known::VALUE)? {
        return ctx.get(&desc, &field(&well_known::VALUE));
    }
    let getter = ctx.get(&desc, &field(&well_known::GET))?;
    if getter.is_undefined() {
        return Ok(getter);
    }
    ctx.call(&getter, receiver, &[])
}

/// Derived `set(receiver, name, value)` for a write aimed at the proxy
/// itself.
///
/// Own descriptor first: writable data updates through `defineProperty`,
/// accessors call their setter. Then the inherited descriptor, where a
/// writable data property falls through to defining a fresh own property.
pub fn derived_set(
    ctx: &mut VmContext,
    proxy: &Arc<JsProxy>,
    key: &PropertyKey,
    value: Value,
    receiver: &Value,
) -> VmResult<bool> {
    tracing::debug!(%key, "derived set via getOwnPropertyDescriptor");
    let name = key.to_value();

    let own = proxy.invoke_required(
        ctx,
        Trap::GetOwnPropertyDescriptor,
        "set",
        &[name.clone()],
    )?;
    if own.to_boolean() {
        if has_field(ctx, &own, &well_known::WRITABLE)? {
            if !ctx.get(&own, &field(&well_known::WRITABLE))?.to_boolean() {
                return Ok(false);
            }
            ctx.set(&own, &field(&well_known::VALUE), value)?;
            proxy.invoke_required(ctx, Trap::DefineProperty, "set", &[name, own])?;
            return Ok(true);
        }
        return call_setter(ctx, &own, receiver, value);
    }

    let inherited = proxy.invoke_required(
        ctx,
        Trap::GetPropertyDescriptor,
        "set",
        &[name.clone()],
    )?;
    if inherited.to_boolean() {
        if has_field(ctx, &inherited, &well_known::WRITABLE)? {
            if !ctx.get(&inherited, &field(&well_known::WRITABLE))?.to_boolean() {
                return Ok(false);
            }
        } else {
            return call_setter(ctx, &inherited, receiver, value);
        }
    }

    let fresh = PartialDescriptor {
        value: Some(value),
        writable: Some(true),
        enumerable: Some(true),
        configurable: Some(true),
        ..Default::default()
    };
    let fresh = Value::object(fresh.to_object(ctx));
    proxy.invoke_required(ctx, Trap::DefineProperty, "set", &[name, fresh])?;
    Ok(true)
}

fn call_setter(ctx: &mut VmContext, desc: &Value, receiver: &Value, value: Value) -> VmResult<bool> {
    let setter = ctx.get(desc, &field(&well_known::SET))?;
    if !setter.to_boolean() {
        return Ok(false);
    }
    ctx.call(&setter, receiver, &[value])?;
    Ok(true)
}

/// Derived `set` for a write inherited by `receiver`, an object whose
/// prototype chain reaches the proxy.
///
/// The proxy only decides whether the write may land on `receiver`.
/// The descriptor comes from `getOwnPropertyDescriptor`, or from
/// `getPropertyDescriptor` when the handler lacks the own trap. Absent or
/// configurable data properties are shadowed by an own data property on
/// `receiver`. Accessors run their setter against `receiver`, and
/// non-configurable data properties reject the write.
pub fn derived_inherited_set(
    ctx: &mut VmContext,
    proxy: &Arc<JsProxy>,
    key: &PropertyKey,
    value: Value,
    receiver: &Arc<JsObject>,
) -> VmResult<bool> {
    tracing::debug!(%key, "derived inherited set");
    let name = key.to_value();
    let own = proxy
        .invoke(ctx, Trap::GetOwnPropertyDescriptor, "set", &[name.clone()])
        .into_result()?;
    let desc = match own {
        Some(desc) if desc.to_boolean() => desc,
        own => match proxy.trap(ctx, Trap::GetPropertyDescriptor)? {
            Some(trap) => trap.call(ctx, "set", &[name])?,
            None => own.ok_or(VmError::TrapMissing {
                trap: Trap::GetOwnPropertyDescriptor.name(),
                operation: "set",
            })?,
        },
    };
    if !desc.to_boolean() {
        return ctx.create_data_property(receiver, key, value);
    }
    let desc = PartialDescriptor::from_value(ctx, &desc)?;
    if desc.is_accessor_descriptor() {
        return match desc.set.filter(|s| !s.is_undefined()) {
            Some(setter) => {
                ctx.call(&setter, &Value::object(receiver.clone()), &[value])?;
                Ok(true)
            }
            None => Ok(false),
        };
    }
    if desc.configurable != Some(true) {
        return Err(VmError::type_error(format!(
            "Cannot assign to non-configurable property '{key}' inherited from a proxy"
        )));
    }
    ctx.create_data_property(receiver, key, value)
}

/// Derived `has(name)`: presence of an inherited-or-own descriptor
pub fn derived_has(ctx: &mut VmContext, proxy: &Arc<JsProxy>, key: &PropertyKey) -> VmResult<bool> {
    let desc = proxy.invoke_required(ctx, Trap::GetPropertyDescriptor, "has", &[key.to_value()])?;
    Ok(desc.to_boolean())
}

/// Derived `hasOwn(name)`: presence of an own descriptor
pub fn derived_has_own(
    ctx: &mut VmContext,
    proxy: &Arc<JsProxy>,
    key: &PropertyKey,
) -> VmResult<bool> {
    let desc = proxy.invoke_required(
        ctx,
        Trap::GetOwnPropertyDescriptor,
        "hasOwn",
        &[key.to_value()],
    )?;
    Ok(desc.to_boolean())
}

/// Derived `keys()`: own names whose descriptor is enumerable
pub fn derived_keys(ctx: &mut VmContext, proxy: &Arc<JsProxy>) -> VmResult<Vec<Value>> {
    let names = proxy.invoke_required(ctx, Trap::GetOwnPropertyNames, "keys", &[])?;
    filter_enumerable(ctx, proxy, &names, Trap::GetOwnPropertyDescriptor, "keys")
}

/// Derived `enumerate()`: all names whose descriptor is enumerable
pub fn derived_enumerate(ctx: &mut VmContext, proxy: &Arc<JsProxy>) -> VmResult<Vec<Value>> {
    let names = proxy.invoke_required(ctx, Trap::GetPropertyNames, "enumerate", &[])?;
    filter_enumerable(ctx, proxy, &names, Trap::GetPropertyDescriptor, "enumerate")
}

fn filter_enumerable(
    ctx: &mut VmContext,
    proxy: &Arc<JsProxy>,
    names: &Value,
    describe: Trap,
    operation: &'static str,
) -> VmResult<Vec<Value>> {
    let mut enumerable = Vec::new();
    for name in ctx.create_list_from_array_like(names)? {
        let key = Value::string(name.to_js_string());
        let desc = proxy.invoke_required(ctx, describe, operation, &[key])?;
        if ctx.get(&desc, &field(&well_known::ENUMERABLE))?.to_boolean() {
            enumerable.push(name);
        }
    }
    Ok(enumerable)
}
