//! Proxy object facade
//!
//! Entry points the object protocol uses once it lands on a live proxy.
//! Property keys reach traps in string form. Trap exceptions propagate
//! verbatim; nothing here recovers locally.

use std::sync::Arc;

use crate::context::VmContext;
use crate::derived_traps;
use crate::descriptor::PartialDescriptor;
use crate::error::{VmError, VmResult};
use crate::object::{IntegrityLevel, JsObject, PropertyDescriptor, PropertyKey, PropertyTable, reconcile};
use crate::proxy::{JsProxy, Trap};
use crate::value::Value;

/// Result of a fixing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixOutcome {
    /// This call installed the fixed table
    Fixed,
    /// A reentrant call fixed the proxy first; this call's result was
    /// discarded
    AlreadyFixed,
}

fn keys_from_list(ctx: &mut VmContext, list: &Value) -> VmResult<Vec<PropertyKey>> {
    Ok(ctx
        .create_list_from_array_like(list)?
        .iter()
        .map(PropertyKey::from_value)
        .collect())
}

/// `Object.getOwnPropertyDescriptor` on a live proxy
pub fn proxy_get_own_property(
    ctx: &mut VmContext,
    proxy: &Arc<JsProxy>,
    key: &PropertyKey,
) -> VmResult<Option<PropertyDescriptor>> {
    let result = proxy.invoke_required(
        ctx,
        Trap::GetOwnPropertyDescriptor,
        "getOwnPropertyDescriptor",
        &[key.to_value()],
    )?;
    if result.is_undefined() {
        return Ok(None);
    }
    Ok(Some(PartialDescriptor::from_value(ctx, &result)?.to_complete()))
}

/// Property read; `receiver` is the object the lookup started at
pub fn proxy_get(
    ctx: &mut VmContext,
    proxy: &Arc<JsProxy>,
    key: &PropertyKey,
    receiver: &Value,
) -> VmResult<Value> {
    let args = [receiver.clone(), key.to_value()];
    match proxy.invoke(ctx, Trap::Get, "get", &args).into_result()? {
        Some(value) => Ok(value),
        None => derived_traps::derived_get(ctx, proxy, key, receiver),
    }
}

/// Property write; `receiver` differs from `obj` when the write was
/// inherited from an object whose chain reaches this proxy
pub fn proxy_set(
    ctx: &mut VmContext,
    obj: &Arc<JsObject>,
    proxy: &Arc<JsProxy>,
    key: &PropertyKey,
    value: Value,
    receiver: &Value,
) -> VmResult<bool> {
    let args = [receiver.clone(), key.to_value(), value.clone()];
    if let Some(result) = proxy.invoke(ctx, Trap::Set, "set", &args).into_result()? {
        return Ok(result.to_boolean());
    }
    match receiver.as_object() {
        Some(target) if !Arc::ptr_eq(target, obj) => {
            derived_traps::derived_inherited_set(ctx, proxy, key, value, target)
        }
        _ => derived_traps::derived_set(ctx, proxy, key, value, receiver),
    }
}

/// `in`
pub fn proxy_has(ctx: &mut VmContext, proxy: &Arc<JsProxy>, key: &PropertyKey) -> VmResult<bool> {
    match proxy
        .invoke(ctx, Trap::Has, "has", &[key.to_value()])
        .into_result()?
    {
        Some(result) => Ok(result.to_boolean()),
        None => derived_traps::derived_has(ctx, proxy, key),
    }
}

/// `hasOwnProperty`
pub fn proxy_has_own(
    ctx: &mut VmContext,
    proxy: &Arc<JsProxy>,
    key: &PropertyKey,
) -> VmResult<bool> {
    match proxy
        .invoke(ctx, Trap::HasOwn, "hasOwn", &[key.to_value()])
        .into_result()?
    {
        Some(result) => Ok(result.to_boolean()),
        None => derived_traps::derived_has_own(ctx, proxy, key),
    }
}

/// `delete`; the caller decides whether `false` throws
pub fn proxy_delete(
    ctx: &mut VmContext,
    proxy: &Arc<JsProxy>,
    key: &PropertyKey,
) -> VmResult<bool> {
    let result = proxy.invoke_required(ctx, Trap::Delete, "delete", &[key.to_value()])?;
    Ok(result.to_boolean())
}

/// `defineProperty`
///
/// When the handler can describe the property, the request is first
/// reconciled against that answer. `trap_descriptor` is the fresh object
/// the trap receives.
pub fn proxy_define_property(
    ctx: &mut VmContext,
    proxy: &Arc<JsProxy>,
    key: &PropertyKey,
    desc: &PartialDescriptor,
    trap_descriptor: Arc<JsObject>,
) -> VmResult<()> {
    let name = key.to_value();

    if let Some(describe) = proxy.trap(ctx, Trap::GetOwnPropertyDescriptor)? {
        let current = describe.call(ctx, "defineProperty", &[name.clone()])?;
        if current.is_object() {
            let current = PartialDescriptor::from_value(ctx, &current)?.to_complete();
            reconcile(Some(&current), true, desc).map_err(|reason| {
                VmError::type_error(format!("Cannot redefine property: {key} ({reason})"))
            })?;
        }
    }

    let accepted = proxy.invoke_required(
        ctx,
        Trap::DefineProperty,
        "defineProperty",
        &[name, Value::object(trap_descriptor)],
    )?;
    if !accepted.to_boolean() {
        return Err(VmError::type_error(format!(
            "Proxy handler rejected definition of property '{key}'"
        )));
    }
    Ok(())
}

/// `Object.getOwnPropertyNames`: every element goes through ToString
pub fn proxy_own_property_names(
    ctx: &mut VmContext,
    proxy: &Arc<JsProxy>,
) -> VmResult<Vec<PropertyKey>> {
    let names = proxy.invoke_required(
        ctx,
        Trap::GetOwnPropertyNames,
        "getOwnPropertyNames",
        &[],
    )?;
    keys_from_list(ctx, &names)
}

/// `Object.keys`
pub fn proxy_keys(ctx: &mut VmContext, proxy: &Arc<JsProxy>) -> VmResult<Vec<PropertyKey>> {
    match proxy.invoke(ctx, Trap::Keys, "keys", &[]).into_result()? {
        Some(list) => keys_from_list(ctx, &list),
        None => Ok(derived_traps::derived_keys(ctx, proxy)?
            .iter()
            .map(PropertyKey::from_value)
            .collect()),
    }
}

/// for-in over the proxy's part of a chain
pub fn proxy_enumerate(ctx: &mut VmContext, proxy: &Arc<JsProxy>) -> VmResult<Vec<PropertyKey>> {
    match proxy
        .invoke(ctx, Trap::Enumerate, "enumerate", &[])
        .into_result()?
    {
        Some(list) => keys_from_list(ctx, &list),
        None => Ok(derived_traps::derived_enumerate(ctx, proxy)?
            .iter()
            .map(PropertyKey::from_value)
            .collect()),
    }
}

/// Fix a live proxy: run its `fix` trap once, build the concrete table,
/// apply `level`, and swap the backing in one step.
///
/// If the trap throws or returns undefined the proxy stays live.
pub fn fix_proxy(
    ctx: &mut VmContext,
    obj: &Arc<JsObject>,
    proxy: &Arc<JsProxy>,
    level: IntegrityLevel,
) -> VmResult<FixOutcome> {
    let operation = level.operation_name();
    let props = proxy.invoke_required(ctx, Trap::Fix, operation, &[])?;
    let Some(props_obj) = props.as_object() else {
        return Err(VmError::type_error(format!(
            "Proxy fix trap returned {} instead of a property map ({operation})",
            props.to_display_string()
        )));
    };

    let mut table = PropertyTable::new();
    for name in ctx.own_keys(props_obj)? {
        let desc_value = ctx.get(&props, &name)?;
        let desc = PartialDescriptor::from_value(ctx, &desc_value)?;
        table.define(name.clone(), &desc).map_err(|reason| {
            VmError::type_error(format!("Invalid fix result for property '{name}' ({reason})"))
        })?;
    }
    table.apply_integrity(level);

    let installed = table.len();
    if obj.finish_fixing(table) {
        tracing::debug!(properties = installed, ?level, "fixed proxy");
        Ok(FixOutcome::Fixed)
    } else {
        tracing::debug!(?level, "proxy fixed by a reentrant call; discarding fix result");
        Ok(FixOutcome::AlreadyFixed)
    }
}
