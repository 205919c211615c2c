//! Execution context
//!
//! `VmContext` holds the realm's intrinsics and implements the generic
//! object protocol. Every operation first checks whether it landed on a
//! live proxy and, if so, hands off to [`crate::proxy_operations`].
//! Ordinary and fixed objects are served from their property tables.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::descriptor::PartialDescriptor;
use crate::error::{VmError, VmResult};
use crate::globals;
use crate::object::{
    Callable, IntegrityLevel, JsObject, PropertyAttributes, PropertyDescriptor, PropertyKey,
};
use crate::proxy::{JsProxy, ObjectHandler, TrapProvider};
use crate::proxy_operations::{self, FixOutcome};
use crate::runtime::RuntimeConfig;
use crate::string::{JsString, well_known};
use crate::value::{NativeFn, Value};

/// Strict or sloppy semantics for failed assignments and deletes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Failures are silent no-ops
    Sloppy,
    /// Failures throw a TypeError
    Strict,
}

/// Realm intrinsics the object protocol needs
#[derive(Clone)]
pub struct Intrinsics {
    /// `Object.prototype`
    pub object_prototype: Arc<JsObject>,
    /// `Function.prototype`
    pub function_prototype: Arc<JsObject>,
}

/// Execution context
pub struct VmContext {
    intrinsics: Intrinsics,
    global: Arc<JsObject>,
    config: RuntimeConfig,
    strictness: Strictness,
    /// Native call nesting
    call_depth: usize,
}

impl VmContext {
    /// Create a context with fresh intrinsics and globals
    pub fn new(config: RuntimeConfig) -> Self {
        let object_prototype = Arc::new(JsObject::new(None));
        let noop: NativeFn = Arc::new(|_, _, _| Ok(Value::undefined()));
        let function_prototype = Arc::new(JsObject::function(
            Some(object_prototype.clone()),
            Callable::Native(noop),
        ));
        let global = Arc::new(JsObject::new(Some(object_prototype.clone())));
        let strictness = if config.strict_mode {
            Strictness::Strict
        } else {
            Strictness::Sloppy
        };

        let mut ctx = Self {
            intrinsics: Intrinsics {
                object_prototype,
                function_prototype,
            },
            global,
            config,
            strictness,
            call_depth: 0,
        };
        globals::setup_global_object(&mut ctx);
        ctx
    }

    /// Realm intrinsics
    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    /// Get the global object
    pub fn global(&self) -> &Arc<JsObject> {
        &self.global
    }

    /// Read a global binding (no accessors or traps involved)
    pub fn get_global(&self, name: &str) -> Option<Value> {
        self.global
            .own_descriptor(&PropertyKey::string(name))
            .and_then(|desc| desc.value().cloned())
    }

    /// Install a global binding
    pub fn set_global(&self, name: &str, value: Value) {
        self.global.define_property(
            PropertyKey::string(name),
            PropertyDescriptor::data_with_attrs(value, PropertyAttributes::builtin_method()),
        );
    }

    /// Runtime configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Current strictness
    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Switch strictness
    pub fn set_strictness(&mut self, strictness: Strictness) {
        self.strictness = strictness;
    }

    /// Whether failed writes and deletes throw
    pub fn is_strict(&self) -> bool {
        self.strictness == Strictness::Strict
    }

    /// Current native call nesting
    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    // ---------------------------------------------------------------------
    // Allocation
    // ---------------------------------------------------------------------

    /// Create an empty object inheriting from `Object.prototype`
    pub fn new_object(&self) -> Arc<JsObject> {
        Arc::new(JsObject::new(Some(self.intrinsics.object_prototype.clone())))
    }

    /// Create an empty object with an explicit prototype
    pub fn new_object_with_proto(&self, prototype: Option<Arc<JsObject>>) -> Arc<JsObject> {
        Arc::new(JsObject::new(prototype))
    }

    /// Create a native function with `length` and `name`
    pub fn native_function<F>(&self, name: &str, length: u32, f: F) -> Value
    where
        F: Fn(&Value, &[Value], &mut VmContext) -> VmResult<Value> + Send + Sync + 'static,
    {
        let func = Arc::new(JsObject::function(
            Some(self.intrinsics.function_prototype.clone()),
            Callable::Native(Arc::new(f)),
        ));
        let hidden = PropertyAttributes {
            writable: false,
            enumerable: false,
            configurable: false,
        };
        func.define_property(
            PropertyKey::from_js_string(well_known::LENGTH.clone()),
            PropertyDescriptor::data_with_attrs(Value::from(length), hidden),
        );
        func.define_property(
            PropertyKey::from_js_string(well_known::NAME.clone()),
            PropertyDescriptor::data_with_attrs(Value::from(name), hidden),
        );
        Value::object(func)
    }

    /// Create an array-like object holding `items`
    pub fn create_array(&self, items: Vec<Value>) -> Value {
        let arr = Arc::new(JsObject::array(Some(self.intrinsics.object_prototype.clone())));
        let len = array_length(items.len());
        for (i, item) in (0..len).zip(items) {
            arr.define_property(PropertyKey::Index(i), PropertyDescriptor::data(item));
        }
        arr.define_property(
            PropertyKey::from_js_string(well_known::LENGTH.clone()),
            PropertyDescriptor::data_with_attrs(
                Value::from(len),
                PropertyAttributes {
                    writable: true,
                    enumerable: false,
                    configurable: false,
                },
            ),
        );
        Value::object(arr)
    }

    /// CreateListFromArrayLike: read `length`, then every index
    pub fn create_list_from_array_like(&mut self, value: &Value) -> VmResult<Vec<Value>> {
        if !value.is_object() {
            return Err(VmError::type_error(format!(
                "{} is not an array-like object",
                value.to_display_string()
            )));
        }
        let len = self.get(value, &PropertyKey::from_js_string(well_known::LENGTH.clone()))?;
        let len = to_length(len.to_number());
        let mut items = Vec::with_capacity(len.min(1024) as usize);
        for i in 0..len {
            items.push(self.get(value, &PropertyKey::Index(i))?);
        }
        Ok(items)
    }

    // ---------------------------------------------------------------------
    // Proxies
    // ---------------------------------------------------------------------

    /// Create an object proxy over a JS handler object.
    /// A non-object prototype is treated as null.
    pub fn create_object_proxy(&self, handler: Value, prototype: Value) -> VmResult<Value> {
        let provider: Arc<dyn TrapProvider> = Arc::new(ObjectHandler::new(handler)?);
        Ok(self.create_proxy_with_provider(provider, prototype.as_object().cloned()))
    }

    /// Create an object proxy over any trap provider
    pub fn create_proxy_with_provider(
        &self,
        provider: Arc<dyn TrapProvider>,
        prototype: Option<Arc<JsObject>>,
    ) -> Value {
        Value::object(Arc::new(JsObject::proxy(JsProxy::new(provider), prototype, None)))
    }

    /// Create a function proxy. `construct_trap` may be undefined.
    pub fn create_function_proxy(
        &self,
        handler: Value,
        call_trap: Value,
        construct_trap: Value,
    ) -> VmResult<Value> {
        let provider: Arc<dyn TrapProvider> = Arc::new(ObjectHandler::new(handler)?);
        if !call_trap.is_callable() {
            return Err(VmError::type_error(format!(
                "Proxy call trap {} is not a function",
                call_trap.to_display_string()
            )));
        }
        let construct_trap = if construct_trap.is_undefined() {
            None
        } else if construct_trap.is_callable() {
            Some(construct_trap)
        } else {
            return Err(VmError::type_error(format!(
                "Proxy construct trap {} is not a function",
                construct_trap.to_display_string()
            )));
        };
        let callable = Callable::ProxyTraps {
            call_trap,
            construct_trap,
        };
        Ok(Value::object(Arc::new(JsObject::proxy(
            JsProxy::new(provider),
            Some(self.intrinsics.function_prototype.clone()),
            Some(callable),
        ))))
    }

    // ---------------------------------------------------------------------
    // Property reads
    // ---------------------------------------------------------------------

    /// [[Get]] on any value. Primitives other than strings read as
    /// undefined; undefined and null throw.
    pub fn get(&mut self, target: &Value, key: &PropertyKey) -> VmResult<Value> {
        match target {
            Value::Object(obj) => self.get_with_receiver(obj, key, target),
            Value::Undefined | Value::Null => Err(VmError::type_error(format!(
                "Cannot read property '{key}' of {}",
                target.to_display_string()
            ))),
            Value::String(s) => match key {
                PropertyKey::String(name) if name.as_str() == "length" => {
                    Ok(Value::from(s.len_utf16() as u32))
                }
                _ => Ok(Value::undefined()),
            },
            Value::Boolean(_) | Value::Number(_) => Ok(Value::undefined()),
        }
    }

    /// [[Get]] with an explicit receiver for accessor and trap `this`
    pub fn get_with_receiver(
        &mut self,
        obj: &Arc<JsObject>,
        key: &PropertyKey,
        receiver: &Value,
    ) -> VmResult<Value> {
        let mut current = obj.clone();
        loop {
            if let Some(proxy) = current.live_proxy() {
                return proxy_operations::proxy_get(self, &proxy, key, receiver);
            }
            match current.own_descriptor(key) {
                Some(PropertyDescriptor::Data { value, .. }) => return Ok(value),
                Some(PropertyDescriptor::Accessor { get, .. }) => {
                    return match get {
                        Some(getter) => self.call(&getter, receiver, &[]),
                        None => Ok(Value::undefined()),
                    };
                }
                None => match current.prototype().cloned() {
                    Some(proto) => current = proto,
                    None => return Ok(Value::undefined()),
                },
            }
        }
    }

    /// [[HasProperty]]
    pub fn has_property(&mut self, obj: &Arc<JsObject>, key: &PropertyKey) -> VmResult<bool> {
        let mut current = obj.clone();
        loop {
            if let Some(proxy) = current.live_proxy() {
                return proxy_operations::proxy_has(self, &proxy, key);
            }
            if current.own_descriptor(key).is_some() {
                return Ok(true);
            }
            match current.prototype().cloned() {
                Some(proto) => current = proto,
                None => return Ok(false),
            }
        }
    }

    /// Own-property presence (`hasOwnProperty`)
    pub fn has_own_property(&mut self, obj: &Arc<JsObject>, key: &PropertyKey) -> VmResult<bool> {
        match obj.live_proxy() {
            Some(proxy) => proxy_operations::proxy_has_own(self, &proxy, key),
            None => Ok(obj.own_descriptor(key).is_some()),
        }
    }

    /// [[GetOwnProperty]], normalized to a complete descriptor
    pub fn get_own_property(
        &mut self,
        obj: &Arc<JsObject>,
        key: &PropertyKey,
    ) -> VmResult<Option<PropertyDescriptor>> {
        match obj.live_proxy() {
            Some(proxy) => proxy_operations::proxy_get_own_property(self, &proxy, key),
            None => Ok(obj.own_descriptor(key)),
        }
    }

    // ---------------------------------------------------------------------
    // Property writes
    // ---------------------------------------------------------------------

    /// [[Put]]: `false` when the write was rejected
    pub fn set(&mut self, target: &Value, key: &PropertyKey, value: Value) -> VmResult<bool> {
        match target {
            Value::Object(obj) => self.set_with_receiver(obj, key, value, obj),
            Value::Undefined | Value::Null => Err(VmError::type_error(format!(
                "Cannot set property '{key}' of {}",
                target.to_display_string()
            ))),
            _ => Ok(false),
        }
    }

    /// [[Put]] starting at `obj` on behalf of `receiver`
    ///
    /// Walks `obj`'s chain. A live proxy on the way answers for the rest
    /// of the chain through its `set` trap (or the derived one).
    pub fn set_with_receiver(
        &mut self,
        obj: &Arc<JsObject>,
        key: &PropertyKey,
        value: Value,
        receiver: &Arc<JsObject>,
    ) -> VmResult<bool> {
        let mut current = obj.clone();
        loop {
            if let Some(proxy) = current.live_proxy() {
                return proxy_operations::proxy_set(
                    self,
                    &current,
                    &proxy,
                    key,
                    value,
                    &Value::object(receiver.clone()),
                );
            }
            match current.own_descriptor(key) {
                Some(PropertyDescriptor::Data { attributes, .. }) => {
                    if !attributes.writable {
                        return Ok(false);
                    }
                    if Arc::ptr_eq(&current, receiver) {
                        return Ok(current
                            .with_table_mut(|table| table.write_value(key, value))
                            .unwrap_or(false));
                    }
                    break;
                }
                Some(PropertyDescriptor::Accessor { set, .. }) => {
                    return match set {
                        Some(setter) => {
                            self.call(&setter, &Value::object(receiver.clone()), &[value])?;
                            Ok(true)
                        }
                        None => Ok(false),
                    };
                }
                None => match current.prototype().cloned() {
                    Some(proto) => current = proto,
                    None => break,
                },
            }
        }
        self.create_data_property(receiver, key, value)
    }

    /// Assignment expression: returns the right-hand side, throws in
    /// strict mode when the write was rejected
    pub fn assign(&mut self, target: &Value, key: &PropertyKey, value: Value) -> VmResult<Value> {
        let ok = self.set(target, key, value.clone())?;
        if !ok && self.is_strict() {
            return Err(VmError::type_error(format!(
                "Cannot assign to read only property '{key}' of {}",
                target.to_display_string()
            )));
        }
        Ok(value)
    }

    /// Define a writable, enumerable, configurable own data property
    pub fn create_data_property(
        &mut self,
        obj: &Arc<JsObject>,
        key: &PropertyKey,
        value: Value,
    ) -> VmResult<bool> {
        let desc = PartialDescriptor {
            value: Some(value),
            writable: Some(true),
            enumerable: Some(true),
            configurable: Some(true),
            ..Default::default()
        };
        match obj.live_proxy() {
            Some(proxy) => {
                let trap_descriptor = desc.to_object(self);
                proxy_operations::proxy_define_property(self, &proxy, key, &desc, trap_descriptor)?;
                Ok(true)
            }
            None => Ok(obj
                .with_table_mut(|table| table.define(key.clone(), &desc).is_ok())
                .unwrap_or(false)),
        }
    }

    /// [[DefineOwnProperty]] with Throw = true
    pub fn define_own_property(
        &mut self,
        obj: &Arc<JsObject>,
        key: &PropertyKey,
        desc: &PartialDescriptor,
    ) -> VmResult<()> {
        match obj.live_proxy() {
            Some(proxy) => {
                let trap_descriptor = desc.to_object(self);
                proxy_operations::proxy_define_property(self, &proxy, key, desc, trap_descriptor)
            }
            None => define_in_table(obj, key, desc),
        }
    }

    /// `Object.defineProperty` path: converts `attributes` and, for a
    /// live proxy, hands the trap a copy that keeps the caller's extra
    /// own enumerable attributes
    pub fn define_own_property_from(
        &mut self,
        obj: &Arc<JsObject>,
        key: &PropertyKey,
        attributes: &Value,
    ) -> VmResult<()> {
        let desc = PartialDescriptor::from_value(self, attributes)?;
        let Some(proxy) = obj.live_proxy() else {
            return define_in_table(obj, key, &desc);
        };
        let trap_descriptor = desc.to_object(self);
        if let Some(source) = attributes.as_object() {
            for extra in self.own_keys(source)? {
                let is_field = matches!(&extra, PropertyKey::String(name)
                    if PartialDescriptor::is_field_name(name.as_str()));
                if is_field {
                    continue;
                }
                let value = self.get(attributes, &extra)?;
                trap_descriptor.define_property(extra, PropertyDescriptor::data(value));
            }
        }
        proxy_operations::proxy_define_property(self, &proxy, key, &desc, trap_descriptor)
    }

    /// [[Delete]]: `false` when the property could not be removed
    pub fn delete_property(&mut self, obj: &Arc<JsObject>, key: &PropertyKey) -> VmResult<bool> {
        match obj.live_proxy() {
            Some(proxy) => proxy_operations::proxy_delete(self, &proxy, key),
            None => Ok(obj.with_table_mut(|table| table.remove(key)).unwrap_or(false)),
        }
    }

    /// `delete` expression: a `false` result throws in strict mode
    pub fn delete(&mut self, target: &Value, key: &PropertyKey) -> VmResult<bool> {
        let obj = match target {
            Value::Object(obj) => obj,
            Value::Undefined | Value::Null => {
                return Err(VmError::type_error(format!(
                    "Cannot convert {} to object",
                    target.to_display_string()
                )));
            }
            _ => return Ok(true),
        };
        let deleted = self.delete_property(obj, key)?;
        if !deleted && self.is_strict() {
            return Err(VmError::type_error(format!("Cannot delete property '{key}'")));
        }
        Ok(deleted)
    }

    // ---------------------------------------------------------------------
    // Enumeration
    // ---------------------------------------------------------------------

    /// All own property names, enumerable or not
    pub fn own_property_names(&mut self, obj: &Arc<JsObject>) -> VmResult<Vec<PropertyKey>> {
        match obj.live_proxy() {
            Some(proxy) => proxy_operations::proxy_own_property_names(self, &proxy),
            None => Ok(obj.with_table(|table| table.keys()).unwrap_or_default()),
        }
    }

    /// Own enumerable names (`Object.keys`)
    pub fn own_keys(&mut self, obj: &Arc<JsObject>) -> VmResult<Vec<PropertyKey>> {
        match obj.live_proxy() {
            Some(proxy) => proxy_operations::proxy_keys(self, &proxy),
            None => Ok(obj
                .with_table(|table| {
                    table
                        .keys()
                        .into_iter()
                        .filter(|k| table.get(k).is_some_and(|d| d.is_enumerable()))
                        .collect()
                })
                .unwrap_or_default()),
        }
    }

    /// for-in order: own enumerable names, then each prototype's,
    /// skipping shadowed names. A live proxy answers for its part of the
    /// chain.
    pub fn enumerate(&mut self, obj: &Arc<JsObject>) -> VmResult<Vec<PropertyKey>> {
        let mut seen = FxHashSet::default();
        let mut names = Vec::new();
        let mut current = Some(obj.clone());
        while let Some(object) = current {
            if let Some(proxy) = object.live_proxy() {
                for key in proxy_operations::proxy_enumerate(self, &proxy)? {
                    if seen.insert(key.clone()) {
                        names.push(key);
                    }
                }
                break;
            }
            let own: Vec<(PropertyKey, bool)> = object
                .with_table(|table| {
                    table
                        .keys()
                        .into_iter()
                        .map(|k| {
                            let enumerable = table.get(&k).is_some_and(|d| d.is_enumerable());
                            (k, enumerable)
                        })
                        .collect()
                })
                .unwrap_or_default();
            for (key, enumerable) in own {
                if seen.insert(key.clone()) && enumerable {
                    names.push(key);
                }
            }
            current = object.prototype().cloned();
        }
        Ok(names)
    }

    // ---------------------------------------------------------------------
    // Integrity
    // ---------------------------------------------------------------------

    /// `Object.preventExtensions`
    pub fn prevent_extensions(&mut self, obj: &Arc<JsObject>) -> VmResult<()> {
        self.set_integrity_level(obj, IntegrityLevel::NonExtensible)
    }

    /// `Object.seal`
    pub fn seal(&mut self, obj: &Arc<JsObject>) -> VmResult<()> {
        self.set_integrity_level(obj, IntegrityLevel::Sealed)
    }

    /// `Object.freeze`
    pub fn freeze(&mut self, obj: &Arc<JsObject>) -> VmResult<()> {
        self.set_integrity_level(obj, IntegrityLevel::Frozen)
    }

    /// Apply an integrity level, fixing a live proxy first
    pub fn set_integrity_level(
        &mut self,
        obj: &Arc<JsObject>,
        level: IntegrityLevel,
    ) -> VmResult<()> {
        if let Some(proxy) = obj.live_proxy() {
            match proxy_operations::fix_proxy(self, obj, &proxy, level)? {
                FixOutcome::Fixed => return Ok(()),
                FixOutcome::AlreadyFixed => {}
            }
        }
        obj.with_table_mut(|table| table.apply_integrity(level));
        Ok(())
    }

    /// `Object.isExtensible`; live proxies are always extensible
    pub fn is_extensible(&self, obj: &Arc<JsObject>) -> bool {
        obj.with_table(|table| table.is_extensible()).unwrap_or(true)
    }

    /// `Object.isSealed`; live proxies are never sealed
    pub fn is_sealed(&self, obj: &Arc<JsObject>) -> bool {
        obj.with_table(|table| table.test_integrity(IntegrityLevel::Sealed))
            .unwrap_or(false)
    }

    /// `Object.isFrozen`; live proxies are never frozen
    pub fn is_frozen(&self, obj: &Arc<JsObject>) -> bool {
        obj.with_table(|table| table.test_integrity(IntegrityLevel::Frozen))
            .unwrap_or(false)
    }

    // ---------------------------------------------------------------------
    // Prototype chain
    // ---------------------------------------------------------------------

    /// The static prototype slot
    pub fn get_prototype_of(&self, obj: &Arc<JsObject>) -> Option<Arc<JsObject>> {
        obj.prototype().cloned()
    }

    /// `proto.isPrototypeOf(obj)`
    pub fn is_prototype_of(&self, proto: &Arc<JsObject>, obj: &Arc<JsObject>) -> bool {
        let mut current = obj.prototype().cloned();
        while let Some(object) = current {
            if Arc::ptr_eq(&object, proto) {
                return true;
            }
            current = object.prototype().cloned();
        }
        false
    }

    /// `value instanceof constructor`
    pub fn instance_of(&mut self, value: &Value, constructor: &Value) -> VmResult<bool> {
        if !constructor.is_callable() {
            return Err(VmError::type_error(
                "Right-hand side of 'instanceof' is not callable",
            ));
        }
        let Some(obj) = value.as_object() else {
            return Ok(false);
        };
        let proto = self.get(
            constructor,
            &PropertyKey::from_js_string(well_known::PROTOTYPE.clone()),
        )?;
        let Some(proto) = proto.as_object() else {
            return Err(VmError::type_error(
                "Function has non-object prototype in instanceof check",
            ));
        };
        Ok(self.is_prototype_of(proto, obj))
    }

    // ---------------------------------------------------------------------
    // Calls
    // ---------------------------------------------------------------------

    /// [[Call]]
    pub fn call(&mut self, callee: &Value, this: &Value, args: &[Value]) -> VmResult<Value> {
        let Some(callable) = callee.as_object().and_then(|obj| obj.callable().cloned()) else {
            return Err(VmError::type_error(format!(
                "{} is not a function",
                callee.to_display_string()
            )));
        };
        self.enter_call()?;
        let result = match callable {
            Callable::Native(func) => func(this, args, self),
            Callable::ProxyTraps { call_trap, .. } => self.call(&call_trap, this, args),
        };
        self.call_depth -= 1;
        result
    }

    /// [[Construct]]
    pub fn construct(&mut self, callee: &Value, args: &[Value]) -> VmResult<Value> {
        let Some(callable) = callee.as_object().and_then(|obj| obj.callable().cloned()) else {
            return Err(VmError::type_error(format!(
                "{} is not a constructor",
                callee.to_display_string()
            )));
        };
        match callable {
            Callable::ProxyTraps {
                construct_trap: Some(construct_trap),
                ..
            } => {
                let result = self.call(&construct_trap, &Value::undefined(), args)?;
                if !result.is_object() {
                    return Err(VmError::type_error(format!(
                        "Proxy construct trap returned non-object {}",
                        result.to_display_string()
                    )));
                }
                Ok(result)
            }
            Callable::ProxyTraps { call_trap, .. } => {
                let receiver = self.ordinary_create_from_constructor(callee)?;
                let result = self.call(&call_trap, &receiver, args)?;
                Ok(if result.is_object() { result } else { receiver })
            }
            Callable::Native(_) => {
                let receiver = self.ordinary_create_from_constructor(callee)?;
                let result = self.call(callee, &receiver, args)?;
                Ok(if result.is_object() { result } else { receiver })
            }
        }
    }

    fn ordinary_create_from_constructor(&mut self, constructor: &Value) -> VmResult<Value> {
        let proto = self.get(
            constructor,
            &PropertyKey::from_js_string(well_known::PROTOTYPE.clone()),
        )?;
        let proto = proto
            .as_object()
            .cloned()
            .unwrap_or_else(|| self.intrinsics.object_prototype.clone());
        Ok(Value::object(self.new_object_with_proto(Some(proto))))
    }

    fn enter_call(&mut self) -> VmResult<()> {
        if self.call_depth >= self.config.max_stack_depth {
            return Err(VmError::StackOverflow);
        }
        self.call_depth += 1;
        Ok(())
    }

    /// `typeof`
    pub fn type_of(&self, value: &Value) -> Arc<JsString> {
        JsString::intern(value.type_of())
    }
}

impl Drop for VmContext {
    /// Break the realm's reference cycles.
    ///
    /// Constructors and prototypes point at each other and the global
    /// object holds itself through `globalThis`, so the intrinsic tables
    /// are emptied before the context goes away.
    fn drop(&mut self) {
        self.global.clear_properties();
        self.intrinsics.object_prototype.clear_properties();
        self.intrinsics.function_prototype.clear_properties();
        tracing::trace!("realm torn down");
    }
}

fn define_in_table(
    obj: &Arc<JsObject>,
    key: &PropertyKey,
    desc: &PartialDescriptor,
) -> VmResult<()> {
    match obj.with_table_mut(|table| table.define(key.clone(), desc)) {
        Some(Ok(())) => Ok(()),
        Some(Err(reason)) => Err(VmError::type_error(format!(
            "Cannot redefine property: {key} ({reason})"
        ))),
        None => Err(VmError::internal("property table requested on a live proxy")),
    }
}

/// Element count as an array length, saturating at `u32::MAX`
fn array_length(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// ToUint32-style clamp used for array-like lengths
fn to_length(n: f64) -> u32 {
    if n.is_nan() || n <= 0.0 {
        0
    } else if n >= u32::MAX as f64 {
        u32::MAX
    } else {
        n.trunc() as u32
    }
}
