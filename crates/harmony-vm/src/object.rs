//! JavaScript objects
//!
//! Every object owns a [`Backing`]: an ordinary property table, a live
//! proxy handler, or the table a proxy was fixed into. Fixing swaps the
//! backing under one write lock, so no caller can see a half-fixed object.
//!
//! Nothing in this module calls user code. Accessors and traps are invoked
//! by [`crate::context::VmContext`] after the relevant lock is released.

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;

use crate::descriptor::PartialDescriptor;
use crate::proxy::JsProxy;
use crate::string::JsString;
use crate::value::{NativeFn, Value};

/// Property key
///
/// Keys are canonical: a string that spells an array index is stored as
/// [`PropertyKey::Index`], so `p["77"]` and `p[77]` name the same slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// String property key
    String(Arc<JsString>),
    /// Integer index
    Index(u32),
}

impl PropertyKey {
    /// Create a string property key
    pub fn string(s: &str) -> Self {
        Self::from_js_string(JsString::intern(s))
    }

    /// Create from an interned string
    pub fn from_js_string(s: Arc<JsString>) -> Self {
        match s.as_array_index() {
            Some(i) => Self::Index(i),
            None => Self::String(s),
        }
    }

    /// Create an index property key
    pub fn index(i: u32) -> Self {
        Self::Index(i)
    }

    /// ToPropertyKey: ToString, then canonicalize
    pub fn from_value(value: &Value) -> Self {
        Self::from_js_string(value.to_js_string())
    }

    /// The string form handed to traps ("99", never the number 99)
    pub fn to_js_string(&self) -> Arc<JsString> {
        match self {
            Self::String(s) => s.clone(),
            Self::Index(i) => JsString::intern(&i.to_string()),
        }
    }

    /// The string form as a value
    pub fn to_value(&self) -> Value {
        Value::string(self.to_js_string())
    }
}

impl std::fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "{}", s.as_str()),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<u32> for PropertyKey {
    fn from(i: u32) -> Self {
        Self::Index(i)
    }
}

impl From<Arc<JsString>> for PropertyKey {
    fn from(s: Arc<JsString>) -> Self {
        Self::from_js_string(s)
    }
}

impl From<&PropertyKey> for PropertyKey {
    fn from(key: &PropertyKey) -> Self {
        key.clone()
    }
}

/// Property attributes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropertyAttributes {
    /// Property is writable (data properties only)
    pub writable: bool,
    /// Property is enumerable
    pub enumerable: bool,
    /// Property is configurable
    pub configurable: bool,
}

impl PropertyAttributes {
    /// Default data property attributes
    pub const fn data() -> Self {
        Self {
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }

    /// Builtin method attributes: writable, configurable, not enumerable
    pub const fn builtin_method() -> Self {
        Self {
            writable: true,
            enumerable: false,
            configurable: true,
        }
    }

    /// Non-writable, non-enumerable, non-configurable
    pub const fn frozen() -> Self {
        Self {
            writable: false,
            enumerable: false,
            configurable: false,
        }
    }
}

/// Complete property descriptor, as stored in a property table
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyDescriptor {
    /// Data property
    Data {
        /// The value
        value: Value,
        /// Attributes
        attributes: PropertyAttributes,
    },
    /// Accessor property
    Accessor {
        /// Getter function (`None` is undefined)
        get: Option<Value>,
        /// Setter function (`None` is undefined)
        set: Option<Value>,
        /// Attributes (`writable` is unused)
        attributes: PropertyAttributes,
    },
}

impl PropertyDescriptor {
    /// Create a data property
    pub fn data(value: Value) -> Self {
        Self::Data {
            value,
            attributes: PropertyAttributes::data(),
        }
    }

    /// Create a data property with specific attributes
    pub fn data_with_attrs(value: Value, attributes: PropertyAttributes) -> Self {
        Self::Data { value, attributes }
    }

    /// Builtin method slot: writable, configurable, not enumerable
    pub fn builtin_method(value: Value) -> Self {
        Self::Data {
            value,
            attributes: PropertyAttributes::builtin_method(),
        }
    }

    /// Get the value (for data properties)
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Data { value, .. } => Some(value),
            Self::Accessor { .. } => None,
        }
    }

    /// Check if this is a data property
    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data { .. })
    }

    /// Check if this is an accessor property
    pub fn is_accessor(&self) -> bool {
        matches!(self, Self::Accessor { .. })
    }

    /// Check if writable
    pub fn is_writable(&self) -> bool {
        match self {
            Self::Data { attributes, .. } => attributes.writable,
            Self::Accessor { .. } => false,
        }
    }

    /// Attributes
    pub fn attributes(&self) -> PropertyAttributes {
        match self {
            Self::Data { attributes, .. } | Self::Accessor { attributes, .. } => *attributes,
        }
    }

    fn attributes_mut(&mut self) -> &mut PropertyAttributes {
        match self {
            Self::Data { attributes, .. } | Self::Accessor { attributes, .. } => attributes,
        }
    }

    /// Check if enumerable
    pub fn is_enumerable(&self) -> bool {
        self.attributes().enumerable
    }

    /// Check if configurable
    pub fn is_configurable(&self) -> bool {
        self.attributes().configurable
    }

    fn getter_value(&self) -> Value {
        match self {
            Self::Accessor { get, .. } => get.clone().unwrap_or_default(),
            Self::Data { .. } => Value::undefined(),
        }
    }

    fn setter_value(&self) -> Value {
        match self {
            Self::Accessor { set, .. } => set.clone().unwrap_or_default(),
            Self::Data { .. } => Value::undefined(),
        }
    }
}

/// Why a property definition was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RedefineError {
    /// New property on a non-extensible object
    #[error("object is not extensible")]
    NotExtensible,
    /// Making a non-configurable property configurable
    #[error("cannot change configurability of a non-configurable property")]
    Configurability,
    /// Flipping enumerability of a non-configurable property
    #[error("cannot change enumerability of a non-configurable property")]
    Enumerability,
    /// Swapping data/accessor kind of a non-configurable property
    #[error("cannot change a non-configurable property between data and accessor")]
    KindChange,
    /// Making a non-configurable, non-writable property writable
    #[error("cannot make a non-configurable read-only property writable")]
    Writability,
    /// Changing the value of a non-configurable, non-writable property
    #[error("cannot change the value of a non-configurable read-only property")]
    ValueChange,
    /// Replacing the getter of a non-configurable accessor
    #[error("cannot change the getter of a non-configurable accessor")]
    GetterChange,
    /// Replacing the setter of a non-configurable accessor
    #[error("cannot change the setter of a non-configurable accessor")]
    SetterChange,
}

/// Own property reconciliation (ES5 8.12.9).
///
/// Compares `desc` against `current` and returns the descriptor the
/// property ends up with. The same check governs ordinary tables, fixed
/// proxies and the facade's validation of live proxies.
pub fn reconcile(
    current: Option<&PropertyDescriptor>,
    extensible: bool,
    desc: &PartialDescriptor,
) -> Result<PropertyDescriptor, RedefineError> {
    let Some(current) = current else {
        if !extensible {
            return Err(RedefineError::NotExtensible);
        }
        return Ok(desc.to_complete());
    };

    if desc.is_subset_of(current) {
        return Ok(current.clone());
    }

    if !current.is_configurable() {
        if desc.configurable == Some(true) {
            return Err(RedefineError::Configurability);
        }
        if desc
            .enumerable
            .is_some_and(|e| e != current.is_enumerable())
        {
            return Err(RedefineError::Enumerability);
        }
        if !desc.is_generic_descriptor() {
            if current.is_data() != desc.is_data_descriptor() {
                return Err(RedefineError::KindChange);
            }
            if let PropertyDescriptor::Data { value, attributes } = current
                && !attributes.writable
            {
                if desc.writable == Some(true) {
                    return Err(RedefineError::Writability);
                }
                if desc.value.as_ref().is_some_and(|v| !v.same_value(value)) {
                    return Err(RedefineError::ValueChange);
                }
            }
            if current.is_accessor() {
                if desc
                    .set
                    .as_ref()
                    .is_some_and(|s| !s.same_value(&current.setter_value()))
                {
                    return Err(RedefineError::SetterChange);
                }
                if desc
                    .get
                    .as_ref()
                    .is_some_and(|g| !g.same_value(&current.getter_value()))
                {
                    return Err(RedefineError::GetterChange);
                }
            }
        }
    }

    let attributes = PropertyAttributes {
        writable: false,
        enumerable: desc.enumerable.unwrap_or(current.is_enumerable()),
        configurable: desc.configurable.unwrap_or(current.is_configurable()),
    };

    let merged = if desc.is_data_descriptor() || (desc.is_generic_descriptor() && current.is_data())
    {
        let value = desc
            .value
            .clone()
            .or_else(|| current.value().cloned())
            .unwrap_or_default();
        PropertyDescriptor::Data {
            value,
            attributes: PropertyAttributes {
                writable: desc.writable.unwrap_or(current.is_writable()),
                ..attributes
            },
        }
    } else if desc.is_generic_descriptor() {
        let mut kept = current.clone();
        let slot = kept.attributes_mut();
        slot.enumerable = attributes.enumerable;
        slot.configurable = attributes.configurable;
        kept
    } else {
        let (mut get, mut set) = match current {
            PropertyDescriptor::Accessor { get, set, .. } => (get.clone(), set.clone()),
            PropertyDescriptor::Data { .. } => (None, None),
        };
        if let Some(g) = &desc.get {
            get = Some(g.clone()).filter(|g| !g.is_undefined());
        }
        if let Some(s) = &desc.set {
            set = Some(s.clone()).filter(|s| !s.is_undefined());
        }
        PropertyDescriptor::Accessor {
            get,
            set,
            attributes,
        }
    };
    Ok(merged)
}

/// Integrity levels reachable through freeze/seal/preventExtensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityLevel {
    /// `Object.preventExtensions`
    NonExtensible,
    /// `Object.seal`
    Sealed,
    /// `Object.freeze`
    Frozen,
}

impl IntegrityLevel {
    /// The builtin that requests this level
    pub fn operation_name(self) -> &'static str {
        match self {
            Self::NonExtensible => "Object.preventExtensions",
            Self::Sealed => "Object.seal",
            Self::Frozen => "Object.freeze",
        }
    }
}

/// Insertion-ordered property storage
#[derive(Clone, Debug)]
pub struct PropertyTable {
    properties: IndexMap<PropertyKey, PropertyDescriptor>,
    extensible: bool,
}

impl Default for PropertyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyTable {
    /// Create an empty, extensible table
    pub fn new() -> Self {
        Self {
            properties: IndexMap::new(),
            extensible: true,
        }
    }

    /// Look up an own property
    pub fn get(&self, key: &PropertyKey) -> Option<&PropertyDescriptor> {
        self.properties.get(key)
    }

    /// Check for an own property
    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.properties.contains_key(key)
    }

    /// Own keys: indices ascending, then strings in insertion order
    pub fn keys(&self) -> Vec<PropertyKey> {
        let mut indices: Vec<u32> = self
            .properties
            .keys()
            .filter_map(|k| match k {
                PropertyKey::Index(i) => Some(*i),
                PropertyKey::String(_) => None,
            })
            .collect();
        indices.sort_unstable();
        indices
            .into_iter()
            .map(PropertyKey::Index)
            .chain(
                self.properties
                    .keys()
                    .filter(|k| matches!(k, PropertyKey::String(_)))
                    .cloned(),
            )
            .collect()
    }

    /// Number of own properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check if the table has no properties
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Whether new properties may be added
    pub fn is_extensible(&self) -> bool {
        self.extensible
    }

    /// Insert or replace a property without validation (intrinsic setup)
    pub fn insert(&mut self, key: PropertyKey, desc: PropertyDescriptor) {
        self.properties.insert(key, desc);
    }

    /// Validated definition
    pub fn define(
        &mut self,
        key: PropertyKey,
        desc: &PartialDescriptor,
    ) -> Result<(), RedefineError> {
        let merged = reconcile(self.properties.get(&key), self.extensible, desc)?;
        self.properties.insert(key, merged);
        Ok(())
    }

    /// Overwrite the value of a writable data property
    pub fn write_value(&mut self, key: &PropertyKey, value: Value) -> bool {
        match self.properties.get_mut(key) {
            Some(PropertyDescriptor::Data {
                value: slot,
                attributes,
            }) if attributes.writable => {
                *slot = value;
                true
            }
            _ => false,
        }
    }

    /// Remove a property; `false` when it is non-configurable
    pub fn remove(&mut self, key: &PropertyKey) -> bool {
        match self.properties.get(key) {
            Some(desc) if !desc.is_configurable() => false,
            Some(_) => {
                self.properties.shift_remove(key);
                true
            }
            None => true,
        }
    }

    /// Apply an integrity level
    pub fn apply_integrity(&mut self, level: IntegrityLevel) {
        if level != IntegrityLevel::NonExtensible {
            for desc in self.properties.values_mut() {
                let frozen = level == IntegrityLevel::Frozen;
                match desc {
                    PropertyDescriptor::Data { attributes, .. } => {
                        attributes.configurable = false;
                        if frozen {
                            attributes.writable = false;
                        }
                    }
                    PropertyDescriptor::Accessor { attributes, .. } => {
                        attributes.configurable = false;
                    }
                }
            }
        }
        self.extensible = false;
    }

    /// Check an integrity level
    pub fn test_integrity(&self, level: IntegrityLevel) -> bool {
        if self.extensible {
            return false;
        }
        self.properties.values().all(|desc| match level {
            IntegrityLevel::NonExtensible => true,
            IntegrityLevel::Sealed => !desc.is_configurable(),
            IntegrityLevel::Frozen => !desc.is_configurable() && !desc.is_writable(),
        })
    }
}

/// How an object is called
#[derive(Clone)]
pub enum Callable {
    /// Function implemented in Rust
    Native(NativeFn),
    /// Function proxy: `callTrap` and optional `constructTrap`
    ProxyTraps {
        /// Invoked for calls
        call_trap: Value,
        /// Invoked for `new`, when present
        construct_trap: Option<Value>,
    },
}

/// Object storage
pub enum Backing {
    /// Ordinary object
    Ordinary(PropertyTable),
    /// Proxy whose operations route to its handler
    Live(Arc<JsProxy>),
    /// Proxy after fixing: an ordinary table, no further trap dispatch
    Fixed(PropertyTable),
}

/// Proxy lifecycle as observed from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyState {
    /// Never was a proxy
    NotProxy,
    /// Operations route to the handler
    Live,
    /// The handler's `fix` trap ran; plain property table
    Fixed,
}

/// Object flavor for `Object.prototype.toString`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectClass {
    /// Plain object
    Object,
    /// Array created by the runtime
    Array,
}

/// A JavaScript object
///
/// Thread-safe with interior mutability. Locks are never held while
/// user code runs.
pub struct JsObject {
    class: ObjectClass,
    /// Prototype slot, fixed at creation
    prototype: Option<Arc<JsObject>>,
    callable: Option<Callable>,
    backing: RwLock<Backing>,
}

impl JsObject {
    /// Create a new empty object
    pub fn new(prototype: Option<Arc<JsObject>>) -> Self {
        Self {
            class: ObjectClass::Object,
            prototype,
            callable: None,
            backing: RwLock::new(Backing::Ordinary(PropertyTable::new())),
        }
    }

    /// Create an array-like object
    pub fn array(prototype: Option<Arc<JsObject>>) -> Self {
        Self {
            class: ObjectClass::Array,
            ..Self::new(prototype)
        }
    }

    /// Create a function object
    pub fn function(prototype: Option<Arc<JsObject>>, callable: Callable) -> Self {
        Self {
            callable: Some(callable),
            ..Self::new(prototype)
        }
    }

    /// Create a live proxy object
    pub fn proxy(
        proxy: Arc<JsProxy>,
        prototype: Option<Arc<JsObject>>,
        callable: Option<Callable>,
    ) -> Self {
        Self {
            class: ObjectClass::Object,
            prototype,
            callable,
            backing: RwLock::new(Backing::Live(proxy)),
        }
    }

    /// Get prototype
    pub fn prototype(&self) -> Option<&Arc<JsObject>> {
        self.prototype.as_ref()
    }

    /// Check if this object can be called
    pub fn is_callable(&self) -> bool {
        self.callable.is_some()
    }

    /// Call behavior, if any
    pub fn callable(&self) -> Option<&Callable> {
        self.callable.as_ref()
    }

    /// Name used by `Object.prototype.toString`
    pub fn class_name(&self) -> &'static str {
        if self.callable.is_some() {
            "Function"
        } else {
            match self.class {
                ObjectClass::Object => "Object",
                ObjectClass::Array => "Array",
            }
        }
    }

    /// The handler state of a live proxy
    pub fn live_proxy(&self) -> Option<Arc<JsProxy>> {
        match &*self.backing.read() {
            Backing::Live(proxy) => Some(proxy.clone()),
            Backing::Ordinary(_) | Backing::Fixed(_) => None,
        }
    }

    /// Proxy lifecycle state
    pub fn proxy_state(&self) -> ProxyState {
        match &*self.backing.read() {
            Backing::Ordinary(_) => ProxyState::NotProxy,
            Backing::Live(_) => ProxyState::Live,
            Backing::Fixed(_) => ProxyState::Fixed,
        }
    }

    /// Run `f` against the property table; `None` for a live proxy
    pub fn with_table<R>(&self, f: impl FnOnce(&PropertyTable) -> R) -> Option<R> {
        match &*self.backing.read() {
            Backing::Ordinary(table) | Backing::Fixed(table) => Some(f(table)),
            Backing::Live(_) => None,
        }
    }

    /// Run `f` against the mutable property table; `None` for a live proxy
    pub fn with_table_mut<R>(&self, f: impl FnOnce(&mut PropertyTable) -> R) -> Option<R> {
        match &mut *self.backing.write() {
            Backing::Ordinary(table) | Backing::Fixed(table) => Some(f(table)),
            Backing::Live(_) => None,
        }
    }

    /// Own property from the table (never consults a handler)
    pub fn own_descriptor(&self, key: &PropertyKey) -> Option<PropertyDescriptor> {
        self.with_table(|table| table.get(key).cloned()).flatten()
    }

    /// Install a property without validation (intrinsic setup).
    /// Ignored on live proxies.
    pub fn define_property(&self, key: PropertyKey, desc: PropertyDescriptor) {
        self.with_table_mut(|table| table.insert(key, desc));
    }

    /// Drop every own property. Live proxies keep their handler.
    pub(crate) fn clear_properties(&self) {
        // The old table drops after the write lock is released
        let old = self.with_table_mut(std::mem::take);
        drop(old);
    }

    /// Replace a live proxy's handler with a fixed table.
    ///
    /// Returns `false` when the object was no longer live, e.g. because a
    /// reentrant fix finished first.
    pub(crate) fn finish_fixing(&self, table: PropertyTable) -> bool {
        let mut backing = self.backing.write();
        if !matches!(&*backing, Backing::Live(_)) {
            return false;
        }
        *backing = Backing::Fixed(table);
        true
    }
}

impl std::fmt::Debug for JsObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let properties = self.with_table(|table| table.len());
        f.debug_struct("JsObject")
            .field("class", &self.class_name())
            .field("proxy", &self.proxy_state())
            .field("properties", &properties)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(value: f64, writable: bool, enumerable: bool, configurable: bool) -> PropertyDescriptor {
        PropertyDescriptor::data_with_attrs(
            Value::number(value),
            PropertyAttributes {
                writable,
                enumerable,
                configurable,
            },
        )
    }

    #[test]
    fn test_key_canonicalization() {
        assert_eq!(PropertyKey::string("77"), PropertyKey::Index(77));
        assert_eq!(PropertyKey::from_value(&Value::number(99.0)), PropertyKey::Index(99));
        assert!(matches!(PropertyKey::string("077"), PropertyKey::String(_)));
        assert!(matches!(PropertyKey::from_value(&Value::number(1.5)), PropertyKey::String(_)));
        assert_eq!(PropertyKey::Index(99).to_value(), Value::from("99"));
    }

    #[test]
    fn test_table_key_order() {
        let mut table = PropertyTable::new();
        table.insert("b".into(), PropertyDescriptor::data(Value::null()));
        table.insert(PropertyKey::Index(3), PropertyDescriptor::data(Value::null()));
        table.insert("a".into(), PropertyDescriptor::data(Value::null()));
        table.insert(PropertyKey::Index(1), PropertyDescriptor::data(Value::null()));
        let names: Vec<String> = table.keys().iter().map(|k| k.to_string()).collect();
        assert_eq!(names, ["1", "3", "b", "a"]);
    }

    #[test]
    fn test_define_new_property_defaults() {
        let mut table = PropertyTable::new();
        let desc = PartialDescriptor {
            value: Some(Value::number(1.0)),
            ..Default::default()
        };
        table.define("x".into(), &desc).unwrap();
        assert_eq!(table.get(&"x".into()), Some(&data(1.0, false, false, false)));
    }

    #[test]
    fn test_reconcile_rejects_configurability_change() {
        let current = data(1.0, true, true, false);
        let desc = PartialDescriptor {
            configurable: Some(true),
            ..Default::default()
        };
        assert_eq!(
            reconcile(Some(&current), true, &desc),
            Err(RedefineError::Configurability)
        );
    }

    #[test]
    fn test_reconcile_rejects_enumerability_change() {
        let current = data(1.0, true, true, false);
        let desc = PartialDescriptor {
            enumerable: Some(false),
            ..Default::default()
        };
        assert_eq!(
            reconcile(Some(&current), true, &desc),
            Err(RedefineError::Enumerability)
        );
    }

    #[test]
    fn test_reconcile_rejects_writability_relax() {
        let current = data(1.0, false, true, false);
        let desc = PartialDescriptor {
            writable: Some(true),
            ..Default::default()
        };
        assert_eq!(
            reconcile(Some(&current), true, &desc),
            Err(RedefineError::Writability)
        );
        let desc = PartialDescriptor {
            value: Some(Value::number(2.0)),
            ..Default::default()
        };
        assert_eq!(
            reconcile(Some(&current), true, &desc),
            Err(RedefineError::ValueChange)
        );
        // Same value is allowed
        let desc = PartialDescriptor {
            value: Some(Value::number(1.0)),
            ..Default::default()
        };
        assert!(reconcile(Some(&current), true, &desc).is_ok());
    }

    #[test]
    fn test_reconcile_rejects_kind_swap() {
        let current = data(1.0, true, true, false);
        let desc = PartialDescriptor {
            get: Some(Value::undefined()),
            ..Default::default()
        };
        assert_eq!(
            reconcile(Some(&current), true, &desc),
            Err(RedefineError::KindChange)
        );
    }

    #[test]
    fn test_reconcile_writable_non_configurable_may_become_read_only() {
        let current = data(1.0, true, true, false);
        let desc = PartialDescriptor {
            writable: Some(false),
            value: Some(Value::number(5.0)),
            ..Default::default()
        };
        let merged = reconcile(Some(&current), true, &desc).unwrap();
        assert_eq!(merged, data(5.0, false, true, false));
    }

    #[test]
    fn test_reconcile_configurable_kind_swap() {
        let current = data(1.0, true, true, true);
        let desc = PartialDescriptor {
            set: Some(Value::undefined()),
            ..Default::default()
        };
        let merged = reconcile(Some(&current), true, &desc).unwrap();
        assert!(merged.is_accessor());
        assert!(merged.is_enumerable());
        assert!(merged.is_configurable());
    }

    #[test]
    fn test_not_extensible() {
        let mut table = PropertyTable::new();
        table.apply_integrity(IntegrityLevel::NonExtensible);
        let desc = PartialDescriptor {
            value: Some(Value::number(1.0)),
            ..Default::default()
        };
        assert_eq!(table.define("x".into(), &desc), Err(RedefineError::NotExtensible));
    }

    #[test]
    fn test_integrity_levels() {
        let mut table = PropertyTable::new();
        table.insert("a".into(), data(1.0, true, true, true));
        assert!(!table.test_integrity(IntegrityLevel::Sealed));
        table.apply_integrity(IntegrityLevel::Sealed);
        assert!(table.test_integrity(IntegrityLevel::Sealed));
        assert!(!table.test_integrity(IntegrityLevel::Frozen));
        table.apply_integrity(IntegrityLevel::Frozen);
        assert!(table.test_integrity(IntegrityLevel::Frozen));
        assert!(!table.remove(&"a".into()));
    }

    #[test]
    fn test_object_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JsObject>();
    }
}
