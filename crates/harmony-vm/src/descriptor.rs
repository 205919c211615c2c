//! Property descriptors at the JS boundary
//!
//! A [`PartialDescriptor`] keeps every field optional so that "absent" and
//! "explicitly default" stay distinguishable. It is what descriptor
//! literals convert into (ToPropertyDescriptor) and what `defineProperty`
//! traps receive back as fresh objects.

use std::sync::Arc;

use crate::context::VmContext;
use crate::error::{VmError, VmResult};
use crate::object::{JsObject, PropertyAttributes, PropertyDescriptor, PropertyKey};
use crate::string::well_known;
use crate::value::Value;

/// Descriptor with presence-tracked fields
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartialDescriptor {
    /// `value`
    pub value: Option<Value>,
    /// `writable`
    pub writable: Option<bool>,
    /// `get` (explicit `undefined` is `Some(Value::Undefined)`)
    pub get: Option<Value>,
    /// `set` (explicit `undefined` is `Some(Value::Undefined)`)
    pub set: Option<Value>,
    /// `enumerable`
    pub enumerable: Option<bool>,
    /// `configurable`
    pub configurable: Option<bool>,
}

/// Field names in the order ToPropertyDescriptor reads them
const FIELD_ORDER: [&str; 6] = [
    "enumerable",
    "configurable",
    "value",
    "writable",
    "get",
    "set",
];

impl PartialDescriptor {
    /// IsDataDescriptor
    pub fn is_data_descriptor(&self) -> bool {
        self.value.is_some() || self.writable.is_some()
    }

    /// IsAccessorDescriptor
    pub fn is_accessor_descriptor(&self) -> bool {
        self.get.is_some() || self.set.is_some()
    }

    /// IsGenericDescriptor
    pub fn is_generic_descriptor(&self) -> bool {
        !self.is_data_descriptor() && !self.is_accessor_descriptor()
    }

    /// Whether `name` is one of the six descriptor fields
    pub fn is_field_name(name: &str) -> bool {
        FIELD_ORDER.contains(&name)
    }

    /// Fill absent fields with their defaults
    pub fn to_complete(&self) -> PropertyDescriptor {
        let attributes = PropertyAttributes {
            writable: self.writable.unwrap_or(false),
            enumerable: self.enumerable.unwrap_or(false),
            configurable: self.configurable.unwrap_or(false),
        };
        if self.is_accessor_descriptor() {
            PropertyDescriptor::Accessor {
                get: self.get.clone().filter(|g| !g.is_undefined()),
                set: self.set.clone().filter(|s| !s.is_undefined()),
                attributes: PropertyAttributes {
                    writable: false,
                    ..attributes
                },
            }
        } else {
            PropertyDescriptor::Data {
                value: self.value.clone().unwrap_or_default(),
                attributes,
            }
        }
    }

    /// Every present field agrees with `current` (SameValue)
    pub fn is_subset_of(&self, current: &PropertyDescriptor) -> bool {
        let attributes = current.attributes();
        if self.enumerable.is_some_and(|e| e != attributes.enumerable)
            || self.configurable.is_some_and(|c| c != attributes.configurable)
        {
            return false;
        }
        match current {
            PropertyDescriptor::Data { value, attributes } => {
                self.get.is_none()
                    && self.set.is_none()
                    && self.value.as_ref().is_none_or(|v| v.same_value(value))
                    && self.writable.is_none_or(|w| w == attributes.writable)
            }
            PropertyDescriptor::Accessor { get, set, .. } => {
                let same = |field: &Option<Value>, slot: &Option<Value>| {
                    field
                        .as_ref()
                        .is_none_or(|v| v.same_value(&slot.clone().unwrap_or_default()))
                };
                self.value.is_none()
                    && self.writable.is_none()
                    && same(&self.get, get)
                    && same(&self.set, set)
            }
        }
    }

    /// Every field present, taken from a complete descriptor
    pub fn from_complete(desc: &PropertyDescriptor) -> Self {
        let attributes = desc.attributes();
        match desc {
            PropertyDescriptor::Data { value, .. } => Self {
                value: Some(value.clone()),
                writable: Some(attributes.writable),
                enumerable: Some(attributes.enumerable),
                configurable: Some(attributes.configurable),
                ..Default::default()
            },
            PropertyDescriptor::Accessor { get, set, .. } => Self {
                get: Some(get.clone().unwrap_or_default()),
                set: Some(set.clone().unwrap_or_default()),
                enumerable: Some(attributes.enumerable),
                configurable: Some(attributes.configurable),
                ..Default::default()
            },
        }
    }

    /// ToPropertyDescriptor (ES5 8.10.5)
    ///
    /// Presence tests and reads go through the full object protocol, so a
    /// descriptor object may itself be a proxy or carry getters.
    pub fn from_value(ctx: &mut VmContext, value: &Value) -> VmResult<Self> {
        let Some(obj) = value.as_object() else {
            return Err(VmError::type_error(format!(
                "Property description must be an object: {}",
                value.to_display_string()
            )));
        };

        let mut fields: [Option<Value>; 6] = Default::default();
        for (slot, name) in fields.iter_mut().zip(FIELD_ORDER) {
            let key = PropertyKey::string(name);
            if ctx.has_property(obj, &key)? {
                *slot = Some(ctx.get(value, &key)?);
            }
        }
        let [enumerable, configurable, value, writable, get, set] = fields;

        let desc = Self {
            enumerable: enumerable.map(|v| v.to_boolean()),
            configurable: configurable.map(|v| v.to_boolean()),
            value,
            writable: writable.map(|v| v.to_boolean()),
            get,
            set,
        };

        for (name, accessor) in [("Getter", &desc.get), ("Setter", &desc.set)] {
            if let Some(f) = accessor
                && !f.is_undefined()
                && !f.is_callable()
            {
                return Err(VmError::type_error(format!(
                    "{name} must be a function: {}",
                    f.to_display_string()
                )));
            }
        }
        if desc.is_data_descriptor() && desc.is_accessor_descriptor() {
            return Err(VmError::type_error(
                "Invalid property descriptor. Cannot both specify accessors and a value or writable attribute",
            ));
        }
        Ok(desc)
    }

    /// Fresh descriptor object carrying only the present fields
    pub fn to_object(&self, ctx: &VmContext) -> Arc<JsObject> {
        let obj = ctx.new_object();
        let fields = [
            (&well_known::VALUE, self.value.clone()),
            (&well_known::WRITABLE, self.writable.map(Value::boolean)),
            (&well_known::GET, self.get.clone()),
            (&well_known::SET, self.set.clone()),
            (&well_known::ENUMERABLE, self.enumerable.map(Value::boolean)),
            (&well_known::CONFIGURABLE, self.configurable.map(Value::boolean)),
        ];
        for (name, field) in fields {
            if let Some(v) = field {
                obj.define_property(
                    PropertyKey::from_js_string((*name).clone()),
                    PropertyDescriptor::data(v),
                );
            }
        }
        obj
    }
}

/// FromPropertyDescriptor: `undefined` for an absent property, otherwise
/// a complete descriptor object.
pub fn from_property_descriptor(ctx: &VmContext, desc: Option<&PropertyDescriptor>) -> Value {
    match desc {
        Some(desc) => Value::object(PartialDescriptor::from_complete(desc).to_object(ctx)),
        None => Value::undefined(),
    }
}
