//! JavaScript values
//!
//! Values are cheap to clone: primitives are inline and heap data sits
//! behind `Arc`. Objects compare by identity.

use crate::context::VmContext;
use crate::error::VmResult;
use crate::object::JsObject;
use crate::string::JsString;
use std::sync::Arc;

/// Native function handler type
///
/// Receives `this`, the arguments and the calling context.
pub type NativeFn =
    Arc<dyn Fn(&Value, &[Value], &mut VmContext) -> VmResult<Value> + Send + Sync>;

/// A JavaScript value
#[derive(Clone, Default)]
pub enum Value {
    /// `undefined`
    #[default]
    Undefined,
    /// `null`
    Null,
    /// Boolean primitive
    Boolean(bool),
    /// Number primitive
    Number(f64),
    /// String primitive (interned)
    String(Arc<JsString>),
    /// Object reference (ordinary object, function, or proxy)
    Object(Arc<JsObject>),
}

impl Value {
    /// Create undefined value
    #[inline]
    pub const fn undefined() -> Self {
        Self::Undefined
    }

    /// Create null value
    #[inline]
    pub const fn null() -> Self {
        Self::Null
    }

    /// Create boolean value
    #[inline]
    pub const fn boolean(b: bool) -> Self {
        Self::Boolean(b)
    }

    /// Create number value
    #[inline]
    pub const fn number(n: f64) -> Self {
        Self::Number(n)
    }

    /// Create number value from a 32-bit integer
    #[inline]
    pub fn int32(n: i32) -> Self {
        Self::Number(n as f64)
    }

    /// Create string value
    pub fn string(s: Arc<JsString>) -> Self {
        Self::String(s)
    }

    /// Create object value
    pub fn object(obj: Arc<JsObject>) -> Self {
        Self::Object(obj)
    }

    /// Check if undefined
    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Check if null
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if null or undefined
    #[inline]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// Check if this is an object (including functions and proxies)
    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Check if this value can be called
    pub fn is_callable(&self) -> bool {
        self.as_object().is_some_and(|obj| obj.is_callable())
    }

    /// Get as object
    pub fn as_object(&self) -> Option<&Arc<JsObject>> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Get as string
    pub fn as_string(&self) -> Option<&Arc<JsString>> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The `typeof` result. Fixed at creation for proxies.
    pub fn type_of(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "object",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Object(obj) if obj.is_callable() => "function",
            Self::Object(_) => "object",
        }
    }

    /// ToBoolean
    pub fn to_boolean(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Boolean(b) => *b,
            Self::Number(n) => !(*n == 0.0 || n.is_nan()),
            Self::String(s) => !s.is_empty(),
            Self::Object(_) => true,
        }
    }

    /// ToNumber for primitives; objects convert to NaN.
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Undefined => f64::NAN,
            Self::Null => 0.0,
            Self::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Number(n) => *n,
            Self::String(s) => string_to_number(s.as_str()),
            Self::Object(_) => f64::NAN,
        }
    }

    /// ToString
    ///
    /// Objects always convert to their default tag (`[object Object]`,
    /// `[object Function]`, ...). Their own or inherited `toString` and
    /// `valueOf` are never called, so an object in a name list returned by
    /// `getOwnPropertyNames`, or used as a property key, becomes that tag
    /// rather than whatever its `toString` would produce.
    pub fn to_js_string(&self) -> Arc<JsString> {
        match self {
            Self::String(s) => s.clone(),
            Self::Number(n) => JsString::intern(&number_to_string(*n)),
            Self::Undefined => JsString::intern("undefined"),
            Self::Null => JsString::intern("null"),
            Self::Boolean(true) => JsString::intern("true"),
            Self::Boolean(false) => JsString::intern("false"),
            Self::Object(obj) => JsString::intern(&format!("[object {}]", obj.class_name())),
        }
    }

    /// Human readable rendering used in error messages
    pub fn to_display_string(&self) -> String {
        self.to_js_string().as_str().to_string()
    }

    /// Strict equality (`===`)
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// SameValue (ES5 9.12)
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => {
                if a.is_nan() && b.is_nan() {
                    return true;
                }
                a == b && a.is_sign_negative() == b.is_sign_negative()
            }
            _ => self.strict_equals(other),
        }
    }
}

/// Number::toString with JS formatting
pub fn number_to_string(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    let mut buffer = ryu_js::Buffer::new();
    buffer.format(n).to_string()
}

fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ => {
            if let Some(hex) = trimmed
                .strip_prefix("0x")
                .or_else(|| trimmed.strip_prefix("0X"))
            {
                return u64::from_str_radix(hex, 16)
                    .map(|n| n as f64)
                    .unwrap_or(f64::NAN);
            }
            // Rust accepts "inf"/"nan" spellings JS does not
            if trimmed.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
                return f64::NAN;
            }
            trimmed.parse::<f64>().unwrap_or(f64::NAN)
        }
    }
}

impl PartialEq for Value {
    /// SameValue, so `NaN == NaN` holds in assertions
    fn eq(&self, other: &Self) -> bool {
        self.same_value(other)
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{}", number_to_string(*n)),
            Self::String(s) => write!(f, "{:?}", s.as_str()),
            Self::Object(obj) => write!(f, "{obj:?}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(JsString::intern(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(JsString::intern(&s))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Arc<JsObject>> for Value {
    fn from(obj: Arc<JsObject>) -> Self {
        Self::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_boolean() {
        assert!(!Value::undefined().to_boolean());
        assert!(!Value::null().to_boolean());
        assert!(!Value::number(0.0).to_boolean());
        assert!(!Value::number(f64::NAN).to_boolean());
        assert!(!Value::from("").to_boolean());
        assert!(Value::from("0").to_boolean());
        assert!(Value::number(-3.5).to_boolean());
    }

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(23.0), "23");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(1.5), "1.5");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::INFINITY), "Infinity");
        assert_eq!(number_to_string(1e21), "1e+21");
    }

    #[test]
    fn test_to_number() {
        assert_eq!(Value::from(" 42 ").to_number(), 42.0);
        assert_eq!(Value::from("").to_number(), 0.0);
        assert_eq!(Value::from("0x10").to_number(), 16.0);
        assert!(Value::from("huh").to_number().is_nan());
        assert!(Value::from("inf").to_number().is_nan());
        assert_eq!(Value::boolean(true).to_number(), 1.0);
        assert!(Value::undefined().to_number().is_nan());
    }

    #[test]
    fn test_same_value_vs_strict_equals() {
        let nan = Value::number(f64::NAN);
        assert!(nan.same_value(&nan));
        assert!(!nan.strict_equals(&nan));
        assert!(Value::number(0.0).strict_equals(&Value::number(-0.0)));
        assert!(!Value::number(0.0).same_value(&Value::number(-0.0)));
        assert!(Value::from("a").strict_equals(&Value::from("a")));
        assert!(!Value::from("1").strict_equals(&Value::number(1.0)));
    }

    #[test]
    fn test_type_of_primitives() {
        assert_eq!(Value::undefined().type_of(), "undefined");
        assert_eq!(Value::null().type_of(), "object");
        assert_eq!(Value::from(1.0).type_of(), "number");
        assert_eq!(Value::from("s").type_of(), "string");
        assert_eq!(Value::from(true).type_of(), "boolean");
    }
}
