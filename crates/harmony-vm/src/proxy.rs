//! Proxy handlers and trap resolution
//!
//! A proxy never reads handler fields directly. It asks its
//! [`TrapProvider`] to resolve a [`Trap`]; the provider decides what
//! "having a trap" means. [`ObjectHandler`] does a full property read on
//! a JS handler object (so a handler may itself be a proxy, or expose a
//! trap through a throwing getter). [`TrapTable`] is an embedder-side
//! table that can delegate to another provider.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::context::VmContext;
use crate::error::{VmError, VmResult};
use crate::object::PropertyKey;
use crate::value::Value;

/// Trap category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapKind {
    /// Minimal primitive operation
    Fundamental,
    /// Has a default composed from fundamental traps
    Derived,
}

/// Handler trap vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trap {
    /// `getOwnPropertyDescriptor(name)`
    GetOwnPropertyDescriptor,
    /// `getPropertyDescriptor(name)`
    GetPropertyDescriptor,
    /// `getOwnPropertyNames()`
    GetOwnPropertyNames,
    /// `getPropertyNames()`
    GetPropertyNames,
    /// `defineProperty(name, desc)`
    DefineProperty,
    /// `delete(name)`
    Delete,
    /// `fix()`
    Fix,
    /// `has(name)`
    Has,
    /// `hasOwn(name)`
    HasOwn,
    /// `get(receiver, name)`
    Get,
    /// `set(receiver, name, value)`
    Set,
    /// `enumerate()`
    Enumerate,
    /// `keys()`
    Keys,
}

impl Trap {
    /// Every trap, fundamental first
    pub const ALL: [Trap; 13] = [
        Trap::GetOwnPropertyDescriptor,
        Trap::GetPropertyDescriptor,
        Trap::GetOwnPropertyNames,
        Trap::GetPropertyNames,
        Trap::DefineProperty,
        Trap::Delete,
        Trap::Fix,
        Trap::Has,
        Trap::HasOwn,
        Trap::Get,
        Trap::Set,
        Trap::Enumerate,
        Trap::Keys,
    ];

    /// Property name of the trap on a handler object
    pub const fn name(self) -> &'static str {
        match self {
            Trap::GetOwnPropertyDescriptor => "getOwnPropertyDescriptor",
            Trap::GetPropertyDescriptor => "getPropertyDescriptor",
            Trap::GetOwnPropertyNames => "getOwnPropertyNames",
            Trap::GetPropertyNames => "getPropertyNames",
            Trap::DefineProperty => "defineProperty",
            Trap::Delete => "delete",
            Trap::Fix => "fix",
            Trap::Has => "has",
            Trap::HasOwn => "hasOwn",
            Trap::Get => "get",
            Trap::Set => "set",
            Trap::Enumerate => "enumerate",
            Trap::Keys => "keys",
        }
    }

    /// Look up a trap by handler property name
    pub fn from_name(name: &str) -> Option<Trap> {
        Self::ALL.into_iter().find(|trap| trap.name() == name)
    }

    /// Fundamental or derived
    pub const fn kind(self) -> TrapKind {
        match self {
            Trap::GetOwnPropertyDescriptor
            | Trap::GetPropertyDescriptor
            | Trap::GetOwnPropertyNames
            | Trap::GetPropertyNames
            | Trap::DefineProperty
            | Trap::Delete
            | Trap::Fix => TrapKind::Fundamental,
            Trap::Has | Trap::HasOwn | Trap::Get | Trap::Set | Trap::Enumerate | Trap::Keys => {
                TrapKind::Derived
            }
        }
    }
}

impl std::fmt::Display for Trap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A trap found on a handler, ready to invoke
#[derive(Clone, Debug)]
pub struct ResolvedTrap {
    trap: Trap,
    function: Value,
    receiver: Value,
}

impl ResolvedTrap {
    /// Create a resolved trap
    pub fn new(trap: Trap, function: Value, receiver: Value) -> Self {
        Self {
            trap,
            function,
            receiver,
        }
    }

    /// Invoke the trap. Exceptions propagate unchanged.
    pub fn call(
        &self,
        ctx: &mut VmContext,
        operation: &'static str,
        args: &[Value],
    ) -> VmResult<Value> {
        if !self.function.is_callable() {
            return Err(VmError::TrapNotCallable {
                trap: self.trap.name(),
                operation,
            });
        }
        ctx.call(&self.function, &self.receiver, args)
    }
}

/// Result of attempting a trap: absent, returned, or threw
#[derive(Debug)]
pub enum TrapOutcome {
    /// The handler does not supply the trap
    Absent,
    /// The trap returned a value
    Value(Value),
    /// Resolving or invoking the trap threw
    Threw(VmError),
}

impl TrapOutcome {
    /// `Absent` becomes `None`, `Threw` becomes `Err`
    pub fn into_result(self) -> VmResult<Option<Value>> {
        match self {
            TrapOutcome::Absent => Ok(None),
            TrapOutcome::Value(v) => Ok(Some(v)),
            TrapOutcome::Threw(err) => Err(err),
        }
    }
}

/// Resolves trap names to callables
pub trait TrapProvider: Send + Sync {
    /// Resolve `trap`. `Ok(None)` means the trap is absent; an error means
    /// the lookup itself threw.
    fn resolve(&self, ctx: &mut VmContext, trap: Trap) -> VmResult<Option<ResolvedTrap>>;

    /// The JS handler object, when there is one
    fn handler_object(&self) -> Option<Value> {
        None
    }
}

/// Handler given as a JS object: trap lookup is a property read
pub struct ObjectHandler {
    handler: Value,
}

impl ObjectHandler {
    /// Wrap a handler object. Non-objects are rejected.
    pub fn new(handler: Value) -> VmResult<Self> {
        if !handler.is_object() {
            return Err(VmError::type_error(format!(
                "Proxy handler {} is not an object",
                handler.to_display_string()
            )));
        }
        Ok(Self { handler })
    }
}

impl TrapProvider for ObjectHandler {
    fn resolve(&self, ctx: &mut VmContext, trap: Trap) -> VmResult<Option<ResolvedTrap>> {
        let value = ctx.get(&self.handler, &PropertyKey::string(trap.name()))?;
        // undefined/null count as absent
        if value.is_nullish() {
            return Ok(None);
        }
        Ok(Some(ResolvedTrap::new(trap, value, self.handler.clone())))
    }

    fn handler_object(&self) -> Option<Value> {
        Some(self.handler.clone())
    }
}

/// Embedder-supplied trap table, optionally chained to another provider
#[derive(Default)]
pub struct TrapTable {
    traps: FxHashMap<Trap, Value>,
    delegate: Option<Arc<dyn TrapProvider>>,
}

impl TrapTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a trap
    pub fn with(mut self, trap: Trap, function: Value) -> Self {
        self.traps.insert(trap, function);
        self
    }

    /// Consult `delegate` for traps this table lacks
    pub fn delegate_to(mut self, delegate: Arc<dyn TrapProvider>) -> Self {
        self.delegate = Some(delegate);
        self
    }
}

impl TrapProvider for TrapTable {
    fn resolve(&self, ctx: &mut VmContext, trap: Trap) -> VmResult<Option<ResolvedTrap>> {
        match self.traps.get(&trap) {
            Some(function) if !function.is_nullish() => Ok(Some(ResolvedTrap::new(
                trap,
                function.clone(),
                Value::undefined(),
            ))),
            Some(_) => Ok(None),
            None => match &self.delegate {
                Some(delegate) => delegate.resolve(ctx, trap),
                None => Ok(None),
            },
        }
    }

    fn handler_object(&self) -> Option<Value> {
        self.delegate.as_ref().and_then(|d| d.handler_object())
    }
}

/// Handler state of a live proxy
pub struct JsProxy {
    provider: Arc<dyn TrapProvider>,
}

impl std::fmt::Debug for JsProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.provider.handler_object() {
            Some(handler) => write!(f, "Proxy {{ handler: {handler:?} }}"),
            None => write!(f, "Proxy {{ <trap table> }}"),
        }
    }
}

impl JsProxy {
    /// Create proxy state over any provider
    pub fn new(provider: Arc<dyn TrapProvider>) -> Arc<Self> {
        Arc::new(Self { provider })
    }

    /// Create proxy state over a JS handler object
    pub fn from_handler(handler: Value) -> VmResult<Arc<Self>> {
        Ok(Self::new(Arc::new(ObjectHandler::new(handler)?)))
    }

    /// The trap provider
    pub fn provider(&self) -> &Arc<dyn TrapProvider> {
        &self.provider
    }

    /// Resolve a trap
    pub fn trap(&self, ctx: &mut VmContext, trap: Trap) -> VmResult<Option<ResolvedTrap>> {
        let resolved = self.provider.resolve(ctx, trap)?;
        tracing::trace!(
            trap = trap.name(),
            kind = ?trap.kind(),
            present = resolved.is_some(),
            "resolved proxy trap"
        );
        Ok(resolved)
    }

    /// Resolve a trap the operation cannot do without
    pub fn require(
        &self,
        ctx: &mut VmContext,
        trap: Trap,
        operation: &'static str,
    ) -> VmResult<ResolvedTrap> {
        self.trap(ctx, trap)?.ok_or(VmError::TrapMissing {
            trap: trap.name(),
            operation,
        })
    }

    /// Resolve and invoke a trap, reporting absence separately from failure
    pub fn invoke(
        &self,
        ctx: &mut VmContext,
        trap: Trap,
        operation: &'static str,
        args: &[Value],
    ) -> TrapOutcome {
        match self.trap(ctx, trap) {
            Ok(None) => TrapOutcome::Absent,
            Ok(Some(resolved)) => match resolved.call(ctx, operation, args) {
                Ok(v) => TrapOutcome::Value(v),
                Err(err) => TrapOutcome::Threw(err),
            },
            Err(err) => TrapOutcome::Threw(err),
        }
    }

    /// Invoke a trap the operation cannot do without
    pub fn invoke_required(
        &self,
        ctx: &mut VmContext,
        trap: Trap,
        operation: &'static str,
        args: &[Value],
    ) -> VmResult<Value> {
        self.require(ctx, trap, operation)?.call(ctx, operation, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::PropertyDescriptor;
    use crate::runtime::VmRuntime;

    #[test]
    fn test_trap_names_round_trip() {
        for trap in Trap::ALL {
            assert_eq!(Trap::from_name(trap.name()), Some(trap));
        }
        assert_eq!(Trap::from_name("callTrap"), None);
        assert_eq!(Trap::Fix.kind(), TrapKind::Fundamental);
        assert_eq!(Trap::Keys.kind(), TrapKind::Derived);
    }

    #[test]
    fn test_object_handler_rejects_primitives() {
        assert!(ObjectHandler::new(Value::number(1.0)).is_err());
        assert!(ObjectHandler::new(Value::undefined()).is_err());
    }

    #[test]
    fn test_nullish_traps_are_absent() {
        let runtime = VmRuntime::new();
        let mut ctx = runtime.create_context();
        let handler = ctx.new_object();
        handler.define_property("get".into(), PropertyDescriptor::data(Value::null()));
        handler.define_property("has".into(), PropertyDescriptor::data(Value::undefined()));
        let provider = ObjectHandler::new(Value::object(handler)).unwrap();
        assert!(provider.resolve(&mut ctx, Trap::Get).unwrap().is_none());
        assert!(provider.resolve(&mut ctx, Trap::Has).unwrap().is_none());
        assert!(provider.resolve(&mut ctx, Trap::Set).unwrap().is_none());
    }

    #[test]
    fn test_non_callable_trap_fails_on_invoke() {
        let runtime = VmRuntime::new();
        let mut ctx = runtime.create_context();
        let handler = ctx.new_object();
        handler.define_property("has".into(), PropertyDescriptor::data(Value::number(7.0)));
        let proxy = JsProxy::from_handler(Value::object(handler)).unwrap();
        let outcome = proxy.invoke(&mut ctx, Trap::Has, "has", &[Value::from("a")]);
        match outcome {
            TrapOutcome::Threw(VmError::TrapNotCallable { trap, operation }) => {
                assert_eq!(trap, "has");
                assert_eq!(operation, "has");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_trap_table_delegates() {
        let runtime = VmRuntime::new();
        let mut ctx = runtime.create_context();
        let answer = ctx.native_function("has", 1, |_, _, _| Ok(Value::boolean(true)));
        let inner = TrapTable::new().with(Trap::Has, answer);
        let outer = TrapTable::new()
            .with(Trap::Get, Value::null())
            .delegate_to(Arc::new(inner));
        assert!(outer.resolve(&mut ctx, Trap::Has).unwrap().is_some());
        assert!(outer.resolve(&mut ctx, Trap::Get).unwrap().is_none());
        assert!(outer.resolve(&mut ctx, Trap::Fix).unwrap().is_none());
    }

    #[test]
    fn test_require_reports_missing_trap() {
        let runtime = VmRuntime::new();
        let mut ctx = runtime.create_context();
        let proxy = JsProxy::new(Arc::new(TrapTable::new()));
        let err = proxy
            .invoke_required(&mut ctx, Trap::Fix, "Object.freeze", &[])
            .unwrap_err();
        assert!(matches!(
            err,
            VmError::TrapMissing {
                trap: "fix",
                operation: "Object.freeze"
            }
        ));
    }
}
