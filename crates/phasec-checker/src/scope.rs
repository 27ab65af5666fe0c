//! The checker's scope chain (spec.md §4.4.1): a stack of block frames plus
//! a parallel stack of function scopes, so `get` can detect when a lookup
//! crosses a function boundary and grow that function's closure set.
//!
//! spec.md §9 describes scopes as a persistent, structurally shared chain
//! (`child()` returns a new scope). A single-threaded recursive-descent
//! checker gets the same semantics more cheaply with an explicit push/pop
//! stack discipline — push before descending into a nested block, pop on
//! the way back out.

use phasec_binder::Qualifier;
use phasec_common::{Position, Symbol};
use phasec_types::{FunctionPhase, Phase, Type};
use rustc_hash::{FxHashMap, FxHashSet};

/// A uniquely-assigned function-scope identity, per the design note in
/// spec.md §9 ("Closure detection"): target languages without pointer
/// equality should give each function scope an id at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionScopeId(u64);

#[derive(Debug, Clone)]
pub struct Binding {
    pub ty: Type,
    pub phase: Phase,
    pub position: Position,
}

struct Frame {
    bindings: FxHashMap<String, Binding>,
    function_scope: FunctionScopeId,
}

/// Per-function state shared by every block nested in that function's body:
/// its symbol, declaring module, declared phase, a mutable result type
/// (grown by `return` via merge), the generic names in scope for type
/// qualification, and the closure set of names captured from an outer
/// function scope.
pub struct FunctionScope {
    pub id: FunctionScopeId,
    pub symbol: Symbol,
    pub module: Symbol,
    pub function_phase: FunctionPhase,
    pub result_type: Type,
    pub type_params_in_scope: Vec<String>,
    pub closure: FxHashSet<String>,
    /// Set by `stmt.rs` when a `Reassignment` statement is checked in this
    /// function's body — drives the declared-phase-vs-required check in
    /// `phase_rules::check_declared_phase_at_least` (a `sig` or `def`
    /// declaration is required once this is set).
    pub saw_reassignment: bool,
    /// Set when an `Assignment` statement introduces a `var`/`flow` binding
    /// in this function's body — requires at least `def`.
    pub saw_reactive_binding: bool,
}

pub struct Scope {
    qualifier: Qualifier,
    frames: Vec<Frame>,
    function_scopes: Vec<FunctionScope>,
    protocols_in_scope: FxHashSet<Symbol>,
    next_id: u64,
}

impl Scope {
    /// The root scope for one file: a synthetic `fun`-phase function scope
    /// (`module` itself as the symbol) that top-level constant initializers
    /// are checked under.
    #[must_use]
    pub fn new(qualifier: Qualifier, module: Symbol) -> Self {
        let root = FunctionScope {
            id: FunctionScopeId(0),
            symbol: module.clone(),
            module,
            function_phase: FunctionPhase::Fun,
            result_type: Type::Nothing,
            type_params_in_scope: Vec::new(),
            closure: FxHashSet::default(),
            saw_reassignment: false,
            saw_reactive_binding: false,
        };
        Self {
            qualifier,
            frames: vec![Frame { bindings: FxHashMap::default(), function_scope: FunctionScopeId(0) }],
            function_scopes: vec![root],
            protocols_in_scope: FxHashSet::default(),
            next_id: 1,
        }
    }

    #[must_use]
    pub fn qualifier(&self) -> &Qualifier {
        &self.qualifier
    }

    pub fn qualifier_mut(&mut self) -> &mut Qualifier {
        &mut self.qualifier
    }

    pub fn add_protocol_in_scope(&mut self, protocol: Symbol) {
        self.protocols_in_scope.insert(protocol);
    }

    #[must_use]
    pub fn protocols_in_scope(&self) -> &FxHashSet<Symbol> {
        &self.protocols_in_scope
    }

    #[must_use]
    pub fn current_function(&self) -> &FunctionScope {
        self.function_scopes.last().expect("a scope always has at least its root function scope")
    }

    pub fn current_function_mut(&mut self) -> &mut FunctionScope {
        self.function_scopes.last_mut().expect("a scope always has at least its root function scope")
    }

    fn current_function_id(&self) -> FunctionScopeId {
        self.current_function().id
    }

    /// `child()`: a fresh block frame, inheriting the current function scope.
    pub fn push_block(&mut self) {
        let function_scope = self.current_function_id();
        self.frames.push(Frame { bindings: FxHashMap::default(), function_scope });
    }

    pub fn pop_block(&mut self) {
        self.frames.pop();
        assert!(!self.frames.is_empty(), "popped the file's root block frame");
    }

    /// `childSelf(typeSym, typeParams)`: makes `Self` resolve to the impl or
    /// protocol's own base type for the body's type expressions. Type
    /// parameters on the base itself are not re-applied to `Self` — a known
    /// simplification, see DESIGN.md.
    pub fn push_self(&mut self, type_sym: &Symbol) {
        self.push_block();
        self.qualifier.insert("Self", type_sym.clone());
    }

    pub fn pop_self(&mut self) {
        self.pop_block();
    }

    /// `childFunction(sym, typeParams, resultType, phase)`: a fresh function
    /// scope (and its first block frame) for a function or lambda body.
    pub fn push_function(
        &mut self,
        symbol: Symbol,
        module: Symbol,
        type_params_in_scope: Vec<String>,
        result_type: Type,
        phase: FunctionPhase,
    ) {
        let id = FunctionScopeId(self.next_id);
        self.next_id += 1;
        self.function_scopes.push(FunctionScope {
            id,
            symbol,
            module,
            function_phase: phase,
            result_type,
            type_params_in_scope,
            closure: FxHashSet::default(),
            saw_reassignment: false,
            saw_reactive_binding: false,
        });
        self.frames.push(Frame { bindings: FxHashMap::default(), function_scope: id });
    }

    /// Pops the function's scope and its block frame, returning the
    /// accumulated result type and closure set for the caller to inspect
    /// (phase inference per §4.4.5 needs the closure set; the result type
    /// feeds into the function's declared-vs-inferred result check).
    pub fn pop_function(&mut self) -> FunctionScope {
        self.frames.pop();
        self.function_scopes.pop().expect("push_function always pairs with pop_function")
    }

    /// `get(name)`: walks frames innermost-first. When the binding is found
    /// in a frame belonging to an older function scope than the current
    /// one, the name is added to the current function's closure set; if the
    /// current function is `fun` and the binding's phase is `var`/`flow`,
    /// the returned view demotes it to `val` (the function captures a
    /// snapshot, per §4.4.1).
    #[must_use]
    pub fn get(&mut self, name: &str) -> Option<Binding> {
        let current_id = self.current_function_id();
        let current_phase = self.current_function().function_phase;
        for frame in self.frames.iter().rev() {
            if let Some(binding) = frame.bindings.get(name) {
                let crosses_function_boundary = frame.function_scope != current_id;
                if crosses_function_boundary {
                    self.current_function_mut().closure.insert(name.to_string());
                }
                let phase = if crosses_function_boundary
                    && current_phase == FunctionPhase::Fun
                    && matches!(binding.phase, Phase::Var | Phase::Flow)
                {
                    Phase::Val
                } else {
                    binding.phase
                };
                return Some(Binding { ty: binding.ty.clone(), phase, position: binding.position.clone() });
            }
        }
        None
    }

    /// `set(name, phaseType)`: binds in the current (innermost) frame.
    pub fn set(&mut self, name: impl Into<String>, ty: Type, phase: Phase, position: Position) {
        let frame = self.frames.last_mut().expect("a scope always has at least one block frame");
        frame.bindings.insert(name.into(), Binding { ty, phase, position });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasec_common::{Package, Version};

    fn module() -> Symbol {
        Symbol::root(Package::new("acme", "app", Version::new(1, 0, 0)))
    }

    fn int() -> Type {
        Type::Nominal(module().child("Int"))
    }

    #[test]
    fn a_binding_set_in_the_current_frame_is_visible_to_get() {
        let mut scope = Scope::new(Qualifier::new(), module());
        scope.set("x", int(), Phase::Const, Position::synthetic());
        let binding = scope.get("x").unwrap();
        assert_eq!(binding.phase, Phase::Const);
    }

    #[test]
    fn a_binding_from_an_outer_block_is_still_visible_without_crossing_a_function() {
        let mut scope = Scope::new(Qualifier::new(), module());
        scope.set("x", int(), Phase::Val, Position::synthetic());
        scope.push_block();
        assert!(scope.get("x").is_some());
        assert!(scope.current_function().closure.is_empty());
        scope.pop_block();
    }

    #[test]
    fn crossing_a_function_boundary_records_the_closure_and_demotes_var_to_val_inside_fun() {
        let mut scope = Scope::new(Qualifier::new(), module());
        scope.set("counter", int(), Phase::Var, Position::synthetic());
        scope.push_function(module().child("inner"), module(), vec![], Type::Nothing, FunctionPhase::Fun);
        let binding = scope.get("counter").unwrap();
        assert_eq!(binding.phase, Phase::Val);
        assert!(scope.current_function().closure.contains("counter"));
        scope.pop_function();
    }

    #[test]
    fn crossing_a_function_boundary_inside_def_does_not_demote() {
        let mut scope = Scope::new(Qualifier::new(), module());
        scope.set("counter", int(), Phase::Var, Position::synthetic());
        scope.push_function(module().child("inner"), module(), vec![], Type::Nothing, FunctionPhase::Def);
        let binding = scope.get("counter").unwrap();
        assert_eq!(binding.phase, Phase::Var);
        scope.pop_function();
    }

    #[test]
    fn self_resolves_through_the_qualifier_inside_an_impl_body() {
        let mut scope = Scope::new(Qualifier::new(), module());
        let widget = module().child("Widget");
        scope.push_self(&widget);
        assert_eq!(scope.qualifier().lookup("Self"), Some(&widget));
        scope.pop_self();
    }
}
