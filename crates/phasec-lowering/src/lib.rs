//! Reactive IR lowering (spec.md §4.6): the final pipeline stage, turning a
//! checked-and-transformed file into the target-agnostic tree in [`ir`].

mod ir;
mod lower;
mod wrap;

pub use ir::{IrDecl, IrExpr, IrFile, IrFunction, IrStmt};
pub use lower::Lowerer;
pub use wrap::{def_action, lift_combinator_is_def, sig_action, DefAction, SigAction};

#[cfg(test)]
mod tests {
    use super::*;
    use phasec_binder::ExternalBindingsBuilder;
    use phasec_checked::{
        Block, CheckedExpr, CheckedExprKind, CheckedFile, CheckedParam, ConstantDecl, Decl,
        FunctionBody, FunctionDecl, Stmt,
    };
    use phasec_common::{Access, Package, Position, Symbol, Version};
    use phasec_types::{FunctionPhase, Phase, Type};

    fn pos() -> Position {
        Position::synthetic()
    }

    fn pkg() -> Package {
        Package::new("acme", "app", Version::new(1, 0, 0))
    }

    fn module() -> Symbol {
        Symbol::root(pkg()).child("main")
    }

    fn int_literal(n: i64, phase: Phase) -> CheckedExpr {
        CheckedExpr::new(pos(), Type::Nominal(module().child("Int")), phase, CheckedExprKind::IntLiteral(n))
    }

    fn identifier(name: &str, phase: Phase) -> CheckedExpr {
        CheckedExpr::new(pos(), Type::Nothing, phase, CheckedExprKind::Identifier(name.to_string()))
    }

    fn empty_bindings() -> phasec_binder::ExternalBindings {
        ExternalBindingsBuilder::new().freeze()
    }

    #[test]
    fn constant_with_no_initializer_lowers_to_noop() {
        let file = CheckedFile {
            path: "main.ph".to_string(),
            declarations: vec![Decl::Constant(ConstantDecl {
                position: pos(),
                access: Access::Public,
                symbol: module().child("PI"),
                ty: Type::Nothing,
                expr: None,
                external: None,
            })],
        };
        let bindings = empty_bindings();
        let lowerer = Lowerer::new(module(), &bindings);
        let ir = lowerer.lower_file(&file);
        assert!(matches!(&ir.declarations[0], IrDecl::Const { name, expr } if name == "PI" && *expr == IrExpr::NoOp));
        assert!(matches!(&ir.declarations[1], IrDecl::Export { name } if name == "PI"));
    }

    #[test]
    fn extern_function_becomes_a_pass_through_import() {
        let file = CheckedFile {
            path: "main.ph".to_string(),
            declarations: vec![Decl::Function(FunctionDecl {
                position: pos(),
                access: Access::Public,
                symbol: module().child("readFile"),
                function_phase: FunctionPhase::Sig,
                type_params: vec![],
                params: vec![],
                result: Type::Nothing,
                body: FunctionBody::Extern("readFileImpl".to_string()),
            })],
        };
        let bindings = empty_bindings();
        let lowerer = Lowerer::new(module(), &bindings);
        let ir = lowerer.lower_file(&file);
        assert!(matches!(
            &ir.declarations[0],
            IrDecl::Import { local_name, imported_name, .. }
                if local_name == "readFile" && imported_name == "readFileImpl"
        ));
    }

    #[test]
    fn sig_call_unwraps_a_var_argument_against_an_unspecified_parameter() {
        let callee = identifier("log", Phase::Const);
        let arg = identifier("counter", Phase::Var);
        let call = CheckedExpr::new(
            pos(),
            Type::Nothing,
            Phase::Val,
            CheckedExprKind::Call { callee: Box::new(callee), args: vec![arg] },
        );
        let block = Block { position: pos(), statements: vec![Stmt::ExprStmt(call)] };
        let fn_decl = FunctionDecl {
            position: pos(),
            access: Access::Public,
            symbol: module().child("report"),
            function_phase: FunctionPhase::Sig,
            type_params: vec![],
            params: vec![CheckedParam { name: "counter".to_string(), ty: Type::Nothing, phase: Some(Phase::Var) }],
            result: Type::Nothing,
            body: FunctionBody::Block(block),
        };
        let file = CheckedFile { path: "main.ph".to_string(), declarations: vec![Decl::Function(fn_decl)] };
        let bindings = empty_bindings();
        let lowerer = Lowerer::new(module(), &bindings);
        let ir = lowerer.lower_file(&file);
        let IrDecl::Function(f) = &ir.declarations[0] else { panic!("expected function") };
        let IrStmt::ExprStmt(IrExpr::Call { args, .. }) = &f.body[0] else { panic!("expected call statement") };
        assert!(matches!(&args[0], IrExpr::FlowGet(_)));
    }

    #[test]
    fn def_call_lifts_a_flow_argument_through_a_flow_combinator() {
        let callee = identifier("render", Phase::Const);
        let arg = identifier("count", Phase::Flow);
        let call = CheckedExpr::new(
            pos(),
            Type::Nothing,
            Phase::Flow,
            CheckedExprKind::Call { callee: Box::new(callee), args: vec![arg] },
        );
        let ret = CheckedExpr::new(pos(), Type::Nothing, Phase::Flow, CheckedExprKind::Return(Some(Box::new(call))));
        let block = Block { position: pos(), statements: vec![Stmt::ExprStmt(ret)] };
        let fn_decl = FunctionDecl {
            position: pos(),
            access: Access::Public,
            symbol: module().child("view"),
            function_phase: FunctionPhase::Def,
            type_params: vec![],
            params: vec![],
            result: Type::Nothing,
            body: FunctionBody::Block(block),
        };
        let file = CheckedFile { path: "main.ph".to_string(), declarations: vec![Decl::Function(fn_decl)] };
        let bindings = empty_bindings();
        let lowerer = Lowerer::new(module(), &bindings);
        let ir = lowerer.lower_file(&file);
        let IrDecl::Function(f) = &ir.declarations[0] else { panic!("expected function") };
        let IrStmt::Return(Some(IrExpr::Flow { sources, params, .. })) = &f.body[0] else {
            panic!("expected a lifted flow combinator in the return statement")
        };
        assert_eq!(sources.len(), 1);
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn cross_module_static_reference_registers_one_import() {
        let other_module = Symbol::root(pkg()).child("util");
        let symbol = other_module.child("helper");
        let reference = CheckedExpr::new(
            pos(),
            Type::Nothing,
            Phase::Const,
            CheckedExprKind::StaticReference { symbol: symbol.clone(), declaring_module: other_module.clone() },
        );
        let second_use = reference.clone();
        let block = Block {
            position: pos(),
            statements: vec![Stmt::ExprStmt(reference), Stmt::ExprStmt(second_use)],
        };
        let fn_decl = FunctionDecl {
            position: pos(),
            access: Access::Public,
            symbol: module().child("useHelper"),
            function_phase: FunctionPhase::Fun,
            type_params: vec![],
            params: vec![],
            result: Type::Nothing,
            body: FunctionBody::Block(block),
        };
        let file = CheckedFile { path: "main.ph".to_string(), declarations: vec![Decl::Function(fn_decl)] };
        let bindings = empty_bindings();
        let lowerer = Lowerer::new(module(), &bindings);
        let ir = lowerer.lower_file(&file);
        let import_count = ir.declarations.iter().filter(|d| matches!(d, IrDecl::Import { .. })).count();
        assert_eq!(import_count, 1);
    }

    #[test]
    fn if_expression_lowers_to_a_block_with_an_assigned_temporary() {
        let cond = identifier("ready", Phase::Const);
        let then_branch = int_literal(1, Phase::Const);
        let else_branch = int_literal(0, Phase::Const);
        let if_expr = CheckedExpr::new(
            pos(),
            Type::Nothing,
            Phase::Const,
            CheckedExprKind::If {
                condition: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Some(Box::new(else_branch)),
            },
        );
        let ret = CheckedExpr::new(pos(), Type::Nothing, Phase::Const, CheckedExprKind::Return(Some(Box::new(if_expr))));
        let block = Block { position: pos(), statements: vec![Stmt::ExprStmt(ret)] };
        let fn_decl = FunctionDecl {
            position: pos(),
            access: Access::Public,
            symbol: module().child("pick"),
            function_phase: FunctionPhase::Fun,
            type_params: vec![],
            params: vec![],
            result: Type::Nothing,
            body: FunctionBody::Block(block),
        };
        let file = CheckedFile { path: "main.ph".to_string(), declarations: vec![Decl::Function(fn_decl)] };
        let bindings = empty_bindings();
        let lowerer = Lowerer::new(module(), &bindings);
        let ir = lowerer.lower_file(&file);
        let IrDecl::Function(f) = &ir.declarations[0] else { panic!("expected function") };
        let IrStmt::Return(Some(IrExpr::Block { statements, .. })) = &f.body[0] else {
            panic!("expected a block wrapping the synthesized temporary")
        };
        assert!(matches!(statements.first(), Some(IrStmt::Let { .. })));
        assert!(matches!(statements.get(1), Some(IrStmt::If { .. })));
    }
}
