//! The one shipped transform (spec.md §4.5): any function body that is a
//! block whose last statement is an expression-statement is rewritten so
//! that the last expression is wrapped in a `return`. Bodies already ending
//! in a return, or whose last statement is not an expression (e.g. an
//! assignment, a reassignment, or an empty block), are left untouched.

use phasec_checked::{CheckedExpr, CheckedExprKind, FunctionBody, Stmt};
use phasec_types::FunctionPhase;

use crate::walker::Transform;

/// Stateless — the rewrite only ever looks at the block it is handed, so a
/// single instance can walk every declaration in a file.
#[derive(Debug, Default)]
pub struct ReturnLift;

impl Transform for ReturnLift {
    fn post_function_body(&mut self, _phase: FunctionPhase, body: FunctionBody) -> FunctionBody {
        match body {
            FunctionBody::Block(mut block) => {
                if let Some(Stmt::ExprStmt(_)) = block.statements.last() {
                    let Some(Stmt::ExprStmt(last)) = block.statements.pop() else {
                        unreachable!("just matched ExprStmt above")
                    };
                    block.statements.push(Stmt::ExprStmt(lift(last)));
                }
                FunctionBody::Block(block)
            }
            extern_body @ FunctionBody::Extern(_) => extern_body,
        }
    }
}

fn lift(expr: CheckedExpr) -> CheckedExpr {
    if matches!(expr.kind, CheckedExprKind::Return(_)) {
        return expr;
    }
    let position = expr.position.clone();
    let ty = phasec_types::Type::Nothing;
    let phase = expr.phase;
    CheckedExpr::new(position, ty, phase, CheckedExprKind::Return(Some(Box::new(expr))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasec_checked::{Block, CheckedFile, Decl, FunctionDecl};
    use phasec_common::{Access, Package, Position, Symbol, Version};
    use phasec_types::{Phase, Type};

    fn pos() -> Position {
        Position::synthetic()
    }

    fn pkg() -> Package {
        Package::new("acme", "app", Version::new(1, 0, 0))
    }

    fn int_literal(n: i64) -> CheckedExpr {
        CheckedExpr::new(
            pos(),
            Type::Nominal(Symbol::root(pkg()).child("Int")),
            Phase::Const,
            CheckedExprKind::IntLiteral(n),
        )
    }

    fn fn_decl(body: FunctionBody) -> FunctionDecl {
        FunctionDecl {
            position: pos(),
            access: Access::Public,
            symbol: Symbol::root(pkg()).child("f"),
            function_phase: FunctionPhase::Fun,
            type_params: vec![],
            params: vec![],
            result: Type::Nothing,
            body,
        }
    }

    #[test]
    fn trailing_expression_statement_is_wrapped_in_return() {
        let block = Block { position: pos(), statements: vec![Stmt::ExprStmt(int_literal(1))] };
        let file = CheckedFile {
            path: "main.ph".to_string(),
            declarations: vec![Decl::Function(fn_decl(FunctionBody::Block(block)))],
        };
        let lifted = crate::walk_file(&mut ReturnLift, file);
        let Decl::Function(f) = &lifted.declarations[0] else { panic!("expected function") };
        let FunctionBody::Block(block) = &f.body else { panic!("expected block body") };
        assert!(matches!(block.statements.last(), Some(Stmt::ExprStmt(e)) if matches!(e.kind, CheckedExprKind::Return(_))));
    }

    #[test]
    fn a_body_already_ending_in_return_is_untouched() {
        let ret = CheckedExpr::new(pos(), Type::Nothing, Phase::Const, CheckedExprKind::Return(Some(Box::new(int_literal(1)))));
        let block = Block { position: pos(), statements: vec![Stmt::ExprStmt(ret.clone())] };
        let file = CheckedFile {
            path: "main.ph".to_string(),
            declarations: vec![Decl::Function(fn_decl(FunctionBody::Block(block)))],
        };
        let lifted = crate::walk_file(&mut ReturnLift, file);
        let Decl::Function(f) = &lifted.declarations[0] else { panic!("expected function") };
        let FunctionBody::Block(block) = &f.body else { panic!("expected block body") };
        assert_eq!(block.statements.last(), Some(&Stmt::ExprStmt(ret)));
    }

    #[test]
    fn a_body_ending_in_a_non_expression_statement_is_untouched() {
        let block = Block {
            position: pos(),
            statements: vec![Stmt::Assignment {
                position: pos(),
                name: "x".to_string(),
                phase: Phase::Val,
                ty: Type::Nominal(Symbol::root(pkg()).child("Int")),
                expr: int_literal(1),
            }],
        };
        let file = CheckedFile {
            path: "main.ph".to_string(),
            declarations: vec![Decl::Function(fn_decl(FunctionBody::Block(block.clone())))],
        };
        let lifted = crate::walk_file(&mut ReturnLift, file);
        let Decl::Function(f) = &lifted.declarations[0] else { panic!("expected function") };
        let FunctionBody::Block(got) = &f.body else { panic!("expected block body") };
        assert_eq!(got, &block);
    }

    #[test]
    fn an_extern_body_is_untouched() {
        let file = CheckedFile {
            path: "main.ph".to_string(),
            declarations: vec![Decl::Function(fn_decl(FunctionBody::Extern("jsImpl".to_string())))],
        };
        let lifted = crate::walk_file(&mut ReturnLift, file);
        let Decl::Function(f) = &lifted.declarations[0] else { panic!("expected function") };
        assert!(matches!(f.body, FunctionBody::Extern(_)));
    }
}
