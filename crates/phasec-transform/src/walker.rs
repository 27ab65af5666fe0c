//! The generic tree-walking transform framework (spec.md §4.5): a
//! `Transform` provides `pre`/`post` hooks on expressions, statements, and
//! declarations; `walk_file` drives a full descent over a `CheckedFile`,
//! rewriting nodes bottom-up. Rewrites must preserve node kind — a function
//! declaration must transform to a function declaration — which is why the
//! hooks take and return the same node type rather than some other shape.

use phasec_checked::{
    Block, CheckedExpr, CheckedExprKind, CheckedFile, ConstantDecl, Decl, FunctionBody,
    FunctionDecl, ImplDecl, Stmt,
};

/// A rewrite pass over the checked tree. Default hooks are the identity, so
/// a transform need only override the hooks it cares about.
pub trait Transform {
    fn pre_expr(&mut self, expr: CheckedExpr) -> CheckedExpr {
        expr
    }
    fn post_expr(&mut self, expr: CheckedExpr) -> CheckedExpr {
        expr
    }
    fn pre_stmt(&mut self, stmt: Stmt) -> Stmt {
        stmt
    }
    fn post_stmt(&mut self, stmt: Stmt) -> Stmt {
        stmt
    }
    fn pre_decl(&mut self, decl: Decl) -> Decl {
        decl
    }
    fn post_decl(&mut self, decl: Decl) -> Decl {
        decl
    }
    /// Runs once per function body, after its block has already been
    /// walked statement-by-statement — the hook return-lifting needs,
    /// since its rewrite operates on the block as a whole rather than on
    /// any one statement in isolation.
    fn post_function_body(&mut self, phase: phasec_types::FunctionPhase, body: FunctionBody) -> FunctionBody {
        let _ = phase;
        body
    }
}

/// Walks every declaration of `file` through `transform`, returning the
/// rewritten file.
pub fn walk_file<T: Transform>(transform: &mut T, file: CheckedFile) -> CheckedFile {
    let declarations = file.declarations.into_iter().map(|d| walk_decl(transform, d)).collect();
    CheckedFile { path: file.path, declarations }
}

pub fn walk_decl<T: Transform>(transform: &mut T, decl: Decl) -> Decl {
    let decl = transform.pre_decl(decl);
    let decl = match decl {
        Decl::Constant(c) => Decl::Constant(walk_constant(transform, c)),
        Decl::Function(f) => Decl::Function(walk_function(transform, f)),
        Decl::Impl(i) => Decl::Impl(walk_impl(transform, i)),
        // Data/Enum/Protocol carry no expressions or bodies to descend into.
        other @ (Decl::Data(_) | Decl::Enum(_) | Decl::Protocol(_)) => other,
    };
    transform.post_decl(decl)
}

fn walk_constant<T: Transform>(transform: &mut T, mut c: ConstantDecl) -> ConstantDecl {
    c.expr = c.expr.map(|e| walk_expr(transform, e));
    c
}

fn walk_function<T: Transform>(transform: &mut T, mut f: FunctionDecl) -> FunctionDecl {
    f.body = walk_function_body(transform, f.function_phase, f.body);
    f
}

fn walk_impl<T: Transform>(transform: &mut T, mut i: ImplDecl) -> ImplDecl {
    i.methods = i.methods.into_iter().map(|m| walk_function(transform, m)).collect();
    i
}

fn walk_function_body<T: Transform>(
    transform: &mut T,
    phase: phasec_types::FunctionPhase,
    body: FunctionBody,
) -> FunctionBody {
    let body = match body {
        FunctionBody::Block(block) => FunctionBody::Block(walk_block(transform, block)),
        extern_body @ FunctionBody::Extern(_) => extern_body,
    };
    transform.post_function_body(phase, body)
}

pub fn walk_block<T: Transform>(transform: &mut T, block: Block) -> Block {
    let statements = block.statements.into_iter().map(|s| walk_stmt(transform, s)).collect();
    Block { position: block.position, statements }
}

pub fn walk_stmt<T: Transform>(transform: &mut T, stmt: Stmt) -> Stmt {
    let stmt = transform.pre_stmt(stmt);
    let stmt = match stmt {
        Stmt::ExprStmt(e) => Stmt::ExprStmt(walk_expr(transform, e)),
        Stmt::Assignment { position, name, phase, ty, expr } => {
            Stmt::Assignment { position, name, phase, ty, expr: walk_expr(transform, expr) }
        }
        Stmt::Reassignment { position, target, expr } => Stmt::Reassignment {
            position,
            target: walk_expr(transform, target),
            expr: walk_expr(transform, expr),
        },
        Stmt::FunctionStmt(f) => Stmt::FunctionStmt(walk_function(transform, f)),
    };
    transform.post_stmt(stmt)
}

pub fn walk_expr<T: Transform>(transform: &mut T, expr: CheckedExpr) -> CheckedExpr {
    let expr = transform.pre_expr(expr);
    let CheckedExpr { position, ty, phase, kind } = expr;
    let kind = match kind {
        leaf @ (CheckedExprKind::BoolLiteral(_)
        | CheckedExprKind::IntLiteral(_)
        | CheckedExprKind::FloatLiteral(_)
        | CheckedExprKind::StringLiteral(_)
        | CheckedExprKind::NoOp
        | CheckedExprKind::Identifier(_)
        | CheckedExprKind::StaticReference { .. }) => leaf,
        CheckedExprKind::ListLiteral(items) => {
            CheckedExprKind::ListLiteral(items.into_iter().map(|e| walk_expr(transform, e)).collect())
        }
        CheckedExprKind::SetLiteral(items) => {
            CheckedExprKind::SetLiteral(items.into_iter().map(|e| walk_expr(transform, e)).collect())
        }
        CheckedExprKind::MapLiteral(pairs) => CheckedExprKind::MapLiteral(
            pairs.into_iter().map(|(k, v)| (walk_expr(transform, k), walk_expr(transform, v))).collect(),
        ),
        CheckedExprKind::Is { expr, ty } => {
            CheckedExprKind::Is { expr: Box::new(walk_expr(transform, *expr)), ty }
        }
        CheckedExprKind::Not(e) => CheckedExprKind::Not(Box::new(walk_expr(transform, *e))),
        CheckedExprKind::And(a, b) => {
            CheckedExprKind::And(Box::new(walk_expr(transform, *a)), Box::new(walk_expr(transform, *b)))
        }
        CheckedExprKind::Or(a, b) => {
            CheckedExprKind::Or(Box::new(walk_expr(transform, *a)), Box::new(walk_expr(transform, *b)))
        }
        CheckedExprKind::FieldAccess { base, field } => {
            CheckedExprKind::FieldAccess { base: Box::new(walk_expr(transform, *base)), field }
        }
        CheckedExprKind::Construct { base, fields } => CheckedExprKind::Construct {
            base,
            fields: fields.into_iter().map(|(name, e)| (name, walk_expr(transform, e))).collect(),
        },
        CheckedExprKind::Call { callee, args } => CheckedExprKind::Call {
            callee: Box::new(walk_expr(transform, *callee)),
            args: args.into_iter().map(|e| walk_expr(transform, e)).collect(),
        },
        CheckedExprKind::Lambda { params, body } => {
            CheckedExprKind::Lambda { params, body: Box::new(walk_expr(transform, *body)) }
        }
        CheckedExprKind::Block(block) => CheckedExprKind::Block(walk_block(transform, block)),
        CheckedExprKind::If { condition, then_branch, else_branch } => CheckedExprKind::If {
            condition: Box::new(walk_expr(transform, *condition)),
            then_branch: Box::new(walk_expr(transform, *then_branch)),
            else_branch: else_branch.map(|e| Box::new(walk_expr(transform, *e))),
        },
        CheckedExprKind::Return(e) => {
            CheckedExprKind::Return(e.map(|e| Box::new(walk_expr(transform, *e))))
        }
    };
    transform.post_expr(CheckedExpr { position, ty, phase, kind })
}
