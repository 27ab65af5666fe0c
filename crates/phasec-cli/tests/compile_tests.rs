//! End-to-end pipeline tests: a hand-built project directory (manifest plus
//! serialized parse trees, standing in for the external parser's output)
//! compiled through `phasec_cli::compile_project`.

use phasec_ast::{ConstantDecl, Expr, ExprKind, ParsedFile, TopLevelDecl};
use phasec_binder::PackageArchive;
use phasec_cli::{compile_project, CompileError, Manifest};
use phasec_common::{Access, CheckerOptions, Position};
use phasec_lowering::{IrDecl, IrExpr};
use tempfile::TempDir;

fn pos() -> Position {
    Position::new("main.ph", 1, 1)
}

fn write_project(dir: &TempDir, declarations: Vec<TopLevelDecl>) {
    let manifest = serde_json::json!({
        "organization": "acme",
        "name": "app",
        "version": { "major": 1, "minor": 0, "patch": 0 },
        "dependencies": [],
        "files": ["main"],
    });
    std::fs::write(dir.path().join("manifest.json"), manifest.to_string()).unwrap();

    let file = ParsedFile { path: "main.ph".to_string(), imports: vec![], declarations };
    std::fs::write(dir.path().join("main.ast.json"), serde_json::to_string(&file).unwrap()).unwrap();
}

#[test]
fn a_public_constant_lowers_and_is_exported_in_the_archive() {
    let dir = TempDir::new().unwrap();
    write_project(
        &dir,
        vec![TopLevelDecl::Constant(ConstantDecl {
            position: pos(),
            access: Access::Public,
            name: "answer".to_string(),
            ty: None,
            expr: Some(Expr::new(pos(), ExprKind::IntLiteral(42))),
            external: None,
        })],
    );

    let manifest = Manifest::load(dir.path()).unwrap();
    let compiled = compile_project(dir.path(), &manifest, &CheckerOptions::default())
        .unwrap_or_else(|_| panic!("expected a successful compile"));

    assert_eq!(compiled.files.len(), 1);
    let ir = &compiled.files[0].ir;
    assert!(ir.declarations.iter().any(|d| matches!(d, IrDecl::Const { name, expr: IrExpr::IntLiteral(42) } if name == "answer")));
    assert!(ir.declarations.iter().any(|d| matches!(d, IrDecl::Export { name } if name == "answer")));

    let archive: PackageArchive =
        serde_json::from_str(&serde_json::to_string(&compiled.archive).unwrap()).unwrap();
    assert!(archive.symbols.iter().any(|s| s.symbol.name() == Some("answer")));
}

#[test]
fn a_constant_with_no_type_and_no_initializer_is_reported_as_a_diagnostic() {
    let dir = TempDir::new().unwrap();
    write_project(
        &dir,
        vec![TopLevelDecl::Constant(ConstantDecl {
            position: pos(),
            access: Access::Public,
            name: "broken".to_string(),
            ty: None,
            expr: None,
            external: None,
        })],
    );

    let manifest = Manifest::load(dir.path()).unwrap();
    let err = compile_project(dir.path(), &manifest, &CheckerOptions::default())
        .err()
        .expect("expected a diagnostic");
    assert!(matches!(err, CompileError::Diagnostic(_)));
}

#[test]
fn a_missing_manifest_is_reported_as_a_filesystem_error() {
    let dir = TempDir::new().unwrap();
    let err = Manifest::load(dir.path()).unwrap_err();
    assert!(err.to_string().contains("manifest"));
}
