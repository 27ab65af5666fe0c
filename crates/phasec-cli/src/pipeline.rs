//! Wires the six analysis stages into one compilation: qualify → collect
//! (phasec-binder) → verify → check (phasec-checker) → transform
//! (phasec-transform) → lower (phasec-lowering), over every file of one
//! package in manifest order.

use anyhow::{Context, Result};
use phasec_ast::ParsedFile;
use phasec_binder::{DeclarationCollector, PackageArchive, Qualifier};
use phasec_checker::{verify_import, Checker};
use phasec_common::{CheckerOptions, Diagnostic, Symbol};
use phasec_lowering::{IrFile, Lowerer};
use phasec_transform::ReturnLift;
use std::path::Path;

use crate::manifest::Manifest;

pub struct CompiledFile {
    pub path: String,
    pub ir: IrFile,
}

pub struct CompiledProject {
    pub files: Vec<CompiledFile>,
    pub archive: PackageArchive,
}

/// Either a fatal analysis `Diagnostic` (printed with `colored`, per
/// spec.md §6.3) or a filesystem/manifest failure (the `anyhow` boundary
/// SPEC_FULL.md's errors section draws around the analysis core).
pub enum CompileError {
    Diagnostic(Diagnostic),
    Other(anyhow::Error),
}

impl From<Diagnostic> for CompileError {
    fn from(d: Diagnostic) -> Self {
        CompileError::Diagnostic(d)
    }
}

impl From<anyhow::Error> for CompileError {
    fn from(e: anyhow::Error) -> Self {
        CompileError::Other(e)
    }
}

/// Loads every `<stem>.ast.json` the manifest names and runs the full
/// pipeline over them. Fails at the first diagnostic, matching spec.md
/// §7's "not collected, first one terminates" rule.
pub fn compile_project(
    project_dir: &Path,
    manifest: &Manifest,
    options: &CheckerOptions,
) -> Result<CompiledProject, CompileError> {
    let dependency_manager = manifest.dependency_manager();
    let module = Symbol::root(manifest.self_package());

    let parsed_files = manifest
        .files
        .iter()
        .map(|stem| load_parsed_file(project_dir, stem))
        .collect::<Result<Vec<_>>>()?;

    let mut collector = DeclarationCollector::new();
    let mut qualifiers: Vec<Qualifier> = Vec::with_capacity(parsed_files.len());
    for file in &parsed_files {
        let _span = tracing::info_span!("collect", file = %file.path).entered();
        let qualifier = collector.collect_file(file, &module, &dependency_manager)?;
        qualifiers.push(qualifier);
    }
    let tables = collector.freeze();

    for file in &parsed_files {
        let _span = tracing::info_span!("verify_imports", file = %file.path).entered();
        for import in &file.imports {
            verify_import(&tables.symbol_table, &dependency_manager, &module, import)?;
        }
    }

    let checker = Checker::new(&tables.symbol_table, &tables.method_table, &tables.protocol_impl_table, options);
    let mut compiled = Vec::with_capacity(parsed_files.len());
    for (file, qualifier) in parsed_files.iter().zip(qualifiers) {
        let checked = checker.check_file(file, &module, qualifier, &dependency_manager)?;

        let _span = tracing::info_span!("transform", file = %file.path).entered();
        let transformed = phasec_transform::walk_file(&mut ReturnLift, checked);
        drop(_span);

        let _span = tracing::info_span!("lower", file = %file.path).entered();
        let lowerer = Lowerer::new(module.clone(), &tables.external_bindings);
        let ir = lowerer.lower_file(&transformed);
        compiled.push(CompiledFile { path: file.path.clone(), ir });
    }

    let archive = PackageArchive::build(
        manifest.self_package(),
        &tables.symbol_table,
        &tables.method_table,
        &tables.protocol_impl_table,
        &tables.external_bindings,
        manifest.files.clone(),
    );

    Ok(CompiledProject { files: compiled, archive })
}

fn load_parsed_file(project_dir: &Path, stem: &str) -> Result<ParsedFile> {
    let path = project_dir.join(format!("{stem}.ast.json"));
    let contents = std::fs::read_to_string(&path).with_context(|| format!("reading parse tree at {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing parse tree at {}", path.display()))
}
