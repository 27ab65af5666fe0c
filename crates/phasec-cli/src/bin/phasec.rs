//! The `phasec` binary: a thin `clap` front end over
//! `phasec_cli::{compile_project, Manifest}`.

use clap::Parser;
use colored::Colorize;
use phasec_cli::{compile_project, CompileError, Manifest};
use phasec_common::CheckerOptions;
use std::path::PathBuf;
use std::process::ExitCode;

/// Semantic-analysis core for a four-phase reactive language.
#[derive(Parser, Debug)]
#[command(name = "phasec", version, about)]
struct Args {
    /// Project directory containing `manifest.json` and `*.ast.json` files.
    project: PathBuf,

    /// Directory to write `*.ir.json` and `package.json` into. Defaults to
    /// `<project>/out`.
    #[arg(short = 'o', long)]
    out: Option<PathBuf>,

    /// Verbose tracing output (`debug`/`trace` spans per pipeline stage).
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CompileError::Diagnostic(diagnostic)) => {
            eprintln!("{}", diagnostic.to_string().red());
            ExitCode::FAILURE
        }
        Err(CompileError::Other(err)) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CompileError> {
    let manifest = Manifest::load(&args.project).map_err(CompileError::Other)?;
    let options = CheckerOptions::default();
    let compiled = compile_project(&args.project, &manifest, &options)?;

    let out_dir = args.out.clone().unwrap_or_else(|| args.project.join("out"));
    std::fs::create_dir_all(&out_dir).map_err(|e| CompileError::Other(e.into()))?;

    for file in &compiled.files {
        let stem = std::path::Path::new(&file.path).file_stem().and_then(|s| s.to_str()).unwrap_or(&file.path);
        let ir_path = out_dir.join(format!("{stem}.ir.json"));
        let json = serde_json::to_string_pretty(&file.ir).map_err(|e| CompileError::Other(e.into()))?;
        std::fs::write(&ir_path, json).map_err(|e| CompileError::Other(e.into()))?;
    }

    let archive_json = serde_json::to_string_pretty(&compiled.archive).map_err(|e| CompileError::Other(e.into()))?;
    std::fs::write(out_dir.join("package.json"), archive_json).map_err(|e| CompileError::Other(e.into()))?;

    Ok(())
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).without_time().init();
}
