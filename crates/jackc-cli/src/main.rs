//! `jackc` — translates one `.jack` file, or every top-level `.jack` file in
//! a directory, into stack-VM text next to the source.

mod discover;

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jackc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compiler for the Jack object language, emitting stack-VM text")]
struct Cli {
    /// A `.jack` file, or a directory to scan non-recursively for `.jack` files.
    path: PathBuf,

    /// Raise log verbosity to debug.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("jackc=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jackc=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let units = match discover::jack_files(&cli.path) {
        Ok(units) => units,
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let mut any_failed = false;
    for unit in units {
        if let Err(err) = compile_unit(&unit) {
            any_failed = true;
            tracing::error!(path = %unit.display(), "{err}");
        }
    }

    if any_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn compile_unit(path: &Path) -> Result<(), jackc_compiler::CompileError> {
    let start = std::time::Instant::now();
    tracing::debug!(path = %path.display(), "compiling");

    let source = fs::read_to_string(path).map_err(|source| jackc_error::io_error(path, source))?;
    let out_path = path.with_extension("vm");
    let out_file = File::create(&out_path).map_err(|source| jackc_error::io_error(path, source))?;

    jackc_compiler::compile(&source, path, out_file)?;

    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "{} -> {}",
        path.display(),
        out_path.display()
    );
    Ok(())
}

/// Small local shim so a bare `std::io::Error` from the driver's own file
/// handling (opening the source, creating the sink) reports through the
/// same `CompileError::Io` variant the compiler core uses.
mod jackc_error {
    use std::path::Path;

    pub fn io_error(path: &Path, source: std::io::Error) -> jackc_compiler::CompileError {
        jackc_compiler::error::IoError {
            path: path.to_path_buf(),
            source,
        }
        .into()
    }
}
