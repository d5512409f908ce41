//! CASM Compiler Driver
//!
//! `casmc` reads a `.casm` source file, runs the frontend and the NASM code
//! generator, and writes the assembly next to the input unless `-o` says
//! otherwise. Fatal errors end the process with status 1; code generation
//! warnings are printed and do not change the exit status.

use casm_codegen::{generate_nasm, CodegenOptions, CodegenOutput};
use casm_common::{CompilerError, ErrorReporter};
use casm_frontend::{Frontend, Parser};
use clap::Parser as _;
use log::{debug, info};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

#[derive(clap::Parser, Debug)]
#[command(name = "casmc", version, about = "CASM to x86 NASM compiler")]
struct Cli {
    /// Input CASM source file
    input: PathBuf,

    /// Output assembly file, `-` for stdout (defaults to the input with an .asm extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Debug logging plus token and AST dumps on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print the token stream as JSON and stop
    #[arg(long, conflicts_with = "dump_ast")]
    dump_tokens: bool,

    /// Print the parsed AST as JSON and stop
    #[arg(long)]
    dump_ast: bool,

    /// Function the program entry point jumps to
    #[arg(long, value_name = "NAME", default_value = "main")]
    entry: String,

    /// Generate 64-bit code (not supported)
    #[arg(long = "64")]
    x86_64: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

#[derive(Debug, PartialEq)]
enum OutputTarget {
    Stdout,
    File(PathBuf),
}

fn output_target(input: &Path, output: Option<&Path>) -> OutputTarget {
    match output {
        Some(path) if path == Path::new("-") => OutputTarget::Stdout,
        Some(path) => OutputTarget::File(path.to_path_buf()),
        None => OutputTarget::File(input.with_extension("asm")),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CompilerError> {
    serde_json::to_string_pretty(value).map_err(|e| CompilerError::InternalError {
        message: format!("JSON serialization failed: {}", e),
    })
}

fn run(cli: &Cli) -> Result<(), CompilerError> {
    if cli.x86_64 {
        return Err(CompilerError::unsupported(
            "64-bit output; only 32-bit NASM is generated",
        ));
    }

    let source = fs::read_to_string(&cli.input).map_err(|e| CompilerError::IoError {
        message: format!("cannot read {}: {}", cli.input.display(), e),
    })?;
    let filename = cli.input.display().to_string();
    debug!("compiling {} ({} bytes)", filename, source.len());

    let tokens = Frontend::tokenize_source(&source, &filename)?;
    if cli.dump_tokens {
        println!("{}", to_json(&tokens)?);
        return Ok(());
    }
    if cli.verbose {
        eprintln!("Tokens:");
        for token in &tokens {
            eprintln!("  {}", token);
        }
    }

    let ast = Parser::new(tokens).parse_program()?;
    if cli.dump_ast {
        println!("{}", to_json(&ast)?);
        return Ok(());
    }
    if cli.verbose {
        eprintln!("AST:\n{}", ast.pretty());
    }

    let options = CodegenOptions::default().with_entry(cli.entry.clone());
    let output = generate_nasm(&ast, &options);
    report_diagnostics(&output);

    match output_target(&cli.input, cli.output.as_deref()) {
        OutputTarget::Stdout => {
            let stdout = io::stdout();
            output.write_to(&mut stdout.lock())?;
        }
        OutputTarget::File(path) => {
            write_assembly(&output, &path)?;
            println!("NASM code successfully generated: {}", path.display());
        }
    }

    Ok(())
}

/// Write the program through a buffered file handle, closed on every path
fn write_assembly(output: &CodegenOutput, path: &Path) -> Result<(), CompilerError> {
    let file = File::create(path).map_err(|e| CompilerError::IoError {
        message: format!("failed to open output file {}: {}", path.display(), e),
    })?;
    let mut writer = BufWriter::new(file);
    output.write_to(&mut writer)?;
    info!("wrote {} bytes to {}", output.assembly.len(), path.display());
    Ok(())
}

fn report_diagnostics(output: &CodegenOutput) {
    let mut reporter = ErrorReporter::new();
    for diagnostic in &output.diagnostics {
        reporter.report(diagnostic.clone());
    }
    if reporter.diagnostics().is_empty() {
        return;
    }
    reporter.print_diagnostics();
    eprintln!("{}", reporter.summary());
}
