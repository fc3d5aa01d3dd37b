//! Build and query Bitcoin Script opcode specifications.
//!
//! Reads opcode tables in the tab-separated format understood by
//! [`script_spec::rows`] and prints the resulting specification as JSON,
//! looks up single opcodes, or indents a disassembly listing.

use std::path::Path;

use miette::miette;
use script_spec::{
    disasm::{format_disasm_line, is_first_script_line, Indentation, ScriptKind},
    rows::parse_rows,
    Diagnostic, Diagnostics, LogDiagnostics, Opcode, SpecBuilder, Specification,
};

mod config;
mod error;

use config::Config;
use error::ErrorReport;

fn main() -> miette::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = flags::Spectool::from_env().map_err(|e| ErrorReport::message(e.to_string()))?;
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match args.subcommand {
        flags::SpectoolCmd::Build(cmd) => run_build(&cmd, &config),
        flags::SpectoolCmd::Lookup(cmd) => run_lookup(&cmd, &config),
        flags::SpectoolCmd::Disasm(cmd) => run_disasm(&cmd, &config),
    }
}

fn run_build(cmd: &flags::Build, config: &Config) -> miette::Result<()> {
    let spec = build_spec(&cmd.table, config, cmd.strict)?;
    let json = serde_json::to_string_pretty(&spec)
        .map_err(|e| miette!("failed to serialize specification: {e}"))?;
    match &cmd.output {
        Some(path) => {
            std::fs::write(path, json)
                .map_err(|e| miette!("error writing '{}': {e}", path.display()))?;
            log::info!("wrote {} opcodes to {}", spec.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_lookup(cmd: &flags::Lookup, config: &Config) -> miette::Result<()> {
    let spec = build_spec(&cmd.table, config, false)?;
    let opcode = spec
        .get(&cmd.name)
        .ok_or_else(|| miette!("no opcode named '{}'", cmd.name))?;
    print!("{}", describe(opcode));
    Ok(())
}

fn run_disasm(cmd: &flags::Disasm, config: &Config) -> miette::Result<()> {
    let contents = read_contents(&cmd.listing)?;
    for line in format_listing(&contents, config.indent_step) {
        println!("{line}");
    }
    Ok(())
}

/// Indent a disassembly listing, starting each script with a heading.
fn format_listing(contents: &str, indent_step: usize) -> Vec<String> {
    let mut indentation = Indentation::new(indent_step);
    let mut lines = Vec::new();
    for line in contents.lines() {
        if is_first_script_line(line) {
            indentation.reset();
            if let Some(kind) = ScriptKind::of_line(line) {
                lines.push(format!("{kind}:"));
            }
        }
        lines.push(format_disasm_line(line, &mut indentation));
    }
    lines
}

fn build_spec(path: &Path, config: &Config, strict: bool) -> miette::Result<Specification> {
    let contents = read_contents(path)?;
    Ok(spec_from_table(path, contents, config, strict)?)
}

/// Build a specification from table text, logging any diagnostics.
///
/// In strict mode, malformed rows are an error.
fn spec_from_table(
    path: &Path,
    contents: String,
    config: &Config,
    strict: bool,
) -> Result<Specification, ErrorReport> {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut builder = SpecBuilder::new(&mut diagnostics, config.collisions);
    builder.extend(parse_rows(&contents));
    let (spec, summary) = builder.finish();
    log::info!(
        "{}: {} rows, {} opcodes ({} skipped, {} malformed, {} collisions)",
        path.display(),
        summary.rows,
        spec.len(),
        summary.skipped,
        summary.malformed,
        summary.collisions
    );

    let malformed = malformed_rows(&diagnostics);
    let mut log = LogDiagnostics;
    for diagnostic in diagnostics {
        log.report(diagnostic);
    }

    if strict && !malformed.is_empty() {
        let message = format!("{} malformed rows in '{}'", malformed.len(), path.display());
        return Err(ErrorReport::from_table_rows(message, &malformed, path, contents));
    }
    Ok(spec)
}

/// `(line, message)` for each row that could not be fully normalized.
fn malformed_rows(diagnostics: &[Diagnostic]) -> Vec<(usize, String)> {
    diagnostics
        .iter()
        .filter_map(|diagnostic| match diagnostic {
            Diagnostic::Malformed {
                line: Some(line),
                error,
            } => Some((*line, error.kind.to_string())),
            _ => None,
        })
        .collect()
}

fn describe(opcode: &Opcode) -> String {
    let mut out = format!("{} ({})\n", opcode.name, opcode.code);
    for (label, value) in [
        ("alias", &opcode.alias),
        ("inputs", &opcode.inputs),
        ("outputs", &opcode.outputs),
    ] {
        if !value.is_empty() {
            out.push_str(&format!("  {label}: {value}\n"));
        }
    }
    if !opcode.description.is_empty() {
        out.push_str(&format!("  {}\n", opcode.description));
    }
    out
}

pub(crate) fn read_contents(path: &Path) -> miette::Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        { ErrorReport::message(format!("error reading '{}': {}", path.display(), e)) }.into()
    })
}

mod flags {
    use std::path::PathBuf;

    xflags::xflags! {
        /// Build and query Bitcoin Script opcode specifications.
        cmd spectool {
            /// TOML file with build options.
            optional -c, --config config: PathBuf

            /// Print the specification built from a table as JSON.
            cmd build {
                required table: PathBuf
                /// Write the JSON here instead of stdout.
                optional -o, --output output: PathBuf
                /// Fail if any row is malformed.
                optional --strict
            }

            /// Print a single opcode from the specification.
            cmd lookup {
                required table: PathBuf
                required name: String
            }

            /// Indent a disassembly listing.
            cmd disasm {
                required listing: PathBuf
            }
        }
    }
}
