//! Binary entry point for symprefix-extract.
//!
//! Lists a static library's exported symbols and writes them as a symbols
//! file for `symprefix`:
//!
//! ```bash
//! symprefix-extract libfoo.a symbols.txt --ignore-cpp
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::error;

use symprefix::cli::{init_tracing, run_extract, ExtractRequest, OutputFormat};
use symprefix_core::error::PrefixError;
use symprefix_core::extract::{SymbolFilter, SymbolTool};
use symprefix_core::output::{emit_response, ErrorResponse};

/// Extract exported symbols from a static library.
#[derive(Parser, Debug)]
#[command(
    name = "symprefix-extract",
    version,
    about = "Extract exported symbols from a static library"
)]
struct Cli {
    /// Static library to inspect.
    library: PathBuf,

    /// Symbols file to write.
    output: PathBuf,

    /// Drop C++ mangled names.
    #[arg(long)]
    ignore_cpp: bool,

    /// Symbol listing tool (default: dumpbin on Windows, nm elsewhere).
    #[arg(long, value_enum)]
    tool: Option<ToolArg>,

    /// Print the library, symbol count and a sample of symbols.
    #[arg(short, long)]
    verbose: bool,

    /// Output format for the result.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ToolArg {
    Nm,
    Dumpbin,
}

impl From<ToolArg> for SymbolTool {
    fn from(arg: ToolArg) -> Self {
        match arg {
            ToolArg::Nm => SymbolTool::Nm,
            ToolArg::Dumpbin => SymbolTool::Dumpbin,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = cli.format;
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            if format == OutputFormat::Json {
                let _ = emit_response(&ErrorResponse::from_error(&err), &mut io::stdout());
                let _ = io::stdout().flush();
            }
            ExitCode::from(err.error_code().code())
        }
    }
}

fn execute(cli: Cli) -> Result<(), PrefixError> {
    let request = ExtractRequest {
        library: cli.library,
        output: cli.output,
        tool: cli.tool.map_or_else(SymbolTool::for_host, SymbolTool::from),
        filter: SymbolFilter {
            ignore_cpp: cli.ignore_cpp,
        },
    };
    let response = run_extract(&request)?;

    let mut stdout = io::stdout();
    let written = match cli.format {
        OutputFormat::Text => {
            let mut lines = if cli.verbose {
                response.detail_lines()
            } else {
                Vec::new()
            };
            lines.push(response.summary_line());
            lines.iter().try_for_each(|line| writeln!(stdout, "{line}"))
        }
        OutputFormat::Json => emit_response(&response, &mut stdout),
    };
    written.map_err(|e| PrefixError::internal(e.to_string()))?;
    let _ = stdout.flush();
    Ok(())
}
