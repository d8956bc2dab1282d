//! chart2xlsx CLI - Interlinear text chart XML to spreadsheet converter

#[cfg(feature = "cli")]
use clap::{ArgAction, Parser, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use textchart::{
    diagnostics::{format_diagnostics, CheckResult, Diagnostic, DiagnosticLevel},
    export, ChartConverter, ChartOptions, ConversionError, RenderedChart,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "chart2xlsx")]
#[command(version)]
#[command(about = "Convert interlinear text chart XML into a formatted spreadsheet", long_about = None)]
struct Cli {
    /// Input XML file (reads from stdin if not provided)
    input_file: Option<PathBuf>,

    /// Output file path (defaults to <input stem>.xlsx, or stdout for text formats)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Xlsx)]
    format: OutputFormat,

    /// Sheet title
    #[arg(long)]
    title: Option<String>,

    /// Sheet subtitle
    #[arg(long)]
    subtitle: Option<String>,

    /// Analysis column label (repeatable; replaces the default column)
    #[arg(long = "analysis-column", value_name = "LABEL")]
    analysis_columns: Vec<String>,

    /// Omit the analysis column entirely
    #[arg(long, conflicts_with = "analysis_columns")]
    no_analysis: bool,

    /// Text shown for reference codes that have none
    #[arg(long)]
    placeholder: Option<String>,

    /// Overwrite the output file if it exists
    #[arg(long)]
    force: bool,

    /// Check mode - convert and report diagnostics without writing output
    #[arg(long)]
    check: bool,

    /// Strict mode: exit with error if any conversion warnings occur
    #[arg(long)]
    strict: bool,

    /// Quiet mode: suppress diagnostic output to stderr
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored diagnostics
    #[arg(long)]
    no_color: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Excel workbook
    Xlsx,
    /// Rendered chart as JSON
    Json,
    /// Tab-separated preview
    Text,
}

#[cfg(feature = "cli")]
fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let use_color = !cli.no_color;

    // Read input
    let input = match cli.input_file {
        Some(ref path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let converter = ChartConverter::new(build_options(&cli));
    let chart = match converter.convert_str(&input) {
        Ok(chart) => chart,
        Err(err) => fail(&err, cli.check, use_color),
    };

    let result = chart.check_result();

    if cli.check {
        println!("{}", format_diagnostics(&result, use_color));
        if result.has_errors() || (cli.strict && result.warnings > 0) {
            std::process::exit(1);
        }
        return Ok(());
    }

    // Print diagnostics to stderr (unless quiet mode)
    if !cli.quiet && !result.is_empty() {
        eprintln!("{}", format_diagnostics(&result, use_color));
    }

    // Check strict mode
    if cli.strict && result.warnings > 0 {
        eprintln!(
            "Error: {} conversion warning(s) in strict mode",
            result.warnings
        );
        std::process::exit(1);
    }

    let output = match (&cli.output, cli.format) {
        (Some(path), _) => Some(path.clone()),
        (None, OutputFormat::Xlsx) => Some(default_output(cli.input_file.as_deref())),
        (None, _) => None,
    };

    if let Some(ref path) = output {
        if path.exists() && !cli.force {
            eprintln!(
                "Error: {} already exists (use --force to overwrite)",
                path.display()
            );
            std::process::exit(1);
        }
    }

    if let Err(err) = write_output(&chart, cli.format, output.as_deref()) {
        fail(&err, false, use_color);
    }

    if let Some(path) = output {
        if result.warnings == 0 {
            eprintln!("✓ Output written to: {}", path.display());
        } else {
            eprintln!(
                "⚠ Output written to: {} ({} warning(s))",
                path.display(),
                result.warnings
            );
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn build_options(cli: &Cli) -> ChartOptions {
    let mut options = if cli.no_analysis {
        ChartOptions::minimal()
    } else {
        ChartOptions::default()
    };
    if let Some(ref title) = cli.title {
        options.title = title.clone();
    }
    if let Some(ref subtitle) = cli.subtitle {
        options.subtitle = subtitle.clone();
    }
    if !cli.analysis_columns.is_empty() {
        options.analysis_columns = cli.analysis_columns.clone();
    }
    if let Some(ref placeholder) = cli.placeholder {
        options.reference_placeholder = placeholder.clone();
    }
    options
}

/// `<input stem>.xlsx` next to the input, or `chart.xlsx` for stdin
#[cfg(feature = "cli")]
fn default_output(input: Option<&Path>) -> PathBuf {
    match input {
        Some(path) => path.with_extension("xlsx"),
        None => PathBuf::from("chart.xlsx"),
    }
}

#[cfg(feature = "cli")]
fn write_output(
    chart: &RenderedChart,
    format: OutputFormat,
    path: Option<&Path>,
) -> Result<(), ConversionError> {
    let text = match format {
        OutputFormat::Xlsx => return write_xlsx(chart, path),
        OutputFormat::Json => render_json(chart)?,
        OutputFormat::Text => export::to_text(chart),
    };

    match path {
        Some(path) => fs::write(path, text)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(all(feature = "cli", feature = "xlsx"))]
fn write_xlsx(chart: &RenderedChart, path: Option<&Path>) -> Result<(), ConversionError> {
    match path {
        Some(path) => textchart::workbook::write_workbook(chart, path),
        None => {
            let bytes = textchart::workbook::workbook_to_bytes(chart)?;
            io::stdout().lock().write_all(&bytes)?;
            Ok(())
        }
    }
}

#[cfg(all(feature = "cli", not(feature = "xlsx")))]
fn write_xlsx(_chart: &RenderedChart, _path: Option<&Path>) -> Result<(), ConversionError> {
    Err(ConversionError::invalid(
        "xlsx output not available. Build with --features xlsx",
    ))
}

#[cfg(all(feature = "cli", feature = "json"))]
fn render_json(chart: &RenderedChart) -> Result<String, ConversionError> {
    export::to_json(chart)
}

#[cfg(all(feature = "cli", not(feature = "json")))]
fn render_json(_chart: &RenderedChart) -> Result<String, ConversionError> {
    Err(ConversionError::invalid(
        "json output not available. Build with --features json",
    ))
}

/// Report a fatal error and exit
#[cfg(feature = "cli")]
fn fail(err: &ConversionError, as_check: bool, use_color: bool) -> ! {
    if as_check {
        let mut result = CheckResult::new();
        let mut diag = Diagnostic::new(DiagnosticLevel::Error, err.to_string());
        if let ConversionError::ParseError {
            line: Some(line),
            column: Some(column),
            ..
        } = err
        {
            diag = diag.with_location(*line, *column);
        }
        if err.is_structural() {
            diag = diag.with_suggestion(
                "the title1 column spans must add up to the title2 columns plus the blank and analysis columns",
            );
        }
        result.add(diag);
        println!("{}", format_diagnostics(&result, use_color));
    } else {
        eprintln!("Error: {}", err);
    }
    std::process::exit(1);
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install textchart --features cli");
    eprintln!("  chart2xlsx [OPTIONS] [INPUT_FILE]");
}
