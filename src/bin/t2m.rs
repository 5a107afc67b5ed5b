//! Texmark CLI - LaTeX to Markdown notation converter

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};
#[cfg(feature = "cli")]
use texmark::{
    diagnostics::{check_document, format_diagnostics},
    utils::report::{BatchReport, FileOutcome, FileStatus},
    CliDiagnostic, ConversionWarning, ConvertOptions, MarkdownConverter,
};

/// Input extensions the batch driver recognizes.
#[cfg(feature = "cli")]
const INPUT_EXTENSIONS: &[&str] = &["tex", "latex"];

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "t2m")]
#[command(author = "SciPenAI")]
#[command(version)]
#[command(about = "Texmark - LaTeX to Markdown notation converter", long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input file path (reads from stdin if not provided)
    input_file: Option<String>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Treat unterminated math delimiters as hard errors
    #[arg(long)]
    strict: bool,

    /// Check mode - analyze the input for issues without converting
    #[arg(long)]
    check: bool,

    /// Use colored output for diagnostics
    #[arg(long, default_value_t = true)]
    color: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Check a document for conversion issues
    Check {
        /// Input file to check
        input: Option<String>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Batch convert a directory tree of LaTeX files
    Batch {
        /// Input file or directory (walked recursively)
        input: String,

        /// Output directory; the input directory structure is mirrored
        #[arg(short, long)]
        output_dir: String,

        /// File extension for output files
        #[arg(short, long, default_value = "md")]
        extension: String,

        /// Treat unterminated math delimiters as hard errors
        #[arg(long)]
        strict: bool,

        /// Write a JSON report of per-file outcomes to this path
        #[arg(long)]
        report: Option<String>,
    },

    /// Show version and feature info
    Info,
}

#[cfg(feature = "cli")]
fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if let Some(cmd) = cli.command {
        return handle_subcommand(cmd);
    }

    // Read input
    let (input, lossy, filename) = match cli.input_file {
        Some(ref path) => {
            let (text, lossy) = read_lossy(Path::new(path))?;
            (text, lossy, Some(path.clone()))
        }
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            let text = String::from_utf8_lossy(&buffer);
            let lossy = matches!(&text, std::borrow::Cow::Owned(_));
            (text.into_owned(), lossy, None)
        }
    };

    // If check mode, analyze and report issues
    if cli.check {
        let result = check_document(&input);
        println!("{}", format_diagnostics(&result, cli.color));
        if result.has_errors() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let options = if cli.strict {
        ConvertOptions::strict()
    } else {
        ConvertOptions::default()
    };
    let mut converter = MarkdownConverter::with_options(options);
    let result = converter.convert_document_with_diagnostics(&input);

    if lossy {
        let name = filename.as_deref().unwrap_or("<stdin>");
        print_diagnostic(ConversionWarning::lossy_decode(name).into(), cli.color);
    }
    for warning in &result.warnings {
        print_diagnostic(warning.clone().into(), cli.color);
    }
    if cli.strict
        && result
            .warnings
            .iter()
            .any(|w| w.kind == texmark::WarningKind::UnterminatedMath)
    {
        eprintln!("error: unterminated math delimiter (strict mode)");
        std::process::exit(1);
    }

    match cli.output {
        Some(path) => {
            fs::write(&path, &result.output)?;
            eprintln!("✓ Markdown written to: {}", path);
        }
        None => {
            println!("{}", result.output);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn handle_subcommand(cmd: Commands) -> io::Result<()> {
    match cmd {
        Commands::Check { input, no_color } => {
            let content = match input {
                Some(path) => read_lossy(Path::new(&path))?.0,
                None => {
                    let mut buffer = Vec::new();
                    io::stdin().read_to_end(&mut buffer)?;
                    String::from_utf8_lossy(&buffer).into_owned()
                }
            };
            let result = check_document(&content);
            println!("{}", format_diagnostics(&result, !no_color));
            if result.has_errors() {
                std::process::exit(1);
            }
        }

        Commands::Batch {
            input,
            output_dir,
            extension,
            strict,
            report,
        } => {
            // Creating the output root is the one unrecoverable failure.
            fs::create_dir_all(&output_dir)?;

            let input_path = Path::new(&input);
            let mut files = Vec::new();
            if input_path.is_dir() {
                collect_input_files(input_path, &mut files)?;
            } else {
                files.push(input_path.to_path_buf());
            }
            files.sort();

            let options = if strict {
                ConvertOptions::strict()
            } else {
                ConvertOptions::default()
            };
            let mut batch = BatchReport::new();

            for file_path in &files {
                let out_path = batch_output_path(file_path, input_path, &output_dir, &extension);
                match convert_one(file_path, &out_path, options) {
                    Ok(()) => {
                        eprintln!("✓ {}", out_path.display());
                        batch.record(FileOutcome::converted(
                            file_path.display().to_string(),
                            out_path.display().to_string(),
                        ));
                    }
                    Err((status, message)) => {
                        eprintln!("✗ {} - {}", file_path.display(), message);
                        batch.record(FileOutcome::failed(
                            file_path.display().to_string(),
                            status,
                            message,
                        ));
                    }
                }
            }

            eprintln!("\n{}", batch.summary());

            if let Some(path) = report {
                let serialized = serde_json::to_string_pretty(&batch)
                    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
                fs::write(&path, serialized)?;
                eprintln!("Report written to: {}", path);
            }

            if batch.has_failures() {
                std::process::exit(1);
            }
        }

        Commands::Info => {
            println!("Texmark - LaTeX to Markdown notation converter");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Features:");
            println!("  ✓ Inline and display math rewriting");
            println!("  ✓ Unicode symbol substitution (greek, operators, arrows)");
            println!("  ✓ List and aligned environment conversion");
            println!("  ✓ Protected image/figure description regions");
            println!("  ✓ Fenced code block protection");
            println!("  ✓ Batch directory conversion with JSON reports");
            println!();
        }
    }

    Ok(())
}

/// Read a file as bytes and decode with replacement characters; the second
/// element reports whether the decode was lossy.
#[cfg(feature = "cli")]
fn read_lossy(path: &Path) -> io::Result<(String, bool)> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    let lossy = matches!(&text, std::borrow::Cow::Owned(_));
    Ok((text.into_owned(), lossy))
}

/// Recursively collect files with a recognized input extension.
#[cfg(feature = "cli")]
fn collect_input_files(root: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_input_files(&path, files)?;
        } else {
            let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
            if INPUT_EXTENSIONS.contains(&ext) {
                files.push(path);
            }
        }
    }
    Ok(())
}

/// Mirror `file_path` under `output_dir`, relative to `input_root`, with the
/// output extension.
#[cfg(feature = "cli")]
fn batch_output_path(
    file_path: &Path,
    input_root: &Path,
    output_dir: &str,
    extension: &str,
) -> PathBuf {
    let relative = file_path
        .strip_prefix(input_root)
        .unwrap_or_else(|_| Path::new(file_path.file_name().unwrap_or_default()));
    Path::new(output_dir)
        .join(relative)
        .with_extension(extension)
}

#[cfg(feature = "cli")]
fn convert_one(
    file_path: &Path,
    out_path: &Path,
    options: ConvertOptions,
) -> Result<(), (FileStatus, String)> {
    let (content, lossy) = read_lossy(file_path)
        .map_err(|e| (FileStatus::ReadError, format!("read error: {}", e)))?;
    if lossy {
        eprintln!("  (replacement characters substituted in {})", file_path.display());
    }

    let mut converter = MarkdownConverter::with_options(options);
    let output = converter
        .convert(&content)
        .map_err(|e| (FileStatus::ConvertError, format!("convert error: {}", e)))?;

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| (FileStatus::WriteError, format!("write error: {}", e)))?;
    }
    fs::write(out_path, output)
        .map_err(|e| (FileStatus::WriteError, format!("write error: {}", e)))?;
    Ok(())
}

#[cfg(feature = "cli")]
fn print_diagnostic(diag: CliDiagnostic, color: bool) {
    if color {
        eprintln!("{}{}\x1b[0m", diag.color_code(), diag);
    } else {
        eprintln!("{}", diag);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install texmark --features cli");
    eprintln!("  t2m [OPTIONS] [INPUT_FILE]");
}
