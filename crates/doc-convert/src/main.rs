//! doc-convert: convert documents between text-bearing formats.
//!
//! `doc-convert convert report.docx --to pdf`
//! `doc-convert batch a.txt b.html --to epub -o books.zip`

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use convert_core::options::ServiceOptions;
use doc_convert::{inspect, registry, ConvertService, DocFormat};

#[derive(Parser)]
#[command(name = "doc-convert", version, about = "Document format converter")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory for stored uploads
    #[arg(long, global = true)]
    upload_dir: Option<PathBuf>,

    /// Directory for converted files
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Dump effective merged config as TOML and exit
    #[arg(long, global = true)]
    dump_config: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one file
    Convert {
        /// Input file
        input: PathBuf,

        /// Output format
        #[arg(long)]
        to: String,

        /// Output directory (overrides the configured one)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print metadata for a file as JSON
    Info {
        /// File to inspect
        file: PathBuf,
    },
    /// Convert several files and write them into one zip
    Batch {
        /// Input files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(long)]
        to: String,

        /// Zip archive to write
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List supported input and output formats
    Formats,
    /// Run one retention sweep over the storage directories
    Reap,
}

/// Load config from global and project-local TOML files.
/// The project-local file, when present, fully overrides the global one.
fn load_config() -> ServiceOptions {
    let mut opts = ServiceOptions::default();

    if let Some(config_dir) = dirs::config_dir() {
        let global_path = config_dir.join("doc-convert").join("config.toml");
        if let Some(parsed) = read_config(&global_path) {
            opts = parsed;
        }
    }

    if let Some(parsed) = read_config(Path::new(".doc-convert.toml")) {
        opts = parsed;
    }

    opts
}

fn read_config(path: &Path) -> Option<ServiceOptions> {
    let contents = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<ServiceOptions>(&contents) {
        Ok(parsed) => {
            log::debug!("Loaded config from {}", path.display());
            Some(parsed)
        }
        Err(e) => {
            log::warn!("Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}

/// Apply CLI flags on top of config-loaded options.
fn apply_cli_overrides(opts: &mut ServiceOptions, cli: &Cli) {
    if let Some(ref dir) = cli.upload_dir {
        opts.upload_dir = dir.clone();
    }
    if let Some(ref dir) = cli.output_dir {
        opts.output_dir = dir.clone();
    }
    if let Some(Commands::Convert {
        output: Some(ref dir),
        ..
    }) = cli.command
    {
        opts.output_dir = dir.clone();
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut opts = load_config();
    apply_cli_overrides(&mut opts, &cli);

    if cli.dump_config {
        match toml::to_string_pretty(&opts) {
            Ok(s) => {
                println!("{}", s);
                process::exit(0);
            }
            Err(e) => {
                eprintln!("Error serializing config: {}", e);
                process::exit(1);
            }
        }
    }

    let result = match cli.command {
        Some(Commands::Convert { input, to, .. }) => run_convert(opts, &input, &to),
        Some(Commands::Info { file }) => run_info(&file),
        Some(Commands::Batch { files, to, output }) => run_batch(opts, &files, &to, &output),
        Some(Commands::Formats) => run_formats(),
        Some(Commands::Reap) => run_reap(opts),
        None => {
            eprintln!("Usage: doc-convert convert <input> --to <format> [-o <dir>]");
            eprintln!("   or: doc-convert <info|batch|formats|reap> ...");
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .with_context(|| format!("Not a file name: {}", path.display()))
}

fn run_convert(opts: ServiceOptions, input: &Path, to: &str) -> Result<()> {
    let service = ConvertService::new(opts).context("Cannot prepare storage directories")?;
    let bytes =
        std::fs::read(input).with_context(|| format!("Cannot read {}", input.display()))?;

    let upload = service
        .upload(&file_name(input)?, &bytes)
        .with_context(|| format!("Cannot accept {}", input.display()))?;
    log::info!(
        "Extracted {} characters from {}",
        upload.size,
        upload.filename
    );

    let receipt = service
        .convert(&upload.file_id, to)
        .with_context(|| format!("Cannot convert {} to {}", input.display(), to))?;
    let written = service.output_path(&receipt.output_file)?;
    println!("{}", written.display());
    Ok(())
}

fn run_info(file: &Path) -> Result<()> {
    let name = file_name(file)?;
    let extension = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    let record = inspect(file, extension);
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn run_batch(opts: ServiceOptions, files: &[PathBuf], to: &str, output: &Path) -> Result<()> {
    let service = ConvertService::new(opts).context("Cannot prepare storage directories")?;

    let mut uploads = Vec::with_capacity(files.len());
    for path in files {
        match std::fs::read(path) {
            Ok(bytes) => uploads.push((file_name(path)?, bytes)),
            Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
        }
    }

    let receipt = service.batch_upload(&uploads)?;
    let conversion = service.batch_convert(&receipt.batch_id, to)?;
    let (archive_name, bytes) = service.batch_download(&receipt.batch_id)?;

    std::fs::write(output, &bytes)
        .with_context(|| format!("Cannot write {}", output.display()))?;
    log::info!(
        "Wrote {} ({} of {} files, built as {})",
        output.display(),
        conversion.count,
        files.len(),
        archive_name
    );
    println!("{}", output.display());
    Ok(())
}

fn run_formats() -> Result<()> {
    let list = |formats: Vec<DocFormat>| {
        formats
            .iter()
            .map(|f| f.extension())
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!("input:  {}", list(registry::input_formats()));
    println!("output: {}", list(registry::output_formats()));
    Ok(())
}

fn run_reap(opts: ServiceOptions) -> Result<()> {
    let service = ConvertService::new(opts)?;
    let report = service.reaper().sweep();
    println!(
        "removed {}, kept {}, failed {}",
        report.removed, report.kept, report.failed
    );
    Ok(())
}
