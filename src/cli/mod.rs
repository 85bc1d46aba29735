//! # CLI Module
//!
//! Command-line interface for collecting Spotlight wallpapers.
//!
//! ## Usage
//! ```bash
//! # Copy new Spotlight wallpapers into a folder
//! copy-spotlight-pics import ~/Pictures/Spotlight
//!
//! # See what would be copied
//! copy-spotlight-pics import ~/Pictures/Spotlight --dry-run
//!
//! # List the codes of a collection and its exact duplicates
//! copy-spotlight-pics scan ~/Pictures/Spotlight --output json
//!
//! # Compare two pictures
//! copy-spotlight-pics compare 0001.jpg 0002.jpg
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use spotlight_pics::core::cache::{default_cache_path, CacheBackend, InMemoryCache, SqliteCache};
use spotlight_pics::core::codec::{Fingerprinter, PictureCode, CODE_BITS};
use spotlight_pics::core::decode::{decode_file, PictureFilter, WALLPAPER_MIN_WIDTH};
use spotlight_pics::core::matcher::{MatchType, SAME_PICTURE_THRESHOLD};
use spotlight_pics::core::pipeline::{ImportPipeline, ImportResult};
use spotlight_pics::core::scanner::{index_folder, FolderIndex, ScanConfig};
use spotlight_pics::error::{Result, SpotlightError};
use spotlight_pics::events::{null_sender, Event, EventChannel, ImportEvent, PipelineEvent, ScanEvent};
use std::path::{Path, PathBuf};
use std::thread;

/// Copy Spotlight Pics - Keep every lock-screen wallpaper, once
#[derive(Parser, Debug)]
#[command(name = "copy-spotlight-pics")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy new Spotlight pictures into a folder
    Import {
        /// Folder holding the wallpaper collection
        target: PathBuf,

        /// Folder to import from (default: the Spotlight asset folder)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Ignore source pictures narrower than this
        #[arg(long, default_value_t = WALLPAPER_MIN_WIDTH)]
        min_width: u32,

        /// Accept any image format, not just JPEG
        #[arg(long)]
        any_format: bool,

        /// Show what would be copied without copying
        #[arg(long)]
        dry_run: bool,

        /// Cache database path
        #[arg(long, conflicts_with = "no_cache")]
        cache: Option<PathBuf>,

        /// Do not read or write the cache database
        #[arg(long)]
        no_cache: bool,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the picture codes of a folder and its exact duplicates
    Scan {
        /// Folder to scan
        folder: PathBuf,

        /// Include every file and image format, not just JPEG
        #[arg(long)]
        any_format: bool,

        /// Write the catalog to this JSON file
        #[arg(long)]
        save_catalog: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// Print the picture code of each file
    Code {
        /// Files to fingerprint
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Compare two pictures
    Compare {
        /// First picture
        a: PathBuf,
        /// Second picture
        b: PathBuf,
    },

    /// Inspect or maintain the cache database
    Cache {
        #[command(subcommand)]
        action: CacheAction,

        /// Cache database path
        #[arg(long, global = true)]
        cache: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum CacheAction {
    /// Show entry count and age
    Stats,
    /// Remove every entry
    Clear,
    /// Remove entries whose file is gone
    Prune,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (paths only)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            target,
            source,
            min_width,
            any_format,
            dry_run,
            cache,
            no_cache,
            output,
            verbose,
        } => {
            let filter = PictureFilter::default()
                .with_jpeg_only(!any_format)
                .with_min_width(Some(min_width).filter(|w| *w > 0));
            let cache = open_cache(cache, no_cache)?;
            run_import(target, source, filter, dry_run, cache, output, verbose)
        }
        Commands::Scan {
            folder,
            any_format,
            save_catalog,
            output,
        } => run_scan(&folder, any_format, save_catalog.as_deref(), output),
        Commands::Code { files } => run_code(&files),
        Commands::Compare { a, b } => run_compare(&a, &b),
        Commands::Cache { action, cache } => run_cache(action, cache),
    }
}

fn open_cache(path: Option<PathBuf>, disabled: bool) -> Result<Box<dyn CacheBackend>> {
    if disabled {
        return Ok(Box::new(InMemoryCache::new()));
    }
    let path = path.unwrap_or_else(default_cache_path);
    Ok(Box::new(SqliteCache::open(&path)?))
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb
}

fn run_import(
    target: PathBuf,
    source: Option<PathBuf>,
    filter: PictureFilter,
    dry_run: bool,
    cache: Box<dyn CacheBackend>,
    output: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();

    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Copy Spotlight Pics").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
    }

    let mut builder = ImportPipeline::builder()
        .target(target)
        .source_filter(filter)
        .dry_run(dry_run)
        .cache(cache);
    if let Some(source) = source {
        builder = builder.source(source);
    }
    let pipeline = builder.build()?;

    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "  {} {}",
            style("Source:").dim(),
            pipeline.config().source.display()
        ))
        .ok();
        term.write_line("").ok();
    }

    let (sender, receiver) = EventChannel::new();

    let progress = if matches!(output, OutputFormat::Pretty) {
        Some(progress_bar())
    } else {
        None
    };

    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_position(0);
                    pb.set_message(format!("{}", phase));
                }
                Event::Scan(ScanEvent::Progress(p)) => {
                    pb.set_length(p.total as u64);
                    pb.set_position(p.completed as u64 + 1);
                    if verbose {
                        pb.set_message(format!(
                            "{} (cache: {})",
                            file_name(&p.current_path),
                            p.cache_hits
                        ));
                    }
                }
                Event::Import(ImportEvent::Progress(p)) => {
                    pb.set_length(p.total as u64);
                    pb.set_position(p.completed as u64 + 1);
                    if verbose {
                        pb.set_message(file_name(&p.current_path));
                    }
                }
                Event::Import(ImportEvent::Copied { from, to }) => {
                    pb.println(format!(
                        "  {} {} -> {}",
                        style("+").green().bold(),
                        file_name(&from),
                        to.display()
                    ));
                }
                Event::Import(ImportEvent::Skipped { path, existing, .. }) if verbose => {
                    pb.println(format!(
                        "  {} {} exists as {}",
                        style("=").dim(),
                        file_name(&path),
                        file_name(&existing)
                    ));
                }
                Event::Import(ImportEvent::Error { path, message })
                | Event::Scan(ScanEvent::Error { path, message }) => {
                    pb.println(format!(
                        "  {} {}: {}",
                        style("!").yellow().bold(),
                        file_name(&path),
                        message
                    ));
                }
                Event::Pipeline(PipelineEvent::Completed { .. })
                | Event::Pipeline(PipelineEvent::Error { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    let result = result?;

    match output {
        OutputFormat::Pretty => print_pretty_import(&term, &result, verbose),
        OutputFormat::Json => print_json_import(&result),
        OutputFormat::Minimal => {
            for copied in &result.copied {
                println!("{}", copied.to.display());
            }
        }
    }

    Ok(())
}

fn print_pretty_import(term: &Term, result: &ImportResult, verbose: bool) {
    term.write_line("").ok();
    term.write_line(&format!(
        "{} {}",
        style("✓").green().bold(),
        if result.dry_run {
            "Dry Run Complete"
        } else {
            "Import Complete"
        }
    ))
    .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} pictures in the collection, {} source files, {:.1}s",
        style(result.target_pictures).cyan(),
        style(result.source_files).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();

    let verb = if result.dry_run { "to copy" } else { "copied" };
    term.write_line(&format!(
        "  {} new pictures {}",
        style(result.copied.len()).green().bold(),
        verb
    ))
    .ok();
    term.write_line(&format!(
        "  {} already in the collection",
        style(result.skipped.len()).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} ignored (format or size)",
        style(result.rejected.len()).dim()
    ))
    .ok();

    if !result.failures.is_empty() {
        term.write_line(&format!(
            "  {} could not be read",
            style(result.failures.len()).yellow()
        ))
        .ok();
    }

    if result.cache_hits > 0 {
        term.write_line(&format!("  {} cache hits", style(result.cache_hits).dim()))
            .ok();
    }

    if !result.target_duplicates.is_empty() {
        term.write_line("").ok();
        term.write_line(&format!(
            "{}",
            style("Identical pictures in the collection:").bold().underlined()
        ))
        .ok();
        for duplicate in &result.target_duplicates {
            term.write_line(&format!(
                "    {} = {}",
                duplicate.path.display(),
                duplicate.existing.display()
            ))
            .ok();
        }
    }

    if verbose {
        for failure in &result.failures {
            term.write_line(&format!(
                "  {} {}: {}",
                style("!").yellow(),
                failure.path.display(),
                failure.message
            ))
            .ok();
        }
        for error in &result.errors {
            term.write_line(&format!("  {} {}", style("!").yellow(), error)).ok();
        }
    }

    if result.dry_run {
        term.write_line("").ok();
        term.write_line(&format!(
            "{}",
            style("Dry run: no files were copied.").dim()
        ))
        .ok();
    }
}

fn print_json_import(result: &ImportResult) {
    let output = serde_json::json!({
        "target_pictures": result.target_pictures,
        "source_files": result.source_files,
        "dry_run": result.dry_run,
        "duration_ms": result.duration_ms,
        "cache_hits": result.cache_hits,
        "copied": result.copied,
        "skipped": result.skipped,
        "rejected": result.rejected,
        "failures": result.failures,
        "target_duplicates": result.target_duplicates,
        "errors": result.errors,
    });

    print_json(&output);
}

fn run_scan(
    folder: &Path,
    any_format: bool,
    save_catalog: Option<&Path>,
    output: OutputFormat,
) -> Result<()> {
    let (config, filter) = if any_format {
        (ScanConfig::any_file(), PictureFilter::any())
    } else {
        (ScanConfig::jpeg_files(), PictureFilter::default())
    };

    let index = match output {
        OutputFormat::Pretty => index_with_progress(folder, &config, &filter)?,
        _ => index_folder(folder, &config, &filter, &InMemoryCache::new(), &null_sender())?,
    };

    if let Some(path) = save_catalog {
        index.codes.catalog.save_json(path)?;
    }

    match output {
        OutputFormat::Pretty => {
            let term = Term::stdout();
            for entry in &index.codes.catalog {
                term.write_line(&format!(
                    "{}  {}",
                    style(entry.code()).dim(),
                    entry.path().display()
                ))
                .ok();
            }
            term.write_line("").ok();
            term.write_line(&format!(
                "{} pictures, {} identical, {} ignored, {} unreadable",
                style(index.codes.catalog.len()).cyan(),
                style(index.codes.duplicates.len()).yellow(),
                index.rejected.len(),
                index.codes.failures.len()
            ))
            .ok();
            for duplicate in &index.codes.duplicates {
                term.write_line(&format!(
                    "  {} {} = {}",
                    style("=").yellow(),
                    duplicate.path.display(),
                    duplicate.existing.display()
                ))
                .ok();
            }
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "catalog": index.codes.catalog.iter().collect::<Vec<_>>(),
            "duplicates": index.codes.duplicates,
            "rejected": index.rejected,
            "failures": index.codes.failures,
        })),
        OutputFormat::Minimal => {
            for duplicate in &index.codes.duplicates {
                println!("{}", duplicate.path.display());
            }
        }
    }

    Ok(())
}

fn index_with_progress(
    folder: &Path,
    config: &ScanConfig,
    filter: &PictureFilter,
) -> Result<FolderIndex> {
    let (sender, receiver) = EventChannel::new();
    let pb = progress_bar();
    let pb_clone = pb.clone();

    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            if let Event::Scan(ScanEvent::Progress(p)) = event {
                pb_clone.set_length(p.total as u64);
                pb_clone.set_position(p.completed as u64 + 1);
            }
        }
    });

    let index = index_folder(folder, config, filter, &InMemoryCache::new(), &sender);

    drop(sender);
    event_thread.join().ok();
    pb.finish_and_clear();

    Ok(index?)
}

fn run_code(files: &[PathBuf]) -> Result<()> {
    let mut fingerprinter = Fingerprinter::new();

    for path in files {
        let code: Result<PictureCode> = decode_file(path)
            .map_err(SpotlightError::from)
            .and_then(|picture| Ok(fingerprinter.fingerprint(&picture.image)?));

        match code {
            Ok(code) => println!("{}  {}", code, path.display()),
            Err(e) => eprintln!("{} {}", style("error:").red().bold(), e),
        }
    }

    Ok(())
}

fn run_compare(a: &Path, b: &Path) -> Result<()> {
    let mut fingerprinter = Fingerprinter::new();
    let code_a = fingerprinter.fingerprint(&decode_file(a)?.image)?;
    let code_b = fingerprinter.fingerprint(&decode_file(b)?.image)?;

    let similarity = code_a.similarity(&code_b);
    let verdict = MatchType::from_similarity(similarity, SAME_PICTURE_THRESHOLD);

    let verdict_text = if verdict.is_same_picture() {
        style(verdict.to_string()).green().bold()
    } else {
        style(verdict.to_string()).yellow()
    };

    println!(
        "{:.2}% similar ({} of {} bits differ): {}",
        similarity * 100.0,
        code_a.distance(&code_b),
        CODE_BITS,
        verdict_text
    );

    Ok(())
}

fn run_cache(action: CacheAction, path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(default_cache_path);
    let cache = SqliteCache::open(&path)?;
    let term = Term::stdout();

    match action {
        CacheAction::Stats => {
            let stats = cache.stats()?;
            term.write_line(&format!("{} {}", style("Cache:").bold(), path.display()))
                .ok();
            term.write_line(&format!(
                "  {} entries for {} of pictures",
                style(stats.total_entries).cyan(),
                format_bytes(stats.total_file_bytes)
            ))
            .ok();
        }
        CacheAction::Clear => {
            cache.clear()?;
            term.write_line(&format!("{} Cache cleared", style("✓").green())).ok();
        }
        CacheAction::Prune => {
            let removed = cache.prune_orphans()?;
            term.write_line(&format!(
                "{} Removed {} entries for missing files",
                style("✓").green(),
                removed
            ))
            .ok();
        }
    }

    Ok(())
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("{} {}", style("error:").red().bold(), e),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
