//! CLI binary for doc2text.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use doc2text::{
    extract_file, ExtractionConfig, ExtractionProgressCallback, ModelVariant, ProgressCallback,
    DEFAULT_OUTPUT_FILENAME,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar and per-page log
/// lines using [indicatif]. Pages complete strictly in order.
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set dynamically
    /// by `on_extraction_start` (called once ingestion knows the page count).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_extraction_start

        // Initial style: spinner only (no counter until we know the total).
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Decoding document…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Extracting");
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Recognising {total_pages} page(s)…"))
        ));
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, word_count: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{word_count:>5} words")),
        ));
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, total_pages: usize, word_count: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages recognised, {} words",
            green("✔"),
            bold(&total_pages.to_string()),
            bold(&word_count.to_string()),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract to stdout
  doc2text scan.pdf

  # Write texto_extraido.txt next to the current directory
  doc2text scan.pdf -o

  # Write to a chosen file
  doc2text scan.pdf -o extracted.txt

  # Single image, fast model, no rotation correction
  doc2text photo.jpg --variant fast --no-rotate

  # Tighter detection, looser recognition
  doc2text scan.pdf --det-threshold 0.7 --rec-threshold 0.2

  # JSON output with per-page stats
  doc2text scan.pdf --json > result.json

SUPPORTED INPUTS:
  application/pdf   .pdf            rasterised at --dpi (default 300)
  image/png         .png
  image/jpeg        .jpg .jpeg
  image/tiff        .tif .tiff
  image/bmp         .bmp

ENVIRONMENT VARIABLES:
  TESSDATA_PREFIX          Tesseract model-data directory (or use --tessdata)
  PDFIUM_DYNAMIC_LIB_PATH  Path to an existing libpdfium copy

SETUP:
  1. Install tesseract language data:  apt install tesseract-ocr-eng
  2. Extract:                          doc2text scan.pdf -o
"#;

/// Extract plain text from PDF documents and images using a pretrained OCR model.
#[derive(Parser, Debug)]
#[command(
    name = "doc2text",
    version,
    about = "Extract plain text from PDF documents and images using a pretrained OCR model",
    long_about = "Extract plain text from documents (PDF, PNG, JPEG, TIFF, BMP). PDF pages are \
rasterised with pdfium and every page image is passed through a pretrained OCR model; the \
recognised words are flattened into one plain-text string.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Document to extract (PDF or image file).
    input: PathBuf,

    /// Write text to a file instead of stdout.
    /// A bare `-o` writes texto_extraido.txt.
    #[arg(
        short,
        long,
        env = "DOC2TEXT_OUTPUT",
        num_args = 0..=1,
        default_missing_value = DEFAULT_OUTPUT_FILENAME
    )]
    output: Option<PathBuf>,

    /// Model variant: accurate or fast.
    #[arg(long, env = "DOC2TEXT_VARIANT", value_enum, default_value = "accurate")]
    variant: VariantArg,

    /// Detection confidence threshold (0.1–1.0).
    #[arg(long, env = "DOC2TEXT_DET_THRESHOLD", default_value_t = 0.5)]
    det_threshold: f32,

    /// Recognition confidence threshold (0.1–1.0).
    #[arg(long, env = "DOC2TEXT_REC_THRESHOLD", default_value_t = 0.3)]
    rec_threshold: f32,

    /// Disable page-orientation correction.
    #[arg(long, env = "DOC2TEXT_NO_ROTATE")]
    no_rotate: bool,

    /// Rasterisation DPI for PDF pages (72–600).
    #[arg(long, env = "DOC2TEXT_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "DOC2TEXT_PASSWORD")]
    password: Option<String>,

    /// Recognition language (tesseract language code).
    #[arg(long, env = "DOC2TEXT_LANG")]
    lang: Option<String>,

    /// Tesseract model-data directory.
    #[arg(long, env = "DOC2TEXT_TESSDATA")]
    tessdata: Option<PathBuf>,

    /// Output structured JSON (Extraction) instead of plain text.
    #[arg(long, env = "DOC2TEXT_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "DOC2TEXT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOC2TEXT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the extracted text.
    #[arg(short, long, env = "DOC2TEXT_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum VariantArg {
    Accurate,
    Fast,
}

impl From<VariantArg> for ModelVariant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Accurate => ModelVariant::Accurate,
            VariantArg::Fast => ModelVariant::Fast,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run extraction ───────────────────────────────────────────────────
    let output = extract_file(&cli.input, &config)
        .await
        .context("Extraction failed")?;

    if let Some(ref output_path) = cli.output {
        tokio::fs::write(output_path, &output.text)
            .await
            .with_context(|| format!("Failed to write {}", output_path.display()))?;

        if !cli.quiet {
            eprintln!(
                "{}  {} pages  {} words  {}ms  →  {}",
                green("✔"),
                output.stats.page_count,
                output.stats.word_count,
                output.stats.total_duration_ms,
                bold(&output_path.display().to_string()),
            );
        }
    } else if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.text.as_bytes())
            .context("Failed to write to stdout")?;
        // Ensure a trailing newline on stdout.
        if !output.text.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }

        if !cli.quiet && !show_progress {
            eprintln!(
                "Extracted {} pages ({} words) in {}ms",
                output.stats.page_count, output.stats.word_count, output.stats.total_duration_ms
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .variant(cli.variant.clone().into())
        .det_threshold(cli.det_threshold)
        .rec_threshold(cli.rec_threshold)
        .rotate_pages(!cli.no_rotate)
        .dpi(cli.dpi);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(ref lang) = cli.lang {
        builder = builder.language(lang);
    }
    if let Some(ref dir) = cli.tessdata {
        builder = builder.model_data_dir(dir);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
