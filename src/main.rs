//! Markdown Desk - A lightweight Markdown editor with preview and export
//!
//! Entry point for the application. Handles CLI argument parsing,
//! logging initialization, and dispatching actions to the app.

mod app;
mod clipboard;
mod config;
mod error;
mod file_handler;
mod markdown;
mod message;
mod pdf;
mod state;
mod utils;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use clipboard::SystemClipboard;
use config::Config;
use message::{Message, Notification};
use state::FileStorage;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "markdown-desk")]
#[command(version)]
#[command(about = "Edit Markdown, preview it as HTML, copy it, export it to PDF", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE", env = "MARKDOWN_DESK_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the persisted document
    #[arg(long, global = true, value_name = "DIR", env = "MARKDOWN_DESK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current document
    Show,

    /// Replace the document with a file, or stdin when FILE is omitted or `-`
    Edit {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Restore the default document
    Reset,

    /// Render the preview as HTML
    Preview {
        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Produce a complete HTML page instead of a fragment
        #[arg(short, long)]
        standalone: bool,
    },

    /// Copy the rendered preview to the clipboard (HTML and plain text)
    Copy,

    /// Export the document to PDF
    Export {
        /// Output file (defaults to markdown-export.pdf)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Live preview: re-render the preview whenever FILE changes
    Watch {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Preview page to keep up to date (defaults to FILE with .html)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print line, word and PDF page counts
    Stats,
}

fn main() {
    init_logging();

    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Initialize the logging system
fn init_logging() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,markdown_desk=debug"),
    )
    .format_timestamp_millis()
    .init();
}

/// Run the requested command; `Ok(false)` means the action failed and was reported
fn run() -> Result<bool> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let storage = match cli.data_dir {
        Some(dir) => FileStorage::new(dir),
        None => FileStorage::open_default()?,
    };
    log::debug!("Document storage in {}", storage.dir().display());

    let mut app = App::new(config, storage, SystemClipboard::new());

    let notification = match cli.command {
        Command::Show => {
            println!("{}", app.content());
            return Ok(true);
        }
        Command::Stats => {
            let stats = app.stats();
            println!("lines: {}", stats.lines);
            println!("words: {}", stats.words);
            println!("pdf pages: {}", stats.pdf_pages);
            return Ok(true);
        }
        Command::Preview {
            output: None,
            standalone,
        } => {
            print!("{}", app.preview_html(standalone));
            return Ok(true);
        }
        Command::Preview {
            output: Some(path),
            standalone,
        } => app.update(Message::SavePreview { path, standalone }),
        Command::Edit { file } => {
            let text = read_input(file)?;
            app.update(Message::Edit(text))
        }
        Command::Reset => app.update(Message::Reset),
        Command::Copy => app.update(Message::Copy),
        Command::Export { output } => app.update(Message::Export(output)),
        Command::Watch { file, output } => {
            let output = output
                .unwrap_or_else(|| markdown::HtmlDocumentExporter::suggest_output_path(&file));
            println!(
                "Watching {} -> {} (Ctrl+C to stop)",
                file.display(),
                output.display()
            );
            app.run_live_preview(&file, &output, || true)?;
            return Ok(true);
        }
    };

    Ok(report(&notification))
}

/// Read editor input from a file or stdin
fn read_input(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            let read = file_handler::read_file(&path)
                .with_context(|| format!("could not read {}", path.display()))?;
            Ok(read.content)
        }
        _ => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut bytes)
                .context("could not read stdin")?;
            Ok(file_handler::decode_content(&bytes).content)
        }
    }
}

/// Show a notification; returns whether it reports success
fn report(notification: &Notification) -> bool {
    if notification.is_error() {
        eprintln!("{}", notification);
        false
    } else {
        println!("{}", notification);
        true
    }
}
