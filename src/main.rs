//! Vocabulary Scanner
//!
//! Scans a folder of book page images, keeps the study-language words a
//! reader is unlikely to know, and stores a definition for each.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vocab_scanner::config::Config;
use vocab_scanner::db::{create_pool, VocabRepository};
use vocab_scanner::pipeline::PipelineOptions;
use vocab_scanner::report::{export_json, report_rows};
use vocab_scanner::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "vocab-scanner")]
#[command(about = "Collect unfamiliar words and definitions from scanned book pages", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// OCR every page of a book and store new words
    Scan {
        /// Book folder name under BOOKS_DIR
        book: String,

        /// Skip the lexical database tier
        #[arg(long)]
        fast: bool,

        /// Also resolve the most common study-language words
        #[arg(long)]
        include_common: bool,
    },

    /// Write a book's word list as JSON
    Export {
        book: String,

        /// Output file (default: <WORDS_DIR>/<book>_definitions.json)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List books with stored words
    Books,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vocab_scanner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env().context("invalid configuration")?;

    tracing::info!("Starting vocab-scanner v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Scan {
            book,
            fast,
            include_common,
        } => {
            let options = PipelineOptions {
                skip_common: config.scan.skip_common && !include_common,
                fast_mode: config.scan.fast_mode || fast,
            };
            let state = AppState::new(config)
                .await
                .context("failed to initialize")?;

            if !state.ocr().is_available().await {
                anyhow::bail!("OCR engine '{}' is not available", state.ocr().engine_name());
            }

            let report = state
                .book_runner(options)
                .run(&book)
                .await
                .with_context(|| format!("scan of '{}' failed", book))?;

            let (lexicon, extracts) = state.resolver().cache_stats();
            tracing::debug!(?lexicon, ?extracts, "Resolver cache statistics");

            println!(
                "{}: {} pages scanned, {} skipped, {} new words",
                report.book,
                report.pages.len(),
                report.failures.len(),
                report.stored()
            );
        }
        Command::Export { book, output } => {
            let output = output.unwrap_or_else(|| {
                config
                    .paths
                    .words_dir
                    .join(format!("{}_definitions.json", book))
            });
            let pool = create_pool(&config.database.url).await?;

            let records = VocabRepository::new(&pool).list_for_book(&book).await?;
            if records.is_empty() {
                anyhow::bail!("no words stored for '{}'", book);
            }

            let rows = report_rows(&records);
            export_json(&rows, &output)?;
            println!("{} words written to {}", rows.len(), output.display());
        }
        Command::Books => {
            let pool = create_pool(&config.database.url).await?;

            for (book, count) in VocabRepository::new(&pool).books().await? {
                println!("{}\t{}", book, count);
            }
        }
    }

    Ok(())
}
