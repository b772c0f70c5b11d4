//! Kiji CLI
//!
//! Local entry point for parsing, rendering and uploading articles.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kiji::{
    error::{AppError, Result},
    models::{Config, Language},
    pipeline,
    render::{ArticleRenderer, DisplayMode, PageSession},
    services::{ArticleExtractor, table_of_contents},
    storage::LocalStore,
};
use tokio::io::AsyncWriteExt;

/// Kiji - bilingual article portal core
#[derive(Parser, Debug)]
#[command(name = "kiji", version, about = "Parse, isolate and serve uploaded HTML articles")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "kiji.toml")]
    config: PathBuf,

    /// Override the articles directory from the configuration
    #[arg(short, long)]
    articles_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every article, newest first
    List,

    /// Show one article record as JSON
    Show { slug: String },

    /// Render an article fragment for a host page
    Render {
        slug: String,

        /// namespaced or raw
        #[arg(long, default_value_t = DisplayMode::Namespaced)]
        mode: DisplayMode,

        /// ja or en (default: renderer.default_language)
        #[arg(long)]
        lang: Option<Language>,
    },

    /// Write the stored HTML to stdout unchanged
    Raw { slug: String },

    /// Validate and store a new article file
    Upload {
        file: PathBuf,

        /// Validate only; do not store
        #[arg(long)]
        dry_run: bool,
    },

    /// List stored files, most recently modified first
    Uploads,

    /// Print an article's table of contents
    Toc { slug: String },

    /// Validate configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    if let Some(dir) = cli.articles_dir {
        config.paths.articles_dir = dir;
    }
    log::debug!("Articles directory: {}", config.paths.articles_dir.display());

    let store = LocalStore::new(&config.paths.articles_dir);
    let extractor = ArticleExtractor::new(&config.site);

    match cli.command {
        Command::List => {
            let articles = pipeline::parse_directory(&store, &extractor).await?;
            let summaries: Vec<serde_json::Value> = articles
                .iter()
                .map(|a| {
                    serde_json::json!({
                        "slug": a.slug,
                        "title": a.title,
                        "publishedAt": a.published_at,
                        "category": a.category,
                        "contentLanguages": a.content_languages,
                        "primaryTechTags": a.primary_tech_tags,
                    })
                })
                .collect();
            print_json(&summaries)?;
        }

        Command::Show { slug } => {
            let article = pipeline::load_article(&store, &extractor, &slug).await?;
            print_json(&article)?;
        }

        Command::Render { slug, mode, lang } => {
            let article = pipeline::load_article(&store, &extractor, &slug).await?;
            let language = lang.unwrap_or(config.renderer.default_language);
            let renderer = ArticleRenderer::new(&config);
            let html = renderer.render(&article, mode, language, &mut PageSession::new());
            println!("{html}");
        }

        Command::Raw { slug } => {
            let raw = pipeline::load_raw(&store, &slug).await?;
            for (name, value) in raw.headers {
                log::debug!("{name}: {value}");
            }
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&raw.bytes).await?;
            stdout.flush().await?;
        }

        Command::Upload { file, dry_run } => {
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| AppError::validation(format!("not a file: {}", file.display())))?;
            let bytes = tokio::fs::read(&file).await?;

            match pipeline::run_upload(&store, &config, &file_name, &bytes, dry_run).await {
                Ok(receipt) => print_json(&receipt)?,
                Err(e) => {
                    log::error!("Upload of {file_name} failed: {e}");
                    return Err(e);
                }
            }
        }

        Command::Uploads => {
            let uploads = pipeline::list_uploads(&store, &config.site).await?;
            print_json(&uploads)?;
        }

        Command::Toc { slug } => {
            let article = pipeline::load_article(&store, &extractor, &slug).await?;
            for entry in table_of_contents(&article.content) {
                let indent = "  ".repeat(usize::from(entry.level.saturating_sub(1)));
                println!("{indent}{} (#{})", entry.text, entry.id);
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::debug!("Effective configuration:\n{}", config.to_toml()?);
            log::info!("Config OK");
        }
    }

    Ok(())
}
