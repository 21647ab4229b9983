use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use svgstorm::{
    CardSummary, CatalogConfig, CatalogLoader, CatalogSession, DetailFetcher, IconApi,
    SnippetOptions, component_snippet, detail_subtitle, html_snippet,
};
use svgstorm_core::logging::targets;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "SVGSTORM_LOG";

#[derive(Parser, Debug)]
#[command(name = "svgstorm", version)]
#[command(about = "Browse the SVGStorm icon catalog")]
struct Cli {
    /// API base URL (overrides config file and SVGSTORM_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List icons, optionally filtered by a search query
    List {
        /// Case-insensitive search over name, category, tags and description
        #[arg(short, long)]
        query: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one icon and its SVG markup
    Show {
        /// Icon name
        name: String,
        /// Print a component usage snippet instead of the markup
        #[arg(long, conflicts_with = "html")]
        snippet: bool,
        /// Print the markup with currentColor strokes replaced
        #[arg(long)]
        html: bool,
        /// Color used by --snippet and --html
        #[arg(long, default_value = svgstorm::snippet::DEFAULT_COLOR)]
        color: String,
        /// Size used by --snippet
        #[arg(long, default_value_t = svgstorm::snippet::DEFAULT_SIZE)]
        size: u32,
    },
    /// Print catalog totals
    Stats {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Check whether the API is healthy
    Health,
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "svgstorm=info,svgstorm_net=info,svgstorm_core=info",
            2 => "svgstorm=debug,svgstorm_net=debug,svgstorm_core=debug",
            _ => "trace",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<CatalogConfig> {
    let mut config = CatalogConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(ref url) = cli.api_url {
        config.api_base = url.clone();
    }
    if let Some(secs) = cli.timeout {
        config.request_timeout = Duration::from_secs(secs);
    }
    config.validate()?;
    tracing::debug!(target: targets::CONFIG, ?config, "configuration resolved");
    Ok(config)
}

async fn list(config: &CatalogConfig, query: Option<&str>, json: bool) -> Result<()> {
    let session = CatalogSession::new(config)?;
    if let Err(err) = session.load().await {
        bail!(err.user_message());
    }
    if let Some(query) = query {
        session.search(query);
    }

    let icons = session.filtered();
    if json {
        println!("{}", serde_json::to_string_pretty(&icons)?);
        return Ok(());
    }

    if icons.is_empty() {
        println!("No icons found");
        return Ok(());
    }

    for icon in &icons {
        let card = CardSummary::new(icon);
        let mut tags = card.visible_tags.join(", ");
        if let Some(more) = card.overflow_label() {
            tags.push_str(&format!(" {more}"));
        }
        println!(
            "{:<24} {:<16} {}",
            card.name,
            card.category.as_deref().unwrap_or("-"),
            tags
        );
    }
    Ok(())
}

async fn show(config: &CatalogConfig, name: &str, mode: ShowMode, options: SnippetOptions) -> Result<()> {
    let fetcher = DetailFetcher::new(IconApi::new(config)?);
    let detail = fetcher
        .try_fetch(name)
        .await
        .with_context(|| format!("icon '{name}' is not available"))?;

    match mode {
        ShowMode::Snippet => println!("{}", component_snippet(detail.name(), &options)),
        ShowMode::Html => println!("{}", html_snippet(&detail.svg_markup, &options.color)),
        ShowMode::Details => {
            println!("{}", detail.name());
            println!("{}", detail_subtitle(&detail.icon));
            if let Some(ref description) = detail.icon.description {
                println!("{description}");
            }
            if !detail.icon.tags.is_empty() {
                println!("tags: {}", detail.icon.tags.join(", "));
            }
            println!();
            println!("{}", detail.svg_markup);
        }
    }
    Ok(())
}

async fn stats(config: &CatalogConfig, json: bool) -> Result<()> {
    let loader = CatalogLoader::new(IconApi::new(config)?);
    let catalog = match loader.load().await {
        Ok(catalog) => catalog,
        Err(err) => bail!(err.user_message()),
    };

    let stats = catalog.stats();
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("icons:      {}", stats.total_icons);
        println!("categories: {}", stats.categories);
        println!("tags:       {}", stats.tags);
    }
    Ok(())
}

async fn health(config: &CatalogConfig) -> Result<()> {
    let api = IconApi::new(config)?;
    if api.health_check().await {
        println!("{} is healthy", api.base_url());
        Ok(())
    } else {
        bail!("{} is not healthy", api.base_url())
    }
}

#[derive(Clone, Copy, Debug)]
enum ShowMode {
    Details,
    Snippet,
    Html,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::List { ref query, json } => list(&config, query.as_deref(), json).await,
        Commands::Show {
            ref name,
            snippet,
            html,
            ref color,
            size,
        } => {
            let mode = if snippet {
                ShowMode::Snippet
            } else if html {
                ShowMode::Html
            } else {
                ShowMode::Details
            };
            let options = SnippetOptions {
                size,
                color: color.clone(),
            };
            show(&config, name, mode, options).await
        }
        Commands::Stats { json } => stats(&config, json).await,
        Commands::Health => health(&config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_show() {
        let cli = Cli::parse_from(["svgstorm", "--api-url", "http://localhost:4000", "show", "sun", "--snippet"]);
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:4000"));
        match cli.command {
            Commands::Show { name, snippet, size, color, .. } => {
                assert_eq!(name, "sun");
                assert!(snippet);
                assert_eq!(size, 24);
                assert_eq!(color, "#3B82F6");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_snippet_conflicts_with_html() {
        assert!(Cli::try_parse_from(["svgstorm", "show", "sun", "--snippet", "--html"]).is_err());
    }

    #[test]
    fn test_verbosity_and_global_flags() {
        let cli = Cli::parse_from(["svgstorm", "list", "-q", "moon", "-vv", "--timeout", "5"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.timeout, Some(5));
        assert!(matches!(cli.command, Commands::List { ref query, json: false } if query.as_deref() == Some("moon")));
    }
}
