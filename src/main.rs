use anyhow::{Context, Result};
use clap::Parser;
use feedsift::config::Config;
use feedsift::feed::{build_client, select_adapter, FeedParser};
use feedsift::model::Channel;
use feedsift::util::{strip_control_chars, truncate_to_width};
use std::path::PathBuf;

/// Get the default config file path (~/.config/feedsift/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("feedsift")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(
    name = "feedsift",
    about = "Fetch a feed and print what its source adapter extracts"
)]
struct Args {
    /// Feed URL
    url: String,

    /// Config file (defaults to ~/.config/feedsift/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the parsed channel as JSON
    #[arg(long)]
    json: bool,

    /// Show at most this many items in the text listing
    #[arg(long, value_name = "N")]
    limit: Option<usize>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let Some(adapter) = select_adapter(&args.url, config.selection) else {
        eprintln!("Error: no adapter can handle {}", args.url);
        std::process::exit(2);
    };
    tracing::info!(url = %args.url, adapter = adapter.name(), "Using adapter");

    let client = build_client(&config.fetch).context("Failed to build HTTP client")?;
    let channel = FeedParser::new(adapter)
        .with_item_error_policy(config.on_item_error)
        .parse(&client, &config.fetch)
        .await
        .with_context(|| format!("Failed to parse feed {}", args.url))?;

    if args.json {
        let json = serde_json::to_string_pretty(&channel).context("Failed to serialize channel")?;
        println!("{json}");
    } else {
        print_channel(&channel, args.limit);
    }

    Ok(())
}

/// Title column width in the text listing.
const TITLE_COLUMNS: usize = 72;

fn print_channel(channel: &Channel, limit: Option<usize>) {
    println!("{}", strip_control_chars(&channel.title));
    println!("  link:    {}", strip_control_chars(channel.link.as_str()));
    if let Some(site) = &channel.site {
        println!("  site:    {}", strip_control_chars(site.as_str()));
    }
    println!("  updated: {}", channel.updated.format("%Y-%m-%d %H:%M:%S"));
    println!("  items:   {}", channel.items.len());
    println!();

    let shown = limit.unwrap_or(channel.items.len());
    for item in channel.items.iter().take(shown) {
        let title = strip_control_chars(&item.title);
        println!(
            "{}  {}",
            item.published.format("%Y-%m-%d %H:%M"),
            truncate_to_width(&title, TITLE_COLUMNS)
        );
        if let Some(thumb) = &item.thumb_url {
            println!("    thumb: {}", strip_control_chars(thumb.as_str()));
        }
        if let Some(media) = item.nablog() {
            println!(
                "    {} | {} | {} | {}",
                strip_control_chars(&media.size),
                strip_control_chars(&media.duration),
                strip_control_chars(&media.video),
                strip_control_chars(&media.audio)
            );
        }
    }

    if shown < channel.items.len() {
        println!("... {} more", channel.items.len() - shown);
    }
}
