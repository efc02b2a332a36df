use clap::{Parser, Subcommand};
use restaurant_harvest::{
    aggregate_records, harvest_links, normalize_urls, read_link_list, HarvestConfig,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "restaurant-harvest")]
#[command(about = "Harvest restaurant listings into records and a CSV table")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect restaurant links from a paginated listing
    Harvest {
        /// First listing page
        #[arg(long)]
        start_url: String,
        /// Link list file to write
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        max_pages: Option<usize>,
        #[arg(long)]
        settle_delay_ms: Option<u64>,
    },
    /// Visit detail pages and save one JSON record per restaurant
    Normalize {
        /// Link list produced by `harvest`
        #[arg(long, conflicts_with = "url")]
        links: Option<PathBuf>,
        /// Detail page URL (repeatable)
        #[arg(long)]
        url: Vec<String>,
        /// Directory for record files
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        settle_delay_ms: Option<u64>,
    },
    /// Compile saved records into one CSV table
    Aggregate {
        /// Directory of record files
        #[arg(long)]
        input: Option<PathBuf>,
        /// CSV file to write
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = HarvestConfig::load()?;

    match cli.command {
        Commands::Harvest {
            start_url,
            output,
            max_pages,
            settle_delay_ms,
        } => {
            if let Some(max_pages) = max_pages {
                config.crawl.max_pages = max_pages;
            }
            if let Some(delay) = settle_delay_ms {
                config.crawl.settle_delay_ms = delay;
            }
            let output = output.unwrap_or_else(|| PathBuf::from(&config.output.links_file));

            let outcome = harvest_links(&start_url, &config, &output).await?;
            println!(
                "{} unique restaurant links from {} pages written to {}{}",
                outcome.links.len(),
                outcome.pages_visited(),
                output.display(),
                if outcome.truncated { " (stopped early)" } else { "" }
            );
        }
        Commands::Normalize {
            links,
            url,
            out_dir,
            settle_delay_ms,
        } => {
            if let Some(delay) = settle_delay_ms {
                config.crawl.settle_delay_ms = delay;
            }
            let urls = if url.is_empty() {
                let links = links.unwrap_or_else(|| PathBuf::from(&config.output.links_file));
                read_link_list(&links).await?
            } else {
                url
            };
            let out_dir = out_dir.unwrap_or_else(|| PathBuf::from(&config.output.records_dir));

            let report = normalize_urls(&urls, &config, &out_dir).await?;
            println!(
                "{} records saved to {}, {} pages failed",
                report.saved.len(),
                out_dir.display(),
                report.failed.len()
            );
        }
        Commands::Aggregate { input, output } => {
            let input = input.unwrap_or_else(|| PathBuf::from(&config.output.records_dir));
            let output = output.unwrap_or_else(|| PathBuf::from(&config.output.table_file));

            let report = aggregate_records(&input, &output, &config).await?;
            println!(
                "{} records compiled into {} ({} files skipped)",
                report.written,
                output.display(),
                report.skipped
            );
        }
    }

    Ok(())
}
