use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use orientation_scrape::fetch::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use orientation_scrape::output;
use orientation_scrape::scrape::{run_scrape, RunConfig};

#[derive(Parser)]
#[command(name = "orientation-scrape")]
#[command(about = "Tunisian university orientation guide scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape all specialization detail pages into dataset files
    Scrape {
        /// Id list file (one internal id per line, or a code,url CSV)
        #[arg(long)]
        ids: PathBuf,
        /// Reference CSV of code suffixes excluded from geographic distribution
        #[arg(long)]
        reference: PathBuf,
        /// Output directory for dataset.json / dataset.csv / run_report.json
        #[arg(short, long, default_value = "data")]
        out: PathBuf,
        /// Number of parallel workers
        #[arg(long, default_value_t = 8)]
        workers: usize,
        /// Politeness delay between requests, per worker
        #[arg(long, default_value_t = 500)]
        delay_ms: u64,
        /// Hard timeout for one page fetch
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,
        /// Detail page address, overridable for mirrors
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
        /// Only process the first N ids
        #[arg(long)]
        limit: Option<usize>,
        /// Quiet mode - suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },
    /// Verify a written dataset: encodings agree, codes unique, scores valid
    Verify {
        /// Directory holding dataset.json and dataset.csv
        #[arg(short, long, default_value = "data")]
        data: PathBuf,
    },
    /// Remove generated dataset files
    Clean {
        #[arg(short, long, default_value = "data")]
        out: PathBuf,
    },
}

fn run_clean(out: &Path) -> Result<()> {
    println!("Cleaning generated files...");

    for name in [output::JSON_FILE, output::CSV_FILE, output::REPORT_FILE] {
        let path = out.join(name);
        if path.exists() {
            fs::remove_file(&path)?;
            println!("  Removed {}", path.display());
        }
    }

    println!("Clean complete!");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape {
            ids,
            reference,
            out,
            workers,
            delay_ms,
            timeout_secs,
            base_url,
            limit,
            quiet,
        } => run_scrape(RunConfig {
            ids_path: ids,
            reference_path: reference,
            output_dir: out,
            base_url,
            workers,
            delay_ms,
            timeout_secs,
            limit,
            quiet,
        }),
        Commands::Verify { data } => output::run_verify(&data),
        Commands::Clean { out } => run_clean(&out),
    }
}
