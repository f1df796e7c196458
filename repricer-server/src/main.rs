use std::collections::BTreeMap;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Instant;

use chrono::{Local, NaiveDate, Utc};
use clap::Parser;
use rust_decimal::Decimal;
use serde::Serialize;

use repricer_engine::listing::ListingDateIndex;
use repricer_engine::sales::HistoricalSalesIndex;
use repricer_pipeline::candidate_pipeline::{CandidatePipeline, PipelineResult};
use repricer_pipeline::config::RepricingConfig;
use repricer_pipeline::feed_loader::{
    load_feed_files, load_listing_dates_file, load_order_lines_file,
};
use repricer_pipeline::pipelines::size_repricing::SizeRepricingPipeline;
use repricer_pipeline::types::{
    exclusion_counts, repriced_products, ProductCandidate, RepricedProduct, RepricingRun,
};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "repricer-server")]
#[command(about = "Size-based markdown run over a catalog feed", long_about = None)]
#[command(version)]
struct Cli {
    /// Catalog feed file (CSV, .json or .xml). Repeat to concatenate several feeds.
    #[arg(short, long = "feed", required = true)]
    feeds: Vec<PathBuf>,

    /// Order-line export (CSV: sku, quantity, size)
    #[arg(long)]
    orders: Option<PathBuf>,

    /// Listing-date export (CSV: sku, listing_date)
    #[arg(long = "listing-dates")]
    listing_dates: Option<PathBuf>,

    /// Run date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,

    /// Write the JSON artifact to this file (implies --json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbosity: u8,
}

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct RunJson {
    run_id: String,
    run_date: Option<NaiveDate>,
    generated_at: String,
    pipeline_ms: u128,
    products: Vec<RepricedProduct>,
    summary: SummaryJson,
}

#[derive(Serialize)]
struct SummaryJson {
    records_processed: usize,
    repriced: usize,
    unpriced: usize,
    excluded: usize,
    excluded_by_stage: BTreeMap<String, usize>,
}

fn build_json(result: &PipelineResult<RepricingRun, ProductCandidate>, pipeline_ms: u128) -> RunJson {
    let products = repriced_products(&result.selected_candidates);
    let unpriced = products.iter().filter(|p| p.variant_price.is_none()).count();

    RunJson {
        run_id: result.query.run_id.clone(),
        run_date: result.query.today,
        generated_at: Utc::now().to_rfc3339(),
        pipeline_ms,
        summary: SummaryJson {
            records_processed: result.retrieved_candidates.len(),
            repriced: products.len(),
            unpriced,
            excluded: result.filtered_candidates.len(),
            excluded_by_stage: exclusion_counts(&result.filtered_candidates)
                .into_iter()
                .map(|(stage, count)| (stage.to_string(), count))
                .collect(),
        },
        products,
    }
}

fn write_json<W: Write>(writer: W, run: &RunJson) -> Result<(), Box<dyn Error>> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, run)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

/// Discount fraction as a whole percent, e.g. `0.15` -> `15`.
fn format_percent(rate: Decimal) -> String {
    (rate * Decimal::ONE_HUNDRED).normalize().to_string()
}

fn print_human(result: &PipelineResult<RepricingRun, ProductCandidate>, load_ms: u128, pipeline_ms: u128) {
    let rule = "\u{2500}".repeat(64);
    let run_date = result
        .query
        .today
        .map(|d| d.to_string())
        .unwrap_or_else(|| "unknown".into());

    println!();
    println!("  SIZE REPRICING \u{00b7} run {} \u{00b7} {}", result.query.run_id, run_date);
    println!();
    println!(
        "  {} products read  \u{00b7}  {} re-priced  \u{00b7}  {} excluded",
        result.retrieved_candidates.len(),
        result.selected_candidates.len(),
        result.filtered_candidates.len()
    );
    let breakdown: Vec<String> = exclusion_counts(&result.filtered_candidates)
        .into_iter()
        .map(|(stage, count)| format!("{} {}", stage, count))
        .collect();
    println!("  excluded by: {}", breakdown.join("  \u{00b7}  "));
    println!();

    if result.selected_candidates.is_empty() {
        println!("  No products qualify for a markdown.");
    } else {
        println!("  {}", rule);
        for (i, row) in repriced_products(&result.selected_candidates).iter().enumerate() {
            let price = match row.variant_price {
                Some(price) => format!("{} -> {}", row.current_price, price),
                None => format!("{} -> (unparsable price)", row.current_price),
            };
            let discount = row
                .discount_rate
                .map(|rate| format!("-{}%", format_percent(rate)))
                .unwrap_or_default();
            let inflation = row
                .inflation_ratio
                .map(|ratio| format!("{:.2}", ratio))
                .unwrap_or_default();
            println!(
                "  {:>3}. {:18} {:24} {:>22} {:>5}  inflation {}",
                i + 1,
                row.sku,
                row.name,
                price,
                discount,
                inflation
            );
            println!("       sizes: {}", row.size_stock);
        }
        println!("  {}", rule);
    }

    println!();
    println!(
        "  Files loaded in {}ms \u{00b7} Pipeline ran in {}ms \u{00b7} Total {}ms",
        load_ms,
        pipeline_ms,
        load_ms + pipeline_ms
    );
    println!();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = RepricingConfig::from_env()?;

    let load_start = Instant::now();
    let records = load_feed_files(cli.feeds.as_slice())?;

    let sales = match &cli.orders {
        Some(path) => {
            let lines = load_order_lines_file(path)?;
            let index = HistoricalSalesIndex::from_order_lines(&lines);
            log::info!("indexed {} order lines into {} sku/size keys", lines.len(), index.len());
            index
        }
        None => {
            log::warn!("no order export given, every size counts as never sold");
            HistoricalSalesIndex::default()
        }
    };

    let dates = match &cli.listing_dates {
        Some(path) => load_listing_dates_file(path)?,
        None => Default::default(),
    };
    let listings = ListingDateIndex::build(&dates, records.iter().map(|r| r.sku.as_str()));
    log::info!("listing dates known for {} feed skus", listings.len());
    let load_ms = load_start.elapsed().as_millis();

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let query = RepricingRun::on(format!("reprice-{}", today), today);

    let pipeline_start = Instant::now();
    let pipeline = SizeRepricingPipeline::with_config(records, Arc::new(sales), Arc::new(listings), &config);
    let result = pipeline.execute(query);
    let pipeline_ms = pipeline_start.elapsed().as_millis();

    if let Some(path) = &cli.output {
        let file = File::create(path).map_err(|e| format!("failed to create '{}': {}", path.display(), e))?;
        write_json(file, &build_json(&result, pipeline_ms))?;
        log::info!("wrote {} products to {}", result.selected_candidates.len(), path.display());
    } else if cli.json {
        write_json(io::stdout().lock(), &build_json(&result, pipeline_ms))?;
    } else {
        print_human(&result, load_ms, pipeline_ms);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_feeds_and_flags() {
        let cli = Cli::parse_from([
            "repricer-server",
            "--feed",
            "a.csv",
            "--feed",
            "b.json",
            "--orders",
            "orders.csv",
            "--today",
            "2024-06-15",
            "--json",
        ]);
        assert_eq!(cli.feeds, vec![PathBuf::from("a.csv"), PathBuf::from("b.json")]);
        assert_eq!(cli.orders, Some(PathBuf::from("orders.csv")));
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 6, 15));
        assert!(cli.json);
        assert!(cli.listing_dates.is_none());
    }

    #[test]
    fn feed_is_required() {
        assert!(Cli::try_parse_from(["repricer-server", "--json"]).is_err());
    }

    #[test]
    fn invalid_run_date_is_rejected() {
        assert!(Cli::try_parse_from(["repricer-server", "-f", "a.csv", "--today", "15.06.2024"]).is_err());
    }

    #[test]
    fn percent_formatting() {
        assert_eq!(format_percent(Decimal::new(15, 2)), "15");
        assert_eq!(format_percent(Decimal::new(125, 3)), "12.5");
    }
}
