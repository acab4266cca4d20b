use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use crate::data::filter::FilterParams;
use crate::data::loader::LoadOptions;
use crate::rank::ValueFilters;
use crate::score::{ScoreParams, DEFAULT_WEIGHT};
use crate::session::{RankQuery, Session};
use crate::stats;

// ---------------------------------------------------------------------------
// Argument definitions
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(
    name = "menurank",
    version,
    about = "Rank and explore a food-menu dataset with smoothed ratings"
)]
pub struct Cli {
    /// Source table (.csv or .json).
    #[arg(long, global = true, default_value = "meals.csv")]
    data: PathBuf,

    /// Prices below this are treated as unknown.
    #[arg(long, global = true, default_value_t = 7.0)]
    price_floor: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank meals by smoothed rating score.
    Rank {
        #[command(flatten)]
        score: ScoreArgs,

        /// Keep meals with any of these cuisine tags (repeatable).
        #[arg(long = "cuisine")]
        cuisines: Vec<String>,

        /// Keep meals with any of these diet/feature tags (repeatable).
        #[arg(long = "diet")]
        diets: Vec<String>,

        #[arg(long)]
        min_calories: Option<f64>,
        #[arg(long)]
        max_calories: Option<f64>,

        /// Meals with unknown price always pass the price range.
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Rank meals by value (score per currency unit); needs a known price.
    Value {
        #[command(flatten)]
        score: ScoreArgs,

        /// Keep meals whose smoothed score is at least this.
        #[arg(long)]
        min_score: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        max_calories: Option<f64>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Summary statistics over the raw table (rated and unrated).
    Stats {
        /// Histogram buckets for the rating distribution.
        #[arg(long, default_value_t = 10)]
        bins: usize,

        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },

    /// List the distinct cuisine and diet/feature tags.
    Tags,
}

#[derive(Debug, clap::Args)]
struct ScoreArgs {
    /// Prior belief C in [1, 5]; defaults to the dataset's mean rating.
    #[arg(short = 'C', long)]
    prior: Option<f64>,

    /// Confidence weight m in [1, 2000].
    #[arg(short = 'm', long, default_value_t = DEFAULT_WEIGHT)]
    weight: u32,
}

#[derive(Debug, clap::Args)]
struct OutputArgs {
    /// Show at most this many rows.
    #[arg(long, default_value_t = 20)]
    top: usize,

    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum Format {
    Table,
    Json,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(cli: Cli) -> Result<()> {
    let options = LoadOptions {
        price_floor: cli.price_floor,
    };
    let mut session = Session::open(&cli.data, options)?;

    match cli.command {
        Command::Rank {
            score,
            cuisines,
            diets,
            min_calories,
            max_calories,
            min_price,
            max_price,
            output,
        } => {
            let query = RankQuery {
                score: score_params(&session, &score)?,
                filter: FilterParams {
                    cuisines: cuisines.into_iter().collect(),
                    diets: diets.into_iter().collect(),
                    calories: range(min_calories, max_calories),
                    price: range(min_price, max_price),
                },
            };
            let ranked = session.rank(&query)?;
            let shown = &ranked[..ranked.len().min(output.top)];

            match output.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(shown)?),
                Format::Table if shown.is_empty() => println!("No meals match the filters."),
                Format::Table => {
                    let mut table = new_table(vec![
                        "#", "Meal", "Score", "Rating", "Reviews", "Price", "Calories", "Chef",
                    ]);
                    for (pos, row) in shown.iter().enumerate() {
                        table.add_row(vec![
                            (pos + 1).to_string(),
                            row.meal.name.clone(),
                            format!("{:.3}", row.bayesian_score),
                            format!("{:.2}", row.meal.rating),
                            row.meal.review_count.to_string(),
                            price_cell(row.meal.price),
                            format!("{:.0}", row.meal.calories),
                            row.meal.chef_name.clone(),
                        ]);
                    }
                    println!("{table}");
                    println!("{} of {} meals shown", shown.len(), ranked.len());
                }
            }
        }

        Command::Value {
            score,
            min_score,
            max_price,
            max_calories,
            output,
        } => {
            let query = RankQuery {
                score: score_params(&session, &score)?,
                filter: FilterParams::default(),
            };
            let filters = ValueFilters {
                min_score,
                max_price,
                max_calories,
            };
            let valued = session.value_rank(&query, &filters)?;
            let shown = &valued[..valued.len().min(output.top)];

            match output.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(shown)?),
                Format::Table if shown.is_empty() => {
                    println!("No priced meals match the criteria.")
                }
                Format::Table => {
                    let mut table = new_table(vec![
                        "#", "Meal", "Value", "Score", "Price", "Calories", "Chef",
                    ]);
                    for (pos, row) in shown.iter().enumerate() {
                        table.add_row(vec![
                            (pos + 1).to_string(),
                            row.meal.name.clone(),
                            format!("{:.1}", row.value_score),
                            format!("{:.3}", row.bayesian_score),
                            price_cell(row.meal.price),
                            format!("{:.0}", row.meal.calories),
                            row.meal.chef_name.clone(),
                        ]);
                    }
                    println!("{table}");
                    println!("{} of {} priced meals shown", shown.len(), valued.len());
                }
            }
        }

        Command::Stats { bins, format } => {
            let dataset = session.dataset();
            let summary = stats::summarize(dataset);

            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
                Format::Table => {
                    let mut table = new_table(vec!["Metric", "Value"]);
                    table.add_row(vec!["Total meals".into(), summary.total_meals.to_string()]);
                    table.add_row(vec!["Rated meals".into(), summary.rated_meals.to_string()]);
                    table.add_row(vec![
                        "Mean rating".into(),
                        format!("{:.2}", summary.mean_rating),
                    ]);
                    table.add_row(vec![
                        "Mean reviews".into(),
                        format!("{:.0}", summary.mean_review_count),
                    ]);
                    table.add_row(vec![
                        "Median calories".into(),
                        format!("{:.0}", summary.median_calories),
                    ]);
                    table.add_row(vec![
                        "Mean price".into(),
                        price_cell(summary.mean_price),
                    ]);
                    table.add_row(vec![
                        "Celebrity chefs".into(),
                        summary.celebrity_chef_count.to_string(),
                    ]);
                    table.add_row(vec!["Cuisines".into(), summary.cuisine_count.to_string()]);
                    table.add_row(vec!["Chefs".into(), summary.chef_count.to_string()]);
                    println!("{table}");

                    let ratings: Vec<f64> = dataset.meals.iter().map(|m| m.rating).collect();
                    print_histogram("Rating distribution", &stats::histogram(&ratings, bins));

                    println!("\nMost common cuisines:");
                    for (tag, count) in stats::cuisine_frequency(dataset).iter().take(10) {
                        println!("  {count:>4}  {tag}");
                    }
                }
            }
        }

        Command::Tags => {
            let dataset = session.dataset();
            print_tags("Cuisines", &dataset.cuisines);
            print_tags("Specifications", &dataset.specifications);
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn score_params(session: &Session, args: &ScoreArgs) -> Result<ScoreParams> {
    let params = match args.prior {
        Some(prior) => ScoreParams::new(prior, args.weight)?,
        None => ScoreParams::new(session.default_score_params().prior(), args.weight)?,
    };
    Ok(params)
}

/// A half-open CLI range becomes a fully bounded inclusive one.
fn range(min: Option<f64>, max: Option<f64>) -> Option<(f64, f64)> {
    if min.is_none() && max.is_none() {
        return None;
    }
    Some((min.unwrap_or(0.0), max.unwrap_or(f64::INFINITY)))
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn price_cell(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("${p:.2}"),
        None => "unknown".to_string(),
    }
}

fn print_histogram(title: &str, bins: &[stats::HistogramBin]) {
    if bins.is_empty() {
        return;
    }
    let peak = bins.iter().map(|b| b.count).max().unwrap_or(1).max(1);
    println!("\n{title}:");
    for bin in bins {
        let bar = "#".repeat(bin.count * 40 / peak);
        println!("  {:>5.2} – {:<5.2} |{bar} {}", bin.lo, bin.hi, bin.count);
    }
}

fn print_tags(title: &str, tags: &BTreeSet<String>) {
    println!("{title} ({}):", tags.len());
    for tag in tags {
        println!("  {tag}");
    }
}
