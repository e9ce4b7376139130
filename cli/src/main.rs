mod report;
mod tui;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::Parser;
use drinklog_core::{parse_draft, parse_human_date, Config, DrinkField, Scope};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "drinklog")]
#[command(about = "Keep a diary of every bubble tea you buy", long_about = None)]
struct Cli {
    /// Directory holding the drink log (default: ~/.drinklog)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log a drink (usage: add 50嵐 四季春 sweet:無糖 ice:去冰 price:35 date:yesterday)
    Add {
        /// Shop, item and key:value details
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Delete a drink by id (a unique prefix is enough)
    Remove { id: String },
    /// List the drinks of one day
    Day { date: Option<String> },
    /// Show a month calendar with totals
    Month {
        /// YYYY-MM
        period: Option<String>,
    },
    /// List every drink of a month or a year, newest first
    Detail {
        #[arg(value_parser = ["month", "year"])]
        scope: String,
        /// YYYY-MM or YYYY
        period: Option<String>,
    },
    /// Rank shops or items by how often they were bought
    Rank { field: String },
    /// List known shops, or remember a new one with --add
    Shops {
        #[arg(long)]
        add: Option<String>,
    },
    /// Open the calendar TUI
    Tui,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("drinklog=warn,drinklog_core=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parses `YYYY-MM`, falling back to the month of `today`.
fn parse_period(period: Option<&str>, today: NaiveDate) -> Result<(i32, u32)> {
    let Some(raw) = period else {
        return Ok((today.year(), today.month()));
    };
    let (year, month) = raw
        .split_once('-')
        .ok_or_else(|| anyhow!("Expected YYYY-MM, got '{}'", raw))?;
    let year: i32 = year.parse().map_err(|_| anyhow!("Invalid year in '{}'", raw))?;
    let month: u32 = month.parse().map_err(|_| anyhow!("Invalid month in '{}'", raw))?;
    if !(1..=12).contains(&month) {
        bail!("Month must be 1-12, got {}", month);
    }
    if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
        bail!("Year {} is outside the supported calendar", year);
    }
    Ok((year, month))
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::resolve(cli.data_dir)?;
    let mut service = drinklog_core::open(&config)?;
    let today = Local::now().date_naive();

    match cli.command {
        Some(Commands::Add { args }) => {
            let parsed = parse_draft(&args, today)?;
            if !parsed.draft.is_complete() {
                println!("Error: shop and item are required.");
                return Ok(());
            }

            let date = parsed.date.unwrap_or(today);
            if let Some(warning) = service.sugar_warning(&parsed.draft, date) {
                println!("{}", warning);
            }
            if let Some(record) = service.add(parsed.draft, Some(date))? {
                println!("Drink added: {} {} (ID: {})", record.shop, record.item, record.id);
                println!("  Date: {}", drinklog_core::encode(record.date));
                println!("  {} / {}  ${}", record.sweetness, record.ice, record.price);
                let count = service.records_on(date).len();
                if count > 1 {
                    println!("  Dose {} today", count);
                }
            }
        }
        Some(Commands::Remove { id }) => {
            let id = service.resolve_id(&id)?;
            if service.remove(&id)? {
                println!("Drink {} removed.", id);
            } else {
                println!("No drink with ID {}.", id);
            }
        }
        Some(Commands::Day { date }) => {
            let date = match date {
                Some(d) => parse_human_date(&d, today)?,
                None => today,
            };
            report::show_day(date, &service.records_on(date));
        }
        Some(Commands::Month { period }) => {
            let (year, month) = parse_period(period.as_deref(), today)?;
            report::show_month(&service.calendar(year, month), &service.stats(year, month), today);
            report::show_favorites(&service.favorite(DrinkField::Shop), &service.favorite(DrinkField::Item));
        }
        Some(Commands::Detail { scope, period }) => {
            let scope = if scope == "year" {
                let year = match period {
                    Some(p) => p.parse().map_err(|_| anyhow!("Invalid year '{}'", p))?,
                    None => today.year(),
                };
                Scope::Year(year)
            } else {
                let (year, month) = parse_period(period.as_deref(), today)?;
                Scope::Month { year, month }
            };
            report::show_summary(&service.summarize(scope));
        }
        Some(Commands::Rank { field }) => {
            let field: DrinkField = field.parse()?;
            report::show_ranking(field, &service.ranking(field));
        }
        Some(Commands::Shops { add }) => {
            if let Some(name) = add.filter(|n| !n.is_empty()) {
                if service.register_shop(&name)? {
                    println!("Shop {} added.", name);
                } else {
                    println!("Shop {} is already known.", name);
                }
            }
            for (i, shop) in service.shops().iter().enumerate() {
                println!("{:>3}. {}", i + 1, shop);
            }
        }
        Some(Commands::Tui) | None => {
            tui::run(service)?;
        }
    }
    Ok(())
}
