//! `clinic` CLI — check availability, enumerate free slots, and price
//! treatment plans from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # List free 30-minute slots in a range, appointments piped via stdin
//! clinic slots --from "2025-12-13 09:00:00" --to "2025-12-13 12:00:00" < appointments.json
//!
//! # Check one proposed interval against booked appointments
//! clinic check -i appointments.json --start "2025-12-13 10:00:00" --end "2025-12-13 11:00:00"
//!
//! # Price a treatment plan with the stock rule
//! clinic price -i items.json
//!
//! # Price with a custom rule chain and show the audited breakdown
//! clinic price -i items.json --rules rules.json --breakdown
//!
//! # Show that the rule engine reproduces the legacy billing formula
//! clinic compare
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::io::{self, Read};
use std::process;

use clinic_engine::ingest::{self, RawInterval};
use clinic_engine::pricing::BoxedRule;
use clinic_engine::{
    find_available_slots, is_available, BulkDiscount, FixedAmountDiscount, LineItem,
    PricingEngine, QuantityDiscount, TimeInterval,
};

#[derive(Parser)]
#[command(
    name = "clinic",
    version,
    about = "Clinic appointment scheduling and pricing toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List free fixed-length slots within a time range
    Slots {
        /// Booked appointments JSON (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Range start (RFC 3339 or "YYYY-MM-DD HH:MM:SS")
        #[arg(long)]
        from: String,
        /// Range end (same formats as --from)
        #[arg(long)]
        to: String,
        /// Slot length in minutes
        #[arg(long, default_value_t = 30)]
        duration: u32,
        /// IANA timezone used to resolve naive timestamps
        #[arg(long, default_value = "UTC")]
        timezone: String,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Check whether a proposed interval is free of conflicts
    Check {
        /// Booked appointments JSON (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Proposed start (RFC 3339 or "YYYY-MM-DD HH:MM:SS")
        #[arg(long)]
        start: String,
        /// Proposed end (same formats as --start)
        #[arg(long)]
        end: String,
        /// IANA timezone used to resolve naive timestamps
        #[arg(long, default_value = "UTC")]
        timezone: String,
    },
    /// Price a treatment plan through the discount rule chain
    Price {
        /// Line items JSON (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Rule chain JSON file (defaults to the stock bulk rule)
        #[arg(long)]
        rules: Option<String>,
        /// Print the audited breakdown instead of just the total
        #[arg(long)]
        breakdown: bool,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Compare the rule engine against the legacy billing formula
    Compare,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Slots {
            input,
            from,
            to,
            duration,
            timezone,
            output,
        } => {
            let tz = ingest::resolve_timezone(&timezone)?;
            let existing = read_appointments(input.as_deref(), tz)?;
            let range_start = ingest::parse_timestamp(&from, tz)?;
            let range_end = ingest::parse_timestamp(&to, tz)?;

            let slots = find_available_slots(&existing, range_start, range_end, duration)?;

            let pretty = serde_json::to_string_pretty(&slots)?;
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Check {
            input,
            start,
            end,
            timezone,
        } => {
            let tz = ingest::resolve_timezone(&timezone)?;
            let existing = read_appointments(input.as_deref(), tz)?;
            let proposed = TimeInterval::new(
                ingest::parse_timestamp(&start, tz)?,
                ingest::parse_timestamp(&end, tz)?,
            );

            let available = is_available(&existing, proposed);

            println!("{}", serde_json::json!({ "available": available }));
            if !available {
                // Nonzero exit so shell callers can branch on the verdict.
                process::exit(1);
            }
        }
        Commands::Price {
            input,
            rules,
            breakdown,
            output,
        } => {
            let items = read_line_items(input.as_deref())?;
            let engine = load_engine(rules.as_deref())?;

            let rendered = if breakdown {
                let mut audit = engine.breakdown(&items)?;
                audit.subtotal = money(audit.subtotal);
                audit.total = money(audit.total);
                for discount in &mut audit.discounts {
                    discount.amount = money(discount.amount);
                }
                serde_json::to_string_pretty(&audit)?
            } else {
                let total = money(engine.calculate_total(&items)?);
                serde_json::json!({ "total": total }).to_string()
            };

            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Compare => run_comparison()?,
    }

    Ok(())
}

/// One entry in a `--rules` file. File order is chain order, and chain order
/// is financially significant: each rule sees the previous rule's output.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum RuleConfig {
    Bulk { minimum: Decimal, percent: Decimal },
    FixedAmount { minimum: Decimal, amount: Decimal },
    Quantity { minimum_qty: u32, percent: Decimal },
}

impl RuleConfig {
    fn build(&self) -> BoxedRule {
        match *self {
            RuleConfig::Bulk { minimum, percent } => Box::new(BulkDiscount::new(minimum, percent)),
            RuleConfig::FixedAmount { minimum, amount } => {
                Box::new(FixedAmountDiscount::new(minimum, amount))
            }
            RuleConfig::Quantity {
                minimum_qty,
                percent,
            } => Box::new(QuantityDiscount::new(minimum_qty, percent)),
        }
    }
}

/// Build the pricing engine from a rules file, or fall back to the stock
/// configuration.
fn load_engine(path: Option<&str>) -> Result<PricingEngine> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read rules file: {}", path))?;
            let configs: Vec<RuleConfig> = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse rules file: {}", path))?;
            Ok(PricingEngine::new(
                configs.iter().map(RuleConfig::build).collect(),
            ))
        }
        None => Ok(PricingEngine::default()),
    }
}

fn read_appointments(path: Option<&str>, tz: chrono_tz::Tz) -> Result<Vec<TimeInterval>> {
    let raw = read_input(path)?;
    let rows: Vec<RawInterval> =
        serde_json::from_str(&raw).context("Failed to parse appointments JSON")?;
    Ok(ingest::resolve_intervals(&rows, tz)?)
}

fn read_line_items(path: Option<&str>) -> Result<Vec<LineItem>> {
    let raw = read_input(path)?;
    let values: Vec<serde_json::Value> =
        serde_json::from_str(&raw).context("Failed to parse line items JSON")?;
    Ok(ingest::line_items_from_json(&values)?)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

/// Round to cents with a fixed two-digit scale, so totals render as
/// "570.00" rather than "570".
fn money(value: Decimal) -> Decimal {
    let mut value = value.round_dp(2);
    value.rescale(2);
    value
}

/// The inline formula the rule engine replaced: sum the lines, then 5% off
/// when the total is over 500.
fn legacy_total(items: &[LineItem]) -> Decimal {
    let mut total: Decimal = items
        .iter()
        .map(|item| item.price * Decimal::from(item.qty))
        .sum();

    if total > dec!(500) {
        total -= total * dec!(5) / dec!(100);
    }

    total
}

/// Run the legacy formula and the configured engine over the same scenarios
/// and report agreement per case.
fn run_comparison() -> Result<()> {
    struct Scenario {
        name: &'static str,
        items: Vec<LineItem>,
        expected: Decimal,
    }

    let scenarios = vec![
        Scenario {
            name: "Small purchase (no discount)",
            items: vec![LineItem::new(dec!(100), 2), LineItem::new(dec!(50), 1)],
            expected: dec!(250),
        },
        Scenario {
            name: "Exactly 500 (threshold is strict, no discount)",
            items: vec![LineItem::new(dec!(250), 2)],
            expected: dec!(500),
        },
        Scenario {
            name: "Large purchase (5% discount)",
            items: vec![LineItem::new(dec!(300), 2)],
            expected: dec!(570),
        },
        Scenario {
            name: "Very large purchase",
            items: vec![LineItem::new(dec!(500), 3)],
            expected: dec!(1425),
        },
        Scenario {
            name: "Multiple treatments",
            items: vec![
                LineItem::new(dec!(200), 2),
                LineItem::new(dec!(150), 1),
                LineItem::new(dec!(75), 2),
            ],
            expected: dec!(665),
        },
    ];

    let engine = PricingEngine::default();
    let mut mismatches = 0;

    for scenario in &scenarios {
        let legacy = money(legacy_total(&scenario.items));
        let modern = money(engine.calculate_total(&scenario.items)?);
        let expected = money(scenario.expected);

        println!("Scenario: {}", scenario.name);
        println!("  legacy:   {}", legacy);
        println!("  engine:   {}", modern);
        println!("  expected: {}", expected);

        if legacy == modern && modern == expected {
            println!("  ok: engine matches legacy");
        } else {
            println!("  MISMATCH");
            mismatches += 1;
        }
        println!();
    }

    if mismatches > 0 {
        anyhow::bail!("{} scenario(s) diverged from the legacy formula", mismatches);
    }

    println!("All {} scenarios agree with the legacy formula.", scenarios.len());
    Ok(())
}
