//! Term Projection CLI
//!
//! Command-line interface for projecting term life model points

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use term_projection::{
    policy::load_model_points, Assumptions, BlockRunner, BlockSummary, ProjectionResult, Projector,
};

#[derive(Parser)]
#[command(name = "term_projection", version, about = "Term life cashflow projection")]
struct Cli {
    /// Path to the model point CSV file
    #[arg(long, default_value = "data/model_points.csv")]
    model_points: PathBuf,

    /// Directory with assumption CSV files; synthetic defaults when omitted
    #[arg(long)]
    assumptions: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Project a single model point and print its result tables
    Point {
        /// Model point id to project
        #[arg(long)]
        id: u32,

        /// Write the monthly cashflow table to this CSV file
        #[arg(long)]
        cashflow_csv: Option<PathBuf>,

        /// Write the monthly decrement table to this CSV file
        #[arg(long)]
        decrements_csv: Option<PathBuf>,

        /// Write the full projection result to this JSON file
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Project every model point and print block totals
    Block {
        /// Write per-point present values to this CSV file
        #[arg(long)]
        summary_csv: Option<PathBuf>,
    },
}

/// Per-point present value row for the block summary CSV
#[derive(Serialize)]
struct PvRow {
    point_id: u32,
    months: u32,
    pv_premiums: f64,
    pv_claims: f64,
    pv_expenses: f64,
    pv_commissions: f64,
    pv_net_cf: f64,
    pv_consistent: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let store = load_model_points(&cli.model_points)
        .with_context(|| format!("loading model points from {}", cli.model_points.display()))?;

    let assumptions = match &cli.assumptions {
        Some(dir) => Assumptions::from_csv_path(dir)
            .with_context(|| format!("loading assumptions from {}", dir.display()))?,
        None => Assumptions::default_pricing(),
    };

    match cli.command {
        Command::Point {
            id,
            cashflow_csv,
            decrements_csv,
            json,
        } => {
            let mut projector = Projector::new(store, assumptions);
            projector.select(id)?;
            let result = projector.project()?;

            print_point_result(&result);

            if let Some(path) = cashflow_csv {
                write_csv(&path, &result.cashflow)?;
                println!("\nCashflow table written to: {}", path.display());
            }
            if let Some(path) = decrements_csv {
                write_csv(&path, &result.decrements)?;
                println!("Decrement table written to: {}", path.display());
            }
            if let Some(path) = json {
                let file = std::fs::File::create(&path)
                    .with_context(|| format!("creating {}", path.display()))?;
                serde_json::to_writer_pretty(file, &result)?;
                println!("Full result written to: {}", path.display());
            }
        }

        Command::Block { summary_csv } => {
            let runner = BlockRunner::new(assumptions);
            let results = runner.run_block(&store)?;
            let summary = BlockSummary::from_results(&results);

            print_block_summary(&summary);

            if let Some(path) = summary_csv {
                let rows: Vec<PvRow> = results
                    .iter()
                    .map(|r| PvRow {
                        point_id: r.point_id,
                        months: r.months(),
                        pv_premiums: r.present_value.premiums,
                        pv_claims: r.present_value.claims,
                        pv_expenses: r.present_value.expenses,
                        pv_commissions: r.present_value.commissions,
                        pv_net_cf: r.present_value.net_cf,
                        pv_consistent: r.pv_consistent,
                    })
                    .collect();
                write_csv(&path, &rows)?;
                println!("\nPer-point summary written to: {}", path.display());
            }
        }
    }

    Ok(())
}

fn print_point_result(result: &ProjectionResult) {
    println!("Model point {} ({} months)", result.point_id, result.months());
    println!(
        "{:>5} {:>14} {:>14} {:>12} {:>14} {:>14}",
        "Month", "Premiums", "Claims", "Expenses", "Commissions", "Net CF"
    );
    println!("{}", "-".repeat(78));

    for row in result.cashflow.iter().take(24) {
        println!(
            "{:>5} {:>14.2} {:>14.2} {:>12.2} {:>14.2} {:>14.2}",
            row.month, row.premiums, row.claims, row.expenses, row.commissions, row.net_cf
        );
    }
    if result.cashflow.len() > 24 {
        println!("... ({} more months)", result.cashflow.len() - 24);
    }

    let pv = result.present_value;
    println!("\nPresent values:");
    println!("  Premiums:    {:>16.2}", pv.premiums);
    println!("  Claims:      {:>16.2}", pv.claims);
    println!("  Expenses:    {:>16.2}", pv.expenses);
    println!("  Commissions: {:>16.2}", pv.commissions);
    println!("  Net CF:      {:>16.2}", pv.net_cf);
    println!(
        "  Reconciliation: {}",
        if result.pv_consistent { "OK" } else { "FAILED" }
    );
}

fn print_block_summary(summary: &BlockSummary) {
    println!("Block of {} model points", summary.points);
    println!("  PV Premiums:    {:>18.2}", summary.pv_premiums);
    println!("  PV Claims:      {:>18.2}", summary.pv_claims);
    println!("  PV Expenses:    {:>18.2}", summary.pv_expenses);
    println!("  PV Commissions: {:>18.2}", summary.pv_commissions);
    println!("  PV Net CF:      {:>18.2}", summary.pv_net_cf);
    println!(
        "  Reconciliation: {}",
        if summary.all_consistent { "OK" } else { "FAILED" }
    );
}

fn write_csv<T: Serialize>(path: &PathBuf, rows: &[T]) -> anyhow::Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
