use anyhow::Result;
use clap::Parser;
use prenoms::data::{
    load::{read_csv, DELIMITER},
    clean, write_parquet,
};
use std::{path::PathBuf, time::Instant};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Clean the semicolon-delimited name table once and store it as Parquet,
/// so the dashboard can start from `--table <output>.parquet`.
#[derive(Parser, Debug)]
struct Args {
    /// Source table (`sexe;preusuel;annais;dpt;nombre`)
    #[arg(long, default_value = "merged.csv")]
    input: PathBuf,

    /// Destination Parquet file
    #[arg(long, default_value = "merged.parquet")]
    output: PathBuf,
}

fn main() -> Result<()> {
    fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_target(false)
        .init();

    let args = Args::parse();
    let start = Instant::now();
    info!(input = %args.input.display(), delimiter = %(DELIMITER as char), "reading table");

    let raw = read_csv(&args.input)?;
    let table = clean(&raw)?;
    write_parquet(&table, &args.output)?;

    info!(
        rows = table.len(),
        years = ?table.year_bounds(),
        elapsed = ?start.elapsed(),
        "converted {} → {}",
        args.input.display(),
        args.output.display()
    );
    Ok(())
}
