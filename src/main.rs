use std::{
    fs::File,
    io::{self, prelude::*, BufWriter},
    path::PathBuf,
};

use anyhow::{Context as _, Result};
use clap::Parser;
use gb_opcode_switch::{extract, fetch, write_switch, OnMismatch, Strategy, Table};
use log::{debug, info};

/// Turn the Game Boy opcode table into C `case` blocks, one per opcode.
#[derive(Parser)]
#[command()]
struct Args {
    /// Page to scrape.
    #[arg(long, default_value = fetch::REFERENCE_URL)]
    url: String,

    /// Read the page from a saved HTML file instead of fetching `--url`.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Write the blocks to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Rows to extract: `main`, `cb`, or `<start>.<end>` (inclusive). Can be
    /// passed multiple times; each table's opcodes start again at 0x00.
    #[arg(long, default_value = "main")]
    table: Vec<String>,

    /// How to split a cell into fields: `pattern` or `fixed-offset`.
    #[arg(long, default_value = "pattern")]
    strategy: String,

    /// What to do with a cell that doesn't parse: `abort` or `skip`.
    #[arg(long, default_value = "abort")]
    on_mismatch: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    let strategy: Strategy = args.strategy.parse()?;
    let on_mismatch: OnMismatch = args.on_mismatch.parse()?;
    let mut tables = Vec::with_capacity(args.table.len());
    for t in &args.table {
        let table: Table = t.parse()?;
        tables.push(table);
    }

    let html = match &args.input {
        Some(path) => fetch::read_html(path)?,
        None => fetch::fetch(&args.url)?,
    };
    let grid = fetch::parse(&html);

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    for table in tables {
        debug!("{table:?}: rows {:?}, {strategy:?}", table.rows());
        let records = extract(&grid, table.rows(), strategy)?;
        let summary = write_switch(&mut out, records, on_mismatch)
            .with_context(|| format!("{table:?} table"))?;
        info!(
            "{table:?}: {} opcodes, {} blank, {} skipped",
            summary.written, summary.blank, summary.skipped
        );
    }

    out.flush()?;
    Ok(())
}
