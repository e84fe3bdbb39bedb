//! `marcdiff` command-line tool: view MARC files and compare them.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use marcdiff::display::{render_diff, render_leader_details, render_record};
use marcdiff::format::{decode_file, read_file};
use marcdiff::parallel::{decode_pair, diff_sequences_parallel};
use marcdiff::{
    comparison_label, diff, record_label, Decoder, MarcRecord, RecordDiff, RecoveryMode,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "marcdiff",
    version,
    about = "View MARC21 binary files and compare records field by field"
)]
struct Cli {
    /// Log decode details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Fail on the first malformed record instead of skipping it
    #[arg(long, global = true)]
    strict: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the records in a file and print one of them
    View {
        /// MARC file (.mrc or .marc)
        file: PathBuf,
        /// Record to print (1-based); defaults to the first
        #[arg(long)]
        record: Option<usize>,
        /// Print the leader positions with their meanings
        #[arg(long)]
        leader: bool,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Compare two files record by record
    Diff {
        /// Left-hand MARC file
        left: PathBuf,
        /// Right-hand MARC file
        right: PathBuf,
        /// Compare only this record position (1-based)
        #[arg(long)]
        record: Option<usize>,
        /// Leave unchanged fields out of the output
        #[arg(long)]
        hide_unchanged: bool,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mode = if cli.strict {
        RecoveryMode::Strict
    } else {
        RecoveryMode::Lenient
    };
    let decoder = Decoder::new().with_recovery_mode(mode);

    match cli.command {
        Command::View {
            file,
            record,
            leader,
            json,
        } => view(&decoder, &file, record, leader, json),
        Command::Diff {
            left,
            right,
            record,
            hide_unchanged,
            json,
        } => compare(&decoder, &left, &right, record, hide_unchanged, json),
    }
}

/// Convert a 1-based position into an index below `len`.
fn position(record: usize, len: usize) -> Result<usize> {
    if record == 0 || record > len {
        bail!("Record {record} is out of range (1-{len})");
    }
    Ok(record - 1)
}

fn view(
    decoder: &Decoder,
    file: &Path,
    record: Option<usize>,
    leader: bool,
    json: bool,
) -> Result<()> {
    let records = decode_file(decoder, file)
        .with_context(|| format!("Failed to decode {}", file.display()))?;
    if records.is_empty() {
        bail!("No valid MARC records found in the file.");
    }

    let selected: &[MarcRecord] = match record {
        Some(n) => {
            let index = position(n, records.len())?;
            &records[index..=index]
        },
        None => &records,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(selected)?);
        return Ok(());
    }

    let index = match record {
        Some(n) => n - 1,
        None => {
            for (i, r) in records.iter().enumerate() {
                println!("{}", record_label(i, r));
            }
            println!();
            0
        },
    };
    let shown = &records[index];
    if leader {
        print!("{}", render_leader_details(&shown.leader));
    }
    print!("{}", render_record(shown));
    Ok(())
}

fn compare(
    decoder: &Decoder,
    left: &Path,
    right: &Path,
    record: Option<usize>,
    hide_unchanged: bool,
    json: bool,
) -> Result<()> {
    let left_bytes = read_file(left).with_context(|| format!("Failed to read {}", left.display()))?;
    let right_bytes =
        read_file(right).with_context(|| format!("Failed to read {}", right.display()))?;

    let (left_records, right_records) = decode_pair(decoder, &left_bytes, &right_bytes);
    let left_records = left_records.with_context(|| format!("Failed to decode {}", left.display()))?;
    let right_records =
        right_records.with_context(|| format!("Failed to decode {}", right.display()))?;
    if left_records.is_empty() && right_records.is_empty() {
        bail!("No valid MARC records found in either file.");
    }

    let total = left_records.len().max(right_records.len());
    let indices: Vec<usize> = match record {
        Some(n) => vec![position(n, total)?],
        None => (0..total).collect(),
    };
    let diffs: Vec<RecordDiff> = match record {
        Some(_) => indices
            .iter()
            .map(|&i| diff(left_records.get(i), right_records.get(i)))
            .collect(),
        None => diff_sequences_parallel(&left_records, &right_records),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&diffs)?);
        return Ok(());
    }

    for (&i, result) in indices.iter().zip(&diffs) {
        println!(
            "{}",
            comparison_label(i, left_records.get(i), right_records.get(i))
        );
        print!("{}", render_diff(result, hide_unchanged));
        println!();
    }
    Ok(())
}
