use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use cella::chromosome::Chromosome;
use cella::cli;
use cella::index::CacheIndex;
use cella::reader::CacheReader;
use cella::version::DataSourceVersion;

#[derive(Parser)]
#[command(name = "cache_info", about = "Inspect a Cella transcript cache file")]
struct Cli {
    /// Path to the cache file
    cache: PathBuf,

    /// Path to the paired cache index file
    #[arg(short = 'x', long = "index")]
    index: Option<PathBuf>,

    /// Emit the summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReferenceSummary {
    ref_index: u16,
    num_bins: usize,
    num_transcripts: usize,
    num_regulatory_regions: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CacheSummary {
    data_source_version: DataSourceVersion,
    pair_id: i32,
    num_references: usize,
    references: Vec<ReferenceSummary>,
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli_args = Cli::parse();

    if !cli_args.json {
        cli::banner("Cache Info");
        cli::section("Cache");
        cli::kv("Cache", &cli_args.cache.display().to_string());
    }

    let file = File::open(&cli_args.cache)
        .with_context(|| format!("failed to open cache: {}", cli_args.cache.display()))?;
    let mut reader = CacheReader::new(BufReader::new(file))
        .with_context(|| format!("failed to parse cache: {}", cli_args.cache.display()))?;

    let summary = summarize(&mut reader)?;

    if let Some(index_path) = &cli_args.index {
        let index_file = File::open(index_path)
            .with_context(|| format!("failed to open index: {}", index_path.display()))?;
        let index = CacheIndex::read(&mut BufReader::new(index_file))
            .with_context(|| format!("failed to parse index: {}", index_path.display()))?;
        index
            .validate_pair(summary.pair_id)
            .context("index does not belong to this cache")?;
        if !cli_args.json {
            cli::success(&format!("index pair id matches ({})", index.pair_id));
        }
    }

    if cli_args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let version = &summary.data_source_version;
    cli::kv("Source", &format!("{} {}", version.name, version.version));
    cli::kv("Released", &version.release_date);
    cli::kv("Pair id", &summary.pair_id.to_string());
    cli::kv("References", &summary.num_references.to_string());
    eprintln!();

    cli::section("Annotated References");
    if summary.references.is_empty() {
        cli::warning("no reference carries any features");
    }
    for reference in &summary.references {
        cli::kv(
            &format!("ref {}", reference.ref_index),
            &format!(
                "{} bins, {} transcripts, {} regulatory regions",
                reference.num_bins, reference.num_transcripts, reference.num_regulatory_regions
            ),
        );
    }

    cli::print_summary(start);
    Ok(())
}

/// Decodes every reference section, keeping only the annotated ones.
fn summarize(reader: &mut CacheReader<BufReader<File>>) -> Result<CacheSummary> {
    let data_source_version = reader.data_source_version().clone();
    let pair_id = reader.pair_id();
    let hgnc = HashMap::new();

    let num_references = reader.read_reference_count()?;
    let mut references = Vec::new();
    for i in 0..num_references {
        let ref_index = u16::try_from(i).context("reference index exceeds u16::MAX")?;
        // names come from a reference file this tool does not require
        let chromosome = Chromosome::new(&format!("ref{ref_index}"), "", 0, ref_index);
        let Some(reference) = reader.read_next_reference(&chromosome, &hgnc)? else {
            continue;
        };
        references.push(ReferenceSummary {
            ref_index,
            num_bins: reference.bins.len(),
            num_transcripts: reference.num_transcripts(),
            num_regulatory_regions: reference.num_regulatory_regions(),
        });
    }
    reader.finish()?;

    Ok(CacheSummary {
        data_source_version,
        pair_id,
        num_references,
        references,
    })
}
