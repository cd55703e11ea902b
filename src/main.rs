use std::{fs::create_dir_all, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info, Level};

use gcprofile::{
    clusters::DEFAULT_MERGE_GAP,
    config::{AnalysisConfig, DEFAULT_THRESHOLD, DEFAULT_WINDOW_LEN},
    pipeline::analyze_target,
    targets::{load_targets, Strand},
};

#[derive(Parser)]
#[clap(author, version, about = "GC content profiles and high-GC regions of target sequences")]
struct Cli {
    /// JSON target file (.json), FASTA file (.fa/.fasta/.fna), optionally gz compressed,
    /// or a directory containing meta_targets.tsv
    input: PathBuf,

    /// Strand to analyse: 'sequence' (forward) or 'sequence_rc' (reverse complement)
    #[clap(short, long, default_value = "sequence")]
    strand: Strand,

    /// Window length in bases
    #[clap(short, long, default_value_t = DEFAULT_WINDOW_LEN)]
    window: usize,

    /// Minimum GC percentage of a high-GC window
    #[clap(short, long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Cluster high-GC regions that are at most this many positions apart
    #[clap(long, default_value_t = DEFAULT_MERGE_GAP)]
    merge_gap: usize,

    /// Treat the targets as circular sequences (e.g. plasmids)
    #[clap(long)]
    circular: bool,

    /// Position reported for the first window in the CSV output
    #[clap(long, default_value_t = 0)]
    offset: usize,

    /// Output directory
    #[clap(short, long, default_value = "gc_out")]
    output_dir: PathBuf,

    /// Skip the SVG plot
    #[clap(long)]
    no_plot: bool,

    /// Print debug messages
    #[clap(short, long)]
    verbose: bool,
}

impl Cli {
    fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            window_len: self.window,
            threshold: self.threshold,
            circular: self.circular,
            merge_gap: self.merge_gap,
            offset: self.offset,
            plot: !self.no_plot,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::Debug } else { Level::Info };
    simple_logger::init_with_level(level)?;

    let config = cli.analysis_config();
    config.validate()?;

    let targets = load_targets(&cli.input, cli.strand)
        .with_context(|| format!("Error loading targets from {:?}", cli.input))?;
    info!("Loaded {} target(s), using {} strand", targets.len(), cli.strand);

    create_dir_all(&cli.output_dir).context("Cannot create output directory")?;

    // a failing target is reported and the remaining targets still run
    let mut failed = 0;
    for target in &targets {
        if let Err(e) = analyze_target(target, cli.strand, &config, &cli.output_dir) {
            error!("{}: {:#}", target.name, e);
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} of {} target(s) failed", failed, targets.len());
    }
    info!("Results saved to {:?}", cli.output_dir);
    Ok(())
}
