use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::clusters::cluster_regions;
use crate::config::AnalysisConfig;
use crate::export::{write_gc_csv, write_region_report};
use crate::gc_content::{compute_gc_profile, Region};
use crate::plots::plot_gc_profile;
use crate::targets::{circularize, Strand, Target};

/// Files written for one target
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub plot: PathBuf,
    pub values: PathBuf,
    pub regions: PathBuf,
}

impl OutputPaths {
    pub fn new(output_dir: &Path, name: &str) -> Self {
        OutputPaths {
            plot: output_dir.join(format!("{}_gc_profile.svg", name)),
            values: output_dir.join(format!("{}_gc_values.csv", name)),
            regions: output_dir.join(format!("{}_high_gc_regions.txt", name)),
        }
    }
}

/// Outcome of the analysis of one target
#[derive(Debug, Clone, PartialEq)]
pub struct TargetReport {
    pub n_windows: usize,
    pub regions: Vec<Region>,
    pub clusters: Vec<Region>,
    pub unclosed_region_start: Option<usize>,
}

/// Analyses one target and writes its plot, GC table and region report
/// to `output_dir`.
pub fn analyze_target(
    target: &Target,
    strand: Strand,
    config: &AnalysisConfig,
    output_dir: &Path,
) -> Result<TargetReport> {
    info!(
        "{}: length of target sequence is {}",
        target.name,
        target.sequence.len()
    );

    let sequence = if config.circular {
        let circular = circularize(&target.sequence, config.window_len);
        info!(
            "{}: circularised the sequence, length is now {}",
            target.name,
            circular.len()
        );
        circular
    } else {
        target.sequence.clone()
    };

    debug!(
        "{}: calculating GC content of {}-bp windows",
        target.name, config.window_len
    );
    let profile = compute_gc_profile(&sequence, config.window_len, config.threshold)
        .with_context(|| format!("Error calculating GC content of {}", target.name))?;

    if let Some(start) = profile.unclosed_region_start {
        warn!(
            "{}: high-GC region starting at {} is still open at the end of the scan, not reported",
            target.name, start
        );
    }

    let paths = OutputPaths::new(output_dir, &target.name);

    if config.plot {
        plot_gc_profile(
            &paths.plot,
            &profile.values,
            &sequence,
            config.window_len,
            strand,
            config.threshold,
        )
        .with_context(|| format!("Error plotting GC profile of {}", target.name))?;
        info!("{}: GC profile plot saved as {:?}", target.name, paths.plot);
    }

    write_gc_csv(
        &paths.values,
        &sequence,
        &profile.values,
        config.window_len,
        strand,
        config.offset,
        config.circular,
    )?;
    info!("{}: GC values saved as {:?}", target.name, paths.values);

    let clusters = if profile.regions.is_empty() {
        warn!(
            "{}: no high-GC regions at or above {}%, region report is empty",
            target.name, config.threshold
        );
        Vec::new()
    } else {
        cluster_regions(&profile.regions, config.merge_gap)?
    };
    write_region_report(&paths.regions, &clusters)?;
    info!(
        "{}: {} high-GC regions in {} clusters (merge gap {}) saved to {:?}",
        target.name,
        profile.regions.len(),
        clusters.len(),
        config.merge_gap,
        paths.regions
    );

    Ok(TargetReport {
        n_windows: profile.values.len(),
        regions: profile.regions,
        clusters,
        unclosed_region_start: profile.unclosed_region_start,
    })
}
