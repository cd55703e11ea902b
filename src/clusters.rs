use crate::error::GcError;
use crate::gc_content::Region;

/// Regions separated by at most this many window positions are merged
pub const DEFAULT_MERGE_GAP: usize = 100;

/// Merges neighbouring high-GC regions in a single left-to-right pass.
///
/// `regions` must be sorted by start and non-overlapping, as produced by
/// `compute_gc_profile`. A region is merged into the running cluster when
/// `region.start - cluster.end <= merge_gap`; otherwise the cluster is
/// emitted and a new one starts at the region. The last cluster is always
/// emitted.
pub fn cluster_regions(regions: &[Region], merge_gap: usize) -> Result<Vec<Region>, GcError> {
    let (first, rest) = regions.split_first().ok_or(GcError::EmptyRegionList)?;

    let mut clusters = Vec::new();
    let mut current = *first;

    for region in rest {
        if region.start.saturating_sub(current.end) <= merge_gap {
            current.end = region.end;
        } else {
            clusters.push(current);
            current = *region;
        }
    }
    clusters.push(current);

    Ok(clusters)
}
