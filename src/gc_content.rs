use crate::error::GcError;

/// Half-open interval `[start, end)` over window start positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start: usize,
    pub end: usize,
}

impl Region {
    pub fn new(start: usize, end: usize) -> Self {
        Region { start, end }
    }
}

/// Result of a windowed GC scan over one sequence
#[derive(Debug, Clone, PartialEq)]
pub struct GcProfile {
    /// GC percentage of the window starting at each position
    pub values: Vec<f64>,
    /// Regions where the GC percentage stays at or above the threshold
    pub regions: Vec<Region>,
    /// Start of a high-GC region that was still open when the scan ended.
    /// Such a region is never closed, so it is not part of `regions`.
    pub unclosed_region_start: Option<usize>,
}

#[derive(Clone, Copy)]
enum ScanState {
    Idle,
    InRegion { start: usize },
}

/// Two-state machine that turns a stream of window GC percentages into
/// high-GC regions. Only a drop below the threshold closes a region.
pub struct RegionScanner {
    threshold: f64,
    state: ScanState,
    regions: Vec<Region>,
}

impl RegionScanner {
    pub fn new(threshold: f64) -> Self {
        RegionScanner {
            threshold,
            state: ScanState::Idle,
            regions: Vec::new(),
        }
    }

    /// Feeds the GC percentage of the window starting at `pos`.
    /// Positions must be pushed in increasing order.
    pub fn push(&mut self, pos: usize, perc: f64) {
        self.state = match self.state {
            ScanState::Idle if perc >= self.threshold => ScanState::InRegion { start: pos },
            ScanState::InRegion { start } if perc < self.threshold => {
                self.regions.push(Region::new(start, pos));
                ScanState::Idle
            }
            s => s,
        };
    }

    /// Ends the scan. Returns the closed regions and the start of the
    /// region that is still open, if any.
    pub fn finish(self) -> (Vec<Region>, Option<usize>) {
        let unclosed = match self.state {
            ScanState::InRegion { start } => Some(start),
            ScanState::Idle => None,
        };
        (self.regions, unclosed)
    }
}

/// Runs the region state machine over an already computed GC series.
pub fn detect_regions(values: &[f64], threshold: f64) -> (Vec<Region>, Option<usize>) {
    let mut scanner = RegionScanner::new(threshold);
    for (pos, &perc) in values.iter().enumerate() {
        scanner.push(pos, perc);
    }
    scanner.finish()
}

fn is_gc(base: u8) -> bool {
    matches!(base, b'G' | b'g' | b'C' | b'c')
}

/// GC content of a slice in percent.
/// Bases other than G/C (including N) only count towards the length.
pub fn gc_percent(window: &[u8]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let gc = window.iter().filter(|&&b| is_gc(b)).count();
    gc as f64 / window.len() as f64 * 100.0
}

/// Slides a window of `window_len` bases over `sequence` (step 1),
/// records the GC percentage of every window, and collects the regions
/// where it is at or above `threshold`.
///
/// A region is closed by the first window that drops below the threshold.
/// If the last window is still above the threshold, the open region is
/// not added to `regions` (see `GcProfile::unclosed_region_start`).
pub fn compute_gc_profile(
    sequence: &[u8],
    window_len: usize,
    threshold: f64,
) -> Result<GcProfile, GcError> {
    if sequence.is_empty() {
        return Err(GcError::EmptySequence);
    }
    if window_len < 1 || window_len > sequence.len() {
        return Err(GcError::InvalidWindow {
            window_len,
            seq_len: sequence.len(),
        });
    }
    if !(0.0..=100.0).contains(&threshold) {
        return Err(GcError::InvalidThreshold(threshold));
    }

    let n_windows = sequence.len() - window_len + 1;
    let mut values = Vec::with_capacity(n_windows);
    let mut scanner = RegionScanner::new(threshold);

    // rolling count, always equal to the GC count of sequence[i..i + window_len]
    let mut gc = sequence[..window_len].iter().filter(|&&b| is_gc(b)).count();

    for i in 0..n_windows {
        if i > 0 {
            if is_gc(sequence[i - 1]) {
                gc -= 1;
            }
            if is_gc(sequence[i + window_len - 1]) {
                gc += 1;
            }
        }

        let perc = gc as f64 / window_len as f64 * 100.0;
        values.push(perc);
        scanner.push(i, perc);
    }

    let (regions, unclosed_region_start) = scanner.finish();

    Ok(GcProfile {
        values,
        regions,
        unclosed_region_start,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One block of 20 bases per percentage (multiples of 5), G's first
    fn blocks(percents: &[usize]) -> Vec<u8> {
        let mut seq = Vec::new();
        for &p in percents {
            let gc = p / 5;
            seq.extend(std::iter::repeat(b'G').take(gc));
            seq.extend(std::iter::repeat(b'A').take(20 - gc));
        }
        seq
    }

    #[test]
    fn series_has_one_value_per_window_start() {
        let seq = b"ACGTACGTTTGGCCAANNACGT";
        for window_len in 1..=seq.len() {
            let profile = compute_gc_profile(seq, window_len, 50.0).unwrap();
            assert_eq!(profile.values.len(), seq.len() - window_len + 1);
            assert!(profile.values.iter().all(|&v| (0.0..=100.0).contains(&v)));
        }
    }

    #[test]
    fn pure_gc_and_pure_at_sequences() {
        let profile = compute_gc_profile(b"GCGCCGGCGC", 4, 50.0).unwrap();
        assert!(profile.values.iter().all(|&v| v == 100.0));

        let profile = compute_gc_profile(b"ATATTAATAT", 4, 50.0).unwrap();
        assert!(profile.values.iter().all(|&v| v == 0.0));
        assert!(profile.regions.is_empty());
        assert_eq!(profile.unclosed_region_start, None);
    }

    #[test]
    fn rolling_count_matches_recomputed_windows() {
        let seq = b"ttGCnnACGTGGGCCCATATNNgcgcATGCAAAAGGGG";
        for window_len in [1, 3, 7, 12, seq.len()] {
            let profile = compute_gc_profile(seq, window_len, 40.0).unwrap();
            let expected: Vec<f64> = seq.windows(window_len).map(gc_percent).collect();
            assert_eq!(profile.values, expected);
        }
    }

    #[test]
    fn case_and_ambiguous_bases() {
        let upper = compute_gc_profile(b"ACGTNNGC", 4, 50.0).unwrap();
        let lower = compute_gc_profile(b"acgtnngc", 4, 50.0).unwrap();
        assert_eq!(upper, lower);
        // N counts towards the window length only
        assert_eq!(gc_percent(b"GCNN"), 50.0);
        assert_eq!(gc_percent(b"NNNN"), 0.0);
    }

    #[test]
    fn regions_from_series() {
        let (regions, unclosed) = detect_regions(&[50.0, 80.0, 90.0, 40.0, 95.0], 75.0);
        assert_eq!(regions, vec![Region::new(1, 3)]);
        // index 4 is above the threshold but never closed
        assert_eq!(unclosed, Some(4));

        let (regions, unclosed) = detect_regions(&[], 75.0);
        assert!(regions.is_empty());
        assert_eq!(unclosed, None);
    }

    #[test]
    fn trailing_open_region_is_not_emitted() {
        let seq = blocks(&[50, 80, 90, 40, 95]);
        let profile = compute_gc_profile(&seq, 20, 75.0).unwrap();
        assert_eq!(profile.values.len(), 81);

        let at_block_starts: Vec<f64> = profile.values.iter().step_by(20).copied().collect();
        for (got, want) in at_block_starts.iter().zip([50.0, 80.0, 90.0, 40.0, 95.0]) {
            assert!((got - want).abs() < 1e-9);
        }

        // opens once 15 of 20 bases are G (75%), closes when the 40% block pulls it under
        assert_eq!(profile.regions, vec![Region::new(15, 52)]);
        assert_eq!(profile.unclosed_region_start, Some(75));
    }

    #[test]
    fn regions_with_single_base_windows() {
        // window length 1 turns each base into its own window: 0/100 percentages
        let profile = compute_gc_profile(b"AGGATGCAG", 1, 75.0).unwrap();
        assert_eq!(profile.regions, vec![Region::new(1, 3), Region::new(5, 7)]);
        assert_eq!(profile.unclosed_region_start, Some(8));
    }

    #[test]
    fn threshold_is_inclusive() {
        let profile = compute_gc_profile(b"GATA", 2, 50.0).unwrap();
        assert_eq!(profile.values, vec![50.0, 0.0, 0.0]);
        assert_eq!(profile.regions, vec![Region::new(0, 1)]);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert_eq!(
            compute_gc_profile(b"ACGT", 0, 50.0),
            Err(GcError::InvalidWindow {
                window_len: 0,
                seq_len: 4
            })
        );
        assert_eq!(
            compute_gc_profile(b"ACGT", 5, 50.0),
            Err(GcError::InvalidWindow {
                window_len: 5,
                seq_len: 4
            })
        );
        assert_eq!(compute_gc_profile(b"", 1, 50.0), Err(GcError::EmptySequence));
        assert_eq!(
            compute_gc_profile(b"ACGT", 2, 100.5),
            Err(GcError::InvalidThreshold(100.5))
        );
        assert!(compute_gc_profile(b"ACGT", 2, f64::NAN).is_err());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let seq = blocks(&[30, 70, 90, 10, 60, 80]);
        assert_eq!(seq.len(), 120);
        let a = compute_gc_profile(&seq, 7, 65.0).unwrap();
        let b = compute_gc_profile(&seq, 7, 65.0).unwrap();
        assert_eq!(a, b);
        let bits = |p: &GcProfile| p.values.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
    }
}
