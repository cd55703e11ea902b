use crate::clusters::DEFAULT_MERGE_GAP;
use crate::error::GcError;

pub const DEFAULT_WINDOW_LEN: usize = 100;
pub const DEFAULT_THRESHOLD: f64 = 60.0;

/// Parameters of one GC profile run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Window length in bases
    pub window_len: usize,
    /// Minimum GC percentage of a high-GC window
    pub threshold: f64,
    /// Treat targets as circular (e.g. plasmids)
    pub circular: bool,
    /// Maximum distance between high-GC regions that are clustered together
    pub merge_gap: usize,
    /// Position reported for the first window in the CSV output
    pub offset: usize,
    /// Render the SVG plot
    pub plot: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            window_len: DEFAULT_WINDOW_LEN,
            threshold: DEFAULT_THRESHOLD,
            circular: false,
            merge_gap: DEFAULT_MERGE_GAP,
            offset: 0,
            plot: true,
        }
    }
}

impl AnalysisConfig {
    /// Checks the parameters that do not depend on a target sequence
    pub fn validate(&self) -> Result<(), GcError> {
        if self.window_len < 1 {
            return Err(GcError::ZeroWindow);
        }
        if !(0.0..=100.0).contains(&self.threshold) {
            return Err(GcError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AnalysisConfig::default();
        assert_eq!(config.merge_gap, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn out_of_range_parameters_are_rejected() {
        let config = AnalysisConfig {
            window_len: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err, GcError::ZeroWindow);
        assert!(!err.to_string().contains("sequence"));

        let config = AnalysisConfig {
            threshold: -1.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(GcError::InvalidThreshold(-1.0)));
    }
}
