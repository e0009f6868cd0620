//! Search tuning parameters.

/// Tuning for the opportunity search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of interior stops sampled per train after the
    /// terminal probe.
    pub max_interior_samples: usize,

    /// Divisor for the sampling stride: `n` candidate stops are walked in
    /// steps of `n / sample_divisor`, floored at 1.
    pub sample_divisor: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_interior_samples: 4,
            sample_divisor: 4,
        }
    }
}

impl SearchConfig {
    /// Step between sampled interior stops when `candidates` stops lie
    /// beyond the destination.
    pub fn stride(&self, candidates: usize) -> usize {
        (candidates / self.sample_divisor.max(1)).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.max_interior_samples, 4);
        assert_eq!(config.sample_divisor, 4);
    }

    #[test]
    fn stride_scales_with_candidates() {
        let config = SearchConfig::default();
        assert_eq!(config.stride(3), 1);
        assert_eq!(config.stride(4), 1);
        assert_eq!(config.stride(8), 2);
        assert_eq!(config.stride(20), 5);
    }

    #[test]
    fn stride_never_zero() {
        let config = SearchConfig::default();
        assert_eq!(config.stride(0), 1);
        assert_eq!(config.stride(1), 1);

        let degenerate = SearchConfig {
            max_interior_samples: 4,
            sample_divisor: 0,
        };
        assert_eq!(degenerate.stride(10), 10);
    }
}
