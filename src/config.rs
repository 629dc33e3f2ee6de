//! Configuration management for the extrinsic measures evaluation

use crate::error::EvalError;

/// Highest supported trace and validate level
pub const MAX_LEVEL: u8 = 2;

/// Evaluation configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Expected average number of clusters per node, used only to size preallocations
    pub membership: f32,

    /// Diagnostics verbosity: 0 summary only, 1 sizing estimates, 2 per-cluster scores
    pub trace_level: u8,

    /// Self checks: 0 none, 1 node index consistency after load, 2 also score range checks
    pub validate_level: u8,

    /// Spread the per-cluster matching over the rayon pool
    pub parallel: bool,

    /// Number of worker threads (0 = use all available cores)
    pub threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            membership: 1.0,
            trace_level: 0,
            validate_level: 0,
            parallel: false,
            threads: 0,
        }
    }
}

impl Config {
    /// Create a new configuration with custom values
    pub fn new(membership: f32, trace_level: u8, validate_level: u8, parallel: bool) -> Self {
        Self {
            membership,
            trace_level,
            validate_level,
            parallel,
            ..Self::default()
        }
    }

    /// Check that every setting is within its recognized range
    pub fn validate(&self) -> Result<(), EvalError> {
        if !self.membership.is_finite() || self.membership <= 0.0 {
            return Err(EvalError::InvalidMembership(self.membership));
        }
        if self.trace_level > MAX_LEVEL {
            return Err(EvalError::InvalidLevel {
                name: "trace level",
                value: self.trace_level,
            });
        }
        if self.validate_level > MAX_LEVEL {
            return Err(EvalError::InvalidLevel {
                name: "validate level",
                value: self.validate_level,
            });
        }
        Ok(())
    }

    /// Log filter matching the trace level
    pub fn log_level(&self) -> log::LevelFilter {
        match self.trace_level {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    /// Effective number of rayon workers
    pub fn worker_threads(&self) -> usize {
        if self.threads > 0 {
            self.threads
        } else {
            num_cpus::get()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn test_rejects_bad_membership() {
        for membership in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let config = Config {
                membership,
                ..Config::default()
            };
            assert!(matches!(
                config.validate(),
                Err(EvalError::InvalidMembership(_))
            ));
        }
    }

    #[test]
    fn test_rejects_out_of_range_levels() {
        let config = Config::new(1.0, 3, 0, false);
        assert!(matches!(
            config.validate(),
            Err(EvalError::InvalidLevel { name: "trace level", value: 3 })
        ));

        let config = Config::new(1.0, 0, 5, false);
        assert!(matches!(
            config.validate(),
            Err(EvalError::InvalidLevel { name: "validate level", value: 5 })
        ));
    }

    #[test]
    fn test_trace_level_maps_to_log_filter() {
        assert_eq!(Config::new(1.0, 1, 0, false).log_level(), log::LevelFilter::Debug);
        assert_eq!(Config::new(1.0, 2, 0, false).log_level(), log::LevelFilter::Trace);
    }

    #[test]
    fn test_worker_threads() {
        let config = Config {
            threads: 3,
            ..Config::default()
        };
        assert_eq!(config.worker_threads(), 3);
        assert!(Config::default().worker_threads() >= 1);
    }
}
