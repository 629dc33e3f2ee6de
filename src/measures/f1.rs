//! F1 Max Average matching between two collections

use std::collections::HashMap;

use rayon::prelude::*;

use crate::cluster::{Cluster, ClusterId, Collection};
use crate::config::Config;

/// How the per-cluster matching is performed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Match the source clusters on the rayon pool
    pub parallel: bool,

    /// Check every computed F1 lies in [0, 1]
    pub validate: bool,
}

impl From<&Config> for MatchOptions {
    fn from(config: &Config) -> Self {
        Self {
            parallel: config.parallel,
            validate: config.validate_level >= 2,
        }
    }
}

/// Best F1 of `cluster` against any cluster of `target` sharing a member with it.
///
/// `counters` holds the running intersection size per candidate, it is
/// cleared before use so the caller can reuse its allocation.
fn best_f1(
    cluster: &Cluster,
    target: &Collection,
    counters: &mut HashMap<ClusterId, usize>,
    validate: bool,
) -> f64 {
    counters.clear();
    for &node in &cluster.members {
        for &candidate in target.clusters_of(node) {
            *counters.entry(candidate).or_insert(0) += 1;
        }
    }

    let mut best = 0.0;
    for (&candidate, &shared) in counters.iter() {
        let Some(other) = target.cluster(candidate) else {
            continue;
        };
        let f1 = cluster.f1(shared, other.size());
        if validate && !(0.0..=1.0).contains(&f1) {
            log::warn!(
                "F1 {} is out of range for a cluster of {} members against #{} of {} members sharing {}",
                f1,
                cluster.size(),
                candidate.0,
                other.size(),
                shared
            );
        }
        if best < f1 {
            best = f1;
        }
    }
    best
}

/// Best F1 of each `source` cluster against the `target` clusters, in the
/// source storage order
pub fn mbs_f1_max(source: &Collection, target: &Collection) -> Vec<f64> {
    mbs_f1_max_with(source, target, &MatchOptions::default())
}

/// [`mbs_f1_max`] with explicit matching options
pub fn mbs_f1_max_with(source: &Collection, target: &Collection, options: &MatchOptions) -> Vec<f64> {
    let f1maxs: Vec<f64> = if options.parallel {
        source
            .clusters()
            .par_iter()
            .map_init(HashMap::new, |counters, cluster| {
                best_f1(cluster, target, counters, options.validate)
            })
            .collect()
    } else {
        let mut counters = HashMap::new();
        source
            .clusters()
            .iter()
            .map(|cluster| best_f1(cluster, target, &mut counters, options.validate))
            .collect()
    };

    if log::log_enabled!(log::Level::Trace) {
        for ((id, cluster), f1max) in source.iter().zip(&f1maxs) {
            log::trace!("  #{} ({}): {:.3}", id.0, cluster.size(), f1max);
        }
    }
    f1maxs
}

/// Mean of the best F1 scores of the `source` clusters, 0 for an empty source
pub fn f1_max_avg(source: &Collection, target: &Collection) -> f64 {
    f1_max_avg_with(source, target, &MatchOptions::default())
}

/// [`f1_max_avg`] with explicit matching options
pub fn f1_max_avg_with(source: &Collection, target: &Collection, options: &MatchOptions) -> f64 {
    let f1maxs = mbs_f1_max_with(source, target, options);
    if f1maxs.is_empty() {
        return 0.0;
    }
    f1maxs.iter().sum::<f64>() / f1maxs.len() as f64
}

/// Harmonic mean of two directional scores, 0 when both are 0
pub fn harmonic_mean(a: f64, b: f64) -> f64 {
    let sum = a + b;
    if sum <= 0.0 {
        return 0.0;
    }
    2.0 * a * b / sum
}

/// F1 Max Average Harmonic: the symmetric F1 similarity of two collections
pub fn f1mah(cn1: &Collection, cn2: &Collection) -> f64 {
    f1mah_with(cn1, cn2, &MatchOptions::default())
}

/// [`f1mah`] with explicit matching options
pub fn f1mah_with(cn1: &Collection, cn2: &Collection, options: &MatchOptions) -> f64 {
    log::debug!("F1 Max Avg of {} against {}", cn1.name(), cn2.name());
    let f1ma1 = f1_max_avg_with(cn1, cn2, options);
    log::debug!("F1 Max Avg of {} against {}", cn2.name(), cn1.name());
    let f1ma2 = f1_max_avg_with(cn2, cn1, options);
    log::debug!("F1 Max Avgs: {:.6}, {:.6}", f1ma1, f1ma2);
    harmonic_mean(f1ma1, f1ma2)
}
