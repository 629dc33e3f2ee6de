//! Normalized Mutual Information

use crate::cluster::Collection;

/// NMI of two collections.
///
/// Not implemented yet: always returns 0 and warns about it.
pub fn eval_nmi(cn1: &Collection, cn2: &Collection) -> f64 {
    log::warn!(
        "NMI evaluation is not implemented yet, 0 is reported for {} and {}",
        cn1.name(),
        cn2.name()
    );
    0.0
}
