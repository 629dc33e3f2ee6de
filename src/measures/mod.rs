//! Extrinsic similarity measures of two collections

pub mod f1;
pub mod nmi;

pub use f1::{f1_max_avg, f1_max_avg_with, f1mah, f1mah_with, mbs_f1_max, mbs_f1_max_with, MatchOptions};
pub use nmi::eval_nmi;
