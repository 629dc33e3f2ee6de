//! Extrinsic measures for comparing two clusterings of the same nodes

pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod measures;
pub mod storage;

pub use anyhow::{Result, anyhow};
pub use cluster::{Cluster, ClusterId, Collection, NodeId};
pub use config::Config;
pub use error::EvalError;
pub use measures::{eval_nmi, f1_max_avg, f1mah, mbs_f1_max};
