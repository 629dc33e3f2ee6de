//! Cluster collections module

pub mod collection;

pub use collection::{Collection, NodeIndex};

/// Identifier of a node in the clustered dataset
pub type NodeId = u32;

/// Handle of a cluster within its owning collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterId(pub u32);

impl ClusterId {
    /// Position of the cluster in the collection storage
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A cluster of nodes loaded from one line of the input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cluster {
    /// Member node ids in the input order
    pub members: Vec<NodeId>,
}

impl Cluster {
    /// Create a cluster from its members
    pub fn new(members: Vec<NodeId>) -> Self {
        Self { members }
    }

    /// Number of members
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// F1 between this cluster and a cluster of `other_size` members sharing
    /// `intersection` members with it
    pub fn f1(&self, intersection: usize, other_size: usize) -> f64 {
        let total = self.size() + other_size;
        if total == 0 {
            return 0.0;
        }
        2.0 * intersection as f64 / total as f64
    }
}
