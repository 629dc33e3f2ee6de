//! Cluster collection with its node to clusters back-reference index

use std::collections::HashMap;

use crate::cluster::{Cluster, ClusterId, NodeId};

/// Node id to the handles of the clusters containing that node.
///
/// Handles are appended while clusters are inserted in storage order, so each
/// per-node list is strictly ascending and can be binary searched.
#[derive(Debug, Clone, Default)]
pub struct NodeIndex {
    owners: HashMap<NodeId, Vec<ClusterId>>,
}

impl NodeIndex {
    fn with_capacity(nodes: usize) -> Self {
        Self {
            owners: HashMap::with_capacity(nodes),
        }
    }

    /// Clusters containing the node, empty when the node is unknown
    pub fn clusters_of(&self, node: NodeId) -> &[ClusterId] {
        self.owners.get(&node).map_or(&[], |owners| owners.as_slice())
    }

    /// Whether the cluster appears among the owners of the node
    pub fn contains(&self, node: NodeId, cluster: ClusterId) -> bool {
        self.clusters_of(node).binary_search(&cluster).is_ok()
    }

    /// Number of indexed nodes
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Iterate over the indexed nodes and their owners
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &[ClusterId])> + '_ {
        self.owners
            .iter()
            .map(|(&node, owners)| (node, owners.as_slice()))
    }

    fn capacity(&self) -> usize {
        self.owners.capacity()
    }

    /// Registers the owner, false if the node was already registered for it
    fn register(&mut self, node: NodeId, cluster: ClusterId) -> bool {
        let owners = self.owners.entry(node).or_default();
        if owners.last() == Some(&cluster) {
            return false;
        }
        owners.push(cluster);
        true
    }
}

/// All clusters of one partition together with the derived node index
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Source of the clusters, the file name for loaded collections
    name: String,

    /// Cluster storage, a `ClusterId` is a position here
    clusters: Vec<Cluster>,

    /// Back references from nodes to the clusters in `clusters`
    index: NodeIndex,
}

impl Collection {
    /// Create an empty collection with room for the expected clusters and nodes
    pub(crate) fn with_capacity(name: impl Into<String>, clusters: usize, nodes: usize) -> Self {
        Self {
            name: name.into(),
            clusters: Vec::with_capacity(clusters),
            index: NodeIndex::with_capacity(nodes),
        }
    }

    /// Build a collection from in-memory member lists.
    ///
    /// Empty member lists are skipped the same way empty CNL lines are.
    pub fn from_clusters<I>(name: impl Into<String>, clusters: I) -> Self
    where
        I: IntoIterator<Item = Vec<NodeId>>,
    {
        let clusters = clusters.into_iter();
        let mut collection = Self::with_capacity(name, clusters.size_hint().0, 0);
        for members in clusters.filter(|members| !members.is_empty()) {
            collection.insert(members);
        }
        collection.shrink_if_sparse();
        collection
    }

    /// Add a cluster and register its members in the node index.
    ///
    /// Repeated members of the same cluster are dropped.
    pub(crate) fn insert(&mut self, members: Vec<NodeId>) -> ClusterId {
        let id = ClusterId(self.clusters.len() as u32);
        let mut unique = Vec::with_capacity(members.len());
        for node in members {
            if self.index.register(node, id) {
                unique.push(node);
            } else {
                log::warn!("Duplicate member {} in cluster #{} of {}, skipped", node, id.0, self.name);
            }
        }
        unique.shrink_to_fit();
        self.clusters.push(Cluster::new(unique));
        id
    }

    /// Release reserved space when less than half of it is used
    pub(crate) fn shrink_if_sparse(&mut self) {
        if self.clusters.len() < self.clusters.capacity() / 2 {
            self.clusters.shrink_to_fit();
        }
        if self.index.len() < self.index.capacity() / 2 {
            self.index.owners.shrink_to_fit();
        }
    }

    /// Reserved cluster and node slots
    pub(crate) fn capacities(&self) -> (usize, usize) {
        (self.clusters.capacity(), self.index.capacity())
    }

    /// Name of the collection source
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All clusters in storage order
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Cluster by its handle
    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(id.index())
    }

    /// Iterate over the clusters with their handles
    pub fn iter(&self) -> impl Iterator<Item = (ClusterId, &Cluster)> + '_ {
        self.clusters
            .iter()
            .enumerate()
            .map(|(i, cluster)| (ClusterId(i as u32), cluster))
    }

    /// Number of clusters
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Number of distinct member nodes
    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Clusters containing the node
    pub fn clusters_of(&self, node: NodeId) -> &[ClusterId] {
        self.index.clusters_of(node)
    }

    /// The node index
    pub fn index(&self) -> &NodeIndex {
        &self.index
    }

    /// Check the node index against the cluster storage, logging each
    /// violation. Returns the number of violations found.
    pub fn validate_index(&self) -> usize {
        let mut violations = 0;

        for (node, owners) in self.index.iter() {
            if owners.is_empty() {
                log::warn!("Node {} of {} is indexed without clusters", node, self.name);
                violations += 1;
            }
            if owners.windows(2).any(|pair| pair[0] >= pair[1]) {
                log::warn!("Clusters of node {} in {} are not strictly ascending", node, self.name);
                violations += 1;
            }
            for &owner in owners {
                match self.cluster(owner) {
                    Some(cluster) if cluster.members.contains(&node) => {}
                    Some(_) => {
                        log::warn!("Cluster #{} of {} does not contain indexed node {}", owner.0, self.name, node);
                        violations += 1;
                    }
                    None => {
                        log::warn!("Node {} of {} refers to missing cluster #{}", node, self.name, owner.0);
                        violations += 1;
                    }
                }
            }
        }

        for (id, cluster) in self.iter() {
            for &node in &cluster.members {
                if !self.index.contains(node, id) {
                    log::warn!("Member {} of cluster #{} in {} is not indexed", node, id.0, self.name);
                    violations += 1;
                }
            }
        }

        violations
    }
}
