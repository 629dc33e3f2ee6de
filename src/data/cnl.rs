//! CNL (Cluster Node List) loading
//!
//! One cluster per line, members are whitespace separated node ids, an optional
//! leading `<cluster-id>>` token is discarded and `#` lines are comments. Comment
//! lines before the first cluster may declare the expected sizes, e.g.
//! `# Clusters: 40, Nodes: 1000`.

use std::path::Path;

use crate::cluster::{Collection, NodeId};
use crate::config::Config;
use crate::data::InputFile;
use crate::error::EvalError;

/// Upper bound for any preallocation derived from estimates
const MAX_RESERVE: usize = 1 << 26;

/// Sizes declared in the CNL header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CnlHeader {
    pub clusters: Option<usize>,
    pub nodes: Option<usize>,
}

impl CnlHeader {
    /// Take the size attributes of one header comment line.
    ///
    /// Attributes are `key: value` pairs separated by commas or spaces.
    pub fn parse_line(&mut self, line: &str) {
        let body = line.trim_start().trim_start_matches('#');
        let mut key: Option<String> = None;
        for token in body
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
        {
            let value = match token.split_once(':') {
                Some((name, rest)) => {
                    key = Some(name.to_ascii_lowercase());
                    if rest.is_empty() {
                        continue;
                    }
                    rest
                }
                None => token,
            };
            let Some(name) = key.take() else {
                continue;
            };
            let Ok(value) = value.parse::<usize>() else {
                continue;
            };
            match name.as_str() {
                "clusters" => self.clusters = Some(value),
                "nodes" => self.nodes = Some(value),
                _ => {}
            }
        }
    }
}

/// Read the leading comment lines of the file.
///
/// On return `line` holds the first line that is not a header line, the flag
/// tells whether such a line exists.
pub fn parse_header(file: &mut InputFile, line: &mut String) -> Result<(CnlHeader, bool), EvalError> {
    let mut header = CnlHeader::default();
    while file.read_line(line)? {
        let text = line.trim_start();
        if text.is_empty() {
            continue;
        }
        if !text.starts_with('#') {
            return Ok((header, true));
        }
        header.parse_line(text);
    }
    Ok((header, false))
}

/// Estimate the number of distinct nodes in a CNL file of `file_size` bytes.
///
/// Node ids are assumed to be assigned densely from zero and each id is
/// followed by a delimiter; every node occurs `membership` times.
pub fn estimate_cnl_nodes(file_size: u64, membership: f32) -> usize {
    let mut remaining = file_size;
    let mut ids: u64 = 0;
    let mut digits: u64 = 1;
    let mut count: u64 = 10;
    while remaining > 0 {
        let bytes = count.saturating_mul(digits + 1);
        if remaining <= bytes {
            ids += remaining / (digits + 1);
            break;
        }
        ids += count;
        remaining -= bytes;
        digits += 1;
        count = count.saturating_mul(if digits == 2 { 9 } else { 10 });
    }
    (ids as f64 / f64::from(membership)) as usize
}

/// Estimate the number of clusters from the number of nodes
pub fn estimate_clusters(nodes: usize, membership: f32) -> usize {
    (nodes as f64 * f64::from(membership)).sqrt() as usize
}

/// Expected sizes of a collection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeEstimate {
    pub clusters: usize,
    pub nodes: usize,
    /// Characters per node id in a cluster line, at least 1
    pub node_chars: f32,
}

impl SizeEstimate {
    /// Fill in the sizes the header leaves unknown
    pub fn new(header: CnlHeader, file_size: Option<u64>, membership: f32) -> Self {
        let (clusters, nodes) = match header.clusters.filter(|&n| n > 0) {
            Some(clusters) => {
                let nodes = header.nodes.filter(|&n| n > 0).unwrap_or_else(|| {
                    (clusters as f64 * clusters as f64 / f64::from(membership)) as usize
                });
                (clusters, nodes)
            }
            None => {
                let mut nodes = header.nodes.unwrap_or(0);
                if nodes == 0 {
                    if let Some(size) = file_size {
                        nodes = estimate_cnl_nodes(size, membership);
                    }
                }
                (estimate_clusters(nodes, membership), nodes)
            }
        };

        let node_chars = if nodes == 0 {
            1.0
        } else {
            match file_size {
                Some(size) => (size as f64 / (nodes as f64 * f64::from(membership))) as f32,
                // Digits of the largest id plus the delimiter
                None => (nodes as f32).log10() + 1.0,
            }
        };

        Self {
            clusters,
            nodes,
            node_chars: node_chars.max(1.0),
        }
    }

    /// Expected number of members in a cluster line of `line_len` bytes
    pub fn members_in(&self, line_len: usize) -> usize {
        (line_len as f32 / self.node_chars) as usize
    }
}

/// Parse a node id token.
///
/// The leading decimal digits form the id, a trailing part such as a share
/// (`12:0.5`) is ignored. `None` when there are no leading digits or the id
/// overflows.
pub fn parse_node_id(token: &str) -> Option<NodeId> {
    let digits = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    if digits == 0 {
        return None;
    }
    token[..digits].parse().ok()
}

/// Parse one cluster line into its members.
///
/// Returns `None` for blank, comment and empty cluster lines.
pub fn parse_cluster_line(line: &str, estimate: &SizeEstimate, source: &str) -> Option<Vec<NodeId>> {
    let mut tokens = line.split_ascii_whitespace();
    let mut token = tokens.next()?;
    if token.starts_with('#') {
        return None;
    }
    if token.ends_with('>') {
        let cluster_id = token;
        match tokens.next() {
            Some(next) => token = next,
            None => {
                log::warn!("Empty cluster exists: '{}' in {}, skipped", cluster_id, source);
                return None;
            }
        }
    }

    let mut members = Vec::with_capacity(estimate.members_in(line.len()));
    for token in std::iter::once(token).chain(tokens) {
        match parse_node_id(token) {
            Some(node) => members.push(node),
            None => log::warn!("Conversion error of '{}' into a node id in {}, skipped", token, source),
        }
    }
    members.shrink_to_fit();
    Some(members)
}

/// Load a collection from a CNL file.
///
/// Fails when the file can not be opened, is empty or its header can not be
/// read; an I/O error after the first cluster line keeps the clusters loaded
/// so far. Lines with invalid UTF-8 are decoded lossily, their corrupt tokens
/// are dropped as conversion errors.
pub fn load_cnl(path: impl AsRef<Path>, membership: f32) -> Result<Collection, EvalError> {
    let mut file = InputFile::open(path)?;
    if file.size() == Some(0) {
        return Err(EvalError::EmptyFile {
            path: file.path().to_path_buf(),
        });
    }
    let name = file.name();

    let membership = if membership.is_finite() && membership > 0.0 {
        membership
    } else {
        log::warn!("Invalid membership {} for {}, 1 is used", membership, name);
        1.0
    };

    // Reused for every line
    let mut line = String::new();
    let (header, pending) = parse_header(&mut file, &mut line)?;
    let estimate = SizeEstimate::new(header, file.size(), membership);
    log::debug!(
        "Expected {} clusters, {} nodes, {:.2} chars per node in {}",
        estimate.clusters,
        estimate.nodes,
        estimate.node_chars,
        name
    );

    let limit = file
        .size()
        .map_or(MAX_RESERVE, |size| (size as usize).min(MAX_RESERVE));
    let mut collection = Collection::with_capacity(
        name.clone(),
        estimate.clusters.min(limit),
        estimate.nodes.min(limit),
    );

    if pending {
        loop {
            if let Some(members) = parse_cluster_line(&line, &estimate, &name) {
                if members.is_empty() {
                    log::warn!("Cluster without valid members in {}", name);
                }
                collection.insert(members);
            }
            match file.read_line(&mut line) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => {
                    log::error!("{}, loading is interrupted", err);
                    break;
                }
            }
        }
    }

    let (reserved_clusters, reserved_nodes) = collection.capacities();
    collection.shrink_if_sparse();
    log::debug!(
        "Reserved {} cluster and {} node slots for {}",
        reserved_clusters,
        reserved_nodes,
        name
    );
    log::info!(
        "Loaded {} clusters {} nodes from {}",
        collection.cluster_count(),
        collection.node_count(),
        name
    );

    Ok(collection)
}

impl Collection {
    /// Load a collection from a CNL file, see [`load_cnl`]
    pub fn try_load(path: impl AsRef<Path>, membership: f32) -> Result<Self, EvalError> {
        load_cnl(path, membership)
    }

    /// Load a collection from a CNL file, an unreadable or empty file yields
    /// an empty collection
    pub fn load(path: impl AsRef<Path>, membership: f32) -> Self {
        match load_cnl(&path, membership) {
            Ok(collection) => collection,
            Err(err @ EvalError::EmptyFile { .. }) => {
                log::warn!("{}, skipped", err);
                Self::with_capacity(path.as_ref().display().to_string(), 0, 0)
            }
            Err(err) => {
                log::error!("{}", err);
                Self::with_capacity(path.as_ref().display().to_string(), 0, 0)
            }
        }
    }

    /// Load using the configured membership and index validation
    pub fn load_with(path: impl AsRef<Path>, config: &Config) -> Self {
        let collection = Self::load(path, config.membership);
        if config.validate_level >= 1 {
            let violations = collection.validate_index();
            if violations > 0 {
                log::error!(
                    "Node index of {} has {} inconsistencies",
                    collection.name(),
                    violations
                );
            }
        }
        collection
    }
}
