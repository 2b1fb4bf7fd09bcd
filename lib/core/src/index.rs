use crate::model::{Edge, EdgeKey, GraphSnapshot, Node, NodeId};
use ahash::{AHashMap, AHashSet};
use std::collections::BTreeMap;

/// Per-year view into the master lists. Indices, not copies - a node that
/// appears in many partitions is one logical entity.
#[derive(Debug, Default)]
struct Partition {
    node_idx: Vec<usize>,
    node_seen: AHashSet<usize>,
    edge_idx: Vec<usize>,
    edge_seen: AHashSet<usize>,
}

impl Partition {
    fn add_node(&mut self, idx: usize) {
        if self.node_seen.insert(idx) {
            self.node_idx.push(idx);
        }
    }

    fn add_edge(&mut self, idx: usize) {
        if self.edge_seen.insert(idx) {
            self.edge_idx.push(idx);
        }
    }
}

/// Deduplicated, query-ready view over one or more node/edge collections,
/// optionally partitioned by year.
///
/// Invariants: no two master nodes share an `id`; no two master edges share
/// the `(source, target, edge type)` triple. First-seen wins - fields of a
/// later duplicate are discarded.
#[derive(Debug, Default)]
pub struct GraphIndex {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    by_id: AHashMap<NodeId, usize>,
    by_key: AHashMap<EdgeKey, usize>,
    partitions: BTreeMap<i32, Partition>,
}

impl GraphIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge year-partitioned collections into the index. Idempotent for
    /// identical input; may be called again to merge further partitions.
    pub fn load(&mut self, partitions: BTreeMap<i32, GraphSnapshot>) {
        for (year, chunk) in partitions {
            let partition = self.partitions.entry(year).or_default();
            for node in chunk.nodes {
                let idx = match self.by_id.get(&node.id) {
                    Some(&idx) => idx,
                    None => {
                        let idx = self.nodes.len();
                        self.by_id.insert(node.id.clone(), idx);
                        self.nodes.push(node);
                        idx
                    }
                };
                partition.add_node(idx);
            }
            for edge in chunk.links {
                let key = edge.key();
                let idx = match self.by_key.get(&key) {
                    Some(&idx) => idx,
                    None => {
                        let idx = self.edges.len();
                        self.by_key.insert(key, idx);
                        self.edges.push(edge);
                        idx
                    }
                };
                partition.add_edge(idx);
            }
        }
    }

    /// Merge an unpartitioned snapshot into the master lists only
    pub fn load_full(&mut self, snapshot: GraphSnapshot) {
        for node in snapshot.nodes {
            if !self.by_id.contains_key(&node.id) {
                self.by_id.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
        for edge in snapshot.links {
            let key = edge.key();
            if !self.by_key.contains_key(&key) {
                self.by_key.insert(key, self.edges.len());
                self.edges.push(edge);
            }
        }
    }

    /// O(1) lookup by id
    #[inline]
    pub fn find_by_id(&self, id: &NodeId) -> Option<&Node> {
        self.by_id.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Case-sensitive exact match on the display name. This is an identity
    /// resolution contract (e.g. resolving a center node), not fuzzy search.
    pub fn find_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Union of nodes from partitions whose year falls in `[start, end]`,
    /// deduplicated, in first-seen order.
    pub fn nodes_in_year_range(&self, start: i32, end: i32) -> Vec<&Node> {
        let mut seen = AHashSet::new();
        let mut out = Vec::new();
        for partition in self.partitions.range(start..=end).map(|(_, p)| p) {
            for &idx in &partition.node_idx {
                if seen.insert(idx) {
                    out.push(&self.nodes[idx]);
                }
            }
        }
        out
    }

    /// Union of edges from partitions whose year falls in `[start, end]`,
    /// deduplicated by the edge triple, in first-seen order.
    pub fn edges_in_year_range(&self, start: i32, end: i32) -> Vec<&Edge> {
        let mut seen = AHashSet::new();
        let mut out = Vec::new();
        for partition in self.partitions.range(start..=end).map(|(_, p)| p) {
            for &idx in &partition.edge_idx {
                if seen.insert(idx) {
                    out.push(&self.edges[idx]);
                }
            }
        }
        out
    }

    /// The distinct partition years contributing nodes to `[start, end]`
    pub fn years_in_range(&self, start: i32, end: i32) -> Vec<i32> {
        self.partitions.range(start..=end).map(|(&y, _)| y).collect()
    }

    /// Declared default time bounds: min and max partition year.
    /// `None` when the index holds no partitions.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let first = self.partitions.keys().next()?;
        let last = self.partitions.keys().next_back()?;
        Some((*first, *last))
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
