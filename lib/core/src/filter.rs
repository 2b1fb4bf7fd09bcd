use crate::index::GraphIndex;
use crate::model::{Edge, EdgeType, Node, NodeId, NodeType};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inclusive year bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: i32,
    pub end: i32,
}

impl TimeRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }
}

/// A composable set of filter predicates. Every axis is independently
/// optional - empty means "no constraint on this axis".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub time_range: Option<TimeRange>,
    pub genres: BTreeSet<String>,
    pub node_types: BTreeSet<NodeType>,
    pub edge_types: BTreeSet<EdgeType>,
    pub search_term: String,
}

impl FilterCriteria {
    /// Filters are active iff at least one axis constrains the graph: a time
    /// range different from the index's declared default bounds, a non-empty
    /// genre/node-type/edge-type set, or a non-blank search term.
    pub fn is_active(&self, default_bounds: Option<(i32, i32)>) -> bool {
        let time_active = match (self.time_range, default_bounds) {
            (None, _) => false,
            (Some(range), Some((start, end))) => (range.start, range.end) != (start, end),
            (Some(_), None) => true,
        };
        time_active
            || !self.genres.is_empty()
            || !self.node_types.is_empty()
            || !self.edge_types.is_empty()
            || !self.search_term.trim().is_empty()
    }
}

/// Filtering output. Closure invariant: every link has both endpoints in
/// `nodes`, and every non-center node is an endpoint of some link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisibleSubgraph {
    pub nodes: Vec<Node>,
    pub links: Vec<Edge>,
}

impl VisibleSubgraph {
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.iter().any(|n| &n.id == id)
    }
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Entity the initial view centers on, resolved by exact display name
    pub default_center: Option<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            default_center: Some("Sailor Shift".to_string()),
        }
    }
}

/// Computes the visible subgraph for a [`FilterCriteria`] over a
/// [`GraphIndex`], or one of two ego-network fallback views when no filter
/// is active.
#[derive(Debug, Default)]
pub struct FilterEngine {
    config: FilterConfig,
}

impl FilterEngine {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Apply `criteria` to `index`. When no filter is active the fallback
    /// is, in priority order: the 1-hop ego network around `focused`, else
    /// around the configured default center, else an empty subgraph.
    pub fn apply(
        &self,
        index: &GraphIndex,
        criteria: &FilterCriteria,
        focused: Option<&NodeId>,
    ) -> VisibleSubgraph {
        if !criteria.is_active(index.year_bounds()) {
            if let Some(id) = focused {
                return Self::ego_network(index, index.find_by_id(id));
            }
            let center = self
                .config
                .default_center
                .as_deref()
                .and_then(|name| index.find_by_name(name));
            return Self::ego_network(index, center);
        }

        let (start, end) = match (criteria.time_range, index.year_bounds()) {
            (Some(range), _) => (range.start, range.end),
            (None, Some(bounds)) => bounds,
            (None, None) => return VisibleSubgraph::default(),
        };

        // Step 1: time gate. Everything downstream operates on this
        // deduplicated slice; a node outside it can never be rescued.
        let gated_nodes = index.nodes_in_year_range(start, end);
        let gated_edges = index.edges_in_year_range(start, end);
        let gated_ids: AHashSet<&NodeId> = gated_nodes.iter().map(|n| &n.id).collect();

        // Steps 2-4: secondary predicates, in order: genre, node type, search
        let mut survivors = gated_nodes;
        if !criteria.genres.is_empty() {
            survivors.retain(|n| {
                n.genre
                    .as_ref()
                    .map(|g| criteria.genres.contains(g))
                    .unwrap_or(false)
            });
        }
        if !criteria.node_types.is_empty() {
            survivors.retain(|n| criteria.node_types.contains(&n.node_type));
        }
        let term = criteria.search_term.trim().to_lowercase();
        if !term.is_empty() {
            survivors.retain(|n| n.name.to_lowercase().contains(&term));
        }

        // Step 5
        let visible_ids: AHashSet<&NodeId> = survivors.iter().map(|n| &n.id).collect();

        // Step 6: edge pass. Both endpoints must have passed the time gate;
        // at least one must have survived the secondary predicates. The
        // other endpoint is what closure expansion pulls back in.
        let kept_edges: Vec<&Edge> = gated_edges
            .into_iter()
            .filter(|e| {
                (criteria.edge_types.is_empty() || criteria.edge_types.contains(&e.edge_type))
                    && gated_ids.contains(&e.source)
                    && gated_ids.contains(&e.target)
                    && (visible_ids.contains(&e.source) || visible_ids.contains(&e.target))
            })
            .collect();

        // Step 7: closure expansion. Final nodes = survivors plus every
        // endpoint a kept edge still references.
        let mut seen: AHashSet<NodeId> = survivors.iter().map(|n| n.id.clone()).collect();
        let mut nodes: Vec<Node> = survivors.into_iter().cloned().collect();
        for edge in &kept_edges {
            for endpoint in [&edge.source, &edge.target] {
                if !seen.contains(endpoint) {
                    if let Some(node) = index.find_by_id(endpoint) {
                        seen.insert(endpoint.clone());
                        nodes.push(node.clone());
                    }
                }
            }
        }

        VisibleSubgraph {
            nodes,
            links: kept_edges.into_iter().cloned().collect(),
        }
    }

    /// The center node plus every direct neighbor via any edge, over the
    /// full master index. Edges whose far endpoint does not resolve are
    /// dropped so the closure invariant holds on the output.
    fn ego_network(index: &GraphIndex, center: Option<&Node>) -> VisibleSubgraph {
        let Some(center) = center else {
            return VisibleSubgraph::default();
        };

        let mut seen: AHashSet<NodeId> = AHashSet::new();
        seen.insert(center.id.clone());
        let mut nodes = vec![center.clone()];
        let mut links = Vec::new();

        for edge in index.edges() {
            let other = if edge.source == center.id {
                &edge.target
            } else if edge.target == center.id {
                &edge.source
            } else {
                continue;
            };
            let Some(node) = index.find_by_id(other) else {
                continue;
            };
            links.push(edge.clone());
            if seen.insert(node.id.clone()) {
                nodes.push(node.clone());
            }
        }

        VisibleSubgraph { nodes, links }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GraphSnapshot;
    use std::collections::BTreeMap;

    /// 1990: Sailor Shift performs "Tidal Song" (Oceanus Folk)
    /// 1995: The Rival performs "Storm Album" (Rock); Sailor covers it
    fn index() -> GraphIndex {
        let mut partitions = BTreeMap::new();
        partitions.insert(
            1990,
            GraphSnapshot {
                nodes: vec![
                    Node::new("sailor", "Sailor Shift", NodeType::Person),
                    Node::new("tidal", "Tidal Song", NodeType::Song)
                        .with_genre("Oceanus Folk")
                        .with_release_year(1990),
                ],
                links: vec![Edge::new("sailor", "tidal", EdgeType::PerformerOf)],
            },
        );
        partitions.insert(
            1995,
            GraphSnapshot {
                nodes: vec![
                    Node::new("rival", "The Rival", NodeType::Person),
                    Node::new("storm", "Storm Album", NodeType::Album)
                        .with_genre("Rock")
                        .with_release_year(1995),
                    Node::new("sailor", "Sailor Shift", NodeType::Person),
                ],
                links: vec![
                    Edge::new("rival", "storm", EdgeType::PerformerOf),
                    Edge::new("sailor", "storm", EdgeType::CoverOf),
                ],
            },
        );
        let mut index = GraphIndex::new();
        index.load(partitions);
        index
    }

    fn engine() -> FilterEngine {
        FilterEngine::new(FilterConfig::default())
    }

    #[test]
    fn inactive_criteria_fall_back_to_the_initial_view() {
        let index = index();
        // Time range equal to the default bounds does not activate filtering
        let criteria = FilterCriteria {
            time_range: Some(TimeRange::new(1990, 1995)),
            ..Default::default()
        };
        let view = engine().apply(&index, &criteria, None);
        // Ego network around Sailor Shift: tidal (performs) and storm (covers)
        assert!(view.contains_node(&NodeId::from("sailor")));
        assert!(view.contains_node(&NodeId::from("tidal")));
        assert!(view.contains_node(&NodeId::from("storm")));
        assert!(!view.contains_node(&NodeId::from("rival")));
    }

    #[test]
    fn ego_network_is_symmetric() {
        let index = index();
        let center = NodeId::from("storm");
        let view = engine().apply(&index, &FilterCriteria::default(), Some(&center));
        for edge in &view.links {
            assert!(edge.source == center || edge.target == center);
        }
        for node in view.nodes.iter().filter(|n| n.id != center) {
            assert!(view
                .links
                .iter()
                .any(|e| e.source == node.id || e.target == node.id));
        }
    }

    #[test]
    fn unknown_focus_yields_an_empty_subgraph() {
        let index = index();
        let ghost = NodeId::from("nobody");
        let view = engine().apply(&index, &FilterCriteria::default(), Some(&ghost));
        assert!(view.nodes.is_empty());
        assert!(view.links.is_empty());
    }

    #[test]
    fn missing_default_center_yields_an_empty_subgraph() {
        let index = index();
        let engine = FilterEngine::new(FilterConfig {
            default_center: Some("No Such Artist".to_string()),
        });
        let view = engine.apply(&index, &FilterCriteria::default(), None);
        assert!(view.nodes.is_empty());
    }

    #[test]
    fn closure_invariant_holds_for_every_output() {
        let index = index();
        let engine = engine();
        let samples = vec![
            FilterCriteria {
                genres: BTreeSet::from(["Oceanus Folk".to_string()]),
                ..Default::default()
            },
            FilterCriteria {
                time_range: Some(TimeRange::new(1995, 1995)),
                node_types: BTreeSet::from([NodeType::Person]),
                ..Default::default()
            },
            FilterCriteria {
                search_term: "storm".to_string(),
                edge_types: BTreeSet::from([EdgeType::CoverOf]),
                ..Default::default()
            },
        ];
        for criteria in samples {
            let view = engine.apply(&index, &criteria, None);
            for edge in &view.links {
                assert!(view.contains_node(&edge.source));
                assert!(view.contains_node(&edge.target));
            }
        }
    }

    #[test]
    fn surviving_edges_rescue_their_excluded_endpoint() {
        let index = index();
        // Genre filter keeps only the Oceanus Folk song; Sailor Shift has no
        // genre and fails the predicate, but the performer edge pulls the
        // artist back into the visible set.
        let criteria = FilterCriteria {
            genres: BTreeSet::from(["Oceanus Folk".to_string()]),
            ..Default::default()
        };
        let view = engine().apply(&index, &criteria, None);
        assert!(view.contains_node(&NodeId::from("tidal")));
        assert!(view.contains_node(&NodeId::from("sailor")));
        assert_eq!(view.links.len(), 1);
    }

    #[test]
    fn rescue_never_crosses_the_time_gate() {
        let index = index();
        // 1990 only: the cover edge to the 1995 album must not smuggle
        // the album in, even though sailor survives.
        let criteria = FilterCriteria {
            time_range: Some(TimeRange::new(1990, 1990)),
            search_term: "sailor".to_string(),
            ..Default::default()
        };
        let view = engine().apply(&index, &criteria, None);
        assert!(view.contains_node(&NodeId::from("sailor")));
        assert!(view.contains_node(&NodeId::from("tidal")));
        assert!(!view.contains_node(&NodeId::from("storm")));
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let index = index();
        let criteria = FilterCriteria {
            search_term: "shift".to_string(),
            ..Default::default()
        };
        let view = engine().apply(&index, &criteria, None);
        assert!(view.contains_node(&NodeId::from("sailor")));
        assert!(!view.contains_node(&NodeId::from("rival")));
    }

    #[test]
    fn edge_type_predicate_restricts_links() {
        let index = index();
        let criteria = FilterCriteria {
            edge_types: BTreeSet::from([EdgeType::CoverOf]),
            search_term: "s".to_string(), // matches every node name
            ..Default::default()
        };
        let view = engine().apply(&index, &criteria, None);
        assert_eq!(view.links.len(), 1);
        assert_eq!(view.links[0].edge_type, EdgeType::CoverOf);
    }

    #[test]
    fn blank_search_term_is_inactive() {
        let criteria = FilterCriteria {
            search_term: "   ".to_string(),
            ..Default::default()
        };
        assert!(!criteria.is_active(Some((1990, 1995))));
    }
}
