//! # harmonet Core
//!
//! Core engine for the harmonet music influence graph.
//!
//! This crate provides the framework-free data structures and algorithms:
//!
//! - [`Node`] / [`Edge`] - typed graph records with the dataset's wire names
//! - [`GraphIndex`] - deduplicated, year-partitioned node/edge index
//! - [`FilterEngine`] - visible-subgraph computation with closure expansion
//! - [`CareerAnalyzer`] - per-artist timeline and yearly statistics
//! - [`InFlightGuard`] / [`Debouncer`] - request coalescing primitives
//!
//! ## Example
//!
//! ```rust
//! use harmonet_core::{
//!     CareerAnalyzer, Edge, EdgeType, FilterConfig, FilterCriteria, FilterEngine,
//!     GraphIndex, GraphSnapshot, Node, NodeId, NodeType,
//! };
//!
//! let mut index = GraphIndex::new();
//! index.load_full(GraphSnapshot {
//!     nodes: vec![
//!         Node::new("artist", "Sailor Shift", NodeType::Person),
//!         Node::new("song", "Tidal Song", NodeType::Song).with_release_year(1990),
//!     ],
//!     links: vec![Edge::new("artist", "song", EdgeType::PerformerOf)],
//! });
//!
//! let engine = FilterEngine::new(FilterConfig::default());
//! let view = engine.apply(&index, &FilterCriteria::default(), None);
//! assert_eq!(view.nodes.len(), 2);
//!
//! let career = CareerAnalyzer::analyze(&index, &NodeId::from("artist")).unwrap();
//! assert_eq!(career.yearly[&1990].work_count, 1);
//! ```

pub mod career;
pub mod error;
pub mod filter;
pub mod index;
pub mod model;
pub mod throttle;

pub use career::{CareerAnalyzer, CareerData, Work, YearStat, COMPARISON_SIZE};
pub use error::{Error, Result};
pub use filter::{FilterConfig, FilterCriteria, FilterEngine, TimeRange, VisibleSubgraph};
pub use index::GraphIndex;
pub use model::{
    Edge, EdgeKey, EdgeType, FilterOptions, GraphSnapshot, Node, NodeId, NodeType,
};
pub use throttle::{Clock, Debouncer, InFlightGuard, InFlightPermit, SystemClock};
