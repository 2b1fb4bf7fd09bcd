//! # harmonet
//!
//! A client-side filtering and aggregation engine for a music-industry
//! influence network.
//!
//! harmonet indexes a year-partitioned `{nodes, links}` graph of people,
//! groups, works and labels, and answers interactive queries over it:
//! composable filtering with a connectedness guarantee, per-artist career
//! timelines with yearly influence statistics, and throttled proxying to
//! layout, prediction and sankey backends.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! harmonet --data-dir ./data --http-port 7400
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use harmonet::prelude::*;
//! use std::collections::BTreeMap;
//!
//! let mut partitions = BTreeMap::new();
//! partitions.insert(1990, GraphSnapshot {
//!     nodes: vec![
//!         Node::new("artist", "Sailor Shift", NodeType::Person),
//!         Node::new("song", "Tidal Song", NodeType::Song).with_release_year(1990),
//!     ],
//!     links: vec![Edge::new("artist", "song", EdgeType::PerformerOf)],
//! });
//!
//! let mut index = GraphIndex::new();
//! index.load(partitions);
//!
//! let engine = FilterEngine::new(FilterConfig::default());
//! let view = engine.apply(&index, &FilterCriteria::default(), None);
//! assert_eq!(view.nodes.len(), 2);
//!
//! let career = CareerAnalyzer::analyze(&index, &NodeId::from("artist")).unwrap();
//! assert_eq!(career.timeline.len(), 1);
//! ```
//!
//! ## Crate Structure
//!
//! - `harmonet-core` - graph index, filter engine, career analytics,
//!   throttling primitives
//! - `harmonet-data` - dataset ingestion, backend clients, the shared
//!   [`GraphService`]
//! - `harmonet-api` - the REST surface

pub use harmonet_core::{
    CareerAnalyzer, CareerData, Clock, Debouncer, Edge, EdgeKey, EdgeType, Error, FilterConfig,
    FilterCriteria, FilterEngine, FilterOptions, GraphIndex, GraphSnapshot, InFlightGuard, Node,
    NodeId, NodeType, Result, SystemClock, TimeRange, VisibleSubgraph, Work, YearStat,
};

pub use harmonet_data::{
    BackendClients, DataPaths, GraphService, LayoutClient, LayoutFilters, LayoutRequest,
    PredictionClient, SankeyClient, ServiceConfig,
};

pub use harmonet_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BackendClients, CareerAnalyzer, CareerData, DataPaths, Edge, EdgeType, Error, FilterConfig,
        FilterCriteria, FilterEngine, FilterOptions, GraphIndex, GraphService, GraphSnapshot, Node,
        NodeId, NodeType, RestApi, Result, ServiceConfig, TimeRange, VisibleSubgraph,
    };
}
