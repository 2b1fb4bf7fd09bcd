//! The shared engine state handed to the API: one writer (this service),
//! many readers (derived views). Layout fetches are serialized by an
//! in-flight guard that drops overlapping requests; time-range dragging is
//! coalesced through a trailing-edge debounce, while direct selection
//! changes fetch immediately.

use crate::clients::{LayoutClient, LayoutFilters, LayoutRequest, PredictionClient, SankeyClient};
use crate::loader;
use harmonet_core::{
    CareerAnalyzer, CareerData, Debouncer, Error, FilterConfig, FilterCriteria, FilterEngine,
    FilterOptions, GraphIndex, GraphSnapshot, InFlightGuard, NodeId, Result, TimeRange,
    VisibleSubgraph,
};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Locations of the static dataset files
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub yearly: PathBuf,
    pub options: PathBuf,
}

/// Service tuning
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub filter: FilterConfig,
    /// Trailing-edge delay applied to time-range changes
    pub debounce_delay: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            debounce_delay: Duration::from_millis(300),
        }
    }
}

/// Optional backend collaborators; absent clients disable their endpoints
#[derive(Debug, Clone, Default)]
pub struct BackendClients {
    pub layout: Option<LayoutClient>,
    pub prediction: Option<PredictionClient>,
    pub sankey: Option<SankeyClient>,
}

pub struct GraphService {
    index: RwLock<GraphIndex>,
    options: RwLock<FilterOptions>,
    engine: FilterEngine,
    criteria: RwLock<FilterCriteria>,
    focused: RwLock<Option<NodeId>>,
    latest_layout: RwLock<Option<GraphSnapshot>>,
    layout_guard: InFlightGuard,
    debounce: Mutex<Debouncer>,
    clients: BackendClients,
}

impl GraphService {
    /// Fan-out/fan-in initialization: the yearly chunks and the filter
    /// options load concurrently, and a failure of either fails the whole
    /// initialization.
    pub async fn init(
        paths: DataPaths,
        config: ServiceConfig,
        clients: BackendClients,
    ) -> Result<Arc<Self>> {
        let (yearly, options) = tokio::try_join!(
            loader::load_yearly(&paths.yearly),
            loader::load_options(&paths.options),
        )?;
        if yearly.quarantined > 0 {
            warn!(quarantined = yearly.quarantined, "records rejected during ingestion");
        }

        let mut index = GraphIndex::new();
        index.load(yearly.value);
        info!(
            nodes = index.node_count(),
            edges = index.edge_count(),
            "graph index ready"
        );

        Ok(Arc::new(Self::from_parts(index, options, config, clients)))
    }

    /// Assemble a service around an already-built index (tests, embedding)
    pub fn from_parts(
        index: GraphIndex,
        options: FilterOptions,
        config: ServiceConfig,
        clients: BackendClients,
    ) -> Self {
        Self {
            index: RwLock::new(index),
            options: RwLock::new(options),
            engine: FilterEngine::new(config.filter),
            criteria: RwLock::new(FilterCriteria::default()),
            focused: RwLock::new(None),
            latest_layout: RwLock::new(None),
            layout_guard: InFlightGuard::new(),
            debounce: Mutex::new(Debouncer::new(config.debounce_delay)),
            clients,
        }
    }

    /// Merge further year partitions into the index
    pub fn load_partitions(&self, partitions: BTreeMap<i32, GraphSnapshot>) {
        self.index.write().load(partitions);
    }

    /// The view for the current criteria and focus.
    ///
    /// Locks are taken one at a time, never nested; the small state is
    /// cloned out before the index guard is acquired.
    pub fn visible(&self) -> VisibleSubgraph {
        let criteria = self.criteria.read().clone();
        let focused = self.focused.read().clone();
        let index = self.index.read();
        self.engine.apply(&index, &criteria, focused.as_ref())
    }

    /// Replace the filter criteria and return the resulting view
    pub fn filter(&self, criteria: FilterCriteria) -> VisibleSubgraph {
        *self.criteria.write() = criteria;
        self.visible()
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.criteria.read().clone()
    }

    pub fn options(&self) -> FilterOptions {
        self.options.read().clone()
    }

    pub fn career(&self, artist_id: &NodeId) -> Option<CareerData> {
        CareerAnalyzer::analyze(&self.index.read(), artist_id)
    }

    pub fn compare(&self, artist_ids: &[NodeId]) -> Result<Vec<CareerData>> {
        CareerAnalyzer::compare(&self.index.read(), artist_ids)
    }

    /// Focus a node. Selection changes bypass the debounce: any pending
    /// coalesced fetch is cancelled and the layout refresh runs immediately.
    pub async fn focus(self: &Arc<Self>, node_id: NodeId) -> VisibleSubgraph {
        *self.focused.write() = Some(node_id);
        self.debounce.lock().cancel();
        if self.clients.layout.is_some() {
            if let Err(e) = self.refresh_layout().await {
                warn!(error = %e, "layout refresh after focus failed");
            }
        }
        self.visible()
    }

    /// Change the time range. High-frequency changes (range dragging) are
    /// coalesced: only the last trigger in a burst reaches the backend.
    pub fn set_time_range(self: &Arc<Self>, range: TimeRange) {
        self.criteria.write().time_range = Some(range);
        if self.clients.layout.is_none() {
            return;
        }
        let delay = {
            let mut debounce = self.debounce.lock();
            debounce.trigger();
            debounce.delay()
        };
        let service = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Only the task whose deadline survived the burst fires
            if service.debounce.lock().poll() {
                if let Err(e) = service.refresh_layout().await {
                    warn!(error = %e, "debounced layout refresh failed");
                }
            }
        });
    }

    /// Fetch a layout for the current center and criteria. Returns
    /// `Ok(None)` when the request was dropped by the in-flight guard or no
    /// center resolves.
    pub async fn refresh_layout(&self) -> Result<Option<GraphSnapshot>> {
        let Some(request) = self.layout_request() else {
            return Ok(None);
        };
        self.request_layout(&request).await
    }

    /// Proxy one layout request through the in-flight guard. While a fetch
    /// is pending new requests are dropped silently; callers re-trigger
    /// after completion if their input changed.
    pub async fn request_layout(&self, request: &LayoutRequest) -> Result<Option<GraphSnapshot>> {
        let Some(client) = self.clients.layout.as_ref() else {
            return Err(Error::InvalidConfig("no layout backend configured".into()));
        };
        let Some(_permit) = self.layout_guard.begin() else {
            debug!("layout request dropped: one already in flight");
            return Ok(None);
        };
        let snapshot = client.fetch(request).await?;
        // No cancellation exists, so a slow stale response can land after a
        // fresher one. Accepted limitation; the guard makes it rare.
        *self.latest_layout.write() = Some(snapshot.clone());
        Ok(Some(snapshot))
    }

    /// The most recently installed layout, if any
    pub fn latest_layout(&self) -> Option<GraphSnapshot> {
        self.latest_layout.read().clone()
    }

    pub fn layout_pending(&self) -> bool {
        self.layout_guard.is_pending()
    }

    /// Forward the whole graph to the prediction backend
    pub async fn predict(&self, weight_preferences: Option<Value>) -> Result<Value> {
        let Some(client) = self.clients.prediction.as_ref() else {
            return Err(Error::InvalidConfig(
                "no prediction backend configured".into(),
            ));
        };
        // Built under the read lock, sent after it is released
        let graph_data = {
            let index = self.index.read();
            serde_json::json!({
                "nodes": index.nodes(),
                "edges": index.edges(),
            })
        };
        client.predict(graph_data, weight_preferences).await
    }

    pub async fn sankey(&self, filter_type: &str, params: Value) -> Result<GraphSnapshot> {
        let Some(client) = self.clients.sankey.as_ref() else {
            return Err(Error::InvalidConfig("no sankey backend configured".into()));
        };
        client.subfilter(filter_type, params).await
    }

    // Same single-lock discipline as visible()
    fn layout_request(&self) -> Option<LayoutRequest> {
        let focused = self.focused.read().clone();
        let center_node_name = match focused {
            Some(id) => self.index.read().find_by_id(&id).map(|n| n.name.clone()),
            None => self.engine.config().default_center.clone(),
        }?;
        let criteria = self.criteria.read().clone();
        Some(LayoutRequest {
            center_node_name,
            hop_level: 1,
            filters: LayoutFilters {
                node_types: criteria.node_types.iter().map(|t| t.to_string()).collect(),
                edge_types: criteria.edge_types.iter().map(|t| t.to_string()).collect(),
                genre: criteria.genres.iter().next().cloned(),
                time_range: criteria.time_range,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harmonet_core::{Edge, EdgeType, Node, NodeType};

    fn service() -> Arc<GraphService> {
        let mut partitions = BTreeMap::new();
        partitions.insert(
            1990,
            GraphSnapshot {
                nodes: vec![
                    Node::new("sailor", "Sailor Shift", NodeType::Person),
                    Node::new("tidal", "Tidal Song", NodeType::Song).with_release_year(1990),
                ],
                links: vec![Edge::new("sailor", "tidal", EdgeType::PerformerOf)],
            },
        );
        let mut index = GraphIndex::new();
        index.load(partitions);
        Arc::new(GraphService::from_parts(
            index,
            FilterOptions::default(),
            ServiceConfig::default(),
            BackendClients::default(),
        ))
    }

    #[tokio::test]
    async fn default_view_is_the_initial_ego_network() {
        let service = service();
        let view = service.visible();
        assert_eq!(view.nodes.len(), 2);
        assert_eq!(view.links.len(), 1);
    }

    #[tokio::test]
    async fn focus_switches_the_center() {
        let service = service();
        let view = service.focus(NodeId::from("tidal")).await;
        assert!(view.contains_node(&NodeId::from("tidal")));
        assert!(view.contains_node(&NodeId::from("sailor")));
    }

    #[tokio::test]
    async fn layout_endpoints_require_a_configured_backend() {
        let service = service();
        let request = LayoutRequest {
            center_node_name: "Sailor Shift".to_string(),
            hop_level: 1,
            filters: LayoutFilters::default(),
        };
        assert!(matches!(
            service.request_layout(&request).await,
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            service.predict(None).await,
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn concurrent_readers_and_writers_make_progress() {
        let service = service();
        let mut readers = Vec::new();
        for _ in 0..4 {
            let service = Arc::clone(&service);
            readers.push(std::thread::spawn(move || {
                for _ in 0..200 {
                    let view = service.visible();
                    assert!(view.nodes.len() <= 2);
                    let _ = service.criteria();
                }
            }));
        }

        // Writer contends with the readers on both the index and the
        // criteria locks
        for i in 0..200i32 {
            let mut partitions = BTreeMap::new();
            partitions.insert(2000 + (i % 5), GraphSnapshot::default());
            service.load_partitions(partitions);
            service.filter(FilterCriteria::default());
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }

    #[tokio::test]
    async fn filter_updates_the_stored_criteria() {
        let service = service();
        let criteria = FilterCriteria {
            search_term: "shift".to_string(),
            ..Default::default()
        };
        let view = service.filter(criteria);
        assert!(view.contains_node(&NodeId::from("sailor")));
        assert_eq!(service.criteria().search_term, "shift");
    }
}
