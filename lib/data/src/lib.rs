//! Data plane for the influence-graph engine: file ingestion with
//! per-record quarantine, HTTP clients for the layout, prediction and
//! sankey backends, and the [`GraphService`] that owns the shared index
//! and coordinates filtering, focus and throttled layout fetches.

pub mod clients;
pub mod loader;
pub mod service;

pub use clients::{LayoutClient, LayoutFilters, LayoutRequest, PredictionClient, SankeyClient};
pub use loader::Ingest;
pub use service::{BackendClients, DataPaths, GraphService, ServiceConfig};
