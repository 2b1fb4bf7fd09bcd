//! Snapshot ingestion. The static dataset ships as three JSON files: the
//! full graph, a year-partitioned chunk map, and a filter-options object.
//! Ingestion is schema-validated: records that fail the Node/Edge shape are
//! quarantined (counted and logged), never propagated and never fatal.

use harmonet_core::{Edge, FilterOptions, GraphSnapshot, Node, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// An ingested value plus the number of records quarantined on the way in
#[derive(Debug)]
pub struct Ingest<T> {
    pub value: T,
    pub quarantined: usize,
}

/// Load a full `{nodes, links}` snapshot. Missing keys degrade to empty
/// collections; malformed records are dropped with a warning.
pub async fn load_snapshot(path: impl AsRef<Path>) -> Result<Ingest<GraphSnapshot>> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    let raw: Value = serde_json::from_slice(&bytes)?;
    let ingest = snapshot_from_value(&raw);
    debug!(
        path = %path.as_ref().display(),
        nodes = ingest.value.nodes.len(),
        links = ingest.value.links.len(),
        quarantined = ingest.quarantined,
        "snapshot loaded"
    );
    Ok(ingest)
}

/// Load the year-partitioned chunk map `{ "<year>": {nodes, links}, ... }`.
/// Unparseable year keys are excluded, not an error.
pub async fn load_yearly(
    path: impl AsRef<Path>,
) -> Result<Ingest<BTreeMap<i32, GraphSnapshot>>> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    let raw: Value = serde_json::from_slice(&bytes)?;

    let mut partitions = BTreeMap::new();
    let mut quarantined = 0;
    if let Some(map) = raw.as_object() {
        for (key, chunk) in map {
            let Some(year) = harmonet_core::model::parse_year_str(key) else {
                warn!(key, "skipping partition with unparseable year key");
                continue;
            };
            let ingest = snapshot_from_value(chunk);
            quarantined += ingest.quarantined;
            partitions.insert(year, ingest.value);
        }
    }
    debug!(
        path = %path.as_ref().display(),
        partitions = partitions.len(),
        quarantined,
        "yearly chunks loaded"
    );
    Ok(Ingest {
        value: partitions,
        quarantined,
    })
}

/// Load the filter vocabulary. Missing keys default to empty lists.
pub async fn load_options(path: impl AsRef<Path>) -> Result<FilterOptions> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    let options: FilterOptions = serde_json::from_slice(&bytes)?;
    Ok(options)
}

/// Per-record validation: each entry of `nodes`/`links` is deserialized on
/// its own so one malformed record cannot poison the load.
pub fn snapshot_from_value(raw: &Value) -> Ingest<GraphSnapshot> {
    let mut snapshot = GraphSnapshot::default();
    let mut quarantined = 0;

    for entry in raw.get("nodes").and_then(Value::as_array).into_iter().flatten() {
        match serde_json::from_value::<Node>(entry.clone()) {
            Ok(node) => snapshot.nodes.push(node),
            Err(e) => {
                quarantined += 1;
                warn!(error = %e, "quarantined malformed node record");
            }
        }
    }
    for entry in raw.get("links").and_then(Value::as_array).into_iter().flatten() {
        match serde_json::from_value::<Edge>(entry.clone()) {
            Ok(edge) => snapshot.links.push(edge),
            Err(e) => {
                quarantined += 1;
                warn!(error = %e, "quarantined malformed link record");
            }
        }
    }

    Ingest {
        value: snapshot,
        quarantined,
    }
}
