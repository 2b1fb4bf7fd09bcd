//! HTTP clients for the backend collaborators. The engine only consumes
//! their JSON contracts: graph layouts, influence predictions, and sankey
//! sub-filter subgraphs. Transport failures surface as typed errors so the
//! caller can show them; they are never swallowed.

use crate::loader;
use harmonet_core::{Error, GraphSnapshot, Result, TimeRange};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn transport(e: reqwest::Error) -> Error {
    Error::Transport {
        status: e.status().map(|s| s.as_u16()).unwrap_or(0),
        message: e.to_string(),
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        let message = resp.text().await.unwrap_or_default();
        Err(Error::Transport {
            status: status.as_u16(),
            message,
        })
    }
}

/// Filter axes forwarded to the layout backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutFilters {
    pub node_types: Vec<String>,
    pub edge_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
}

/// Request body for a neighborhood layout around a center node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    pub center_node_name: String,
    pub hop_level: u32,
    pub filters: LayoutFilters,
}

/// Client for the graph-layout backend: takes a center node and hop radius,
/// returns a positioned `{nodes, links}` subgraph or a body-level `{error}`.
#[derive(Debug, Clone)]
pub struct LayoutClient {
    http: reqwest::Client,
    endpoint: String,
}

impl LayoutClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub async fn fetch(&self, request: &LayoutRequest) -> Result<GraphSnapshot> {
        let resp = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(transport)?;
        let body: Value = check_status(resp).await?.json().await.map_err(transport)?;
        if let Some(message) = body.get("error").and_then(Value::as_str) {
            return Err(Error::Backend(message.to_string()));
        }
        Ok(loader::snapshot_from_value(&body).value)
    }
}

/// Client for the ML influence-prediction backend. The graph goes out as
/// `{graphData: {nodes, edges}}` - the wire field for links is `edges` -
/// and the result is opaque JSON passed through to the caller.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl PredictionClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// `graph_data` is the prebuilt `{nodes, edges}` object - built under
    /// the index lock by the caller so no guard is held across the await
    pub async fn predict(
        &self,
        graph_data: Value,
        weight_preferences: Option<Value>,
    ) -> Result<Value> {
        let mut body = serde_json::json!({ "graphData": graph_data });
        if let Some(weights) = weight_preferences {
            body["weightPreferences"] = weights;
        }

        let resp = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        check_status(resp).await?.json().await.map_err(transport)
    }
}

/// Client for the sankey sub-filter backend: an arbitrary filter-type and
/// parameter payload in, a graph-shaped subgraph out.
#[derive(Debug, Clone)]
pub struct SankeyClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SankeyClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub async fn subfilter(&self, filter_type: &str, params: Value) -> Result<GraphSnapshot> {
        let body = serde_json::json!({
            "filterType": filter_type,
            "params": params,
        });
        let resp = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let value: Value = check_status(resp).await?.json().await.map_err(transport)?;
        Ok(loader::snapshot_from_value(&value).value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_request_serializes_with_camel_case_wire_names() {
        let request = LayoutRequest {
            center_node_name: "Sailor Shift".to_string(),
            hop_level: 2,
            filters: LayoutFilters {
                node_types: vec!["Person".to_string()],
                edge_types: vec![],
                genre: Some("Oceanus Folk".to_string()),
                time_range: Some(TimeRange::new(1990, 2000)),
            },
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["centerNodeName"], "Sailor Shift");
        assert_eq!(body["hopLevel"], 2);
        assert_eq!(body["filters"]["nodeTypes"][0], "Person");
        assert_eq!(body["filters"]["timeRange"]["start"], 1990);
    }
}
