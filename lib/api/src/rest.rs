use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use harmonet_core::{Error, FilterCriteria, NodeId, TimeRange};
use harmonet_data::{GraphService, LayoutRequest};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
struct FocusRequest {
    node_id: NodeId,
}

#[derive(Deserialize)]
struct CompareRequest {
    ids: Vec<NodeId>,
}

#[derive(Deserialize)]
struct TimeRangeRequest {
    start: i32,
    end: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PredictRequest {
    #[serde(default)]
    weight_preferences: Option<serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SankeyRequest {
    filter_type: String,
    #[serde(default)]
    params: serde_json::Value,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(service: Arc<GraphService>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(service.clone()))
                .route("/graph", web::get().to(get_graph))
                .route("/graph/filter", web::post().to(filter_graph))
                .route("/graph/focus", web::post().to(focus_node))
                .route("/graph/time-range", web::post().to(set_time_range))
                .route("/graph/options", web::get().to(get_options))
                .route("/artists/{id}/career", web::get().to(get_career))
                .route("/artists/compare", web::post().to(compare_artists))
                .route("/layout", web::post().to(request_layout))
                .route("/predict", web::post().to(predict))
                .route("/sankey", web::post().to(sankey))
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

async fn get_graph(service: web::Data<Arc<GraphService>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.visible()))
}

async fn filter_graph(
    service: web::Data<Arc<GraphService>>,
    req: web::Json<FilterCriteria>,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.filter(req.into_inner())))
}

async fn focus_node(
    service: web::Data<Arc<GraphService>>,
    req: web::Json<FocusRequest>,
) -> ActixResult<HttpResponse> {
    let view = service.focus(req.into_inner().node_id).await;
    Ok(HttpResponse::Ok().json(view))
}

async fn set_time_range(
    service: web::Data<Arc<GraphService>>,
    req: web::Json<TimeRangeRequest>,
) -> ActixResult<HttpResponse> {
    service.set_time_range(TimeRange::new(req.start, req.end));
    Ok(HttpResponse::Ok().json(service.visible()))
}

async fn get_options(service: web::Data<Arc<GraphService>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.options()))
}

/// Path segments arrive as text, but the dataset uses both string and
/// integer ids; an all-digit segment addresses the integer form.
fn node_id_from_path(raw: String) -> NodeId {
    match raw.parse::<u64>() {
        Ok(n) => NodeId::from(n),
        Err(_) => NodeId::from(raw),
    }
}

async fn get_career(
    service: web::Data<Arc<GraphService>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let artist_id = node_id_from_path(path.into_inner());

    match service.career(&artist_id) {
        Some(career) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "result": career
        }))),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "result": null
        }))),
    }
}

async fn compare_artists(
    service: web::Data<Arc<GraphService>>,
    req: web::Json<CompareRequest>,
) -> ActixResult<HttpResponse> {
    match service.compare(&req.ids) {
        Ok(careers) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "result": careers
        }))),
        Err(e @ Error::ComparisonSelection { .. }) => {
            Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.to_string()
            })))
        }
        Err(e @ Error::ArtistNotFound(_)) => {
            Ok(HttpResponse::NotFound().json(serde_json::json!({
                "error": e.to_string()
            })))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "error": e.to_string()
        }))),
    }
}

async fn request_layout(
    service: web::Data<Arc<GraphService>>,
    req: web::Json<LayoutRequest>,
) -> ActixResult<HttpResponse> {
    match service.request_layout(&req.into_inner()).await {
        Ok(Some(snapshot)) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "result": snapshot
        }))),
        Ok(None) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "result": "dropped"
        }))),
        Err(e) => Ok(backend_error(e)),
    }
}

async fn predict(
    service: web::Data<Arc<GraphService>>,
    req: web::Json<PredictRequest>,
) -> ActixResult<HttpResponse> {
    match service.predict(req.into_inner().weight_preferences).await {
        Ok(result) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "result": result
        }))),
        Err(e) => Ok(backend_error(e)),
    }
}

async fn sankey(
    service: web::Data<Arc<GraphService>>,
    req: web::Json<SankeyRequest>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();
    match service.sankey(&req.filter_type, req.params).await {
        Ok(snapshot) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "result": snapshot
        }))),
        Err(e) => Ok(backend_error(e)),
    }
}

/// Backend proxy failures surface as 502 with the typed message so the
/// front end can show it verbatim; a missing client is a 400.
fn backend_error(e: Error) -> HttpResponse {
    match e {
        Error::Transport { .. } | Error::Backend(_) => {
            tracing::warn!(error = %e, "backend proxy failed");
            HttpResponse::BadGateway().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
        Error::InvalidConfig(_) => HttpResponse::BadRequest().json(serde_json::json!({
            "error": e.to_string()
        })),
        _ => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": e.to_string()
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harmonet_core::{Edge, EdgeType, GraphIndex, GraphSnapshot, Node, NodeType};
    use harmonet_data::{BackendClients, ServiceConfig};
    use std::collections::BTreeMap;

    #[test]
    fn path_segments_address_both_id_forms() {
        assert_eq!(node_id_from_path("17".to_string()), NodeId::Integer(17));
        assert_eq!(
            node_id_from_path("sailor".to_string()),
            NodeId::String("sailor".to_string())
        );
        assert_eq!(
            node_id_from_path("17b".to_string()),
            NodeId::String("17b".to_string())
        );
    }

    #[test]
    fn career_lookup_resolves_an_integer_id_artist() {
        let mut partitions = BTreeMap::new();
        partitions.insert(
            1990,
            GraphSnapshot {
                nodes: vec![
                    Node::new(17u64, "Sailor Shift", NodeType::Person),
                    Node::new("tidal", "Tidal Song", NodeType::Song).with_release_year(1990),
                ],
                links: vec![Edge::new(17u64, "tidal", EdgeType::PerformerOf)],
            },
        );
        let mut index = GraphIndex::new();
        index.load(partitions);
        let service = GraphService::from_parts(
            index,
            Default::default(),
            ServiceConfig::default(),
            BackendClients::default(),
        );

        let career = service.career(&node_id_from_path("17".to_string()));
        assert!(career.is_some());
    }
}
