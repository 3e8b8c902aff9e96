use actix_web::{HttpResponse, Responder, get, post, web};
use log::warn;

use super::models::{AppState, RegisterNodesRequest, RegisterNodesResponse, ResolveResponse};
use crate::error::{NodeError, Result};

/// Add peers to this node's registry.
#[post("/nodes/register")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> Result<HttpResponse> {
    let Some(nodes) = body.into_inner().nodes else {
        warn!("POST /nodes/register - rejected: no node list");
        return Err(NodeError::MissingNodes);
    };

    let total_nodes = state.register_nodes(nodes.as_slice())?;
    Ok(HttpResponse::Created().json(RegisterNodesResponse {
        message: "New nodes have been added",
        total_nodes,
    }))
}

/// Run the longest-chain rule against every registered peer.
#[get("/nodes/resolve")]
pub async fn resolve(state: web::Data<AppState>) -> impl Responder {
    let resp = if state.resolve_conflicts().await {
        ResolveResponse::Replaced {
            message: "chain replaced",
            new_chain: state.chain(),
        }
    } else {
        ResolveResponse::Authoritative {
            message: "chain authoritative",
            chain: state.chain(),
        }
    };
    HttpResponse::Ok().json(resp)
}
