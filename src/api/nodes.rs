use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::models::{AppState, ConnectRequest, NodesResponse, ReplaceResponse};
use crate::consensus::find_longest_chain;

/// Register one or more peer node URLs. Responds with the full membership
/// for observability.
#[post("/connect_node")]
pub async fn connect_node(
    state: web::Data<AppState>,
    body: web::Json<ConnectRequest>,
) -> impl Responder {
    if body.nodes.is_empty() {
        return HttpResponse::BadRequest().body("at least one node address is required");
    }

    let mut peers = state.peers.lock().expect("mutex poisoned");
    if let Err(err) = peers.add_all(&body.nodes) {
        warn!("POST /connect_node - rejected: {err}");
        return HttpResponse::BadRequest().body(err.to_string());
    }
    info!("POST /connect_node - registry now holds {} peer(s)", peers.len());

    HttpResponse::Ok().json(NodesResponse {
        total_nodes: peers.to_vec(),
    })
}

/// List the known peer nodes.
#[get("/get_nodes")]
pub async fn get_nodes(state: web::Data<AppState>) -> impl Responder {
    let peers = state.peers.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(NodesResponse {
        total_nodes: peers.to_vec(),
    })
}

/// Run consensus resolution: fetch every known peer's chain and adopt the
/// longest valid one if it is strictly longer than ours.
#[get("/replace_chain")]
pub async fn replace_chain(state: web::Data<AppState>) -> impl Responder {
    let peers = {
        let registry = state.peers.lock().expect("mutex poisoned");
        registry.to_vec()
    };
    let (local_len, difficulty) = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        (ledger.len(), ledger.difficulty())
    };

    // Fetches happen outside the ledger lock; the swap below re-checks
    // length and validity against the chain as it is by then.
    let candidate = find_longest_chain(&state.fetcher, &peers, local_len, difficulty).await;

    let mut ledger = state.ledger.lock().expect("mutex poisoned");
    let replaced = match candidate {
        Some(chain) => ledger.adopt_if_longer(chain),
        None => false,
    };
    info!(
        "CONSENSUS - scanned {} peer(s), replaced={replaced}",
        peers.len()
    );
    HttpResponse::Ok().json(ReplaceResponse {
        replaced,
        length: ledger.len(),
        chain: ledger.chain(),
    })
}
