use std::time::Instant;

use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::models::{AppState, ChainResponse, MineRequest, MineResponse, ValidateResponse};
use crate::blockchain::ChainError;

/// Get the full chain. This is also the shape peers fetch during
/// consensus resolution, so each block is serialized with its hash.
#[get("/get_chain")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    let resp = ChainResponse {
        length: ledger.len(),
        difficulty: ledger.difficulty(),
        chain: ledger.chain(),
    };
    HttpResponse::Ok().json(resp)
}

/// Validate the whole chain: linkage and PoW.
#[get("/is_valid")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    let resp = ValidateResponse {
        valid: ledger.is_valid(),
        length: ledger.len(),
        difficulty: ledger.difficulty(),
    };
    HttpResponse::Ok().json(resp)
}

/// Mine one block settling the pending pool plus the reward transaction.
///
/// The search is CPU-bound and unbounded, so it runs on the blocking
/// thread pool; the ledger lock is held for the whole call so no
/// concurrent mine or replace can consume the same pending pool.
#[post("/mine")]
pub async fn mine_block(state: web::Data<AppState>, req: web::Json<MineRequest>) -> impl Responder {
    let sender = req.sender.clone();
    let receiver = req.receiver.clone();

    let started = Instant::now();
    let mining_state = state.clone();
    let mined = web::block(move || {
        let mut ledger = mining_state.ledger.lock().expect("mutex poisoned");
        ledger.mine(&sender, &receiver, None)
    })
    .await;

    let block = match mined {
        Ok(Ok(block)) => block,
        Ok(Err(err @ ChainError::InvalidReward(_))) => {
            warn!("MINER - rejected: {err}");
            return HttpResponse::BadRequest().body(err.to_string());
        }
        Ok(Err(err)) => {
            warn!("MINER - append rejected: {err}");
            return HttpResponse::Conflict().body(err.to_string());
        }
        Err(err) => {
            warn!("MINER - blocking task failed: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mine_duration_secs = started.elapsed().as_secs_f64();
    info!(
        "MINER - sealed block #{} (nonce={}) in {:.3}s",
        block.index, block.nonce, mine_duration_secs
    );

    let difficulty = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.difficulty()
    };
    HttpResponse::Ok().json(MineResponse {
        mine_duration_secs,
        difficulty,
        block,
    })
}
