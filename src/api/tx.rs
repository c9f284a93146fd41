use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, warn};

use super::models::{AppState, NewTransactionRequest, NewTransactionResponse, PendingResponse};
use crate::transaction::Transaction;

/// Submit a transaction into the pending pool. Responds with the index of
/// the block that will settle it.
#[post("/add_transaction")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTransactionRequest>,
) -> impl Responder {
    let tx = match Transaction::new(&body.sender, &body.receiver, body.amount) {
        Ok(tx) => tx,
        Err(err) => {
            warn!("POST /add_transaction - rejected: {err}");
            return HttpResponse::BadRequest().body(err.to_string());
        }
    };

    let index = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.add_transaction(tx)
    };
    debug!("POST /add_transaction - queued for block #{index}");

    HttpResponse::Ok().json(NewTransactionResponse { index })
}

/// List the pending pool (transactions accepted but not yet settled).
#[get("/pending")]
pub async fn get_pending(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(PendingResponse {
        size: ledger.pending().len(),
        transactions: ledger.pending(),
    })
}
