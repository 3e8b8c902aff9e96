use actix_web::{HttpResponse, post, web};
use log::{debug, warn};

use super::models::{AppState, MessageResponse, NewTransactionRequest};
use crate::error::Result;

/// Queue a transaction for the next mined block.
#[post("/transactions/new")]
pub async fn new_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTransactionRequest>,
) -> Result<HttpResponse> {
    let (sender, recipient, amount) = body.into_inner().into_parts().inspect_err(|e| {
        warn!("POST /transactions/new - rejected: {e}");
    })?;

    let index = state.submit_transaction(&sender, &recipient, amount);
    debug!("POST /transactions/new - {sender} -> {recipient} queued for block {index}");

    Ok(HttpResponse::Created().json(MessageResponse {
        message: format!("transaction will be added to block {index}"),
    }))
}
