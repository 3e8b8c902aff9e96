use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, ChainResponse, MineResponse};
use crate::error::Result;

/// Get the full blockchain.
#[get("/chain")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let chain = state.chain();
    HttpResponse::Ok().json(ChainResponse {
        length: chain.len(),
        chain,
    })
}

/// Forge a new block from the pending pool, paying this node the reward.
#[get("/mine")]
pub async fn mine(state: web::Data<AppState>) -> Result<HttpResponse> {
    let block = state.mine().await?;
    Ok(HttpResponse::Ok().json(MineResponse {
        message: "New Block Forged",
        index: block.index,
        transactions: block.transactions,
        proof: block.proof,
        previous_hash: block.previous_hash,
    }))
}
