use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

/// Errors surfaced to callers of a node.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("Missing values: {0}")]
    MissingFields(String),

    #[error("Please supply a valid list of nodes")]
    MissingNodes,

    #[error("Invalid node address: {0:?}")]
    InvalidNodeAddress(String),

    #[error("Proof-of-work worker failed")]
    MiningWorker(#[from] actix_web::error::BlockingError),
}

impl ResponseError for NodeError {
    fn status_code(&self) -> StatusCode {
        match self {
            NodeError::MiningWorker(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}

/// Reasons a peer contributed nothing to a consensus pass.
#[derive(Error, Debug)]
pub enum PeerError {
    #[error("peer unreachable: {0}")]
    Unreachable(String),

    #[error("peer answered with status {0}")]
    BadStatus(u16),

    #[error("peer sent an undecodable chain: {0}")]
    Decode(String),

    #[error("peer reported length {reported} but sent {actual} blocks")]
    LengthMismatch { reported: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, NodeError>;
