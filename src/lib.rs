pub mod api;
pub mod blockchain;
pub mod config;
pub mod consensus;
pub mod error;
pub mod node;
pub mod transaction;
