use actix_web::{App, HttpServer, web};
use clap::Parser;
use dotenvy::dotenv;
use log::info;

use pow_ledger::api::{self, AppState};
use pow_ledger::config::Config;
use pow_ledger::consensus::HttpChainSource;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    let state = web::Data::new(AppState::new(HttpChainSource::new(config.peer_timeout())));

    info!(
        "⛓️ Starting ledger node {} at http://{}:{}",
        state.node_id(),
        config.host,
        config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
