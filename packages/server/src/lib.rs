#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the market pulse dashboard.
//!
//! Serves the REST API the dashboard frontend and the chat agent consume:
//! region search and lookup, per-region trend and overview queries,
//! cross-region rankings and comparisons, bedroom and affordability cuts,
//! and the chat tool lookup endpoint. All reads go through a single
//! Postgres connection; the observation tables are treated as read-only.

mod handlers;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use market_pulse_database::db;
use std::sync::Arc;
use switchy_database::Database;

/// Shared application state.
pub struct AppState {
    /// Postgres database connection for all queries.
    pub db: Arc<dyn Database>,
}

/// Starts the market pulse API server.
///
/// Connects to the Postgres database and starts the Actix-Web HTTP
/// server. This is a regular async function — the caller is responsible
/// for providing the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the database connection fails.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Connecting to database...");
    let db_conn = db::connect_from_env()
        .await
        .expect("Failed to connect to database");

    let state = web::Data::new(AppState {
        db: Arc::from(db_conn),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/regions/search", web::get().to(handlers::search_regions))
                    .route("/regions/{regionId}", web::get().to(handlers::get_region))
                    .route("/trends", web::get().to(handlers::trends))
                    .route("/overview", web::get().to(handlers::overview))
                    .route("/rankings", web::get().to(handlers::rankings))
                    .route("/bedrooms", web::get().to(handlers::bedrooms))
                    .route("/affordability", web::get().to(handlers::affordability))
                    .route("/inventory", web::get().to(handlers::inventory))
                    .route("/heat", web::get().to(handlers::heat))
                    .route("/compare", web::post().to(handlers::compare))
                    .route("/chat/lookup", web::post().to(handlers::chat_lookup)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
