//! Inkpost application entry point.
//!
//! Bootstraps the server:
//! 1. Load configuration from environment
//! 2. Connect to Redis
//! 3. Build router with API routes
//! 4. Apply CORS and security headers middleware
//! 5. Start Axum server
//!
//! Also supports a `seed` subcommand for importing/destroying sample data.

use inkpost::{auth::middleware::AppState, config::Config, middleware::security_headers, routes};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

fn print_seed_usage() {
    eprintln!("Usage: inkpost seed [-d]");
    eprintln!();
    eprintln!("Import sample data (users, posts, comments) into Redis.");
    eprintln!("With -d, destroy all application data instead.");
}

#[tokio::main]
async fn main() {
    // Initialize tracing with env filter support (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config from environment
    let config = Config::from_env().expect("Failed to load config");

    // Connect to Redis
    let redis_client = redis::Client::open(config.redis_url.as_str()).expect("Invalid Redis URL");

    // Verify Redis connection
    let mut con = redis_client
        .get_multiplexed_async_connection()
        .await
        .expect("Failed to connect to Redis");

    // Check for seed subcommand
    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 && args[1] == "seed" {
        match args.get(2).map(String::as_str) {
            None => {
                inkpost::seed::import(&mut con).await.expect("Seed failed");
                println!("Data Import Complete!");
            }
            Some("-d") => {
                inkpost::seed::destroy(&mut con).await.expect("Destroy failed");
                println!("Data Destroyed!");
            }
            Some(_) => {
                print_seed_usage();
                std::process::exit(1);
            }
        }
        return;
    }

    tracing::info!("Starting inkpost on {}", config.bind_addr);

    // Build shared state
    let state = AppState {
        redis: redis_client,
        config: Arc::new(config.clone()),
    };

    // CORS: the browser client sends the session cookie, so the configured
    // frontend origin is allowed with credentials. With no origin configured,
    // CorsLayer::new() with no allowed origins rejects all CORS preflights.
    let cors = match &config.frontend_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<axum::http::HeaderValue>()
                    .expect("Invalid FRONTEND_ORIGIN"),
            )
            .allow_credentials(true)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE]),
        None => CorsLayer::new(),
    };

    let app = routes::api_router()
        .layer(cors)
        .layer(axum::middleware::from_fn(security_headers))
        .with_state(state);

    // Bind to configured address
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Listening on {}", config.bind_addr);

    // Start server
    axum::serve(listener, app).await.expect("Server error");
}
